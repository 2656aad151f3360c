//! Host-side helper: `cargo run` compiles the page script with wasm-pack into
//! `static/pkg` and serves `static/` on http://127.0.0.1:8000.

use std::io;
use std::process::{Command, ExitCode, Stdio};

fn build_pkg() -> io::Result<bool> {
    println!("Building WASM pkg …");
    let status = Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()?;
    Ok(status.success())
}

fn serve() -> io::Result<()> {
    println!("Serving static/ at http://127.0.0.1:8000 …");
    let mut server = Command::new("python3")
        .args(["-m", "http.server", "8000", "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .spawn()?;
    server.wait()?;
    Ok(())
}

fn main() -> ExitCode {
    match build_pkg() {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("wasm-pack finished with errors.");
            return ExitCode::FAILURE;
        }
        Err(err) => {
            eprintln!("wasm-pack not runnable ({err}); serving whatever is already in static/pkg.");
        }
    }

    if let Err(err) = serve() {
        eprintln!("failed to start http server: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
