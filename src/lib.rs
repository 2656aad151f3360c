//! Interactive layer of the portfolio site: gallery lightbox, click ripples and
//! the scattered-words page (hover popups, umbrella projects, audio players,
//! category legend).
//!
//! Page state machines are plain Rust and build on every target; the DOM
//! wiring only exists on wasm32.

pub mod audio;
pub mod config;
pub mod controller;
pub mod cycle;
pub mod decor;
pub mod filter;
pub mod gallery;
pub mod geometry;
pub mod lightbox;
pub mod manifest;
pub mod media;
pub mod popup;
pub mod random;
pub mod ripple;
pub mod session;
pub mod umbrella;

/// Index of a project element in document order over
/// `.project-word, .sub-project`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    mod dom;
    mod fetch;
    pub mod lightbox;
    pub mod ripple;
    mod scattered;
    pub mod storage;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if document.ready_state() == "loading" {
            gloo::events::EventListener::once(&document, "DOMContentLoaded", |_| start_all())
                .forget();
        } else {
            start_all();
        }
        Ok(())
    }

    fn start_all() {
        let config = match dom::document() {
            Ok(document) => dom::site_config(&document),
            Err(_) => crate::config::SiteConfig::default(),
        };
        if let Err(err) = lightbox::start() {
            web_sys::console::error_2(&"lightbox: start failed".into(), &err);
        }
        if let Err(err) = ripple::start(config.ripple_lifetime_ms) {
            web_sys::console::error_2(&"ripple: start failed".into(), &err);
        }
        if let Err(err) = scattered::start(config) {
            web_sys::console::error_2(&"scattered: start failed".into(), &err);
        }
    }
}
