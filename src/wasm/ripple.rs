use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlElement, MouseEvent};

use super::dom;
use crate::ripple::{Ripple, RIPPLE_CLASS};

/// Spawns a ripple at every document click and removes it after
/// `lifetime_ms`. Ripples never cancel each other.
pub fn start(lifetime_ms: u32) -> Result<(), JsValue> {
    let document = dom::document()?;
    let doc = document.clone();
    EventListener::new(&document, "click", move |event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let ripple = Ripple::at(event.client_x(), event.client_y());
        if let Err(err) = spawn(&doc, ripple, lifetime_ms) {
            gloo::console::warn!("ripple: spawn failed", err);
        }
    })
    .forget();
    Ok(())
}

fn spawn(
    document: &web_sys::Document,
    ripple: Ripple,
    lifetime_ms: u32,
) -> Result<(), JsValue> {
    let body = document.body().ok_or("no body")?;
    let element = document.create_element("div")?.dyn_into::<HtmlElement>()?;
    element.set_class_name(RIPPLE_CLASS);
    dom::set_style(&element, "left", &ripple.left());
    dom::set_style(&element, "top", &ripple.top());
    body.append_child(&element)?;
    Timeout::new(lifetime_ms, move || element.remove()).forget();
    Ok(())
}
