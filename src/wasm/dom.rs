use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, NodeList, Window};

use crate::config::SiteConfig;
use crate::geometry::{Rect, Size};

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| "no window".into())
}

pub fn document() -> Result<Document, JsValue> {
    window()?.document().ok_or_else(|| "no document".into())
}

pub fn by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("#{id} not found")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("#{id} has unexpected type")))
}

pub fn optional_by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

fn collect<T: JsCast>(list: NodeList) -> Vec<T> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

pub fn query_all<T: JsCast>(document: &Document, selector: &str) -> Result<Vec<T>, JsValue> {
    Ok(collect(document.query_selector_all(selector)?))
}

pub fn query_all_in<T: JsCast>(root: &Element, selector: &str) -> Result<Vec<T>, JsValue> {
    Ok(collect(root.query_selector_all(selector)?))
}

pub fn rect_of(element: &Element) -> Rect {
    let r = element.get_bounding_client_rect();
    Rect::new(r.left(), r.top(), r.right(), r.bottom())
}

pub fn viewport(window: &Window) -> Size {
    let read = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Size::new(read(window.inner_width()), read(window.inner_height()))
}

pub fn set_class(element: &Element, class: &str, on: bool) {
    let _ = element.class_list().toggle_with_force(class, on);
}

pub fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let _ = element.style().set_property(property, value);
}

pub fn set_display(element: &HtmlElement, value: &str) {
    set_style(element, "display", value);
}

pub fn target_element(target: Option<EventTarget>) -> Option<Element> {
    target?.dyn_into::<Element>().ok()
}

pub fn event_element(event: &Event) -> Option<Element> {
    target_element(event.target())
}

/// Whether `element` or an ancestor matches `selector`.
pub fn within(element: Option<&Element>, selector: &str) -> bool {
    element
        .and_then(|el| el.closest(selector).ok().flatten())
        .is_some()
}

pub fn attribute_lookup(element: &Element) -> impl Fn(&str) -> Option<String> + '_ {
    move |name: &str| element.get_attribute(name)
}

/// Defaults overridden by `data-*` attributes on `<body>`.
pub fn site_config(document: &Document) -> SiteConfig {
    match document.body() {
        Some(body) => SiteConfig::default().with_overrides(attribute_lookup(&body)),
        None => SiteConfig::default(),
    }
}

pub fn now_ms() -> f64 {
    js_sys::Date::now()
}
