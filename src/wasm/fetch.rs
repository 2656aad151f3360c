use gloo::net::http::Request;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;

/// GETs a same-origin JSON document.
pub async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, JsValue> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!("HTTP {} for {url}", resp.status())));
    }
    let text = resp
        .text()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| JsValue::from_str(&e.to_string()))
}
