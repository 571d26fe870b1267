//! `fetch`-backed asset source.

use futures::future::{FutureExt, LocalBoxFuture};
use ignite_core::{AssetSource, LoadError};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

pub struct HttpAssetSource;

impl AssetSource for HttpAssetSource {
    fn fetch(&self, url: &str) -> LocalBoxFuture<'_, Result<Vec<u8>, LoadError>> {
        let url = url.to_owned();
        async move {
            fetch_bytes(&url)
                .await
                .map_err(|reason| LoadError::Fetch { url, reason })
        }
        .boxed_local()
    }
}

pub(crate) fn js_err(e: wasm_bindgen::JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, String> {
    let window = web::window().ok_or_else(|| String::from("no window"))?;
    let resp: web::Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }
    let buf = JsFuture::from(resp.array_buffer().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}
