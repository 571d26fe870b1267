//! Remote counter over a PostgREST-style HTTP API (e.g. Supabase).
//!
//! Reads select the row's `value`; increments call an RPC that bumps the
//! counter atomically server-side and returns the new value.

use crate::fetch::js_err;
use futures::future::{FutureExt, LocalBoxFuture};
use ignite_core::{parse_counter_value, CounterError, RemoteCounter, RemoteCounterConfig};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

pub struct RestCounter {
    endpoint: String,
    api_key: String,
    counter_id: String,
}

impl RestCounter {
    pub fn new(config: &RemoteCounterConfig) -> Self {
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            counter_id: config.counter_id.clone(),
        }
    }

    fn read_url(&self) -> String {
        format!(
            "{}/rest/v1/counters?id=eq.{}&select=value",
            self.endpoint,
            String::from(js_sys::encode_uri_component(&self.counter_id))
        )
    }

    fn increment_url(&self) -> String {
        format!("{}/rest/v1/rpc/increment_counter", self.endpoint)
    }

    async fn request(&self, method: &str, url: &str, body: Option<String>) -> Result<u64, CounterError> {
        let headers = web::Headers::new().map_err(|e| CounterError::Request(js_err(e)))?;
        for (name, value) in [
            ("apikey", self.api_key.clone()),
            ("Authorization", format!("Bearer {}", self.api_key)),
            ("Content-Type", String::from("application/json")),
        ] {
            headers
                .set(name, &value)
                .map_err(|e| CounterError::Request(js_err(e)))?;
        }
        let init = web::RequestInit::new();
        init.set_method(method);
        init.set_mode(web::RequestMode::Cors);
        init.set_headers(&headers);
        if let Some(body) = body {
            init.set_body(&JsValue::from_str(&body));
        }
        let request = web::Request::new_with_str_and_init(url, &init)
            .map_err(|e| CounterError::Request(js_err(e)))?;

        let window = web::window().ok_or_else(|| CounterError::Request(String::from("no window")))?;
        let resp: web::Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| CounterError::Request(js_err(e)))?
            .dyn_into()
            .map_err(|e| CounterError::Request(js_err(e)))?;
        if !resp.ok() {
            return Err(CounterError::Status(resp.status()));
        }
        let text = JsFuture::from(resp.text().map_err(|e| CounterError::Response(js_err(e)))?)
            .await
            .map_err(|e| CounterError::Response(js_err(e)))?;
        let text = text.as_string().unwrap_or_default();
        parse_counter_value(&text)
    }
}

impl RemoteCounter for RestCounter {
    fn read(&self) -> LocalBoxFuture<'_, Result<u64, CounterError>> {
        async move {
            let url = self.read_url();
            self.request("GET", &url, None).await
        }
        .boxed_local()
    }

    fn increment(&self) -> LocalBoxFuture<'_, Result<u64, CounterError>> {
        async move {
            let url = self.increment_url();
            let body = serde_json::json!({ "counter_id": self.counter_id }).to_string();
            self.request("POST", &url, Some(body)).await
        }
        .boxed_local()
    }
}
