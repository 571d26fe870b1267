use crate::constants::{CONFIG_SCRIPT_ID, MAX_PIXEL_RATIO};
use ignite_core::{Viewport, ViewerConfig};
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    } else {
        log::warn!("[dom] missing #{}", element_id);
    }
}

/// Match the canvas backing store to its CSS size, capping the pixel ratio.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio().min(MAX_PIXEL_RATIO);
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Viewport in CSS pixels, the space pointer events are reported in.
pub fn canvas_viewport(canvas: &web::HtmlCanvasElement) -> Viewport {
    let rect = canvas.get_bounding_client_rect();
    Viewport::new(rect.width().max(1.0) as f32, rect.height().max(1.0) as f32)
}

pub fn set_text(document: &web::Document, element_id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(element_id) {
        el.set_text_content(Some(text));
    }
}

/// Runtime config from the inline JSON script tag; defaults when absent or
/// invalid.
pub fn read_viewer_config(document: &web::Document) -> ViewerConfig {
    let Some(json) = document
        .get_element_by_id(CONFIG_SCRIPT_ID)
        .and_then(|el| el.text_content())
    else {
        log::info!("[config] no #{} element, using defaults", CONFIG_SCRIPT_ID);
        return ViewerConfig::default();
    };
    if json.trim().is_empty() {
        return ViewerConfig::default();
    }
    match ViewerConfig::from_json(&json) {
        Ok(config) => config,
        Err(e) => {
            log::error!("[config] {}; using defaults", e);
            ViewerConfig::default()
        }
    }
}
