use crate::constants::{COUNTER_ID, STATUS_ID, TOAST_ID};
use crate::dom;
use ignite_core::StatusBoard;
use web_sys as web;

#[inline]
fn show(document: &web::Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        _ = el.class_list().remove_1("hidden");
        // fallback for environments without CSS class
        _ = el.set_attribute("style", "");
    }
}

#[inline]
fn hide(document: &web::Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        _ = el.class_list().add_1("hidden");
        // fallback
        _ = el.set_attribute("style", "display:none");
    }
}

/// Mirrors the status board into the page, touching the DOM only when a
/// label actually changes.
#[derive(Default)]
pub struct StatusView {
    status: Option<String>,
    counter: Option<String>,
    toast: Option<Option<String>>,
}

impl StatusView {
    pub fn sync(&mut self, document: &web::Document, board: &StatusBoard, now_ms: f64) {
        let status = board.status_text();
        if self.status.as_deref() != Some(status.as_str()) {
            dom::set_text(document, STATUS_ID, &status);
            self.status = Some(status);
        }

        let counter = board.counter_text();
        if self.counter.as_deref() != Some(counter.as_str()) {
            dom::set_text(document, COUNTER_ID, &counter);
            self.counter = Some(counter);
        }

        let toast = board.active_toast(now_ms).map(str::to_owned);
        if self.toast.as_ref() != Some(&toast) {
            match &toast {
                Some(message) => {
                    dom::set_text(document, TOAST_ID, message);
                    show(document, TOAST_ID);
                }
                None => hide(document, TOAST_ID),
            }
            self.toast = Some(toast);
        }
    }
}
