use crate::constants::CTA_ID;
use crate::dom;
use crate::frame::LoopHandle;
use ignite_core::{CounterService, ViewerContext};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// The call-to-action button ignites without needing a hit on the model.
pub fn wire_cta(
    document: &web::Document,
    ctx: Rc<RefCell<ViewerContext>>,
    counter: Rc<CounterService>,
) {
    dom::add_click_listener(document, CTA_ID, move || {
        let outcome = ctx.borrow_mut().ignite_fallback(instant::now());
        match outcome {
            Some(o) => {
                log::info!(
                    "[cta] ignite at ({:.3},{:.3},{:.3}) {:?}",
                    o.point.x,
                    o.point.y,
                    o.point.z,
                    o.effect
                );
                if o.increment {
                    crate::events::spawn_counter_increment(ctx.clone(), counter.clone());
                }
            }
            None => log::info!("[cta] model not loaded yet"),
        }
    });
}

/// Keep the canvas backing store matched to its CSS size.
pub fn wire_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

/// Stop rendering and put materials back when the page goes away.
pub fn wire_page_lifecycle(ctx: Rc<RefCell<ViewerContext>>, frame_loop: LoopHandle) {
    let closure = Closure::wrap(Box::new(move || {
        log::info!("[viewer] pagehide, shutting down");
        frame_loop.stop();
        ctx.borrow_mut().shutdown();
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
