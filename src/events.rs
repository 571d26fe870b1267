mod page;
mod pointer;

pub use page::{wire_cta, wire_page_lifecycle, wire_resize};
pub use pointer::{wire_input_handlers, InputWiring};

use ignite_core::{CounterService, ViewerContext};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;

/// Run a counter increment in the background and publish the result.
pub(crate) fn spawn_counter_increment(
    ctx: Rc<RefCell<ViewerContext>>,
    counter: Rc<CounterService>,
) {
    spawn_local(async move {
        let reading = counter.increment().await;
        log::info!("[counter] now {}", reading.label());
        ctx.borrow_mut().apply_counter(reading);
    });
}
