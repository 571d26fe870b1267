use crate::input::{self, DragState};
use ignite_core::{CounterService, PointerOutcome, ViewerContext};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub ctx: Rc<RefCell<ViewerContext>>,
    pub counter: Rc<CounterService>,
    pub drag_state: Rc<RefCell<DragState>>,
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointerdown(&w);
    wire_pointermove(&w);
    wire_pointerup(&w);
    wire_wheel(&w);
}

fn wire_pointerdown(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let pos = input::pointer_canvas_css(&ev, &w.canvas);
        let now_ms = instant::now();
        // primary button only; others just orbit
        if ev.button() == 0 && !ev.shift_key() {
            let outcome = w.ctx.borrow_mut().pointer_down(pos, now_ms);
            match outcome {
                PointerOutcome::Ignited { increment, .. } => {
                    if increment {
                        crate::events::spawn_counter_increment(w.ctx.clone(), w.counter.clone());
                    }
                }
                PointerOutcome::Missed => log::debug!("[click] no surface under pointer"),
                PointerOutcome::NotReady => log::debug!("[click] model not loaded yet"),
            }
        }

        {
            let mut ds = w.drag_state.borrow_mut();
            ds.active = true;
            ds.pointer_id = ev.pointer_id();
            ds.last = pos;
            ds.pan = ev.shift_key() || ev.button() == 2;
        }
        _ = w.canvas.set_pointer_capture(ev.pointer_id());
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let pos = input::pointer_canvas_css(&ev, &w.canvas);
        let (delta, pan) = {
            let mut ds = w.drag_state.borrow_mut();
            if !ds.active || ds.pointer_id != ev.pointer_id() {
                return;
            }
            let delta = pos - ds.last;
            ds.last = pos;
            (delta, ds.pan)
        };
        let mut ctx = w.ctx.borrow_mut();
        if pan {
            ctx.orbit_pan(delta);
        } else {
            ctx.orbit_rotate(delta);
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerup(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let mut ds = w.drag_state.borrow_mut();
        if ds.active && ds.pointer_id == ev.pointer_id() {
            ds.active = false;
            _ = w.canvas.release_pointer_capture(ev.pointer_id());
        }
    }) as Box<dyn FnMut(_)>);
    for kind in ["pointerup", "pointercancel"] {
        _ = canvas_for_listener
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_wheel(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::WheelEvent| {
        w.ctx.borrow_mut().orbit_zoom(ev.delta_y() as f32);
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
    closure.forget();
}
