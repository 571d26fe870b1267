use crate::dom;
use crate::overlay::StatusView;
use crate::render;
use ignite_core::ViewerContext;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub ctx: Rc<RefCell<ViewerContext>>,
    pub gpu: Option<render::GpuState<'a>>,
    pub canvas: web::HtmlCanvasElement,
    pub document: web::Document,
    pub status_view: StatusView,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now_ms = instant::now();
        let viewport = dom::canvas_viewport(&self.canvas);

        let mut ctx = self.ctx.borrow_mut();
        if ctx.viewport() != viewport {
            ctx.set_viewport(viewport);
        }
        ctx.tick(now_ms);

        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(self.canvas.width(), self.canvas.height());
            match g.render(&ctx) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    log::warn!("[gpu] surface lost, reconfiguring");
                    g.reconfigure();
                }
                Err(e) => log::error!("render error: {:?}", e),
            }
        }

        self.status_view.sync(&self.document, ctx.status(), now_ms);
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

/// Handle to a running animation loop.
#[derive(Clone)]
pub struct LoopHandle {
    running: Rc<Cell<bool>>,
    raf_id: Rc<Cell<Option<i32>>>,
    frame_ctx: Rc<RefCell<FrameContext<'static>>>,
}

impl LoopHandle {
    /// Cancel the pending frame and release the GPU surface.
    pub fn stop(&self) {
        self.running.set(false);
        if let (Some(id), Some(w)) = (self.raf_id.take(), web::window()) {
            _ = w.cancel_animation_frame(id);
        }
        if let Ok(mut fc) = self.frame_ctx.try_borrow_mut() {
            fc.gpu = None;
        }
    }
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>, raf_id: &Cell<Option<i32>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        raf_id.set(w.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) -> LoopHandle {
    let handle = LoopHandle {
        running: Rc::new(Cell::new(true)),
        raf_id: Rc::new(Cell::new(None)),
        frame_ctx: frame_ctx.clone(),
    };
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let handle_tick = handle.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !handle_tick.running.get() {
            return;
        }
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone, &handle_tick.raf_id);
    }) as Box<dyn FnMut()>));
    request_frame(&tick, &handle.raf_id);
    handle
}
