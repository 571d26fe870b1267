#![cfg(target_arch = "wasm32")]
use ignite_core::{CounterService, KeyValueStore, RemoteCounter, ViewerContext};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod fetch;
mod frame;
mod gizmos;
mod input;
mod overlay;
mod remote;
mod render;
mod storage;

use constants::CANVAS_ID;

fn build_counter(config: &ignite_core::ViewerConfig) -> Rc<CounterService> {
    let remote: Option<Box<dyn RemoteCounter>> = config.remote_counter().map(|r| {
        log::info!("[counter] remote endpoint {}", r.endpoint);
        Box::new(remote::RestCounter::new(r)) as Box<dyn RemoteCounter>
    });
    if remote.is_none() {
        log::info!("[counter] no remote configured, counting locally");
    }
    let store: Box<dyn KeyValueStore> = Box::new(storage::LocalStorageStore);
    Rc::new(CounterService::new(
        remote,
        store,
        config.counter.storage_key.clone(),
    ))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("ignite-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    events::wire_resize(&canvas);

    let config = dom::read_viewer_config(&document);
    let candidates = config.asset_candidates.clone();
    let counter = build_counter(&config);
    let ctx = Rc::new(RefCell::new(ViewerContext::new(
        config,
        dom::canvas_viewport(&canvas),
    )));

    // Initial counter value
    {
        let ctx = ctx.clone();
        let counter = counter.clone();
        spawn_local(async move {
            let reading = counter.read().await;
            ctx.borrow_mut().apply_counter(reading);
        });
    }

    let gpu = frame::init_gpu(&canvas).await;
    if gpu.is_none() {
        log::warn!("[gpu] rendering disabled; picking and counter still active");
    }

    events::wire_input_handlers(events::InputWiring {
        canvas: canvas.clone(),
        ctx: ctx.clone(),
        counter: counter.clone(),
        drag_state: Rc::new(RefCell::new(input::DragState::default())),
    });
    events::wire_cta(&document, ctx.clone(), counter.clone());

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        ctx: ctx.clone(),
        gpu,
        canvas: canvas.clone(),
        document: document.clone(),
        status_view: overlay::StatusView::default(),
    }));
    let frame_loop = frame::start_loop(frame_ctx);
    events::wire_page_lifecycle(ctx.clone(), frame_loop);

    // Model loads while the loop already draws grid and axes
    let loaded = {
        let ctx_events = ctx.clone();
        ignite_core::load_first(&fetch::HttpAssetSource, &candidates, move |event| {
            ctx_events.borrow_mut().on_load_event(&event);
        })
        .await
    };
    match loaded {
        Ok(asset) => {
            log::info!("[viewer] attached {}", asset.url);
            ctx.borrow_mut().attach_asset(asset);
        }
        Err(e) => ctx.borrow_mut().load_failed(&e),
    }

    Ok(())
}
