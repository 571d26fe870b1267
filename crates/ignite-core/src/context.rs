//! `ViewerContext`: the single owner of camera, loaded asset, effect and
//! status state. The web shell holds one behind `Rc<RefCell<_>>` and feeds
//! it load results, pointer events and frame ticks.

use crate::bounds::Aabb;
use crate::camera::Camera;
use crate::config::ViewerConfig;
use crate::constants::TOAST_DURATION_MS;
use crate::counter::{Cooldown, CounterReading};
use crate::effect::{EffectPhase, EffectPlayer, TriggerOutcome};
use crate::error::LoadError;
use crate::framing::{self, Framing};
use crate::loader::{LoadEvent, LoadedAsset};
use crate::orbit::OrbitController;
use crate::pick::{self, Hit, Viewport};
use crate::scene::{Asset, NodeId};
use crate::status::{LoadStatus, StatusBoard};
use glam::{Vec2, Vec3};

/// Result of a pointer-down on the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerOutcome {
    /// No asset loaded yet.
    NotReady,
    /// The ray missed every surface.
    Missed,
    Ignited {
        hit: Hit,
        effect: TriggerOutcome,
        /// The caller should run a counter increment.
        increment: bool,
    },
}

/// Result of the fallback (button) trigger.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FallbackOutcome {
    pub point: Vec3,
    pub effect: TriggerOutcome,
    pub increment: bool,
}

pub struct ViewerContext {
    config: ViewerConfig,
    camera: Camera,
    orbit: OrbitController,
    viewport: Viewport,
    asset: Option<Asset>,
    asset_url: Option<String>,
    asset_generation: u64,
    framing: Option<Framing>,
    companion: Option<NodeId>,
    effect: EffectPlayer,
    cooldown: Cooldown,
    status: StatusBoard,
}

impl ViewerContext {
    pub fn new(config: ViewerConfig, viewport: Viewport) -> Self {
        let camera = Camera::with_aspect(viewport.aspect());
        let orbit = OrbitController::from_camera(&camera);
        let effect = EffectPlayer::new(config.effect.clone(), config.trigger_policy);
        let cooldown = Cooldown::new(config.counter.cooldown_ms);
        Self {
            config,
            camera,
            orbit,
            viewport,
            asset: None,
            asset_url: None,
            asset_generation: 0,
            framing: None,
            companion: None,
            effect,
            cooldown,
            status: StatusBoard::default(),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn asset(&self) -> Option<&Asset> {
        self.asset.as_ref()
    }

    pub fn asset_url(&self) -> Option<&str> {
        self.asset_url.as_deref()
    }

    /// Bumped every time a new asset is attached; renderers compare it to
    /// decide when to re-upload geometry.
    pub fn asset_generation(&self) -> u64 {
        self.asset_generation
    }

    pub fn framing(&self) -> Option<&Framing> {
        self.framing.as_ref()
    }

    /// Post-framing bounds for the helper box.
    pub fn framed_bounds(&self) -> Option<Aabb> {
        self.framing.map(|f| f.bounds)
    }

    pub fn effect(&self) -> &EffectPlayer {
        &self.effect
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
    }

    /// Mirror loader progress onto the status board.
    pub fn on_load_event(&mut self, event: &LoadEvent<'_>) {
        match event {
            LoadEvent::Attempt { url, index, total } => {
                self.status.set_load(LoadStatus::Loading {
                    url: (*url).to_owned(),
                    attempt: *index,
                    total: *total,
                });
            }
            LoadEvent::Failed { .. } => {}
            LoadEvent::Loaded { url } => {
                self.status.set_load(LoadStatus::Loaded {
                    url: (*url).to_owned(),
                });
            }
        }
    }

    /// Attach a freshly loaded asset: frame it, resolve the companion node
    /// and reset the orbit controller to the framed camera.
    pub fn attach_asset(&mut self, loaded: LoadedAsset) {
        let LoadedAsset { url, mut asset } = loaded;
        self.framing = framing::frame(&mut asset, &mut self.camera, &self.config.framing);
        self.orbit.sync_from_camera(&self.camera);

        self.companion = None;
        if let Some(name) = self.config.companion_node.as_deref() {
            match asset.find_node(name) {
                Some(node) => {
                    asset.set_subtree_visible(node, false);
                    self.companion = Some(node);
                }
                None => {
                    log::warn!("[viewer] companion node {:?} not found", name);
                    self.status.warn(format!("no \"{}\" node", name));
                }
            }
        }
        self.effect.set_companion(self.companion);

        self.status.set_load(LoadStatus::Loaded { url: url.clone() });
        self.asset = Some(asset);
        self.asset_url = Some(url);
        self.asset_generation += 1;
    }

    pub fn load_failed(&mut self, error: &LoadError) {
        let tried = match error {
            LoadError::Exhausted { tried } => tried.clone(),
            _ => self.config.asset_candidates.clone(),
        };
        log::error!("[viewer] model unavailable: {}", error);
        self.status.set_load(LoadStatus::Failed { tried });
    }

    /// Pick under the pointer and ignite on a hit.
    pub fn pointer_down(&mut self, pointer: Vec2, now_ms: f64) -> PointerOutcome {
        let Some(asset) = self.asset.as_mut() else {
            return PointerOutcome::NotReady;
        };
        let Some(hit) = pick::pick(pointer, self.viewport, &self.camera, asset) else {
            return PointerOutcome::Missed;
        };
        let effect = self.effect.trigger(now_ms, hit.point, hit.material, asset);
        log::info!(
            "[click] ignite at ({:.3},{:.3},{:.3}) {:?}",
            hit.point.x,
            hit.point.y,
            hit.point.z,
            effect
        );
        let increment = effect != TriggerOutcome::Ignored
            && self.config.counter.increment_on_pick
            && self.gate_increment(now_ms);
        PointerOutcome::Ignited {
            hit,
            effect,
            increment,
        }
    }

    /// Where the button-driven ignite lands: the companion node if present,
    /// otherwise the top centre of the framed bounds.
    pub fn fallback_point(&self) -> Vec3 {
        if let (Some(asset), Some(node)) = (self.asset.as_ref(), self.companion) {
            return asset.node_position(node);
        }
        match self.framed_bounds() {
            Some(b) => Vec3::new(b.center().x, b.max.y, b.center().z),
            None => Vec3::ZERO,
        }
    }

    /// Ignite without a pick, from the call-to-action button.
    pub fn ignite_fallback(&mut self, now_ms: f64) -> Option<FallbackOutcome> {
        let point = self.fallback_point();
        let asset = self.asset.as_mut()?;
        let effect = self.effect.trigger(now_ms, point, None, asset);
        let increment = effect != TriggerOutcome::Ignored && self.gate_increment(now_ms);
        Some(FallbackOutcome {
            point,
            effect,
            increment,
        })
    }

    /// Cooldown check for an increment; a rejection raises a toast.
    pub fn gate_increment(&mut self, now_ms: f64) -> bool {
        match self.cooldown.try_accept(now_ms) {
            Ok(()) => true,
            Err(active) => {
                let secs = (active.remaining_ms / 1000.0).ceil().max(1.0);
                log::info!("[counter] cooldown active, {:.0}s left", secs);
                self.status.show_toast(
                    format!("Easy there, try again in {:.0}s", secs),
                    now_ms,
                    TOAST_DURATION_MS,
                );
                false
            }
        }
    }

    pub fn apply_counter(&mut self, reading: CounterReading) {
        self.status.set_counter(reading);
    }

    pub fn orbit_rotate(&mut self, delta: Vec2) {
        self.orbit.rotate(delta, self.viewport);
    }

    pub fn orbit_pan(&mut self, delta: Vec2) {
        self.orbit.pan(delta, self.viewport, &self.camera);
    }

    pub fn orbit_zoom(&mut self, delta_y: f32) {
        self.orbit.zoom(delta_y);
    }

    /// Advance everything time-driven by one frame.
    pub fn tick(&mut self, now_ms: f64) -> EffectPhase {
        self.orbit.update(&mut self.camera);
        self.status.expire_toast(now_ms);
        match self.asset.as_mut() {
            Some(asset) => self.effect.update(now_ms, asset),
            None => EffectPhase::Idle,
        }
    }

    /// Teardown: stop any running effect so materials end in their
    /// original state.
    pub fn shutdown(&mut self) {
        if let Some(asset) = self.asset.as_mut() {
            self.effect.cancel(asset);
        }
    }
}
