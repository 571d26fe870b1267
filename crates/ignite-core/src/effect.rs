//! The ignite effect: a flame marker and a match light placed at a point,
//! animated for a fixed lifetime, optionally highlighting the clicked
//! surface's material.
//!
//! A single marker and light exist, so at most one instance is live. What
//! happens when a trigger arrives mid-flight is chosen by [`TriggerPolicy`].
//! Whatever the policy, a highlighted material is always restored to the
//! exact emissive colour and intensity it had before that instance began.

use crate::constants::{
    rgb_hex, EFFECT_LIFE_MS, FLAME_BASE_SCALE, FLAME_PULSE_AMPLITUDE, FLAME_PULSE_RATE,
    HIGHLIGHT_EMISSIVE_COLOR, HIGHLIGHT_EMISSIVE_INTENSITY, MATCH_LIGHT_COLOR, MATCH_LIGHT_DECAY,
    MATCH_LIGHT_FLOOR, MATCH_LIGHT_INTENSITY, MATCH_LIGHT_RANGE,
};
use crate::scene::{Asset, MaterialId, NodeId};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerPolicy {
    /// Restore the running instance and start over at the new point.
    #[default]
    Restart,
    /// Ignore triggers until the running instance completes.
    Debounce,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectParams {
    pub life_ms: f64,
    pub highlight_intensity: f32,
    pub highlight_color: Vec3,
    pub marker_scale: Vec2,
    pub pulse_amplitude: f32,
    pub pulse_rate: f64,
    pub light_color: Vec3,
    pub light_intensity: f32,
    /// Fraction of `light_intensity` left when the effect ends.
    pub light_floor: f32,
    pub light_range: f32,
    pub light_decay: f32,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            life_ms: EFFECT_LIFE_MS,
            highlight_intensity: HIGHLIGHT_EMISSIVE_INTENSITY,
            highlight_color: rgb_hex(HIGHLIGHT_EMISSIVE_COLOR),
            marker_scale: FLAME_BASE_SCALE,
            pulse_amplitude: FLAME_PULSE_AMPLITUDE,
            pulse_rate: FLAME_PULSE_RATE,
            light_color: rgb_hex(MATCH_LIGHT_COLOR),
            light_intensity: MATCH_LIGHT_INTENSITY,
            light_floor: MATCH_LIGHT_FLOOR,
            light_range: MATCH_LIGHT_RANGE,
            light_decay: MATCH_LIGHT_DECAY,
        }
    }
}

/// Billboard sprite marking the ignition point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    pub position: Vec3,
    pub scale: Vec2,
    pub visible: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub range: f32,
    pub decay: f32,
    pub visible: bool,
}

/// Snapshot taken before a material is highlighted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HighlightRecord {
    pub material: MaterialId,
    pub previous_color: Vec3,
    pub previous_intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectInstance {
    pub start_ms: f64,
    pub point: Vec3,
    pub highlight: Option<HighlightRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectState {
    Idle,
    Active(EffectInstance),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerOutcome {
    Started,
    Restarted,
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectPhase {
    Idle,
    Running { progress: f32 },
    Finished,
}

pub struct EffectPlayer {
    params: EffectParams,
    policy: TriggerPolicy,
    state: EffectState,
    marker: Marker,
    light: PointLight,
    companion: Option<NodeId>,
}

impl EffectPlayer {
    pub fn new(params: EffectParams, policy: TriggerPolicy) -> Self {
        let marker = Marker {
            position: Vec3::ZERO,
            scale: params.marker_scale,
            visible: false,
        };
        let light = PointLight {
            position: Vec3::ZERO,
            color: params.light_color,
            intensity: params.light_intensity,
            range: params.light_range,
            decay: params.light_decay,
            visible: false,
        };
        Self {
            params,
            policy,
            state: EffectState::Idle,
            marker,
            light,
            companion: None,
        }
    }

    /// Node shown alongside the marker while an instance is running.
    pub fn set_companion(&mut self, companion: Option<NodeId>) {
        self.companion = companion;
    }

    pub fn params(&self) -> &EffectParams {
        &self.params
    }

    pub fn policy(&self) -> TriggerPolicy {
        self.policy
    }

    pub fn state(&self) -> &EffectState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, EffectState::Active(_))
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    pub fn light(&self) -> &PointLight {
        &self.light
    }

    /// Start an instance at `point`, highlighting `material` if it is lit.
    pub fn trigger(
        &mut self,
        now_ms: f64,
        point: Vec3,
        material: Option<MaterialId>,
        asset: &mut Asset,
    ) -> TriggerOutcome {
        let outcome = match (&self.state, self.policy) {
            (EffectState::Active(_), TriggerPolicy::Debounce) => return TriggerOutcome::Ignored,
            (EffectState::Active(_), TriggerPolicy::Restart) => {
                self.restore(asset);
                TriggerOutcome::Restarted
            }
            (EffectState::Idle, _) => TriggerOutcome::Started,
        };

        self.marker.position = point;
        self.marker.scale = self.params.marker_scale;
        self.marker.visible = true;
        self.light.position = point;
        self.light.intensity = self.params.light_intensity;
        self.light.visible = true;
        if let Some(companion) = self.companion {
            asset.set_subtree_visible(companion, true);
        }

        let highlight = material.and_then(|id| {
            let emissive = asset.material_mut(id)?.emissive_mut()?;
            let record = HighlightRecord {
                material: id,
                previous_color: *emissive.color,
                previous_intensity: *emissive.intensity,
            };
            *emissive.color = self.params.highlight_color;
            *emissive.intensity = self.params.highlight_intensity;
            Some(record)
        });

        self.state = EffectState::Active(EffectInstance {
            start_ms: now_ms,
            point,
            highlight,
        });
        log::debug!(
            "[effect] {:?} at ({:.3},{:.3},{:.3}) highlight={}",
            outcome,
            point.x,
            point.y,
            point.z,
            highlight.is_some()
        );
        outcome
    }

    /// Advance the running instance to `now_ms`.
    pub fn update(&mut self, now_ms: f64, asset: &mut Asset) -> EffectPhase {
        let EffectState::Active(instance) = self.state else {
            return EffectPhase::Idle;
        };
        let k = progress(now_ms, instance.start_ms, self.params.life_ms);

        let pulse = 1.0 + self.params.pulse_amplitude * (now_ms * self.params.pulse_rate).sin() as f32;
        self.marker.scale = self.params.marker_scale * pulse;
        let decay = 1.0 - k * (1.0 - self.params.light_floor);
        self.light.intensity = self.params.light_intensity * decay;

        if k >= 1.0 {
            self.restore(asset);
            return EffectPhase::Finished;
        }
        EffectPhase::Running { progress: k }
    }

    /// Stop immediately, restoring any highlighted material.
    pub fn cancel(&mut self, asset: &mut Asset) {
        if self.is_active() {
            self.restore(asset);
        }
    }

    fn restore(&mut self, asset: &mut Asset) {
        if let EffectState::Active(instance) = self.state {
            if let Some(record) = instance.highlight {
                if let Some(emissive) = asset
                    .material_mut(record.material)
                    .and_then(|m| m.emissive_mut())
                {
                    *emissive.color = record.previous_color;
                    *emissive.intensity = record.previous_intensity;
                }
            }
        }
        self.marker.visible = false;
        self.light.visible = false;
        if let Some(companion) = self.companion {
            asset.set_subtree_visible(companion, false);
        }
        self.state = EffectState::Idle;
    }
}

/// Normalised elapsed time, clamped to `[0, 1]`.
#[inline]
pub fn progress(now_ms: f64, start_ms: f64, life_ms: f64) -> f32 {
    if life_ms <= 0.0 {
        return 1.0;
    }
    ((now_ms - start_ms) / life_ms).clamp(0.0, 1.0) as f32
}
