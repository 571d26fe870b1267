//! Runtime viewer configuration.
//!
//! Every field has a default taken from `constants.rs`, so an empty JSON
//! object (or no config at all) yields the stock viewer.

use crate::constants::{COMPANION_NODE_NAME, COUNTER_COOLDOWN_MS, COUNTER_STORAGE_KEY};
use crate::effect::{EffectParams, TriggerPolicy};
use crate::error::ConfigError;
use crate::framing::FramingParams;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Model URLs in priority order.
    pub asset_candidates: Vec<String>,
    pub framing: FramingParams,
    pub effect: EffectParams,
    pub trigger_policy: TriggerPolicy,
    /// Exact name of a pre-authored node shown while the effect runs.
    pub companion_node: Option<String>,
    pub counter: CounterConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            asset_candidates: vec![
                String::from("./assets/casita-draco.glb"),
                String::from("./assets/casita-file.glb"),
            ],
            framing: FramingParams::default(),
            effect: EffectParams::default(),
            trigger_policy: TriggerPolicy::default(),
            companion_node: Some(String::from(COMPANION_NODE_NAME)),
            counter: CounterConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Local fallback storage key.
    pub storage_key: String,
    pub cooldown_ms: f64,
    /// Count ignitions from clicks on the model, not only the button.
    pub increment_on_pick: bool,
    /// Remote service; absent disables it.
    pub remote: Option<RemoteCounterConfig>,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            storage_key: String::from(COUNTER_STORAGE_KEY),
            cooldown_ms: COUNTER_COOLDOWN_MS,
            increment_on_pick: true,
            remote: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoteCounterConfig {
    /// Base URL, e.g. `https://xyz.supabase.co`.
    pub endpoint: String,
    pub api_key: String,
    pub counter_id: String,
}

impl RemoteCounterConfig {
    /// Credentials are usable only when all fields are filled in.
    pub fn is_configured(&self) -> bool {
        !self.endpoint.trim().is_empty()
            && !self.api_key.trim().is_empty()
            && !self.counter_id.trim().is_empty()
    }
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.asset_candidates.is_empty() {
            return Err(ConfigError::Invalid(String::from(
                "asset_candidates must not be empty",
            )));
        }
        if !(self.framing.fill_ratio > 0.0 && self.framing.fill_ratio.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "framing.fill_ratio must be positive, got {}",
                self.framing.fill_ratio
            )));
        }
        if !(self.effect.life_ms > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "effect.life_ms must be positive, got {}",
                self.effect.life_ms
            )));
        }
        if self.counter.cooldown_ms < 0.0 {
            return Err(ConfigError::Invalid(String::from(
                "counter.cooldown_ms must not be negative",
            )));
        }
        Ok(())
    }

    /// Remote settings if they are complete.
    pub fn remote_counter(&self) -> Option<&RemoteCounterConfig> {
        self.counter.remote.as_ref().filter(|r| r.is_configured())
    }
}
