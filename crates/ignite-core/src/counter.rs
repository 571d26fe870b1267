//! Shared "ignitions" counter: a remote service when configured, a locally
//! persisted integer otherwise, and a cooldown gate in front of both.

use crate::error::CounterError;
use fnv::FnvHashMap;
use futures::future::LocalBoxFuture;
use std::cell::RefCell;
use std::rc::Rc;

/// Client-local string storage (`localStorage` in the browser).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), CounterError>;
}

/// In-memory store, used natively and in tests.
#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<FnvHashMap<String, String>>,
}

impl MemoryStore {
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .values
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CounterError> {
        self.values
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CounterError> {
        (**self).set(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CounterError> {
        (**self).set(key, value)
    }
}

/// Remote counter backend.
pub trait RemoteCounter {
    fn read(&self) -> LocalBoxFuture<'_, Result<u64, CounterError>>;
    fn increment(&self) -> LocalBoxFuture<'_, Result<u64, CounterError>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterSource {
    Remote,
    Local,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterReading {
    pub value: u64,
    pub source: CounterSource,
}

impl CounterReading {
    /// Text for the counter label, e.g. `"6"` or `"6 (local)"`.
    pub fn label(&self) -> String {
        match self.source {
            CounterSource::Remote => self.value.to_string(),
            CounterSource::Local => format!("{} (local)", self.value),
        }
    }
}

/// Extract the counter value from a REST response body.
///
/// Accepts a bare number (RPC result), an object with a `value` field, or a
/// one-row array of such objects (table select).
pub fn parse_counter_value(body: &str) -> Result<u64, CounterError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| CounterError::Response(e.to_string()))?;
    let value = match &json {
        serde_json::Value::Array(rows) => rows.first().and_then(|row| row.get("value")),
        serde_json::Value::Object(_) => json.get("value"),
        _ => Some(&json),
    };
    value
        .and_then(|v| v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
        .ok_or_else(|| CounterError::Response(body.chars().take(64).collect()))
}

/// Integer counter persisted under one key of a [`KeyValueStore`].
pub struct LocalCounter<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> LocalCounter<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Stored value; missing or unparsable values read as zero.
    pub fn read(&self) -> u64 {
        match self.store.get(&self.key) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("[counter] ignoring unparsable local value {:?}", raw);
                0
            }),
            None => 0,
        }
    }

    pub fn increment(&self) -> Result<u64, CounterError> {
        let next = self.read().saturating_add(1);
        self.store.set(&self.key, &next.to_string())?;
        Ok(next)
    }
}

/// Remote-first counter with local fallback.
///
/// Any remote failure is logged and handled exactly as if no remote were
/// configured.
pub struct CounterService {
    remote: Option<Box<dyn RemoteCounter>>,
    local: LocalCounter<Box<dyn KeyValueStore>>,
}

impl CounterService {
    pub fn new(
        remote: Option<Box<dyn RemoteCounter>>,
        store: Box<dyn KeyValueStore>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            remote,
            local: LocalCounter::new(store, key),
        }
    }

    pub fn local_only(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self::new(None, store, key)
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub async fn read(&self) -> CounterReading {
        if let Some(remote) = &self.remote {
            match remote.read().await {
                Ok(value) => {
                    return CounterReading {
                        value,
                        source: CounterSource::Remote,
                    }
                }
                Err(e) => log::warn!("[counter] remote read failed, using local: {}", e),
            }
        }
        CounterReading {
            value: self.local.read(),
            source: CounterSource::Local,
        }
    }

    pub async fn increment(&self) -> CounterReading {
        if let Some(remote) = &self.remote {
            match remote.increment().await {
                Ok(value) => {
                    return CounterReading {
                        value,
                        source: CounterSource::Remote,
                    }
                }
                Err(e) => log::warn!("[counter] remote increment failed, using local: {}", e),
            }
        }
        let value = self.local.increment().unwrap_or_else(|e| {
            log::warn!("[counter] local increment not persisted: {}", e);
            self.local.read().saturating_add(1)
        });
        CounterReading {
            value,
            source: CounterSource::Local,
        }
    }
}

/// Rejection from [`Cooldown::try_accept`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CooldownActive {
    pub remaining_ms: f64,
}

/// Minimum spacing between accepted increments.
#[derive(Clone, Debug)]
pub struct Cooldown {
    window_ms: f64,
    last_accepted_ms: Option<f64>,
}

impl Cooldown {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            last_accepted_ms: None,
        }
    }

    pub fn window_ms(&self) -> f64 {
        self.window_ms
    }

    /// Accept and record `now_ms` unless the previous acceptance is still
    /// within the window.
    pub fn try_accept(&mut self, now_ms: f64) -> Result<(), CooldownActive> {
        if let Some(last) = self.last_accepted_ms {
            let elapsed = now_ms - last;
            if elapsed < self.window_ms {
                return Err(CooldownActive {
                    remaining_ms: self.window_ms - elapsed,
                });
            }
        }
        self.last_accepted_ms = Some(now_ms);
        Ok(())
    }
}
