use ignite_core::{CounterError, KeyValueStore};
use web_sys as web;

/// `window.localStorage`, re-acquired on every access.
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Option<web::Storage> {
        web::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().and_then(|s| s.get_item(key).ok().flatten())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CounterError> {
        let storage =
            Self::storage().ok_or_else(|| CounterError::Storage(String::from("unavailable")))?;
        storage
            .set_item(key, value)
            .map_err(|e| CounterError::Storage(format!("{:?}", e)))
    }
}
