//! Browser LocalStorage backend

use wasm_bindgen::JsValue;

use super::{KeyValueBackend, StorageError};

fn describe(err: JsValue) -> String {
    err.as_string()
        .unwrap_or_else(|| format!("{err:?}"))
}

/// `window.localStorage`, looked up on every access so a storage that
/// becomes unavailable mid-session degrades to the fallback path
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageBackend;

impl LocalStorageBackend {
    fn storage(&self) -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)
    }
}

impl KeyValueBackend for LocalStorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|err| StorageError::Read {
                key: key.to_string(),
                reason: describe(err),
            })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| StorageError::Write {
                key: key.to_string(),
                reason: describe(err),
            })
    }
}
