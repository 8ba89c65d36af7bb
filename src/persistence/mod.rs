//! Best-score persistence
//!
//! Records are stored as stringified numbers under `"<namespace>.<game id>"`
//! in a string key-value backend (LocalStorage in the browser, a map in tests
//! and the headless runner). Storage failures never reach gameplay: they are
//! logged and the caller sees the fallback value.

#[cfg(target_arch = "wasm32")]
pub mod local_storage;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageBackend;

/// Backend failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No storage available (private mode, disabled, headless)
    Unavailable,
    Read { key: String, reason: String },
    Write { key: String, reason: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "storage unavailable"),
            StorageError::Read { key, reason } => write!(f, "failed to read {key}: {reason}"),
            StorageError::Write { key, reason } => write!(f, "failed to write {key}: {reason}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// String key-value storage
pub trait KeyValueBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Per-game best-score storage as seen by a session
pub trait ScoreStore {
    /// Stored record for `game_id`, or `fallback` when absent or unreadable
    fn load(&self, game_id: &str, fallback: f64) -> f64;
    /// Overwrite the stored record
    fn save(&self, game_id: &str, value: f64);
}

/// Parse a stored record; `None` for empty, non-numeric or non-finite text
pub fn parse_record(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// [`ScoreStore`] over any [`KeyValueBackend`]
#[derive(Debug, Clone)]
pub struct BestScoreStore<B> {
    backend: B,
    namespace: String,
}

impl<B: KeyValueBackend> BestScoreStore<B> {
    pub fn new(backend: B, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
        }
    }

    pub fn key(&self, game_id: &str) -> String {
        format!("{}.{}", self.namespace, game_id)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: KeyValueBackend> ScoreStore for BestScoreStore<B> {
    fn load(&self, game_id: &str, fallback: f64) -> f64 {
        let key = self.key(game_id);
        match self.backend.get_item(&key) {
            Ok(Some(raw)) => parse_record(&raw).unwrap_or(fallback),
            Ok(None) => fallback,
            Err(err) => {
                log::warn!("Best score unavailable: {err}");
                fallback
            }
        }
    }

    fn save(&self, game_id: &str, value: f64) {
        let key = self.key(game_id);
        match self.backend.set_item(&key, &value.to_string()) {
            Ok(()) => log::info!("Saved best {value} for {game_id}"),
            Err(err) => log::warn!("Best score not saved: {err}"),
        }
    }
}

/// In-memory backend; clones share the same map
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Backend that is never available
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl KeyValueBackend for NullBackend {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BEST_SCORE_NAMESPACE;

    fn store() -> BestScoreStore<MemoryBackend> {
        BestScoreStore::new(MemoryBackend::new(), BEST_SCORE_NAMESPACE)
    }

    #[test]
    fn test_key_format() {
        assert_eq!(store().key("snake-lite"), "onejelly.games.best.snake-lite");
    }

    #[test]
    fn test_load_missing_returns_fallback() {
        assert_eq!(store().load("dodge-dots", 0.0), 0.0);
        assert_eq!(store().load("dodge-dots", 7.5), 7.5);
    }

    #[test]
    fn test_save_then_load() {
        let store = store();
        store.save("tiny-runner", 512.0);
        assert_eq!(store.load("tiny-runner", 0.0), 512.0);
        assert_eq!(
            store.backend().get_item("onejelly.games.best.tiny-runner"),
            Ok(Some("512".to_string()))
        );

        store.save("tiny-runner", 80.0);
        assert_eq!(store.load("tiny-runner", 0.0), 80.0);
        assert_eq!(store.backend().len(), 1);
    }

    #[test]
    fn test_garbage_values_fall_back() {
        let store = store();
        for raw in ["", "   ", "abc", "NaN", "inf", "-infinity"] {
            store
                .backend()
                .set_item("onejelly.games.best.asteroid-click", raw)
                .unwrap();
            assert_eq!(store.load("asteroid-click", 3.0), 3.0, "raw {raw:?}");
        }
        store
            .backend()
            .set_item("onejelly.games.best.asteroid-click", " 241.5 ")
            .unwrap();
        assert_eq!(store.load("asteroid-click", 3.0), 241.5);
    }

    #[test]
    fn test_unavailable_backend_is_swallowed() {
        let store = BestScoreStore::new(NullBackend, "ns");
        store.save("reaction-gate", 220.0);
        assert_eq!(store.load("reaction-gate", 0.0), 0.0);
    }

    #[test]
    fn test_clones_share_storage() {
        let backend = MemoryBackend::new();
        let a = BestScoreStore::new(backend.clone(), "ns");
        let b = BestScoreStore::new(backend, "ns");
        a.save("snake-lite", 9.0);
        assert_eq!(b.load("snake-lite", 0.0), 9.0);
    }

    #[test]
    fn test_error_display() {
        let err = StorageError::Write {
            key: "k".into(),
            reason: "quota".into(),
        };
        assert_eq!(err.to_string(), "failed to write k: quota");
        assert_eq!(StorageError::Unavailable.to_string(), "storage unavailable");
    }
}
