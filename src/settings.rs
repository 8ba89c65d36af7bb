//! Arcade settings
//!
//! Persisted separately from best scores in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::BEST_SCORE_NAMESPACE;

/// Arcade-wide preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Prefix for best-score keys (`<namespace>.<game id>`)
    pub storage_namespace: String,
    /// Fixed RNG seed; `None` seeds from the clock on every (re)start
    pub seed: Option<u64>,
    /// Pause when the window loses focus. Hiding the page always pauses.
    pub pause_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_namespace: BEST_SCORE_NAMESPACE.to_string(),
            seed: None,
            pause_on_blur: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "jelly_arcade_settings";

    /// Parse stored JSON, falling back to defaults on garbage
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Ignoring stored settings: {err}");
                Self::default()
            }
        }
    }

    /// Seed for the next state: the fixed one, or `fallback`
    pub fn seed_or(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
