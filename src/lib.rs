//! Jelly Arcade - simulation core for five canvas mini-games
//!
//! Core modules:
//! - `sim`: Deterministic engines (state, transitions, collisions)
//! - `renderer`: 2D drawing surface abstraction and per-game scenes
//! - `session`: Generic frame-paced session controller
//! - `input`: Key and pointer normalization
//! - `platform`: Frame scheduling and browser glue
//! - `persistence`: Best-score storage over a key-value backend

pub mod highscores;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::RecordOrder;
pub use session::{Session, SessionStatus};
pub use settings::Settings;

/// Engine-wide constants
pub mod consts {
    /// Largest simulated delta a single step may advance (ms)
    pub const MAX_FRAME_DELTA_MS: f32 = 40.0;
    /// Narrowest playfield the session will build, whatever the container says
    pub const MIN_PLAYFIELD_WIDTH: f32 = 240.0;
    /// Default key prefix for persisted best scores
    pub const BEST_SCORE_NAMESPACE: &str = "onejelly.games.best";
}

/// Clamp a raw frame delta to the simulation's allowed range.
///
/// Negative, NaN and infinite deltas collapse to zero; everything else is
/// capped at [`consts::MAX_FRAME_DELTA_MS`].
#[inline]
pub fn clamp_delta(delta_ms: f32) -> f32 {
    if !delta_ms.is_finite() || delta_ms <= 0.0 {
        return 0.0;
    }
    delta_ms.min(consts::MAX_FRAME_DELTA_MS)
}

/// Delta between two monotonic timestamps, clamped for the simulation
#[inline]
pub fn frame_delta(previous_ms: f64, now_ms: f64) -> f32 {
    clamp_delta((now_ms - previous_ms) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_delta_caps_lag_spikes() {
        assert_eq!(clamp_delta(16.6), 16.6);
        assert_eq!(clamp_delta(40.0), 40.0);
        assert_eq!(clamp_delta(250.0), consts::MAX_FRAME_DELTA_MS);
    }

    #[test]
    fn test_clamp_delta_rejects_garbage() {
        assert_eq!(clamp_delta(-5.0), 0.0);
        assert_eq!(clamp_delta(f32::NAN), 0.0);
        assert_eq!(clamp_delta(f32::INFINITY), 0.0);
    }

    #[test]
    fn test_frame_delta() {
        assert_eq!(frame_delta(1000.0, 1016.0), 16.0);
        assert_eq!(frame_delta(1000.0, 5000.0), 40.0);
        // Clock went backwards
        assert_eq!(frame_delta(1000.0, 990.0), 0.0);
    }
}
