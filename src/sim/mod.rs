//! Deterministic simulation module
//!
//! All gameplay logic lives here. Engines must stay pure and deterministic:
//! - State is a value; every transition returns the next value
//! - Seeded RNG only, carried inside the state
//! - Deltas are clamped inside every step
//! - No rendering or platform dependencies beyond the `Surface` trait

pub mod asteroid_click;
pub mod collision;
pub mod dodge_dots;
pub mod reaction_gate;
pub mod snake_lite;
pub mod tiny_runner;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::highscores::RecordOrder;
use crate::input::{InputEvent, Key};
use crate::renderer::Surface;

pub use asteroid_click::AsteroidState;
pub use collision::{Rect, circles_overlap, point_in_circle};
pub use dodge_dots::DodgeState;
pub use reaction_gate::ReactionState;
pub use snake_lite::SnakeState;
pub use tiny_runner::RunnerState;

/// Per-state random source
pub type GameRng = Pcg32;

/// Build the RNG for a fresh state
pub fn seeded_rng(seed: u64) -> GameRng {
    Pcg32::seed_from_u64(seed)
}

/// Uniform sample in `[min, max)`; collapses to the midpoint when the range
/// is empty (tiny playfields).
pub fn uniform(rng: &mut GameRng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        (min + max) / 2.0
    }
}

/// Playfield bounds in device-independent pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Timing for one tick or one discrete input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    /// Simulated time since the previous tick (clamped again by each engine)
    pub delta_ms: f32,
    /// Monotonic timestamp of the frame or input event
    pub now_ms: f64,
}

impl Clock {
    pub const fn new(delta_ms: f32, now_ms: f64) -> Self {
        Self { delta_ms, now_ms }
    }

    /// Clock for a discrete input: no simulated time passes
    pub const fn at(now_ms: f64) -> Self {
        Self {
            delta_ms: 0.0,
            now_ms,
        }
    }
}

/// One line of derived HUD output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Readout {
    pub label: &'static str,
    pub value: String,
}

impl Readout {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// The shape every mini-game shares.
///
/// A `Session` drives any implementor: it owns one state value, feeds it held
/// input and clamped deltas, routes discrete actions, draws it, and persists
/// the record when the game ends.
pub trait Simulation: Clone + 'static {
    /// Continuous input held between frames (steering, swipe tracking)
    type Input: Default;
    /// Discrete action applied immediately (tap, jump, press, turn)
    type Action: Copy + std::fmt::Debug;

    /// Stable id used as the persistence key suffix
    const ID: &'static str;
    /// Design width/height; the live playfield keeps this aspect ratio
    const DESIGN_SIZE: (f32, f32);
    /// How two records compare
    const RECORD_ORDER: RecordOrder;

    /// Fresh state for the given bounds
    fn create(field: Playfield, seed: u64) -> Self;

    /// Advance one tick
    fn step(self, input: &Self::Input, clock: Clock) -> Self;

    /// Apply a discrete action
    fn apply(self, action: Self::Action, clock: Clock) -> Self;

    /// Translate a normalized input event, updating held input and/or
    /// producing a discrete action
    fn interpret(&self, input: &mut Self::Input, event: &InputEvent) -> Option<Self::Action>;

    /// Keys whose browser default (scrolling, activation) this game suppresses
    fn captures_key(_key: Key) -> bool {
        false
    }

    fn is_game_over(&self) -> bool;

    /// Value offered to the best-score store once the game has ended
    fn record(&self) -> Option<f64>;

    /// Derived fields for the surrounding UI
    fn readouts(&self) -> Vec<Readout>;

    /// Render without mutating anything
    fn draw(&self, surface: &mut dyn Surface);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_stays_in_range() {
        let mut rng = seeded_rng(7);
        for _ in 0..1000 {
            let v = uniform(&mut rng, 16.0, 32.0);
            assert!((16.0..32.0).contains(&v));
        }
    }

    #[test]
    fn test_uniform_empty_range() {
        let mut rng = seeded_rng(7);
        assert_eq!(uniform(&mut rng, 50.0, 10.0), 30.0);
        assert_eq!(uniform(&mut rng, 5.0, 5.0), 5.0);
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let mut a = seeded_rng(42);
        let mut b = seeded_rng(42);
        for _ in 0..16 {
            assert_eq!(uniform(&mut a, 0.0, 1.0), uniform(&mut b, 0.0, 1.0));
        }
    }
}
