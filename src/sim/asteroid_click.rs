//! AsteroidClick: tap targets before they burn out
//!
//! A 60 second round. One target lives at a time; hitting it scores
//! `8 + min(12, combo)`, letting it expire or tapping empty space costs points
//! and breaks the combo.

use glam::Vec2;
use serde::Serialize;

use super::collision::point_in_circle;
use super::{Clock, GameRng, Playfield, Readout, Simulation, seeded_rng, uniform};
use crate::clamp_delta;
use crate::highscores::RecordOrder;
use crate::input::InputEvent;
use crate::renderer::{Surface, scenes};

/// Round length
pub const ROUND_MS: f32 = 60_000.0;
/// Delay before the first target
pub const INITIAL_SPAWN_COOLDOWN_MS: f32 = 350.0;
/// Delay after a successful hit
pub const HIT_SPAWN_COOLDOWN_MS: f32 = 80.0;
/// Base points per hit
pub const BASE_GAIN: u32 = 8;
/// Combo bonus ceiling
pub const COMBO_BONUS_CAP: u32 = 12;
/// Points lost when a target expires
pub const EXPIRY_PENALTY: u32 = 2;
/// Points lost for tapping empty space
pub const MISS_PENALTY: u32 = 1;

const RESPAWN_COOLDOWN_MS: (f32, f32) = (120.0, 320.0);
const TARGET_RADIUS: (f32, f32) = (16.0, 32.0);
const TARGET_TTL_MS: (f32, f32) = (700.0, 1300.0);
const TARGET_INSET: f32 = 10.0;

/// A live target
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Target {
    pub pos: Vec2,
    pub r: f32,
    pub ttl_ms: f32,
}

impl Target {
    fn spawn(width: f32, height: f32, rng: &mut GameRng) -> Self {
        let r = uniform(rng, TARGET_RADIUS.0, TARGET_RADIUS.1);
        let margin = r + TARGET_INSET;
        let x = uniform(rng, margin, width - margin);
        let y = uniform(rng, margin, height - margin);
        Self {
            pos: Vec2::new(x, y),
            r,
            ttl_ms: uniform(rng, TARGET_TTL_MS.0, TARGET_TTL_MS.1),
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point_in_circle(point, self.pos, self.r)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AsteroidState {
    pub width: f32,
    pub height: f32,
    pub time_left_ms: f32,
    pub score: u32,
    pub hits: u32,
    pub misses: u32,
    pub combo: u32,
    pub target: Option<Target>,
    /// Counts down only while no target is live
    pub spawn_cooldown_ms: f32,
    pub game_over: bool,
    #[serde(skip)]
    rng: GameRng,
}

impl AsteroidState {
    pub fn new(field: Playfield, seed: u64) -> Self {
        Self {
            width: field.width,
            height: field.height,
            time_left_ms: ROUND_MS,
            score: 0,
            hits: 0,
            misses: 0,
            combo: 0,
            target: None,
            spawn_cooldown_ms: INITIAL_SPAWN_COOLDOWN_MS,
            game_over: false,
            rng: seeded_rng(seed),
        }
    }

    /// Hit ratio as a percentage; 0 before the first attempt
    pub fn accuracy(&self) -> f32 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f32 / total as f32 * 100.0
    }

    pub fn accuracy_text(&self) -> String {
        format!("{:.1}", self.accuracy())
    }
}

/// Advance the round timer, the spawn cooldown and the live target
pub fn step(state: AsteroidState, delta_ms: f32) -> AsteroidState {
    if state.game_over {
        return state;
    }
    let dt = clamp_delta(delta_ms);
    let mut next = state;

    next.time_left_ms = (next.time_left_ms - dt).max(0.0);
    if next.time_left_ms <= 0.0 {
        next.game_over = true;
        next.target = None;
        return next;
    }

    match next.target.as_mut() {
        Some(target) => {
            target.ttl_ms -= dt;
            if target.ttl_ms <= 0.0 {
                next.target = None;
                next.combo = 0;
                next.misses += 1;
                next.score = next.score.saturating_sub(EXPIRY_PENALTY);
            }
        }
        None => {
            next.spawn_cooldown_ms -= dt;
            if next.spawn_cooldown_ms <= 0.0 {
                next.target = Some(Target::spawn(next.width, next.height, &mut next.rng));
                next.spawn_cooldown_ms =
                    uniform(&mut next.rng, RESPAWN_COOLDOWN_MS.0, RESPAWN_COOLDOWN_MS.1);
            }
        }
    }

    next
}

/// Score a hit on the live target
pub fn on_hit(state: AsteroidState) -> AsteroidState {
    if state.game_over || state.target.is_none() {
        return state;
    }
    let combo = state.combo + 1;
    let gain = BASE_GAIN + combo.min(COMBO_BONUS_CAP);
    AsteroidState {
        score: state.score + gain,
        hits: state.hits + 1,
        combo,
        target: None,
        spawn_cooldown_ms: HIT_SPAWN_COOLDOWN_MS,
        ..state
    }
}

/// Penalize a tap that hit nothing
pub fn on_miss_tap(state: AsteroidState) -> AsteroidState {
    if state.game_over {
        return state;
    }
    AsteroidState {
        misses: state.misses + 1,
        combo: 0,
        score: state.score.saturating_sub(MISS_PENALTY),
        ..state
    }
}

/// Hit-test a tap and dispatch to [`on_hit`] or [`on_miss_tap`]
pub fn tap(state: AsteroidState, point: Vec2) -> AsteroidState {
    match state.target {
        Some(target) if target.contains(point) => on_hit(state),
        _ => on_miss_tap(state),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AsteroidAction {
    Tap(Vec2),
}

impl Simulation for AsteroidState {
    type Input = ();
    type Action = AsteroidAction;

    const ID: &'static str = "asteroid-click";
    const DESIGN_SIZE: (f32, f32) = (720.0, 420.0);
    const RECORD_ORDER: RecordOrder = RecordOrder::HigherIsBetter;

    fn create(field: Playfield, seed: u64) -> Self {
        AsteroidState::new(field, seed)
    }

    fn step(self, _input: &(), clock: Clock) -> Self {
        step(self, clock.delta_ms)
    }

    fn apply(self, action: AsteroidAction, _clock: Clock) -> Self {
        match action {
            AsteroidAction::Tap(point) => tap(self, point),
        }
    }

    fn interpret(&self, _input: &mut (), event: &InputEvent) -> Option<AsteroidAction> {
        match *event {
            InputEvent::PointerDown(pos) => Some(AsteroidAction::Tap(pos)),
            _ => None,
        }
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }

    fn record(&self) -> Option<f64> {
        Some(f64::from(self.score))
    }

    fn readouts(&self) -> Vec<Readout> {
        vec![
            Readout::new("score", self.score.to_string()),
            Readout::new("accuracy", format!("{}%", self.accuracy_text())),
            Readout::new("combo", format!("x{}", self.combo)),
            Readout::new("time", format!("{:.1}s", self.time_left_ms / 1000.0)),
        ]
    }

    fn draw(&self, surface: &mut dyn Surface) {
        scenes::draw_asteroid_click(surface, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FIELD: Playfield = Playfield::new(720.0, 420.0);

    fn run(mut state: AsteroidState, total_ms: f32, frame_ms: f32) -> AsteroidState {
        let mut elapsed = 0.0;
        while elapsed < total_ms {
            state = step(state, frame_ms);
            elapsed += frame_ms;
        }
        state
    }

    fn with_target(seed: u64) -> AsteroidState {
        let state = run(AsteroidState::new(FIELD, seed), 360.0, 40.0);
        assert!(state.target.is_some());
        state
    }

    #[test]
    fn test_initial_state() {
        let state = AsteroidState::new(FIELD, 1);
        assert_eq!(state.time_left_ms, 60_000.0);
        assert_eq!(state.score, 0);
        assert!(state.target.is_none());
        assert!(!state.game_over);
        assert_eq!(state.accuracy_text(), "0.0");
    }

    #[test]
    fn test_target_spawns_after_initial_cooldown() {
        let state = run(AsteroidState::new(FIELD, 3), 320.0, 40.0);
        assert!(state.target.is_none());

        let state = step(state, 40.0);
        let target = state.target.expect("target after 360ms");
        assert!(target.pos.x - target.r >= TARGET_INSET);
        assert!(target.pos.x + target.r <= FIELD.width - TARGET_INSET);
        assert!(target.pos.y - target.r >= TARGET_INSET);
        assert!(target.pos.y + target.r <= FIELD.height - TARGET_INSET);
    }

    #[test]
    fn test_large_delta_is_clamped() {
        // 350ms in one call still only advances 40ms
        let state = step(AsteroidState::new(FIELD, 3), 350.0);
        assert!(state.target.is_none());
        assert_eq!(state.spawn_cooldown_ms, INITIAL_SPAWN_COOLDOWN_MS - 40.0);
        assert_eq!(state.time_left_ms, ROUND_MS - 40.0);
    }

    #[test]
    fn test_on_hit_scores_and_clears_target() {
        let state = with_target(11);
        let hit = on_hit(state.clone());
        assert_eq!(hit.score, 9);
        assert_eq!(hit.combo, 1);
        assert_eq!(hit.hits, 1);
        assert!(hit.target.is_none());
        assert_eq!(hit.spawn_cooldown_ms, HIT_SPAWN_COOLDOWN_MS);
    }

    #[test]
    fn test_combo_bonus_is_capped() {
        let mut state = with_target(5);
        state.combo = 30;
        let hit = on_hit(state);
        assert_eq!(hit.score, BASE_GAIN + COMBO_BONUS_CAP);
    }

    #[test]
    fn test_on_hit_without_target_is_noop() {
        let state = AsteroidState::new(FIELD, 1);
        assert_eq!(on_hit(state.clone()), state);
    }

    #[test]
    fn test_miss_tap_floors_at_zero() {
        let state = on_miss_tap(AsteroidState::new(FIELD, 1));
        assert_eq!(state.score, 0);
        assert_eq!(state.misses, 1);
        assert_eq!(state.accuracy_text(), "0.0");
    }

    #[test]
    fn test_tap_hit_test() {
        let state = with_target(8);
        let target = state.target.unwrap();

        let hit = tap(state.clone(), target.pos + Vec2::new(target.r * 0.5, 0.0));
        assert_eq!(hit.hits, 1);

        let miss = tap(state, target.pos + Vec2::new(target.r + 1.0, 0.0));
        assert_eq!(miss.misses, 1);
        assert!(miss.target.is_some());
    }

    #[test]
    fn test_target_expiry_costs_points_and_combo() {
        let mut state = with_target(21);
        state.score = 10;
        state.combo = 4;
        let state = run(state, 1400.0, 40.0);
        // Expired at least once, and the cooldown only started afterwards
        assert!(state.misses >= 1);
        assert_eq!(state.combo, 0);
        assert!(state.score <= 8);
    }

    #[test]
    fn test_accuracy() {
        let mut state = AsteroidState::new(FIELD, 1);
        state.hits = 2;
        state.misses = 1;
        assert_eq!(state.accuracy_text(), "66.7");
    }

    #[test]
    fn test_round_ends_and_absorbs() {
        let mut state = with_target(2);
        state.time_left_ms = 30.0;
        let over = step(state, 40.0);
        assert!(over.game_over);
        assert!(over.target.is_none());
        assert_eq!(over.time_left_ms, 0.0);

        assert_eq!(step(over.clone(), 16.0), over);
        assert_eq!(on_miss_tap(over.clone()), over);
        assert_eq!(tap(over.clone(), Vec2::new(1.0, 1.0)), over);
    }

    #[test]
    fn test_interpret_pointer_down() {
        let state = AsteroidState::new(FIELD, 1);
        let p = Vec2::new(10.0, 20.0);
        assert_eq!(
            state.interpret(&mut (), &InputEvent::PointerDown(p)),
            Some(AsteroidAction::Tap(p))
        );
        assert_eq!(state.interpret(&mut (), &InputEvent::PointerCancel), None);
    }

    proptest! {
        #[test]
        fn prop_score_never_negative_and_single_target(
            seed in any::<u64>(),
            frames in prop::collection::vec((0.0f32..120.0, any::<bool>(), 0.0f32..720.0, 0.0f32..420.0), 1..300),
        ) {
            let mut state = AsteroidState::new(FIELD, seed);
            let start = state.time_left_ms;
            let mut simulated = 0.0;
            for (delta, tapping, x, y) in frames {
                let before = state.time_left_ms;
                state = step(state, delta);
                prop_assert!(before - state.time_left_ms <= crate::consts::MAX_FRAME_DELTA_MS + 1e-3);
                simulated += before - state.time_left_ms;
                if tapping {
                    state = tap(state, Vec2::new(x, y));
                }
                if let Some(t) = state.target {
                    prop_assert!(t.pos.x >= t.r && t.pos.x <= FIELD.width - t.r);
                    prop_assert!(t.pos.y >= t.r && t.pos.y <= FIELD.height - t.r);
                }
                prop_assert!(state.accuracy() >= 0.0 && state.accuracy() <= 100.0);
            }
            prop_assert!((start - state.time_left_ms - simulated).abs() < 1.0);
        }
    }
}
