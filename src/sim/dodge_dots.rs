//! DodgeDots: survive a growing stream of dots
//!
//! Score is elapsed time in tenths of a second. Dots enter from a random edge
//! and speed up with time; the player speeds up too, up to 1.8x.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::collision::{circles_overlap, clamp_to_extent};
use super::{Clock, GameRng, Playfield, Readout, Simulation, seeded_rng, uniform};
use crate::clamp_delta;
use crate::highscores::RecordOrder;
use crate::input::{InputEvent, Steer};
use crate::renderer::{Surface, scenes};

pub const PLAYER_RADIUS: f32 = 10.0;
pub const PLAYER_SPEED: f32 = 250.0;
/// Player speed multiplier ceiling
pub const MAX_SPEED_SCALE: f32 = 1.8;
/// Dots are culled once this far outside the playfield
pub const CULL_MARGIN: f32 = 30.0;

const BASE_SPAWN_MS: f32 = 800.0;
const MIN_SPAWN_MS: f32 = 180.0;
const SPAWN_JITTER: (f32, f32) = (0.9, 1.1);
const SPEED_SCALE_RAMP_MS: f32 = 45_000.0;
const MAX_DOT_SPEED_BOOST: f32 = 220.0;
const DOT_SPEED: (f32, f32) = (90.0, 150.0);
const DOT_DRIFT: f32 = 40.0;
const DOT_RADIUS: (f32, f32) = (4.0, 8.0);
const DOT_ENTRY_OFFSET: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Player {
    pub pos: Vec2,
    pub r: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub r: f32,
}

impl Dot {
    /// Spawn just outside a random edge, heading inward
    fn spawn(width: f32, height: f32, elapsed_ms: f32, rng: &mut GameRng) -> Self {
        let boost = dot_speed_boost(elapsed_ms);
        let speed = uniform(rng, DOT_SPEED.0 + boost, DOT_SPEED.1 + boost);
        let drift = uniform(rng, -DOT_DRIFT, DOT_DRIFT);
        let r = uniform(rng, DOT_RADIUS.0, DOT_RADIUS.1);
        let (pos, vel) = match rng.random_range(0..4u8) {
            0 => (
                Vec2::new(uniform(rng, 0.0, width), -DOT_ENTRY_OFFSET),
                Vec2::new(drift, speed),
            ),
            1 => (
                Vec2::new(width + DOT_ENTRY_OFFSET, uniform(rng, 0.0, height)),
                Vec2::new(-speed, drift),
            ),
            2 => (
                Vec2::new(uniform(rng, 0.0, width), height + DOT_ENTRY_OFFSET),
                Vec2::new(drift, -speed),
            ),
            _ => (
                Vec2::new(-DOT_ENTRY_OFFSET, uniform(rng, 0.0, height)),
                Vec2::new(speed, drift),
            ),
        };
        Self { pos, vel, r }
    }

    fn in_play(&self, width: f32, height: f32) -> bool {
        self.pos.x > -CULL_MARGIN
            && self.pos.x < width + CULL_MARGIN
            && self.pos.y > -CULL_MARGIN
            && self.pos.y < height + CULL_MARGIN
    }
}

/// Player speed multiplier after `elapsed_ms`
pub fn speed_scale(elapsed_ms: f32) -> f32 {
    (1.0 + elapsed_ms / SPEED_SCALE_RAMP_MS).min(MAX_SPEED_SCALE)
}

/// Extra dot speed (px/s) after `elapsed_ms`
pub fn dot_speed_boost(elapsed_ms: f32) -> f32 {
    (elapsed_ms * 0.015).min(MAX_DOT_SPEED_BOOST)
}

/// Nominal gap between spawns after `elapsed_ms`
pub fn spawn_interval(elapsed_ms: f32) -> f32 {
    (BASE_SPAWN_MS - elapsed_ms * 0.01).max(MIN_SPAWN_MS)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DodgeState {
    pub width: f32,
    pub height: f32,
    pub player: Player,
    pub dots: Vec<Dot>,
    pub score: u32,
    pub elapsed_ms: f32,
    pub spawn_cooldown_ms: f32,
    pub game_over: bool,
    #[serde(skip)]
    rng: GameRng,
}

impl DodgeState {
    pub fn new(field: Playfield, seed: u64) -> Self {
        Self {
            width: field.width,
            height: field.height,
            player: Player {
                pos: Vec2::new(field.width / 2.0, field.height / 2.0),
                r: PLAYER_RADIUS,
                speed: PLAYER_SPEED,
            },
            dots: Vec::new(),
            score: 0,
            elapsed_ms: 0.0,
            spawn_cooldown_ms: BASE_SPAWN_MS,
            game_over: false,
            rng: seeded_rng(seed),
        }
    }
}

/// Move everything, cull, spawn, then test for a collision
pub fn step(state: DodgeState, input: &Steer, delta_ms: f32) -> DodgeState {
    if state.game_over {
        return state;
    }
    let delta_ms = clamp_delta(delta_ms);
    let dt = delta_ms / 1000.0;
    let mut next = state;

    next.elapsed_ms += delta_ms;
    next.score = (next.elapsed_ms / 100.0).floor() as u32;

    for dot in &mut next.dots {
        dot.pos += dot.vel * dt;
    }

    let travel = input.axis() * next.player.speed * speed_scale(next.elapsed_ms) * dt;
    let moved = next.player.pos + travel;
    next.player.pos = Vec2::new(
        clamp_to_extent(moved.x, next.player.r, next.width),
        clamp_to_extent(moved.y, next.player.r, next.height),
    );

    let (width, height) = (next.width, next.height);
    next.dots.retain(|d| d.in_play(width, height));

    next.spawn_cooldown_ms -= delta_ms;
    if next.spawn_cooldown_ms <= 0.0 {
        let dot = Dot::spawn(width, height, next.elapsed_ms, &mut next.rng);
        next.dots.push(dot);
        let jitter = uniform(&mut next.rng, SPAWN_JITTER.0, SPAWN_JITTER.1);
        next.spawn_cooldown_ms = spawn_interval(next.elapsed_ms) * jitter;
    }

    let player = next.player;
    if next
        .dots
        .iter()
        .any(|d| circles_overlap(d.pos, d.r, player.pos, player.r))
    {
        next.game_over = true;
    }

    next
}

/// Held steering plus the pointer state needed to derive it
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DodgeInput {
    pub steer: Steer,
    dragging: bool,
}

impl Simulation for DodgeState {
    type Input = DodgeInput;
    type Action = ();

    const ID: &'static str = "dodge-dots";
    const DESIGN_SIZE: (f32, f32) = (720.0, 420.0);
    const RECORD_ORDER: RecordOrder = RecordOrder::HigherIsBetter;

    fn create(field: Playfield, seed: u64) -> Self {
        DodgeState::new(field, seed)
    }

    fn step(self, input: &DodgeInput, clock: Clock) -> Self {
        step(self, &input.steer, clock.delta_ms)
    }

    fn apply(self, _action: (), _clock: Clock) -> Self {
        self
    }

    fn interpret(&self, input: &mut DodgeInput, event: &InputEvent) -> Option<()> {
        match *event {
            InputEvent::KeyDown(key) => {
                if let Some(dir) = key.direction() {
                    input.steer.set(dir, true);
                }
            }
            InputEvent::KeyUp(key) => {
                if let Some(dir) = key.direction() {
                    input.steer.set(dir, false);
                }
            }
            InputEvent::PointerDown(pos) => {
                input.dragging = true;
                input.steer = Steer::toward(self.player.pos, pos);
            }
            InputEvent::PointerMove { pos, primary } => {
                if input.dragging && primary {
                    input.steer = Steer::toward(self.player.pos, pos);
                }
            }
            InputEvent::PointerUp(_) | InputEvent::PointerCancel => {
                input.dragging = false;
                input.steer = Steer::default();
            }
        }
        None
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
            Readout::new("time", format!("{:.1}s", self.elapsed_ms / 1000.0)),
        ]
    }

    fn draw(&self, surface: &mut dyn Surface) {
        scenes::draw_dodge_dots(surface, self);
    }
}
