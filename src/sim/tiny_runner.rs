//! TinyRunner: jump the obstacles on an endless, accelerating track

use serde::Serialize;

use super::collision::Rect;
use super::{Clock, GameRng, Playfield, Readout, Simulation, seeded_rng, uniform};
use crate::clamp_delta;
use crate::highscores::RecordOrder;
use crate::input::{InputEvent, Key};
use crate::renderer::{Surface, scenes};

/// Ground sits this far above the bottom edge
pub const GROUND_INSET: f32 = 42.0;
pub const GRAVITY: f32 = 900.0;
pub const JUMP_POWER: f32 = 360.0;
pub const BASE_SPEED: f32 = 190.0;
pub const MAX_SPEED: f32 = 420.0;
/// Speed gained per second of running
pub const ACCELERATION: f32 = 8.0;

pub const RUNNER_X: f32 = 56.0;
pub const RUNNER_W: f32 = 24.0;
pub const RUNNER_H: f32 = 26.0;

/// Jumps are only accepted within this distance of the ground
const GROUND_TOLERANCE: f32 = 2.0;
const INITIAL_SPAWN_COOLDOWN_MS: f32 = 800.0;
const SPAWN_GAP_MS: (f32, f32) = (620.0, 1280.0);
/// Cooldown shaved off per unit of speed
const SPAWN_SPEED_FACTOR: f32 = 0.6;
const OBSTACLE_H: (f32, f32) = (24.0, 56.0);
const OBSTACLE_W: (f32, f32) = (16.0, 30.0);
const OBSTACLE_ENTRY_OFFSET: f32 = 10.0;
const CULL_X: f32 = -20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Obstacle {
    fn spawn(width: f32, ground_y: f32, rng: &mut GameRng) -> Self {
        let h = uniform(rng, OBSTACLE_H.0, OBSTACLE_H.1);
        let w = uniform(rng, OBSTACLE_W.0, OBSTACLE_W.1);
        Self {
            x: width + OBSTACLE_ENTRY_OFFSET,
            y: ground_y - h,
            w,
            h,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunnerState {
    pub width: f32,
    pub height: f32,
    /// Bottom edge of the runner
    pub y: f32,
    pub vy: f32,
    pub ground_y: f32,
    pub speed: f32,
    pub distance: f32,
    pub spawn_cooldown_ms: f32,
    pub obstacles: Vec<Obstacle>,
    pub game_over: bool,
    #[serde(skip)]
    rng: GameRng,
}

impl RunnerState {
    pub fn new(field: Playfield, seed: u64) -> Self {
        let ground_y = (field.height - GROUND_INSET).max(RUNNER_H);
        Self {
            width: field.width,
            height: field.height,
            y: ground_y,
            vy: 0.0,
            ground_y,
            speed: BASE_SPEED,
            distance: 0.0,
            spawn_cooldown_ms: INITIAL_SPAWN_COOLDOWN_MS,
            obstacles: Vec::new(),
            game_over: false,
            rng: seeded_rng(seed),
        }
    }

    pub fn runner_rect(&self) -> Rect {
        Rect::new(RUNNER_X, self.y - RUNNER_H, RUNNER_W, RUNNER_H)
    }

    pub fn on_ground(&self) -> bool {
        self.y >= self.ground_y - GROUND_TOLERANCE
    }
}

/// Launch from the ground; ignored mid-air
pub fn jump(state: RunnerState) -> RunnerState {
    if state.game_over || !state.on_ground() {
        return state;
    }
    RunnerState {
        vy: -JUMP_POWER,
        ..state
    }
}

pub fn step(state: RunnerState, delta_ms: f32) -> RunnerState {
    if state.game_over {
        return state;
    }
    let delta_ms = clamp_delta(delta_ms);
    let dt = delta_ms / 1000.0;
    let mut next = state;

    next.y += next.vy * dt;
    next.vy += GRAVITY * dt;
    if next.y >= next.ground_y {
        next.y = next.ground_y;
        next.vy = 0.0;
    }
    if next.y < RUNNER_H {
        next.y = RUNNER_H;
        next.vy = next.vy.max(0.0);
    }

    next.speed = (next.speed + ACCELERATION * dt).min(MAX_SPEED);
    let travel = next.speed * dt;
    for obstacle in &mut next.obstacles {
        obstacle.x -= travel;
    }
    next.obstacles.retain(|o| o.x + o.w > CULL_X);

    next.spawn_cooldown_ms -= delta_ms;
    if next.spawn_cooldown_ms <= 0.0 {
        let obstacle = Obstacle::spawn(next.width, next.ground_y, &mut next.rng);
        next.obstacles.push(obstacle);
        next.spawn_cooldown_ms = uniform(&mut next.rng, SPAWN_GAP_MS.0, SPAWN_GAP_MS.1)
            - next.speed * SPAWN_SPEED_FACTOR;
    }

    let runner = next.runner_rect();
    if next.obstacles.iter().any(|o| runner.overlaps(&o.rect())) {
        log::debug!("runner hit an obstacle at {:.0}m", next.distance);
        next.game_over = true;
        return next;
    }

    next.distance += travel;
    next
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerAction {
    Jump,
}

impl Simulation for RunnerState {
    type Input = ();
    type Action = RunnerAction;

    const ID: &'static str = "tiny-runner";
    const DESIGN_SIZE: (f32, f32) = (720.0, 360.0);
    const RECORD_ORDER: RecordOrder = RecordOrder::HigherIsBetter;

    fn create(field: Playfield, seed: u64) -> Self {
        RunnerState::new(field, seed)
    }

    fn step(self, _input: &(), clock: Clock) -> Self {
        step(self, clock.delta_ms)
    }

    fn apply(self, action: RunnerAction, _clock: Clock) -> Self {
        match action {
            RunnerAction::Jump => jump(self),
        }
    }

    fn interpret(&self, _input: &mut (), event: &InputEvent) -> Option<RunnerAction> {
        match event {
            InputEvent::PointerDown(_)
            | InputEvent::KeyDown(Key::Space)
            | InputEvent::KeyDown(Key::ArrowUp) => Some(RunnerAction::Jump),
            _ => None,
        }
    }

    fn captures_key(key: Key) -> bool {
        matches!(key, Key::Space | Key::ArrowUp)
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }

    fn record(&self) -> Option<f64> {
        Some(f64::from(self.distance).floor())
    }

    fn readouts(&self) -> Vec<Readout> {
        vec![
            Readout::new("distance", format!("{}m", self.distance.floor())),
            Readout::new("speed", format!("{:.0}", self.speed)),
        ]
    }

    fn draw(&self, surface: &mut dyn Surface) {
        scenes::draw_tiny_runner(surface, self);
    }
}
