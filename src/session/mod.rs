//! Generic game session
//!
//! A [`Session`] owns exactly one engine state and drives it frame by frame:
//! clamp the delta, step while running, draw, and persist the record once
//! when the game ends. Input events update held input or apply discrete
//! actions immediately.

pub mod frame_loop;

use std::rc::Rc;

use rand::Rng;
use serde::Serialize;

use crate::consts::MIN_PLAYFIELD_WIDTH;
use crate::frame_delta;
use crate::highscores::BestRecord;
use crate::input::{InputEvent, Key};
use crate::persistence::ScoreStore;
use crate::renderer::{Surface, scenes};
use crate::sim::{Clock, GameRng, Playfield, Readout, Simulation, seeded_rng};

pub use frame_loop::FrameLoop;

/// Externally visible lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    Running,
    Paused,
    GameOver,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Running => "playing",
            SessionStatus::Paused => "paused",
            SessionStatus::GameOver => "game over",
        }
    }
}

/// Playfield for a container: design width capped by the container, never
/// narrower than [`MIN_PLAYFIELD_WIDTH`], design aspect ratio kept
pub fn fit_playfield(design: (f32, f32), container_width: f32) -> Playfield {
    let (design_w, design_h) = design;
    let available = if container_width.is_finite() {
        container_width
    } else {
        design_w
    };
    let width = available.min(design_w).max(MIN_PLAYFIELD_WIDTH.min(design_w));
    let height = (width / design_w * design_h).round();
    Playfield::new(width, height)
}

/// Readouts joined into a single HUD line
pub fn readout_line(readouts: &[Readout]) -> String {
    readouts
        .iter()
        .map(|r| format!("{} {}", r.label.to_uppercase(), r.value))
        .collect::<Vec<_>>()
        .join(" | ")
}

pub struct Session<G: Simulation> {
    state: G,
    input: G::Input,
    field: Playfield,
    running: bool,
    best: BestRecord,
    last_timestamp: Option<f64>,
    store: Rc<dyn ScoreStore>,
    /// Source of per-game seeds
    seeds: GameRng,
}

impl<G: Simulation> Session<G> {
    /// Build a running session sized for `container_width`, reading the
    /// stored best once
    pub fn new(container_width: f32, store: Rc<dyn ScoreStore>, seed: u64) -> Self {
        let field = fit_playfield(G::DESIGN_SIZE, container_width);
        let mut seeds = seeded_rng(seed);
        let state = G::create(field, seeds.random());
        let best = BestRecord::new(store.load(G::ID, 0.0), G::RECORD_ORDER);
        log::info!(
            "{} session started at {}x{} (best {})",
            G::ID,
            field.width,
            field.height,
            best.display()
        );
        Self {
            state,
            input: G::Input::default(),
            field,
            running: true,
            best,
            last_timestamp: None,
            store,
            seeds,
        }
    }

    pub fn state(&self) -> &G {
        &self.state
    }

    pub fn field(&self) -> Playfield {
        self.field
    }

    pub fn best(&self) -> BestRecord {
        self.best
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn status(&self) -> SessionStatus {
        if self.state.is_game_over() {
            SessionStatus::GameOver
        } else if self.running {
            SessionStatus::Running
        } else {
            SessionStatus::Paused
        }
    }

    /// One animation frame at `now_ms`
    pub fn frame(&mut self, now_ms: f64, surface: &mut dyn Surface) {
        let delta_ms = match self.last_timestamp {
            Some(previous) => frame_delta(previous, now_ms),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        if self.running {
            self.state = self.state.clone().step(&self.input, Clock::new(delta_ms, now_ms));
        }

        self.state.draw(surface);
        if self.status() == SessionStatus::Paused {
            scenes::draw_paused_banner(surface, self.field.width, self.field.height);
        }

        if self.state.is_game_over() && self.running {
            self.running = false;
            self.finish();
        }
    }

    /// Offer the finished game's record and persist it if it is a new best
    fn finish(&mut self) {
        log::info!("{} game over", G::ID);
        let Some(record) = self.state.record() else {
            return;
        };
        if self.best.offer(record) {
            log::info!("{} new best {}", G::ID, self.best.display());
            self.store.save(G::ID, record);
        }
    }

    /// Route a normalized input event. Held input always updates; discrete
    /// actions only apply while running.
    pub fn handle_input(&mut self, event: &InputEvent, now_ms: f64) {
        if let Some(action) = self.state.interpret(&mut self.input, event) {
            self.dispatch(action, now_ms);
        }
    }

    /// Route a page-level key press. Chorded presses (Ctrl, Meta, Alt) belong
    /// to the browser. Returns whether the browser default should be
    /// suppressed.
    pub fn key_down(&mut self, key: Key, chorded: bool, now_ms: f64) -> bool {
        if chorded {
            return false;
        }
        self.handle_input(&InputEvent::KeyDown(key), now_ms);
        G::captures_key(key)
    }

    /// Apply a discrete action immediately
    pub fn dispatch(&mut self, action: G::Action, now_ms: f64) {
        if !self.running {
            log::debug!("{} ignoring {action:?} while not running", G::ID);
            return;
        }
        self.state = self.state.clone().apply(action, Clock::at(now_ms));
    }

    pub fn pause(&mut self) {
        if self.running {
            self.running = false;
            log::info!("{} paused", G::ID);
        }
    }

    /// Resume a paused game; ignored once the game is over
    pub fn resume(&mut self) {
        if self.running || self.state.is_game_over() {
            return;
        }
        self.running = true;
        log::info!("{} resumed", G::ID);
    }

    pub fn toggle_pause(&mut self) {
        if self.running {
            self.pause();
        } else {
            self.resume();
        }
    }

    /// Hiding the page always pauses; showing it again does not resume
    pub fn on_visibility_change(&mut self, hidden: bool) {
        if hidden {
            self.pause();
        }
    }

    /// Fresh state, cleared input, running
    pub fn restart(&mut self) {
        self.state = G::create(self.field, self.seeds.random());
        self.input = G::Input::default();
        self.running = true;
        log::info!("{} restarted", G::ID);
    }

    /// Refit to a new container width. The state is rebuilt from scratch;
    /// the running flag is left alone.
    pub fn resize(&mut self, container_width: f32) {
        self.field = fit_playfield(G::DESIGN_SIZE, container_width);
        self.state = G::create(self.field, self.seeds.random());
        self.input = G::Input::default();
        log::info!(
            "{} resized to {}x{}",
            G::ID,
            self.field.width,
            self.field.height
        );
    }

    /// Engine readouts plus status and best
    pub fn readouts(&self) -> Vec<Readout> {
        let mut readouts = self.state.readouts();
        readouts.push(Readout::new("status", self.status().as_str()));
        readouts.push(Readout::new("best", self.best.display()));
        readouts
    }
}
