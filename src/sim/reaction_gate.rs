//! ReactionGate: five rounds of "wait for green, then press"
//!
//! Pressing during the wait is a false start and records a fixed 1000ms
//! penalty in place of a reaction time. The penalty counts toward the average.

use serde::Serialize;

use super::{Clock, GameRng, Playfield, Readout, Simulation, seeded_rng, uniform};
use crate::clamp_delta;
use crate::highscores::RecordOrder;
use crate::input::{InputEvent, Key};
use crate::renderer::{Surface, scenes};

pub const TOTAL_ROUNDS: u32 = 5;
/// Recorded for a press before the signal
pub const FALSE_START_PENALTY_MS: f32 = 1000.0;
/// Floor for a genuine reaction time
pub const MIN_REACTION_MS: f32 = 50.0;

const WAIT_MS: (f32, f32) = (1200.0, 2800.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundPhase {
    /// Counting down to the signal; pressing now is a false start
    Waiting,
    /// Signal shown, waiting for the press
    Signal,
    Clicked,
    FalseStart,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReactionState {
    pub width: f32,
    pub height: f32,
    pub running: bool,
    /// 1-based, never exceeds [`TOTAL_ROUNDS`]
    pub round: u32,
    pub phase: RoundPhase,
    /// Remaining wait before the signal
    pub timer_ms: f32,
    /// Timestamp the signal appeared at
    pub signal_start_ms: f64,
    pub results: Vec<f32>,
    pub game_over: bool,
    #[serde(skip)]
    rng: GameRng,
}

impl ReactionState {
    pub fn new(field: Playfield, seed: u64) -> Self {
        let mut rng = seeded_rng(seed);
        let timer_ms = uniform(&mut rng, WAIT_MS.0, WAIT_MS.1);
        Self {
            width: field.width,
            height: field.height,
            running: true,
            round: 1,
            phase: RoundPhase::Waiting,
            timer_ms,
            signal_start_ms: 0.0,
            results: Vec::new(),
            game_over: false,
            rng,
        }
    }

    pub fn average(&self) -> f32 {
        average(&self.results)
    }
}

/// Mean of the recorded results; 0 when there are none
pub fn average(results: &[f32]) -> f32 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().sum::<f32>() / results.len() as f32
}

fn next_round(mut state: ReactionState) -> ReactionState {
    if state.round + 1 > TOTAL_ROUNDS {
        state.running = false;
        state.game_over = true;
        state.phase = RoundPhase::Clicked;
        return state;
    }
    state.round += 1;
    state.phase = RoundPhase::Waiting;
    state.timer_ms = uniform(&mut state.rng, WAIT_MS.0, WAIT_MS.1);
    state.signal_start_ms = 0.0;
    state
}

/// Count down the wait; flip to the signal once it runs out
pub fn step(state: ReactionState, clock: Clock) -> ReactionState {
    if !state.running || state.game_over || state.phase != RoundPhase::Waiting {
        return state;
    }
    let timer_ms = state.timer_ms - clamp_delta(clock.delta_ms);
    if timer_ms <= 0.0 {
        return ReactionState {
            phase: RoundPhase::Signal,
            timer_ms: 0.0,
            signal_start_ms: clock.now_ms,
            ..state
        };
    }
    ReactionState { timer_ms, ..state }
}

/// Handle a press at `now_ms`
pub fn on_press(state: ReactionState, now_ms: f64) -> ReactionState {
    if !state.running || state.game_over {
        return state;
    }
    match state.phase {
        RoundPhase::Waiting => {
            let mut failed = state;
            failed.phase = RoundPhase::FalseStart;
            failed.results.push(FALSE_START_PENALTY_MS);
            log::debug!("false start in round {}", failed.round);
            next_round(failed)
        }
        RoundPhase::Signal => {
            let reaction = ((now_ms - state.signal_start_ms) as f32).max(MIN_REACTION_MS);
            let mut clicked = state;
            clicked.phase = RoundPhase::Clicked;
            clicked.results.push(reaction);
            next_round(clicked)
        }
        RoundPhase::Clicked | RoundPhase::FalseStart => state,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionAction {
    Press,
}

impl Simulation for ReactionState {
    type Input = ();
    type Action = ReactionAction;

    const ID: &'static str = "reaction-gate";
    const DESIGN_SIZE: (f32, f32) = (720.0, 420.0);
    const RECORD_ORDER: RecordOrder = RecordOrder::LowerIsBetter;

    fn create(field: Playfield, seed: u64) -> Self {
        ReactionState::new(field, seed)
    }

    fn step(self, _input: &(), clock: Clock) -> Self {
        step(self, clock)
    }

    fn apply(self, action: ReactionAction, clock: Clock) -> Self {
        match action {
            ReactionAction::Press => on_press(self, clock.now_ms),
        }
    }

    fn interpret(&self, _input: &mut (), event: &InputEvent) -> Option<ReactionAction> {
        match event {
            InputEvent::PointerDown(_)
            | InputEvent::KeyDown(Key::Space)
            | InputEvent::KeyDown(Key::Enter) => Some(ReactionAction::Press),
            _ => None,
        }
    }

    fn captures_key(key: Key) -> bool {
        matches!(key, Key::Space | Key::Enter)
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }

    fn record(&self) -> Option<f64> {
        let avg = self.average();
        (avg > 0.0).then_some(f64::from(avg))
    }

    fn readouts(&self) -> Vec<Readout> {
        let results = if self.results.is_empty() {
            "-".to_string()
        } else {
            self.results
                .iter()
                .map(|v| format!("{v:.0}ms"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let avg = self.average();
        let avg = if avg > 0.0 {
            format!("{avg:.1}ms")
        } else {
            "-".to_string()
        };
        vec![
            Readout::new("round", format!("{} / {}", self.round.min(TOTAL_ROUNDS), TOTAL_ROUNDS)),
            Readout::new("results", results),
            Readout::new("average", avg),
        ]
    }

    fn draw(&self, surface: &mut dyn Surface) {
        scenes::draw_reaction_gate(surface, self);
    }
}
