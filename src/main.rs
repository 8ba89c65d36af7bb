//! Jelly Arcade entry point
//!
//! On the web this installs logging and mounts every canvas that names its
//! game in a `data-game` attribute. Natively it plays each game headlessly with
//! a scripted autopilot and logs a JSON summary per game.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Canvas ids probed for a `data-game` attribute
#[cfg(target_arch = "wasm32")]
const CANVAS_IDS: [&str; 6] = [
    "canvas",
    "asteroid-click",
    "dodge-dots",
    "reaction-gate",
    "snake-lite",
    "tiny-runner",
];

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Jelly Arcade starting...");

    match jelly_arcade::platform::web::mount_from_attributes(&CANVAS_IDS) {
        Ok(mounted) => {
            log::info!("{} game(s) mounted", mounted.len());
            // Mounted games live as long as the page
            std::mem::forget(mounted);
        }
        Err(err) => log::error!("Mount failed: {err:?}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Jelly Arcade (native) starting headless run...");

    let settings = jelly_arcade::Settings::load();
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or_else(|| settings.seed_or(headless::DEFAULT_SEED));

    for summary in headless::run_all(seed, headless::FRAMES) {
        match serde_json::to_string(&summary) {
            Ok(json) => log::info!("{json}"),
            Err(err) => log::error!("Summary for {} not serializable: {err}", summary.game),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use serde::Serialize;

    use jelly_arcade::input::{Direction, InputEvent, Key};
    use jelly_arcade::persistence::{BestScoreStore, MemoryBackend, ScoreStore};
    use jelly_arcade::platform::ManualScheduler;
    use jelly_arcade::renderer::DrawList;
    use jelly_arcade::session::{FrameLoop, Session, SessionStatus};
    use jelly_arcade::sim::reaction_gate::RoundPhase;
    use jelly_arcade::sim::tiny_runner::RUNNER_X;
    use jelly_arcade::sim::{
        AsteroidState, DodgeState, ReactionState, Readout, RunnerState, Simulation, SnakeState,
    };

    pub const DEFAULT_SEED: u64 = 0x5eed;
    /// About a minute at 60fps
    pub const FRAMES: u32 = 3_600;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    #[derive(Debug, Serialize)]
    pub struct RunSummary {
        pub game: &'static str,
        pub seed: u64,
        pub frames: u64,
        pub status: SessionStatus,
        pub record: Option<f64>,
        pub draw_calls: usize,
        pub readouts: Vec<Readout>,
    }

    /// Scripted player: at most one input event per frame
    trait Autopilot: Simulation {
        fn next_input(&self, frame: u32) -> Option<InputEvent>;
    }

    impl Autopilot for AsteroidState {
        fn next_input(&self, frame: u32) -> Option<InputEvent> {
            if frame % 12 != 0 {
                return None;
            }
            // Every fourth attempt misses on purpose
            match self.target {
                Some(target) if frame % 48 != 0 => Some(InputEvent::PointerDown(target.pos)),
                _ => Some(InputEvent::PointerDown(Vec2::new(2.0, 2.0))),
            }
        }
    }

    impl Autopilot for DodgeState {
        fn next_input(&self, _frame: u32) -> Option<InputEvent> {
            // Drag away from the nearest dot, or back toward the middle
            let center = Vec2::new(self.width / 2.0, self.height / 2.0);
            let goal = self
                .dots
                .iter()
                .min_by(|a, b| {
                    let da = a.pos.distance_squared(self.player.pos);
                    let db = b.pos.distance_squared(self.player.pos);
                    da.total_cmp(&db)
                })
                .filter(|dot| dot.pos.distance(self.player.pos) < 90.0)
                .map(|dot| self.player.pos + (self.player.pos - dot.pos))
                .unwrap_or(center);
            Some(InputEvent::PointerDown(goal))
        }
    }

    impl Autopilot for ReactionState {
        fn next_input(&self, _frame: u32) -> Option<InputEvent> {
            (self.phase == RoundPhase::Signal).then_some(InputEvent::KeyDown(Key::Space))
        }
    }

    impl Autopilot for SnakeState {
        fn next_input(&self, _frame: u32) -> Option<InputEvent> {
            let head = self.head();
            let wanted = if self.food.x > head.x {
                Direction::Right
            } else if self.food.x < head.x {
                Direction::Left
            } else if self.food.y > head.y {
                Direction::Down
            } else {
                Direction::Up
            };
            let dir = if wanted.is_opposite(self.dir) {
                match self.dir {
                    Direction::Left | Direction::Right => Direction::Down,
                    Direction::Up | Direction::Down => Direction::Right,
                }
            } else {
                wanted
            };
            let key = match dir {
                Direction::Up => Key::ArrowUp,
                Direction::Down => Key::ArrowDown,
                Direction::Left => Key::ArrowLeft,
                Direction::Right => Key::ArrowRight,
            };
            Some(InputEvent::KeyDown(key))
        }
    }

    impl Autopilot for RunnerState {
        fn next_input(&self, _frame: u32) -> Option<InputEvent> {
            let lead = self.speed * 0.2;
            self.obstacles
                .iter()
                .any(|o| o.x > RUNNER_X && o.x - RUNNER_X < lead)
                .then_some(InputEvent::KeyDown(Key::Space))
        }
    }

    fn run<G: Autopilot>(seed: u64, frames: u32) -> RunSummary {
        let store: Rc<dyn ScoreStore> = Rc::new(BestScoreStore::new(
            MemoryBackend::new(),
            jelly_arcade::consts::BEST_SCORE_NAMESPACE,
        ));
        let session = Rc::new(RefCell::new(Session::<G>::new(
            G::DESIGN_SIZE.0,
            store,
            seed,
        )));
        let draw_calls = Rc::new(RefCell::new(0usize));

        let scheduler = Rc::new(ManualScheduler::new());
        let ticking = session.clone();
        let counted = draw_calls.clone();
        let frame_loop = FrameLoop::start(scheduler.clone(), move |now| {
            let mut surface = DrawList::new();
            ticking.borrow_mut().frame(now, &mut surface);
            *counted.borrow_mut() = surface.len();
        });

        for frame in 0..frames {
            let now = f64::from(frame) * FRAME_MS;
            let input = session.borrow().state().next_input(frame);
            if let Some(event) = input {
                session.borrow_mut().handle_input(&event, now);
            }
            scheduler.run_frame(now);
            if session.borrow().status() == SessionStatus::GameOver {
                break;
            }
        }
        frame_loop.stop();

        let session = session.borrow();
        let draw_calls = *draw_calls.borrow();
        RunSummary {
            game: G::ID,
            seed,
            frames: frame_loop.frames(),
            status: session.status(),
            record: session.state().record(),
            draw_calls,
            readouts: session.readouts(),
        }
    }

    pub fn run_all(seed: u64, frames: u32) -> Vec<RunSummary> {
        vec![
            run::<AsteroidState>(seed, frames),
            run::<DodgeState>(seed, frames),
            run::<ReactionState>(seed, frames),
            run::<SnakeState>(seed, frames),
            run::<RunnerState>(seed, frames),
        ]
    }
}
