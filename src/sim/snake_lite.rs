//! SnakeLite: grid snake on a fixed 24x16 board
//!
//! The snake moves one cell per step interval, which shrinks by 4ms per food
//! down to 70ms. Direction changes are queued and applied on the next move;
//! reversing onto the neck is rejected.

use std::collections::VecDeque;

use rand::Rng;
use serde::Serialize;

use super::{Clock, GameRng, Playfield, Readout, Simulation, seeded_rng};
use crate::clamp_delta;
use crate::highscores::RecordOrder;
use crate::input::{Direction, InputEvent, swipe_direction};
use crate::renderer::{Surface, scenes};

pub const DEFAULT_COLS: i32 = 24;
pub const DEFAULT_ROWS: i32 = 16;
pub const INITIAL_LENGTH: usize = 3;
pub const BASE_STEP_MS: f32 = 160.0;
pub const MIN_STEP_MS: f32 = 70.0;
const STEP_SPEEDUP_PER_FOOD: f32 = 4.0;
const MIN_GRID: i32 = 4;

/// A grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn neighbor(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Move interval for a given score
pub fn step_interval(score: u32) -> f32 {
    (BASE_STEP_MS - score as f32 * STEP_SPEEDUP_PER_FOOD).max(MIN_STEP_MS)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnakeState {
    pub width: f32,
    pub height: f32,
    pub cols: i32,
    pub rows: i32,
    /// Head first
    pub snake: VecDeque<Cell>,
    pub dir: Direction,
    pub queued_dir: Direction,
    pub food: Cell,
    pub score: u32,
    pub game_over: bool,
    pub move_cooldown_ms: f32,
    #[serde(skip)]
    rng: GameRng,
}

impl SnakeState {
    pub fn new(field: Playfield, seed: u64) -> Self {
        Self::with_grid(field, DEFAULT_COLS, DEFAULT_ROWS, seed)
    }

    pub fn with_grid(field: Playfield, cols: i32, rows: i32, seed: u64) -> Self {
        let cols = cols.max(MIN_GRID);
        let rows = rows.max(MIN_GRID);
        let (cx, cy) = (cols / 2, rows / 2);
        let snake = (0..INITIAL_LENGTH as i32)
            .map(|i| Cell::new(cx - i, cy))
            .collect();

        let mut state = Self {
            width: field.width,
            height: field.height,
            cols,
            rows,
            snake,
            dir: Direction::Right,
            queued_dir: Direction::Right,
            food: Cell::new(0, 0),
            score: 0,
            game_over: false,
            move_cooldown_ms: BASE_STEP_MS,
            rng: seeded_rng(seed),
        };
        if let Some(food) = state.spawn_food() {
            state.food = food;
        }
        state
    }

    pub fn head(&self) -> Cell {
        // Never empty: built with INITIAL_LENGTH cells and only ever grows
        self.snake[0]
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.snake.contains(&cell)
    }

    fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.cols && cell.y < self.rows
    }

    /// Uniform pick among free cells; `None` once the board is full
    fn spawn_food(&mut self) -> Option<Cell> {
        let free: Vec<Cell> = (0..self.rows)
            .flat_map(|y| (0..self.cols).map(move |x| Cell::new(x, y)))
            .filter(|c| !self.snake.contains(c))
            .collect();
        if free.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..free.len());
        Some(free[index])
    }
}

/// Queue a turn for the next move; reversals are rejected
pub fn queue_direction(state: SnakeState, dir: Direction) -> SnakeState {
    if state.game_over || dir.is_opposite(state.dir) {
        return state;
    }
    SnakeState {
        queued_dir: dir,
        ..state
    }
}

/// Count down to the next move and perform it when due
pub fn step(state: SnakeState, delta_ms: f32) -> SnakeState {
    if state.game_over {
        return state;
    }
    let mut next = state;
    next.move_cooldown_ms -= clamp_delta(delta_ms);
    if next.move_cooldown_ms > 0.0 {
        return next;
    }

    if !next.queued_dir.is_opposite(next.dir) {
        next.dir = next.queued_dir;
    }
    next.move_cooldown_ms = step_interval(next.score);

    let head = next.head().neighbor(next.dir);
    if !next.in_bounds(head) || next.occupies(head) {
        next.game_over = true;
        return next;
    }

    next.snake.push_front(head);
    if head != next.food {
        next.snake.pop_back();
        return next;
    }

    next.score += 1;
    match next.spawn_food() {
        Some(food) => next.food = food,
        None => {
            log::info!("snake filled the board at score {}", next.score);
            next.game_over = true;
        }
    }
    next
}

/// Pointer position where a swipe started
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SnakeInput {
    swipe_start: Option<glam::Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeAction {
    Turn(Direction),
}

impl Simulation for SnakeState {
    type Input = SnakeInput;
    type Action = SnakeAction;

    const ID: &'static str = "snake-lite";
    const DESIGN_SIZE: (f32, f32) = (720.0, 420.0);
    const RECORD_ORDER: RecordOrder = RecordOrder::HigherIsBetter;

    fn create(field: Playfield, seed: u64) -> Self {
        SnakeState::new(field, seed)
    }

    fn step(self, _input: &SnakeInput, clock: Clock) -> Self {
        step(self, clock.delta_ms)
    }

    fn apply(self, action: SnakeAction, _clock: Clock) -> Self {
        match action {
            SnakeAction::Turn(dir) => queue_direction(self, dir),
        }
    }

    fn interpret(&self, input: &mut SnakeInput, event: &InputEvent) -> Option<SnakeAction> {
        match *event {
            InputEvent::KeyDown(key) => key.direction().map(SnakeAction::Turn),
            InputEvent::PointerDown(pos) => {
                input.swipe_start = Some(pos);
                None
            }
            InputEvent::PointerUp(end) => {
                // A release too short to count keeps the start point
                let dir = swipe_direction(input.swipe_start?, end)?;
                input.swipe_start = None;
                Some(SnakeAction::Turn(dir))
            }
            InputEvent::PointerCancel => {
                input.swipe_start = None;
                None
            }
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
            Readout::new("length", self.snake.len().to_string()),
        ]
    }

    fn draw(&self, surface: &mut dyn Surface) {
        scenes::draw_snake_lite(surface, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use glam::Vec2;
    use proptest::prelude::*;

    const FIELD: Playfield = Playfield::new(720.0, 420.0);

    /// Run exactly one move
    fn advance(state: SnakeState) -> SnakeState {
        step(
            SnakeState {
                move_cooldown_ms: 0.0,
                ..state
            },
            0.0,
        )
    }

    #[test]
    fn test_initial_state() {
        let state = SnakeState::new(FIELD, 5);
        assert_eq!(state.snake.len(), INITIAL_LENGTH);
        assert_eq!(state.head(), Cell::new(12, 8));
        assert_eq!(state.snake[2], Cell::new(10, 8));
        assert_eq!(state.dir, Direction::Right);
        assert!(!state.occupies(state.food));
        assert!(state.in_bounds(state.food));
    }

    #[test]
    fn test_moves_on_interval_only() {
        let mut state = SnakeState::new(FIELD, 5);
        state.food = Cell::new(0, 0);
        let state = step(state, 40.0);
        assert_eq!(state.head(), Cell::new(12, 8));
        assert_eq!(state.move_cooldown_ms, BASE_STEP_MS - 40.0);

        let mut state = state;
        for _ in 0..3 {
            state = step(state, 40.0);
        }
        assert_eq!(state.head(), Cell::new(13, 8));
        assert_eq!(state.snake.len(), INITIAL_LENGTH);
        assert_eq!(state.move_cooldown_ms, BASE_STEP_MS);
    }

    #[test]
    fn test_eating_grows_and_relocates_food() {
        let mut state = SnakeState::new(FIELD, 5);
        state.food = Cell::new(13, 8);
        let state = advance(state);
        assert_eq!(state.snake.len(), INITIAL_LENGTH + 1);
        assert_eq!(state.score, 1);
        assert_ne!(state.food, Cell::new(13, 8));
        assert!(!state.occupies(state.food));
        assert_eq!(state.move_cooldown_ms, step_interval(0));
    }

    #[test]
    fn test_reversal_is_rejected() {
        let state = SnakeState::new(FIELD, 5);
        let queued = queue_direction(state.clone(), Direction::Left);
        assert_eq!(queued.queued_dir, Direction::Right);
        assert_eq!(queued, state);

        let turned = queue_direction(state, Direction::Up);
        assert_eq!(turned.queued_dir, Direction::Up);
        let moved = advance(turned);
        assert_eq!(moved.dir, Direction::Up);
        assert_eq!(moved.head(), Cell::new(12, 7));
    }

    #[test]
    fn test_wall_collision_ends_game() {
        let mut state = SnakeState::new(FIELD, 5);
        state.food = Cell::new(0, 0);
        while !state.game_over {
            state = advance(state);
        }
        // Crashed into the right wall without moving off the board
        assert_eq!(state.head(), Cell::new(DEFAULT_COLS - 1, 8));
        assert_eq!(step(state.clone(), 40.0), state);
        assert_eq!(queue_direction(state.clone(), Direction::Up), state);
    }

    #[test]
    fn test_self_collision_ends_game() {
        let mut state = SnakeState::new(FIELD, 5);
        state.snake = VecDeque::from(vec![
            Cell::new(5, 5),
            Cell::new(4, 5),
            Cell::new(4, 6),
            Cell::new(5, 6),
            Cell::new(6, 6),
        ]);
        state.food = Cell::new(0, 0);
        let state = queue_direction(state, Direction::Down);
        let state = advance(state);
        assert!(state.game_over);
    }

    #[test]
    fn test_step_interval_is_capped() {
        assert_eq!(step_interval(0), 160.0);
        assert_eq!(step_interval(10), 120.0);
        assert_eq!(step_interval(1000), MIN_STEP_MS);
    }

    #[test]
    fn test_full_board_ends_game() {
        let mut state = SnakeState::with_grid(FIELD, 4, 4, 1);
        // Fill every cell except the one in front of the head
        state.snake = (0..4)
            .flat_map(|y| (0..4).map(move |x| Cell::new(x, y)))
            .filter(|c| *c != Cell::new(3, 0))
            .collect();
        state.snake.retain(|c| *c != Cell::new(2, 0));
        state.snake.push_front(Cell::new(2, 0));
        state.food = Cell::new(3, 0);
        let state = advance(state);
        assert_eq!(state.score, 1);
        assert!(state.game_over);
    }

    #[test]
    fn test_interpret_keys_and_swipes() {
        let state = SnakeState::new(FIELD, 5);
        let mut input = SnakeInput::default();
        assert_eq!(
            state.interpret(&mut input, &InputEvent::KeyDown(Key::S)),
            Some(SnakeAction::Turn(Direction::Down))
        );
        assert_eq!(state.interpret(&mut input, &InputEvent::KeyDown(Key::Space)), None);

        let start = Vec2::new(100.0, 100.0);
        assert_eq!(state.interpret(&mut input, &InputEvent::PointerDown(start)), None);
        // Too short to count; the start point survives
        assert_eq!(
            state.interpret(&mut input, &InputEvent::PointerUp(start + Vec2::new(5.0, 5.0))),
            None
        );
        assert_eq!(input.swipe_start, Some(start));
        assert_eq!(
            state.interpret(&mut input, &InputEvent::PointerUp(start + Vec2::new(-40.0, 8.0))),
            Some(SnakeAction::Turn(Direction::Left))
        );
        // Swipe consumed
        assert_eq!(
            state.interpret(&mut input, &InputEvent::PointerUp(start + Vec2::new(0.0, 40.0))),
            None
        );
    }

    proptest! {
        #[test]
        fn prop_food_never_on_snake(
            seed in any::<u64>(),
            turns in prop::collection::vec((0u8..4, 0.0f32..100.0), 1..400),
        ) {
            let mut state = SnakeState::new(FIELD, seed);
            for (turn, delta) in turns {
                let dir = match turn {
                    0 => Direction::Up,
                    1 => Direction::Down,
                    2 => Direction::Left,
                    _ => Direction::Right,
                };
                let before = state.dir;
                let queued = queue_direction(state.clone(), dir);
                if dir.is_opposite(before) {
                    prop_assert_eq!(queued.queued_dir, state.queued_dir);
                }
                let len = queued.snake.len();
                let score = queued.score;
                state = step(queued, delta);
                if state.game_over {
                    break;
                }
                prop_assert!(!state.occupies(state.food));
                prop_assert_eq!(state.snake.len() - INITIAL_LENGTH, state.score as usize);
                prop_assert!(state.snake.len() == len || state.snake.len() == len + 1);
                prop_assert!(state.score >= score);
            }
        }
    }
}
