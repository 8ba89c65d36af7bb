//! Input normalization
//!
//! The platform layer translates DOM events into [`InputEvent`]s with
//! playfield-local coordinates; each game maps those onto held input or
//! discrete actions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Pointer travel (px, Manhattan) below which a release is a tap, not a swipe
pub const SWIPE_MIN_DISTANCE: f32 = 16.0;
/// Pointer offset (px, per axis) ignored when steering toward the pointer
pub const STEER_DEAD_ZONE: f32 = 6.0;

/// Cardinal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Unit grid offset (y grows downward)
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Keys the games bind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    W,
    A,
    S,
    D,
    Space,
    Enter,
}

impl Key {
    /// Normalize a DOM `KeyboardEvent` (`key`, `code`) pair
    pub fn from_dom(key: &str, code: &str) -> Option<Self> {
        if code == "Space" {
            return Some(Key::Space);
        }
        match key {
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "w" | "W" => Some(Key::W),
            "a" | "A" => Some(Key::A),
            "s" | "S" => Some(Key::S),
            "d" | "D" => Some(Key::D),
            " " | "Spacebar" => Some(Key::Space),
            "Enter" => Some(Key::Enter),
            _ => None,
        }
    }

    /// Movement binding (arrows and WASD)
    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::ArrowUp | Key::W => Some(Direction::Up),
            Key::ArrowDown | Key::S => Some(Direction::Down),
            Key::ArrowLeft | Key::A => Some(Direction::Left),
            Key::ArrowRight | Key::D => Some(Direction::Right),
            Key::Space | Key::Enter => None,
        }
    }
}

/// A normalized input event in playfield-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    PointerDown(Vec2),
    /// `primary` is true while the primary button is held
    PointerMove { pos: Vec2, primary: bool },
    PointerUp(Vec2),
    PointerCancel,
}

/// Held directional input (keys or pointer drag)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Steer {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Steer {
    pub fn set(&mut self, dir: Direction, held: bool) {
        match dir {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }

    /// Steer from `from` toward `to`, ignoring small offsets
    pub fn toward(from: Vec2, to: Vec2) -> Self {
        let d = to - from;
        Self {
            up: d.y < -STEER_DEAD_ZONE,
            down: d.y > STEER_DEAD_ZONE,
            left: d.x < -STEER_DEAD_ZONE,
            right: d.x > STEER_DEAD_ZONE,
        }
    }

    /// Axis values in {-1, 0, 1}
    pub fn axis(&self) -> Vec2 {
        let x = f32::from(u8::from(self.right)) - f32::from(u8::from(self.left));
        let y = f32::from(u8::from(self.down)) - f32::from(u8::from(self.up));
        Vec2::new(x, y)
    }
}

/// Classify a pointer drag as a swipe along its dominant axis
pub fn swipe_direction(start: Vec2, end: Vec2) -> Option<Direction> {
    let d = end - start;
    if d.x.abs() + d.y.abs() < SWIPE_MIN_DISTANCE {
        return None;
    }
    if d.x.abs() > d.y.abs() {
        Some(if d.x > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        })
    } else {
        Some(if d.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }
}
