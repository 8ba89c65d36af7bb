//! Collision primitives shared by the engines
//!
//! Circles are compared with squared distances so no square root is taken on
//! the hot path. Rectangles use strict overlap: touching edges do not collide.

use glam::Vec2;
use serde::Serialize;

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict AABB overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Circle-circle overlap (touching counts as a hit)
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a.distance_squared(b) <= reach * reach
}

/// Point inside (or on the rim of) a circle
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) <= radius * radius
}

/// Clamp a coordinate so a circle of `radius` stays inside `[0, extent]`.
///
/// When the extent is narrower than the circle the lower bound wins, so the
/// result is always defined.
#[inline]
pub fn clamp_to_extent(value: f32, radius: f32, extent: f32) -> f32 {
    value.min(extent - radius).max(radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circles_overlap() {
        let a = Vec2::new(0.0, 0.0);
        assert!(circles_overlap(a, 10.0, Vec2::new(15.0, 0.0), 6.0));
        // Exactly touching
        assert!(circles_overlap(a, 10.0, Vec2::new(16.0, 0.0), 6.0));
        assert!(!circles_overlap(a, 10.0, Vec2::new(16.1, 0.0), 6.0));
        // Diagonal: distance sqrt(200) ~ 14.14
        assert!(circles_overlap(a, 10.0, Vec2::new(10.0, 10.0), 4.2));
        assert!(!circles_overlap(a, 10.0, Vec2::new(10.0, 10.0), 4.0));
    }

    #[test]
    fn test_point_in_circle() {
        let c = Vec2::new(100.0, 100.0);
        assert!(point_in_circle(Vec2::new(100.0, 120.0), c, 20.0));
        assert!(!point_in_circle(Vec2::new(100.0, 121.0), c, 20.0));
    }

    #[test]
    fn test_rect_overlap() {
        let runner = Rect::new(56.0, 292.0, 24.0, 26.0);
        assert!(runner.overlaps(&Rect::new(70.0, 280.0, 20.0, 40.0)));
        // Sharing an edge is not an overlap
        assert!(!runner.overlaps(&Rect::new(80.0, 280.0, 20.0, 40.0)));
        assert!(!runner.overlaps(&Rect::new(60.0, 250.0, 20.0, 42.0)));
    }

    #[test]
    fn test_clamp_to_extent() {
        assert_eq!(clamp_to_extent(-5.0, 10.0, 720.0), 10.0);
        assert_eq!(clamp_to_extent(800.0, 10.0, 720.0), 710.0);
        assert_eq!(clamp_to_extent(300.0, 10.0, 720.0), 300.0);
        // Degenerate extent
        assert_eq!(clamp_to_extent(3.0, 10.0, 12.0), 10.0);
    }
}
