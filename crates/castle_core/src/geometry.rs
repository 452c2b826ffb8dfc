//! Simulation-space geometry.
//!
//! Simulation space is Y-up: a [`Rect`] is anchored at its bottom-left corner
//! and extends `w` to the right and `h` upward. All values are assumed finite;
//! degenerate rectangles (zero or negative size) are not rejected, the overlap
//! test simply evaluates its comparisons on them.

use serde::Deserialize;

/// A simulation-space coordinate (camera focus, spawn points).
pub type Point = glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
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

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y
    }

    pub fn top(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict AABB overlap. Rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x + self.w > other.x
            && other.x + other.w > self.x
            && self.y + self.h > other.y
            && other.y + other.h > self.y
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}
