//! Camera focus: a clamped point derived from the player every tick.
//!
//! The focus follows the horizontal centre of the player's hitbox and a point
//! `vertical_offset` above its feet. It is clamped so that the logical viewport
//! centred on it never shows anything outside the stage bounds. When the stage
//! is smaller than the viewport on an axis, that axis is pinned to the stage
//! midpoint instead.

use castle_core::{Point, Rect};
use serde::Deserialize;

use crate::stage::StageBounds;
use crate::transform::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Logical viewport height in simulation units. The width follows the
    /// window aspect ratio.
    pub logical_height: f32,
    pub vertical_offset: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            logical_height: 450.0,
            vertical_offset: 80.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl CameraBounds {
    pub fn new(stage: &StageBounds, viewport: Viewport) -> Self {
        let (left, right) = inset(stage.left, stage.right, viewport.width / 2.0);
        let (bottom, top) = inset(stage.bottom, stage.top, viewport.height / 2.0);
        Self {
            left,
            right,
            bottom,
            top,
        }
    }
}

fn inset(min: f32, max: f32, half_extent: f32) -> (f32, f32) {
    let lo = min + half_extent;
    let hi = max - half_extent;
    if lo <= hi {
        (lo, hi)
    } else {
        let mid = (min + max) / 2.0;
        (mid, mid)
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub bounds: CameraBounds,
    pub vertical_offset: f32,
    pub focus: Point,
}

impl Camera {
    pub fn new(stage: &StageBounds, viewport: Viewport, config: &CameraConfig) -> Self {
        let bounds = CameraBounds::new(stage, viewport);
        Self {
            bounds,
            vertical_offset: config.vertical_offset,
            focus: Point::new(bounds.left, bounds.bottom),
        }
    }

    /// Recompute bounds after the logical viewport changed (window resize).
    pub fn set_viewport(&mut self, stage: &StageBounds, viewport: Viewport) {
        self.bounds = CameraBounds::new(stage, viewport);
        self.focus = Point::new(
            self.focus.x.clamp(self.bounds.left, self.bounds.right),
            self.focus.y.clamp(self.bounds.bottom, self.bounds.top),
        );
    }

    pub fn follow(&mut self, hitbox: &Rect) {
        self.focus = focus_for(hitbox, &self.bounds, self.vertical_offset);
    }
}

pub fn focus_for(hitbox: &Rect, bounds: &CameraBounds, vertical_offset: f32) -> Point {
    Point::new(
        hitbox.center().x.clamp(bounds.left, bounds.right),
        (hitbox.y + vertical_offset).clamp(bounds.bottom, bounds.top),
    )
}
