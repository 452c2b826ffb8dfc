//! Viewport-pinned background layers.
//!
//! Two layers scroll behind the stage, each drawn as a pair of screen-wide
//! tiles placed side by side so the wrap seam is never visible:
//! - the castle backdrop moves opposite to the camera at a fraction of its
//!   speed;
//! - the cloud band drifts left at a constant rate regardless of the camera.

use crate::transform::ScreenRect;

/// Backdrop scroll per simulation unit of camera movement.
pub const BACKGROUND_FACTOR: f32 = 0.22;
/// Cloud drift in pixels per tick.
pub const CLOUD_DRIFT: f32 = 0.35;

#[derive(Debug, Clone, Default)]
pub struct Parallax {
    cloud_x: f32,
}

impl Parallax {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, screen_w: u32) {
        let width = screen_w.max(1) as f32;
        let x = (self.cloud_x - CLOUD_DRIFT).rem_euclid(width);
        // rem_euclid on a tiny negative value can round up to `width` itself.
        self.cloud_x = if x >= width { 0.0 } else { x };
    }

    pub fn cloud_x(&self) -> f32 {
        self.cloud_x
    }

    pub fn background_tiles(
        &self,
        focus_x: f32,
        screen_w: u32,
        screen_h: u32,
    ) -> [ScreenRect; 2] {
        let offset = background_offset(focus_x, screen_w);
        wrapped_tiles(offset, screen_w, screen_h)
    }

    pub fn cloud_tiles(&self, screen_w: u32, screen_h: u32) -> [ScreenRect; 2] {
        wrapped_tiles(self.cloud_x() as i32, screen_w, screen_h)
    }
}

/// Horizontal offset of the backdrop's right tile, in `[0, screen_w)`.
pub fn background_offset(focus_x: f32, screen_w: u32) -> i32 {
    let width = screen_w.max(1) as i32;
    ((-BACKGROUND_FACTOR * focus_x) as i32).rem_euclid(width)
}

fn wrapped_tiles(offset: i32, screen_w: u32, screen_h: u32) -> [ScreenRect; 2] {
    let w = screen_w as i32;
    let h = screen_h as i32;
    [
        ScreenRect {
            x: offset - w,
            y: 0,
            w,
            h,
        },
        ScreenRect {
            x: offset,
            y: 0,
            w,
            h,
        },
    ]
}
