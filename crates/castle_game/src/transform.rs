//! Simulation space → screen space.
//!
//! Simulation space is Y-up with rectangles anchored bottom-left; screen space
//! is Y-down in integer pixels with rectangles anchored top-left. The camera
//! focus maps to the centre of the window.
//!
//! The logical viewport keeps a fixed height and takes its width from the
//! window's aspect ratio, so one multiplier serves both axes and nothing is
//! stretched.

use castle_core::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Logical viewport for a `screen_w` × `screen_h` window.
    pub fn fit(screen_w: u32, screen_h: u32, logical_height: f32) -> Self {
        let width = logical_height * screen_w.max(1) as f32 / screen_h.max(1) as f32;
        Self {
            width,
            height: logical_height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTransform {
    pub screen_w: u32,
    pub screen_h: u32,
    /// Pixels per simulation unit.
    pub multiplier: f32,
}

impl ScreenTransform {
    pub fn new(screen_w: u32, screen_h: u32, viewport: Viewport) -> Self {
        Self {
            screen_w,
            screen_h,
            multiplier: screen_w as f32 / viewport.width,
        }
    }

    pub fn to_screen(&self, rect: &Rect, focus: Point) -> ScreenRect {
        let m = self.multiplier;
        let w = (rect.w * m) as i32;
        let h = (rect.h * m) as i32;
        let x = self.game_x_to_window_x(rect.x - focus.x);
        let y = self.game_y_to_window_y(rect.y - focus.y) - h;
        ScreenRect { x, y, w, h }
    }

    /// Transform for layers pinned to the viewport (backgrounds, menus).
    pub fn to_screen_static(&self, rect: &Rect) -> ScreenRect {
        self.to_screen(rect, Point::ZERO)
    }

    fn game_x_to_window_x(&self, game_x: f32) -> i32 {
        (game_x * self.multiplier + (self.screen_w / 2) as f32).round() as i32
    }

    fn game_y_to_window_y(&self, game_y: f32) -> i32 {
        (-game_y * self.multiplier).round() as i32 + (self.screen_h / 2) as i32
    }
}
