//! Logical input state with both edge-triggered and level-triggered queries.
//!
//! The window layer maps physical keys onto [`Action`]s; the simulation only
//! ever sees actions.
//!
//! - **Level-triggered (held):** `is_held(action)` is true every frame the
//!   action's key is down. Used for continuous movement and the debug print.
//!
//! - **Edge-triggered (just_pressed / just_released):** true only for the frame
//!   the transition happened. Cleared by `end_frame()`, which the main loop
//!   calls after each fixed simulation step, so a press landing on a frame
//!   with zero steps is not lost and catch-up steps see it only once. Jump
//!   initiation and menu navigation read these so holding a key never
//!   repeat-fires.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Pause,
    MenuUp,
    MenuDown,
    MenuConfirm,
    Quit,
    DebugPrintPosition,
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Action>,
    just_pressed: HashSet<Action>,
    just_released: HashSet<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        if self.held.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    pub fn release(&mut self, action: Action) {
        if self.held.remove(&action) {
            self.just_released.insert(action);
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn is_just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    pub fn is_just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    /// Drop every held action, e.g. when the window loses focus and key-up
    /// events will never arrive.
    pub fn release_all(&mut self) {
        let held: Vec<Action> = self.held.drain().collect();
        self.just_released.extend(held);
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}
