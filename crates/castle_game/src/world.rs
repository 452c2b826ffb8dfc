//! Per-tick orchestration: menu, player physics, camera, parallax.
//!
//! Every tick runs in this order:
//!   1. menu / pause state machine reads edge-triggered actions
//!   2. while playing: player step (jump, X move + resolve, gravity, Y move + resolve)
//!   3. camera focus follows the player's new hitbox
//!   4. cloud drift (frozen while paused)

use castle_core::input::{Action, InputState};
use castle_core::time::TimeState;
use castle_core::Point;

use crate::camera::{Camera, CameraConfig};
use crate::config::GameConfig;
use crate::frame::FrameSnapshot;
use crate::menu::{GamePhase, Menu, MenuEvent};
use crate::parallax::Parallax;
use crate::player::{PhysicsConfig, Player, PlayerInput, DEFAULT_SPAWN};
use crate::stage::Stage;
use crate::transform::{ScreenTransform, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Quit,
}

pub struct Game {
    pub stage: Stage,
    pub player: Player,
    pub camera: Camera,
    pub transform: ScreenTransform,
    pub viewport: Viewport,
    pub parallax: Parallax,
    pub menu: Menu,
    pub tick_count: u64,
    physics: PhysicsConfig,
    camera_config: CameraConfig,
}

impl Game {
    pub fn new(stage: Stage, config: &GameConfig, screen_w: u32, screen_h: u32) -> Self {
        let viewport = Viewport::fit(screen_w, screen_h, config.camera.logical_height);
        let transform = ScreenTransform::new(screen_w, screen_h, viewport);
        let mut camera = Camera::new(&stage.bounds, viewport, &config.camera);
        let player = Player::spawn_at(spawn_point(&stage), config.physics);
        camera.follow(&player.hitbox);
        log::info!(
            "Stage '{}' ready: {} terrain pieces, spawn at ({:.1}, {:.1})",
            stage.stage_id,
            stage.terrain().len(),
            player.hitbox.x,
            player.hitbox.y
        );
        Self {
            stage,
            player,
            camera,
            transform,
            viewport,
            parallax: Parallax::new(),
            menu: Menu::new(),
            tick_count: 0,
            physics: config.physics,
            camera_config: config.camera,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.menu.phase()
    }

    /// Advance the simulation by exactly one fixed tick.
    pub fn step(&mut self, input: &InputState) -> StepOutcome {
        self.tick_count += 1;

        let was_playing = self.menu.phase() == GamePhase::Playing;
        match self.menu.update(input) {
            MenuEvent::Quit => {
                log::info!("Quit requested at tick {}", self.tick_count);
                return StepOutcome::Quit;
            }
            MenuEvent::StartGame | MenuEvent::ReturnedToMenu => self.reset_player(),
            MenuEvent::None | MenuEvent::Paused | MenuEvent::Resumed => {}
        }

        // The tick that changes phase does not also move the player.
        if was_playing && self.menu.phase() == GamePhase::Playing {
            self.player
                .step(PlayerInput::from_input(input), self.stage.terrain());
            self.camera.follow(&self.player.hitbox);

            if input.is_held(Action::DebugPrintPosition) {
                let pos = self.player.position();
                let c = self.player.contacts;
                log::info!(
                    "tick {}: player at ({:.2}, {:.2}) vy={:.2} grounded={} \
                     contacts l={} r={} d={} u={}",
                    self.tick_count,
                    pos.x,
                    pos.y,
                    self.player.velocity_y,
                    self.player.is_grounded,
                    c.left,
                    c.right,
                    c.down,
                    c.up
                );
            }
        }

        if self.menu.phase() != GamePhase::Paused {
            self.parallax.tick(self.transform.screen_w);
        }

        StepOutcome::Continue
    }

    /// Recompute the logical viewport and transform for a new window size.
    pub fn resize(&mut self, screen_w: u32, screen_h: u32) {
        if screen_w == 0 || screen_h == 0 {
            return;
        }
        self.viewport = Viewport::fit(screen_w, screen_h, self.camera_config.logical_height);
        self.transform = ScreenTransform::new(screen_w, screen_h, self.viewport);
        self.camera.set_viewport(&self.stage.bounds, self.viewport);
        self.camera.follow(&self.player.hitbox);
        log::debug!(
            "Viewport {:.1}x{:.1}, multiplier {:.3}",
            self.viewport.width,
            self.viewport.height,
            self.transform.multiplier
        );
    }

    pub fn reset_player(&mut self) {
        self.player = Player::spawn_at(spawn_point(&self.stage), self.physics);
        self.camera.follow(&self.player.hitbox);
        log::debug!("Player reset to spawn");
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(self)
    }
}

fn spawn_point(stage: &Stage) -> Point {
    stage.spawn.unwrap_or(DEFAULT_SPAWN)
}

/// Run every tick owed by `time`, consuming edge-triggered input after each.
///
/// Edges survive frames that run zero ticks, and a single press is seen by
/// exactly one tick even when a frame catches up several.
pub fn run_frame(game: &mut Game, time: &mut TimeState, input: &mut InputState) -> StepOutcome {
    while time.should_step() {
        let outcome = game.step(input);
        input.end_frame();
        if outcome == StepOutcome::Quit {
            return StepOutcome::Quit;
        }
    }
    StepOutcome::Continue
}
