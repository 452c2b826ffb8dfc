use castle_core::input::{Action, InputState};
use castle_core::{Point, Rect};
use serde::Deserialize;

use crate::collision::{resolve_horizontal, resolve_vertical, MoveDir, VerticalContact};
use crate::stage::TerrainPiece;

pub const PLAYER_WIDTH: f32 = 46.0;
pub const PLAYER_HEIGHT: f32 = 94.0;
pub const DEFAULT_SPAWN: Point = Point::new(0.0, -100.0);

/// Per-tick physics constants. Units are simulation units per tick (speeds)
/// and per tick squared (gravity).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub move_speed: f32,
    pub jump_impulse: f32,
    pub gravity: f32,
    /// Terminal velocity; negative.
    pub max_fall_speed: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            move_speed: 3.5,
            jump_impulse: 13.6,
            gravity: 0.6,
            max_fall_speed: -15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Edge-triggered: true only on the tick the jump key went down.
    pub jump_pressed: bool,
}

impl PlayerInput {
    pub fn from_input(input: &InputState) -> Self {
        Self {
            move_left: input.is_held(Action::MoveLeft),
            move_right: input.is_held(Action::MoveRight),
            jump_pressed: input.is_just_pressed(Action::Jump),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactState {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    pub up: bool,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub hitbox: Rect,
    pub velocity_y: f32,
    pub is_grounded: bool,
    pub max_fall_speed: f32,
    pub facing: Facing,
    pub contacts: ContactState,
    pub config: PhysicsConfig,
}

impl Player {
    pub fn new(hitbox: Rect, config: PhysicsConfig) -> Self {
        Self {
            hitbox,
            velocity_y: 0.0,
            is_grounded: false,
            max_fall_speed: config.max_fall_speed,
            facing: Facing::default(),
            contacts: ContactState::default(),
            config,
        }
    }

    pub fn spawn_at(position: Point, config: PhysicsConfig) -> Self {
        Self::new(
            Rect::new(position.x, position.y, PLAYER_WIDTH, PLAYER_HEIGHT),
            config,
        )
    }

    /// Advance one tick: jump, horizontal move + resolve, gravity, vertical
    /// move + resolve.
    pub fn step(&mut self, input: PlayerInput, terrain: &[TerrainPiece]) {
        let mut contacts = ContactState::default();

        // Jump is edge-triggered and only legal from grounded state.
        if input.jump_pressed && self.is_grounded {
            self.velocity_y = self.config.jump_impulse;
            self.is_grounded = false;
            log::debug!("Jump from y={:.1}", self.hitbox.y);
        }

        // Both directions held: right is applied first, then left.
        if input.move_right {
            self.hitbox = self.hitbox.translated(self.config.move_speed, 0.0);
            contacts.right =
                resolve_horizontal(&mut self.hitbox, MoveDir::Right, terrain).is_some();
            self.facing = Facing::Right;
        }
        if input.move_left {
            self.hitbox = self.hitbox.translated(-self.config.move_speed, 0.0);
            contacts.left =
                resolve_horizontal(&mut self.hitbox, MoveDir::Left, terrain).is_some();
            self.facing = Facing::Left;
        }

        self.velocity_y = (self.velocity_y - self.config.gravity).max(self.max_fall_speed);
        self.hitbox = self.hitbox.translated(0.0, self.velocity_y);
        self.is_grounded = false;
        match resolve_vertical(&mut self.hitbox, &mut self.velocity_y, terrain) {
            VerticalContact::Landed(index) => {
                self.is_grounded = true;
                contacts.down = true;
                log::trace!("Grounded on terrain piece {}", index);
            }
            VerticalContact::Ceiling(index) => {
                contacts.up = true;
                log::trace!("Bumped terrain piece {} from below", index);
            }
            VerticalContact::None => {}
        }

        self.contacts = contacts;
    }

    pub fn position(&self) -> Point {
        Point::new(self.hitbox.x, self.hitbox.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_stage() -> Vec<TerrainPiece> {
        vec![TerrainPiece::solid(Rect::new(0.0, 0.0, 800.0, 50.0))]
    }

    fn idle() -> PlayerInput {
        PlayerInput::default()
    }

    fn grounded_player(x: f32) -> Player {
        let mut player = Player::new(
            Rect::new(x, 50.0, PLAYER_WIDTH, PLAYER_HEIGHT),
            PhysicsConfig::default(),
        );
        player.is_grounded = true;
        player
    }

    #[test]
    fn falls_and_lands_on_floor() {
        let terrain = floor_stage();
        let mut player = Player::new(
            Rect::new(0.0, 200.0, 46.0, 94.0),
            PhysicsConfig::default(),
        );
        for _ in 0..120 {
            player.step(idle(), &terrain);
        }
        assert_eq!(player.hitbox.y, 50.0);
        assert!(player.is_grounded);
        assert_eq!(player.velocity_y, 0.0);
        assert!(player.contacts.down);
    }

    #[test]
    fn free_fall_converges_to_terminal_velocity() {
        let mut player = Player::spawn_at(Point::new(0.0, 0.0), PhysicsConfig::default());
        let mut previous = player.velocity_y;
        for tick in 0..100 {
            player.step(idle(), &[]);
            assert!(player.velocity_y >= player.max_fall_speed);
            assert!(player.velocity_y <= previous);
            previous = player.velocity_y;
            if tick >= 30 {
                assert_eq!(player.velocity_y, player.max_fall_speed);
            }
        }
        assert!(!player.is_grounded);
    }

    #[test]
    fn jump_requires_grounded() {
        let mut player = Player::spawn_at(Point::new(0.0, 500.0), PhysicsConfig::default());
        player.is_grounded = false;
        player.step(
            PlayerInput {
                jump_pressed: true,
                ..idle()
            },
            &[],
        );
        assert!(player.velocity_y <= 0.0);
    }

    #[test]
    fn grounded_jump_applies_impulse_then_gravity() {
        let terrain = floor_stage();
        let mut player = grounded_player(100.0);
        player.step(
            PlayerInput {
                jump_pressed: true,
                ..idle()
            },
            &terrain,
        );
        let config = PhysicsConfig::default();
        let expected_velocity = config.jump_impulse - config.gravity;
        assert!((player.velocity_y - expected_velocity).abs() < 1e-5);
        assert!((player.hitbox.y - (50.0 + expected_velocity)).abs() < 1e-4);
        assert!(!player.is_grounded);
    }

    #[test]
    fn jump_arc_returns_to_floor() {
        let terrain = floor_stage();
        let mut player = grounded_player(100.0);
        player.step(
            PlayerInput {
                jump_pressed: true,
                ..idle()
            },
            &terrain,
        );
        let mut peak = player.hitbox.y;
        for _ in 0..120 {
            player.step(idle(), &terrain);
            peak = peak.max(player.hitbox.y);
        }
        assert!(peak > 150.0);
        assert_eq!(player.hitbox.y, 50.0);
        assert!(player.is_grounded);
    }

    #[test]
    fn walking_into_wall_stops_flush() {
        let terrain = vec![
            TerrainPiece::solid(Rect::new(0.0, 0.0, 800.0, 50.0)),
            TerrainPiece::solid(Rect::new(100.0, 50.0, 20.0, 200.0)),
        ];
        let mut player = grounded_player(20.0);
        let right = PlayerInput {
            move_right: true,
            ..idle()
        };
        for _ in 0..60 {
            player.step(right, &terrain);
        }
        assert_eq!(player.hitbox.x, 100.0 - player.hitbox.w);
        assert!(player.contacts.right);
        assert!(player.is_grounded);
        assert_eq!(player.facing, Facing::Right);
    }

    #[test]
    fn moving_left_updates_facing() {
        let terrain = floor_stage();
        let mut player = grounded_player(200.0);
        player.step(
            PlayerInput {
                move_left: true,
                ..idle()
            },
            &terrain,
        );
        assert_eq!(player.facing, Facing::Left);
        assert_eq!(player.hitbox.x, 196.5);
    }

    #[test]
    fn holding_both_directions_cancels_and_faces_left() {
        let terrain = floor_stage();
        let mut player = grounded_player(200.0);
        player.step(
            PlayerInput {
                move_left: true,
                move_right: true,
                jump_pressed: false,
            },
            &terrain,
        );
        assert_eq!(player.hitbox.x, 200.0);
        assert_eq!(player.facing, Facing::Left);
    }

    #[test]
    fn head_bump_zeroes_upward_velocity() {
        let terrain = vec![
            TerrainPiece::solid(Rect::new(0.0, 0.0, 800.0, 50.0)),
            TerrainPiece::solid(Rect::new(0.0, 150.0, 800.0, 20.0)),
        ];
        let mut player = grounded_player(100.0);
        player.step(
            PlayerInput {
                jump_pressed: true,
                ..idle()
            },
            &terrain,
        );
        assert_eq!(player.hitbox.y, 150.0 - PLAYER_HEIGHT);
        assert_eq!(player.velocity_y, 0.0);
        assert!(player.contacts.up);
        assert!(!player.is_grounded);
    }

    #[test]
    fn walking_off_a_ledge_ungrounds() {
        let terrain = vec![TerrainPiece::solid(Rect::new(0.0, 0.0, 100.0, 50.0))];
        let mut player = grounded_player(60.0);
        let right = PlayerInput {
            move_right: true,
            ..idle()
        };
        for _ in 0..30 {
            player.step(right, &terrain);
        }
        assert!(!player.is_grounded);
        assert!(player.hitbox.y < 50.0);
    }

    #[test]
    fn player_input_reads_held_and_edge_state() {
        let mut input = InputState::new();
        input.press(Action::MoveRight);
        input.press(Action::Jump);
        let snapshot = PlayerInput::from_input(&input);
        assert!(snapshot.move_right);
        assert!(snapshot.jump_pressed);
        assert!(!snapshot.move_left);

        input.end_frame();
        let held_only = PlayerInput::from_input(&input);
        assert!(held_only.move_right);
        assert!(!held_only.jump_pressed);
    }
}
