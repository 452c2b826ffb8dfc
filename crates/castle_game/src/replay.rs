use crate::player::PlayerInput;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    pub stage: Option<String>,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub jump_pressed: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    /// One `PlayerInput` per tick. A jump press only lands on the first tick
    /// of its run so a repeated frame behaves like a held key.
    pub fn expanded_inputs(&self) -> Vec<PlayerInput> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for i in 0..frame.repeat.max(1) {
                out.push(PlayerInput {
                    move_left: frame.left,
                    move_right: frame.right,
                    jump_pressed: frame.jump_pressed && i == 0,
                });
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PhysicsConfig, Player};
    use crate::stage::{load_stage_from_path, Stage, StageBounds, TerrainPiece};
    use castle_core::{Point, Rect};
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "castle_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn asset_path(relative: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../..")
            .join(relative)
    }

    fn sample_stage() -> Stage {
        Stage::new(
            "replay",
            StageBounds::default(),
            vec![
                TerrainPiece::solid(Rect::new(-800.0, -325.0, 1600.0, 100.0)),
                TerrainPiece::solid(Rect::new(150.0, -225.0, 200.0, 40.0)),
                TerrainPiece::solid(Rect::new(500.0, -225.0, 40.0, 400.0)),
            ],
        )
    }

    fn run(stage: &Stage, inputs: &[PlayerInput]) -> Player {
        let mut player = Player::spawn_at(Point::new(0.0, -100.0), PhysicsConfig::default());
        for input in inputs {
            player.step(*input, stage.terrain());
        }
        player
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "right": true, "repeat": 3 },
                { "jump_pressed": true, "repeat": 2 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 5);
        assert!(expanded[0].move_right);
        assert!(expanded[3].jump_pressed);
        assert!(!expanded[4].jump_pressed);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn empty_replay_is_rejected() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty replay should fail");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let path = temp_file_path("deterministic");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "repeat": 40 },
                { "right": true, "repeat": 30 },
                { "right": true, "jump_pressed": true, "repeat": 1 },
                { "right": true, "repeat": 120 },
                { "left": true, "repeat": 45 },
                { "left": true, "right": true, "repeat": 10 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let inputs = replay.expanded_inputs();
        let stage = sample_stage();

        let run_a = run(&stage, &inputs);
        let run_b = run(&stage, &inputs);

        assert_eq!(run_a.hitbox, run_b.hitbox);
        assert_eq!(run_a.velocity_y, run_b.velocity_y);
        assert_eq!(run_a.is_grounded, run_b.is_grounded);
        assert_eq!(run_a.facing, run_b.facing);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn shipped_replay_stays_inside_shipped_stage() {
        let stage = load_stage_from_path(&asset_path("assets/stages/stage1.json"))
            .expect("shipped stage should load");
        let replay = load_replay_from_path(&asset_path("assets/replays/stage1_walk.json"))
            .expect("shipped replay should load");
        assert_eq!(replay.stage.as_deref(), Some(stage.stage_id.as_str()));

        let spawn = stage.spawn.unwrap_or(crate::player::DEFAULT_SPAWN);
        let mut player = Player::spawn_at(spawn, PhysicsConfig::default());
        for input in replay.expanded_inputs() {
            player.step(input, stage.terrain());
            assert!(player.hitbox.y >= stage.bounds.bottom);
            assert!(!stage
                .terrain()
                .iter()
                .any(|piece| piece.rect.overlaps(&player.hitbox)));
        }
        assert!(player.is_grounded);
    }
}
