//! Stage data: the static terrain a level is built from.
//!
//! Terrain is loaded once at stage start and never mutated. Pieces are kept in
//! file order because collision resolution takes the first overlapping piece.
//!
//! The file stores each piece as closed extents `l..=r` × `b..=t`, so a piece
//! from `l: 0` to `r: 99` is 100 units wide.

use castle_core::{Point, Rect};
use serde::Deserialize;
use std::fs;
use std::path::Path;

const STAGE_VERSION: &str = "0.1";

#[derive(Debug, Deserialize, Clone)]
pub struct StageFile {
    pub version: String,
    pub stage_id: String,
    #[serde(default)]
    pub bounds: StageBounds,
    #[serde(default)]
    pub spawn: Option<SpawnPoint>,
    pub terrain: Vec<TerrainRecord>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct StageBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl Default for StageBounds {
    fn default() -> Self {
        Self {
            left: -800.0,
            right: 800.0,
            bottom: -325.0,
            top: 400.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TerrainRecord {
    pub l: f32,
    pub b: f32,
    pub r: f32,
    pub t: f32,
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub repeat: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TerrainPiece {
    pub rect: Rect,
    /// Opaque to the simulation; the render layer decides what it means.
    pub texture: Option<String>,
    pub repeat: bool,
}

#[cfg(test)]
impl TerrainPiece {
    pub fn solid(rect: Rect) -> Self {
        Self {
            rect,
            texture: None,
            repeat: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Stage {
    pub stage_id: String,
    pub bounds: StageBounds,
    pub spawn: Option<Point>,
    terrain: Vec<TerrainPiece>,
}

impl Stage {
    pub fn new(stage_id: &str, bounds: StageBounds, terrain: Vec<TerrainPiece>) -> Self {
        Self {
            stage_id: stage_id.to_string(),
            bounds,
            spawn: None,
            terrain,
        }
    }

    pub fn from_file(file: StageFile) -> Self {
        let terrain = file
            .terrain
            .into_iter()
            .map(|record| TerrainPiece {
                rect: Rect::new(
                    record.l,
                    record.b,
                    record.r - record.l + 1.0,
                    record.t - record.b + 1.0,
                ),
                texture: record.texture,
                repeat: record.repeat,
            })
            .collect();
        let mut stage = Self::new(&file.stage_id, file.bounds, terrain);
        stage.spawn = file.spawn.map(|s| Point::new(s.x, s.y));
        stage
    }

    pub fn terrain(&self) -> &[TerrainPiece] {
        &self.terrain
    }
}

pub fn load_stage_from_path(path: &Path) -> Result<Stage, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let file: StageFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse stage JSON {}: {e}", path.display()))?;
    validate_stage_file(&file)?;
    Ok(Stage::from_file(file))
}

fn validate_stage_file(file: &StageFile) -> Result<(), String> {
    if file.version != STAGE_VERSION {
        return Err(format!(
            "Stage validation failed: unsupported version '{}'",
            file.version
        ));
    }
    if file.stage_id.is_empty() {
        return Err("Stage validation failed: stage_id is empty".to_string());
    }
    let b = &file.bounds;
    if ![b.left, b.right, b.bottom, b.top].iter().all(|v| v.is_finite()) {
        return Err("Stage validation failed: bounds must be finite".to_string());
    }
    if b.right <= b.left || b.top <= b.bottom {
        return Err("Stage validation failed: bounds are inverted or empty".to_string());
    }
    if let Some(spawn) = &file.spawn {
        if !spawn.x.is_finite() || !spawn.y.is_finite() {
            return Err("Stage validation failed: spawn must be finite".to_string());
        }
    }
    if file.terrain.is_empty() {
        return Err("Stage validation failed: terrain list is empty".to_string());
    }
    for (i, piece) in file.terrain.iter().enumerate() {
        if ![piece.l, piece.b, piece.r, piece.t]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(format!(
                "Stage validation failed: terrain piece {} has non-finite extents",
                i
            ));
        }
        if piece.r < piece.l || piece.t < piece.b {
            return Err(format!(
                "Stage validation failed: terrain piece {} has inverted extents",
                i
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "castle_stage_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn load_stage_valid_file_parses() {
        let path = temp_file_path("valid");
        fs::write(
            &path,
            r#"{
              "version": "0.1",
              "stage_id": "test",
              "bounds": { "left": -400, "right": 400, "bottom": -200, "top": 300 },
              "spawn": { "x": 10, "y": 20 },
              "terrain": [
                { "l": -400, "b": -200, "r": 399, "t": -151, "texture": "stone", "repeat": true },
                { "l": 100, "b": -150, "r": 149, "t": -101 }
              ]
            }"#,
        )
        .expect("write temp file");

        let stage = load_stage_from_path(&path).expect("valid stage should load");
        assert_eq!(stage.stage_id, "test");
        assert_eq!(stage.bounds.left, -400.0);
        assert_eq!(stage.spawn, Some(Point::new(10.0, 20.0)));
        assert_eq!(stage.terrain().len(), 2);

        let floor = &stage.terrain()[0];
        assert_eq!(floor.rect, Rect::new(-400.0, -200.0, 800.0, 50.0));
        assert_eq!(floor.texture.as_deref(), Some("stone"));
        assert!(floor.repeat);

        let block = &stage.terrain()[1];
        assert_eq!(block.rect, Rect::new(100.0, -150.0, 50.0, 50.0));
        assert!(block.texture.is_none());
        assert!(!block.repeat);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_stage_defaults_bounds_and_spawn() {
        let path = temp_file_path("defaults");
        fs::write(
            &path,
            r#"{
              "version": "0.1",
              "stage_id": "test",
              "terrain": [{ "l": 0, "b": 0, "r": 9, "t": 9 }]
            }"#,
        )
        .expect("write temp file");

        let stage = load_stage_from_path(&path).expect("stage should load");
        assert_eq!(stage.bounds, StageBounds::default());
        assert!(stage.spawn.is_none());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_stage_preserves_terrain_order() {
        let path = temp_file_path("order");
        fs::write(
            &path,
            r#"{
              "version": "0.1",
              "stage_id": "test",
              "terrain": [
                { "l": 50, "b": 0, "r": 59, "t": 9 },
                { "l": 0, "b": 0, "r": 9, "t": 9 },
                { "l": 25, "b": 0, "r": 34, "t": 9 }
              ]
            }"#,
        )
        .expect("write temp file");

        let stage = load_stage_from_path(&path).expect("stage should load");
        let xs: Vec<f32> = stage.terrain().iter().map(|p| p.rect.x).collect();
        assert_eq!(xs, vec![50.0, 0.0, 25.0]);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_stage_rejects_inverted_piece() {
        let path = temp_file_path("inverted");
        fs::write(
            &path,
            r#"{
              "version": "0.1",
              "stage_id": "test",
              "terrain": [{ "l": 10, "b": 0, "r": 0, "t": 9 }]
            }"#,
        )
        .expect("write temp file");

        let err = load_stage_from_path(&path).expect_err("inverted piece should fail");
        assert!(err.contains("inverted extents"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_stage_rejects_empty_terrain() {
        let path = temp_file_path("empty");
        fs::write(
            &path,
            r#"{ "version": "0.1", "stage_id": "test", "terrain": [] }"#,
        )
        .expect("write temp file");

        let err = load_stage_from_path(&path).expect_err("empty terrain should fail");
        assert!(err.contains("terrain list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_stage_rejects_bad_version() {
        let path = temp_file_path("version");
        fs::write(
            &path,
            r#"{
              "version": "2.0",
              "stage_id": "test",
              "terrain": [{ "l": 0, "b": 0, "r": 9, "t": 9 }]
            }"#,
        )
        .expect("write temp file");

        let err = load_stage_from_path(&path).expect_err("bad version should fail");
        assert!(err.contains("unsupported version"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_stage_rejects_inverted_bounds() {
        let path = temp_file_path("bounds");
        fs::write(
            &path,
            r#"{
              "version": "0.1",
              "stage_id": "test",
              "bounds": { "left": 100, "right": -100, "bottom": 0, "top": 10 },
              "terrain": [{ "l": 0, "b": 0, "r": 9, "t": 9 }]
            }"#,
        )
        .expect("write temp file");

        let err = load_stage_from_path(&path).expect_err("inverted bounds should fail");
        assert!(err.contains("bounds are inverted"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_stage_reports_missing_file() {
        let path = temp_file_path("missing");
        let err = load_stage_from_path(&path).expect_err("missing file should fail");
        assert!(err.contains("Failed to read"));
    }
}
