//! Read-only view of one tick's result, flattened into draw order.
//!
//! Draw order: sky clear colour, castle backdrop, clouds, terrain, player,
//! then the menu overlay when a menu is open.

use castle_core::Rect;
use castle_render::ColoredRect;

use crate::menu::{GamePhase, MenuItem};
use crate::player::Facing;
use crate::transform::ScreenRect;
use crate::world::Game;

pub const SKY: [f32; 4] = [0.42, 0.66, 0.93, 1.0];
const BACKDROP: [f32; 4] = [0.33, 0.36, 0.48, 1.0];
const CLOUD: [f32; 4] = [0.96, 0.97, 1.0, 0.85];
const STONE: [f32; 4] = [0.47, 0.44, 0.40, 1.0];
const STONE_ALT: [f32; 4] = [0.41, 0.38, 0.35, 1.0];
const PLAYER: [f32; 4] = [0.85, 0.24, 0.20, 1.0];
const PLAYER_EYE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const MENU_DIM: [f32; 4] = [0.0, 0.0, 0.0, 0.55];
const TITLE_DIM: [f32; 4] = [0.05, 0.04, 0.10, 0.85];
const MENU_ITEM: [f32; 4] = [0.25, 0.25, 0.30, 0.95];
const MENU_SELECTED: [f32; 4] = [0.95, 0.78, 0.25, 1.0];

/// Width of one repeated terrain tile in simulation units.
const TERRAIN_TILE: f32 = 50.0;

#[derive(Debug, Clone)]
pub struct TerrainView {
    pub rect: ScreenRect,
    /// Screen-space tile pitch for repeating pieces.
    pub tile_w: Option<i32>,
    pub texture: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MenuOverlay {
    pub phase: GamePhase,
    pub items: Vec<(MenuItem, ScreenRect)>,
    pub selected: usize,
}

#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub screen_w: u32,
    pub screen_h: u32,
    pub background: [ScreenRect; 2],
    pub clouds: [ScreenRect; 2],
    pub terrain: Vec<TerrainView>,
    pub player: ScreenRect,
    pub facing: Facing,
    pub menu: Option<MenuOverlay>,
}

impl FrameSnapshot {
    pub fn capture(game: &Game) -> Self {
        let t = &game.transform;
        let focus = game.camera.focus;
        let (sw, sh) = (t.screen_w, t.screen_h);

        let terrain = game
            .stage
            .terrain()
            .iter()
            .map(|piece| TerrainView {
                rect: t.to_screen(&piece.rect, focus),
                tile_w: piece
                    .repeat
                    .then(|| ((TERRAIN_TILE * t.multiplier) as i32).max(1)),
                texture: piece.texture.clone(),
            })
            .filter(|view| on_screen(&view.rect, sw, sh))
            .collect();

        let items = game.menu.items();
        let menu = (!items.is_empty()).then(|| MenuOverlay {
            phase: game.phase(),
            items: items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let slot = Rect::new(-120.0, 40.0 - i as f32 * 70.0, 240.0, 50.0);
                    (*item, t.to_screen_static(&slot))
                })
                .collect(),
            selected: game.menu.cursor(),
        });

        Self {
            screen_w: sw,
            screen_h: sh,
            background: game.parallax.background_tiles(focus.x, sw, sh),
            clouds: game.parallax.cloud_tiles(sw, sh),
            terrain,
            player: t.to_screen(&game.player.hitbox, focus),
            facing: game.player.facing,
            menu,
        }
    }

    pub fn clear_color(&self) -> [f32; 4] {
        SKY
    }

    pub fn draw_list(&self) -> Vec<ColoredRect> {
        let mut out = Vec::new();

        for tile in &self.background {
            push_backdrop(&mut out, tile);
        }
        for tile in &self.clouds {
            push_clouds(&mut out, tile);
        }
        for view in &self.terrain {
            push_terrain(&mut out, view);
        }
        push_player(&mut out, &self.player, self.facing);

        if let Some(menu) = &self.menu {
            let dim = match menu.phase {
                GamePhase::MainMenu => TITLE_DIM,
                GamePhase::Paused | GamePhase::Playing => MENU_DIM,
            };
            out.push(colored(
                &ScreenRect {
                    x: 0,
                    y: 0,
                    w: self.screen_w as i32,
                    h: self.screen_h as i32,
                },
                dim,
            ));
            for (i, (_, rect)) in menu.items.iter().enumerate() {
                let color = if i == menu.selected {
                    MENU_SELECTED
                } else {
                    MENU_ITEM
                };
                out.push(colored(rect, color));
            }
        }

        out
    }
}

fn on_screen(rect: &ScreenRect, screen_w: u32, screen_h: u32) -> bool {
    rect.x < screen_w as i32
        && rect.x + rect.w > 0
        && rect.y < screen_h as i32
        && rect.y + rect.h > 0
}

fn colored(rect: &ScreenRect, color: [f32; 4]) -> ColoredRect {
    ColoredRect {
        x: rect.x,
        y: rect.y,
        w: rect.w,
        h: rect.h,
        color,
    }
}

/// Sub-rectangle of `tile` given as fractions of its size.
fn part(tile: &ScreenRect, fx: f32, fy: f32, fw: f32, fh: f32) -> ScreenRect {
    let w = tile.w as f32;
    let h = tile.h as f32;
    ScreenRect {
        x: tile.x + (fx * w) as i32,
        y: tile.y + (fy * h) as i32,
        w: (fw * w) as i32,
        h: (fh * h) as i32,
    }
}

fn push_backdrop(out: &mut Vec<ColoredRect>, tile: &ScreenRect) {
    // Curtain wall with four towers.
    out.push(colored(&part(tile, 0.0, 0.62, 1.0, 0.38), BACKDROP));
    for fx in [0.08, 0.34, 0.58, 0.84] {
        out.push(colored(&part(tile, fx, 0.42, 0.08, 0.22), BACKDROP));
    }
}

fn push_clouds(out: &mut Vec<ColoredRect>, tile: &ScreenRect) {
    for (fx, fy, fw) in [(0.05, 0.08, 0.16), (0.38, 0.15, 0.22), (0.72, 0.05, 0.13)] {
        out.push(colored(&part(tile, fx, fy, fw, 0.05), CLOUD));
    }
}

fn push_terrain(out: &mut Vec<ColoredRect>, view: &TerrainView) {
    let base = texture_tint(view.texture.as_deref());
    let Some(tile_w) = view.tile_w else {
        out.push(colored(&view.rect, base));
        return;
    };

    let alt = shade(base, 0.88);
    let mut x = view.rect.x;
    let end = view.rect.x + view.rect.w;
    let mut even = true;
    while x < end {
        let w = tile_w.min(end - x);
        let tile = ScreenRect {
            x,
            y: view.rect.y,
            w,
            h: view.rect.h,
        };
        out.push(colored(&tile, if even { base } else { alt }));
        x += w;
        even = !even;
    }
}

fn push_player(out: &mut Vec<ColoredRect>, rect: &ScreenRect, facing: Facing) {
    out.push(colored(rect, PLAYER));
    let eye = rect.w / 5;
    let eye_x = match facing {
        Facing::Right => rect.x + rect.w - 2 * eye,
        Facing::Left => rect.x + eye,
    };
    out.push(ColoredRect {
        x: eye_x,
        y: rect.y + rect.h / 8,
        w: eye,
        h: eye,
        color: PLAYER_EYE,
    });
}

/// Stable colour per texture name so differently textured pieces stay
/// distinguishable without image assets.
fn texture_tint(texture: Option<&str>) -> [f32; 4] {
    let Some(name) = texture else {
        return STONE;
    };
    let hash = name
        .bytes()
        .fold(0x811c_9dc5u32, |h, b| (h ^ b as u32).wrapping_mul(0x0100_0193));
    if hash % 2 == 0 {
        STONE
    } else {
        STONE_ALT
    }
}

fn shade(color: [f32; 4], factor: f32) -> [f32; 4] {
    [color[0] * factor, color[1] * factor, color[2] * factor, color[3]]
}
