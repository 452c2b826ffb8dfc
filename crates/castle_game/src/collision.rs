//! Player-vs-terrain collision resolution.
//!
//! Resolution is axis-separated: the integrator moves the hitbox along X and
//! resolves, then moves along Y and resolves. Each pass scans the terrain in
//! stage order and snaps against the **first** overlapping piece only; later
//! pieces that also overlap are left for the next tick. Results are therefore
//! order-dependent, and concave corners where two pieces overlap the hitbox at
//! once resolve against whichever piece the stage lists first.
//!
//! The scan is linear over all terrain. Stages are small enough that no
//! spatial index is kept.

use castle_core::Rect;

use crate::stage::TerrainPiece;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDir {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalContact {
    None,
    /// Fell onto the top face of the piece at this index.
    Landed(usize),
    /// Rose into the bottom face of the piece at this index.
    Ceiling(usize),
}

pub fn first_overlap<'a>(
    hitbox: &Rect,
    terrain: &'a [TerrainPiece],
) -> Option<(usize, &'a TerrainPiece)> {
    terrain
        .iter()
        .enumerate()
        .find(|(_, piece)| hitbox.overlaps(&piece.rect))
}

/// Push the hitbox back out of the first piece it overlaps after a horizontal
/// move in `dir`. Returns the index of the blocking piece.
pub fn resolve_horizontal(
    hitbox: &mut Rect,
    dir: MoveDir,
    terrain: &[TerrainPiece],
) -> Option<usize> {
    let (index, piece) = first_overlap(hitbox, terrain)?;
    match dir {
        MoveDir::Right => hitbox.x = piece.rect.left() - hitbox.w,
        MoveDir::Left => hitbox.x = piece.rect.right(),
    }
    Some(index)
}

/// Push the hitbox back out of the first piece it overlaps after a vertical
/// move by `velocity_y`. Any contact zeroes the velocity.
pub fn resolve_vertical(
    hitbox: &mut Rect,
    velocity_y: &mut f32,
    terrain: &[TerrainPiece],
) -> VerticalContact {
    let Some((index, piece)) = first_overlap(hitbox, terrain) else {
        return VerticalContact::None;
    };
    let contact = if *velocity_y < 0.0 {
        hitbox.y = piece.rect.top();
        VerticalContact::Landed(index)
    } else {
        hitbox.y = piece.rect.bottom() - hitbox.h;
        VerticalContact::Ceiling(index)
    };
    *velocity_y = 0.0;
    contact
}
