//! Vector math and box geometry.
//!
//! World space has its origin in the top-left corner with y growing
//! downward. Every entity occupies an axis-aligned square centred
//! (unevenly, for odd sizes) on its position.

use glam::DVec2;

use crate::entities::{Board, Entity};

/// World-space vector. Serializes as `[x, y]`.
pub type Vector = DVec2;

// ── Vector helpers ───────────────────────────────────────────────────────────

/// Offset from `b` to `a`.
pub fn measure_distance(a: &Entity, b: &Entity) -> Vector {
    a.position - b.position
}

pub fn magnitude(v: Vector) -> f64 {
    v.length()
}

pub fn reflect(v: Vector) -> Vector {
    -v
}

/// Scale `v` so that its larger component becomes ±1 and the other keeps
/// its proportion. Signs are preserved per axis.
///
/// The zero vector has no direction and normalizes to itself.
pub fn normalize(v: Vector) -> Vector {
    let ax = v.x.abs();
    let ay = v.y.abs();
    if ax == 0.0 && ay == 0.0 {
        return Vector::ZERO;
    }
    let (nx, ny) = if ax > ay { (1.0, ay / ax) } else { (ax / ay, 1.0) };
    Vector::new(nx.copysign(v.x), ny.copysign(v.y))
}

pub fn translate(v: Vector, pos: Vector) -> Vector {
    pos + v
}

// ── Boxes ────────────────────────────────────────────────────────────────────

/// Box corners: top-left, top-right, bottom-left, bottom-right.
pub type Corners = [Vector; 4];

/// Split a side length into (front, back) extents. Odd sizes put the
/// extra unit on the back (positive) side.
pub fn extents(size: f64) -> (f64, f64) {
    let front = (size / 2.0).round();
    (front, size - front)
}

/// The box `entity` would occupy if it stood at `pos`.
pub fn bounding_box(entity: &Entity, pos: Vector) -> Corners {
    let (front, back) = extents(entity.size);
    [
        Vector::new(pos.x - front, pos.y - front),
        Vector::new(pos.x + back, pos.y - front),
        Vector::new(pos.x - front, pos.y + back),
        Vector::new(pos.x + back, pos.y + back),
    ]
}

/// Approximate overlap test: true if one of the first three corners of
/// `a`'s box lies inside `b`'s box (bounds inclusive). The bottom-right
/// corner of `a` is never tested, so callers that need symmetry test both
/// orderings.
pub fn intersects(a: &Entity, b: &Entity) -> bool {
    let abox = bounding_box(a, a.position);
    let bbox = bounding_box(b, b.position);
    abox[..3].iter().any(|c| {
        c.x >= bbox[0].x && c.x <= bbox[3].x && c.y >= bbox[0].y && c.y <= bbox[3].y
    })
}

/// True iff the entity's box at `pos` lies strictly inside the board.
pub fn is_valid_position(board: &Board, entity: &Entity, pos: Vector) -> bool {
    let b = bounding_box(entity, pos);
    b[0].x > 0.0 && b[0].y > 0.0 && b[3].x < board.x && b[3].y < board.y
}
