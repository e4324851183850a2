//! Touch input mapping
//!
//! A touch left of the playfield's midline works the left flipper, anything
//! else the right one. Only the first point of a multi-touch is used.

use glam::Vec2;

use crate::Bounds;
use crate::sim::FlipperSide;

pub fn flipper_for_touch(point: Vec2, bounds: &Bounds) -> FlipperSide {
    if point.x < bounds.mid().x {
        FlipperSide::Left
    } else {
        FlipperSide::Right
    }
}

/// Primary pointer of a touch event
#[inline]
pub fn first_touch(points: &[Vec2]) -> Option<Vec2> {
    points.first().copied()
}

/// Convert a y-down canvas position to y-up playfield coordinates
pub fn canvas_to_playfield(x: f32, y: f32, canvas_size: Vec2, bounds: &Bounds) -> Vec2 {
    let u = if canvas_size.x > 0.0 { x / canvas_size.x } else { 0.5 };
    let v = if canvas_size.y > 0.0 { y / canvas_size.y } else { 0.5 };
    Vec2::new(
        bounds.min.x + u * bounds.width(),
        bounds.max.y - v * bounds.height(),
    )
}
