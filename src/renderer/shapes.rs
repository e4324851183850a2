//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors, paint_color};
use crate::rotate;
use crate::scene::{DrawCommand, Paint};

const CIRCLE_SEGMENTS: u32 = 32;
/// Stroke width for walls
const WALL_THICKNESS: f32 = 4.0;
/// Extra radius of the bumper halo
const GLOW_WIDTH: f32 = 6.0;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let (s1, c1) = theta1.sin_cos();
        let (s2, c2) = theta2.sin_cos();

        let inner1 = center + Vec2::new(c1, s1) * inner_radius;
        let outer1 = center + Vec2::new(c1, s1) * outer_radius;
        let inner2 = center + Vec2::new(c2, s2) * inner_radius;
        let outer2 = center + Vec2::new(c2, s2) * outer_radius;

        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));

        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));
    }

    vertices
}

/// Rectangle rotated by `angle` about its centre
pub fn rect(center: Vec2, half_extents: Vec2, angle: f32, color: [f32; 4]) -> Vec<Vertex> {
    let corners = [
        Vec2::new(-half_extents.x, -half_extents.y),
        Vec2::new(half_extents.x, -half_extents.y),
        Vec2::new(half_extents.x, half_extents.y),
        Vec2::new(-half_extents.x, half_extents.y),
    ]
    .map(|c| center + rotate(c, angle));

    [0, 1, 2, 0, 2, 3]
        .into_iter()
        .map(|i| Vertex::new(corners[i].x, corners[i].y, color))
        .collect()
}

/// Thick line between two points
pub fn segment(a: Vec2, b: Vec2, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let delta = b - a;
    let length = delta.length();
    if length <= f32::EPSILON {
        return Vec::new();
    }
    let angle = delta.y.atan2(delta.x);
    rect(
        (a + b) * 0.5,
        Vec2::new(length * 0.5, thickness * 0.5),
        angle,
        color,
    )
}

/// Turn a scene's draw list into a triangle list
pub fn tessellate(commands: &[DrawCommand]) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for command in commands {
        match *command {
            DrawCommand::Circle {
                center,
                radius,
                paint,
            } => {
                if paint == Paint::Bumper {
                    vertices.extend(ring(
                        center,
                        radius,
                        radius + GLOW_WIDTH,
                        colors::BUMPER_GLOW,
                        CIRCLE_SEGMENTS,
                    ));
                }
                vertices.extend(circle(center, radius, paint_color(paint), CIRCLE_SEGMENTS));
            }
            DrawCommand::Rect {
                center,
                half_extents,
                angle,
                paint,
            } => vertices.extend(rect(center, half_extents, angle, paint_color(paint))),
            DrawCommand::Segment { a, b, paint } => {
                vertices.extend(segment(a, b, WALL_THICKNESS, paint_color(paint)))
            }
        }
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertex_count() {
        let verts = circle(Vec2::ZERO, 10.0, [1.0; 4], 16);
        assert_eq!(verts.len(), 48);
    }

    #[test]
    fn test_rect_rotates_about_centre() {
        let verts = rect(
            Vec2::new(100.0, 50.0),
            Vec2::new(10.0, 2.0),
            std::f32::consts::FRAC_PI_2,
            [1.0; 4],
        );
        assert_eq!(verts.len(), 6);
        for v in &verts {
            // Quarter turn swaps the extents
            assert!((v.position[0] - 100.0).abs() <= 2.0 + 1e-4);
            assert!((v.position[1] - 50.0).abs() <= 10.0 + 1e-4);
        }
    }

    #[test]
    fn test_degenerate_segment_is_empty() {
        assert!(segment(Vec2::ONE, Vec2::ONE, 4.0, [1.0; 4]).is_empty());
        assert_eq!(segment(Vec2::ZERO, Vec2::X, 4.0, [1.0; 4]).len(), 6);
    }

    #[test]
    fn test_bumpers_get_a_halo() {
        let bumper = DrawCommand::Circle {
            center: Vec2::ZERO,
            radius: 25.0,
            paint: Paint::Bumper,
        };
        let ball = DrawCommand::Circle {
            center: Vec2::ZERO,
            radius: 12.0,
            paint: Paint::Ball,
        };
        let n = CIRCLE_SEGMENTS as usize;
        assert_eq!(tessellate(&[ball]).len(), n * 3);
        assert_eq!(tessellate(&[bumper]).len(), n * 3 + n * 6);
    }
}
