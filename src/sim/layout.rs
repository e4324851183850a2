//! Playfield layout
//!
//! Builds the body descriptions for one session: the ball, two flippers,
//! five bumpers and the boundary edges. Everything is fixed by the bounds
//! except the ball's horizontal spawn offset.

use glam::Vec2;
use rand::Rng;

use crate::Bounds;
use crate::consts::*;
use crate::engine::{BodyDesc, BodyKind, Material, Shape};
use crate::sim::category::BodyFilter;

/// Which flipper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FlipperSide {
    Left,
    Right,
}

impl FlipperSide {
    /// Deflection at full swing (counter-clockwise positive)
    pub fn swing_angle(self) -> f32 {
        match self {
            FlipperSide::Left => FLIPPER_SWING,
            FlipperSide::Right => -FLIPPER_SWING,
        }
    }
}

/// Ball spawn/respawn point: uniform x within the side margins, fixed height
pub fn spawn_point<R: Rng>(bounds: &Bounds, rng: &mut R) -> Vec2 {
    let lo = bounds.min.x + BALL_SPAWN_MARGIN;
    let hi = bounds.max.x - BALL_SPAWN_MARGIN;
    // Narrow tables collapse the range to the centre line
    let x = if lo < hi {
        rng.random_range(lo..=hi)
    } else {
        bounds.mid().x
    };
    Vec2::new(x, bounds.max.y - BALL_SPAWN_DROP)
}

/// Height below which the ball counts as drained
#[inline]
pub fn drain_line(bounds: &Bounds) -> f32 {
    bounds.min.y + DRAIN_OFFSET
}

pub fn ball<R: Rng>(bounds: &Bounds, rng: &mut R) -> BodyDesc {
    BodyDesc {
        shape: Shape::Circle {
            radius: BALL_RADIUS,
        },
        position: spawn_point(bounds, rng),
        kind: BodyKind::Dynamic,
        material: Material::new(BALL_RESTITUTION, BALL_FRICTION)
            .with_damping(BALL_LINEAR_DAMPING, BALL_ANGULAR_DAMPING),
        filter: BodyFilter::ball(),
    }
}

/// Resting centre of a flipper
pub fn flipper_position(bounds: &Bounds, side: FlipperSide) -> Vec2 {
    let y = bounds.min.y + FLIPPER_ELEVATION;
    let offset = FLIPPER_WIDTH / 2.0 + FLIPPER_INSET;
    match side {
        FlipperSide::Left => Vec2::new(bounds.min.x + offset, y),
        FlipperSide::Right => Vec2::new(bounds.max.x - offset, y),
    }
}

pub fn flipper(bounds: &Bounds, side: FlipperSide) -> BodyDesc {
    BodyDesc {
        shape: Shape::Rect {
            half_extents: Vec2::new(FLIPPER_WIDTH / 2.0, FLIPPER_HEIGHT / 2.0),
        },
        position: flipper_position(bounds, side),
        kind: BodyKind::Kinematic,
        material: Material::new(FLIPPER_RESTITUTION, EDGE_FRICTION),
        filter: BodyFilter::flipper(),
    }
}

/// Both flippers, left first
pub fn flippers(bounds: &Bounds) -> [(FlipperSide, BodyDesc); 2] {
    [FlipperSide::Left, FlipperSide::Right].map(|side| (side, flipper(bounds, side)))
}

/// Bumper centres: two near the top corners, one centre, two above the flippers
pub fn bumper_positions(bounds: &Bounds) -> [Vec2; 5] {
    let left = bounds.min.x + 60.0;
    let right = bounds.max.x - 60.0;
    let top = bounds.max.y;
    [
        Vec2::new(left, top - 200.0),
        Vec2::new(right, top - 200.0),
        Vec2::new(bounds.mid().x, top - 350.0),
        Vec2::new(left, top - 500.0),
        Vec2::new(right, top - 500.0),
    ]
}

pub fn bumpers(bounds: &Bounds) -> Vec<BodyDesc> {
    bumper_positions(bounds)
        .into_iter()
        .map(|position| BodyDesc {
            shape: Shape::Circle {
                radius: BUMPER_RADIUS,
            },
            position,
            kind: BodyKind::Static,
            material: Material::new(BUMPER_RESTITUTION, EDGE_FRICTION),
            filter: BodyFilter::bumper(),
        })
        .collect()
}

/// Edge loop around the playfield; the bottom edge comes first and is the
/// only one tagged `Bottom`
pub fn boundary(bounds: &Bounds) -> Vec<BodyDesc> {
    let (min, max) = (bounds.min, bounds.max);
    let corners = [
        (Vec2::new(min.x, min.y), Vec2::new(max.x, min.y), BodyFilter::bottom_edge()),
        (Vec2::new(max.x, min.y), Vec2::new(max.x, max.y), BodyFilter::side_edge()),
        (Vec2::new(max.x, max.y), Vec2::new(min.x, max.y), BodyFilter::side_edge()),
        (Vec2::new(min.x, max.y), Vec2::new(min.x, min.y), BodyFilter::side_edge()),
    ];
    corners
        .into_iter()
        .map(|(a, b, filter)| BodyDesc {
            shape: Shape::Segment { a, b },
            position: Vec2::ZERO,
            kind: BodyKind::Static,
            material: Material::new(EDGE_RESTITUTION, EDGE_FRICTION),
            filter,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::category::CategoryMask;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_flippers_mirror_each_other() {
        let bounds = Bounds::default();
        let left = flipper_position(&bounds, FlipperSide::Left);
        let right = flipper_position(&bounds, FlipperSide::Right);
        assert_eq!(left.y, right.y);
        assert!((left.x - bounds.min.x - (bounds.max.x - right.x)).abs() < 1e-4);
        assert_eq!(left.y, bounds.min.y + 100.0);
        assert_eq!(left.x, 85.0);

        let pair = flippers(&bounds);
        assert_eq!(pair[0].0, FlipperSide::Left);
        assert_eq!(pair[1].1.position, right);
        assert!(pair.iter().all(|(_, d)| d.kind == BodyKind::Kinematic));
    }

    #[test]
    fn test_swing_angles() {
        assert!(FlipperSide::Left.swing_angle() > 0.0);
        assert_eq!(
            FlipperSide::Left.swing_angle(),
            -FlipperSide::Right.swing_angle()
        );
        assert!((FlipperSide::Left.swing_angle().to_degrees() - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_bumper_layout_is_symmetric() {
        let bounds = Bounds::default();
        let p = bumper_positions(&bounds);
        let mid = bounds.mid().x;
        assert_eq!(p.len(), 5);
        assert!((p[0].x - mid + (p[1].x - mid)).abs() < 1e-4);
        assert_eq!(p[2].x, mid);
        assert!((p[3].x - mid + (p[4].x - mid)).abs() < 1e-4);
        // Lower pair sits above the flippers
        assert!(p[3].y > flipper_position(&bounds, FlipperSide::Left).y);
        assert!(bumpers(&bounds).iter().all(|b| b.kind == BodyKind::Static));
    }

    #[test]
    fn test_boundary_bottom_edge_is_distinguished() {
        let bounds = Bounds::default();
        let edges = boundary(&bounds);
        assert_eq!(edges.len(), 4);
        let bottoms: Vec<_> = edges
            .iter()
            .filter(|e| e.filter.category == CategoryMask::BOTTOM)
            .collect();
        assert_eq!(bottoms.len(), 1);
        match bottoms[0].shape {
            Shape::Segment { a, b } => {
                assert_eq!(a.y, bounds.min.y);
                assert_eq!(b.y, bounds.min.y);
            }
            other => panic!("unexpected shape {:?}", other),
        }
    }

    #[test]
    fn test_ball_material() {
        let mut rng = Pcg32::seed_from_u64(7);
        let desc = ball(&Bounds::default(), &mut rng);
        assert_eq!(desc.kind, BodyKind::Dynamic);
        assert_eq!(desc.material.restitution, 0.9);
        assert!(desc.material.linear_damping > 0.0);
        assert!(desc.material.angular_damping > 0.0);
        assert_eq!(desc.filter, BodyFilter::ball());
    }

    proptest! {
        #[test]
        fn prop_spawn_within_margin(seed in any::<u64>(), width in 120.0f32..2000.0, height in 300.0f32..2000.0) {
            let bounds = Bounds::from_size(width, height);
            let mut rng = Pcg32::seed_from_u64(seed);
            let p = spawn_point(&bounds, &mut rng);
            prop_assert!(p.x >= bounds.min.x + BALL_SPAWN_MARGIN);
            prop_assert!(p.x <= bounds.max.x - BALL_SPAWN_MARGIN);
            prop_assert_eq!(p.y, bounds.max.y - BALL_SPAWN_DROP);
        }
    }
}
