//! Physics engine boundary
//!
//! Game rules never talk to a physics library directly. They describe bodies
//! with [`BodyDesc`], poke them through [`PhysicsWorld`], and receive
//! [`ContactEvent`]s back from each step.

pub mod rapier;

#[cfg(test)]
pub(crate) mod scripted;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::category::{BodyFilter, CategoryMask};

pub use rapier::RapierWorld;

/// Opaque handle to a body owned by a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    /// Axis-aligned in body space; rotates with the body
    Rect { half_extents: Vec2 },
    /// Line segment between two body-space points
    Segment { a: Vec2, b: Vec2 },
}

/// How the body moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Integrated by the engine, affected by gravity
    Dynamic,
    /// Never moves
    Static,
    /// Moved only by scripted position/rotation writes
    Kinematic,
}

/// Surface material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub restitution: f32,
    pub friction: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl Material {
    pub const fn new(restitution: f32, friction: f32) -> Self {
        Self {
            restitution,
            friction,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }

    pub const fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }
}

/// Everything a world needs to create a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub shape: Shape,
    pub position: Vec2,
    pub kind: BodyKind,
    pub material: Material,
    pub filter: BodyFilter,
}

/// One side of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactBody {
    pub handle: BodyHandle,
    pub category: CategoryMask,
}

/// Contact-begin notification between two bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub a: ContactBody,
    pub b: ContactBody,
}

impl ContactEvent {
    /// Union of both category masks
    #[inline]
    pub fn categories(&self) -> CategoryMask {
        self.a.category | self.b.category
    }

    /// The side whose category is exactly `category`, if any
    pub fn body_in(&self, category: CategoryMask) -> Option<ContactBody> {
        if self.a.category == category {
            Some(self.a)
        } else if self.b.category == category {
            Some(self.b)
        } else {
            None
        }
    }
}

/// A simulated 2D world
///
/// Lookups on unknown or removed handles return `None` and writes are ignored.
pub trait PhysicsWorld {
    fn spawn(&mut self, desc: &BodyDesc) -> BodyHandle;
    fn despawn(&mut self, handle: BodyHandle);
    fn contains(&self, handle: BodyHandle) -> bool;

    fn position(&self, handle: BodyHandle) -> Option<Vec2>;
    fn set_position(&mut self, handle: BodyHandle, position: Vec2);

    fn velocity(&self, handle: BodyHandle) -> Option<Vec2>;
    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2);

    fn set_angular_velocity(&mut self, handle: BodyHandle, angular_velocity: f32);

    fn rotation(&self, handle: BodyHandle) -> Option<f32>;
    fn set_rotation(&mut self, handle: BodyHandle, angle: f32);

    /// Advance the simulation and return contacts that began during the step
    fn step(&mut self, dt: f32) -> Vec<ContactEvent>;

    /// Number of live bodies
    fn body_count(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn side(id: u32, category: CategoryMask) -> ContactBody {
        ContactBody {
            handle: BodyHandle(id),
            category,
        }
    }

    #[test]
    fn test_contact_event_body_lookup() {
        let event = ContactEvent {
            a: side(1, CategoryMask::BALL),
            b: side(2, CategoryMask::BUMPER),
        };
        assert_eq!(event.categories(), CategoryMask::BALL | CategoryMask::BUMPER);
        assert_eq!(
            event.body_in(CategoryMask::BUMPER).map(|b| b.handle),
            Some(BodyHandle(2))
        );
        assert_eq!(
            event.body_in(CategoryMask::BALL).map(|b| b.handle),
            Some(BodyHandle(1))
        );
        assert!(event.body_in(CategoryMask::FLIPPER).is_none());
    }

    #[test]
    fn test_material_damping_builder() {
        let m = Material::new(0.9, 0.3).with_damping(0.1, 0.2);
        assert_eq!(m.restitution, 0.9);
        assert_eq!(m.linear_damping, 0.1);
        assert_eq!(m.angular_damping, 0.2);
    }
}
