//! Pure rule helpers shared by the scene

use glam::Vec2;

use crate::engine::ContactEvent;
use crate::sim::category::CategoryMask;

/// Meaning of a contact-begin event for the rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// Exactly ball | bumper
    BallBumper,
    /// Exactly ball | bottom edge
    BallBottom,
    /// Anything else (side walls carry every category bit)
    Other,
}

pub fn classify(contact: &ContactEvent) -> ContactKind {
    let pair = contact.categories();
    if pair == CategoryMask::BALL | CategoryMask::BUMPER {
        ContactKind::BallBumper
    } else if pair == CategoryMask::BALL | CategoryMask::BOTTOM {
        ContactKind::BallBottom
    } else {
        ContactKind::Other
    }
}

/// Scale `velocity` down to `max_speed` if it is faster, keeping direction
#[inline]
pub fn clamp_speed(velocity: Vec2, max_speed: f32) -> Vec2 {
    let speed = velocity.length();
    if speed > max_speed {
        velocity * (max_speed / speed)
    } else {
        velocity
    }
}

#[inline]
pub fn is_drained(y: f32, drain_line: f32) -> bool {
    y < drain_line
}
