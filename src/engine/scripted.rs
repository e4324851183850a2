//! Scripted world for exercising game rules without a physics engine
//!
//! Bodies move in straight lines; contacts only happen when a test queues them.

use std::collections::BTreeMap;

use glam::Vec2;

use super::{BodyDesc, BodyHandle, BodyKind, ContactBody, ContactEvent, PhysicsWorld};
use crate::sim::category::CategoryMask;

#[derive(Debug, Clone)]
pub struct ScriptedBody {
    pub desc: BodyDesc,
    pub position: Vec2,
    pub velocity: Vec2,
    pub angular_velocity: f32,
    pub rotation: f32,
}

#[derive(Debug, Default)]
pub struct ScriptedWorld {
    bodies: BTreeMap<u32, ScriptedBody>,
    queued: Vec<ContactEvent>,
    next_id: u32,
}

impl ScriptedWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles of all bodies whose category is exactly `category`
    pub fn handles_in(&self, category: CategoryMask) -> Vec<BodyHandle> {
        self.bodies
            .iter()
            .filter(|(_, b)| b.desc.filter.category == category)
            .map(|(id, _)| BodyHandle(*id))
            .collect()
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&ScriptedBody> {
        self.bodies.get(&handle.0)
    }

    /// Queue a contact-begin between two bodies for the next step
    pub fn queue_contact(&mut self, a: BodyHandle, b: BodyHandle) {
        let side = |h: BodyHandle, bodies: &BTreeMap<u32, ScriptedBody>| ContactBody {
            handle: h,
            category: bodies
                .get(&h.0)
                .map(|b| b.desc.filter.category)
                .unwrap_or(CategoryMask::NONE),
        };
        let event = ContactEvent {
            a: side(a, &self.bodies),
            b: side(b, &self.bodies),
        };
        self.queued.push(event);
    }
}

impl PhysicsWorld for ScriptedWorld {
    fn spawn(&mut self, desc: &BodyDesc) -> BodyHandle {
        self.next_id += 1;
        let id = self.next_id;
        self.bodies.insert(
            id,
            ScriptedBody {
                desc: *desc,
                position: desc.position,
                velocity: Vec2::ZERO,
                angular_velocity: 0.0,
                rotation: 0.0,
            },
        );
        BodyHandle(id)
    }

    fn despawn(&mut self, handle: BodyHandle) {
        self.bodies.remove(&handle.0);
    }

    fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains_key(&handle.0)
    }

    fn position(&self, handle: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&handle.0).map(|b| b.position)
    }

    fn set_position(&mut self, handle: BodyHandle, position: Vec2) {
        if let Some(b) = self.bodies.get_mut(&handle.0) {
            b.position = position;
        }
    }

    fn velocity(&self, handle: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&handle.0).map(|b| b.velocity)
    }

    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.bodies.get_mut(&handle.0) {
            b.velocity = velocity;
        }
    }

    fn set_angular_velocity(&mut self, handle: BodyHandle, angular_velocity: f32) {
        if let Some(b) = self.bodies.get_mut(&handle.0) {
            b.angular_velocity = angular_velocity;
        }
    }

    fn rotation(&self, handle: BodyHandle) -> Option<f32> {
        self.bodies.get(&handle.0).map(|b| b.rotation)
    }

    fn set_rotation(&mut self, handle: BodyHandle, angle: f32) {
        if let Some(b) = self.bodies.get_mut(&handle.0) {
            b.rotation = angle;
        }
    }

    fn step(&mut self, dt: f32) -> Vec<ContactEvent> {
        for body in self.bodies.values_mut() {
            if body.desc.kind == BodyKind::Dynamic {
                body.position += body.velocity * dt;
                body.rotation += body.angular_velocity * dt;
            }
        }
        std::mem::take(&mut self.queued)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}
