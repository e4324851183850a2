//! `PhysicsWorld` backed by rapier2d
//!
//! Category masks map onto rapier interaction groups:
//! - collision groups filter on `contact | collision`, so reported-only pairs
//!   still get a narrow-phase contact
//! - solver groups filter on `collision`, so only those pairs exchange impulses
//!
//! The bouncier surface of a pair sets its restitution, so a 1.5 bumper
//! stays 1.5 against the ball.
//!
//! Contact-begin events are derived by diffing the set of touching pairs
//! between steps and keeping pairs whose contact masks ask for a report.

use std::collections::{BTreeSet, HashMap};

use glam::Vec2;
use rapier2d::prelude::*;

use super::{BodyDesc, BodyHandle, BodyKind, ContactBody, ContactEvent, PhysicsWorld, Shape};
use crate::sim::category::{BodyFilter, CategoryMask};

struct Entry {
    body: RigidBodyHandle,
    filter: BodyFilter,
}

/// A rapier2d simulation in playfield units
pub struct RapierWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    entries: HashMap<BodyHandle, Entry>,
    /// Pairs touching at the end of the previous step (ordered by handle)
    touching: BTreeSet<(BodyHandle, BodyHandle)>,
    next_id: u32,
}

#[inline]
fn to_vector(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

#[inline]
fn to_vec2(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

#[inline]
fn group(mask: CategoryMask) -> Group {
    Group::from_bits_truncate(mask.bits())
}

impl RapierWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: to_vector(gravity),
            params: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            entries: HashMap::new(),
            touching: BTreeSet::new(),
            next_id: 1,
        }
    }

    fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.entries
            .get(&handle)
            .and_then(|entry| self.bodies.get(entry.body))
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        let entry = self.entries.get(&handle)?;
        self.bodies.get_mut(entry.body)
    }

    /// Our handle for the body owning a collider
    fn owner(&self, collider: ColliderHandle) -> Option<BodyHandle> {
        self.colliders
            .get(collider)
            .map(|c| BodyHandle(c.user_data as u32))
    }

    /// Pairs with at least one active contact point, ordered by handle
    fn touching_pairs(&self) -> BTreeSet<(BodyHandle, BodyHandle)> {
        let mut pairs = BTreeSet::new();
        for pair in self.narrow_phase.contact_pairs() {
            if !pair.has_any_active_contact {
                continue;
            }
            let (Some(a), Some(b)) = (self.owner(pair.collider1), self.owner(pair.collider2)) else {
                continue;
            };
            pairs.insert(if a <= b { (a, b) } else { (b, a) });
        }
        pairs
    }
}

impl PhysicsWorld for RapierWorld {
    fn spawn(&mut self, desc: &BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id += 1;

        let builder = match desc.kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic().ccd_enabled(true),
            BodyKind::Static => RigidBodyBuilder::fixed(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_position_based(),
        };
        let body = builder
            .translation(to_vector(desc.position))
            .linear_damping(desc.material.linear_damping)
            .angular_damping(desc.material.angular_damping)
            .build();
        let body_handle = self.bodies.insert(body);

        let shape = match desc.shape {
            Shape::Circle { radius } => ColliderBuilder::ball(radius),
            Shape::Rect { half_extents } => ColliderBuilder::cuboid(half_extents.x, half_extents.y),
            Shape::Segment { a, b } => ColliderBuilder::segment(point![a.x, a.y], point![b.x, b.y]),
        };
        let filter = desc.filter;
        let collider = shape
            .restitution(desc.material.restitution)
            .restitution_combine_rule(CoefficientCombineRule::Max)
            .friction(desc.material.friction)
            .collision_groups(InteractionGroups::new(
                group(filter.category),
                group(filter.contact | filter.collision),
            ))
            .solver_groups(InteractionGroups::new(
                group(filter.category),
                group(filter.collision),
            ))
            .user_data(handle.0 as u128)
            .build();
        self.colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies);

        self.entries.insert(
            handle,
            Entry {
                body: body_handle,
                filter,
            },
        );
        log::debug!("Spawned {:?} {:?} at {:?}", handle, desc.kind, desc.position);
        handle
    }

    fn despawn(&mut self, handle: BodyHandle) {
        let Some(entry) = self.entries.remove(&handle) else {
            return;
        };
        self.bodies.remove(
            entry.body,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        self.touching.retain(|&(a, b)| a != handle && b != handle);
        log::debug!("Despawned {:?}", handle);
    }

    fn contains(&self, handle: BodyHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    fn position(&self, handle: BodyHandle) -> Option<Vec2> {
        self.body(handle).map(|b| to_vec2(b.translation()))
    }

    fn set_position(&mut self, handle: BodyHandle, position: Vec2) {
        if let Some(body) = self.body_mut(handle) {
            if body.is_kinematic() {
                body.set_next_kinematic_translation(to_vector(position));
            } else {
                body.set_translation(to_vector(position), true);
            }
        }
    }

    fn velocity(&self, handle: BodyHandle) -> Option<Vec2> {
        self.body(handle).map(|b| to_vec2(b.linvel()))
    }

    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) {
        if let Some(body) = self.body_mut(handle) {
            body.set_linvel(to_vector(velocity), true);
        }
    }

    fn set_angular_velocity(&mut self, handle: BodyHandle, angular_velocity: f32) {
        if let Some(body) = self.body_mut(handle) {
            body.set_angvel(angular_velocity, true);
        }
    }

    fn rotation(&self, handle: BodyHandle) -> Option<f32> {
        self.body(handle).map(|b| b.rotation().angle())
    }

    fn set_rotation(&mut self, handle: BodyHandle, angle: f32) {
        if let Some(body) = self.body_mut(handle) {
            if body.is_kinematic() {
                body.set_next_kinematic_rotation(Rotation::new(angle));
            } else {
                body.set_rotation(Rotation::new(angle), true);
            }
        }
    }

    fn step(&mut self, dt: f32) -> Vec<ContactEvent> {
        self.params.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &(),
        );

        let now = self.touching_pairs();
        let mut events = Vec::new();
        for &(a, b) in now.difference(&self.touching) {
            let (Some(ea), Some(eb)) = (self.entries.get(&a), self.entries.get(&b)) else {
                continue;
            };
            if !ea.filter.reports_contact_with(&eb.filter) {
                continue;
            }
            events.push(ContactEvent {
                a: ContactBody {
                    handle: a,
                    category: ea.filter.category,
                },
                b: ContactBody {
                    handle: b,
                    category: eb.filter.category,
                },
            });
        }
        self.touching = now;
        events
    }

    fn body_count(&self) -> usize {
        self.entries.len()
    }
}
