//! Stage: hosts one scene at a time
//!
//! The stage owns the physics world, the haptic feedback and any pending
//! one-shot timers. Presenting a scene always builds a fresh world, so a
//! replacement shares nothing with the session it replaces.

use glam::Vec2;

use crate::engine::PhysicsWorld;
use crate::haptics::HapticFeedback;
use crate::hud::HudView;
use crate::scene::{DrawCommand, Scene, SceneContext, SceneFactory, SceneRequest};

/// Builds an empty world for each presented scene
pub type WorldFactory = Box<dyn Fn() -> Box<dyn PhysicsWorld>>;

/// Delayed scene replacement
pub struct OneShot {
    remaining: f32,
    factory: SceneFactory,
}

impl OneShot {
    pub fn new(delay: f32, factory: SceneFactory) -> Self {
        Self {
            remaining: delay.max(0.0),
            factory,
        }
    }
}

pub struct Stage {
    new_world: WorldFactory,
    world: Box<dyn PhysicsWorld>,
    scene: Box<dyn Scene>,
    haptics: HapticFeedback,
    timers: Vec<OneShot>,
    attached: bool,
    /// Number of scenes presented so far
    sessions: u32,
}

impl Stage {
    /// Create a stage and present `scene` on a fresh world
    pub fn new(new_world: WorldFactory, haptics: HapticFeedback, scene: Box<dyn Scene>) -> Self {
        let world = new_world();
        let mut stage = Self {
            new_world,
            world,
            scene,
            haptics,
            timers: Vec::new(),
            attached: true,
            sessions: 0,
        };
        stage.load_current();
        stage
    }

    fn load_current(&mut self) {
        self.sessions += 1;
        let mut ctx = SceneContext {
            world: self.world.as_mut(),
            haptics: &mut self.haptics,
        };
        self.scene.on_load(&mut ctx);
        log::info!("Presented session {}", self.sessions);
    }

    /// Replace the current scene and world wholesale
    pub fn present(&mut self, scene: Box<dyn Scene>) {
        self.world = (self.new_world)();
        self.scene = scene;
        self.load_current();
    }

    /// View torn down: stop simulating; pending timers become no-ops
    pub fn detach(&mut self) {
        self.attached = false;
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[inline]
    pub fn sessions(&self) -> u32 {
        self.sessions
    }

    #[inline]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Run one simulation step of `dt` seconds
    pub fn frame(&mut self, dt: f32) {
        if self.attached {
            let contacts = self.world.step(dt);
            let mut ctx = SceneContext {
                world: self.world.as_mut(),
                haptics: &mut self.haptics,
            };
            for contact in &contacts {
                self.scene.on_contact_begin(&mut ctx, contact);
            }
            self.scene.on_update(&mut ctx, dt);

            if let Some(SceneRequest::ReplaceAfter { delay, factory }) = self.scene.take_request() {
                log::debug!("Scene replacement scheduled in {:.1}s", delay);
                self.timers.push(OneShot::new(delay, factory));
            }
        }

        self.advance_timers(dt);
    }

    fn advance_timers(&mut self, dt: f32) {
        if self.timers.is_empty() {
            return;
        }
        for timer in &mut self.timers {
            timer.remaining -= dt;
        }
        let (fired, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.timers)
            .into_iter()
            .partition(|t| t.remaining <= 0.0);
        self.timers = pending;

        for timer in fired {
            if !self.attached {
                log::debug!("Timer fired on a detached stage, ignoring");
                continue;
            }
            self.present((timer.factory)());
        }
    }

    /// Forward a touch to the scene
    pub fn touch(&mut self, point: Vec2) {
        if !self.attached {
            return;
        }
        let mut ctx = SceneContext {
            world: self.world.as_mut(),
            haptics: &mut self.haptics,
        };
        self.scene.on_touch(&mut ctx, point);
    }

    pub fn hud(&self) -> HudView {
        self.scene.hud()
    }

    pub fn draw(&self) -> Vec<DrawCommand> {
        self.scene.draw(self.world.as_ref())
    }

    /// Live bodies in the current world
    pub fn node_count(&self) -> usize {
        self.world.body_count()
    }

    pub fn bounds(&self) -> crate::Bounds {
        self.scene.bounds()
    }
}
