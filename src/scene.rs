//! Scenes and the pinball rules
//!
//! A [`Scene`] receives hooks from the [`Stage`](crate::stage::Stage): load,
//! per-step update, contact begin and touch. It never owns the physics world
//! or the haptic device; both are lent through [`SceneContext`] for the
//! duration of a hook.

use glam::Vec2;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::engine::{BodyHandle, ContactEvent, PhysicsWorld, Shape};
use crate::haptics::{HapticFeedback, HapticPulse};
use crate::hud::HudView;
use crate::input::flipper_for_touch;
use crate::sim::category::CategoryMask;
use crate::sim::layout::{self, FlipperSide};
use crate::sim::{
    BumperPulse, ContactKind, DrainOutcome, FlipperMotion, GameState, clamp_speed, classify,
};
use crate::sim::rules::is_drained;
use crate::{Bounds, DrainMode, Settings};

/// Borrowed services for one hook call
pub struct SceneContext<'a> {
    pub world: &'a mut dyn PhysicsWorld,
    pub haptics: &'a mut HapticFeedback,
}

/// Builds the next scene; captures only what the new session needs
pub type SceneFactory = Box<dyn FnOnce() -> Box<dyn Scene>>;

/// Something the scene wants its host to do
pub enum SceneRequest {
    /// Present a freshly built scene after `delay` seconds
    ReplaceAfter { delay: f32, factory: SceneFactory },
}

impl std::fmt::Debug for SceneRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneRequest::ReplaceAfter { delay, .. } => f
                .debug_struct("ReplaceAfter")
                .field("delay", delay)
                .finish_non_exhaustive(),
        }
    }
}

/// What a body looks like on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Ball,
    Bumper,
    Flipper,
    Wall,
}

/// One primitive in playfield coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: Vec2,
        radius: f32,
        paint: Paint,
    },
    /// Rectangle rotated about its centre
    Rect {
        center: Vec2,
        half_extents: Vec2,
        angle: f32,
        paint: Paint,
    },
    Segment {
        a: Vec2,
        b: Vec2,
        paint: Paint,
    },
}

pub trait Scene {
    /// Scene was presented on a fresh world
    fn on_load(&mut self, ctx: &mut SceneContext<'_>);

    /// Once per simulation step, after contacts were delivered
    fn on_update(&mut self, ctx: &mut SceneContext<'_>, dt: f32);

    /// A reported contact began during the last step
    fn on_contact_begin(&mut self, ctx: &mut SceneContext<'_>, contact: &ContactEvent);

    /// Touch or click at a playfield point
    fn on_touch(&mut self, ctx: &mut SceneContext<'_>, point: Vec2);

    /// Pending host request, if any
    fn take_request(&mut self) -> Option<SceneRequest> {
        None
    }

    fn hud(&self) -> HudView;

    fn draw(&self, world: &dyn PhysicsWorld) -> Vec<DrawCommand>;

    fn bounds(&self) -> Bounds;
}

struct Flipper {
    handle: BodyHandle,
    motion: FlipperMotion,
}

struct Bumper {
    handle: BodyHandle,
    pulse: BumperPulse,
}

/// The pinball table: scoring, lives, drains and flipper control
pub struct PinballScene {
    bounds: Bounds,
    settings: Settings,
    rng: Pcg32,
    state: GameState,
    ball: Option<BodyHandle>,
    flippers: Vec<Flipper>,
    bumpers: Vec<Bumper>,
    edges: Vec<(Vec2, Vec2)>,
    hud: HudView,
    request: Option<SceneRequest>,
}

impl PinballScene {
    pub fn new(bounds: Bounds, settings: Settings, seed: u64) -> Self {
        let state = GameState::new();
        Self {
            bounds,
            settings,
            rng: Pcg32::seed_from_u64(seed),
            hud: HudView::from_state(&state),
            state,
            ball: None,
            flippers: Vec::new(),
            bumpers: Vec::new(),
            edges: Vec::new(),
            request: None,
        }
    }

    /// Same table with a custom starting life count
    pub fn with_lives(mut self, lives: u8) -> Self {
        self.state = GameState::with_lives(lives);
        self.refresh_hud();
        self
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn ball(&self) -> Option<BodyHandle> {
        self.ball
    }

    /// Current pulse scale for each bumper, in layout order
    pub fn bumper_scales(&self) -> Vec<f32> {
        self.bumpers.iter().map(|b| b.pulse.scale()).collect()
    }

    pub fn flipper_angle(&self, side: FlipperSide) -> Option<f32> {
        self.flippers
            .iter()
            .find(|f| f.motion.side == side)
            .map(|f| f.motion.angle())
    }

    fn refresh_hud(&mut self) {
        self.hud = HudView::from_state(&self.state);
    }

    fn bumper_hit(&mut self, ctx: &mut SceneContext<'_>, contact: &ContactEvent) {
        if !self.state.award_bumper_hit() {
            return;
        }
        self.refresh_hud();
        ctx.haptics.pulse(HapticPulse::bumper());

        let hit = contact.body_in(CategoryMask::BUMPER).map(|b| b.handle);
        if let Some(bumper) = self.bumpers.iter_mut().find(|b| Some(b.handle) == hit) {
            bumper.pulse.trigger();
        }
        log::debug!("Bumper hit, score {}", self.state.score());
    }

    fn drain(&mut self, ctx: &mut SceneContext<'_>) {
        match self.state.register_drain() {
            DrainOutcome::Ignored => {}
            DrainOutcome::Respawn => self.reset_ball(ctx),
            DrainOutcome::GameOver => self.game_over(ctx),
        }
        self.refresh_hud();
    }

    fn reset_ball(&mut self, ctx: &mut SceneContext<'_>) {
        let Some(ball) = self.ball else {
            return;
        };
        let spawn = layout::spawn_point(&self.bounds, &mut self.rng);
        ctx.world.set_position(ball, spawn);
        ctx.world.set_velocity(ball, Vec2::ZERO);
        ctx.world.set_angular_velocity(ball, 0.0);
    }

    fn game_over(&mut self, ctx: &mut SceneContext<'_>) {
        if let Some(ball) = self.ball.take() {
            ctx.world.despawn(ball);
        }

        let bounds = self.bounds;
        let settings = self.settings.clone();
        let seed = self.rng.next_u64();
        let factory: SceneFactory = Box::new(move || -> Box<dyn Scene> {
            Box::new(PinballScene::new(bounds, settings, seed))
        });
        self.request = Some(SceneRequest::ReplaceAfter {
            delay: GAME_OVER_RESTART_SECS,
            factory,
        });
        log::info!("Game over - final score {}", self.state.score());
    }
}

impl Scene for PinballScene {
    fn on_load(&mut self, ctx: &mut SceneContext<'_>) {
        ctx.haptics.set_enabled(self.settings.haptics);
        ctx.haptics.prepare();

        for desc in layout::boundary(&self.bounds) {
            if let Shape::Segment { a, b } = desc.shape {
                self.edges.push((desc.position + a, desc.position + b));
            }
            ctx.world.spawn(&desc);
        }

        self.bumpers = layout::bumpers(&self.bounds)
            .iter()
            .map(|desc| Bumper {
                handle: ctx.world.spawn(desc),
                pulse: BumperPulse::new(),
            })
            .collect();

        self.flippers = layout::flippers(&self.bounds)
            .iter()
            .map(|(side, desc)| Flipper {
                handle: ctx.world.spawn(desc),
                motion: FlipperMotion::new(*side),
            })
            .collect();

        if !self.state.is_over() {
            let ball = layout::ball(&self.bounds, &mut self.rng);
            self.ball = Some(ctx.world.spawn(&ball));
        }

        self.refresh_hud();
        log::info!(
            "Table loaded: {} bodies, {} lives",
            ctx.world.body_count(),
            self.state.lives()
        );
    }

    fn on_update(&mut self, ctx: &mut SceneContext<'_>, dt: f32) {
        if let Some(ball) = self.ball {
            if let Some(v) = ctx.world.velocity(ball) {
                let clamped = clamp_speed(v, BALL_MAX_SPEED);
                if clamped != v {
                    ctx.world.set_velocity(ball, clamped);
                }
            }

            if let Some(pos) = ctx.world.position(ball) {
                if is_drained(pos.y, layout::drain_line(&self.bounds)) {
                    if self.settings.drain_mode == DrainMode::Position {
                        self.drain(ctx);
                    }
                } else {
                    self.state.rearm_drain();
                }
            }
        }

        for flipper in &mut self.flippers {
            let angle = flipper.motion.advance(dt);
            ctx.world.set_rotation(flipper.handle, angle);
        }
        for bumper in &mut self.bumpers {
            bumper.pulse.advance(dt);
        }
    }

    fn on_contact_begin(&mut self, ctx: &mut SceneContext<'_>, contact: &ContactEvent) {
        match classify(contact) {
            ContactKind::BallBumper => self.bumper_hit(ctx, contact),
            ContactKind::BallBottom => {
                if self.settings.drain_mode == DrainMode::BoundaryContact {
                    self.drain(ctx);
                }
            }
            ContactKind::Other => {}
        }
    }

    fn on_touch(&mut self, _ctx: &mut SceneContext<'_>, point: Vec2) {
        let side = flipper_for_touch(point, &self.bounds);
        if let Some(flipper) = self.flippers.iter_mut().find(|f| f.motion.side == side) {
            flipper.motion.activate();
        }
    }

    fn take_request(&mut self) -> Option<SceneRequest> {
        self.request.take()
    }

    fn hud(&self) -> HudView {
        self.hud.clone()
    }

    fn draw(&self, world: &dyn PhysicsWorld) -> Vec<DrawCommand> {
        let mut commands = Vec::with_capacity(self.edges.len() + self.bumpers.len() + 3);

        commands.extend(self.edges.iter().map(|&(a, b)| DrawCommand::Segment {
            a,
            b,
            paint: Paint::Wall,
        }));

        for bumper in &self.bumpers {
            if let Some(center) = world.position(bumper.handle) {
                commands.push(DrawCommand::Circle {
                    center,
                    radius: BUMPER_RADIUS * bumper.pulse.scale(),
                    paint: Paint::Bumper,
                });
            }
        }

        for flipper in &self.flippers {
            if let Some(center) = world.position(flipper.handle) {
                commands.push(DrawCommand::Rect {
                    center,
                    half_extents: Vec2::new(FLIPPER_WIDTH / 2.0, FLIPPER_HEIGHT / 2.0),
                    angle: world.rotation(flipper.handle).unwrap_or(0.0),
                    paint: Paint::Flipper,
                });
            }
        }

        if let Some(center) = self.ball.and_then(|b| world.position(b)) {
            commands.push(DrawCommand::Circle {
                center,
                radius: BALL_RADIUS,
                paint: Paint::Ball,
            });
        }

        commands
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scripted::ScriptedWorld;
    use crate::haptics::tests::RecordingHaptics;
    use crate::engine::ContactBody;
    use crate::hud::GAME_OVER_BANNER;
    use proptest::prelude::*;

    struct Harness {
        world: ScriptedWorld,
        haptics: HapticFeedback,
        played: std::rc::Rc<std::cell::RefCell<Vec<HapticPulse>>>,
        scene: PinballScene,
    }

    impl Harness {
        fn new(settings: Settings, lives: u8, haptics_supported: bool) -> Self {
            let device = RecordingHaptics {
                supported: haptics_supported,
                ..Default::default()
            };
            let played = device.played.clone();
            let mut harness = Self {
                world: ScriptedWorld::new(),
                haptics: HapticFeedback::new(Box::new(device)),
                played,
                scene: PinballScene::new(Bounds::default(), settings, 42).with_lives(lives),
            };
            harness.with_ctx(|scene, ctx| scene.on_load(ctx));
            harness
        }

        fn with_ctx(&mut self, f: impl FnOnce(&mut PinballScene, &mut SceneContext<'_>)) {
            let mut ctx = SceneContext {
                world: &mut self.world,
                haptics: &mut self.haptics,
            };
            f(&mut self.scene, &mut ctx);
        }

        fn ball(&self) -> BodyHandle {
            self.scene.ball().unwrap()
        }

        fn bumper(&self, index: usize) -> BodyHandle {
            self.world.handles_in(CategoryMask::BUMPER)[index]
        }

        fn bottom(&self) -> BodyHandle {
            self.world.handles_in(CategoryMask::BOTTOM)[0]
        }

        /// Deliver queued contacts then update, like one stage frame
        fn step(&mut self) {
            let contacts = self.world.step(SIM_DT);
            self.with_ctx(|scene, ctx| {
                for contact in &contacts {
                    scene.on_contact_begin(ctx, contact);
                }
                scene.on_update(ctx, SIM_DT);
            });
        }

        fn sink_ball(&mut self) {
            let ball = self.ball();
            self.world.set_position(ball, Vec2::new(195.0, 10.0));
        }
    }

    fn default_harness() -> Harness {
        Harness::new(Settings::default(), STARTING_LIVES, true)
    }

    #[test]
    fn test_load_spawns_table() {
        let h = default_harness();
        // 4 edges + 5 bumpers + 2 flippers + ball
        assert_eq!(h.world.body_count(), 12);
        assert_eq!(h.world.handles_in(CategoryMask::BUMPER).len(), 5);
        assert_eq!(h.world.handles_in(CategoryMask::FLIPPER).len(), 2);
        assert_eq!(h.world.handles_in(CategoryMask::BALL).len(), 1);
        assert_eq!(h.scene.hud().score, "Score: 0");
    }

    #[test]
    fn test_three_bumper_hits_score_thirty() {
        let mut h = default_harness();
        let ball = h.ball();
        for i in 0..3 {
            let bumper = h.bumper(i);
            h.world.queue_contact(ball, bumper);
            h.step();
        }
        assert_eq!(h.scene.state().score(), 30);
        assert_eq!(h.scene.state().lives(), 3);
        assert_eq!(h.scene.hud().score, "Score: 30");
        assert_eq!(h.played.borrow().len(), 3);
        assert_eq!(h.played.borrow()[0], HapticPulse::bumper());
    }

    #[test]
    fn test_contact_order_does_not_matter() {
        let mut h = default_harness();
        let ball = h.ball();
        let bumper = h.bumper(0);
        h.world.queue_contact(bumper, ball);
        h.step();
        assert_eq!(h.scene.state().score(), 10);
    }

    #[test]
    fn test_only_hit_bumper_pulses() {
        let mut h = default_harness();
        let ball = h.ball();
        let bumper = h.bumper(2);
        h.world.queue_contact(ball, bumper);
        h.step();
        let scales = h.scene.bumper_scales();
        assert!(scales[2] > 1.0);
        for (i, s) in scales.iter().enumerate() {
            if i != 2 {
                assert_eq!(*s, 1.0);
            }
        }
    }

    #[test]
    fn test_pulse_settles_back_to_rest() {
        let mut h = default_harness();
        let ball = h.ball();
        let bumper = h.bumper(0);
        h.world.queue_contact(ball, bumper);
        for _ in 0..60 {
            h.step();
        }
        assert!(h.scene.bumper_scales().iter().all(|s| *s == 1.0));
    }

    #[test]
    fn test_haptics_unavailable_still_scores() {
        let mut h = Harness::new(Settings::default(), STARTING_LIVES, false);
        let ball = h.ball();
        let bumper = h.bumper(1);
        h.world.queue_contact(ball, bumper);
        h.step();
        assert_eq!(h.scene.state().score(), 10);
        assert!(h.played.borrow().is_empty());
        assert!(h.scene.bumper_scales()[1] > 1.0);
    }

    #[test]
    fn test_drain_with_lives_left_resets_ball() {
        let mut h = Harness::new(Settings::default(), 2, true);
        let ball = h.ball();
        h.world.set_velocity(ball, Vec2::new(40.0, -300.0));
        h.world.set_angular_velocity(ball, 3.0);
        h.sink_ball();
        h.step();

        assert_eq!(h.scene.state().lives(), 1);
        assert!(!h.scene.state().is_over());
        assert_eq!(h.scene.hud().lives, "Lives: 1");

        let body = h.world.body(ball).unwrap();
        let bounds = Bounds::default();
        assert_eq!(body.position.y, bounds.max.y - BALL_SPAWN_DROP);
        assert!(body.position.x >= bounds.min.x + BALL_SPAWN_MARGIN);
        assert!(body.position.x <= bounds.max.x - BALL_SPAWN_MARGIN);
        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(body.angular_velocity, 0.0);
    }

    #[test]
    fn test_last_life_drain_ends_game() {
        let mut h = Harness::new(Settings::default(), 1, true);
        let ball = h.ball();
        h.sink_ball();
        h.step();

        assert!(h.scene.state().is_over());
        assert_eq!(h.scene.state().lives(), 0);
        assert!(h.scene.ball().is_none());
        assert!(!h.world.contains(ball));
        assert_eq!(h.scene.hud().banner, Some(GAME_OVER_BANNER));

        match h.scene.take_request() {
            Some(SceneRequest::ReplaceAfter { delay, .. }) => {
                assert_eq!(delay, GAME_OVER_RESTART_SECS)
            }
            None => panic!("expected a replacement request"),
        }
        assert!(h.scene.take_request().is_none());
    }

    #[test]
    fn test_no_scoring_after_game_over() {
        let mut h = Harness::new(Settings::default(), 1, true);
        let ball = h.ball();
        let bumper = h.bumper(0);
        h.sink_ball();
        h.step();

        // Stale contact from the removed ball
        let event = ContactEvent {
            a: ContactBody {
                handle: ball,
                category: CategoryMask::BALL,
            },
            b: ContactBody {
                handle: bumper,
                category: CategoryMask::BUMPER,
            },
        };
        h.with_ctx(|scene, ctx| scene.on_contact_begin(ctx, &event));
        assert_eq!(h.scene.state().score(), 0);
        assert_eq!(h.scene.state().lives(), 0);
    }

    #[test]
    fn test_boundary_contact_drain_counts_once() {
        let settings = Settings {
            drain_mode: DrainMode::BoundaryContact,
            ..Default::default()
        };
        let mut h = Harness::new(settings, 3, true);
        let ball = h.ball();
        let bottom = h.bottom();

        // Two reports of the same touch within one step
        h.world.queue_contact(ball, bottom);
        h.world.queue_contact(ball, bottom);
        let contacts = h.world.step(SIM_DT);
        h.with_ctx(|scene, ctx| {
            for contact in &contacts {
                scene.on_contact_begin(ctx, contact);
            }
        });
        assert_eq!(h.scene.state().lives(), 2);

        // Respawned above the line, so the next touch counts again
        h.with_ctx(|scene, ctx| scene.on_update(ctx, SIM_DT));
        h.world.queue_contact(ball, bottom);
        h.step();
        assert_eq!(h.scene.state().lives(), 1);
    }

    #[test]
    fn test_position_mode_ignores_bottom_contact() {
        let mut h = default_harness();
        let ball = h.ball();
        let bottom = h.bottom();
        h.world.queue_contact(ball, bottom);
        h.step();
        assert_eq!(h.scene.state().lives(), 3);
    }

    #[test]
    fn test_speed_is_clamped_after_step() {
        let mut h = default_harness();
        let ball = h.ball();
        h.world.set_velocity(ball, Vec2::new(0.0, 1200.0));
        h.step();
        let v = h.world.velocity(ball).unwrap();
        assert!((v.length() - BALL_MAX_SPEED).abs() < 1e-3);
        assert!(v.x.abs() < 1e-6 && v.y > 0.0);
    }

    #[test]
    fn test_touch_swings_matching_flipper() {
        let mut h = default_harness();
        h.with_ctx(|scene, ctx| scene.on_touch(ctx, Vec2::new(20.0, 300.0)));
        // Mid-hold
        for _ in 0..18 {
            h.step();
        }
        let left = h.scene.flipper_angle(FlipperSide::Left).unwrap();
        assert!((left - FLIPPER_SWING).abs() < 1e-4);
        assert_eq!(h.scene.flipper_angle(FlipperSide::Right), Some(0.0));

        let handle = h.world.handles_in(CategoryMask::FLIPPER)[0];
        assert!((h.world.rotation(handle).unwrap() - FLIPPER_SWING).abs() < 1e-4);
    }

    #[test]
    fn test_draw_lists_every_body() {
        let h = default_harness();
        let commands = h.scene.draw(&h.world);
        assert_eq!(commands.len(), 12);
        assert!(commands.iter().any(|c| matches!(
            c,
            DrawCommand::Circle {
                paint: Paint::Ball,
                ..
            }
        )));
    }

    proptest! {
        #[test]
        fn prop_repeated_drain_signals_cost_one_life(repeats in 1usize..6) {
            let mut h = Harness::new(Settings::default(), 3, true);
            h.sink_ball();
            h.with_ctx(|scene, ctx| {
                for _ in 0..repeats {
                    scene.drain(ctx);
                }
            });
            prop_assert_eq!(h.scene.state().lives(), 2);
        }

        #[test]
        fn prop_clamped_speed_never_exceeds_cap(vx in -5000.0f32..5000.0, vy in -5000.0f32..5000.0) {
            let mut h = default_harness();
            let ball = h.ball();
            h.world.set_velocity(ball, Vec2::new(vx, vy));
            h.step();
            let v = h.world.velocity(ball).unwrap();
            prop_assert!(v.length() <= BALL_MAX_SPEED + 1e-2);
        }
    }
}
