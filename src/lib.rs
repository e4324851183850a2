//! Neon Pinball - a single-screen pinball table
//!
//! Core modules:
//! - `sim`: Engine-agnostic game rules (categories, layout, state, animation)
//! - `engine`: Physics engine boundary and the rapier2d adapter
//! - `scene`: Scene hooks and the pinball collision & scoring state machine
//! - `stage`: Host adapter that drives a scene and swaps sessions
//! - `haptics`: Best-effort haptic feedback
//! - `hud`: Score/lives text derived from game state
//! - `input`: Touch to flipper mapping
//! - `settings`: Player preferences
//! - `renderer`: WebGPU rendering pipeline

pub mod engine;
pub mod haptics;
pub mod hud;
pub mod input;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod stage;

pub use settings::{DrainMode, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default playfield size (portrait)
    pub const PLAYFIELD_WIDTH: f32 = 390.0;
    pub const PLAYFIELD_HEIGHT: f32 = 844.0;

    /// World gravity (units/s², y-up)
    pub const GRAVITY_Y: f32 = -270.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 12.0;
    pub const BALL_RESTITUTION: f32 = 0.9;
    pub const BALL_FRICTION: f32 = 0.3;
    pub const BALL_LINEAR_DAMPING: f32 = 0.1;
    pub const BALL_ANGULAR_DAMPING: f32 = 0.2;
    /// Horizontal spawn margin from each side wall
    pub const BALL_SPAWN_MARGIN: f32 = 50.0;
    /// Spawn height below the top edge
    pub const BALL_SPAWN_DROP: f32 = 150.0;
    /// Speed cap applied every step
    pub const BALL_MAX_SPEED: f32 = 800.0;

    /// Flipper defaults
    pub const FLIPPER_WIDTH: f32 = 150.0;
    pub const FLIPPER_HEIGHT: f32 = 15.0;
    pub const FLIPPER_INSET: f32 = 10.0;
    pub const FLIPPER_ELEVATION: f32 = 100.0;
    pub const FLIPPER_RESTITUTION: f32 = 1.5;
    /// Deflection at full swing (30 degrees)
    pub const FLIPPER_SWING: f32 = std::f32::consts::FRAC_PI_6;
    /// Duration of each animation phase (raise, hold, lower)
    pub const FLIPPER_PHASE_SECS: f32 = 0.1;

    /// Bumper defaults
    pub const BUMPER_RADIUS: f32 = 25.0;
    pub const BUMPER_RESTITUTION: f32 = 1.5;
    pub const BUMPER_PULSE_SCALE: f32 = 1.3;
    pub const BUMPER_PULSE_PHASE_SECS: f32 = 0.1;

    /// World edges
    pub const EDGE_FRICTION: f32 = 0.2;
    pub const EDGE_RESTITUTION: f32 = 0.8;

    /// Rules
    pub const BUMPER_REWARD: u64 = 10;
    pub const STARTING_LIVES: u8 = 3;
    /// Ball drains once it sinks below this offset above the bottom edge
    pub const DRAIN_OFFSET: f32 = 50.0;
    /// Delay between game over and the fresh session
    pub const GAME_OVER_RESTART_SECS: f32 = 3.0;

    /// Haptic pulse on bumper contact
    pub const HAPTIC_INTENSITY: f32 = 0.8;
    pub const HAPTIC_SHARPNESS: f32 = 0.5;
}

/// Axis-aligned playfield rectangle in y-up coordinates
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Playfield anchored at the origin with the given size
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(Vec2::ZERO, Vec2::new(width, height))
    }

    #[inline]
    pub fn mid(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::from_size(consts::PLAYFIELD_WIDTH, consts::PLAYFIELD_HEIGHT)
    }
}

/// Rotate a vector by `angle` radians (counter-clockwise)
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}
