//! Scripted animations
//!
//! Both animations are three-phase tweens driven by elapsed time. Triggering
//! again mid-sequence restarts from the current value; nothing queues.

use serde::{Deserialize, Serialize};

use super::layout::FlipperSide;
use crate::consts::*;

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Flipper swing: raise to full deflection, hold, lower back to rest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipperMotion {
    pub side: FlipperSide,
    angle: f32,
    /// Angle the current sequence started from
    from: f32,
    /// Time since activation, `None` when at rest
    elapsed: Option<f32>,
}

impl FlipperMotion {
    pub fn new(side: FlipperSide) -> Self {
        Self {
            side,
            angle: 0.0,
            from: 0.0,
            elapsed: None,
        }
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.elapsed.is_some()
    }

    pub fn activate(&mut self) {
        self.from = self.angle;
        self.elapsed = Some(0.0);
    }

    /// Advance by `dt` and return the new angle
    pub fn advance(&mut self, dt: f32) -> f32 {
        let Some(elapsed) = self.elapsed else {
            return self.angle;
        };
        let t = elapsed + dt;
        let phase = FLIPPER_PHASE_SECS;
        let swing = self.side.swing_angle();

        self.angle = if t < phase {
            lerp(self.from, swing, t / phase)
        } else if t < 2.0 * phase {
            swing
        } else if t < 3.0 * phase {
            lerp(swing, 0.0, (t - 2.0 * phase) / phase)
        } else {
            0.0
        };
        self.elapsed = if t < 3.0 * phase { Some(t) } else { None };
        self.angle
    }
}

/// Bumper hit pulse: scale up, then back to 1
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BumperPulse {
    scale: Option<f32>,
    from: f32,
    elapsed: f32,
}

impl BumperPulse {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale.unwrap_or(1.0)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.scale.is_some()
    }

    pub fn trigger(&mut self) {
        self.from = self.scale();
        self.elapsed = 0.0;
        self.scale = Some(self.from);
    }

    pub fn advance(&mut self, dt: f32) -> f32 {
        if self.scale.is_none() {
            return 1.0;
        }
        self.elapsed += dt;
        let t = self.elapsed;
        let phase = BUMPER_PULSE_PHASE_SECS;
        self.scale = if t < phase {
            Some(lerp(self.from, BUMPER_PULSE_SCALE, t / phase))
        } else if t < 2.0 * phase {
            Some(lerp(BUMPER_PULSE_SCALE, 1.0, (t - phase) / phase))
        } else {
            None
        };
        self.scale()
    }
}
