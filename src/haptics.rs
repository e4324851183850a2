//! Haptic feedback
//!
//! Best-effort only: a missing or failing device never reaches game state.
//! On the web the pulse maps to `navigator.vibrate`.

use std::fmt;

use crate::consts::{HAPTIC_INTENSITY, HAPTIC_SHARPNESS};

/// A single transient haptic event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HapticPulse {
    /// 0.0 - 1.0
    pub intensity: f32,
    /// 0.0 - 1.0
    pub sharpness: f32,
    /// Seconds from now
    pub relative_time: f32,
}

impl HapticPulse {
    /// The bumper-hit pulse
    pub const fn bumper() -> Self {
        Self {
            intensity: HAPTIC_INTENSITY,
            sharpness: HAPTIC_SHARPNESS,
            relative_time: 0.0,
        }
    }

    /// Vibration length for devices that only take a duration
    pub fn duration_ms(&self) -> u32 {
        // Sharper pulses are shorter; 10-40 ms scaled by intensity
        let base = 40.0 - 30.0 * self.sharpness.clamp(0.0, 1.0);
        (base * self.intensity.clamp(0.0, 1.0)).round().max(1.0) as u32
    }

    /// Vibration pattern (alternating on/off milliseconds). A delayed pulse
    /// starts with an empty buzz followed by a pause.
    pub fn vibration_pattern(&self) -> Vec<u32> {
        let delay_ms = (self.relative_time.max(0.0) * 1000.0).round() as u32;
        if delay_ms == 0 {
            vec![self.duration_ms()]
        } else {
            vec![0, delay_ms, self.duration_ms()]
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HapticsError {
    /// Device has no haptic capability
    Unavailable,
    /// Engine refused to start
    EngineStart(String),
    /// Pattern playback failed
    Playback(String),
}

impl fmt::Display for HapticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HapticsError::Unavailable => write!(f, "haptics unavailable on this device"),
            HapticsError::EngineStart(reason) => write!(f, "haptic engine failed to start: {}", reason),
            HapticsError::Playback(reason) => write!(f, "haptic playback failed: {}", reason),
        }
    }
}

impl std::error::Error for HapticsError {}

/// Device haptics boundary
pub trait HapticDevice {
    fn supports_haptics(&self) -> bool;
    fn start(&mut self) -> Result<(), HapticsError>;
    fn play(&mut self, pulse: HapticPulse) -> Result<(), HapticsError>;
}

/// Device without haptic hardware
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl HapticDevice for NoHaptics {
    fn supports_haptics(&self) -> bool {
        false
    }

    fn start(&mut self) -> Result<(), HapticsError> {
        Err(HapticsError::Unavailable)
    }

    fn play(&mut self, _pulse: HapticPulse) -> Result<(), HapticsError> {
        Err(HapticsError::Unavailable)
    }
}

/// Browser Vibration API
#[cfg(target_arch = "wasm32")]
pub struct VibrationHaptics {
    navigator: Option<web_sys::Navigator>,
}

#[cfg(target_arch = "wasm32")]
impl VibrationHaptics {
    pub fn new() -> Self {
        Self {
            navigator: web_sys::window().map(|w| w.navigator()),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for VibrationHaptics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl HapticDevice for VibrationHaptics {
    fn supports_haptics(&self) -> bool {
        self.navigator
            .as_ref()
            .map(|nav| {
                js_sys::Reflect::has(nav, &wasm_bindgen::JsValue::from_str("vibrate"))
                    .unwrap_or(false)
            })
            .unwrap_or(false)
    }

    fn start(&mut self) -> Result<(), HapticsError> {
        if self.supports_haptics() {
            Ok(())
        } else {
            Err(HapticsError::EngineStart("navigator.vibrate missing".into()))
        }
    }

    fn play(&mut self, pulse: HapticPulse) -> Result<(), HapticsError> {
        let nav = self.navigator.as_ref().ok_or(HapticsError::Unavailable)?;
        let pattern = pulse.vibration_pattern();
        let accepted = match pattern.as_slice() {
            [duration] => nav.vibrate_with_duration(*duration),
            _ => {
                let steps: js_sys::Array = pattern
                    .iter()
                    .map(|ms| wasm_bindgen::JsValue::from(*ms))
                    .collect();
                nav.vibrate_with_pattern(&steps)
            }
        };
        if accepted {
            Ok(())
        } else {
            Err(HapticsError::Playback("vibrate request rejected".into()))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Readiness {
    /// `prepare` not called yet
    Cold,
    Ready,
    /// Capability missing or engine failed; pulses are skipped
    Disabled,
}

/// Fire-and-forget haptics on top of a device
pub struct HapticFeedback {
    device: Box<dyn HapticDevice>,
    readiness: Readiness,
    enabled: bool,
}

impl HapticFeedback {
    pub fn new(device: Box<dyn HapticDevice>) -> Self {
        Self {
            device,
            readiness: Readiness::Cold,
            enabled: true,
        }
    }

    /// No device at all
    pub fn none() -> Self {
        Self::new(Box::new(NoHaptics))
    }

    /// Turn pulses on/off (user preference)
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.readiness == Readiness::Ready
    }

    /// Query capability and start the engine. Safe to call repeatedly.
    pub fn prepare(&mut self) {
        if self.readiness != Readiness::Cold {
            return;
        }
        if !self.device.supports_haptics() {
            log::info!("Haptics not supported - feedback disabled");
            self.readiness = Readiness::Disabled;
            return;
        }
        match self.device.start() {
            Ok(()) => self.readiness = Readiness::Ready,
            Err(e) => {
                log::warn!("Failed to start haptic engine: {}", e);
                self.readiness = Readiness::Disabled;
            }
        }
    }

    /// Play a pulse if possible; errors are logged and dropped
    pub fn pulse(&mut self, pulse: HapticPulse) {
        if !self.enabled || self.readiness != Readiness::Ready {
            return;
        }
        if let Err(e) = self.device.play(pulse) {
            log::warn!("Haptic playback error: {}", e);
        }
    }
}
