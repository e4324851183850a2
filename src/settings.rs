//! Player preferences
//!
//! Persisted in LocalStorage on the web; natively the defaults are used.

use serde::{Deserialize, Serialize};

/// How a drained ball is detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DrainMode {
    /// Ball centre sinks below the drain line (checked every step)
    #[default]
    Position,
    /// Ball touches the bottom edge (contact event)
    BoundaryContact,
}

impl DrainMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrainMode::Position => "Position",
            DrainMode::BoundaryContact => "BoundaryContact",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "position" => Some(DrainMode::Position),
            "boundary" | "boundarycontact" | "contact" => Some(DrainMode::BoundaryContact),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Feedback ===
    /// Vibrate on bumper hits
    pub haptics: bool,

    // === Rules ===
    /// Drain detection strategy
    pub drain_mode: DrainMode,

    // === Debug overlay ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Show live node count
    pub show_node_count: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            haptics: true,
            drain_mode: DrainMode::Position,
            show_fps: true,
            show_node_count: true,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neon_pinball_settings";

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Apply overrides from a page query such as `?drain=contact`.
    /// Returns true if anything changed.
    pub fn apply_query(&mut self, query: &str) -> bool {
        let mut changed = false;
        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            if key != "drain" {
                continue;
            }
            match DrainMode::from_str(value) {
                Some(mode) if mode != self.drain_mode => {
                    log::info!("Drain mode set to {}", mode.as_str());
                    self.drain_mode = mode;
                    changed = true;
                }
                Some(_) => {}
                None => log::warn!("Unknown drain mode '{}'", value),
            }
        }
        changed
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring corrupt settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.haptics);
        assert_eq!(settings.drain_mode, DrainMode::Position);
    }

    #[test]
    fn test_json_roundtrip_keeps_drain_mode() {
        let settings = Settings {
            drain_mode: DrainMode::BoundaryContact,
            show_fps: false,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"haptics": false}"#).unwrap();
        assert!(!settings.haptics);
        assert_eq!(settings.drain_mode, DrainMode::Position);
        assert!(settings.show_fps);
    }

    #[test]
    fn test_corrupt_json_is_an_error() {
        assert!(Settings::from_json("{not json").is_err());
    }

    #[test]
    fn test_query_switches_drain_mode() {
        let mut settings = Settings::default();
        assert!(settings.apply_query("?debug=1&drain=contact"));
        assert_eq!(settings.drain_mode, DrainMode::BoundaryContact);
        // Already set
        assert!(!settings.apply_query("?drain=boundary"));
        assert!(settings.apply_query("drain=Position"));
        assert_eq!(settings.drain_mode, DrainMode::Position);
    }

    #[test]
    fn test_query_ignores_unknown_values() {
        let mut settings = Settings::default();
        assert!(!settings.apply_query(""));
        assert!(!settings.apply_query("?drain=sideways&drain"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_drain_mode_from_str() {
        assert_eq!(DrainMode::from_str("Contact"), Some(DrainMode::BoundaryContact));
        assert_eq!(DrainMode::from_str("position"), Some(DrainMode::Position));
        assert_eq!(DrainMode::from_str("nope"), None);
        assert_eq!(DrainMode::BoundaryContact.as_str(), "BoundaryContact");
    }
}
