//! Controller settings
//!
//! One JSON document holds the tuning for every controller. Missing fields
//! fall back to defaults so older files keep loading.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::SIM_DT;
use crate::sim::{DroneConfig, GuidanceConfig, HoverConfig, TimerConfig};

/// All controller tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed tick length in seconds
    pub fixed_dt: f32,
    pub drone: DroneConfig,
    pub hover: HoverConfig,
    pub guidance: GuidanceConfig,
    pub timer: TimerConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fixed_dt: SIM_DT,
            drone: DroneConfig::default(),
            hover: HoverConfig::default(),
            guidance: GuidanceConfig::default(),
            timer: TimerConfig::default(),
        }
    }
}

impl Settings {
    /// Clamp every section in place
    pub fn validate(&mut self) {
        if self.fixed_dt.is_nan() || self.fixed_dt <= 0.0 {
            log::warn!("Invalid fixed_dt {}, using {}", self.fixed_dt, SIM_DT);
            self.fixed_dt = SIM_DT;
        }
        self.drone.validate();
        self.hover.validate();
        self.guidance.validate();
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.validate();
        Ok(settings)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from disk, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring corrupt settings {}: {}", path.display(), e),
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to read {}: {}", path.display(), e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to disk
    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let json = self.to_json().map_err(io::Error::other)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GuidanceMode;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "drone": { "movement_speed": 12.0 } }"#).unwrap();
        assert_eq!(settings.drone.movement_speed, 12.0);
        assert_eq!(settings.drone.elevation, DroneConfig::default().elevation);
        assert_eq!(settings.fixed_dt, SIM_DT);
    }

    #[test]
    fn test_out_of_range_values_clamped_on_load() {
        let json = r#"{
            "fixed_dt": -1.0,
            "drone": { "movement_speed": -3.0, "tilt_speed": 4.0 },
            "hover": { "hover_distance": -2.5, "drag": -1.0 },
            "guidance": { "mode": "Laser", "turn_rate": 9.0, "initial_velocity": 0.0 }
        }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.fixed_dt, SIM_DT);
        assert_eq!(settings.drone.movement_speed, 0.0);
        assert_eq!(settings.drone.tilt_speed, 1.0);
        assert_eq!(settings.hover.hover_distance, 2.5);
        assert_eq!(settings.hover.drag, 0.0);
        assert_eq!(settings.guidance.mode, GuidanceMode::Laser);
        assert_eq!(settings.guidance.turn_rate, 1.0);
        assert_eq!(settings.guidance.initial_velocity, 1.0);
    }

    #[test]
    fn test_validate_is_idempotent() {
        let mut settings = Settings::default();
        settings.drone.strafe_speed = -5.0;
        settings.validate();
        let once = settings.clone();
        settings.validate();
        assert_eq!(settings, once);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("hoverkit-settings-{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.hover.hover_distance = 3.0;
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path);
        assert_eq!(loaded, settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_or_corrupt_file_falls_back() {
        let missing = std::env::temp_dir().join("hoverkit-does-not-exist.json");
        assert_eq!(Settings::load(&missing), Settings::default());

        let path = std::env::temp_dir().join(format!("hoverkit-corrupt-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
        let _ = fs::remove_file(&path);
    }
}
