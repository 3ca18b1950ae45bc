//! Garden configuration.
//!
//! Clock start time and speed, plot layout, and the optional plant catalog
//! path. Loaded from TOML; a missing or malformed file yields defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::time::MIN_TIME_SCALE;

/// Clock settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Hour of day 1 the clock starts at (0-23)
    pub start_hour: u32,
    /// Minute the clock starts at (0-59)
    pub start_minute: u32,
    /// Real-time multiplier
    pub time_scale: f32,
    /// Pause the clock while a menu is open
    pub pause_when_ui_open: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            start_hour: 6,
            start_minute: 0,
            time_scale: 1.0,
            pause_when_ui_open: true,
        }
    }
}

/// Garden layout settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenSettings {
    /// Number of plots
    pub plot_count: u32,
    /// Harvest RNG seed (None = random)
    pub rng_seed: Option<u64>,
    /// Capacity of the drainable event queue
    pub event_capacity: usize,
}

impl Default for GardenSettings {
    fn default() -> Self {
        Self {
            plot_count: 6,
            rng_seed: None,
            event_capacity: 1024,
        }
    }
}

/// Top-level garden configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenConfig {
    /// Plant catalog TOML (None = built-in herbs)
    pub catalog_path: Option<PathBuf>,
    /// Clock settings
    pub clock: ClockConfig,
    /// Garden settings
    pub garden: GardenSettings,
}

impl GardenConfig {
    /// Load configuration from a specific path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                config.validate();
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        // Clock
        self.clock.start_hour = self.clock.start_hour.min(23);
        self.clock.start_minute = self.clock.start_minute.min(59);
        if !self.clock.time_scale.is_finite() {
            self.clock.time_scale = 1.0;
        }
        self.clock.time_scale = self.clock.time_scale.max(MIN_TIME_SCALE);

        // Garden
        self.garden.plot_count = self.garden.plot_count.clamp(1, 256);
        self.garden.event_capacity = self.garden.event_capacity.max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GardenConfig::default();
        assert_eq!(config.clock.start_hour, 6);
        assert!(config.clock.pause_when_ui_open);
        assert_eq!(config.garden.plot_count, 6);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_config_validation() {
        let mut config = GardenConfig::default();
        config.clock.start_hour = 30;
        config.clock.time_scale = 0.0;
        config.garden.plot_count = 0;

        config.validate();

        assert_eq!(config.clock.start_hour, 23);
        assert!((config.clock.time_scale - 0.1).abs() < 0.001);
        assert_eq!(config.garden.plot_count, 1);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("garden.toml");

        let mut config = GardenConfig::default();
        config.clock.start_hour = 9;
        config.garden.rng_seed = Some(42);
        config.catalog_path = Some(PathBuf::from("plants.toml"));

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = GardenConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("garden.toml");
        fs::write(&config_path, "[garden]\nplot_count = 12\n").expect("write");

        let loaded = GardenConfig::load_from(&config_path);
        assert_eq!(loaded.garden.plot_count, 12);
        assert_eq!(loaded.clock, ClockConfig::default());
    }

    #[test]
    fn test_config_load_missing_or_malformed() {
        let config = GardenConfig::load_from("/nonexistent/path/garden.toml");
        assert_eq!(config, GardenConfig::default());

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("bad.toml");
        fs::write(&config_path, "clock = [").expect("write");
        assert_eq!(GardenConfig::load_from(&config_path), GardenConfig::default());
    }
}
