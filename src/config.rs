//! Game settings, loaded from a RON file.
//!
//! Every section falls back to its defaults, so a file only has to name the
//! values it changes:
//!
//! ```ron
//! (
//!     window: (title: "asteroids", width: 1280, height: 720),
//!     ship: (turn_rate: 4.0),
//! )
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::game::MIN_TICK_RATE;
use crate::transform::DEFAULT_ASPECT_STRETCH;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub simulation: SimulationConfig,
    pub ship: ShipConfig,
    pub asteroids: Vec<AsteroidSpawn>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub clear_color: [f32; 4],
    pub aspect_stretch: [f32; 2],
    pub ship_color: [f32; 4],
    pub asteroid_color: [f32; 4],
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Ticks per second.
    pub tick_rate: f32,
    pub max_ticks_per_frame: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    pub spawn: [f32; 2],
    pub scale: f32,
    /// Degrees per tick.
    pub turn_rate: f32,
    /// Velocity gained per tick of thrust.
    pub thrust: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AsteroidSpawn {
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub angle: f32,
    /// Degrees per tick.
    pub spin: f32,
    pub scale: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            render: RenderConfig::default(),
            simulation: SimulationConfig::default(),
            ship: ShipConfig::default(),
            asteroids: vec![AsteroidSpawn::default()],
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: String::from("vulkano asteroids"),
            width: 1920,
            height: 1080,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            aspect_stretch: DEFAULT_ASPECT_STRETCH,
            ship_color: [1.0, 1.0, 1.0, 1.0],
            asteroid_color: [0.6, 0.6, 0.6, 1.0],
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks_per_frame: 5,
        }
    }
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            spawn: [0.5, 0.5],
            scale: 0.05,
            turn_rate: 5.0,
            thrust: 0.0005,
        }
    }
}

impl Default for AsteroidSpawn {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0],
            velocity: [0.0, 0.0],
            angle: 0.0,
            spin: 0.0,
            scale: 0.1,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        let tick_rate = self.simulation.tick_rate;
        if !tick_rate.is_finite() || tick_rate < MIN_TICK_RATE {
            return Err(ConfigError::Invalid(format!(
                "tick_rate must be a finite number of at least {} Hz, got {}",
                MIN_TICK_RATE, tick_rate
            )));
        }
        if self.simulation.max_ticks_per_frame == 0 {
            return Err(ConfigError::Invalid(
                "max_ticks_per_frame must be at least 1".into(),
            ));
        }
        if !(self.ship.scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "ship scale must be positive, got {}",
                self.ship.scale
            )));
        }
        if let Some((i, a)) = self
            .asteroids
            .iter()
            .enumerate()
            .find(|(_, a)| !(a.scale > 0.0))
        {
            return Err(ConfigError::Invalid(format!(
                "asteroid {} scale must be positive, got {}",
                i, a.scale
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.asteroids.len(), 1);
        assert_eq!(config.render.aspect_stretch, DEFAULT_ASPECT_STRETCH);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::from_ron_str("(ship: (turn_rate: 3.0))").unwrap();
        assert_eq!(config.ship.turn_rate, 3.0);
        assert_eq!(config.ship.scale, 0.05);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn asteroid_list_replaces_default() {
        let config = Config::from_ron_str(
            "(asteroids: [(position: (0.5, -0.5), velocity: (0.001, 0.0)), (spin: 2.0)])",
        )
        .unwrap();
        assert_eq!(config.asteroids.len(), 2);
        assert_eq!(config.asteroids[0].position, [0.5, -0.5]);
        assert_eq!(config.asteroids[0].scale, 0.1);
        assert_eq!(config.asteroids[1].spin, 2.0);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::from_ron_str("(simulation: (tick_rate: 0.0))"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_ron_str("(window: (width: 0))"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_ron_str("(asteroids: [(scale: -1.0)])"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_degenerate_simulation_and_ship_values() {
        assert!(matches!(
            Config::from_ron_str("(simulation: (max_ticks_per_frame: 0))"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_ron_str("(ship: (scale: 0.0))"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_ron_str("(simulation: (tick_rate: 1e-20))"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn tick_rate_must_be_finite_and_at_least_one_hertz() {
        for rate in [f32::NAN, f32::INFINITY, -60.0, 0.5] {
            let mut config = Config::default();
            config.simulation.tick_rate = rate;
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "tick_rate {} was accepted",
                rate
            );
        }
        let mut config = Config::default();
        config.simulation.tick_rate = MIN_TICK_RATE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn reports_parse_errors() {
        assert!(matches!(
            Config::from_ron_str("(ship: (turn_rate: \"fast\"))"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn bundled_config_parses() {
        let config = Config::from_ron_str(include_str!("../asteroids.ron")).unwrap();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.asteroids.len(), 4);
        assert_eq!(config.asteroids[1].scale, 0.15);
        assert_eq!(config.simulation, SimulationConfig::default());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Config::load(Path::new("/definitely/not/here.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
