//! Session configuration
//!
//! Geometry and rules are fixed once a session is dealt. Presentation timing
//! is only advice for whoever animates the events; the engine never waits on
//! it. Persisted as JSON (a file on native, LocalStorage on web).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::GameEvent;
use crate::sim::geometry::GridGeometry;

/// Failures loading or validating persisted configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Gameplay rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Smallest connected group that pops
    pub match_threshold: usize,
    /// Rows left empty at the bottom of a fresh board
    pub empty_rows: i32,
    pub session_secs: u32,
    /// Projectile speed in units per second
    pub launch_speed: f32,
    /// Radians kept between the aim and horizontal
    pub aim_margin: f32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            match_threshold: 3,
            empty_rows: 3,
            session_secs: SESSION_SECS,
            launch_speed: LAUNCH_SPEED,
            aim_margin: AIM_MARGIN,
        }
    }
}

impl Rules {
    /// Session length in simulation ticks
    pub fn session_ticks(&self) -> u32 {
        self.session_secs * (1.0 / SIM_DT).round() as u32
    }
}

/// How long a presentation layer should show each kind of event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationTiming {
    /// Pop animation before matched bubbles disappear
    pub pop_delay_ms: u64,
    /// Fall animation for detached bubbles
    pub fall_duration_ms: u64,
    /// Delay before "+10"/"+5" floating text appears
    pub floating_text_delay_ms: u64,
}

impl Default for PresentationTiming {
    fn default() -> Self {
        Self {
            pop_delay_ms: 200,
            fall_duration_ms: 500,
            floating_text_delay_ms: 100,
        }
    }
}

impl PresentationTiming {
    /// Display time for an event, if it is animated at all
    pub fn display_for(&self, event: &GameEvent) -> Option<Duration> {
        let ms = match event {
            GameEvent::MatchFound { .. } => self.pop_delay_ms,
            GameEvent::BubblesDetached { .. } => self.fall_duration_ms,
            GameEvent::ScoreAwarded { .. } => self.floating_text_delay_ms,
            _ => return None,
        };
        Some(Duration::from_millis(ms))
    }
}

/// All configurable values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub geometry: GridGeometry,
    pub rules: Rules,
    pub presentation: PresentationTiming,
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "bubble_shooter_settings";

    /// Parse and validate; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.geometry;
        let r = &self.rules;
        if !(g.bubble_radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "bubble_radius must be positive, got {}",
                g.bubble_radius
            )));
        }
        if g.cols <= 0 || g.rows <= 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must have rows and columns, got {}x{}",
                g.rows, g.cols
            )));
        }
        if g.collision_slack < 0.0 {
            return Err(ConfigError::Invalid("collision_slack must not be negative".into()));
        }
        if g.fail_line_y <= g.top_margin {
            return Err(ConfigError::Invalid(format!(
                "fail line {} must lie below the top margin {}",
                g.fail_line_y, g.top_margin
            )));
        }
        if r.match_threshold < 2 {
            return Err(ConfigError::Invalid("match_threshold must be at least 2".into()));
        }
        if r.empty_rows < 0 || r.empty_rows > g.rows {
            return Err(ConfigError::Invalid(format!(
                "empty_rows {} outside 0..={}",
                r.empty_rows, g.rows
            )));
        }
        if !(r.launch_speed > 0.0) {
            return Err(ConfigError::Invalid("launch_speed must be positive".into()));
        }
        Ok(())
    }

    /// Load settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
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
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
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
}
