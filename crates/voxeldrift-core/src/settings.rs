//! Engine tuning parameters
//!
//! All values default to the reference behavior: one simulation step per
//! `tick()` call, with per-tick constants (gravity, easing speed) that assume
//! roughly 60 ticks per second. Settings serialize to RON for presets.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    #[serde(default)]
    pub physics: PhysicsSettings,

    #[serde(default)]
    pub rebuild: RebuildSettings,

    #[serde(default)]
    pub load: LoadSettings,

    #[serde(default)]
    pub timestep: TimestepSettings,
}

/// Dismantle physics: gravity, floor response and the explosion impulse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Downward acceleration in units/tick²
    pub gravity: f32,
    /// Floor plane; voxel centers rest half a unit above it
    pub floor_y: f32,
    /// Fraction of vertical speed kept (and inverted) on floor contact
    pub restitution: f32,
    /// Horizontal velocity multiplier on floor contact
    pub friction: f32,
    /// Angular velocity multiplier on floor contact
    pub rotational_damping: f32,
    /// Explosion: horizontal velocity drawn from ±this
    pub impulse_horizontal: f32,
    /// Explosion: vertical velocity drawn from [min, max)
    pub impulse_vertical_min: f32,
    pub impulse_vertical_max: f32,
    /// Explosion: angular velocity per axis drawn from ±this (radians/tick)
    pub impulse_angular: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: 0.025,
            floor_y: -12.0,
            restitution: 0.5,
            friction: 0.9,
            rotational_damping: 0.8,
            impulse_horizontal: 0.4,
            impulse_vertical_min: 0.0,
            impulse_vertical_max: 0.5,
            impulse_angular: 0.1,
        }
    }
}

impl PhysicsSettings {
    /// Lowest allowed voxel center height
    pub fn floor_top(&self) -> f32 {
        self.floor_y + 0.5
    }
}

/// Rebuild matching and interpolation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebuildSettings {
    /// Fraction of the remaining distance covered per tick
    pub ease_speed: f32,
    /// Squared distance at which a voxel snaps onto its target
    pub snap_distance_sq: f32,
    /// Release delay added per `stagger_height` units above the floor
    pub stagger_ms: f64,
    pub stagger_height: f32,
    /// Color distance treated as an exact match (ends the candidate scan)
    pub exact_match_distance: f32,
    /// Cost added when an organic-colored voxel would land on a non-organic target
    pub organic_penalty: f32,
}

impl Default for RebuildSettings {
    fn default() -> Self {
        Self {
            ease_speed: 0.12,
            snap_distance_sq: 0.01,
            stagger_ms: 800.0,
            stagger_height: 15.0,
            exact_match_distance: 0.01,
            organic_penalty: 100.0,
        }
    }
}

/// Model loading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadSettings {
    /// Stored colors get a random HSL lightness offset in ±this
    pub lightness_jitter: f32,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self {
            lightness_jitter: 0.05,
        }
    }
}

/// Step scheduling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestepSettings {
    /// `None`: one step per tick. `Some(ms)`: fixed-size steps driven by wall time.
    pub fixed_step_ms: Option<f64>,
    /// Cap on catch-up steps per tick in fixed mode
    pub max_steps_per_tick: u32,
}

impl Default for TimestepSettings {
    fn default() -> Self {
        Self {
            fixed_step_ms: None,
            max_steps_per_tick: 4,
        }
    }
}

impl EngineSettings {
    /// Load settings from a RON file
    pub fn from_ron_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        let settings = ron::from_str(&content)
            .with_context(|| format!("Failed to parse RON settings: {}", path.display()))?;

        Ok(settings)
    }

    /// Save settings to a RON file
    pub fn to_ron_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let ron = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize settings to RON")?;

        std::fs::write(path.as_ref(), ron).with_context(|| {
            format!("Failed to write settings file: {}", path.as_ref().display())
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = EngineSettings::default();
        assert_eq!(settings.physics.gravity, 0.025);
        assert_eq!(settings.physics.floor_top(), -11.5);
        assert_eq!(settings.rebuild.ease_speed, 0.12);
        assert_eq!(settings.rebuild.stagger_ms, 800.0);
        assert_eq!(settings.load.lightness_jitter, 0.05);
        assert!(settings.timestep.fixed_step_ms.is_none());
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let settings: EngineSettings =
            ron::from_str("(physics: (gravity: 0.05), timestep: (fixed_step_ms: Some(16.0)))")
                .unwrap();
        assert_eq!(settings.physics.gravity, 0.05);
        assert_eq!(settings.physics.restitution, 0.5);
        assert_eq!(settings.timestep.fixed_step_ms, Some(16.0));
        assert_eq!(settings.rebuild, RebuildSettings::default());
    }

    #[test]
    fn test_ron_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.ron");

        let mut settings = EngineSettings::default();
        settings.physics.floor_y = -4.0;
        settings.rebuild.organic_penalty = 50.0;
        settings.to_ron_file(&path).unwrap();

        let loaded = EngineSettings::from_ron_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = EngineSettings::from_ron_file("/nonexistent/engine.ron");
        assert!(result.is_err());
    }
}
