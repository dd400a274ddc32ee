//! Host configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `voxeldrift.ron` file (if exists)
//! 3. Environment variables prefixed with `VOXELDRIFT_`
//!
//! Example environment variable: `VOXELDRIFT_ENGINE__PHYSICS__GRAVITY=0.04`

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use voxeldrift_core::EngineSettings;

/// Main host configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub engine: EngineSettings,
}

/// Headless run choreography
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Virtual frame length in milliseconds
    pub frame_ms: f64,
    /// Frames to simulate between dismantle and rebuild
    pub dismantle_frames: u32,
    /// Safety bound on rebuild frames
    pub max_rebuild_frames: u32,
    /// RNG seed for color jitter and the explosion impulse
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frame_ms: 1000.0 / 60.0,
            dismantle_frames: 180,
            max_rebuild_frames: 10_000,
            seed: 42,
        }
    }
}

impl AppConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `voxeldrift.ron` file (if exists)
    /// 3. Environment variables prefixed with `VOXELDRIFT_` (highest priority)
    pub fn load() -> Result<Self> {
        let run = RunConfig::default();
        let engine = EngineSettings::default();

        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("run.frame_ms", run.frame_ms)?
            .set_default("run.dismantle_frames", run.dismantle_frames as i64)?
            .set_default("run.max_rebuild_frames", run.max_rebuild_frames as i64)?
            .set_default("run.seed", run.seed as i64)?
            .set_default("engine.physics.gravity", engine.physics.gravity as f64)?
            .set_default("engine.physics.floor_y", engine.physics.floor_y as f64)?
            .set_default("engine.physics.restitution", engine.physics.restitution as f64)?
            .set_default("engine.physics.friction", engine.physics.friction as f64)?
            .set_default(
                "engine.physics.rotational_damping",
                engine.physics.rotational_damping as f64,
            )?
            .set_default("engine.rebuild.ease_speed", engine.rebuild.ease_speed as f64)?
            .set_default("engine.rebuild.stagger_ms", engine.rebuild.stagger_ms)?
            .set_default(
                "engine.load.lightness_jitter",
                engine.load.lightness_jitter as f64,
            )?
            // Layer 2: Config file (optional, won't error if missing)
            .add_source(
                File::with_name("voxeldrift")
                    .format(config::FileFormat::Ron)
                    .required(false),
            )
            // Layer 3: Environment variables (VOXELDRIFT_RUN__SEED, etc.)
            .add_source(Environment::with_prefix("VOXELDRIFT").separator("__"));

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
