//! Voxel dismantle/rebuild simulation core
//!
//! This crate provides the frame-driven engine behind the voxel animations:
//! - Voxel storage and model loading (VoxelStore, VoxelPoint, SimulationVoxel)
//! - Scatter physics with floor bounce (PhysicsIntegrator)
//! - Greedy color matching of voxels to rebuild targets (RebuildMatcher)
//! - Eased, staggered flight onto targets (InterpolationAnimator)
//! - The Stable / Dismantling / Rebuilding state machine (Engine)
//! - JSON point import/export and RON settings

pub mod animator;
pub mod color;
pub mod engine;
pub mod interchange;
pub mod matcher;
pub mod physics;
pub mod rng;
pub mod settings;
pub mod timestep;
pub mod voxel;

pub use animator::{InterpolationAnimator, RebuildProgress};
pub use color::{VoxelColor, parse_color};
pub use engine::{
    Engine, EngineEvent, LifecycleState, MAX_PENDING_EVENTS, RenderInstance, TickReport,
};
pub use interchange::{
    ExportedVoxel, InterchangeError, export_json, export_voxels, import_points, read_points_file,
    write_export_file,
};
pub use matcher::{MatchOutcome, RebuildAssignment, RebuildMatcher};
pub use physics::PhysicsIntegrator;
pub use rng::{SeededRng, VoxelRng, seeded};
pub use settings::{
    EngineSettings, LoadSettings, PhysicsSettings, RebuildSettings, TimestepSettings,
};
pub use voxel::{SimulationVoxel, VoxelPoint, VoxelStore};
