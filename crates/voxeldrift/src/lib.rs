//! # voxeldrift - headless host for the voxel rebuild engine
//!
//! Loads point files, runs a dismantle/rebuild choreography on a virtual
//! frame clock and exports the result.

pub mod config;
pub mod headless;

pub use config::{AppConfig, RunConfig};
pub use headless::{HeadlessRun, RunSummary};
