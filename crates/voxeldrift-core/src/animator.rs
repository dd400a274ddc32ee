//! Rebuild interpolation
//!
//! Released voxels close a fixed fraction of the remaining gap every step, so
//! they glide in fast and settle slowly. Once within the snap radius a voxel
//! is placed exactly on its target with zero rotation.

use glam::Vec3;

use crate::matcher::RebuildAssignment;
use crate::settings::RebuildSettings;
use crate::voxel::SimulationVoxel;

/// Per-step tally of rebuild progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RebuildProgress {
    /// Released and still travelling
    pub moving: usize,
    /// Delay not yet elapsed
    pub waiting: usize,
    /// Snapped onto their target
    pub arrived: usize,
    /// Never move
    pub rubble: usize,
}

impl RebuildProgress {
    /// Every non-rubble voxel has snapped onto its target
    pub fn is_complete(&self) -> bool {
        self.moving == 0 && self.waiting == 0
    }
}

/// Eases voxels toward their rebuild targets
pub struct InterpolationAnimator;

impl InterpolationAnimator {
    /// Advance every released voxel by one easing step
    ///
    /// `elapsed_ms` is wall time since the rebuild started; voxels whose delay
    /// has not passed are left untouched.
    pub fn step(
        voxels: &mut [SimulationVoxel],
        assignments: &[RebuildAssignment],
        elapsed_ms: f64,
        settings: &RebuildSettings,
    ) -> RebuildProgress {
        let mut progress = RebuildProgress::default();

        for (voxel, assignment) in voxels.iter_mut().zip(assignments) {
            if assignment.is_rubble {
                progress.rubble += 1;
                continue;
            }

            if elapsed_ms < assignment.delay_ms {
                progress.waiting += 1;
                continue;
            }

            voxel.position += (assignment.target - voxel.position) * settings.ease_speed;
            voxel.rotation += (Vec3::ZERO - voxel.rotation) * settings.ease_speed;

            if voxel.position.distance_squared(assignment.target) <= settings.snap_distance_sq {
                voxel.position = assignment.target;
                voxel.rotation = Vec3::ZERO;
                progress.arrived += 1;
            } else {
                progress.moving += 1;
            }
        }

        progress
    }
}
