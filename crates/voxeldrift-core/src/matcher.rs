//! Rebuild matching - decides which existing voxel flies to which target
//!
//! Greedy, order-dependent, O(N·M):
//! - targets are visited in input order; each takes the cheapest untaken voxel
//! - cost = luma-weighted color distance, plus a large penalty when an organic
//!   (foliage/wood) voxel would land on a non-organic target
//! - a candidate cheaper than the exact-match threshold ends the scan early
//! - leftover voxels become rubble, leftover targets are dropped
//!
//! Input order matters twice: it breaks ties and it drives the stagger delay,
//! since earlier targets grab the best colors first.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::settings::RebuildSettings;
use crate::voxel::{SimulationVoxel, VoxelPoint};

/// Where one voxel goes during a rebuild, and when it starts moving
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RebuildAssignment {
    pub target: Vec3,
    /// Milliseconds after rebuild start before the voxel is released
    pub delay_ms: f64,
    /// No target: the voxel stays where it is
    pub is_rubble: bool,
}

impl RebuildAssignment {
    /// Stay in place, never released
    pub fn rubble(position: Vec3) -> Self {
        Self {
            target: position,
            delay_ms: 0.0,
            is_rubble: true,
        }
    }
}

/// Result of a matching pass
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchOutcome {
    /// Exactly one entry per voxel, indexed like the voxel array
    pub assignments: Vec<RebuildAssignment>,
    /// Targets that received a voxel
    pub matched: usize,
    /// Targets left without a voxel because the pool ran out
    pub dropped_targets: usize,
}

impl MatchOutcome {
    pub fn rubble_count(&self) -> usize {
        self.assignments.iter().filter(|a| a.is_rubble).count()
    }
}

struct PoolEntry {
    index: usize,
    taken: bool,
}

/// Greedy color matcher
pub struct RebuildMatcher<'a> {
    settings: &'a RebuildSettings,
    floor_y: f32,
}

impl<'a> RebuildMatcher<'a> {
    pub fn new(settings: &'a RebuildSettings, floor_y: f32) -> Self {
        Self { settings, floor_y }
    }

    /// Release delay for a target at height `y`: taller targets wait longer
    pub fn stagger_delay(&self, y: f32) -> f64 {
        let levels = ((y - self.floor_y) / self.settings.stagger_height).max(0.0);
        levels as f64 * self.settings.stagger_ms
    }

    /// Matching cost of putting `voxel` on `target`
    pub fn cost(&self, voxel: &SimulationVoxel, target: &VoxelPoint) -> f32 {
        let distance = voxel.color.perceptual_distance(target.color);
        if voxel.color.is_organic() && !target.color.is_organic() {
            distance + self.settings.organic_penalty
        } else {
            distance
        }
    }

    /// Assign targets to voxels
    ///
    /// Never fails: surplus voxels become rubble at their current position and
    /// surplus targets are dropped.
    pub fn assign(&self, voxels: &[SimulationVoxel], targets: &[VoxelPoint]) -> MatchOutcome {
        let mut pool: Vec<PoolEntry> = (0..voxels.len())
            .map(|index| PoolEntry {
                index,
                taken: false,
            })
            .collect();
        let mut slots: Vec<Option<RebuildAssignment>> = vec![None; voxels.len()];
        let mut matched = 0;
        let mut dropped_targets = 0;

        for target in targets {
            let mut best: Option<(usize, f32)> = None;

            for (slot, entry) in pool.iter().enumerate() {
                if entry.taken {
                    continue;
                }

                let cost = self.cost(&voxels[entry.index], target);
                if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                    best = Some((slot, cost));
                }

                // Nothing beats an exact, unpenalized match
                if cost < self.settings.exact_match_distance {
                    break;
                }
            }

            match best {
                Some((slot, _)) => {
                    let entry = &mut pool[slot];
                    entry.taken = true;
                    slots[entry.index] = Some(RebuildAssignment {
                        target: target.position,
                        delay_ms: self.stagger_delay(target.position.y),
                        is_rubble: false,
                    });
                    matched += 1;
                }
                None => dropped_targets += 1,
            }
        }

        let assignments: Vec<RebuildAssignment> = slots
            .into_iter()
            .zip(voxels)
            .map(|(slot, voxel)| slot.unwrap_or_else(|| RebuildAssignment::rubble(voxel.position)))
            .collect();

        let outcome = MatchOutcome {
            assignments,
            matched,
            dropped_targets,
        };

        log::debug!(
            "Rebuild matching: {} voxels, {} targets, {} matched, {} rubble, {} dropped",
            voxels.len(),
            targets.len(),
            outcome.matched,
            outcome.rubble_count(),
            outcome.dropped_targets
        );

        outcome
    }
}
