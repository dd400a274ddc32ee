//! Lifecycle controller
//!
//! Three states gate which system runs on each tick:
//!
//! ```text
//!            dismantle()              rebuild()
//!   Stable ─────────────► Dismantling ─────────► Rebuilding
//!     ▲  └──────────────── rebuild() ──────────────►  │
//!     └────────────── all voxels arrived ─────────────┘
//! ```
//!
//! `load_model()` forces Stable from any state. Dismantling has no automatic
//! exit: scattered voxels stay put until a rebuild is requested.

use std::collections::VecDeque;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::animator::{InterpolationAnimator, RebuildProgress};
use crate::color::VoxelColor;
use crate::matcher::{RebuildAssignment, RebuildMatcher};
use crate::physics::PhysicsIntegrator;
use crate::rng::VoxelRng;
use crate::settings::EngineSettings;
use crate::timestep::StepClock;
use crate::voxel::{SimulationVoxel, VoxelPoint, VoxelStore};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    #[default]
    Stable,
    Dismantling,
    Rebuilding,
}

/// Pending events kept when the host never drains; the oldest are dropped first
pub const MAX_PENDING_EVENTS: usize = 1024;

/// Notifications for the host, drained with [`Engine::drain_events`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    StateChanged {
        from: LifecycleState,
        to: LifecycleState,
    },
    VoxelCountChanged(usize),
}

/// What a single `tick()` did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// State after the tick
    pub state: LifecycleState,
    /// Simulation steps executed
    pub steps: u32,
    /// Transition that happened during this tick, if any
    pub transition: Option<(LifecycleState, LifecycleState)>,
    /// Released voxels still travelling after the last step (Rebuilding only)
    pub moving: usize,
}

/// Read-only per-voxel draw data
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderInstance {
    pub id: u32,
    pub position: Vec3,
    pub rotation: Vec3,
    pub color: VoxelColor,
}

impl From<&SimulationVoxel> for RenderInstance {
    fn from(voxel: &SimulationVoxel) -> Self {
        Self {
            id: voxel.id,
            position: voxel.position,
            rotation: voxel.rotation,
            color: voxel.color,
        }
    }
}

/// The simulation engine: voxel store plus the state machine driving it
pub struct Engine {
    settings: EngineSettings,
    store: VoxelStore,
    assignments: Vec<RebuildAssignment>,
    state: LifecycleState,
    rebuild_started_ms: f64,
    clock: StepClock,
    events: VecDeque<EngineEvent>,
}

impl Engine {
    pub fn new(settings: EngineSettings) -> Self {
        let clock = StepClock::new(&settings.timestep);
        Self {
            settings,
            store: VoxelStore::new(),
            assignments: Vec::new(),
            state: LifecycleState::Stable,
            rebuild_started_ms: 0.0,
            clock,
            events: VecDeque::new(),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn voxel_count(&self) -> usize {
        self.store.len()
    }

    pub fn voxels(&self) -> &[SimulationVoxel] {
        self.store.voxels()
    }

    /// Assignment from the most recent rebuild (cleared on load)
    pub fn assignments(&self) -> &[RebuildAssignment] {
        &self.assignments
    }

    /// Per-voxel position, rotation and color for the renderer
    pub fn snapshot(&self) -> impl Iterator<Item = RenderInstance> + '_ {
        self.store.voxels().iter().map(RenderInstance::from)
    }

    /// Take all pending notifications
    ///
    /// Hosts should drain every frame. At most [`MAX_PENDING_EVENTS`] are kept.
    pub fn drain_events(&mut self) -> std::collections::vec_deque::Drain<'_, EngineEvent> {
        self.events.drain(..)
    }

    fn push_event(&mut self, event: EngineEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
            log::trace!("Event queue full, dropping oldest event");
        }
        self.events.push_back(event);
    }

    fn set_state(&mut self, to: LifecycleState) -> Option<(LifecycleState, LifecycleState)> {
        let from = self.state;
        if from == to {
            return None;
        }
        self.state = to;
        self.push_event(EngineEvent::StateChanged { from, to });
        Some((from, to))
    }

    /// Replace the model, forcing the Stable state
    ///
    /// Any in-flight dismantle or rebuild is discarded.
    pub fn load_model<R: VoxelRng + ?Sized>(&mut self, points: &[VoxelPoint], rng: &mut R) {
        let count = self
            .store
            .load(points, self.settings.load.lightness_jitter, rng);
        self.assignments.clear();
        self.clock.reset();
        self.set_state(LifecycleState::Stable);
        self.push_event(EngineEvent::VoxelCountChanged(count));

        log::info!("Loaded model with {} voxels", count);
    }

    /// Scatter the model. Only valid from Stable; returns whether it took effect.
    pub fn dismantle<R: VoxelRng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.state != LifecycleState::Stable {
            log::debug!("Ignoring dismantle while {:?}", self.state);
            return false;
        }

        PhysicsIntegrator::explode(self.store.voxels_mut(), &self.settings.physics, rng);
        self.set_state(LifecycleState::Dismantling);

        log::info!("Dismantling {} voxels", self.store.len());
        true
    }

    /// Start flying the current voxels onto `targets`
    ///
    /// Ignored while already Rebuilding. From Dismantling the scattered positions
    /// at this instant become the starting points and physics stops.
    pub fn rebuild(&mut self, targets: &[VoxelPoint], now_ms: f64) -> bool {
        if self.state == LifecycleState::Rebuilding {
            log::debug!("Ignoring rebuild while already rebuilding");
            return false;
        }

        let matcher = RebuildMatcher::new(&self.settings.rebuild, self.settings.physics.floor_y);
        let outcome = matcher.assign(self.store.voxels(), targets);

        log::info!(
            "Rebuilding {} voxels onto {} targets ({} rubble, {} targets dropped)",
            self.store.len(),
            targets.len(),
            outcome.rubble_count(),
            outcome.dropped_targets
        );

        self.assignments = outcome.assignments;
        self.rebuild_started_ms = now_ms;
        self.set_state(LifecycleState::Rebuilding);
        true
    }

    /// Advance the simulation for one host frame
    pub fn tick(&mut self, now_ms: f64) -> TickReport {
        let steps = self.clock.advance(now_ms);
        let mut report = TickReport {
            state: self.state,
            steps: 0,
            transition: None,
            moving: 0,
        };

        for _ in 0..steps {
            match self.state {
                LifecycleState::Stable => break,
                LifecycleState::Dismantling => {
                    PhysicsIntegrator::step(self.store.voxels_mut(), &self.settings.physics);
                }
                LifecycleState::Rebuilding => {
                    let progress = self.step_rebuild(now_ms);
                    report.moving = progress.moving;
                    if progress.is_complete() {
                        report.transition = self.set_state(LifecycleState::Stable);
                        log::info!(
                            "Rebuild complete: {} voxels placed, {} rubble",
                            progress.arrived,
                            progress.rubble
                        );
                    }
                }
            }
            report.steps += 1;
        }

        report.state = self.state;
        report
    }

    fn step_rebuild(&mut self, now_ms: f64) -> RebuildProgress {
        let elapsed_ms = now_ms - self.rebuild_started_ms;
        InterpolationAnimator::step(
            self.store.voxels_mut(),
            &self.assignments,
            elapsed_ms,
            &self.settings.rebuild,
        )
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}
