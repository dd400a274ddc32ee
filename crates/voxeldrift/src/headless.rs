//! Headless choreography: load → dismantle → settle → rebuild
//!
//! Drives the engine on a virtual frame clock, so runs are reproducible and
//! independent of wall time.

use serde::{Deserialize, Serialize};
use voxeldrift_core::{Engine, EngineEvent, LifecycleState, SeededRng, VoxelPoint, seeded};

use crate::config::RunConfig;

/// Outcome of one headless run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub voxel_count: usize,
    pub target_count: usize,
    pub dismantle_frames: u32,
    pub rebuild_frames: u32,
    pub rubble: usize,
    pub final_state: LifecycleState,
    /// Virtual time at the end of the run (milliseconds)
    pub elapsed_ms: f64,
}

impl RunSummary {
    pub fn completed(&self) -> bool {
        self.final_state == LifecycleState::Stable
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "{} voxels → {} targets | dismantle: {} frames | rebuild: {} frames | rubble: {} | {:?} at {:.0}ms",
            self.voxel_count,
            self.target_count,
            self.dismantle_frames,
            self.rebuild_frames,
            self.rubble,
            self.final_state,
            self.elapsed_ms
        )
    }
}

/// Frame driver for one engine
pub struct HeadlessRun {
    engine: Engine,
    rng: SeededRng,
    config: RunConfig,
    now_ms: f64,
}

impl HeadlessRun {
    pub fn new(engine: Engine, config: RunConfig) -> Self {
        let rng = seeded(config.seed);
        Self {
            engine,
            rng,
            config,
            now_ms: 0.0,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    fn frame(&mut self) {
        self.now_ms += self.config.frame_ms;
        self.engine.tick(self.now_ms);
        self.log_events();
    }

    fn log_events(&mut self) {
        for event in self.engine.drain_events() {
            match event {
                EngineEvent::StateChanged { from, to } => {
                    log::info!("[{:>8.1}ms] {:?} → {:?}", self.now_ms, from, to);
                }
                EngineEvent::VoxelCountChanged(count) => {
                    log::info!("[{:>8.1}ms] voxel count: {}", self.now_ms, count);
                }
            }
        }
    }

    /// Run the full choreography from `model` to `targets`
    pub fn run(&mut self, model: &[VoxelPoint], targets: &[VoxelPoint]) -> RunSummary {
        self.engine.load_model(model, &mut self.rng);
        self.log_events();

        self.engine.dismantle(&mut self.rng);
        self.log_events();
        for _ in 0..self.config.dismantle_frames {
            self.frame();
        }

        self.engine.rebuild(targets, self.now_ms);
        self.log_events();
        let rubble = self
            .engine
            .assignments()
            .iter()
            .filter(|a| a.is_rubble)
            .count();

        let mut rebuild_frames = 0;
        while self.engine.state() == LifecycleState::Rebuilding
            && rebuild_frames < self.config.max_rebuild_frames
        {
            self.frame();
            rebuild_frames += 1;
        }

        if self.engine.state() != LifecycleState::Stable {
            log::warn!(
                "Rebuild still running after {} frames, stopping",
                rebuild_frames
            );
        }

        RunSummary {
            voxel_count: self.engine.voxel_count(),
            target_count: targets.len(),
            dismantle_frames: self.config.dismantle_frames,
            rebuild_frames,
            rubble,
            final_state: self.engine.state(),
            elapsed_ms: self.now_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxeldrift_core::{EngineSettings, VoxelColor};

    fn wall(width: i32, height: i32, rgb: u32) -> Vec<VoxelPoint> {
        let mut points = Vec::new();
        for x in 0..width {
            for y in 0..height {
                points.push(VoxelPoint::new(
                    x as f32,
                    y as f32 - 11.5,
                    0.0,
                    VoxelColor::from_packed(rgb),
                ));
            }
        }
        points
    }

    fn quick_config() -> RunConfig {
        RunConfig {
            dismantle_frames: 60,
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_run_completes() {
        let model = wall(4, 4, 0x8844CC);
        let mut run = HeadlessRun::new(Engine::new(EngineSettings::default()), quick_config());

        let summary = run.run(&model, &model);

        assert!(summary.completed(), "{}", summary.summary());
        assert_eq!(summary.voxel_count, 16);
        assert_eq!(summary.rubble, 0);
        assert!(summary.rebuild_frames > 0);
    }

    #[test]
    fn test_run_reports_rubble() {
        let model = wall(4, 4, 0x8844CC);
        let targets = wall(2, 2, 0x8844CC);
        let mut run = HeadlessRun::new(Engine::default(), quick_config());

        let summary = run.run(&model, &targets);

        assert!(summary.completed());
        assert_eq!(summary.rubble, 12);
    }

    #[test]
    fn test_same_seed_same_result() {
        let model = wall(3, 5, 0x33AA66);
        let mut a = HeadlessRun::new(Engine::default(), quick_config());
        let mut b = HeadlessRun::new(Engine::default(), quick_config());

        assert_eq!(a.run(&model, &model), b.run(&model, &model));
        assert_eq!(a.engine().voxels(), b.engine().voxels());
    }

    #[test]
    fn test_frame_bound_stops_run() {
        let model = wall(2, 2, 0x808080);
        let config = RunConfig {
            dismantle_frames: 10,
            max_rebuild_frames: 1,
            ..RunConfig::default()
        };
        let mut run = HeadlessRun::new(Engine::default(), config);

        let summary = run.run(&model, &model);

        assert_eq!(summary.rebuild_frames, 1);
        assert_eq!(summary.final_state, LifecycleState::Rebuilding);
    }
}
