use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use voxeldrift::{AppConfig, HeadlessRun};
use voxeldrift_core::{Engine, read_points_file, write_export_file};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Model to load (JSON point list)
    #[arg(long)]
    model: PathBuf,

    /// Model to rebuild into (defaults to --model)
    #[arg(long)]
    target: Option<PathBuf>,

    /// RNG seed for color jitter and the explosion impulse
    #[arg(long)]
    seed: Option<u64>,

    /// Frames to simulate after dismantling, before the rebuild starts
    #[arg(long)]
    dismantle_frames: Option<u32>,

    /// Give up on the rebuild after this many frames
    #[arg(long)]
    max_frames: Option<u32>,

    /// Virtual frame length in milliseconds
    #[arg(long)]
    frame_ms: Option<f64>,

    /// Write the final voxel state here (JSON)
    #[arg(long)]
    export: Option<PathBuf>,

    /// Write the effective engine settings here (RON) and exit
    #[arg(long)]
    write_settings: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = AppConfig::load()?;
    if let Some(seed) = args.seed {
        config.run.seed = seed;
    }
    if let Some(frames) = args.dismantle_frames {
        config.run.dismantle_frames = frames;
    }
    if let Some(frames) = args.max_frames {
        config.run.max_rebuild_frames = frames;
    }
    if let Some(frame_ms) = args.frame_ms {
        config.run.frame_ms = frame_ms;
    }

    if let Some(path) = &args.write_settings {
        config.engine.to_ron_file(path)?;
        log::info!("Wrote engine settings to {}", path.display());
        return Ok(());
    }

    let model = read_points_file(&args.model)
        .with_context(|| format!("Failed to load model {}", args.model.display()))?;
    let targets = match &args.target {
        Some(path) => read_points_file(path)
            .with_context(|| format!("Failed to load target {}", path.display()))?,
        None => model.clone(),
    };

    log::info!(
        "Running {} voxels → {} targets (seed {})",
        model.len(),
        targets.len(),
        config.run.seed
    );

    let mut run = HeadlessRun::new(Engine::new(config.engine), config.run);
    let summary = run.run(&model, &targets);
    log::info!("{}", summary.summary());

    if let Some(path) = &args.export {
        write_export_file(path, run.engine().voxels())
            .with_context(|| format!("Failed to export to {}", path.display()))?;
        log::info!("Exported {} voxels to {}", run.engine().voxel_count(), path.display());
    }

    if !summary.completed() {
        anyhow::bail!("Rebuild did not finish within the frame limit");
    }

    Ok(())
}
