//! Headless aquarium runner
//!
//! Runs the scene against a recording surface for a fixed number of ticks,
//! logging stats and optionally dumping the last frame as JSON.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use aquarium_core::output::write_frame;
use aquarium_core::{
    AnimationLoop, AquariumConfig, AquariumError, AquariumScene, ImageCatalog, ManualHost,
    RecordingSurface, DEFAULT_CONFIG_PATH,
};

/// Command line arguments for the headless runner
#[derive(Parser, Debug)]
#[command(name = "aquarium_headless")]
#[command(about = "Run the aquarium simulation without a window")]
struct Args {
    /// Scene width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Scene height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Number of creatures
    #[arg(long)]
    count: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Tuning file; a missing default file falls back to built-in values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read image sizes from this directory instead of using placeholders
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// Write the final frame's draw commands here as JSON
    #[arg(long)]
    dump_frame: Option<PathBuf>,

    /// Ticks between stats log lines (0 disables)
    #[arg(long, default_value_t = 100)]
    stats_interval: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), AquariumError> {
    let mut config = match &args.config {
        Some(path) => AquariumConfig::from_file(path)?,
        None => AquariumConfig::load_or_default(DEFAULT_CONFIG_PATH),
    };
    if let Some(width) = args.width {
        config.scene.width = width;
    }
    if let Some(height) = args.height {
        config.scene.height = height;
    }
    if let Some(count) = args.count {
        config.scene.count = count;
    }
    if let Some(seed) = args.seed {
        config.scene.seed = seed;
    }
    config.validate()?;

    let catalog = match &args.assets_dir {
        Some(dir) => ImageCatalog::probe_directory(&config.assets, dir),
        None => ImageCatalog::placeholder(&config.assets),
    };
    tracing::info!("Catalog holds {} images", catalog.images().len());

    let mut host = ManualHost::new();
    let mut animation = AnimationLoop::new(AquariumScene::new(config, catalog));
    let mut surface = RecordingSurface::new();
    animation.start(&mut host);

    let mut last_frame = None;
    for _ in 0..args.ticks {
        let Some(request) = host.next_request() else {
            break;
        };
        surface.clear();
        animation.on_frame(&mut host, request, &mut surface);

        let Some(scene) = animation.scene() else {
            break;
        };
        if args.stats_interval > 0 && scene.tick() % args.stats_interval == 0 {
            tracing::info!("{}", scene.stats());
        }
        if args.dump_frame.is_some() && scene.tick() == args.ticks {
            last_frame = Some(surface.take_frame(scene.tick(), scene.time()));
        }
    }

    if let Some(scene) = animation.scene() {
        let stats = scene.stats();
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }
    animation.stop(&mut host);

    if let (Some(path), Some(frame)) = (&args.dump_frame, last_frame) {
        write_frame(&frame, path)?;
    }
    Ok(())
}
