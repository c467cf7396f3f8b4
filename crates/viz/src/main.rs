//! Aquarium window
//!
//! Run with: cargo run -p aquarium-viz
//!
//! Examples:
//!   cargo run -p aquarium-viz -- --count 40 --seed 7
//!   cargo run -p aquarium-viz -- --config tanks/reef.toml --assets-dir sprites

use aquarium_core::{AquariumError, DEFAULT_CONFIG_PATH};
use aquarium_viz::{ActiveConfig, AquariumPlugin, HostConfig};
use bevy::prelude::*;
use clap::Parser;
use std::path::PathBuf;

/// Animated aquarium
#[derive(Parser, Debug)]
#[command(name = "aquarium")]
#[command(about = "Animated aquarium scene in a window")]
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

    /// Random seed for the run
    #[arg(long)]
    seed: Option<u64>,

    /// Tuning file, reloaded when it changes
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the sprite images
    #[arg(long, default_value = "assets")]
    assets_dir: PathBuf,

    /// Seconds to wait for images before starting anyway
    #[arg(long, default_value_t = 10.0)]
    load_timeout: f32,
}

fn main() -> Result<(), AquariumError> {
    let args = Args::parse();

    let host = HostConfig {
        width: args.width,
        height: args.height,
        count: args.count,
        seed: args.seed,
        config_explicit: args.config.is_some(),
        config_path: args
            .config
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
        assets_dir: args.assets_dir,
        load_timeout: args.load_timeout,
    };
    let config = host.resolve()?;

    App::new()
        .insert_resource(host)
        .insert_resource(ActiveConfig(config))
        .add_plugins(AquariumPlugin)
        .run();
    Ok(())
}
