//! Record City
//!
//! Run with: cargo run -p city-scene
//!
//! Examples:
//!   cargo run -p city-scene -- --records data/records.json
//!   cargo run -p city-scene -- --seed 7 --layout layout.toml

use bevy::prelude::*;
use clap::Parser;
use std::path::PathBuf;

use city_core::{CameraRig, DisclosureScheduler, LayoutConfig};
use city_events::CameraPose;
use city_scene::{CityScenePlugin, SceneSettings};

/// Record City visualization
#[derive(Parser, Debug)]
#[command(name = "city-scene")]
#[command(about = "Procedural city view over structured records")]
struct Args {
    /// Path to the records JSON file
    #[arg(long, default_value = "data/records.json")]
    records: PathBuf,

    /// Optional layout TOML file (compiled-in defaults when absent)
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Root seed for reproducible variation
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() {
    let args = Args::parse();

    let layout = match &args.layout {
        Some(path) => match LayoutConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load layout config {:?}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => LayoutConfig::default(),
    };

    let settings = SceneSettings {
        seed: args.seed,
        records_path: args.records,
        layout,
    };

    App::new()
        .insert_resource(DisclosureScheduler::new(
            settings.layout.disclosure.base_step_ms,
        ))
        .insert_resource(CameraRig::new(
            settings.layout.camera.clone(),
            CameraPose::default(),
        ))
        .insert_resource(settings)
        .add_plugins(CityScenePlugin)
        .run();
}
