// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use treasure_hunt::{HuntManager, Settings};
use treasure_hunt_domain::TreasureHunt;
use treasure_hunt_persistence::PersistenceService;

/// Treasure Hunt - loads the stored treasure hunts and reports on each one
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON settings file. Values not present keep their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the treasure hunt files. Overrides the settings file.
    #[arg(short, long)]
    storage_dir: Option<PathBuf>,

    /// Treasure hunt file extension, including the leading dot.
    #[arg(short, long)]
    extension: Option<String>,

    /// Create a new, empty treasure hunt before reporting.
    #[arg(long)]
    new_hunt: bool,
}

/// Builds settings from an optional file, then applies command-line overrides.
fn build_settings(args: &Args) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings: Settings = match &args.config {
        Some(path) => read_settings(path)?,
        None => Settings::default(),
    };

    if let Some(dir) = &args.storage_dir {
        settings.storage.directory.clone_from(dir);
    }
    if let Some(extension) = &args.extension {
        settings.storage.extension.clone_from(extension);
    }

    Ok(settings)
}

fn read_settings(path: &Path) -> Result<Settings, Box<dyn std::error::Error>> {
    let bytes: Vec<u8> = std::fs::read(path)?;
    let settings: Settings = serde_json::from_slice(&bytes)?;
    info!("Read settings from {}", path.display());
    Ok(settings)
}

/// One-line report for a treasure hunt.
fn summarize(hunt: &TreasureHunt) -> String {
    format!(
        "{}: {} problems, {:.0}% complete, {} hint points available{}",
        hunt.title,
        hunt.problems.len(),
        hunt.percent_complete() * 100.0,
        hunt.hint_points_available(),
        if hunt.is_password_protected() {
            ", password protected"
        } else {
            ""
        }
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Treasure Hunt");

    let settings: Settings = build_settings(&args)?;
    info!(
        "Using storage directory {} with extension {}",
        settings.storage.directory.display(),
        settings.storage.extension
    );

    let persistence: PersistenceService = PersistenceService::start(settings.storage.clone());
    let mut manager: HuntManager = HuntManager::new(settings, persistence)?;
    let count: usize = manager.wait_until_loaded().await?;
    info!("{} treasure hunts loaded", count);

    if args.new_hunt {
        manager.create_treasure_hunt()?;
        manager.flush().await?;
    }

    let hunts: &[TreasureHunt] = manager.all_treasure_hunts().unwrap_or_default();
    if hunts.is_empty() {
        warn!("No treasure hunts found");
    }
    for hunt in hunts {
        info!("{}", summarize(hunt));
    }

    Ok(())
}
