#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Entry point for the community safety dashboard server.
//!
//! Settings are layered: built-in defaults, then the optional `--config`
//! TOML file, then command-line overrides. Bind address, port and static
//! directory come from `BIND_ADDR`, `PORT` and `STATIC_DIR`.

use std::path::PathBuf;

use clap::Parser;
use community_safety_dataset::DatasetConfig;
use community_safety_server::{ServerConfig, interactive, run_server};

#[derive(Parser)]
#[command(
    name = "community_safety_server",
    about = "Community safety dashboard API server"
)]
struct Cli {
    /// TOML file with dataset settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Crime dataset CSV, overriding the config file
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Suburb boundaries `GeoJSON`, overriding the config file
    #[arg(long)]
    boundaries: Option<PathBuf>,

    /// Prompt for settings before starting
    #[arg(long)]
    interactive: bool,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();

    let mut dataset = match &cli.config {
        Some(path) => {
            log::info!("Reading config from {}", path.display());
            DatasetConfig::from_toml_file(path).map_err(|e| {
                log::error!("Failed to read config: {e}");
                std::io::Error::other(e)
            })?
        }
        None => DatasetConfig::default(),
    };

    if let Some(path) = cli.dataset {
        dataset.dataset_path = path;
    }
    if let Some(path) = cli.boundaries {
        dataset.boundaries_path = path;
    }

    let config = ServerConfig::from_env(dataset);

    if cli.interactive {
        interactive::run(config).await
    } else {
        run_server(config).await
    }
}
