//! Interactive mode for the server.
//!
//! Prompts for the data files, bind address and port before starting the
//! server.

use std::path::PathBuf;

use community_safety_dataset::DatasetConfig;
use dialoguer::{Confirm, Input};

use crate::ServerConfig;

/// Runs the server in interactive mode, prompting for configuration.
///
/// Each prompt defaults to the value already in `base`, so pressing enter
/// throughout starts the same server the non-interactive path would.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run(base: ServerConfig) -> std::io::Result<()> {
    println!("Community Safety Dashboard Server");
    println!();

    let dataset_path = prompt_path("Crime dataset (CSV)", &base.dataset.dataset_path);
    let boundaries_path = prompt_path("Suburb boundaries (GeoJSON)", &base.dataset.boundaries_path);

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(base.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| base.bind_addr.clone());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(base.port)
        .interact_text()
        .unwrap_or(base.port);

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    let config = ServerConfig {
        dataset: DatasetConfig {
            dataset_path,
            boundaries_path,
            ..base.dataset
        },
        bind_addr,
        port,
        static_dir: base.static_dir,
    };

    super::run_server(config).await
}

fn prompt_path(prompt: &str, default: &std::path::Path) -> PathBuf {
    let default = default.display().to_string();
    let value: String = Input::new()
        .with_prompt(prompt)
        .default(default.clone())
        .interact_text()
        .unwrap_or(default);
    PathBuf::from(value)
}
