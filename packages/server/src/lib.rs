#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the community safety dashboard.
//!
//! Loads the area dataset and suburb boundaries once at startup, then
//! serves chart-ready JSON for the dashboard's heatmap, gauges, pies, trend
//! and comparison charts. The dataset is immutable after load and shared
//! across workers through an [`Arc`]. An optional static frontend directory
//! is served at `/`.

mod handlers;
pub mod interactive;

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use community_safety_dataset::{Dataset, DatasetConfig};

/// Shared application state.
pub struct AppState {
    /// The loaded dataset.
    pub dataset: Arc<Dataset>,
}

/// Everything needed to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Source files and join settings.
    pub dataset: DatasetConfig,
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
    /// Directory holding a built frontend, served at `/` if present.
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Reads `BIND_ADDR` (default `127.0.0.1`), `PORT` (default `8080`) and
    /// `STATIC_DIR` from the environment.
    #[must_use]
    pub fn from_env(dataset: DatasetConfig) -> Self {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let static_dir = std::env::var("STATIC_DIR").ok().map(PathBuf::from);

        Self {
            dataset,
            bind_addr,
            port,
            static_dir,
        }
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/options", web::get().to(handlers::options))
            .route("/dashboard", web::get().to(handlers::dashboard))
            .route("/dashboard", web::post().to(handlers::dashboard_post))
            .route("/heatmap", web::get().to(handlers::heatmap))
            .route("/top-safest", web::get().to(handlers::top_safest))
            .route("/areas/{name}", web::get().to(handlers::area_detail)),
    );
}

/// Starts the dashboard API server.
///
/// Loads the dataset and boundaries named in `config.dataset`, then starts
/// the Actix-Web HTTP server. This is a regular async function; the caller
/// provides the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded (there is no degraded
/// mode), or if the HTTP server fails to bind or encounters a runtime error.
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    log::info!("Loading dataset...");
    let dataset = Dataset::load(&config.dataset).map_err(|e| {
        log::error!("Failed to load dataset: {e}");
        std::io::Error::other(e)
    })?;

    let state = web::Data::new(AppState {
        dataset: Arc::new(dataset),
    });

    let static_dir = config.static_dir.filter(|dir| {
        let exists = dir.is_dir();
        if !exists {
            log::warn!("Static directory {} not found, not serving it", dir.display());
        }
        exists
    });

    let bind_addr = config.bind_addr;
    let port = config.port;
    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        let app = App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure);

        match &static_dir {
            Some(dir) => app.service(Files::new("/", dir).index_file("index.html")),
            None => app,
        }
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
