//! Main entry point for the application.
//!
//! This module initializes logging, loads environment variables and
//! configuration, opens the task database, starts the pipeline worker pool
//! and serves the HTTP API until shutdown.

mod api;
mod cli;
mod config;
mod constants;
mod core;
mod db;
mod errors;
mod llm;
mod pipeline;
mod schema;
mod services;
mod utils;

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

/// Main entry point that initializes and runs the application.
///
/// # Initialization steps:
/// 1. Parse CLI arguments
/// 2. Initialize logging system
/// 3. Load environment variables and settings
/// 4. Open the database and fail over records interrupted by a restart
/// 5. Start the pipeline worker pool
/// 6. Serve the HTTP API
#[tokio::main]
async fn main() {
    let cli = cli::Cli::try_parse().expect("Failed to parse CLI arguments");
    utils::init_logging(&cli.logging_level, cli.log_to_file);

    if let Err(e) = dotenvy::dotenv() {
        warn!("Failed to load .env file: {}", e);
    }

    let mut settings = config::Settings::from_env();
    if let Some(port) = cli.port {
        settings.app_port = port;
    }
    if let Some(path) = cli.database_path {
        settings.database_path = path;
    }
    let settings = Arc::new(settings);

    let database = db::Database::new(&settings.database_path);
    core::mark_interrupted_tasks(&database);

    let llm = Arc::new(llm::LlmClient::from_settings(&settings));
    if !llm.enabled() {
        warn!("Running without a model backend; pipeline output will carry the disabled notice");
    }

    let (queue, rx) = core::PipelineQueue::new(settings.queue_capacity);
    let ctx = pipeline::PipelineContext {
        db: database.clone(),
        settings: Arc::clone(&settings),
        llm,
    };
    queue.spawn_workers(settings.pipeline_workers, rx, ctx);

    info!(
        "Starting API server on {}:{}",
        settings.app_host, settings.app_port
    );
    if let Err(e) = api::server::launch_server(settings, database, queue).await {
        error!("Failed to start server: {}", e);
    }
}
