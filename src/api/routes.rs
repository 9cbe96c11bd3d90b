//! API routes configuration module

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::cors::CorsLayer;

use crate::api::handlers::{articles, auth, briefs, health, runs, settings as settings_handlers};
use crate::config::Settings;
use crate::core::PipelineQueue;
use crate::db::Database;

/// Creates and configures the API router with all routes and shared state.
pub fn app(database: Database, queue: PipelineQueue, settings: Arc<Settings>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/runs", post(runs::create_run).get(runs::list_runs))
        .route("/api/runs/:id", get(runs::get_run))
        .route(
            "/api/briefs",
            post(briefs::create_brief).get(briefs::list_briefs),
        )
        .route(
            "/api/briefs/:id",
            get(briefs::get_brief).patch(briefs::update_brief),
        )
        .route(
            "/api/articles",
            post(articles::create_article).get(articles::list_articles),
        )
        .route("/api/articles/:id", get(articles::get_article))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route(
            "/api/settings",
            get(settings_handlers::get_settings).put(settings_handlers::update_settings),
        )
        .layer(Extension(database))
        .layer(Extension(queue))
        .layer(Extension(settings))
        .layer(CorsLayer::permissive())
}
