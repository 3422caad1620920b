//! HTTP surface for the bookstore catalog.
//!
//! Routes:
//! - `GET /`, `/books`, `/authors`, `/years`, `/search` render HTML views;
//! - `GET /create` answers `204`;
//! - `GET|POST /api/books` and `GET|PUT|DELETE /api/books/{id}` serve JSON;
//! - `/css/*` serves static stylesheets.

pub mod api;
pub mod config;
pub mod error;
pub mod html;
pub mod pages;
pub mod request_log;
pub mod startup;
pub mod state;

use crate::config::ServerConfig;
use crate::html::HtmlRenderer;
use crate::state::AppState;
use anyhow::Context;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use bookstore_core::CatalogService;
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Builds the application router over `state`.
pub fn router(state: AppState, css_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/books", get(pages::books))
        .route("/authors", get(pages::authors))
        .route("/years", get(pages::years))
        .route("/search", get(pages::search))
        .route("/create", get(pages::create))
        .route("/api/books", get(api::list_books).post(api::create_book))
        .route(
            "/api/books/{id}",
            get(api::get_book)
                .put(api::update_book)
                .delete(api::delete_book),
        )
        .nest_service("/css", ServeDir::new(css_dir.as_ref()))
        .layer(middleware::from_fn(request_log::log_requests))
        .with_state(state)
}

/// Bootstraps storage, serves until a shutdown signal, then closes storage.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let repo = startup::bootstrap_catalog(&config.storage).await?;
    let catalog = Arc::new(CatalogService::new(repo));
    let state = AppState::new(Arc::clone(&catalog), Arc::new(HtmlRenderer));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(
        "event=server_start module=server status=ok bind={} css_dir={}",
        config.bind,
        config.css_dir.display()
    );

    axum::serve(listener, router(state, &config.css_dir))
        .with_graceful_shutdown(startup::shutdown_signal())
        .await
        .context("server error")?;

    match Arc::try_unwrap(catalog) {
        Ok(service) => service
            .into_repository()
            .close()
            .context("failed to close catalog store")?,
        Err(_) => warn!(
            "event=db_close module=server status=deferred reason=catalog_still_shared"
        ),
    }
    info!("event=server_stop module=server status=ok");
    Ok(())
}
