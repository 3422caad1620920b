//! HTML page and fragment handlers.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use bookstore_core::{CatalogViews, ViewModel};

type HtmlResult = Result<Html<Vec<u8>>, ApiError>;

fn render(state: &AppState, model: &ViewModel) -> HtmlResult {
    Ok(Html(model.render(state.renderer.as_ref())?))
}

pub async fn index(State(state): State<AppState>) -> HtmlResult {
    render(&state, &CatalogViews::index())
}

pub async fn books(State(state): State<AppState>) -> HtmlResult {
    let model = state
        .with_catalog(|catalog| CatalogViews::book_table(catalog))
        .await?;
    render(&state, &model)
}

pub async fn authors(State(state): State<AppState>) -> HtmlResult {
    let model = state
        .with_catalog(|catalog| CatalogViews::authors(catalog))
        .await?;
    render(&state, &model)
}

pub async fn years(State(state): State<AppState>) -> HtmlResult {
    let model = state
        .with_catalog(|catalog| CatalogViews::years(catalog))
        .await?;
    render(&state, &model)
}

pub async fn search(State(state): State<AppState>) -> HtmlResult {
    render(&state, &CatalogViews::search_bar())
}

/// Placeholder for a create form; always `204`.
pub async fn create() -> StatusCode {
    StatusCode::NO_CONTENT
}
