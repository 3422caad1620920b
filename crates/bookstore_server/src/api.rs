//! JSON REST handlers under `/api/books`.
//!
//! Status policy:
//! - absent targets answer `204 No Content` on get/update/delete;
//! - bodies are parsed here so malformed JSON maps to `400`, not axum's `422`.

use crate::error::ApiError;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bookstore_core::{
    BookProjection, CreateBookRequest, CreateOutcome, DeleteOutcome, UpdateBookRequest,
    UpdateOutcome,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Success body `{"message": "..."}`.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

fn message(status: StatusCode, message: &'static str) -> Response {
    (status, Json(MessageResponse { message })).into_response()
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|_| ApiError::InvalidBody)
}

pub async fn list_books(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookProjection>>, ApiError> {
    let books = state.with_catalog(|catalog| catalog.list_books()).await?;
    Ok(Json(books))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let found = state
        .with_catalog(move |catalog| catalog.get_book(&id))
        .await?;
    Ok(match found {
        Some(book) => Json(book).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

pub async fn create_book(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: CreateBookRequest = parse_body(&body)?;
    let outcome = state
        .with_catalog(move |catalog| catalog.create_book(request))
        .await?;
    match outcome {
        CreateOutcome::Created => Ok(message(StatusCode::CREATED, "book created")),
        CreateOutcome::Duplicate => Err(ApiError::Duplicate),
    }
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: UpdateBookRequest = parse_body(&body)?;
    let outcome = state
        .with_catalog(move |catalog| catalog.update_book(&id, request))
        .await?;
    Ok(match outcome {
        UpdateOutcome::Updated => message(StatusCode::OK, "book updated"),
        UpdateOutcome::NoMatch => StatusCode::NO_CONTENT.into_response(),
    })
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let outcome = state
        .with_catalog(move |catalog| catalog.delete_book(&id))
        .await?;
    Ok(match outcome {
        DeleteOutcome::Deleted => message(StatusCode::OK, "book deleted"),
        DeleteOutcome::NoMatch => StatusCode::NO_CONTENT.into_response(),
    })
}
