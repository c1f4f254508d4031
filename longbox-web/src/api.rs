//! JSON API handlers
//!
//! Every endpoint answers with a JSON document, 404 when the queried
//! entity is empty, or 500 with the error text echoed in the `error`
//! response header rather than the body.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use longbox_common::model::Document;
use longbox_common::{Error, Result};

use crate::store::Dimension;
use crate::AppState;

/// Response header carrying the error detail on HTTP 500.
pub const ERROR_HEADER: &str = "error";

/// Optional `?q=` filter for list endpoints.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
}

// Comics

pub async fn list_comics(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let result = match &query.q {
        Some(expression) => state.store.find_comics(expression),
        None => state.store.list_comics(),
    };
    json_response(result)
}

pub async fn get_comic(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    json_response(state.store.comic_by_id(&id))
}

pub async fn list_phase_issues(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    json_response(state.store.comics_by_phase(&id))
}

pub async fn list_group_issues(
    State(state): State<AppState>,
    Path((id, sort_id)): Path<(String, String)>,
) -> Response {
    json_response(state.store.comics_by_group(&id, &sort_id))
}

// Phases

pub async fn list_phases(State(state): State<AppState>) -> Response {
    json_response(state.store.list_namables(Dimension::Phases))
}

pub async fn get_phase(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    json_response(state.store.namable_by_id(Dimension::Phases, &id))
}

pub async fn list_fissues(State(state): State<AppState>) -> Response {
    json_response(state.store.list_fissues(Dimension::Phases))
}

pub async fn get_phase_fissues(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    json_response(state.store.fissues_by_id(Dimension::Phases, &id))
}

// Events

pub async fn list_events(State(state): State<AppState>) -> Response {
    json_response(state.store.list_namables(Dimension::Events))
}

pub async fn get_event(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    json_response(state.store.namable_by_id(Dimension::Events, &id))
}

pub async fn get_event_fissues(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    json_response(state.store.fissues_by_id(Dimension::Events, &id))
}

// Characters

pub async fn list_characters(State(state): State<AppState>) -> Response {
    json_response(state.store.list_namables(Dimension::Characters))
}

pub async fn get_character(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    json_response(state.store.namable_by_id(Dimension::Characters, &id))
}

pub async fn get_character_fissues(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    json_response(state.store.fissues_by_id(Dimension::Characters, &id))
}

// Creators

pub async fn list_creators(State(state): State<AppState>) -> Response {
    json_response(state.store.list_namables(Dimension::Creators))
}

pub async fn get_creator(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    json_response(state.store.namable_by_id(Dimension::Creators, &id))
}

pub async fn get_creator_fissues(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    json_response(state.store.fissues_by_id(Dimension::Creators, &id))
}

// Health

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "longbox-web".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

// Response writers

fn json_response<T: Document>(result: Result<T>) -> Response {
    match result {
        Err(e) => error_response(&e),
        Ok(document) if document.is_empty() => StatusCode::NOT_FOUND.into_response(),
        Ok(document) => match document.to_json() {
            Err(e) => error_response(&e),
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response(),
        },
    }
}

pub(crate) fn error_response(error: &Error) -> Response {
    // Header values must stay on one line
    let detail = error.to_string().replace(['\r', '\n'], " ");
    (StatusCode::INTERNAL_SERVER_ERROR, [(ERROR_HEADER, detail)], ()).into_response()
}
