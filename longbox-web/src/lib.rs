//! # Longbox Web Library
//!
//! Read-side server over the JSON artifacts: a JSON API plus the
//! generated HTML browsing site.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use store::Store;

pub mod api;
pub mod menu;
pub mod pages;
pub mod store;
pub mod template;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded artifact collections (read-only)
    pub store: Arc<Store>,
}

impl AppState {
    /// Create new application state
    pub fn new(store: Store) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/comics", get(api::list_comics))
        .route("/api/comics/:id", get(api::get_comic))
        .route("/api/fissues", get(api::list_fissues))
        .route("/api/phases", get(api::list_phases))
        .route("/api/phases/:id", get(api::get_phase))
        .route("/api/phases/:id/fissues", get(api::get_phase_fissues))
        .route("/api/phases/:id/issues", get(api::list_phase_issues))
        .route("/api/phases/:id/issues/:sortid", get(api::list_group_issues))
        .route("/api/events", get(api::list_events))
        .route("/api/events/:id", get(api::get_event))
        .route("/api/events/:id/fissues", get(api::get_event_fissues))
        .route("/api/characters", get(api::list_characters))
        .route("/api/characters/:id", get(api::get_character))
        .route(
            "/api/characters/:id/fissues",
            get(api::get_character_fissues),
        )
        .route("/api/creators", get(api::list_creators))
        .route("/api/creators/:id", get(api::get_creator))
        .route("/api/creators/:id/fissues", get(api::get_creator_fissues));

    let web = Router::new()
        .route("/", get(pages::index))
        .route("/about", get(pages::about))
        .route("/phases/:id", get(pages::phase_fissues))
        .route("/phases/:id/issues/:sortid", get(pages::group_issues))
        .route("/events/:id", get(pages::event_fissues))
        .route("/characters/:id", get(pages::character_fissues))
        .route("/creators", get(pages::creators_index))
        .route("/creators/:id", get(pages::creator_fissues));

    Router::new()
        .merge(api)
        .merge(web)
        .merge(api::health_routes())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
