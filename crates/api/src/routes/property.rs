use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{property, viewing};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(property::list).post(property::create))
        // Static segments before the {id} routes so /search, /nearby and
        // /mine are never captured as a property id.
        .route("/search", get(property::search))
        .route("/nearby", get(property::nearby))
        .route("/mine", get(property::list_mine))
        .route(
            "/{id}",
            get(property::get_by_id)
                .put(property::update)
                .delete(property::delete),
        )
        .route("/{id}/status", patch(property::set_status))
        .route("/{id}/views", post(property::track_view))
        .route("/{id}/views/stats", get(property::view_stats))
        .route(
            "/{id}/viewings",
            post(viewing::schedule).get(viewing::list_by_property),
        )
}
