use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::saved_search;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(saved_search::list).post(saved_search::create))
        .route(
            "/{id}",
            patch(saved_search::update).delete(saved_search::delete),
        )
}
