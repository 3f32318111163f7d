use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::viewing;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upcoming", get(viewing::upcoming))
        .route("/{id}/confirm", patch(viewing::confirm))
        .route("/{id}/cancel", patch(viewing::cancel))
        .route("/{id}/complete", patch(viewing::complete))
        .route("/{id}/no-show", patch(viewing::no_show))
}
