use axum::routing::get;
use axum::Router;

use crate::handlers::report;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/owner-dashboard", get(report::owner_dashboard))
        .route("/market-trends", get(report::market_trends))
}
