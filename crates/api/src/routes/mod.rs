pub mod auth;
pub mod health;
pub mod notification;
pub mod property;
pub mod report;
pub mod saved_search;
pub mod viewing;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                       register (public)
/// /auth/login                          login (public)
///
/// /properties                          list (public), create (managers)
/// /properties/search                   criteria search (public)
/// /properties/nearby                   geo search (public, ?lat&lon&radius_km)
/// /properties/mine                     caller's listings (managers)
/// /properties/{id}                     get (public), update, delete
/// /properties/{id}/status              change status (PATCH)
/// /properties/{id}/views               record a view (POST, auth optional)
/// /properties/{id}/views/stats         view statistics (?range=, managers)
/// /properties/{id}/viewings            schedule (tenants), list
///
/// /viewings/upcoming                   confirmed viewings next 7 days
/// /viewings/{id}/confirm               confirm (managers, PATCH)
/// /viewings/{id}/cancel                cancel (either party, PATCH)
/// /viewings/{id}/complete              mark completed (managers, PATCH)
/// /viewings/{id}/no-show               mark no-show (managers, PATCH)
///
/// /saved-searches                      list, create
/// /saved-searches/{id}                 update (PATCH), delete
///
/// /reports/owner-dashboard             portfolio summary (managers)
/// /reports/market-trends               listing trends (?range=)
///
/// /notifications                       list
/// /notifications/unread-count          unread count (GET)
/// /notifications/read-all              mark all read (POST)
/// /notifications/{id}/read             mark read (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (register, login).
        .nest("/auth", auth::router())
        // Property listings, search, views and property-scoped viewings.
        .nest("/properties", property::router())
        // Viewing lifecycle transitions.
        .nest("/viewings", viewing::router())
        // Per-user saved searches.
        .nest("/saved-searches", saved_search::router())
        // Aggregate reporting.
        .nest("/reports", report::router())
        // Per-user notifications.
        .nest("/notifications", notification::router())
}
