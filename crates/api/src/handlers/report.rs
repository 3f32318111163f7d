//! Handlers for the `/reports` resource.

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use nyumba_core::error::CoreError;
use nyumba_core::report::{bucket_values, mean};
use nyumba_core::roles::can_manage_properties;
use nyumba_db::repositories::{
    NotificationRepo, PropertyRepo, PropertyViewRepo, ViewingRepo,
};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::RangeParams;
use crate::state::AppState;

/// Owner dashboard payload.
#[derive(Debug, Serialize)]
pub struct OwnerDashboard {
    pub total_properties: i64,
    pub available: i64,
    pub rented: i64,
    pub sold: i64,
    pub pending: i64,
    pub average_price: f64,
    pub pending_viewings: i64,
    pub total_views: i64,
    pub unread_notifications: i64,
}

/// GET /api/v1/reports/owner-dashboard
pub async fn owner_dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<OwnerDashboard>> {
    if !can_manage_properties(&user.role) {
        return Err(AppError::Core(CoreError::Forbidden(
            "The owner dashboard is only available to property managers".into(),
        )));
    }

    let counts = PropertyRepo::owner_counts(&state.pool, user.user_id).await?;
    let pending_viewings = ViewingRepo::count_pending_for_owner(&state.pool, user.user_id).await?;
    let total_views = PropertyViewRepo::total_for_owner(&state.pool, user.user_id).await?;
    let unread_notifications = NotificationRepo::unread_count(&state.pool, user.user_id).await?;

    Ok(Json(OwnerDashboard {
        total_properties: counts.total,
        available: counts.available,
        rented: counts.rented,
        sold: counts.sold,
        pending: counts.pending,
        average_price: mean(counts.price_sum, counts.total),
        pending_viewings,
        total_views,
        unread_notifications,
    }))
}

/// One bucket of the market-trends report.
#[derive(Debug, Serialize)]
pub struct TrendBucket {
    pub label: String,
    pub listings: i64,
    pub average_price: f64,
}

/// GET /api/v1/reports/market-trends?range=
///
/// New-listing counts and average asking price, bucketed over the
/// requested range. Buckets with no listings do not appear.
pub async fn market_trends(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<RangeParams>,
) -> AppResult<Json<Vec<TrendBucket>>> {
    let (start, end) = params.range.window(chrono::Utc::now());
    let samples = PropertyRepo::listed_between(&state.pool, start, end).await?;

    let pairs: Vec<_> = samples.iter().map(|s| (s.created_at, s.price)).collect();
    let buckets = bucket_values(&pairs, params.range)
        .into_iter()
        .map(|b| TrendBucket {
            average_price: mean(b.sum, b.count),
            label: b.label,
            listings: b.count,
        })
        .collect();

    Ok(Json(buckets))
}
