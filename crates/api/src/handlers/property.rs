//! Handlers for the `/properties` resource: CRUD, search, nearby lookup,
//! and view tracking.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use nyumba_core::error::CoreError;
use nyumba_core::geo::{self, Coordinates};
use nyumba_core::page::PageMeta;
use nyumba_core::property::PropertyStatus;
use nyumba_core::report::bucket_by_label;
use nyumba_core::roles::{can_manage_properties, ROLE_ADMIN};
use nyumba_core::types::DbId;
use nyumba_db::models::property::{CreateProperty, Property, UpdateProperty};
use nyumba_db::models::property_view::TrackView;
use nyumba_db::repositories::{PropertyRepo, PropertyViewRepo};
use nyumba_events::{kinds, DomainEvent};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::query::{NearbyParams, PageParams, RangeParams, SearchParams};
use crate::response::Page;
use crate::state::AppState;

/// Kilometers per degree of latitude, for the bounding-box prefilter.
const KM_PER_DEGREE_LAT: f64 = 111.195;

/// Load a property and check the caller may modify it.
///
/// Modification is allowed for the owner, the assigned dalali, and admins.
async fn load_for_modify(
    state: &AppState,
    id: DbId,
    user: &AuthUser,
) -> AppResult<Property> {
    let property = PropertyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Property",
            id,
        }))?;

    let allowed = user.role == ROLE_ADMIN
        || property.owner_id == user.user_id
        || property.dalali_id == Some(user.user_id);
    if !allowed {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the property owner, its dalali, or an admin may modify it".into(),
        )));
    }
    Ok(property)
}

/// POST /api/v1/properties
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateProperty>,
) -> AppResult<(StatusCode, Json<Property>)> {
    if !can_manage_properties(&user.role) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only owners, dalali, or admins may list properties".into(),
        )));
    }
    input.validate()?;

    let property = PropertyRepo::create(&state.pool, user.user_id, &input).await?;

    state.event_bus.publish(
        DomainEvent::new(kinds::PROPERTY_CREATED)
            .with_source("property", property.id)
            .with_actor(user.user_id)
            .with_payload(json!({ "title": property.title })),
    );

    Ok((StatusCode::CREATED, Json(property)))
}

/// GET /api/v1/properties
///
/// Public paginated listing; equivalent to a search with no criteria.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Page<Property>>> {
    let page = params.to_request().map_err(AppError::Core)?;
    let (rows, total) =
        PropertyRepo::search_page(&state.pool, &Default::default(), &page).await?;
    Ok(Json(Page::new(rows, PageMeta::compute(total, &page))))
}

/// GET /api/v1/properties/mine
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Property>>> {
    let properties = PropertyRepo::list_by_owner(&state.pool, user.user_id).await?;
    Ok(Json(properties))
}

/// GET /api/v1/properties/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Property>> {
    let property = PropertyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Property",
            id,
        }))?;
    Ok(Json(property))
}

/// PUT /api/v1/properties/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProperty>,
) -> AppResult<Json<Property>> {
    load_for_modify(&state, id, &user).await?;

    let property = PropertyRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Property",
            id,
        }))?;
    Ok(Json(property))
}

/// Status-change request payload.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: PropertyStatus,
}

/// PATCH /api/v1/properties/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<SetStatusRequest>,
) -> AppResult<Json<Property>> {
    let before = load_for_modify(&state, id, &user).await?;

    let property = PropertyRepo::set_status(&state.pool, id, input.status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Property",
            id,
        }))?;

    state.event_bus.publish(
        DomainEvent::new(kinds::PROPERTY_STATUS_CHANGED)
            .with_source("property", property.id)
            .with_actor(user.user_id)
            .with_payload(json!({
                "from": before.status,
                "to": property.status,
            })),
    );

    Ok(Json(property))
}

/// DELETE /api/v1/properties/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_for_modify(&state, id, &user).await?;

    let deactivated = PropertyRepo::deactivate(&state.pool, id).await?;
    if deactivated {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Property",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// GET /api/v1/properties/search
///
/// Criteria the database can index run in SQL; when a geo radius is
/// requested, the SQL-matched set is re-filtered with the in-memory
/// predicate (which also applies the haversine cut) and paged here.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Page<Property>>> {
    let criteria = params.criteria();
    let page = params.to_page_request().map_err(AppError::Core)?;

    if criteria.geo.is_none() {
        let (rows, total) = PropertyRepo::search_page(&state.pool, &criteria, &page).await?;
        return Ok(Json(Page::new(rows, PageMeta::compute(total, &page))));
    }

    let matched: Vec<Property> = PropertyRepo::search_all(&state.pool, &criteria, &page)
        .await?
        .into_iter()
        .filter(|p| criteria.matches(p))
        .collect();

    let total = matched.len() as i64;
    let offset = page.offset().min(total) as usize;
    let end = (page.offset() + page.per_page).min(total) as usize;
    let rows = matched[offset..end].to_vec();

    Ok(Json(Page::new(rows, PageMeta::compute(total, &page))))
}

/// A listing annotated with its distance from the query point.
#[derive(Debug, Serialize)]
pub struct NearbyProperty {
    #[serde(flatten)]
    pub property: Property,
    /// Great-circle distance from the query point, in meters.
    pub distance_m: f64,
}

/// GET /api/v1/properties/nearby?lat=&lon=&radius_km=
///
/// Bounding-box SQL prefilter, exact haversine post-filter, nearest first.
pub async fn nearby(
    State(state): State<AppState>,
    Query(params): Query<NearbyParams>,
) -> AppResult<Json<Vec<NearbyProperty>>> {
    let radius_km = params.radius_km().map_err(AppError::Core)?;
    let center = Coordinates::new(params.lat, params.lon);

    // Degenerate at the poles; the cosine floor keeps the box finite.
    let dlat = radius_km / KM_PER_DEGREE_LAT;
    let dlon = radius_km / (KM_PER_DEGREE_LAT * params.lat.to_radians().cos().abs().max(0.01));

    let candidates = PropertyRepo::within_bounding_box(
        &state.pool,
        params.lat - dlat,
        params.lat + dlat,
        params.lon - dlon,
        params.lon + dlon,
    )
    .await?;

    let mut results: Vec<NearbyProperty> = candidates
        .into_iter()
        .filter_map(|property| {
            let coords = Coordinates::new(property.latitude?, property.longitude?);
            let distance_m = geo::distance_m(center, coords);
            (distance_m <= radius_km * 1_000.0).then_some(NearbyProperty {
                property,
                distance_m,
            })
        })
        .collect();

    results.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    Ok(Json(results))
}

// ---------------------------------------------------------------------------
// View tracking
// ---------------------------------------------------------------------------

/// POST /api/v1/properties/{id}/views
///
/// Works anonymously; an authenticated caller is recorded by user id,
/// anonymous traffic by source IP.
pub async fn track_view(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Path(id): Path<DbId>,
    headers: HeaderMap,
) -> AppResult<StatusCode> {
    // 404 rather than silently recording views of unknown listings.
    PropertyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Property",
            id,
        }))?;

    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string());
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let input = TrackView {
        user_id: user.map(|u| u.user_id),
        ip_address,
        user_agent,
    };
    PropertyViewRepo::track(&state.pool, id, &input).await?;

    Ok(StatusCode::CREATED)
}

/// View statistics response payload.
#[derive(Debug, Serialize)]
pub struct ViewStatsResponse {
    pub total_views: i64,
    pub unique_viewers: i64,
    /// Bucketed view counts over the requested range.
    pub trend: Vec<nyumba_core::report::Bucket>,
}

/// GET /api/v1/properties/{id}/views/stats?range=
pub async fn view_stats(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Query(params): Query<RangeParams>,
) -> AppResult<Json<ViewStatsResponse>> {
    load_for_modify(&state, id, &user).await?;

    let stats = PropertyViewRepo::stats(&state.pool, id).await?;

    let (start, end) = params.range.window(chrono::Utc::now());
    let timestamps = PropertyViewRepo::viewed_between(&state.pool, id, start, end).await?;
    let trend = bucket_by_label(&timestamps, params.range);

    Ok(Json(ViewStatsResponse {
        total_views: stats.total_views,
        unique_viewers: stats.unique_viewers,
        trend,
    }))
}
