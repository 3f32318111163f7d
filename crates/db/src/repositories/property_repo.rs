//! Repository for the `properties` table.

use sqlx::PgPool;

use nyumba_core::filter::SearchCriteria;
use nyumba_core::page::PageRequest;
use nyumba_core::property::PropertyStatus;
use nyumba_core::types::{DbId, Timestamp};

use crate::models::property::{
    CreateProperty, ListingSample, OwnerPropertyCounts, Property, UpdateProperty,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, property_type, status, price, \
    location, latitude, longitude, bedrooms, bathrooms, area, features, images, \
    owner_id, dalali_id, is_active, created_at, updated_at";

/// Shared WHERE clause for criteria-driven queries.
///
/// Each criterion is guarded by an `IS NULL` check so absent criteria
/// impose no constraint; the bind order must match [`bind_criteria`].
/// The geo criterion has no SQL counterpart; callers that need it fetch
/// the unpaged set and apply [`SearchCriteria::matches`] in memory.
const CRITERIA_WHERE: &str = "\
    is_active = TRUE \
    AND ($1::TEXT IS NULL OR title ILIKE '%' || $1 || '%' \
         OR description ILIKE '%' || $1 || '%' \
         OR location ILIKE '%' || $1 || '%') \
    AND ($2::property_type IS NULL OR property_type = $2) \
    AND ($3::property_status IS NULL OR status = $3) \
    AND ($4::DOUBLE PRECISION IS NULL OR price >= $4) \
    AND ($5::DOUBLE PRECISION IS NULL OR price <= $5) \
    AND ($6::TEXT IS NULL OR location ILIKE '%' || $6 || '%') \
    AND ($7::INT IS NULL OR bedrooms >= $7) \
    AND ($8::INT IS NULL OR bedrooms <= $8) \
    AND ($9::INT IS NULL OR bathrooms >= $9) \
    AND ($10::INT IS NULL OR bathrooms <= $10) \
    AND ($11::DOUBLE PRECISION IS NULL OR area >= $11) \
    AND ($12::DOUBLE PRECISION IS NULL OR area <= $12) \
    AND ($13::TEXT[] IS NULL OR features @> $13)";

/// Bind the thirteen criteria parameters in `CRITERIA_WHERE` order.
fn bind_criteria<'q, O>(
    query: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    criteria: &'q SearchCriteria,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    query
        .bind(criteria.keyword.as_deref())
        .bind(criteria.property_type)
        .bind(criteria.status)
        .bind(criteria.min_price)
        .bind(criteria.max_price)
        .bind(criteria.location.as_deref())
        .bind(criteria.min_bedrooms)
        .bind(criteria.max_bedrooms)
        .bind(criteria.min_bathrooms)
        .bind(criteria.max_bathrooms)
        .bind(criteria.min_area)
        .bind(criteria.max_area)
        .bind(criteria.features.as_deref())
}

/// Provides CRUD and search operations for property listings.
pub struct PropertyRepo;

impl PropertyRepo {
    /// Insert a new listing, returning the created row.
    ///
    /// New listings start as `available` and active.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateProperty,
    ) -> Result<Property, sqlx::Error> {
        let query = format!(
            "INSERT INTO properties
                (title, description, property_type, price, location, latitude,
                 longitude, bedrooms, bathrooms, area, features, images,
                 owner_id, dalali_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.property_type)
            .bind(input.price)
            .bind(&input.location)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.bedrooms)
            .bind(input.bathrooms)
            .bind(input.area)
            .bind(&input.features)
            .bind(&input.images)
            .bind(owner_id)
            .bind(input.dalali_id)
            .fetch_one(pool)
            .await
    }

    /// Find a listing by its internal ID. Excludes deactivated rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Property>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM properties WHERE id = $1 AND is_active = TRUE");
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all listings for an owner, newest first. Includes deactivated rows.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Property>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM properties
             WHERE owner_id = $1
             ORDER BY created_at DESC, id ASC"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Update a listing. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProperty,
    ) -> Result<Option<Property>, sqlx::Error> {
        let query = format!(
            "UPDATE properties SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                property_type = COALESCE($4, property_type),
                price = COALESCE($5, price),
                location = COALESCE($6, location),
                latitude = COALESCE($7, latitude),
                longitude = COALESCE($8, longitude),
                bedrooms = COALESCE($9, bedrooms),
                bathrooms = COALESCE($10, bathrooms),
                area = COALESCE($11, area),
                features = COALESCE($12, features),
                images = COALESCE($13, images),
                is_active = COALESCE($14, is_active),
                updated_at = NOW()
             WHERE id = $1 AND is_active = TRUE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .bind(input.title.as_deref())
            .bind(input.description.as_deref())
            .bind(input.property_type)
            .bind(input.price)
            .bind(input.location.as_deref())
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.bedrooms)
            .bind(input.bathrooms)
            .bind(input.area)
            .bind(input.features.as_deref())
            .bind(input.images.as_deref())
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Change a listing's status, returning the updated row.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: PropertyStatus,
    ) -> Result<Option<Property>, sqlx::Error> {
        let query = format!(
            "UPDATE properties SET status = $2, updated_at = NOW()
             WHERE id = $1 AND is_active = TRUE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Deactivate a listing. Returns `true` if a row was deactivated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE properties SET is_active = FALSE, updated_at = NOW()
             WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// One page of listings matching `criteria`, plus the total match count.
    ///
    /// The geo criterion is ignored here; use [`Self::search_all`] and filter
    /// in memory when a radius is requested.
    pub async fn search_page(
        pool: &PgPool,
        criteria: &SearchCriteria,
        page: &PageRequest,
    ) -> Result<(Vec<Property>, i64), sqlx::Error> {
        let count_query = format!("SELECT COUNT(*) FROM properties WHERE {CRITERIA_WHERE}");
        let (total,): (i64,) = bind_criteria(sqlx::query_as(&count_query), criteria)
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM properties
             WHERE {CRITERIA_WHERE}
             ORDER BY {column} {direction}, id ASC
             LIMIT $14 OFFSET $15",
            column = page.sort_by.column(),
            direction = page.order.keyword(),
        );
        let rows = bind_criteria(sqlx::query_as::<_, Property>(&query), criteria)
            .bind(page.per_page)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok((rows, total))
    }

    /// All listings matching the SQL-expressible criteria, unpaged.
    pub async fn search_all(
        pool: &PgPool,
        criteria: &SearchCriteria,
        page: &PageRequest,
    ) -> Result<Vec<Property>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM properties
             WHERE {CRITERIA_WHERE}
             ORDER BY {column} {direction}, id ASC",
            column = page.sort_by.column(),
            direction = page.order.keyword(),
        );
        bind_criteria(sqlx::query_as::<_, Property>(&query), criteria)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Reporting
    // -----------------------------------------------------------------------

    /// Active listings with coordinates inside a lat/lon bounding box.
    ///
    /// Cheap SQL prefilter for the nearby search; the caller applies the
    /// exact haversine cut afterwards.
    pub async fn within_bounding_box(
        pool: &PgPool,
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
    ) -> Result<Vec<Property>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM properties
             WHERE is_active = TRUE
               AND latitude BETWEEN $1 AND $2
               AND longitude BETWEEN $3 AND $4"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(min_lat)
            .bind(max_lat)
            .bind(min_lon)
            .bind(max_lon)
            .fetch_all(pool)
            .await
    }

    /// `(created_at, price)` samples of active listings inside
    /// `[start, end)`, ascending. Feeds the market-trends bucketing.
    pub async fn listed_between(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<ListingSample>, sqlx::Error> {
        sqlx::query_as::<_, ListingSample>(
            "SELECT created_at, price FROM properties
             WHERE is_active = TRUE AND created_at >= $1 AND created_at < $2
             ORDER BY created_at ASC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    /// Per-status listing counts plus average price for one owner.
    pub async fn owner_counts(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<OwnerPropertyCounts, sqlx::Error> {
        sqlx::query_as::<_, OwnerPropertyCounts>(
            "SELECT COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE status = 'available') AS available,
                    COUNT(*) FILTER (WHERE status = 'rented') AS rented,
                    COUNT(*) FILTER (WHERE status = 'sold') AS sold,
                    COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                    COALESCE(SUM(price), 0)::DOUBLE PRECISION AS price_sum
             FROM properties
             WHERE owner_id = $1 AND is_active = TRUE",
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nyumba_core::filter::GeoFilter;
    use nyumba_core::property::{PropertyStatus, PropertyType};

    fn full_criteria() -> SearchCriteria {
        SearchCriteria {
            keyword: Some("flat".into()),
            property_type: Some(PropertyType::Apartment),
            status: Some(PropertyStatus::Available),
            min_price: Some(100.0),
            max_price: Some(900.0),
            location: Some("Masaki".into()),
            min_bedrooms: Some(1),
            max_bedrooms: Some(4),
            min_bathrooms: Some(1),
            max_bathrooms: Some(3),
            min_area: Some(40.0),
            max_area: Some(200.0),
            features: Some(vec!["parking".into()]),
            geo: Some(GeoFilter {
                latitude: -6.79,
                longitude: 39.21,
                radius_km: 5.0,
            }),
        }
    }

    // Both the COUNT and the row queries must accept the same criteria
    // binds; building them exercises the bind types without a database.
    #[test]
    fn criteria_bind_fits_count_and_row_queries() {
        let criteria = full_criteria();

        let count_query = format!("SELECT COUNT(*) FROM properties WHERE {CRITERIA_WHERE}");
        let _count = bind_criteria(sqlx::query_as::<_, (i64,)>(&count_query), &criteria);

        let row_query = format!("SELECT {COLUMNS} FROM properties WHERE {CRITERIA_WHERE}");
        let _rows = bind_criteria(sqlx::query_as::<_, Property>(&row_query), &criteria);
    }

    #[test]
    fn criteria_where_clause_uses_all_thirteen_binds() {
        for n in 1..=13 {
            assert!(
                CRITERIA_WHERE.contains(&format!("${n}")),
                "missing bind ${n}"
            );
        }
        assert!(!CRITERIA_WHERE.contains("$14"));
    }
}
