//! Shared query parameter types for API handlers.
//!
//! Query structs are kept flat (no `serde(flatten)`) because
//! `serde_urlencoded` cannot deserialize non-string primitives through a
//! flattened struct.

use nyumba_core::error::CoreError;
use nyumba_core::filter::{GeoFilter, SearchCriteria};
use nyumba_core::page::{PageRequest, SortField, SortOrder};
use nyumba_core::property::{PropertyStatus, PropertyType};
use nyumba_core::report::ReportRange;
use serde::Deserialize;

/// Generic pagination parameters (`?page=&per_page=&sort_by=&order=`).
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub sort_by: Option<SortField>,
    pub order: Option<SortOrder>,
}

impl PageParams {
    /// Validate into a [`PageRequest`]; invalid values are a 400.
    pub fn to_request(&self) -> Result<PageRequest, CoreError> {
        PageRequest::new(self.page, self.per_page, self.sort_by, self.order)
    }
}

/// Query parameters for `GET /properties/search`.
///
/// Search criteria plus pagination, all optional. `features` is a
/// comma-separated list; `lat`/`lon`/`radius_km` together form the geo
/// criterion and are ignored unless all three are present.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub keyword: Option<String>,
    pub property_type: Option<PropertyType>,
    pub status: Option<PropertyStatus>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub location: Option<String>,
    pub min_bedrooms: Option<i32>,
    pub max_bedrooms: Option<i32>,
    pub min_bathrooms: Option<i32>,
    pub max_bathrooms: Option<i32>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
    pub features: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius_km: Option<f64>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub sort_by: Option<SortField>,
    pub order: Option<SortOrder>,
}

impl SearchParams {
    /// Assemble the typed criteria from the raw query values.
    pub fn criteria(&self) -> SearchCriteria {
        let geo = match (self.lat, self.lon, self.radius_km) {
            (Some(latitude), Some(longitude), Some(radius_km)) => Some(GeoFilter {
                latitude,
                longitude,
                radius_km,
            }),
            _ => None,
        };

        let features = self.features.as_deref().map(|raw| {
            raw.split(',')
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect::<Vec<_>>()
        });

        SearchCriteria {
            keyword: self.keyword.clone(),
            property_type: self.property_type,
            status: self.status,
            min_price: self.min_price,
            max_price: self.max_price,
            location: self.location.clone(),
            min_bedrooms: self.min_bedrooms,
            max_bedrooms: self.max_bedrooms,
            min_bathrooms: self.min_bathrooms,
            max_bathrooms: self.max_bathrooms,
            min_area: self.min_area,
            max_area: self.max_area,
            features,
            geo,
        }
    }

    /// Validate the pagination half of the query.
    pub fn to_page_request(&self) -> Result<PageRequest, CoreError> {
        PageRequest::new(self.page, self.per_page, self.sort_by, self.order)
    }
}

/// Maximum accepted nearby-search radius, in kilometers.
pub const MAX_NEARBY_RADIUS_KM: f64 = 100.0;

/// Query parameters for `GET /properties/nearby`.
#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub lat: f64,
    pub lon: f64,
    /// Search radius in kilometers (default 10, capped at 100).
    pub radius_km: Option<f64>,
}

impl NearbyParams {
    /// Validate and default the radius.
    pub fn radius_km(&self) -> Result<f64, CoreError> {
        let radius = self.radius_km.unwrap_or(10.0);
        if radius <= 0.0 || radius > MAX_NEARBY_RADIUS_KM {
            return Err(CoreError::Validation(format!(
                "radius_km must be in (0, {MAX_NEARBY_RADIUS_KM}], got {radius}"
            )));
        }
        Ok(radius)
    }
}

/// Query parameters for report endpoints (`?range=day|week|month|year`).
#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    #[serde(default)]
    pub range: ReportRange,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn features_are_split_and_trimmed() {
        let params = SearchParams {
            features: Some("parking, balcony,,pool".into()),
            ..Default::default()
        };
        assert_eq!(
            params.criteria().features,
            Some(vec!["parking".into(), "balcony".into(), "pool".into()])
        );
    }

    #[test]
    fn geo_criterion_requires_all_three_values() {
        let partial = SearchParams {
            lat: Some(-6.8),
            lon: Some(39.2),
            ..Default::default()
        };
        assert!(partial.criteria().geo.is_none());

        let full = SearchParams {
            lat: Some(-6.8),
            lon: Some(39.2),
            radius_km: Some(5.0),
            ..Default::default()
        };
        assert!(full.criteria().geo.is_some());
    }

    #[test]
    fn nearby_radius_defaults_and_bounds() {
        let default = NearbyParams {
            lat: 0.0,
            lon: 0.0,
            radius_km: None,
        };
        assert_eq!(default.radius_km().unwrap(), 10.0);

        let too_big = NearbyParams {
            lat: 0.0,
            lon: 0.0,
            radius_km: Some(1000.0),
        };
        assert_matches!(too_big.radius_km(), Err(CoreError::Validation(_)));

        let negative = NearbyParams {
            lat: 0.0,
            lon: 0.0,
            radius_km: Some(-1.0),
        };
        assert_matches!(negative.radius_km(), Err(CoreError::Validation(_)));
    }
}
