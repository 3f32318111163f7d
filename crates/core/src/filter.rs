//! Search criteria and the listing filter predicate.
//!
//! [`SearchCriteria`] is both the query object for property search and the
//! `jsonb` snapshot stored by saved searches, so it must stay serde
//! round-trippable. Each present criterion narrows the result via logical
//! AND; absent criteria impose no constraint.
//!
//! The repository layer mirrors these semantics in SQL for the indexed
//! criteria; the in-memory predicate here is what the geo-radius path and
//! the saved-search snapshot logic use.

use serde::{Deserialize, Serialize};

use crate::geo::{self, Coordinates};
use crate::property::{PropertyStatus, PropertyType};

/// Geo-radius criterion: keep properties within `radius_km` of the center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoFilter {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

/// Optional search criteria; every field is an independent AND-ed filter.
///
/// Numeric ranges treat a missing bound as unbounded. Keyword and location
/// matching is case-insensitive substring match. Feature matching requires
/// the property's features to be a superset of the requested set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchCriteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PropertyStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_bedrooms: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bedrooms: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_bathrooms: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bathrooms: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoFilter>,
}

/// The listing fields the filter predicate needs.
///
/// Implemented by the `db` crate's property model; tests implement it on a
/// lightweight fixture so the predicate stays testable without a database.
pub trait Filterable {
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn location(&self) -> &str;
    fn property_type(&self) -> PropertyType;
    fn status(&self) -> PropertyStatus;
    fn price(&self) -> f64;
    fn bedrooms(&self) -> i32;
    fn bathrooms(&self) -> i32;
    fn area(&self) -> f64;
    fn features(&self) -> &[String];
    fn coordinates(&self) -> Option<Coordinates>;
}

impl SearchCriteria {
    /// True when no criterion is set.
    pub fn is_empty(&self) -> bool {
        *self == SearchCriteria::default()
    }

    /// Apply every present criterion to `property`, AND-ed together.
    ///
    /// An empty criteria set matches everything. The geo criterion
    /// excludes properties without coordinates.
    pub fn matches<P: Filterable>(&self, property: &P) -> bool {
        if let Some(keyword) = &self.keyword {
            let hit = contains_ci(property.title(), keyword)
                || contains_ci(property.description(), keyword)
                || contains_ci(property.location(), keyword);
            if !hit {
                return false;
            }
        }

        if let Some(property_type) = self.property_type {
            if property.property_type() != property_type {
                return false;
            }
        }

        if let Some(status) = self.status {
            if property.status() != status {
                return false;
            }
        }

        if !in_range(
            property.price(),
            self.min_price.unwrap_or(0.0),
            self.max_price.unwrap_or(f64::INFINITY),
        ) {
            return false;
        }

        if let Some(location) = &self.location {
            if !contains_ci(property.location(), location) {
                return false;
            }
        }

        let bedrooms = property.bedrooms();
        if bedrooms < self.min_bedrooms.unwrap_or(0)
            || bedrooms > self.max_bedrooms.unwrap_or(i32::MAX)
        {
            return false;
        }

        let bathrooms = property.bathrooms();
        if bathrooms < self.min_bathrooms.unwrap_or(0)
            || bathrooms > self.max_bathrooms.unwrap_or(i32::MAX)
        {
            return false;
        }

        if !in_range(
            property.area(),
            self.min_area.unwrap_or(0.0),
            self.max_area.unwrap_or(f64::INFINITY),
        ) {
            return false;
        }

        if let Some(wanted) = &self.features {
            let have = property.features();
            if !wanted.iter().all(|f| have.contains(f)) {
                return false;
            }
        }

        if let Some(geo_filter) = self.geo {
            let Some(coords) = property.coordinates() else {
                return false;
            };
            let center = Coordinates::new(geo_filter.latitude, geo_filter.longitude);
            if geo::distance_m(center, coords) > geo_filter.radius_km * 1_000.0 {
                return false;
            }
        }

        true
    }

    /// Overlay `update` onto this criteria set, field by field.
    ///
    /// Fields present in `update` win; absent fields keep their current
    /// value. The receiver is consumed and a new snapshot is returned --
    /// saved searches never mutate a stored snapshot in place.
    pub fn merged_with(self, update: SearchCriteria) -> SearchCriteria {
        SearchCriteria {
            keyword: update.keyword.or(self.keyword),
            property_type: update.property_type.or(self.property_type),
            status: update.status.or(self.status),
            min_price: update.min_price.or(self.min_price),
            max_price: update.max_price.or(self.max_price),
            location: update.location.or(self.location),
            min_bedrooms: update.min_bedrooms.or(self.min_bedrooms),
            max_bedrooms: update.max_bedrooms.or(self.max_bedrooms),
            min_bathrooms: update.min_bathrooms.or(self.min_bathrooms),
            max_bathrooms: update.max_bathrooms.or(self.max_bathrooms),
            min_area: update.min_area.or(self.min_area),
            max_area: update.max_area.or(self.max_area),
            features: update.features.or(self.features),
            geo: update.geo.or(self.geo),
        }
    }
}

/// Case-insensitive substring test.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Inclusive range test for f64 criteria.
fn in_range(value: f64, min: f64, max: f64) -> bool {
    value >= min && value <= max
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal listing fixture for exercising the predicate.
    #[derive(Clone)]
    struct Listing {
        title: String,
        description: String,
        location: String,
        property_type: PropertyType,
        status: PropertyStatus,
        price: f64,
        bedrooms: i32,
        bathrooms: i32,
        area: f64,
        features: Vec<String>,
        coordinates: Option<Coordinates>,
    }

    impl Default for Listing {
        fn default() -> Self {
            Self {
                title: "Sunny two-bedroom flat".into(),
                description: "Bright apartment near the waterfront".into(),
                location: "Masaki, Dar es Salaam".into(),
                property_type: PropertyType::Apartment,
                status: PropertyStatus::Available,
                price: 650.0,
                bedrooms: 2,
                bathrooms: 1,
                area: 85.0,
                features: vec!["parking".into(), "balcony".into()],
                coordinates: Some(Coordinates::new(-6.74, 39.27)),
            }
        }
    }

    impl Filterable for Listing {
        fn title(&self) -> &str {
            &self.title
        }
        fn description(&self) -> &str {
            &self.description
        }
        fn location(&self) -> &str {
            &self.location
        }
        fn property_type(&self) -> PropertyType {
            self.property_type
        }
        fn status(&self) -> PropertyStatus {
            self.status
        }
        fn price(&self) -> f64 {
            self.price
        }
        fn bedrooms(&self) -> i32 {
            self.bedrooms
        }
        fn bathrooms(&self) -> i32 {
            self.bathrooms
        }
        fn area(&self) -> f64 {
            self.area
        }
        fn features(&self) -> &[String] {
            &self.features
        }
        fn coordinates(&self) -> Option<Coordinates> {
            self.coordinates
        }
    }

    // -- absent criteria -----------------------------------------------------

    #[test]
    fn empty_criteria_match_everything() {
        assert!(SearchCriteria::default().matches(&Listing::default()));
    }

    #[test]
    fn absent_criteria_never_exclude() {
        // Only one criterion set; all the unset ones must not constrain.
        let criteria = SearchCriteria {
            min_bedrooms: Some(1),
            ..Default::default()
        };
        assert!(criteria.matches(&Listing::default()));
    }

    // -- individual criteria -------------------------------------------------

    #[test]
    fn keyword_matches_title_description_or_location_case_insensitively() {
        let listing = Listing::default();
        for kw in ["SUNNY", "waterfront", "masaki"] {
            let criteria = SearchCriteria {
                keyword: Some(kw.into()),
                ..Default::default()
            };
            assert!(criteria.matches(&listing), "keyword {kw} should match");
        }

        let miss = SearchCriteria {
            keyword: Some("penthouse".into()),
            ..Default::default()
        };
        assert!(!miss.matches(&listing));
    }

    #[test]
    fn type_and_status_are_exact_matches() {
        let listing = Listing::default();
        let criteria = SearchCriteria {
            property_type: Some(PropertyType::House),
            ..Default::default()
        };
        assert!(!criteria.matches(&listing));

        let criteria = SearchCriteria {
            status: Some(PropertyStatus::Rented),
            ..Default::default()
        };
        assert!(!criteria.matches(&listing));
    }

    #[test]
    fn price_range_treats_missing_bounds_as_unbounded() {
        let listing = Listing::default(); // price 650

        let min_only = SearchCriteria {
            min_price: Some(600.0),
            ..Default::default()
        };
        assert!(min_only.matches(&listing));

        let max_only = SearchCriteria {
            max_price: Some(600.0),
            ..Default::default()
        };
        assert!(!max_only.matches(&listing));

        let both = SearchCriteria {
            min_price: Some(600.0),
            max_price: Some(700.0),
            ..Default::default()
        };
        assert!(both.matches(&listing));
    }

    #[test]
    fn price_range_selects_the_interior_listings() {
        let listings: Vec<Listing> = [100.0, 200.0, 300.0, 400.0]
            .into_iter()
            .map(|price| Listing {
                price,
                ..Default::default()
            })
            .collect();

        let criteria = SearchCriteria {
            min_price: Some(150.0),
            max_price: Some(350.0),
            ..Default::default()
        };

        let matched: Vec<f64> = listings
            .iter()
            .filter(|l| criteria.matches(*l))
            .map(|l| l.price)
            .collect();
        assert_eq!(matched, vec![200.0, 300.0]);
    }

    #[test]
    fn feature_match_requires_superset() {
        let listing = Listing::default(); // parking, balcony

        let subset = SearchCriteria {
            features: Some(vec!["parking".into()]),
            ..Default::default()
        };
        assert!(subset.matches(&listing));

        let superset = SearchCriteria {
            features: Some(vec!["parking".into(), "pool".into()]),
            ..Default::default()
        };
        assert!(!superset.matches(&listing));
    }

    #[test]
    fn geo_filter_excludes_properties_without_coordinates() {
        let mut listing = Listing::default();
        listing.coordinates = None;

        let criteria = SearchCriteria {
            geo: Some(GeoFilter {
                latitude: -6.74,
                longitude: 39.27,
                radius_km: 100.0,
            }),
            ..Default::default()
        };
        assert!(!criteria.matches(&listing));
    }

    #[test]
    fn geo_filter_keeps_properties_inside_the_radius() {
        let listing = Listing::default();

        let near = SearchCriteria {
            geo: Some(GeoFilter {
                latitude: -6.75,
                longitude: 39.28,
                radius_km: 5.0,
            }),
            ..Default::default()
        };
        assert!(near.matches(&listing));

        let far = SearchCriteria {
            geo: Some(GeoFilter {
                latitude: -3.38,
                longitude: 36.68,
                radius_km: 5.0,
            }),
            ..Default::default()
        };
        assert!(!far.matches(&listing));
    }

    // -- conjunction ---------------------------------------------------------

    #[test]
    fn all_present_criteria_must_hold() {
        let listing = Listing::default();
        let criteria = SearchCriteria {
            property_type: Some(PropertyType::Apartment),
            min_price: Some(600.0),
            max_price: Some(700.0),
            min_bedrooms: Some(2),
            features: Some(vec!["balcony".into()]),
            ..Default::default()
        };
        assert!(criteria.matches(&listing));

        // Flip one criterion and the whole conjunction fails.
        let criteria = SearchCriteria {
            min_bedrooms: Some(3),
            ..criteria
        };
        assert!(!criteria.matches(&listing));
    }

    // -- merge ---------------------------------------------------------------

    #[test]
    fn merge_retains_fields_absent_from_the_update() {
        let saved = SearchCriteria {
            property_type: Some(PropertyType::Apartment),
            ..Default::default()
        };
        let update = SearchCriteria {
            min_price: Some(500.0),
            ..Default::default()
        };

        let merged = saved.merged_with(update);
        assert_eq!(merged.property_type, Some(PropertyType::Apartment));
        assert_eq!(merged.min_price, Some(500.0));
    }

    #[test]
    fn merge_prefers_updated_fields() {
        let saved = SearchCriteria {
            min_price: Some(100.0),
            max_price: Some(400.0),
            ..Default::default()
        };
        let update = SearchCriteria {
            min_price: Some(250.0),
            ..Default::default()
        };

        let merged = saved.merged_with(update);
        assert_eq!(merged.min_price, Some(250.0));
        assert_eq!(merged.max_price, Some(400.0));
    }

    // -- serde snapshot shape ------------------------------------------------

    #[test]
    fn snapshot_round_trips_and_omits_absent_fields() {
        let criteria = SearchCriteria {
            property_type: Some(PropertyType::Apartment),
            min_price: Some(500.0),
            ..Default::default()
        };

        let json = serde_json::to_value(&criteria).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"property_type": "apartment", "min_price": 500.0})
        );

        let back: SearchCriteria = serde_json::from_value(json).unwrap();
        assert_eq!(back, criteria);
    }
}
