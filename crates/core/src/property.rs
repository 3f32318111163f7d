//! Property type and listing-status enums.
//!
//! Both enums are closed sets backed by PostgreSQL enum types; the string
//! forms are what the API and the `jsonb` criteria snapshots carry.

use serde::{Deserialize, Serialize};

/// Kind of listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "property_type", rename_all = "snake_case")]
pub enum PropertyType {
    House,
    Apartment,
    Land,
    Commercial,
}

/// Lifecycle status of a listing.
///
/// Mutated by single writes from the owner/dalali; there is no transition
/// table here because every status is reachable from every other (a rented
/// property can come back on the market).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "property_status", rename_all = "snake_case")]
pub enum PropertyStatus {
    Available,
    Rented,
    Sold,
    Pending,
}

impl PropertyStatus {
    /// Stable string form, matching the database enum labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Available => "available",
            PropertyStatus::Rented => "rented",
            PropertyStatus::Sold => "sold",
            PropertyStatus::Pending => "pending",
        }
    }
}

impl PropertyType {
    /// Stable string form, matching the database enum labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "house",
            PropertyType::Apartment => "apartment",
            PropertyType::Land => "land",
            PropertyType::Commercial => "commercial",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_snake_case_labels() {
        assert_eq!(
            serde_json::to_string(&PropertyType::Apartment).unwrap(),
            "\"apartment\""
        );
        assert_eq!(
            serde_json::to_string(&PropertyStatus::Available).unwrap(),
            "\"available\""
        );
    }

    #[test]
    fn as_str_matches_serde_labels() {
        for (t, s) in [
            (PropertyType::House, "house"),
            (PropertyType::Apartment, "apartment"),
            (PropertyType::Land, "land"),
            (PropertyType::Commercial, "commercial"),
        ] {
            assert_eq!(t.as_str(), s);
        }
    }
}
