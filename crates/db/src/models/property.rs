//! Property entity model and DTOs.

use nyumba_core::filter::Filterable;
use nyumba_core::geo::Coordinates;
use nyumba_core::property::{PropertyStatus, PropertyType};
use nyumba_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `properties` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Property {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    pub status: PropertyStatus,
    pub price: f64,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area: f64,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub owner_id: DbId,
    pub dalali_id: Option<DbId>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Filterable for Property {
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
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }
}

/// DTO for creating a property listing.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProperty {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    #[validate(range(min = 0.0))]
    pub price: f64,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[validate(range(min = 0))]
    pub bedrooms: i32,
    #[validate(range(min = 0))]
    pub bathrooms: i32,
    #[validate(range(min = 0.0))]
    pub area: f64,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub dalali_id: Option<DbId>,
}

/// A (created_at, price) sample used by the market-trends report.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ListingSample {
    pub created_at: Timestamp,
    pub price: f64,
}

/// Per-status listing counts for one owner, plus the price sum for
/// computing an average.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct OwnerPropertyCounts {
    pub total: i64,
    pub available: i64,
    pub rented: i64,
    pub sold: i64,
    pub pending: i64,
    pub price_sum: f64,
}

/// DTO for patching a property listing; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProperty {
    pub title: Option<String>,
    pub description: Option<String>,
    pub property_type: Option<PropertyType>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: Option<f64>,
    pub features: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub is_active: Option<bool>,
}
