//! Saved search entity model and DTOs.

use nyumba_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use nyumba_core::filter::SearchCriteria;

/// A row from the `saved_searches` table.
///
/// `criteria` is the raw `jsonb` snapshot; deserialize it into
/// [`SearchCriteria`] when the filter semantics are needed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SavedSearch {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub criteria: serde_json::Value,
    pub notify_on_new_match: bool,
    pub last_notified_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SavedSearch {
    /// Decode the stored snapshot into typed criteria.
    pub fn criteria(&self) -> Result<SearchCriteria, serde_json::Error> {
        serde_json::from_value(self.criteria.clone())
    }
}

/// DTO for creating a saved search.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSavedSearch {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub criteria: SearchCriteria,
    #[serde(default)]
    pub notify_on_new_match: bool,
}

/// DTO for patching a saved search.
///
/// `criteria`, when present, is merged field-by-field onto the stored
/// snapshot rather than replacing it wholesale.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSavedSearch {
    pub name: Option<String>,
    pub criteria: Option<SearchCriteria>,
    pub notify_on_new_match: Option<bool>,
}
