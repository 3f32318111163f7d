//! Property viewing entity model and DTOs.

use nyumba_core::types::{DbId, Timestamp};
use nyumba_core::viewing::{ViewingStatus, MIN_DURATION_MINS};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// A row from the `property_viewings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Viewing {
    pub id: DbId,
    pub property_id: DbId,
    pub tenant_id: DbId,
    pub status: ViewingStatus,
    pub scheduled_at: Timestamp,
    pub duration_mins: i32,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for requesting a viewing slot.
#[derive(Debug, Deserialize, Validate)]
pub struct ScheduleViewing {
    /// Taken from the URL path, never from the request body.
    #[serde(skip_deserializing)]
    pub property_id: DbId,
    pub scheduled_at: Timestamp,
    #[validate(custom(function = "validate_duration"))]
    pub duration_mins: i32,
    pub notes: Option<String>,
}

fn validate_duration(duration_mins: i32) -> Result<(), ValidationError> {
    if duration_mins < MIN_DURATION_MINS {
        let mut err = ValidationError::new("duration_too_short");
        err.message = Some(format!("duration_mins must be at least {MIN_DURATION_MINS}").into());
        return Err(err);
    }
    Ok(())
}

/// Result of a schedule attempt.
///
/// Conflict detection happens inside the same transaction as the insert,
/// so the repository reports the outcome rather than raising an error the
/// caller would have to pattern-match out of `sqlx::Error`.
#[derive(Debug)]
pub enum ScheduleOutcome {
    Scheduled(Viewing),
    Conflict,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schedule_body_needs_no_property_id() {
        let input: ScheduleViewing = serde_json::from_value(json!({
            "scheduled_at": "2026-09-01T10:00:00Z",
            "duration_mins": 30,
        }))
        .expect("body without property_id should deserialize");
        assert_eq!(input.property_id, 0);
    }

    #[test]
    fn property_id_in_the_body_is_ignored() {
        // The id comes from the URL path; a body value must not sneak in.
        let input: ScheduleViewing = serde_json::from_value(json!({
            "property_id": 99,
            "scheduled_at": "2026-09-01T10:00:00Z",
            "duration_mins": 30,
        }))
        .expect("extra property_id should not fail deserialization");
        assert_eq!(input.property_id, 0);
    }

    #[test]
    fn duration_below_the_minimum_is_rejected() {
        let input: ScheduleViewing = serde_json::from_value(json!({
            "scheduled_at": "2026-09-01T10:00:00Z",
            "duration_mins": MIN_DURATION_MINS - 1,
        }))
        .unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn minimum_duration_is_accepted() {
        let input: ScheduleViewing = serde_json::from_value(json!({
            "scheduled_at": "2026-09-01T10:00:00Z",
            "duration_mins": MIN_DURATION_MINS,
        }))
        .unwrap();
        assert!(input.validate().is_ok());
    }
}
