//! Viewing state machine and scheduling-conflict window.
//!
//! A viewing is created `pending`, is confirmed by the property's owner or
//! dalali, and can be cancelled by either party. `completed`, `cancelled`
//! and `no_show` are terminal: no transition leaves them.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Minimum viewing duration accepted at scheduling time, in minutes.
pub const MIN_DURATION_MINS: i32 = 15;

/// Status of a scheduled property viewing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "viewing_status", rename_all = "snake_case")]
pub enum ViewingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

impl ViewingStatus {
    /// Stable string form, matching the database enum labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewingStatus::Pending => "pending",
            ViewingStatus::Confirmed => "confirmed",
            ViewingStatus::Cancelled => "cancelled",
            ViewingStatus::Completed => "completed",
            ViewingStatus::NoShow => "no_show",
        }
    }

    /// The set of statuses reachable from `self`.
    ///
    /// Terminal states return an empty slice.
    pub fn valid_transitions(&self) -> &'static [ViewingStatus] {
        use ViewingStatus::*;
        match self {
            Pending => &[Confirmed, Cancelled],
            Confirmed => &[Completed, Cancelled, NoShow],
            Completed | Cancelled | NoShow => &[],
        }
    }

    /// Check whether a transition from `self` to `to` is valid.
    pub fn can_transition(&self, to: ViewingStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// Validate a state transition, failing with an invalid-state error.
    pub fn validate_transition(&self, to: ViewingStatus) -> Result<(), CoreError> {
        if self.can_transition(to) {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "Invalid viewing transition: {} -> {}",
                self.as_str(),
                to.as_str()
            )))
        }
    }
}

/// The conflict window for a proposed viewing.
///
/// Deliberately symmetric -- `[start - duration, start + duration]` -- so a
/// new request is also kept clear of a confirmed viewing that would run
/// right up against it.
pub fn conflict_window(start: Timestamp, duration_mins: i32) -> (Timestamp, Timestamp) {
    let buffer = Duration::minutes(i64::from(duration_mins));
    (start - buffer, start + buffer)
}

/// Whether an existing confirmed viewing at `scheduled_at` blocks a
/// proposal whose conflict window is `(window_start, window_end)`.
///
/// Only confirmed viewings block; pending and terminal ones never do.
pub fn blocks_proposal(
    status: ViewingStatus,
    scheduled_at: Timestamp,
    window: (Timestamp, Timestamp),
) -> bool {
    status == ViewingStatus::Confirmed && scheduled_at >= window.0 && scheduled_at <= window.1
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn at(hour: u32, min: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, min, 0).unwrap()
    }

    // -- valid transitions ---------------------------------------------------

    #[test]
    fn pending_to_confirmed() {
        assert!(ViewingStatus::Pending.can_transition(ViewingStatus::Confirmed));
    }

    #[test]
    fn pending_to_cancelled() {
        assert!(ViewingStatus::Pending.can_transition(ViewingStatus::Cancelled));
    }

    #[test]
    fn confirmed_to_completed() {
        assert!(ViewingStatus::Confirmed.can_transition(ViewingStatus::Completed));
    }

    #[test]
    fn confirmed_to_cancelled() {
        assert!(ViewingStatus::Confirmed.can_transition(ViewingStatus::Cancelled));
    }

    #[test]
    fn confirmed_to_no_show() {
        assert!(ViewingStatus::Confirmed.can_transition(ViewingStatus::NoShow));
    }

    // -- terminal states -----------------------------------------------------

    #[test]
    fn terminal_states_have_no_transitions() {
        assert!(ViewingStatus::Completed.valid_transitions().is_empty());
        assert!(ViewingStatus::Cancelled.valid_transitions().is_empty());
        assert!(ViewingStatus::NoShow.valid_transitions().is_empty());
    }

    #[test]
    fn confirming_a_cancelled_viewing_is_invalid_state() {
        assert_matches!(
            ViewingStatus::Cancelled.validate_transition(ViewingStatus::Confirmed),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn cancelling_a_completed_viewing_is_invalid_state() {
        assert_matches!(
            ViewingStatus::Completed.validate_transition(ViewingStatus::Cancelled),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn pending_to_completed_is_invalid() {
        assert!(!ViewingStatus::Pending.can_transition(ViewingStatus::Completed));
    }

    #[test]
    fn pending_to_no_show_is_invalid() {
        assert!(!ViewingStatus::Pending.can_transition(ViewingStatus::NoShow));
    }

    #[test]
    fn validate_transition_error_names_both_states() {
        let err = ViewingStatus::Completed
            .validate_transition(ViewingStatus::Cancelled)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("completed"));
        assert!(msg.contains("cancelled"));
    }

    // -- conflict window -----------------------------------------------------

    #[test]
    fn window_is_symmetric_around_the_start() {
        let (lo, hi) = conflict_window(at(10, 0), 30);
        assert_eq!(lo, at(9, 30));
        assert_eq!(hi, at(10, 30));
    }

    #[test]
    fn confirmed_viewing_at_same_time_blocks() {
        let window = conflict_window(at(10, 0), 30);
        assert!(blocks_proposal(ViewingStatus::Confirmed, at(10, 0), window));
    }

    #[test]
    fn confirmed_viewing_at_window_edge_blocks() {
        let window = conflict_window(at(10, 0), 30);
        assert!(blocks_proposal(ViewingStatus::Confirmed, at(9, 30), window));
        assert!(blocks_proposal(ViewingStatus::Confirmed, at(10, 30), window));
    }

    #[test]
    fn confirmed_viewing_outside_window_does_not_block() {
        let window = conflict_window(at(10, 0), 30);
        assert!(!blocks_proposal(
            ViewingStatus::Confirmed,
            at(10, 31),
            window
        ));
    }

    #[test]
    fn pending_viewing_at_same_time_does_not_block() {
        let window = conflict_window(at(10, 0), 30);
        assert!(!blocks_proposal(ViewingStatus::Pending, at(10, 0), window));
    }

    #[test]
    fn cancelled_viewing_never_blocks() {
        let window = conflict_window(at(10, 0), 30);
        assert!(!blocks_proposal(ViewingStatus::Cancelled, at(10, 0), window));
    }
}
