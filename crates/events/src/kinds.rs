//! Event kind names.
//!
//! Dot-separated `entity.happening` strings; the dispatcher matches on
//! these, so additions here need a corresponding dispatcher arm.

pub const PROPERTY_CREATED: &str = "property.created";
pub const PROPERTY_STATUS_CHANGED: &str = "property.status_changed";
pub const VIEWING_REQUESTED: &str = "viewing.requested";
pub const VIEWING_CONFIRMED: &str = "viewing.confirmed";
pub const VIEWING_CANCELLED: &str = "viewing.cancelled";
pub const VIEWING_COMPLETED: &str = "viewing.completed";
pub const VIEWING_NO_SHOW: &str = "viewing.no_show";
pub const SAVED_SEARCH_CREATED: &str = "saved_search.created";
