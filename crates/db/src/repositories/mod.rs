//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod notification_repo;
pub mod property_repo;
pub mod property_view_repo;
pub mod saved_search_repo;
pub mod user_repo;
pub mod viewing_repo;

pub use notification_repo::NotificationRepo;
pub use property_repo::PropertyRepo;
pub use property_view_repo::PropertyViewRepo;
pub use saved_search_repo::SavedSearchRepo;
pub use user_repo::UserRepo;
pub use viewing_repo::ViewingRepo;
