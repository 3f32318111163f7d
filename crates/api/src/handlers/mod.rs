//! HTTP handlers, one module per resource.

pub mod auth;
pub mod notification;
pub mod property;
pub mod report;
pub mod saved_search;
pub mod viewing;
