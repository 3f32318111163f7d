//! Domain logic for the marketplace, free of HTTP and persistence concerns.
//!
//! This crate has zero internal deps so it can be used by the API and
//! repository layers as well as any future CLI or worker tooling.

pub mod error;
pub mod filter;
pub mod geo;
pub mod page;
pub mod property;
pub mod report;
pub mod roles;
pub mod types;
pub mod viewing;
