//! Core types and engines for the Siteline RFI tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod actor;
pub mod clock;
pub mod duedate;
pub mod error;
pub mod lifecycle;
pub mod query;
pub mod rfi;
pub mod service;
pub mod store;
pub mod visibility;

pub use error::{Error, Result};
