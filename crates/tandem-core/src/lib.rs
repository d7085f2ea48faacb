//! Core types and trait definitions for the tandem shared-activities app.
//!
//! This crate is deliberately free of HTTP and async-runtime dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod profile;
pub mod session;
pub mod store;
pub mod thing;

pub use error::{Error, Result};
