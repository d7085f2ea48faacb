//! Error types for `tandem-core`.

use thiserror::Error;

/// Validation errors, caught before any I/O is attempted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("a title is required")]
  EmptyTitle,

  #[error("a display name is required to add a thing")]
  EmptyDisplayName,

  #[error("a uid is required")]
  EmptyUid,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
