//! Error types for `siteline-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::rfi::Status;

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("response must be at least {min} characters, got {got}")]
  ResponseTooShort { min: usize, got: usize },

  #[error("no company is registered for department {0:?}")]
  UnknownDepartment(String),

  #[error("invalid status transition: {from} -> {to}")]
  InvalidTransition { from: Status, to: Status },

  #[error("rfi not found: {0}")]
  NotFound(Uuid),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// True for errors the caller can recover from by correcting its input
  /// and retrying.
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      Self::MissingField(_)
        | Self::ResponseTooShort { .. }
        | Self::UnknownDepartment(_)
        | Self::InvalidTransition { .. }
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
