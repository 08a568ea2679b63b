//! Error types for `kibble-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("subject name is empty")]
  EmptySubject,

  #[error("food identifier is empty")]
  EmptyFoodId,

  #[error("invalid date {0:?}: expected YYYY-MM-DD or DD/MM/YYYY")]
  InvalidDate(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
