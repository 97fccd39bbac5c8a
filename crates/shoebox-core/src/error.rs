//! Error types for `shoebox-core`.
//!
//! Constraint violations (duplicate names, paths or tags) are not errors;
//! the relevant operations report them by returning `false`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("a date-range search needs both a start and an end date")]
  MissingDateBound,

  #[error("a tag search needs at least one tag with a non-empty name and value")]
  IncompleteTagClause,

  #[error("invalid tag {0:?}: expected name=value")]
  InvalidTag(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
