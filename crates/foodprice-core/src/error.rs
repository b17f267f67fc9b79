//! Error types for `foodprice-core`.

use thiserror::Error;

use crate::dimension::DimensionKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error("natural key for {found} passed to the {expected} dimension")]
  KindMismatch {
    expected: DimensionKind,
    found:    DimensionKind,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
