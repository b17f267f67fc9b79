//! Error taxonomy of a load run.
//!
//! Per-record errors ([`MalformedRecordError`], [`UnresolvedFactError`]) are
//! recovered where they occur and aggregated into the run summary.
//! [`DimensionWriteError`] degrades the run without stopping it. Everything
//! in [`LoadError`] is fatal and names the stage that failed.

use std::fmt;

use foodprice_core::dimension::{DimensionKind, NaturalKey};
use serde::Serialize;
use thiserror::Error;

/// A store error crossing into the loader.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub(crate) fn boxed<E: std::error::Error + Send + Sync + 'static>(e: E) -> BoxError {
  Box::new(e)
}

// ─── Stages ──────────────────────────────────────────────────────────────────

/// The pipeline stage an error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
  Normalize,
  Resolve,
  FactDedup,
  FactWrite,
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Normalize => f.write_str("normalize"),
      Self::Resolve => f.write_str("resolve"),
      Self::FactDedup => f.write_str("fact-dedup"),
      Self::FactWrite => f.write_str("fact-write"),
    }
  }
}

// ─── Per-record errors ───────────────────────────────────────────────────────

/// Why a single record could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MalformedReason {
  BadDate { value: String },
  BadPrice { column: String, value: String },
}

impl fmt::Display for MalformedReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::BadDate { value } => write!(f, "unparseable date {value:?}"),
      Self::BadPrice { column, value } => {
        write!(f, "unparseable {column} {value:?}")
      }
    }
  }
}

/// A source record that was dropped during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("row {row}: {reason}")]
pub struct MalformedRecordError {
  pub row:    usize,
  pub reason: MalformedReason,
}

/// A normalized record that could not be matched in every dimension.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("row {row}: no match in {}", describe_misses(.misses))]
pub struct UnresolvedFactError {
  pub row:    usize,
  /// Each dimension that failed, with the natural key that was looked up.
  pub misses: Vec<NaturalKey>,
}

impl UnresolvedFactError {
  pub fn dimensions(&self) -> impl Iterator<Item = DimensionKind> + '_ {
    self.misses.iter().map(NaturalKey::kind)
  }
}

fn describe_misses(misses: &[NaturalKey]) -> String {
  misses
    .iter()
    .map(|key| format!("{} ({key})", key.kind()))
    .collect::<Vec<_>>()
    .join(", ")
}

// ─── Per-stage errors ────────────────────────────────────────────────────────

/// Which half of a dimension update failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionStep {
  ReadKeys,
  Append,
}

impl fmt::Display for DimensionStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::ReadKeys => f.write_str("key read failed"),
      Self::Append => f.write_str("bulk insert failed"),
    }
  }
}

/// A dimension could not be brought up to date. The run continues; facts
/// that need the missing rows will not resolve.
#[derive(Debug, Error)]
#[error("{dimension} dimension {step}: {source}")]
pub struct DimensionWriteError {
  pub dimension: DimensionKind,
  pub step:      DimensionStep,
  #[source]
  pub source:    BoxError,
}

/// The bulk fact insert failed. Terminal for the run.
#[derive(Debug, Error)]
#[error("bulk fact insert failed: {0}")]
pub struct FactWriteError(#[source] pub BoxError);

// ─── Fatal ───────────────────────────────────────────────────────────────────

/// A failure that ends the run.
#[derive(Debug, Error)]
pub enum LoadError {
  #[error("normalize stage failed: required column {column:?} not in header")]
  MissingColumn { column: String },

  #[error("resolve stage failed: could not read {dimension} lookup: {source}")]
  DimensionLookup {
    dimension: DimensionKind,
    #[source]
    source:    BoxError,
  },

  #[error("fact-dedup stage failed: could not read existing fact keys: {source}")]
  FactKeyLookup {
    #[source]
    source: BoxError,
  },

  #[error("fact-write stage failed: {0}")]
  FactWrite(#[from] FactWriteError),
}

impl LoadError {
  pub fn stage(&self) -> Stage {
    match self {
      Self::MissingColumn { .. } => Stage::Normalize,
      Self::DimensionLookup { .. } => Stage::Resolve,
      Self::FactKeyLookup { .. } => Stage::FactDedup,
      Self::FactWrite(_) => Stage::FactWrite,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fatal_errors_name_their_stage() {
    let err = LoadError::MissingColumn { column: "market".into() };
    assert_eq!(err.stage(), Stage::Normalize);
    assert!(err.to_string().starts_with("normalize stage failed"));

    let err = LoadError::FactWrite(FactWriteError("disk full".into()));
    assert_eq!(err.stage(), Stage::FactWrite);
    assert_eq!(
      err.to_string(),
      "fact-write stage failed: bulk fact insert failed: disk full"
    );
  }

  #[test]
  fn unresolved_fact_lists_missing_dimensions() {
    let err = UnresolvedFactError {
      row:    7,
      misses: vec![NaturalKey::MarketType("Retail".into())],
    };
    assert_eq!(err.to_string(), "row 7: no match in market_type (Retail)");
    assert_eq!(err.dimensions().collect::<Vec<_>>(), vec![DimensionKind::MarketType]);
  }
}
