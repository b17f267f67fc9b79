//! The per-run summary reported to the operator.

use std::fmt;

use chrono::{DateTime, Utc};
use foodprice_core::dimension::DimensionKind;
use serde::Serialize;
use uuid::Uuid;

use crate::{
  error::{DimensionStep, DimensionWriteError},
  facts::FactReport,
  normalize::NormalizeReport,
  resolve::Resolution,
  writer::DimensionReport,
};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DimensionOutcome {
  Updated(DimensionReport),
  Failed {
    dimension: DimensionKind,
    step:      DimensionStep,
    error:     String,
  },
}

impl From<DimensionWriteError> for DimensionOutcome {
  fn from(err: DimensionWriteError) -> Self {
    Self::Failed { dimension: err.dimension, step: err.step, error: err.to_string() }
  }
}

/// Everything a completed run did. A run that returns a summary reached the
/// fact stage; it may still be degraded (see [`RunSummary::is_degraded`]).
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
  pub run_id:      Uuid,
  pub started_at:  DateTime<Utc>,
  pub finished_at: DateTime<Utc>,
  pub normalize:   NormalizeReport,
  pub dimensions:  Vec<DimensionOutcome>,
  pub resolution:  Resolution,
  pub facts:       FactReport,
}

impl RunSummary {
  /// A dimension failed to update or facts were inserted without the
  /// existing-key check.
  pub fn is_degraded(&self) -> bool {
    self.facts.degraded
      || self
        .dimensions
        .iter()
        .any(|d| matches!(d, DimensionOutcome::Failed { .. }))
  }

  pub fn dimensions_inserted(&self) -> usize {
    self
      .dimensions
      .iter()
      .map(|d| match d {
        DimensionOutcome::Updated(r) => r.inserted,
        DimensionOutcome::Failed { .. } => 0,
      })
      .sum()
  }
}

impl fmt::Display for RunSummary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let n = &self.normalize;
    writeln!(f, "run {}", self.run_id)?;
    writeln!(
      f,
      "  normalize   {} rows: {} kept, {} incomplete, {} duplicate, {} malformed, {} hashtag",
      n.total, n.kept, n.incomplete, n.duplicates, n.malformed, n.hashtag_rows
    )?;
    for err in &n.malformed_samples {
      writeln!(f, "              ! {err}")?;
    }

    for d in &self.dimensions {
      match d {
        DimensionOutcome::Updated(r) => writeln!(
          f,
          "  {:<11} {} candidates, {} existing, {} inserted",
          r.dimension.as_str(),
          r.candidates,
          r.existing,
          r.inserted
        )?,
        DimensionOutcome::Failed { dimension, error, .. } => {
          writeln!(f, "  {:<11} FAILED: {error}", dimension.as_str())?
        }
      }
    }

    let r = &self.resolution;
    writeln!(f, "  resolve     {} resolved, {} excluded", r.resolved, r.unresolved)?;
    for err in &r.unresolved_samples {
      writeln!(f, "              ! {err}")?;
    }

    let x = &self.facts;
    write!(
      f,
      "  facts       {} candidates, {} repeated in batch, {} already loaded, {} inserted",
      x.candidates, x.duplicate_in_batch, x.already_persisted, x.inserted
    )?;
    if x.degraded {
      write!(f, " (DEGRADED: existing keys unread)")?;
    }
    Ok(())
  }
}
