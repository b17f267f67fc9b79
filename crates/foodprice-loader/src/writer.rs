//! Dimension writer: bring one dimension table up to date.
//!
//! Reads the persisted keys once, reconciles the candidates against them and
//! appends the new rows in a single bulk insert. Failures are returned, never
//! retried; the caller moves on to the next dimension.

use foodprice_core::{
  dimension::{DimensionKind, NaturalKey},
  store::WarehouseStore,
};
use serde::Serialize;

use crate::{
  error::{DimensionStep, DimensionWriteError, boxed},
  reconcile::new_keys,
};

/// What happened to one dimension during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionReport {
  pub dimension:  DimensionKind,
  pub candidates: usize,
  /// Candidates already present in the store.
  pub existing:   usize,
  pub inserted:   usize,
}

/// Reconcile `candidates` against the store and append the new ones.
pub async fn sync_dimension<S: WarehouseStore>(
  store: &S,
  kind: DimensionKind,
  candidates: Vec<NaturalKey>,
) -> Result<DimensionReport, DimensionWriteError> {
  let total = candidates.len();

  let persisted = store.dimension_keys(kind).await.map_err(|e| DimensionWriteError {
    dimension: kind,
    step:      DimensionStep::ReadKeys,
    source:    boxed(e),
  })?;

  let fresh = new_keys(candidates, &persisted);
  let existing = total - fresh.len();
  let inserted = write_new_rows(store, kind, fresh).await?;

  tracing::info!(dimension = %kind, candidates = total, existing, inserted, "dimension updated");
  Ok(DimensionReport { dimension: kind, candidates: total, existing, inserted })
}

/// Append `rows` in one bulk insert. An empty set issues no write.
pub async fn write_new_rows<S: WarehouseStore>(
  store: &S,
  kind: DimensionKind,
  rows: Vec<NaturalKey>,
) -> Result<usize, DimensionWriteError> {
  if rows.is_empty() {
    return Ok(0);
  }
  store.append_dimension(kind, rows).await.map_err(|e| DimensionWriteError {
    dimension: kind,
    step:      DimensionStep::Append,
    source:    boxed(e),
  })
}
