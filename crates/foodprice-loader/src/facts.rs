//! Fact deduplicator and writer.
//!
//! Candidates repeating a composite key within the batch are merged to the
//! first one seen; candidates whose key is already persisted are dropped;
//! the remainder goes to the store in one bulk insert.

use std::collections::HashSet;

use foodprice_core::{
  fact::{FactKey, FactRow},
  store::WarehouseStore,
};
use serde::Serialize;

use crate::{
  LoadError,
  error::{FactWriteError, boxed},
  options::FactKeyReadPolicy,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FactReport {
  pub candidates:         usize,
  pub duplicate_in_batch: usize,
  pub already_persisted:  usize,
  pub inserted:           usize,
  /// The existing-key read failed and every candidate was inserted anyway.
  pub degraded:           bool,
}

/// Split `candidates` into the rows to insert, dropping in-batch repeats and
/// keys found in `persisted`. Returns `(rows, in_batch, persisted)` counts.
pub fn dedup(
  candidates: Vec<FactRow>,
  persisted: Option<&HashSet<FactKey>>,
) -> (Vec<FactRow>, usize, usize) {
  let mut seen = HashSet::new();
  let mut in_batch = 0;
  let mut already = 0;

  let rows = candidates
    .into_iter()
    .filter(|row| {
      if !seen.insert(row.key) {
        in_batch += 1;
        false
      } else if persisted.is_some_and(|keys| keys.contains(&row.key)) {
        already += 1;
        false
      } else {
        true
      }
    })
    .collect();

  (rows, in_batch, already)
}

/// Deduplicate `candidates` against the store and insert the rest.
pub async fn load_facts<S: WarehouseStore>(
  store: &S,
  candidates: Vec<FactRow>,
  policy: FactKeyReadPolicy,
) -> Result<FactReport, LoadError> {
  let mut report = FactReport { candidates: candidates.len(), ..Default::default() };

  let persisted = match store.fact_keys().await {
    Ok(keys) => Some(keys),
    Err(e) => match policy {
      FactKeyReadPolicy::Abort => {
        return Err(LoadError::FactKeyLookup { source: boxed(e) });
      }
      FactKeyReadPolicy::InsertAll => {
        tracing::warn!(
          error = %e,
          "could not read existing fact keys; inserting all candidates (degraded mode, \
           duplicates possible)"
        );
        report.degraded = true;
        None
      }
    },
  };

  let (rows, in_batch, already) = dedup(candidates, persisted.as_ref());
  report.duplicate_in_batch = in_batch;
  report.already_persisted = already;

  if !rows.is_empty() {
    report.inserted = store
      .append_facts(rows)
      .await
      .map_err(|e| FactWriteError(boxed(e)))?;
  }

  tracing::info!(
    candidates = report.candidates,
    duplicate_in_batch = report.duplicate_in_batch,
    already_persisted = report.already_persisted,
    inserted = report.inserted,
    "facts loaded"
  );
  Ok(report)
}
