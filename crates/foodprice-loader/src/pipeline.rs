//! [`Loader`]: runs the stages in order against a store.

use chrono::Utc;
use foodprice_core::{dimension::DimensionKind, record::RawBatch, store::WarehouseStore};
use tracing::Instrument as _;
use uuid::Uuid;

use crate::{
  LoadError, LoadOptions,
  extract::extract,
  facts::load_facts,
  normalize::normalize,
  resolve::{Lookups, resolve},
  summary::{DimensionOutcome, RunSummary},
  writer::sync_dimension,
};

/// An incremental loader bound to one store and one set of options.
///
/// Runs are strictly sequential and leave no state behind between calls;
/// everything a run needs is re-read from the store.
pub struct Loader<S> {
  store:   S,
  options: LoadOptions,
}

impl<S: WarehouseStore> Loader<S> {
  pub fn new(store: S, options: LoadOptions) -> Self { Self { store, options } }

  pub fn store(&self) -> &S { &self.store }

  /// Load `batch`. Dimension failures are recorded in the summary and the
  /// run continues; any [`LoadError`] ends it.
  pub async fn run(&self, batch: &RawBatch) -> Result<RunSummary, LoadError> {
    let run_id = Uuid::new_v4();
    self
      .run_inner(run_id, batch)
      .instrument(tracing::info_span!("load", %run_id))
      .await
  }

  async fn run_inner(&self, run_id: Uuid, batch: &RawBatch) -> Result<RunSummary, LoadError> {
    let started_at = Utc::now();
    let opts = &self.options;

    let normalized = normalize(batch, opts)?;
    let mut candidates = extract(&normalized.records, &opts.region);

    let mut dimensions = Vec::with_capacity(DimensionKind::ALL.len());
    for kind in DimensionKind::ALL {
      let outcome = match sync_dimension(&self.store, kind, candidates.take(kind)).await {
        Ok(report) => DimensionOutcome::Updated(report),
        Err(err) => {
          tracing::error!(%err, "dimension not updated; dependent facts will not resolve");
          err.into()
        }
      };
      dimensions.push(outcome);
    }

    let lookups = Lookups::load(&self.store).await?;
    let mut resolution =
      resolve(&normalized.records, &lookups, &opts.region, opts.unresolved_sample);
    let fact_rows = std::mem::take(&mut resolution.facts);

    let facts = load_facts(&self.store, fact_rows, opts.fact_key_read).await?;

    Ok(RunSummary {
      run_id,
      started_at,
      finished_at: Utc::now(),
      normalize: normalized.report,
      dimensions,
      resolution,
      facts,
    })
  }
}
