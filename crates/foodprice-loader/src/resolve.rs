//! Fact resolver: attach four surrogate keys to every normalized record.
//!
//! Lookups go through one explicit natural-key → surrogate-key map per
//! dimension, read once after all dimension writes have finished.

use std::collections::BTreeMap;

use foodprice_core::{
  dimension::{DimensionKind, KeyMap, SurrogateKey},
  fact::{FactKey, FactRow},
  record::PriceRecord,
  store::WarehouseStore,
};
use serde::Serialize;

use crate::{
  LoadError,
  error::{UnresolvedFactError, boxed},
  extract::project,
  options::RegionSource,
};

/// The current contents of every dimension table.
#[derive(Debug, Clone, Default)]
pub struct Lookups(BTreeMap<DimensionKind, KeyMap>);

impl Lookups {
  /// Read every dimension from the store. A failed read is fatal: nothing
  /// can resolve without it.
  pub async fn load<S: WarehouseStore>(store: &S) -> Result<Self, LoadError> {
    let mut maps = BTreeMap::new();
    for kind in DimensionKind::ALL {
      let map = store
        .dimension_keys(kind)
        .await
        .map_err(|e| LoadError::DimensionLookup { dimension: kind, source: boxed(e) })?;
      maps.insert(kind, map);
    }
    Ok(Self(maps))
  }

  pub fn from_maps(maps: impl IntoIterator<Item = (DimensionKind, KeyMap)>) -> Self {
    Self(maps.into_iter().collect())
  }

  fn get(&self, kind: DimensionKind) -> Option<&KeyMap> { self.0.get(&kind) }
}

/// Resolved facts plus an account of every record that was excluded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Resolution {
  #[serde(skip)]
  pub facts:              Vec<FactRow>,
  pub resolved:           usize,
  pub unresolved:         usize,
  /// The first few exclusions, for diagnosis.
  pub unresolved_samples: Vec<UnresolvedFactError>,
}

/// Resolve `records` against `lookups`. A record is excluded iff at least
/// one of its natural keys has no surrogate key.
pub fn resolve(
  records: &[PriceRecord],
  lookups: &Lookups,
  region: &RegionSource,
  sample_size: usize,
) -> Resolution {
  let mut out = Resolution::default();

  for record in records {
    let mut keys = [SurrogateKey(0); 4];
    let mut misses = Vec::new();

    for (slot, kind) in keys.iter_mut().zip(DimensionKind::ALL) {
      let natural = project(record, kind, region);
      match lookups.get(kind).and_then(|map| map.get(&natural)) {
        Some(&id) => *slot = id,
        None => misses.push(natural),
      }
    }

    if !misses.is_empty() {
      out.unresolved += 1;
      if out.unresolved_samples.len() < sample_size {
        out.unresolved_samples.push(UnresolvedFactError { row: record.row, misses });
      }
      continue;
    }

    let [date, location, commodity, market_type] = keys;
    out.facts.push(FactRow {
      key:             FactKey { date, location, commodity, market_type },
      price_local:     record.price_local,
      price_reference: record.price_reference,
    });
  }

  out.resolved = out.facts.len();
  tracing::info!(resolved = out.resolved, unresolved = out.unresolved, "resolved facts");
  if out.unresolved > 0 {
    for err in &out.unresolved_samples {
      tracing::warn!(%err, "unresolved fact");
    }
  }
  out
}
