//! Shared fixtures: extract builders and a store wrapper that injects
//! failures at chosen boundary calls.

#![allow(dead_code)]

use std::{collections::HashSet, sync::Mutex};

use foodprice_core::{
  dimension::{DimensionKind, KeyMap, NaturalKey},
  fact::{FactKey, FactRow},
  record::RawBatch,
  store::{TableCounts, WarehouseStore},
};
use foodprice_store_sqlite::SqliteStore;

// ─── Extract builders ────────────────────────────────────────────────────────

pub const HEADER: [&str; 10] = [
  "date", "admin1", "admin2", "market", "category", "commodity", "unit",
  "pricetype", "price", "usdprice",
];

/// One observation in the default column order.
pub fn obs<'a>(
  date: &'a str,
  market: &'a str,
  commodity: &'a str,
  price_type: &'a str,
  price: &'a str,
) -> [&'a str; 10] {
  [
    date, "Nairobi", "Nairobi", market, "cereals and tubers", commodity, "KG",
    price_type, price, "0.50",
  ]
}

pub fn batch(rows: &[[&str; 10]]) -> RawBatch {
  let mut batch = RawBatch::new(HEADER.iter().map(|h| (*h).to_owned()).collect());
  for row in rows {
    batch.push_row(
      row
        .iter()
        .map(|v| if v.is_empty() { None } else { Some((*v).to_owned()) })
        .collect(),
    );
  }
  batch
}

pub async fn sqlite() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

// ─── Fault injection ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
  ReadDimension(DimensionKind),
  AppendDimension(DimensionKind),
  ReadFactKeys,
  AppendFacts,
}

#[derive(Debug, thiserror::Error)]
pub enum FlakyError {
  #[error("injected failure: {0:?}")]
  Injected(Fault),
  #[error(transparent)]
  Store(#[from] foodprice_store_sqlite::Error),
}

/// Delegates to a [`SqliteStore`], failing the armed boundary calls.
pub struct FlakyStore {
  inner:  SqliteStore,
  always: HashSet<Fault>,
  once:   Mutex<HashSet<Fault>>,
}

impl FlakyStore {
  pub fn new(inner: SqliteStore) -> Self {
    Self { inner, always: HashSet::new(), once: Mutex::new(HashSet::new()) }
  }

  pub fn fail_always(mut self, fault: Fault) -> Self {
    self.always.insert(fault);
    self
  }

  pub fn fail_once(self, fault: Fault) -> Self {
    self.once.lock().unwrap().insert(fault);
    self
  }

  pub fn inner(&self) -> &SqliteStore { &self.inner }

  fn check(&self, fault: Fault) -> Result<(), FlakyError> {
    if self.always.contains(&fault) || self.once.lock().unwrap().remove(&fault) {
      Err(FlakyError::Injected(fault))
    } else {
      Ok(())
    }
  }
}

impl WarehouseStore for FlakyStore {
  type Error = FlakyError;

  async fn dimension_keys(&self, kind: DimensionKind) -> Result<KeyMap, FlakyError> {
    self.check(Fault::ReadDimension(kind))?;
    Ok(self.inner.dimension_keys(kind).await?)
  }

  async fn append_dimension(
    &self,
    kind: DimensionKind,
    rows: Vec<NaturalKey>,
  ) -> Result<usize, FlakyError> {
    self.check(Fault::AppendDimension(kind))?;
    Ok(self.inner.append_dimension(kind, rows).await?)
  }

  async fn fact_keys(&self) -> Result<HashSet<FactKey>, FlakyError> {
    self.check(Fault::ReadFactKeys)?;
    Ok(self.inner.fact_keys().await?)
  }

  async fn append_facts(&self, rows: Vec<FactRow>) -> Result<usize, FlakyError> {
    self.check(Fault::AppendFacts)?;
    Ok(self.inner.append_facts(rows).await?)
  }

  async fn table_counts(&self) -> Result<TableCounts, FlakyError> {
    Ok(self.inner.table_counts().await?)
  }
}
