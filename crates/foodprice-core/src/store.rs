//! The `WarehouseStore` trait: the loader's only view of persisted state.
//!
//! The trait is implemented by storage backends (e.g.
//! `foodprice-store-sqlite`). The loader depends on this abstraction, not on
//! any concrete backend.

use std::{collections::HashSet, future::Future};

use serde::{Deserialize, Serialize};

use crate::{
  dimension::{DimensionKind, KeyMap, NaturalKey},
  fact::{FactKey, FactRow},
};

/// Row counts of every warehouse table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCounts {
  pub dates:        u64,
  pub locations:    u64,
  pub commodities:  u64,
  pub market_types: u64,
  pub facts:        u64,
}

/// Abstraction over a dimensional warehouse backend.
///
/// Every write is append-only and bulk: one call inserts a whole batch or
/// fails as a whole. Backends assign surrogate keys; callers never choose
/// them.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait WarehouseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Dimensions ────────────────────────────────────────────────────────

  /// Read every persisted natural key of `kind` with its surrogate key.
  fn dimension_keys(
    &self,
    kind: DimensionKind,
  ) -> impl Future<Output = Result<KeyMap, Self::Error>> + Send + '_;

  /// Append `rows` to the `kind` dimension table and return the number of
  /// rows inserted.
  ///
  /// Every key must belong to `kind`. Inserting a natural key that already
  /// exists is an error; callers reconcile first.
  fn append_dimension(
    &self,
    kind: DimensionKind,
    rows: Vec<NaturalKey>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Facts ─────────────────────────────────────────────────────────────

  /// Read the composite key of every persisted fact row.
  fn fact_keys(
    &self,
  ) -> impl Future<Output = Result<HashSet<FactKey>, Self::Error>> + Send + '_;

  /// Append `rows` to the fact table and return the number inserted.
  fn append_facts(
    &self,
    rows: Vec<FactRow>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Reporting ─────────────────────────────────────────────────────────

  fn table_counts(
    &self,
  ) -> impl Future<Output = Result<TableCounts, Self::Error>> + Send + '_;
}
