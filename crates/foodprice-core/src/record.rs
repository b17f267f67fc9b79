//! Source-side records: the raw extract as read, and the normalized record
//! the pipeline works with.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ─── Raw batch ───────────────────────────────────────────────────────────────

/// An already-materialized tabular extract.
///
/// Column names and cell values are kept exactly as read; trimming and
/// validation belong to the normalizer. A `None` cell is a missing value.
#[derive(Debug, Clone, Default)]
pub struct RawBatch {
  pub columns: Vec<String>,
  pub rows:    Vec<Vec<Option<String>>>,
}

impl RawBatch {
  pub fn new(columns: Vec<String>) -> Self {
    Self { columns, rows: Vec::new() }
  }

  /// Append a row of cells. Short rows are padded with missing values.
  pub fn push_row(&mut self, mut cells: Vec<Option<String>>) {
    if cells.len() < self.columns.len() {
      cells.resize(self.columns.len(), None);
    }
    self.rows.push(cells);
  }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

// ─── Normalized record ───────────────────────────────────────────────────────

/// One cleaned price observation.
///
/// All string fields are trimmed and non-empty. `row` is the 1-based position
/// of the record in the raw batch, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
  pub row:             usize,
  pub date:            NaiveDate,
  pub admin1:          String,
  pub admin2:          String,
  pub market:          String,
  pub category:        String,
  pub commodity:       String,
  pub unit:            String,
  pub price_type:      String,
  pub price_local:     f64,
  pub price_reference: f64,
}
