//! Dimension identities: which dimension a row belongs to, its natural key,
//! and the surrogate key the store assigns to it.
//!
//! Dimension rows are immutable once persisted. The descriptive attributes
//! of a row are all derivable from its natural key (the date dimension's
//! year/month/day come from the date itself), so the natural key is the
//! whole row as far as the loader is concerned.

use std::{collections::HashMap, fmt};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Error;

// ─── Kind ────────────────────────────────────────────────────────────────────

/// The four dimensions of the warehouse schema.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DimensionKind {
  Date,
  Location,
  Commodity,
  MarketType,
}

impl DimensionKind {
  /// Every dimension, in the order the loader processes them.
  pub const ALL: [DimensionKind; 4] = [
    DimensionKind::Date,
    DimensionKind::Location,
    DimensionKind::Commodity,
    DimensionKind::MarketType,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Date => "date",
      Self::Location => "location",
      Self::Commodity => "commodity",
      Self::MarketType => "market_type",
    }
  }
}

impl fmt::Display for DimensionKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Natural keys ────────────────────────────────────────────────────────────

/// Natural key of the location dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationKey {
  /// Derived according to the configured region source; see
  /// `foodprice_loader::options::RegionSource`.
  pub region: String,
  pub admin1: String,
  pub admin2: String,
  pub market: String,
}

/// Natural key of the commodity dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommodityKey {
  pub category:  String,
  pub commodity: String,
  pub unit:      String,
}

/// The real-world identity of a dimension row.
///
/// Equality is exact on every attribute; no case folding or trimming happens
/// here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "dimension", content = "key", rename_all = "snake_case")]
pub enum NaturalKey {
  Date(NaiveDate),
  Location(LocationKey),
  Commodity(CommodityKey),
  MarketType(String),
}

impl NaturalKey {
  pub fn kind(&self) -> DimensionKind {
    match self {
      Self::Date(_) => DimensionKind::Date,
      Self::Location(_) => DimensionKind::Location,
      Self::Commodity(_) => DimensionKind::Commodity,
      Self::MarketType(_) => DimensionKind::MarketType,
    }
  }

  /// Fail with [`Error::KindMismatch`] unless this key belongs to `expected`.
  pub fn expect_kind(&self, expected: DimensionKind) -> crate::Result<()> {
    let found = self.kind();
    if found == expected {
      Ok(())
    } else {
      Err(Error::KindMismatch { expected, found })
    }
  }
}

impl fmt::Display for NaturalKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Date(d) => write!(f, "{d}"),
      Self::Location(l) => {
        write!(f, "{} / {} / {} / {}", l.region, l.admin1, l.admin2, l.market)
      }
      Self::Commodity(c) => {
        write!(f, "{} / {} / {}", c.category, c.commodity, c.unit)
      }
      Self::MarketType(p) => f.write_str(p),
    }
  }
}

// ─── Surrogate keys ──────────────────────────────────────────────────────────

/// A store-assigned identifier, unique within one dimension table and stable
/// for the lifetime of the row.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SurrogateKey(pub i64);

impl fmt::Display for SurrogateKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// The persisted contents of one dimension table: natural key → surrogate key.
pub type KeyMap = HashMap<NaturalKey, SurrogateKey>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn expect_kind_rejects_other_dimension() {
    let key = NaturalKey::MarketType("Retail".into());
    assert!(key.expect_kind(DimensionKind::MarketType).is_ok());
    assert!(matches!(
      key.expect_kind(DimensionKind::Date),
      Err(Error::KindMismatch {
        expected: DimensionKind::Date,
        found:    DimensionKind::MarketType,
      })
    ));
  }

  #[test]
  fn keys_differing_only_in_case_are_distinct() {
    let a = NaturalKey::MarketType("Retail".into());
    let b = NaturalKey::MarketType("retail".into());
    assert_ne!(a, b);
  }
}
