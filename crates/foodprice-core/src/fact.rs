//! Fact rows: one price observation resolved to four surrogate keys.
//!
//! A fact is never mutated after insertion and never deleted by the loader.

use serde::{Deserialize, Serialize};

use crate::dimension::SurrogateKey;

/// The composite identity of a fact row. Unique within the fact table.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FactKey {
  pub date:        SurrogateKey,
  pub location:    SurrogateKey,
  pub commodity:   SurrogateKey,
  pub market_type: SurrogateKey,
}

/// A fully resolved fact ready for insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRow {
  pub key:             FactKey,
  /// Price in the local currency.
  pub price_local:     f64,
  /// Price in the reference currency (USD for the WFP extracts).
  pub price_reference: f64,
}
