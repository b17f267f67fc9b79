//! Run options, deserialised from the `[load]` section of the config file.

use foodprice_core::record::PriceRecord;
use serde::Deserialize;

/// Everything that shapes how a batch is interpreted and loaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
  pub columns:           ColumnMap,
  pub region:            RegionSource,
  /// `chrono` format strings tried in order when parsing the date column.
  pub date_formats:      Vec<String>,
  pub fact_key_read:     FactKeyReadPolicy,
  /// How many unresolved facts are kept verbatim in the summary.
  pub unresolved_sample: usize,
  /// How many malformed records are kept verbatim in the summary.
  pub malformed_sample:  usize,
}

impl Default for LoadOptions {
  fn default() -> Self {
    Self {
      columns:           ColumnMap::default(),
      region:            RegionSource::default(),
      date_formats:      vec!["%Y-%m-%d".into(), "%Y/%m/%d".into()],
      fact_key_read:     FactKeyReadPolicy::default(),
      unresolved_sample: 10,
      malformed_sample:  10,
    }
  }
}

// ─── Column contract ─────────────────────────────────────────────────────────

/// Header names of the required columns. Defaults follow the HDX food-price
/// extracts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
  pub date:            String,
  pub admin1:          String,
  pub admin2:          String,
  pub market:          String,
  pub category:        String,
  pub commodity:       String,
  pub unit:            String,
  pub price_type:      String,
  pub price_local:     String,
  pub price_reference: String,
}

impl Default for ColumnMap {
  fn default() -> Self {
    Self {
      date:            "date".into(),
      admin1:          "admin1".into(),
      admin2:          "admin2".into(),
      market:          "market".into(),
      category:        "category".into(),
      commodity:       "commodity".into(),
      unit:            "unit".into(),
      price_type:      "pricetype".into(),
      price_local:     "price".into(),
      price_reference: "usdprice".into(),
    }
  }
}

impl ColumnMap {
  /// Required column names in [`crate::normalize::Field`] order.
  pub fn names(&self) -> [&str; 10] {
    [
      self.date.as_str(),
      self.admin1.as_str(),
      self.admin2.as_str(),
      self.market.as_str(),
      self.category.as_str(),
      self.commodity.as_str(),
      self.unit.as_str(),
      self.price_type.as_str(),
      self.price_local.as_str(),
      self.price_reference.as_str(),
    ]
  }
}

// ─── Region ──────────────────────────────────────────────────────────────────

/// Where the `region` attribute of the location dimension comes from.
///
/// ```toml
/// [load.region]
/// source = "fixed"
/// value  = "Kenya"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RegionSource {
  /// Copy the record's admin-region.
  #[default]
  Admin1,
  /// Use one constant label for every record.
  Fixed { value: String },
}

impl RegionSource {
  pub fn region_for<'a>(&'a self, record: &'a PriceRecord) -> &'a str {
    match self {
      Self::Admin1 => &record.admin1,
      Self::Fixed { value } => value,
    }
  }
}

// ─── Fact key read ───────────────────────────────────────────────────────────

/// What to do when the existing fact keys cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactKeyReadPolicy {
  /// Fail the run before any fact is written.
  #[default]
  Abort,
  /// Degraded mode: insert every in-batch-distinct candidate without
  /// checking the store. Can reintroduce duplicates on a store that does not
  /// enforce fact-key uniqueness itself.
  InsertAll,
}
