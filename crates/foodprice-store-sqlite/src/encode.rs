//! Encoding and decoding helpers between dimension keys and the plain
//! columns stored in SQLite.
//!
//! Dates are stored as `YYYY-MM-DD` text. Every other natural-key attribute
//! is stored as the exact text it was given.

use chrono::{Datelike, NaiveDate};
use foodprice_core::dimension::{
  CommodityKey, DimensionKind, LocationKey, NaturalKey, SurrogateKey,
};
use rusqlite::types::Value;

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Per-dimension SQL ───────────────────────────────────────────────────────

/// The statements used to read and append one dimension table.
///
/// `select` yields the surrogate key followed by the natural-key columns, in
/// the same order [`encode_key`] binds them.
pub struct DimensionSql {
  pub table:  &'static str,
  pub select: &'static str,
  pub insert: &'static str,
}

pub fn dimension_sql(kind: DimensionKind) -> DimensionSql {
  match kind {
    DimensionKind::Date => DimensionSql {
      table:  "dim_date",
      select: "SELECT date_id, date FROM dim_date",
      insert: "INSERT INTO dim_date (date, year, month, day) VALUES (?1, ?2, ?3, ?4)",
    },
    DimensionKind::Location => DimensionSql {
      table:  "dim_location",
      select: "SELECT location_id, region, admin1, admin2, market FROM dim_location",
      insert: "INSERT INTO dim_location (region, admin1, admin2, market)
               VALUES (?1, ?2, ?3, ?4)",
    },
    DimensionKind::Commodity => DimensionSql {
      table:  "dim_commodity",
      select: "SELECT commodity_id, category, commodity, unit FROM dim_commodity",
      insert: "INSERT INTO dim_commodity (category, commodity, unit) VALUES (?1, ?2, ?3)",
    },
    DimensionKind::MarketType => DimensionSql {
      table:  "dim_market_type",
      select: "SELECT market_type_id, price_type FROM dim_market_type",
      insert: "INSERT INTO dim_market_type (price_type) VALUES (?1)",
    },
  }
}

/// Number of natural-key text columns `select` returns after the id.
pub fn key_width(kind: DimensionKind) -> usize {
  match kind {
    DimensionKind::Date | DimensionKind::MarketType => 1,
    DimensionKind::Commodity => 3,
    DimensionKind::Location => 4,
  }
}

/// Bind values for one dimension insert. The date dimension also carries its
/// derived year/month/day attributes.
pub fn encode_key(key: &NaturalKey) -> Vec<Value> {
  match key {
    NaturalKey::Date(d) => vec![
      Value::Text(encode_date(*d)),
      Value::Integer(i64::from(d.year())),
      Value::Integer(i64::from(d.month())),
      Value::Integer(i64::from(d.day())),
    ],
    NaturalKey::Location(l) => vec![
      Value::Text(l.region.clone()),
      Value::Text(l.admin1.clone()),
      Value::Text(l.admin2.clone()),
      Value::Text(l.market.clone()),
    ],
    NaturalKey::Commodity(c) => vec![
      Value::Text(c.category.clone()),
      Value::Text(c.commodity.clone()),
      Value::Text(c.unit.clone()),
    ],
    NaturalKey::MarketType(p) => vec![Value::Text(p.clone())],
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a dimension row.
pub struct RawDimensionRow {
  pub id:      i64,
  pub columns: Vec<String>,
}

impl RawDimensionRow {
  pub fn into_entry(self, kind: DimensionKind) -> Result<(NaturalKey, SurrogateKey)> {
    let id = self.id;
    let malformed = |reason: String| Error::MalformedRow {
      table: dimension_sql(kind).table,
      id,
      reason,
    };

    if self.columns.len() != key_width(kind) {
      return Err(malformed(format!(
        "expected {} key columns, found {}",
        key_width(kind),
        self.columns.len()
      )));
    }

    let mut cols = self.columns.into_iter();
    let mut next = || cols.next().unwrap_or_default();

    let key = match kind {
      DimensionKind::Date => NaturalKey::Date(decode_date(&next())?),
      DimensionKind::Location => NaturalKey::Location(LocationKey {
        region: next(),
        admin1: next(),
        admin2: next(),
        market: next(),
      }),
      DimensionKind::Commodity => NaturalKey::Commodity(CommodityKey {
        category:  next(),
        commodity: next(),
        unit:      next(),
      }),
      DimensionKind::MarketType => NaturalKey::MarketType(next()),
    };

    Ok((key, SurrogateKey(id)))
  }
}
