//! Dimension extractor: distinct natural keys per dimension.
//!
//! [`project`] is the one place a record is turned into a natural key; the
//! fact resolver uses it too, so extraction and resolution always agree.

use std::collections::{BTreeMap, HashSet};

use foodprice_core::{
  dimension::{CommodityKey, DimensionKind, LocationKey, NaturalKey},
  record::PriceRecord,
};

use crate::options::RegionSource;

/// Project `record` onto the natural key of `kind`.
pub fn project(record: &PriceRecord, kind: DimensionKind, region: &RegionSource) -> NaturalKey {
  match kind {
    DimensionKind::Date => NaturalKey::Date(record.date),
    DimensionKind::Location => NaturalKey::Location(LocationKey {
      region: region.region_for(record).to_owned(),
      admin1: record.admin1.clone(),
      admin2: record.admin2.clone(),
      market: record.market.clone(),
    }),
    DimensionKind::Commodity => NaturalKey::Commodity(CommodityKey {
      category:  record.category.clone(),
      commodity: record.commodity.clone(),
      unit:      record.unit.clone(),
    }),
    DimensionKind::MarketType => NaturalKey::MarketType(record.price_type.clone()),
  }
}

/// Distinct candidate keys for every dimension, each in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Candidates(BTreeMap<DimensionKind, Vec<NaturalKey>>);

impl Candidates {
  /// Move the candidates of `kind` out, leaving it empty.
  pub fn take(&mut self, kind: DimensionKind) -> Vec<NaturalKey> {
    self.0.remove(&kind).unwrap_or_default()
  }
}

pub fn extract(records: &[PriceRecord], region: &RegionSource) -> Candidates {
  let mut by_kind = BTreeMap::new();
  for kind in DimensionKind::ALL {
    let mut seen = HashSet::new();
    let keys: Vec<NaturalKey> = records
      .iter()
      .map(|r| project(r, kind, region))
      .filter(|key| seen.insert(key.clone()))
      .collect();
    tracing::debug!(dimension = %kind, candidates = keys.len(), "extracted candidates");
    by_kind.insert(kind, keys);
  }
  Candidates(by_kind)
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn record(day: u32, admin1: &str, market: &str, price_type: &str) -> PriceRecord {
    PriceRecord {
      row:             day as usize,
      date:            NaiveDate::from_ymd_opt(2023, 1, day).unwrap(),
      admin1:          admin1.into(),
      admin2:          "Central".into(),
      market:          market.into(),
      category:        "cereals and tubers".into(),
      commodity:       "Maize".into(),
      unit:            "KG".into(),
      price_type:      price_type.into(),
      price_local:     50.0,
      price_reference: 0.4,
    }
  }

  #[test]
  fn candidates_are_distinct_in_first_seen_order() {
    let records = vec![
      record(15, "Nairobi", "Kibera", "Retail"),
      record(15, "Mombasa", "Kongowea", "Wholesale"),
      record(16, "Nairobi", "Kibera", "Retail"),
    ];
    let mut c = extract(&records, &RegionSource::Admin1);

    assert_eq!(c.take(DimensionKind::Date).len(), 2);
    assert_eq!(c.take(DimensionKind::Location).len(), 2);
    assert_eq!(c.take(DimensionKind::Commodity).len(), 1);
    assert_eq!(c.take(DimensionKind::MarketType), vec![
      NaturalKey::MarketType("Retail".into()),
      NaturalKey::MarketType("Wholesale".into()),
    ]);
  }

  #[test]
  fn region_follows_configured_source() {
    let r = record(15, "Nairobi", "Kibera", "Retail");

    let NaturalKey::Location(from_admin) =
      project(&r, DimensionKind::Location, &RegionSource::Admin1)
    else {
      panic!("expected a location key");
    };
    assert_eq!(from_admin.region, "Nairobi");

    let fixed = RegionSource::Fixed { value: "Kenya".into() };
    let NaturalKey::Location(from_fixed) = project(&r, DimensionKind::Location, &fixed) else {
      panic!("expected a location key");
    };
    assert_eq!(from_fixed.region, "Kenya");
    assert_eq!(from_fixed.market, "Kibera");
  }

  #[test]
  fn take_empties_the_dimension() {
    let mut c = extract(&[record(15, "Nairobi", "Kibera", "Retail")], &RegionSource::Admin1);
    assert_eq!(c.take(DimensionKind::Date).len(), 1);
    assert!(c.take(DimensionKind::Date).is_empty());
    assert!(extract(&[], &RegionSource::Admin1).take(DimensionKind::Commodity).is_empty());
  }
}
