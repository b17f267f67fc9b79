//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use foodprice_core::{
  dimension::{CommodityKey, DimensionKind, LocationKey, NaturalKey, SurrogateKey},
  fact::{FactKey, FactRow},
  store::WarehouseStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(y: i32, m: u32, d: u32) -> NaturalKey {
  NaturalKey::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn market(admin1: &str, market: &str) -> NaturalKey {
  NaturalKey::Location(LocationKey {
    region: "Kenya".into(),
    admin1: admin1.into(),
    admin2: "Central".into(),
    market: market.into(),
  })
}

fn maize() -> NaturalKey {
  NaturalKey::Commodity(CommodityKey {
    category:  "cereals and tubers".into(),
    commodity: "Maize".into(),
    unit:      "KG".into(),
  })
}

fn retail() -> NaturalKey { NaturalKey::MarketType("Retail".into()) }

/// Insert one row in every dimension and return the resulting fact key.
async fn seed_dimensions(s: &SqliteStore) -> FactKey {
  s.append_dimension(DimensionKind::Date, vec![date(2023, 1, 15)]).await.unwrap();
  s.append_dimension(DimensionKind::Location, vec![market("Nairobi", "Kibera")])
    .await
    .unwrap();
  s.append_dimension(DimensionKind::Commodity, vec![maize()]).await.unwrap();
  s.append_dimension(DimensionKind::MarketType, vec![retail()]).await.unwrap();

  let id = |map: foodprice_core::dimension::KeyMap| *map.values().next().unwrap();
  FactKey {
    date:        id(s.dimension_keys(DimensionKind::Date).await.unwrap()),
    location:    id(s.dimension_keys(DimensionKind::Location).await.unwrap()),
    commodity:   id(s.dimension_keys(DimensionKind::Commodity).await.unwrap()),
    market_type: id(s.dimension_keys(DimensionKind::MarketType).await.unwrap()),
  }
}

// ─── Dimensions ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_store_has_no_keys() {
  let s = store().await;
  for kind in DimensionKind::ALL {
    assert!(s.dimension_keys(kind).await.unwrap().is_empty());
  }
  assert!(s.fact_keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn append_and_read_every_dimension() {
  let s = store().await;

  let rows = [
    (DimensionKind::Date, vec![date(2023, 1, 15), date(2023, 2, 15)]),
    (DimensionKind::Location, vec![market("Nairobi", "Kibera"), market("Mombasa", "Kongowea")]),
    (DimensionKind::Commodity, vec![maize()]),
    (DimensionKind::MarketType, vec![retail(), NaturalKey::MarketType("Wholesale".into())]),
  ];

  for (kind, keys) in rows {
    let inserted = s.append_dimension(kind, keys.clone()).await.unwrap();
    assert_eq!(inserted, keys.len());

    let persisted = s.dimension_keys(kind).await.unwrap();
    assert_eq!(persisted.len(), keys.len());
    for key in &keys {
      assert!(persisted.contains_key(key), "{kind}: {key} missing");
    }
  }
}

#[tokio::test]
async fn surrogate_keys_are_distinct_and_stable() {
  let s = store().await;
  s.append_dimension(DimensionKind::MarketType, vec![retail()]).await.unwrap();
  let first = s.dimension_keys(DimensionKind::MarketType).await.unwrap()[&retail()];

  s.append_dimension(
    DimensionKind::MarketType,
    vec![NaturalKey::MarketType("Wholesale".into())],
  )
  .await
  .unwrap();

  let after = s.dimension_keys(DimensionKind::MarketType).await.unwrap();
  assert_eq!(after[&retail()], first);
  assert_ne!(after[&NaturalKey::MarketType("Wholesale".into())], first);
}

#[tokio::test]
async fn append_empty_dimension_batch_inserts_nothing() {
  let s = store().await;
  let inserted = s.append_dimension(DimensionKind::Commodity, vec![]).await.unwrap();
  assert_eq!(inserted, 0);
}

#[tokio::test]
async fn duplicate_natural_key_fails_whole_batch() {
  let s = store().await;
  s.append_dimension(DimensionKind::Location, vec![market("Nairobi", "Kibera")])
    .await
    .unwrap();

  let err = s
    .append_dimension(
      DimensionKind::Location,
      vec![market("Mombasa", "Kongowea"), market("Nairobi", "Kibera")],
    )
    .await;
  assert!(matches!(err, Err(crate::Error::Database(_))));

  // The transaction rolled back: the new market was not kept either.
  let persisted = s.dimension_keys(DimensionKind::Location).await.unwrap();
  assert_eq!(persisted.len(), 1);
}

#[tokio::test]
async fn wrong_dimension_key_is_rejected() {
  let s = store().await;
  let err = s.append_dimension(DimensionKind::Date, vec![retail()]).await;
  assert!(matches!(err, Err(crate::Error::Core(_))));
  assert!(s.dimension_keys(DimensionKind::Date).await.unwrap().is_empty());
}

// ─── Facts ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn append_and_read_fact_keys() {
  let s = store().await;
  let key = seed_dimensions(&s).await;

  let inserted = s
    .append_facts(vec![FactRow { key, price_local: 52.5, price_reference: 0.41 }])
    .await
    .unwrap();
  assert_eq!(inserted, 1);

  let keys = s.fact_keys().await.unwrap();
  assert_eq!(keys.len(), 1);
  assert!(keys.contains(&key));
}

#[tokio::test]
async fn duplicate_fact_key_is_rejected() {
  let s = store().await;
  let key = seed_dimensions(&s).await;
  let row = FactRow { key, price_local: 52.5, price_reference: 0.41 };

  s.append_facts(vec![row.clone()]).await.unwrap();
  let err = s
    .append_facts(vec![FactRow { price_local: 60.0, ..row }])
    .await;
  assert!(err.is_err());
  assert_eq!(s.fact_keys().await.unwrap().len(), 1);
}

#[tokio::test]
async fn fact_with_unknown_dimension_key_is_rejected() {
  let s = store().await;
  let key = seed_dimensions(&s).await;
  let dangling = FactKey { commodity: SurrogateKey(9_999), ..key };

  let err = s
    .append_facts(vec![FactRow { key: dangling, price_local: 1.0, price_reference: 0.01 }])
    .await;
  assert!(err.is_err());
  assert!(s.fact_keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn table_counts_reflect_inserts() {
  let s = store().await;
  let key = seed_dimensions(&s).await;
  s.append_facts(vec![FactRow { key, price_local: 52.5, price_reference: 0.41 }])
    .await
    .unwrap();

  let counts = s.table_counts().await.unwrap();
  assert_eq!(counts.dates, 1);
  assert_eq!(counts.locations, 1);
  assert_eq!(counts.commodities, 1);
  assert_eq!(counts.market_types, 1);
  assert_eq!(counts.facts, 1);
}
