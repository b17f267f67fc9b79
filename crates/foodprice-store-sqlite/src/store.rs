//! [`SqliteStore`]: the SQLite implementation of [`WarehouseStore`].

use std::{collections::HashSet, path::Path};

use foodprice_core::{
  dimension::{DimensionKind, KeyMap, NaturalKey, SurrogateKey},
  fact::{FactKey, FactRow},
  store::{TableCounts, WarehouseStore},
};

use crate::{
  StoreConfig,
  encode::{RawDimensionRow, dimension_sql, encode_key, key_width},
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A food-price warehouse backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) the store described by `config` and run schema
  /// initialisation.
  pub async fn open(config: &StoreConfig) -> Result<Self> {
    let store = Self::open_path(&config.path).await?;
    let timeout = config.busy_timeout();
    store
      .conn
      .call(move |conn| {
        conn.busy_timeout(timeout)?;
        Ok(())
      })
      .await?;
    Ok(store)
  }

  async fn open_path(path: impl AsRef<Path>) -> Result<Self> {
    tracing::debug!(path = %path.as_ref().display(), "opening warehouse");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `sql` once per bind-value row inside one transaction. Either every
  /// row is inserted or none is.
  async fn bulk_insert(
    &self,
    sql: &'static str,
    rows: Vec<Vec<rusqlite::types::Value>>,
  ) -> Result<usize> {
    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0;
        {
          let mut stmt = tx.prepare(sql)?;
          for values in rows {
            inserted += stmt.execute(rusqlite::params_from_iter(values))?;
          }
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;
    Ok(inserted)
  }
}

// ─── WarehouseStore impl ─────────────────────────────────────────────────────

impl WarehouseStore for SqliteStore {
  type Error = crate::Error;

  // ── Dimensions ────────────────────────────────────────────────────────────

  async fn dimension_keys(&self, kind: DimensionKind) -> Result<KeyMap> {
    let select = dimension_sql(kind).select;
    let width = key_width(kind);

    let raws: Vec<RawDimensionRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(select)?;
        let rows = stmt
          .query_map([], |row| {
            let id: i64 = row.get(0)?;
            let columns = (1..=width)
              .map(|i| row.get::<_, String>(i))
              .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(RawDimensionRow { id, columns })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    tracing::debug!(dimension = %kind, rows = raws.len(), "read dimension keys");
    raws.into_iter().map(|raw| raw.into_entry(kind)).collect()
  }

  async fn append_dimension(
    &self,
    kind: DimensionKind,
    rows: Vec<NaturalKey>,
  ) -> Result<usize> {
    for key in &rows {
      key.expect_kind(kind)?;
    }
    let encoded = rows.iter().map(encode_key).collect();
    let inserted = self.bulk_insert(dimension_sql(kind).insert, encoded).await?;
    tracing::debug!(dimension = %kind, inserted, "appended dimension rows");
    Ok(inserted)
  }

  // ── Facts ─────────────────────────────────────────────────────────────────

  async fn fact_keys(&self) -> Result<HashSet<FactKey>> {
    let keys = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT date_id, location_id, commodity_id, market_type_id FROM fact_price",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(FactKey {
              date:        SurrogateKey(row.get(0)?),
              location:    SurrogateKey(row.get(1)?),
              commodity:   SurrogateKey(row.get(2)?),
              market_type: SurrogateKey(row.get(3)?),
            })
          })?
          .collect::<rusqlite::Result<HashSet<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(keys)
  }

  async fn append_facts(&self, rows: Vec<FactRow>) -> Result<usize> {
    use rusqlite::types::Value;

    let encoded = rows
      .iter()
      .map(|f| {
        vec![
          Value::Integer(f.key.date.0),
          Value::Integer(f.key.location.0),
          Value::Integer(f.key.commodity.0),
          Value::Integer(f.key.market_type.0),
          Value::Real(f.price_local),
          Value::Real(f.price_reference),
        ]
      })
      .collect();

    let inserted = self
      .bulk_insert(
        "INSERT INTO fact_price (
           date_id, location_id, commodity_id, market_type_id,
           price_local, price_reference
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        encoded,
      )
      .await?;
    tracing::debug!(inserted, "appended fact rows");
    Ok(inserted)
  }

  // ── Reporting ─────────────────────────────────────────────────────────────

  async fn table_counts(&self) -> Result<TableCounts> {
    let counts = self
      .conn
      .call(|conn| {
        let count = |table: &str| -> rusqlite::Result<u64> {
          conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| {
            r.get::<_, i64>(0)
          })
          .map(|n| n as u64)
        };
        Ok(TableCounts {
          dates:        count("dim_date")?,
          locations:    count("dim_location")?,
          commodities:  count("dim_commodity")?,
          market_types: count("dim_market_type")?,
          facts:        count("fact_price")?,
        })
      })
      .await?;
    Ok(counts)
  }
}
