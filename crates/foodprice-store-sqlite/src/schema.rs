//! SQL schema for the warehouse.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Every dimension has an integer surrogate primary key assigned by SQLite
/// and a UNIQUE constraint over its natural key.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS dim_date (
    date_id  INTEGER PRIMARY KEY,
    date     TEXT    NOT NULL UNIQUE,   -- ISO 8601 calendar date
    year     INTEGER NOT NULL,
    month    INTEGER NOT NULL,
    day      INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS dim_location (
    location_id INTEGER PRIMARY KEY,
    region      TEXT NOT NULL,
    admin1      TEXT NOT NULL,
    admin2      TEXT NOT NULL,
    market      TEXT NOT NULL,
    UNIQUE (region, admin1, admin2, market)
);

CREATE TABLE IF NOT EXISTS dim_commodity (
    commodity_id INTEGER PRIMARY KEY,
    category     TEXT NOT NULL,
    commodity    TEXT NOT NULL,
    unit         TEXT NOT NULL,
    UNIQUE (category, commodity, unit)
);

CREATE TABLE IF NOT EXISTS dim_market_type (
    market_type_id INTEGER PRIMARY KEY,
    price_type     TEXT NOT NULL UNIQUE
);

-- Facts are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS fact_price (
    fact_id         INTEGER PRIMARY KEY,
    date_id         INTEGER NOT NULL REFERENCES dim_date(date_id),
    location_id     INTEGER NOT NULL REFERENCES dim_location(location_id),
    commodity_id    INTEGER NOT NULL REFERENCES dim_commodity(commodity_id),
    market_type_id  INTEGER NOT NULL REFERENCES dim_market_type(market_type_id),
    price_local     REAL    NOT NULL,
    price_reference REAL    NOT NULL,
    UNIQUE (date_id, location_id, commodity_id, market_type_id)
);

CREATE INDEX IF NOT EXISTS fact_price_location_idx  ON fact_price(location_id);
CREATE INDEX IF NOT EXISTS fact_price_commodity_idx ON fact_price(commodity_id);

PRAGMA user_version = 1;
";
