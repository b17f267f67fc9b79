//! Incremental dimensional loading of food-price extracts.
//!
//! A run moves one [`RawBatch`](foodprice_core::record::RawBatch) through six
//! strictly sequential stages:
//!
//! 1. [`normalize`] cleans the raw table into [`PriceRecord`]s.
//! 2. [`extract`] projects distinct natural keys per dimension.
//! 3. [`reconcile`] diffs them against what the store already holds.
//! 4. [`writer`] bulk-appends the genuinely new dimension rows.
//! 5. [`resolve`] maps every record to four surrogate keys.
//! 6. [`facts`] drops already-persisted facts and appends the rest.
//!
//! [`Loader`] drives the stages against any
//! [`WarehouseStore`](foodprice_core::store::WarehouseStore).
//!
//! [`PriceRecord`]: foodprice_core::record::PriceRecord

pub mod error;
pub mod extract;
pub mod facts;
pub mod normalize;
pub mod options;
pub mod pipeline;
pub mod reconcile;
pub mod resolve;
pub mod summary;
pub mod writer;

pub use error::{LoadError, Stage};
pub use options::LoadOptions;
pub use pipeline::Loader;
pub use summary::RunSummary;
