//! Row normalizer: raw extract → canonical [`PriceRecord`]s.
//!
//! Column names and values are trimmed, incomplete rows dropped, exact
//! duplicates collapsed to their first occurrence, then dates and prices
//! parsed. Surviving records keep their input order.

use std::collections::HashSet;

use chrono::NaiveDate;
use foodprice_core::record::{PriceRecord, RawBatch};
use serde::Serialize;

use crate::{
  LoadError, LoadOptions,
  error::{MalformedReason, MalformedRecordError},
};

/// Positions of the required fields; indexes into [`ColumnMap::names`].
///
/// [`ColumnMap::names`]: crate::options::ColumnMap::names
#[derive(Debug, Clone, Copy)]
pub enum Field {
  Date,
  Admin1,
  Admin2,
  Market,
  Category,
  Commodity,
  Unit,
  PriceType,
  PriceLocal,
  PriceReference,
}

const FIELD_COUNT: usize = 10;

/// Counts of what happened to each raw row. Every row lands in exactly one
/// bucket, so `total` is the sum of the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizeReport {
  pub total:        usize,
  /// HXL hashtag rows (`#date,#adm1+name,...`).
  pub hashtag_rows: usize,
  pub incomplete:   usize,
  pub duplicates:   usize,
  pub malformed:    usize,
  pub kept:         usize,
  /// The first few malformed records, for diagnosis.
  pub malformed_samples: Vec<MalformedRecordError>,
}

#[derive(Debug, Clone, Default)]
pub struct Normalized {
  pub records: Vec<PriceRecord>,
  pub report:  NormalizeReport,
}

/// Normalize `batch`. Only a missing required column is fatal; every
/// per-record problem is counted and the record skipped.
pub fn normalize(batch: &RawBatch, options: &LoadOptions) -> Result<Normalized, LoadError> {
  let names = options.columns.names();
  let index = column_index(&batch.columns, &names)?;

  let mut report = NormalizeReport { total: batch.len(), ..Default::default() };
  let mut seen: HashSet<[&str; FIELD_COUNT]> = HashSet::new();
  let mut records = Vec::with_capacity(batch.len());

  for (i, row) in batch.rows.iter().enumerate() {
    let row_no = i + 1;

    if is_hashtag_row(row, &index) {
      report.hashtag_rows += 1;
      continue;
    }

    let Some(fields) = required_fields(row, &index) else {
      report.incomplete += 1;
      continue;
    };

    if !seen.insert(fields) {
      report.duplicates += 1;
      continue;
    }

    match parse_record(row_no, &fields, &names, &options.date_formats) {
      Ok(record) => records.push(record),
      Err(err) => {
        tracing::debug!(%err, "dropping malformed record");
        report.malformed += 1;
        if report.malformed_samples.len() < options.malformed_sample {
          report.malformed_samples.push(err);
        }
      }
    }
  }

  report.kept = records.len();
  tracing::info!(
    total = report.total,
    kept = report.kept,
    incomplete = report.incomplete,
    duplicates = report.duplicates,
    malformed = report.malformed,
    hashtag_rows = report.hashtag_rows,
    "normalized batch"
  );
  if report.malformed > 0 {
    tracing::warn!(
      malformed = report.malformed,
      sample = ?report.malformed_samples.iter().map(ToString::to_string).collect::<Vec<_>>(),
      "dropped malformed records"
    );
  }

  Ok(Normalized { records, report })
}

/// Map every required field to its column position in the trimmed header.
fn column_index(
  header: &[String],
  names: &[&str; FIELD_COUNT],
) -> Result<[usize; FIELD_COUNT], LoadError> {
  let mut index = [0; FIELD_COUNT];
  for (slot, name) in index.iter_mut().zip(names) {
    *slot = header
      .iter()
      .position(|h| h.trim() == *name)
      .ok_or_else(|| LoadError::MissingColumn { column: (*name).to_owned() })?;
  }
  Ok(index)
}

fn clean(cell: Option<&Option<String>>) -> Option<&str> {
  cell
    .and_then(Option::as_deref)
    .map(str::trim)
    .filter(|s| !s.is_empty())
}

/// HXL tag rows carry a `#` tag in the date column. Other columns may hold
/// legitimate values starting with `#`, so only the date is inspected.
fn is_hashtag_row(row: &[Option<String>], index: &[usize; FIELD_COUNT]) -> bool {
  clean(row.get(index[Field::Date as usize])).is_some_and(|date| date.starts_with('#'))
}

/// Trimmed values of every required field, or `None` if any is missing.
fn required_fields<'a>(
  row: &'a [Option<String>],
  index: &[usize; FIELD_COUNT],
) -> Option<[&'a str; FIELD_COUNT]> {
  let mut fields = [""; FIELD_COUNT];
  for (field, &col) in fields.iter_mut().zip(index) {
    *field = clean(row.get(col))?;
  }
  Some(fields)
}

fn parse_record(
  row: usize,
  fields: &[&str; FIELD_COUNT],
  names: &[&str; FIELD_COUNT],
  date_formats: &[String],
) -> Result<PriceRecord, MalformedRecordError> {
  let get = |f: Field| fields[f as usize];
  let malformed = |reason| MalformedRecordError { row, reason };

  let date = parse_date(get(Field::Date), date_formats).ok_or_else(|| {
    malformed(MalformedReason::BadDate { value: get(Field::Date).to_owned() })
  })?;
  let price = |f: Field| {
    parse_price(get(f)).ok_or_else(|| {
      malformed(MalformedReason::BadPrice {
        column: names[f as usize].to_owned(),
        value:  get(f).to_owned(),
      })
    })
  };
  let price_local = price(Field::PriceLocal)?;
  let price_reference = price(Field::PriceReference)?;

  Ok(PriceRecord {
    row,
    date,
    admin1: get(Field::Admin1).to_owned(),
    admin2: get(Field::Admin2).to_owned(),
    market: get(Field::Market).to_owned(),
    category: get(Field::Category).to_owned(),
    commodity: get(Field::Commodity).to_owned(),
    unit: get(Field::Unit).to_owned(),
    price_type: get(Field::PriceType).to_owned(),
    price_local,
    price_reference,
  })
}

/// Try each format on the whole value, then on the part before a time
/// component (`2023-01-15T00:00:00Z`, `2023-01-15 00:00`).
pub fn parse_date(value: &str, formats: &[String]) -> Option<NaiveDate> {
  let date_part = value.split(['T', ' ']).next().unwrap_or(value);
  [value, date_part].into_iter().find_map(|candidate| {
    formats
      .iter()
      .find_map(|fmt| NaiveDate::parse_from_str(candidate, fmt).ok())
  })
}

fn parse_price(value: &str) -> Option<f64> {
  value.parse::<f64>().ok().filter(|p| p.is_finite())
}
