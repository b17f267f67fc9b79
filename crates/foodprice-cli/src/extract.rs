//! CSV extract reader.
//!
//! Produces the raw table exactly as written: headers and cells are not
//! trimmed here. Empty cells and cells that are not valid UTF-8 become
//! missing values, so the normalizer drops only the affected record.

use std::{fs::File, io, path::Path};

use anyhow::Context as _;
use foodprice_core::record::RawBatch;

pub fn read_extract(path: &Path) -> anyhow::Result<RawBatch> {
  let file = File::open(path)
    .with_context(|| format!("read-extract stage failed: cannot open {}", path.display()))?;
  let batch = read_csv(file)
    .with_context(|| format!("read-extract stage failed: bad CSV in {}", path.display()))?;
  tracing::info!(path = %path.display(), rows = batch.len(), "read extract");
  Ok(batch)
}

pub fn read_csv<R: io::Read>(reader: R) -> csv::Result<RawBatch> {
  let mut rdr = csv::ReaderBuilder::new()
    .flexible(true) // Tolerate ragged rows; short ones are padded below
    .from_reader(reader);

  let columns = rdr.headers()?.iter().map(str::to_owned).collect();
  let mut batch = RawBatch::new(columns);

  let mut invalid_cells = 0usize;
  for result in rdr.byte_records() {
    let record = result?;
    batch.push_row(
      record
        .iter()
        .map(|raw| match std::str::from_utf8(raw) {
          Ok(v) => (!v.is_empty()).then(|| v.to_owned()),
          Err(_) => {
            invalid_cells += 1;
            None
          }
        })
        .collect(),
    );
  }
  if invalid_cells > 0 {
    tracing::warn!(invalid_cells, "cells with invalid UTF-8 read as missing");
  }
  Ok(batch)
}
