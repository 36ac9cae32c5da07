pub mod error;
pub mod process;
pub mod schema;
pub mod sheet;

use anyhow::Result;
use std::path::Path;
use tracing::info;

pub use error::TariffError;
pub use process::{Cell, RawTable, TariffConverter, REQUIRED_COLUMNS};
pub use schema::{Block, Payload, RegionPeriod};

/// Convert `table` and write the payload to `out`.
///
/// Validation runs to completion before `out` is touched, so a rejected
/// table never leaves a file behind.
pub fn export<P: AsRef<Path>>(
    table: &RawTable,
    converter: &TariffConverter,
    out: P,
) -> Result<Payload> {
    let payload = converter.convert(table)?;
    schema::write_payload(&payload, &out)?;
    info!(
        out = %out.as_ref().display(),
        regions = payload.regions.len(),
        version_year = payload.version_year,
        "exported tariffs"
    );
    Ok(payload)
}

/// Read the first worksheet of `input`, convert it and write JSON to `output`.
pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<Payload> {
    let table = sheet::load_first_sheet(input)?;
    export(&table, &TariffConverter::new(), output)
}
