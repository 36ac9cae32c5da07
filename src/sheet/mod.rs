// src/sheet/mod.rs
use anyhow::{anyhow, bail, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::process::{Cell, RawTable};

/// Open the workbook at `path` and read its first worksheet.
///
/// The first row of the used range holds the headers; every following
/// non-blank row becomes a data row, numbered as the sheet shows it.
#[instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_first_sheet<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {:?}", path))?;

    let sheet_name = workbook.sheet_names().first().cloned().unwrap_or_default();
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("workbook {:?} has no worksheets", path))?
        .with_context(|| format!("Failed to read worksheet {:?} of {:?}", sheet_name, path))?;

    // calamine positions are 0-based; the sheet shows them 1-based
    let header_row = range.start().map_or(1, |(row, _)| row as usize + 1);
    let table = table_from_rows(range.rows(), header_row)
        .with_context(|| format!("worksheet {:?} of {:?}", sheet_name, path))?;
    info!(
        sheet = %sheet_name,
        columns = table.headers.len(),
        rows = table.rows.len(),
        "loaded worksheet"
    );
    Ok(table)
}

/// Build a [`RawTable`] from sheet rows, the first being the header at `header_row`.
pub fn table_from_rows<'a, I>(rows: I, header_row: usize) -> Result<RawTable>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut rows = rows.into_iter();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|d| d.to_string()).collect(),
        None => bail!("sheet is empty, expected a header row"),
    };

    let mut table = RawTable::new(headers.as_slice());
    for (offset, row) in rows.enumerate() {
        let number = header_row + 1 + offset;
        let cells: Vec<Cell> = row.iter().map(to_cell).collect();
        if cells.iter().all(Cell::is_blank) {
            debug!(row = number, "skipping blank row");
            continue;
        }
        table.push_row_at(number, cells);
    }
    Ok(table)
}

/// Map a calamine cell onto our loosely typed [`Cell`].
pub fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Int(v) => Cell::Int(*v),
        Data::Float(v) => Cell::Float(*v),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or_else(|| Cell::Float(dt.as_f64()), Cell::DateTime),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Error(e.to_string()),
        Data::Empty => Cell::Empty,
    }
}
