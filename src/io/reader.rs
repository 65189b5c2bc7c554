//! Row sources
//!
//! Glue between delegated grid readers and the mapping engine: a CSV byte
//! stream or an XLSX workbook becomes the ordered `Vec<Vec<String>>` row
//! matrix the engine consumes. Format is dispatched on file extension.
//! Rows may have uneven lengths; the engine tolerates rows shorter than
//! the header.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use tracing::debug;

use crate::{Error, Result};

/// Read the row matrix from a file, dispatching on its extension
///
/// `sheet` selects a worksheet by name for workbook formats; `None` takes
/// the first sheet. CSV sources ignore the selector.
pub fn read_rows_from_path(path: &Path, sheet: Option<&str>) -> Result<Vec<Vec<String>>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    debug!("Reading row source: {} ({})", path.display(), extension);

    match extension.as_str() {
        "csv" => {
            let file = File::open(path)
                .map_err(|e| Error::io(format!("failed to open {}", path.display()), e))?;
            read_csv(BufReader::new(file))
        }
        "xlsx" | "xlsm" => {
            let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e| {
                Error::sheet(
                    format!("failed to open workbook {}", path.display()),
                    Some(Box::new(e)),
                )
            })?;
            read_sheet(&mut workbook, sheet)
        }
        other => Err(Error::UnknownFormat {
            extension: other.to_string(),
        }),
    }
}

/// Read all rows from a CSV stream
///
/// Records are allowed to have differing field counts and no row is
/// treated as a header here; header handling belongs to the engine.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Vec<String>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|e| Error::csv("failed to read CSV record", e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Read all rows from an XLSX workbook stream
pub fn read_xlsx<RS: Read + Seek>(reader: RS, sheet: Option<&str>) -> Result<Vec<Vec<String>>> {
    let mut workbook =
        Xlsx::new(reader).map_err(|e| Error::sheet("failed to open workbook", Some(Box::new(e))))?;
    read_sheet(&mut workbook, sheet)
}

/// Extract one worksheet as text rows
fn read_sheet<RS: Read + Seek>(
    workbook: &mut Xlsx<RS>,
    sheet: Option<&str>,
) -> Result<Vec<Vec<String>>> {
    let range = match sheet {
        Some(name) => workbook.worksheet_range(name).map_err(|e| {
            Error::sheet(
                format!("failed to read sheet '{name}'"),
                Some(Box::new(e)),
            )
        })?,
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| Error::sheet("workbook has no sheets", None))?
            .map_err(|e| Error::sheet("failed to read first sheet", Some(Box::new(e))))?,
    };

    let rows = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| cell.as_string().unwrap_or_else(|| cell.to_string()))
                .collect()
        })
        .collect();
    Ok(rows)
}
