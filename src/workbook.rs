use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::debug;

use crate::error::FileError;

/// One data row as cell text, numbered the way a spreadsheet numbers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub number: usize,
    pub cells: Vec<String>,
}

impl RawRow {
    pub fn new(number: usize, mut cells: Vec<String>) -> Self {
        while cells.last().is_some_and(|cell| cell.is_empty()) {
            cells.pop();
        }
        Self { number, cells }
    }
}

fn cell_text(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::Error(e) => format!("#ERROR: {e:?}"),
    }
}

/// Reads every row after the header from the first sheet of `path`.
///
/// `.csv` files go through the csv reader; anything else is handed to
/// calamine, which sniffs xlsx, xls, xlsb and ods.
pub fn read_data_rows(path: &Path) -> Result<Vec<RawRow>, FileError> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let rows = if is_csv {
        read_csv_rows(path)?
    } else {
        read_sheet_rows(path)?
    };

    debug!(path = %path.display(), rows = rows.len(), "read data rows");
    Ok(rows)
}

fn read_sheet_rows(path: &Path) -> Result<Vec<RawRow>, FileError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| FileError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| FileError::NoSheets {
            path: path.to_path_buf(),
        })?
        .map_err(|source| FileError::Sheet {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(range_rows(&range))
}

/// Flattens a used range back onto sheet coordinates; row 1 is the header.
fn range_rows(range: &Range<Data>) -> Vec<RawRow> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    range
        .rows()
        .enumerate()
        .filter_map(|(offset, row)| {
            let number = start_row as usize + offset + 1;
            if number == 1 {
                return None;
            }
            let cells = std::iter::repeat(String::new())
                .take(start_col as usize)
                .chain(row.iter().map(cell_text))
                .collect();
            Some(RawRow::new(number, cells))
        })
        .collect()
}

fn read_csv_rows(path: &Path) -> Result<Vec<RawRow>, FileError> {
    let csv_error = |source| FileError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    // csv skips blank lines, so numbering comes from the record's line
    let mut rows = Vec::new();
    for (index, result) in reader.byte_records().enumerate() {
        let record = result.map_err(csv_error)?;
        let number = record
            .position()
            .map_or(index + 1, |position| position.line() as usize);
        if number == 1 {
            continue;
        }
        rows.push(RawRow::new(
            number,
            record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect(),
        ));
    }

    Ok(rows)
}
