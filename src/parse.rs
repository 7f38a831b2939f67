use tracing::info;

use crate::diagnostics::{CheckedField, Diagnostic, DiagnosticSink};
use crate::error::{MalformedRow, RowFault};
use crate::models::{IngestSummary, StudentRecord};
use crate::workbook::RawRow;

pub const MIN_COLUMNS: usize = 11;
pub const TOLERANCE: f64 = 0.01;

pub fn almost_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < TOLERANCE
}

fn parse_integer(row: usize, field: &'static str, cell: &str) -> Result<i64, MalformedRow> {
    cell.trim().parse().map_err(|_| MalformedRow {
        row,
        fault: RowFault::InvalidInteger {
            field,
            value: cell.to_string(),
        },
    })
}

fn parse_score(row: usize, field: &'static str, cell: &str) -> Result<f64, MalformedRow> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed.parse().map_err(|_| MalformedRow {
        row,
        fault: RowFault::InvalidNumber {
            field,
            value: cell.to_string(),
        },
    })
}

/// Turns one spreadsheet row into a record.
///
/// Subtotal disagreements are reported to `sink` and the record is kept.
pub fn parse_row(
    row: usize,
    cells: &[String],
    sink: &mut dyn DiagnosticSink,
) -> Result<StudentRecord, MalformedRow> {
    if cells.len() < MIN_COLUMNS {
        return Err(MalformedRow {
            row,
            fault: RowFault::TooFewColumns {
                expected: MIN_COLUMNS,
                found: cells.len(),
            },
        });
    }

    let record = StudentRecord {
        serial: parse_integer(row, "Sl No", &cells[0])?,
        class_number: parse_integer(row, "Class No", &cells[1])?,
        employee_id: cells[2].clone(),
        campus_id: cells[3].clone(),
        quiz: parse_score(row, "Quiz", &cells[4])?,
        mid_sem: parse_score(row, "MidSem", &cells[5])?,
        lab_test: parse_score(row, "LabTest", &cells[6])?,
        weekly_labs: parse_score(row, "WeeklyLabs", &cells[7])?,
        pre_compre: parse_score(row, "PreCompre", &cells[8])?,
        compre: parse_score(row, "Compre", &cells[9])?,
        total: parse_score(row, "Total", &cells[10])?,
    };

    let checks = [
        (CheckedField::PreCompre, record.computed_pre_compre(), record.pre_compre),
        (CheckedField::Total, record.computed_total(), record.total),
    ];
    for (field, expected, found) in checks {
        if !almost_equal(expected, found) {
            sink.emit(Diagnostic::Mismatch {
                row,
                field,
                expected,
                found,
            });
        }
    }

    Ok(record)
}

/// Counts mismatches on their way through to the real sink.
struct Tally<'a> {
    inner: &'a mut dyn DiagnosticSink,
    mismatches: usize,
}

impl DiagnosticSink for Tally<'_> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        if matches!(diagnostic, Diagnostic::Mismatch { .. }) {
            self.mismatches += 1;
        }
        self.inner.emit(diagnostic);
    }
}

/// Parses every data row, dropping the ones that cannot become records.
pub fn ingest(
    rows: &[RawRow],
    sink: &mut dyn DiagnosticSink,
) -> (Vec<StudentRecord>, IngestSummary) {
    let mut tally = Tally {
        inner: sink,
        mismatches: 0,
    };
    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;

    for row in rows {
        match parse_row(row.number, &row.cells, &mut tally) {
            Ok(record) => records.push(record),
            Err(err) => {
                skipped += 1;
                tally.emit(Diagnostic::Skipped(err));
            }
        }
    }

    let summary = IngestSummary {
        rows: rows.len(),
        records: records.len(),
        skipped,
        mismatches: tally.mismatches,
    };
    info!(
        rows = summary.rows,
        records = summary.records,
        skipped = summary.skipped,
        mismatches = summary.mismatches,
        "ingested gradebook"
    );

    (records, summary)
}
