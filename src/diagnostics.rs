//! Row-level diagnostics raised while ingesting a gradebook.
//!
//! Parsing never prints. It hands each observation to a [`DiagnosticSink`],
//! which the binary backs with `tracing` and tests back with a `Vec`.

use tracing::warn;

use crate::error::MalformedRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckedField {
    PreCompre,
    Total,
}

impl CheckedField {
    pub fn name(self) -> &'static str {
        match self {
            CheckedField::PreCompre => "PreCompre",
            CheckedField::Total => "total",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Declared subtotal disagrees with the recomputed sum. The record is kept.
    Mismatch {
        row: usize,
        field: CheckedField,
        expected: f64,
        found: f64,
    },
    /// Row dropped from the record list.
    Skipped(MalformedRow),
}

pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Logs every diagnostic as a warning.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::Mismatch {
                row,
                field,
                expected,
                found,
            } => warn!(
                row,
                field = field.name(),
                expected = format_args!("{expected:.2}"),
                found = format_args!("{found:.2}"),
                "Mismatch in {} at row {row}. Expected {expected:.2}, Found {found:.2}",
                field.name()
            ),
            Diagnostic::Skipped(err) => warn!(row = err.row, "Error parsing {err}"),
        }
    }
}
