//! Error types for the whole pipeline. Every error is terminal for the run.
use std::{io, path::PathBuf};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::OrderId;

/// Anything that can stop a run, from argument handling to writing the last order sheet.
#[derive(Debug, Error)]
pub enum SalesError {
    #[error("missing the parameter for the ledger CSV file path")]
    Usage,
    #[error("invalid ledger file path: {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("cannot create output directory {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read ledger: {0}")]
    Parse(#[from] ParseError),
    #[error("cannot write sheet for order '{order}': {source}")]
    Write {
        order: OrderId,
        #[source]
        source: WriteError,
    },
}

impl SalesError {
    /// Process exit status for this failure; each category gets its own.
    pub fn exit_code(&self) -> i32 {
        match self {
            SalesError::Usage => 2,
            SalesError::NotFound { .. } => 3,
            SalesError::Filesystem { .. } => 4,
            SalesError::Parse(_) => 5,
            SalesError::Write { .. } => 6,
        }
    }
}

/// The ledger is not valid tabular data or lacks what is needed to compute totals.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("line {line}: empty value in column '{column}'")]
    EmptyField { line: u64, column: &'static str },
    #[error("line {line}: total price does not fit a decimal")]
    AmountOverflow { line: u64 },
    #[error("grand total of order '{order}' does not fit a decimal")]
    TotalOverflow { order: OrderId },
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("'{0}' cannot be used as a file name")]
    InvalidFileName(String),
    #[error("{0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("amount {0} cannot be stored as a spreadsheet number")]
    Unrepresentable(Decimal),
    #[error("column {0} is past the last spreadsheet column")]
    TooManyColumns(usize),
    #[error("row {0} is past the last spreadsheet row")]
    TooManyRows(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_and_non_zero() {
        let errors = vec![
            SalesError::Usage,
            SalesError::NotFound {
                path: PathBuf::from("missing.csv"),
            },
            SalesError::Filesystem {
                path: PathBuf::from("out"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            },
            SalesError::Parse(ParseError::MissingColumn("ORDER ID")),
            SalesError::Write {
                order: OrderId::new("A1"),
                source: WriteError::InvalidFileName("A1".to_string()),
            },
        ];
        let mut codes: Vec<i32> = errors.iter().map(|e| e.exit_code()).collect();
        assert!(codes.iter().all(|c| *c != 0));
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn diagnostics_name_the_problem() {
        assert_eq!(
            SalesError::Usage.to_string(),
            "missing the parameter for the ledger CSV file path"
        );
        assert_eq!(
            SalesError::Parse(ParseError::MissingColumn("ITEM PRICE")).to_string(),
            "cannot read ledger: missing required column 'ITEM PRICE'"
        );
    }
}
