//! Sheet intake boundary: the upstream facility spreadsheet comes in as
//! CSV with Korean headers and inconsistently spelled values; what leaves
//! this module is a list of canonical [`FacilityRecord`]s plus the rows
//! that could not be salvaged.

mod normalizer;
mod parser;

use std::io::Read;
use std::path::Path;

use crate::workflows::recommendation::domain::FacilityRecord;

/// Row-level defect. Recovered locally: the row is skipped and reported,
/// the rest of the sheet still imports.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("row {row}: field '{field}' is missing or malformed")]
pub struct MalformedRecord {
    pub row: usize,
    pub field: &'static str,
}

/// Import result: every normalizable facility plus per-row issues.
#[derive(Debug)]
pub struct SheetImport {
    pub facilities: Vec<FacilityRecord>,
    pub issues: Vec<MalformedRecord>,
}

#[derive(Debug)]
pub enum SheetImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for SheetImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetImportError::Io(err) => write!(f, "failed to read facility sheet: {}", err),
            SheetImportError::Csv(err) => write!(f, "invalid facility sheet data: {}", err),
        }
    }
}

impl std::error::Error for SheetImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SheetImportError::Io(err) => Some(err),
            SheetImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SheetImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for SheetImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct SheetImporter;

impl SheetImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SheetImport, SheetImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<SheetImport, SheetImportError> {
        let mut facilities = Vec::new();
        let mut issues = Vec::new();

        for (index, row) in parser::parse_rows(reader)?.into_iter().enumerate() {
            // Row numbers are 1-based and count the header line.
            match normalizer::normalize_row(row, index + 2) {
                Ok(record) => facilities.push(record),
                Err(issue) => issues.push(issue),
            }
        }

        Ok(SheetImport { facilities, issues })
    }
}
