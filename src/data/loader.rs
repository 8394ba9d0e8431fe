use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use crate::data::{EndorsementRecord, EndorsementTable, CANDIDATE_COLUMN, DATE_COLUMN};

// `%Y` also accepts two-digit years, so `%y` must be tried first
const DATE_FORMATS: [&str; 3] = ["%d/%m/%y", "%d/%m/%Y", "%Y-%m-%d"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed opening data file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("delimiter `{0}` is not a single-byte ASCII character")]
    InvalidDelimiter(char),
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("line {line}: missing value for `{column}`")]
    MissingValue { line: u64, column: &'static str },
    #[error("line {line}: unparsable publication date `{raw}`")]
    InvalidDate { line: u64, raw: String },
}

pub fn load_from_path(path: &Path, delimiter: char) -> Result<EndorsementTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let table = load_from_reader(file, delimiter)?;
    info!(
        "loaded {} endorsement records from {}",
        table.len(),
        path.display()
    );
    Ok(table)
}

pub fn load_from_reader<R: Read>(reader: R, delimiter: char) -> Result<EndorsementTable, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter_byte(delimiter)?)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let candidate_idx = column_index(&headers, CANDIDATE_COLUMN)?;
    let date_idx = column_index(&headers, DATE_COLUMN)?;
    debug!("candidate column at {candidate_idx}, date column at {date_idx}");

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let candidate = row.get(candidate_idx).ok_or(LoadError::MissingValue {
            line,
            column: CANDIDATE_COLUMN,
        })?;
        let raw_date = row
            .get(date_idx)
            .map(str::trim)
            .ok_or(LoadError::MissingValue {
                line,
                column: DATE_COLUMN,
            })?;
        let publication_date = parse_day_first(raw_date).ok_or_else(|| LoadError::InvalidDate {
            line,
            raw: raw_date.to_string(),
        })?;
        records.push(EndorsementRecord::new(candidate, publication_date));
    }
    Ok(EndorsementTable::new(records))
}

pub fn parse_day_first(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn column_index(headers: &csv::StringRecord, name: &'static str) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        .ok_or(LoadError::MissingColumn(name))
}

fn delimiter_byte(delimiter: char) -> Result<u8, LoadError> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(LoadError::InvalidDelimiter(delimiter))
}
