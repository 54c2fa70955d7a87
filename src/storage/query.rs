//! Reading the list of codes to map.
//!
//! The query file is a single-column CSV with a header row. This is the
//! normalization boundary: raw values are trimmed and uppercased, blanks are
//! dropped, and the surviving codes are validated, deduplicated, and sorted
//! before the resolver ever sees them.

use std::{collections::BTreeSet, path::Path};

use crate::domain::{Code, Config, code::InvalidCodeError};

use super::{InvalidDelimiterError, clean_cell, delimiter};

/// Reads, normalizes, and validates the query list.
///
/// # Errors
///
/// Returns a [`QueryError`] if the file cannot be read or a non-blank row
/// does not normalize to a valid code.
pub fn read_queries(path: &Path, config: &Config) -> Result<Vec<Code>, QueryError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter(config)?)
        .from_path(path)?;

    let mut codes = BTreeSet::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let Some(raw) = record.get(0).and_then(clean_cell) else {
            continue;
        };
        let code = Code::new(raw.to_ascii_uppercase())
            .map_err(|source| QueryError::InvalidCode {
                line: row + 2,
                source,
            })?;
        codes.insert(code);
    }

    tracing::debug!(codes = codes.len(), "loaded query list");
    Ok(codes.into_iter().collect())
}

/// Errors that can occur when reading the query list.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The configured delimiter is unusable.
    #[error(transparent)]
    Delimiter(#[from] InvalidDelimiterError),

    /// The file could not be read or parsed as CSV.
    #[error("failed to read query file")]
    Csv(#[from] csv::Error),

    /// A row does not normalize to a valid code.
    #[error("query file line {line}: {source}")]
    InvalidCode {
        /// The 1-based line number of the offending row.
        line: usize,
        /// The underlying validation error.
        source: InvalidCodeError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codes.csv");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn normalizes_dedups_and_sorts() {
        let (_dir, path) = write_file("diagnosis_code\nb200\n'A000'\n\n  \nB200\na000\n");
        let codes = read_queries(&path, &Config::default()).unwrap();
        let codes: Vec<&str> = codes.iter().map(Code::as_str).collect();
        assert_eq!(codes, vec!["A000", "B200"]);
    }

    #[test]
    fn invalid_codes_name_their_line() {
        let (_dir, path) = write_file("diagnosis_code\nA000\nB2.0\n");
        let err = read_queries(&path, &Config::default()).unwrap_err();
        match err {
            QueryError::InvalidCode { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn an_empty_list_is_allowed() {
        let (_dir, path) = write_file("diagnosis_code\n");
        assert!(read_queries(&path, &Config::default()).unwrap().is_empty());
    }
}
