//! CSV-backed storage: reading the reference taxonomy and query lists,
//! writing the four report files.
//!
//! All structural validation happens here, before the resolver runs — the
//! resolver itself assumes a well-formed index and normalized codes.

pub mod query;
pub mod reference;
pub mod report;

pub use query::{QueryError, read_queries};
pub use reference::{DescriptionMap, ReferenceError, ReferenceTable, read_reference};
pub use report::{ReportError, write_report};

use crate::domain::Config;

/// The configured delimiter as a CSV byte.
pub(crate) fn delimiter(config: &Config) -> Result<u8, InvalidDelimiterError> {
    u8::try_from(config.delimiter).map_err(|_| InvalidDelimiterError(config.delimiter))
}

/// Error returned when the configured delimiter is not a single ASCII
/// character.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("delimiter '{0}' is not an ASCII character")]
pub struct InvalidDelimiterError(pub char);

/// Normalizes a raw cell: trims whitespace, strips one layer of wrapping
/// single quotes (the published file quotes every value), and treats
/// empty or placeholder content as absent.
pub(crate) fn clean_cell(raw: &str) -> Option<&str> {
    let value = raw.trim();
    let value = value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .unwrap_or(value);
    let value = value.trim();
    if value.is_empty() || value == "NA" || value == "\u{0}" {
        None
    } else {
        Some(value)
    }
}
