//! Reading the reference taxonomy file.
//!
//! The reference file is a delimited table with one row per code: the code,
//! its default category (plus description), and up to six category slots
//! (each plus description). Validation happens here, up front: missing
//! columns, malformed codes, and duplicate rows are reported before any
//! resolution work starts.

use std::{collections::BTreeMap, path::Path};

use nonempty::NonEmpty;

use crate::domain::{
    Category, Code, Columns, Config, ReferenceEntry, ReferenceIndex,
    category::InvalidCategoryError, code::InvalidCodeError, entry::MAX_CATEGORIES,
    entry::TooManyCategoriesError, index::DuplicateCodeError,
};

use super::{InvalidDelimiterError, clean_cell, delimiter};

/// The loaded reference file: the index the resolver works against, plus
/// the category descriptions used when writing reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTable {
    /// Index over all reference entries.
    pub index: ReferenceIndex,
    /// Human-readable description per category.
    pub descriptions: DescriptionMap,
}

/// A mapping from category label to its human-readable description.
///
/// Built from the reference file's description columns; purely a reporting
/// concern. A category mentioned with conflicting descriptions keeps the
/// last one read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionMap {
    map: BTreeMap<Category, String>,
}

impl DescriptionMap {
    /// The description for a category, if the reference file carried one.
    #[must_use]
    pub fn get(&self, category: &Category) -> Option<&str> {
        self.map.get(category).map(String::as_str)
    }

    /// The number of described categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no category has a description.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub(crate) fn insert(&mut self, category: &Category, description: Option<&str>) {
        if let Some(description) = description {
            self.map.insert(category.clone(), description.to_string());
        }
    }
}

/// Reads and validates the reference file.
///
/// Codes are uppercased on ingest; category labels are taken verbatim.
/// Blank and placeholder cells are treated as absent slots.
///
/// # Errors
///
/// Returns a [`ReferenceError`] naming the missing columns, the offending
/// line, or the duplicated code when the file is not structurally valid.
pub fn read_reference(path: &Path, config: &Config) -> Result<ReferenceTable, ReferenceError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter(config)?)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let layout = Layout::locate(&headers, &config.columns)?;

    let mut entries = Vec::new();
    let mut descriptions = DescriptionMap::default();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let line = row + 2; // line 1 is the header
        entries.push(layout.parse_row(&record, &mut descriptions, line)?);
    }

    let index = ReferenceIndex::from_entries(entries)?;
    if index.is_empty() {
        return Err(ReferenceError::Empty);
    }

    tracing::debug!(
        entries = index.len(),
        categories = descriptions.len(),
        "loaded reference table"
    );

    Ok(ReferenceTable {
        index,
        descriptions,
    })
}

/// Positions of the required columns within the header row.
struct Layout {
    code: usize,
    default: usize,
    default_desc: usize,
    categories: Vec<(usize, usize)>,
}

impl Layout {
    fn locate(headers: &csv::StringRecord, columns: &Columns) -> Result<Self, ReferenceError> {
        let find = |name: &str| headers.iter().position(|header| header.trim() == name);

        let mut missing = Vec::new();
        let mut require = |name: String| {
            let position = find(&name);
            if position.is_none() {
                missing.push(name);
            }
            position.unwrap_or_default()
        };

        let code = require(columns.code.clone());
        let default = require(columns.default.clone());
        let default_desc = require(columns.description_of(&columns.default));
        let categories: Vec<(usize, usize)> = (1..=MAX_CATEGORIES)
            .map(|slot| {
                let name = columns.category(slot);
                let desc = columns.description_of(&name);
                (require(name), require(desc))
            })
            .collect();

        if missing.is_empty() {
            Ok(Self {
                code,
                default,
                default_desc,
                categories,
            })
        } else {
            Err(ReferenceError::MissingColumns(missing))
        }
    }

    fn parse_row(
        &self,
        record: &csv::StringRecord,
        descriptions: &mut DescriptionMap,
        line: usize,
    ) -> Result<ReferenceEntry, ReferenceError> {
        let raw_code = cell(record, self.code).ok_or(ReferenceError::MissingCode { line })?;
        let code = Code::new(raw_code.to_ascii_uppercase())
            .map_err(|source| ReferenceError::InvalidCode { line, source })?;

        let parse_category = |raw: &str| {
            Category::new(raw.to_string())
                .map_err(|source| ReferenceError::InvalidCategory { line, source })
        };

        let default = cell(record, self.default)
            .ok_or_else(|| ReferenceError::MissingDefault {
                line,
                code: code.clone(),
            })
            .and_then(parse_category)?;
        descriptions.insert(&default, cell(record, self.default_desc));

        let mut categories = Vec::new();
        for &(value, desc) in &self.categories {
            let Some(raw) = cell(record, value) else {
                continue;
            };
            let category = parse_category(raw)?;
            descriptions.insert(&category, cell(record, desc));
            categories.push(category);
        }

        let categories = NonEmpty::from_vec(categories).ok_or(ReferenceError::NoCategories {
            line,
            code: code.clone(),
        })?;

        Ok(ReferenceEntry::new(code, categories, default)?)
    }
}

fn cell(record: &csv::StringRecord, index: usize) -> Option<&str> {
    record.get(index).and_then(clean_cell)
}

/// Errors that can occur when reading the reference file.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    /// The configured delimiter is unusable.
    #[error(transparent)]
    Delimiter(#[from] InvalidDelimiterError),

    /// The file could not be read or parsed as CSV.
    #[error("failed to read reference file")]
    Csv(#[from] csv::Error),

    /// Required columns are absent from the header row.
    #[error("reference file is missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A row has no code.
    #[error("reference file line {line}: missing code")]
    MissingCode {
        /// The 1-based line number of the offending row.
        line: usize,
    },

    /// A row's code is malformed.
    #[error("reference file line {line}: {source}")]
    InvalidCode {
        /// The 1-based line number of the offending row.
        line: usize,
        /// The underlying validation error.
        source: InvalidCodeError,
    },

    /// A row carries a malformed category label.
    #[error("reference file line {line}: {source}")]
    InvalidCategory {
        /// The 1-based line number of the offending row.
        line: usize,
        /// The underlying validation error.
        source: InvalidCategoryError,
    },

    /// A row has no default category.
    #[error("reference file line {line}: entry '{code}' has no default category")]
    MissingDefault {
        /// The 1-based line number of the offending row.
        line: usize,
        /// The code of the offending entry.
        code: Code,
    },

    /// A row has a code but no category slots.
    #[error("reference file line {line}: entry '{code}' has no categories")]
    NoCategories {
        /// The 1-based line number of the offending row.
        line: usize,
        /// The code of the offending entry.
        code: Code,
    },

    /// A row carries more category slots than the format allows.
    #[error(transparent)]
    TooManyCategories(#[from] TooManyCategoriesError),

    /// Two rows share a code.
    #[error(transparent)]
    Duplicate(#[from] DuplicateCodeError),

    /// The file parsed but contains no entries.
    #[error("reference file has no entries")]
    Empty,
}
