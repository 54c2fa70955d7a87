use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::entry::MAX_CATEGORIES;

/// Configuration for reading the reference taxonomy file.
///
/// The published mapping file's delimiter and header names have shifted
/// between releases; the defaults here match the canonical formatted file,
/// and a small TOML file can override them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The CSV delimiter. Must be a single ASCII character.
    pub delimiter: char,

    /// Header names of the reference file's columns.
    pub columns: Columns,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: ',',
            columns: Columns::default(),
        }
    }
}

/// Header names of the reference file's columns.
///
/// Category and description column names are derived: category slots are
/// `{category_prefix}1` through `{category_prefix}6`, and each category
/// column (including the default) has a sibling description column named by
/// appending `description_suffix`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Columns {
    /// The diagnosis-code column.
    pub code: String,

    /// The default-category column.
    pub default: String,

    /// Prefix of the numbered category columns.
    pub category_prefix: String,

    /// Suffix turning a category column name into its description column.
    pub description_suffix: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            code: "icd".to_string(),
            default: "ccsr_def".to_string(),
            category_prefix: "ccsr_".to_string(),
            description_suffix: "_desc".to_string(),
        }
    }
}

impl Columns {
    /// The name of the numbered category column for `slot` (1-based).
    #[must_use]
    pub fn category(&self, slot: usize) -> String {
        format!("{}{slot}", self.category_prefix)
    }

    /// The description column paired with `column`.
    #[must_use]
    pub fn description_of(&self, column: &str) -> String {
        format!("{column}{}", self.description_suffix)
    }

    /// Every column the reference file must carry, in canonical order.
    #[must_use]
    pub fn required(&self) -> Vec<String> {
        let mut columns = vec![
            self.code.clone(),
            self.default.clone(),
            self.description_of(&self.default),
        ];
        for slot in 1..=MAX_CATEGORIES {
            let name = self.category(slot);
            let desc = self.description_of(&name);
            columns.push(name);
            columns.push(desc);
        }
        columns
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// names a non-ASCII delimiter.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&raw)?;
        if !config.delimiter.is_ascii() {
            return Err(ConfigError::Delimiter(config.delimiter));
        }
        Ok(config)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file '{path}'")]
    Io {
        /// The path that could not be read.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML.
    #[error(transparent)]
    Parse(#[from] toml::de::Error),

    /// The configured delimiter cannot be used in a CSV file.
    #[error("delimiter '{0}' is not an ASCII character")]
    Delimiter(char),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_columns() {
        let columns = Columns::default();
        assert_eq!(columns.category(3), "ccsr_3");
        assert_eq!(columns.description_of("ccsr_def"), "ccsr_def_desc");
    }

    #[test]
    fn required_lists_all_fifteen_columns() {
        let required = Columns::default().required();
        assert_eq!(required.len(), 15);
        assert_eq!(required[0], "icd");
        assert_eq!(required[1], "ccsr_def");
        assert_eq!(required[2], "ccsr_def_desc");
        assert_eq!(required[3], "ccsr_1");
        assert_eq!(required[4], "ccsr_1_desc");
        assert_eq!(required[14], "ccsr_6_desc");
    }

    #[test]
    fn parses_overrides() {
        let config: Config = toml::from_str(
            r#"
            delimiter = ";"

            [columns]
            code = "diagnosis_code"
            "#,
        )
        .unwrap();
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.columns.code, "diagnosis_code");
        assert_eq!(config.columns.default, "ccsr_def");
    }
}
