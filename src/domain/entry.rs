use std::collections::BTreeSet;

use nonempty::NonEmpty;

use crate::domain::{Category, Code};

/// The maximum number of category slots a reference entry can carry.
pub const MAX_CATEGORIES: usize = 6;

/// One row of the reference taxonomy table: a code, the categories it maps
/// to, and the single default category among them.
///
/// Category membership is an unordered set — slot order and duplicate slots
/// are insignificant, and the reading layer never materializes empty
/// placeholder slots. The slot order is preserved only so that direct-match
/// reports can echo the table verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    code: Code,
    categories: NonEmpty<Category>,
    default: Category,
}

impl ReferenceEntry {
    /// Creates a reference entry.
    ///
    /// # Errors
    ///
    /// Returns [`TooManyCategoriesError`] if more than [`MAX_CATEGORIES`]
    /// category slots are given.
    pub fn new(
        code: Code,
        categories: NonEmpty<Category>,
        default: Category,
    ) -> Result<Self, TooManyCategoriesError> {
        if categories.len() > MAX_CATEGORIES {
            return Err(TooManyCategoriesError {
                code,
                count: categories.len(),
            });
        }

        Ok(Self {
            code,
            categories,
            default,
        })
    }

    /// The entry's code.
    #[must_use]
    pub const fn code(&self) -> &Code {
        &self.code
    }

    /// The category slots in table order, duplicates included.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// The entry's categories as a deduplicated, ordered set.
    #[must_use]
    pub fn category_set(&self) -> BTreeSet<&Category> {
        self.categories.iter().collect()
    }

    /// Whether the entry maps to the given category.
    #[must_use]
    pub fn has_category(&self, category: &Category) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// The entry's default category.
    #[must_use]
    pub const fn default_category(&self) -> &Category {
        &self.default
    }
}

/// Error returned when an entry is given more category slots than the table
/// format allows.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Entry '{code}' has {count} categories; at most {MAX_CATEGORIES} are allowed")]
pub struct TooManyCategoriesError {
    /// The code of the offending entry.
    pub code: Code,
    /// The number of category slots given.
    pub count: usize,
}
