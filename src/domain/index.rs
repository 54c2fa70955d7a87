//! In-memory index over the reference taxonomy table.
//!
//! The [`ReferenceIndex`] knows nothing about files or table formats. It
//! stores entries in a map ordered by code so that exact lookups and prefix
//! scans are both cheap: every relationship rule reduces to "entries whose
//! code starts with some prefix", which an ordered map answers with a range
//! scan instead of a sweep over the whole table.

use std::{collections::BTreeMap, ops::Bound};

use crate::domain::{Code, ReferenceEntry};

/// A read-only index of reference entries, keyed by code.
///
/// Built once per run, then shared immutably — resolution never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceIndex {
    entries: BTreeMap<Code, ReferenceEntry>,
}

impl ReferenceIndex {
    /// Builds an index from reference entries.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateCodeError`] if two entries carry the same code.
    /// The reference table maps each code to exactly one row; a duplicate
    /// means the input was not validated upstream.
    pub fn from_entries(
        entries: impl IntoIterator<Item = ReferenceEntry>,
    ) -> Result<Self, DuplicateCodeError> {
        let mut map = BTreeMap::new();
        for entry in entries {
            let code = entry.code().clone();
            if map.insert(code.clone(), entry).is_some() {
                return Err(DuplicateCodeError(code));
            }
        }
        Ok(Self { entries: map })
    }

    /// Looks up the entry for an exact code, if present.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&ReferenceEntry> {
        self.entries.get(code)
    }

    /// Whether the exact code is present in the table.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    /// The number of entries in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all entries in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = &ReferenceEntry> {
        self.entries.values()
    }

    /// Iterates, in ascending code order, over every entry whose code starts
    /// with `prefix`.
    pub fn scan_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a ReferenceEntry> {
        self.entries
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(code, _)| code.starts_with(prefix))
            .map(|(_, entry)| entry)
    }
}

/// Error returned when two reference entries share a code.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Duplicate code '{0}' in reference table")]
pub struct DuplicateCodeError(pub Code);
