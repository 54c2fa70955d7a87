//! Default-category selection for automatic mappings.
//!
//! The reference table names one default category per entry. When a resolved
//! category set exactly matches an existing entry's set, the mapping inherits
//! that entry's default; otherwise the deciding relatives vote with their own
//! defaults.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{Category, Code, ReferenceIndex};

/// A mapping from a canonical category set to its default category.
///
/// The key is the sorted, deduplicated categories of a reference entry.
/// Built once from the index and passed explicitly to the resolver; never
/// mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultMap {
    map: BTreeMap<Vec<Category>, Category>,
}

impl DefaultMap {
    /// Builds the map from every entry of the index.
    ///
    /// Entries are visited in ascending code order; when two entries share a
    /// category set but disagree on the default, the later (greater) code
    /// wins.
    #[must_use]
    pub fn from_index(index: &ReferenceIndex) -> Self {
        let mut map = BTreeMap::new();
        for entry in index.iter() {
            let key: Vec<Category> = entry.category_set().into_iter().cloned().collect();
            map.insert(key, entry.default_category().clone());
        }
        Self { map }
    }

    /// Looks up the default for a sorted, deduplicated category set.
    #[must_use]
    pub fn get(&self, categories: &[Category]) -> Option<&Category> {
        self.map.get(categories)
    }

    /// Chooses the default category for an automatic mapping.
    ///
    /// In order of preference:
    /// 1. the default of an existing entry with exactly this category set;
    /// 2. the sole category, if the set is a singleton;
    /// 3. the most frequent default among the deciding relatives whose own
    ///    default is a member of the set, ties broken by ascending label;
    /// 4. none.
    pub(crate) fn assign(
        &self,
        categories: &BTreeSet<Category>,
        related: &[Code],
        index: &ReferenceIndex,
    ) -> Option<Category> {
        let key: Vec<Category> = categories.iter().cloned().collect();
        if let Some(default) = self.map.get(key.as_slice()) {
            return Some(default.clone());
        }
        if let [sole] = key.as_slice() {
            return Some(sole.clone());
        }

        let mut counts: BTreeMap<&Category, usize> = BTreeMap::new();
        for code in related {
            let Some(entry) = index.get(code) else {
                continue;
            };
            let default = entry.default_category();
            if categories.contains(default) {
                *counts.entry(default).or_insert(0) += 1;
            }
        }

        // Ascending label order plus a strict comparison keeps the smallest
        // label among equally frequent defaults.
        let mut best: Option<(&Category, usize)> = None;
        for (category, count) in counts {
            if best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((category, count));
            }
        }
        best.map(|(category, _)| category.clone())
    }
}
