//! Agreement scoring over a group of related entries.
//!
//! Aggregation is an explicit category → occurrence-count map: each member
//! contributes each of its categories once, regardless of slot position or
//! duplicate slots.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{Category, ReferenceEntry};

use super::Candidate;

/// The categories present in *every* member of the group.
///
/// Empty when the group agrees on nothing (or when `members` is empty).
pub(crate) fn unanimous(members: &[&ReferenceEntry]) -> BTreeSet<Category> {
    occurrence_counts(members)
        .into_iter()
        .filter(|&(_, count)| count == members.len())
        .map(|(category, _)| category.clone())
        .collect()
}

/// Every category appearing anywhere in the group, with the percentage of
/// members carrying it, sorted by descending percentage then ascending label.
pub(crate) fn candidates(members: &[&ReferenceEntry]) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = occurrence_counts(members)
        .into_iter()
        .map(|(category, count)| Candidate {
            category: category.clone(),
            agreement_pct: percentage(count, members.len()),
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.agreement_pct
            .total_cmp(&a.agreement_pct)
            .then_with(|| a.category.cmp(&b.category))
    });
    candidates
}

fn occurrence_counts<'a>(members: &[&'a ReferenceEntry]) -> BTreeMap<&'a Category, usize> {
    let mut counts = BTreeMap::new();
    for member in members {
        for category in member.category_set() {
            *counts.entry(category).or_insert(0) += 1;
        }
    }
    counts
}

/// `100 * count / total`, rounded to two decimals.
#[allow(clippy::cast_precision_loss)] // group sizes are nowhere near 2^52
fn percentage(count: usize, total: usize) -> f64 {
    let raw = 100.0 * count as f64 / total as f64;
    (raw * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)] // the percentages compared are bit-identical

    use nonempty::NonEmpty;

    use super::*;
    use crate::domain::Code;

    fn entry(code: &str, categories: &[&str]) -> ReferenceEntry {
        let categories = NonEmpty::from_vec(
            categories
                .iter()
                .map(|c| Category::try_from(*c).unwrap())
                .collect(),
        )
        .unwrap();
        let default = categories.head.clone();
        ReferenceEntry::new(Code::try_from(code).unwrap(), categories, default).unwrap()
    }

    fn labels(categories: &BTreeSet<Category>) -> Vec<&str> {
        categories.iter().map(Category::as_str).collect()
    }

    #[test]
    fn unanimous_keeps_only_shared_categories() {
        let a = entry("A01", &["X", "Y"]);
        let b = entry("A02", &["X", "Z"]);
        let agreed = unanimous(&[&a, &b]);
        assert_eq!(labels(&agreed), vec!["X"]);
    }

    #[test]
    fn unanimous_counts_duplicate_slots_once() {
        // A member listing the same category twice must not outvote itself.
        let a = entry("A01", &["X", "X"]);
        let b = entry("A02", &["Y"]);
        assert!(unanimous(&[&a, &b]).is_empty());
    }

    #[test]
    fn unanimous_of_a_single_member_is_its_whole_set() {
        let a = entry("A01", &["X", "Y"]);
        assert_eq!(labels(&unanimous(&[&a])), vec!["X", "Y"]);
    }

    #[test]
    fn unanimous_of_no_members_is_empty() {
        assert!(unanimous(&[]).is_empty());
    }

    #[test]
    fn candidates_are_scored_and_ordered() {
        let a = entry("A01", &["X", "Y"]);
        let b = entry("A02", &["X", "Z"]);
        let c = entry("A03", &["X", "Z"]);
        let candidates = candidates(&[&a, &b, &c]);

        let summary: Vec<(&str, f64)> = candidates
            .iter()
            .map(|c| (c.category.as_str(), c.agreement_pct))
            .collect();
        assert_eq!(
            summary,
            vec![("X", 100.0), ("Z", 66.67), ("Y", 33.33)]
        );
    }

    #[test]
    fn candidate_ties_break_by_ascending_label() {
        let a = entry("A01", &["Y"]);
        let b = entry("A02", &["X"]);
        let candidates = candidates(&[&a, &b]);
        let order: Vec<&str> = candidates.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(order, vec!["X", "Y"]);
    }
}
