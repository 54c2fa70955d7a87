//! The six relationship classifiers.
//!
//! Each classifier is a pure query against the [`ReferenceIndex`] for one
//! relationship kind. The queried code's own entry is never part of a result
//! set, and a classifier with no matches returns an empty list.

use crate::domain::{Code, ReferenceEntry, ReferenceIndex, Relationship, code::MIN_CODE_LEN};

/// The deepest generation a child search will fall back to.
const MAX_CHILD_DEPTH: usize = 4;

/// Codes shorter than this cannot have half-siblings: the rule compares the
/// last two characters numerically and requires at least a three-character
/// shared stem.
const HALF_SIBLING_MIN_LEN: usize = 5;

/// Maximum numeric distance (exclusive) between half-sibling suffixes.
const HALF_SIBLING_DISTANCE: i32 = 10;

/// Returns all entries related to `code` by the given kind.
pub(crate) fn related<'a>(
    index: &'a ReferenceIndex,
    code: &'a Code,
    kind: Relationship,
) -> Vec<&'a ReferenceEntry> {
    match kind {
        Relationship::Children => children(index, code),
        Relationship::Siblings => siblings(index, code),
        Relationship::Parents => parents(index, code),
        Relationship::HalfSiblings => half_siblings(index, code),
        Relationship::Cousins => same_prefix(index, code, 3),
        Relationship::ExtendedFamily => same_prefix(index, code, 2),
    }
}

/// Entries extending `code`, restricted to the closest non-empty generation.
///
/// A child one character longer is a better witness than one four characters
/// longer, so generations are tried in order of extra length and only the
/// first non-empty one is returned.
fn children<'a>(index: &'a ReferenceIndex, code: &'a Code) -> Vec<&'a ReferenceEntry> {
    let descendants: Vec<&ReferenceEntry> = index
        .scan_prefix(code.as_str())
        .filter(|entry| entry.code().len() > code.len())
        .collect();

    for extra in 1..=MAX_CHILD_DEPTH {
        let generation: Vec<&ReferenceEntry> = descendants
            .iter()
            .copied()
            .filter(|entry| entry.code().len() == code.len() + extra)
            .collect();
        if !generation.is_empty() {
            return generation;
        }
    }
    Vec::new()
}

/// Entries of the same length as `code` differing only in the last character.
fn siblings<'a>(index: &'a ReferenceIndex, code: &'a Code) -> Vec<&'a ReferenceEntry> {
    index
        .scan_prefix(code.stem())
        .filter(|entry| entry.code().len() == code.len() && entry.code() != code)
        .collect()
}

/// The entry for the longest proper prefix of `code`, if any.
///
/// Truncations are tried from closest (`len - 1`) down to the root
/// granularity; the first hit wins and shorter ancestors are not consulted.
fn parents<'a>(index: &'a ReferenceIndex, code: &Code) -> Vec<&'a ReferenceEntry> {
    for len in (MIN_CODE_LEN..code.len()).rev() {
        if let Some(entry) = index.get(code.prefix(len)) {
            return vec![entry];
        }
    }
    Vec::new()
}

/// Same-length entries sharing all but the last two characters of `code`,
/// where both suffixes are numeric and within [`HALF_SIBLING_DISTANCE`].
///
/// A queried code whose own suffix is not numeric has no half-siblings.
fn half_siblings<'a>(index: &'a ReferenceIndex, code: &'a Code) -> Vec<&'a ReferenceEntry> {
    if code.len() < HALF_SIBLING_MIN_LEN {
        return Vec::new();
    }
    let Some(own_suffix) = numeric_suffix(code) else {
        return Vec::new();
    };

    index
        .scan_prefix(code.prefix(code.len() - 2))
        .filter(|entry| entry.code().len() == code.len() && entry.code() != code)
        .filter(|entry| {
            numeric_suffix(entry.code())
                .is_some_and(|suffix| (suffix - own_suffix).abs() < HALF_SIBLING_DISTANCE)
        })
        .collect()
}

/// Entries sharing the first `len` characters of `code`.
fn same_prefix<'a>(
    index: &'a ReferenceIndex,
    code: &'a Code,
    len: usize,
) -> Vec<&'a ReferenceEntry> {
    index
        .scan_prefix(code.prefix(len))
        .filter(|entry| entry.code() != code)
        .collect()
}

/// The last two characters of `code` as a number, if both are ASCII digits.
fn numeric_suffix(code: &Code) -> Option<i32> {
    let suffix = &code.as_str()[code.len() - 2..];
    if suffix.bytes().all(|b| b.is_ascii_digit()) {
        suffix.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use nonempty::NonEmpty;
    use test_case::test_case;

    use super::*;
    use crate::domain::Category;

    fn entry(code: &str) -> ReferenceEntry {
        let category = Category::try_from("X").unwrap();
        ReferenceEntry::new(
            Code::try_from(code).unwrap(),
            NonEmpty::new(category.clone()),
            category,
        )
        .unwrap()
    }

    fn index(codes: &[&str]) -> ReferenceIndex {
        ReferenceIndex::from_entries(codes.iter().map(|c| entry(c))).unwrap()
    }

    fn related_codes(index: &ReferenceIndex, code: &str, kind: Relationship) -> Vec<String> {
        related(index, &Code::try_from(code).unwrap(), kind)
            .iter()
            .map(|entry| entry.code().to_string())
            .collect()
    }

    #[test]
    fn children_prefer_the_closest_generation() {
        let index = index(&["A01011", "A01012", "A010111", "B200"]);
        let found = related_codes(&index, "A0101", Relationship::Children);
        assert_eq!(found, vec!["A01011", "A01012"]);
    }

    #[test]
    fn children_fall_back_to_deeper_generations() {
        let index = index(&["A010111", "A010112"]);
        let found = related_codes(&index, "A0101", Relationship::Children);
        assert_eq!(found, vec!["A010111", "A010112"]);
    }

    #[test]
    fn children_ignore_descendants_beyond_four_extra_characters() {
        let index = index(&["A0100011"]);
        assert!(related_codes(&index, "A01", Relationship::Children).is_empty());
    }

    #[test]
    fn siblings_share_all_but_the_last_character() {
        let index = index(&["B210", "B220", "B200", "B2001", "C200"]);
        let found = related_codes(&index, "B200", Relationship::Siblings);
        assert_eq!(found, vec!["B210", "B220"]);
    }

    #[test]
    fn parents_use_the_longest_truncation_only() {
        let index = index(&["C880", "C88"]);
        let found = related_codes(&index, "C8808", Relationship::Parents);
        assert_eq!(found, vec!["C880"]);
    }

    #[test]
    fn parents_reach_down_to_three_characters() {
        let index = index(&["C88"]);
        let found = related_codes(&index, "C8808", Relationship::Parents);
        assert_eq!(found, vec!["C88"]);
    }

    #[test]
    fn half_siblings_are_within_numeric_distance() {
        let index = index(&["E1170", "E1172", "E1180", "E117X"]);
        let found = related_codes(&index, "E1165", Relationship::HalfSiblings);
        assert_eq!(found, vec!["E1170", "E1172"]);
    }

    #[test_case("E116"; "shorter than five characters")]
    #[test_case("E11X5"; "non numeric suffix")]
    fn half_siblings_require_numeric_five_character_codes(code: &str) {
        let index = index(&["E1170", "E1172"]);
        assert!(related_codes(&index, code, Relationship::HalfSiblings).is_empty());
    }

    #[test]
    fn cousins_share_the_first_three_characters() {
        let index = index(&["F010", "F0151", "F020", "F01"]);
        let found = related_codes(&index, "F0199", Relationship::Cousins);
        assert_eq!(found, vec!["F01", "F010", "F0151"]);
    }

    #[test]
    fn extended_family_shares_the_first_two_characters() {
        let index = index(&["A970", "A91", "B970"]);
        let found = related_codes(&index, "A990", Relationship::ExtendedFamily);
        assert_eq!(found, vec!["A91", "A970"]);
    }

    #[test]
    fn the_queried_code_is_never_its_own_relative() {
        let index = index(&["F010", "F011"]);
        for kind in Relationship::CLOSE.into_iter().chain(Relationship::DISTANT) {
            assert!(
                !related_codes(&index, "F010", kind).contains(&"F010".to_string()),
                "{kind} returned the queried code"
            );
        }
    }
}
