//! Tiered relationship resolution.
//!
//! For each queried code absent from the reference table, the resolver walks
//! two tiers of relationship kinds — close (children, siblings, parents),
//! then distant (half-siblings, cousins, extended family) — and classifies
//! the code from the first group of relatives that agrees on a category set.
//!
//! Resolution is purely functional per code: it reads only the immutable
//! [`ReferenceIndex`] and [`DefaultMap`], so the per-code loop fans out
//! across a thread pool and still produces byte-identical, sorted output.

use std::collections::BTreeSet;

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::instrument;

use crate::domain::{Category, Code, ReferenceEntry, ReferenceIndex, Relationship, Tier};

mod consensus;
mod defaults;
mod relations;

pub use defaults::DefaultMap;

/// One candidate category of a semi-automatic mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// The candidate category.
    pub category: Category,
    /// Percentage of the deciding group's members carrying the category,
    /// rounded to two decimals.
    pub agreement_pct: f64,
}

/// An automatically inferred mapping: some relative group unanimously agreed
/// on a non-empty category set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automatic {
    /// The categories shared by every member of the deciding group.
    pub categories: BTreeSet<Category>,
    /// The relationship kind whose group produced the agreement.
    pub deciding: Relationship,
    /// The codes of the deciding group's members.
    pub related: Vec<Code>,
    /// The resolved default category, when one could be chosen.
    pub default: Option<Category>,
}

/// An ambiguous mapping: relatives were found, but no category is shared by
/// all of them. Each candidate needs human review.
#[derive(Debug, Clone, PartialEq)]
pub struct SemiAutomatic {
    /// The tier whose relatives produced the candidates.
    pub tier: Tier,
    /// Candidate categories, sorted by descending agreement percentage, ties
    /// by ascending label.
    pub candidates: Vec<Candidate>,
}

/// The terminal classification of one queried code.
///
/// Every queried code reaches exactly one of these; direct matches are split
/// off before resolution and never reach the resolver.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Relatives unanimously agreed on at least one category.
    Automatic(Automatic),
    /// Relatives were found but disagree; candidates need review.
    SemiAutomatic(SemiAutomatic),
    /// No relatives of any kind exist in the reference table.
    Failed,
}

/// An automatic mapping paired with the code it resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomaticMapping {
    /// The queried code.
    pub code: Code,
    /// The inferred mapping.
    pub mapping: Automatic,
}

/// A semi-automatic mapping paired with the code it resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct SemiAutomaticMapping {
    /// The queried code.
    pub code: Code,
    /// The candidate categories.
    pub mapping: SemiAutomatic,
}

/// The outcome of mapping a full query list: four collections, each sorted
/// by queried code, together covering every input code exactly once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingReport {
    /// Entries for codes found verbatim in the reference table.
    pub direct: Vec<ReferenceEntry>,
    /// Codes resolved by unanimous relatives.
    pub automatic: Vec<AutomaticMapping>,
    /// Codes with disagreeing relatives, needing review.
    pub semiautomatic: Vec<SemiAutomaticMapping>,
    /// Codes with no relatives at all.
    pub failed: Vec<Code>,
}

impl MappingReport {
    /// The number of queried codes across all four collections.
    #[must_use]
    pub fn total(&self) -> usize {
        self.direct.len() + self.automatic.len() + self.semiautomatic.len() + self.failed.len()
    }
}

/// Resolves unmapped codes against a reference index.
#[derive(Debug)]
pub struct Resolver<'a> {
    index: &'a ReferenceIndex,
    defaults: DefaultMap,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver, deriving the [`DefaultMap`] from the index.
    #[must_use]
    pub fn new(index: &'a ReferenceIndex) -> Self {
        Self::with_defaults(index, DefaultMap::from_index(index))
    }

    /// Creates a resolver with a pre-built [`DefaultMap`].
    #[must_use]
    pub const fn with_defaults(index: &'a ReferenceIndex, defaults: DefaultMap) -> Self {
        Self { index, defaults }
    }

    /// Maps a query list into the four report collections.
    ///
    /// Codes present in the reference table are reported as direct matches;
    /// the rest are resolved in parallel. Output order is deterministic
    /// regardless of thread scheduling.
    #[must_use]
    pub fn map_codes(&self, codes: &[Code]) -> MappingReport {
        self.map_codes_with(codes, || {})
    }

    /// Like [`Self::map_codes`], invoking `tick` once per queried code as its
    /// classification is determined (for progress reporting).
    #[must_use]
    #[instrument(skip_all, fields(queries = codes.len(), reference = self.index.len()))]
    pub fn map_codes_with(
        &self,
        codes: &[Code],
        tick: impl Fn() + Send + Sync,
    ) -> MappingReport {
        let mut direct = Vec::new();
        let mut unmapped: Vec<&Code> = Vec::new();
        for code in codes {
            if let Some(entry) = self.index.get(code) {
                direct.push(entry.clone());
                tick();
            } else {
                unmapped.push(code);
            }
        }
        direct.sort_by(|a, b| a.code().cmp(b.code()));

        let resolutions: Vec<(Code, Resolution)> = unmapped
            .par_iter()
            .map(|&code| {
                let resolution = self.resolve(code);
                tick();
                (code.clone(), resolution)
            })
            .collect();

        let mut automatic = Vec::new();
        let mut semiautomatic = Vec::new();
        let mut failed = Vec::new();
        for (code, resolution) in resolutions {
            match resolution {
                Resolution::Automatic(mapping) => automatic.push(AutomaticMapping { code, mapping }),
                Resolution::SemiAutomatic(mapping) => {
                    semiautomatic.push(SemiAutomaticMapping { code, mapping });
                }
                Resolution::Failed => failed.push(code),
            }
        }
        automatic.sort_by(|a, b| a.code.cmp(&b.code));
        semiautomatic.sort_by(|a, b| a.code.cmp(&b.code));
        failed.sort();

        tracing::debug!(
            direct = direct.len(),
            automatic = automatic.len(),
            semiautomatic = semiautomatic.len(),
            failed = failed.len(),
            "classified queries"
        );

        MappingReport {
            direct,
            automatic,
            semiautomatic,
            failed,
        }
    }

    /// Resolves a single code assumed to be absent from the reference table.
    ///
    /// The close tier accumulates every evaluated group into a pool, so a
    /// close tier that finds relatives always terminates here — either with
    /// the first unanimous group, or with candidates scored over the whole
    /// pool. The distant tier instead commits to its first non-empty kind:
    /// looser relatives are only consulted when nothing closer exists, and
    /// never mixed.
    #[must_use]
    pub fn resolve(&self, code: &Code) -> Resolution {
        let mut pool: Vec<&ReferenceEntry> = Vec::new();
        for kind in Relationship::CLOSE {
            let members = relations::related(self.index, code, kind);
            if members.is_empty() {
                continue;
            }
            let agreed = consensus::unanimous(&members);
            if !agreed.is_empty() {
                return self.automatic(kind, &members, agreed);
            }
            pool.extend(members);
        }
        if !pool.is_empty() {
            return Resolution::SemiAutomatic(SemiAutomatic {
                tier: Tier::Close,
                candidates: consensus::candidates(&pool),
            });
        }

        for kind in Relationship::DISTANT {
            let members = relations::related(self.index, code, kind);
            if members.is_empty() {
                continue;
            }
            let agreed = consensus::unanimous(&members);
            if agreed.is_empty() {
                return Resolution::SemiAutomatic(SemiAutomatic {
                    tier: Tier::Distant,
                    candidates: consensus::candidates(&members),
                });
            }
            return self.automatic(kind, &members, agreed);
        }

        Resolution::Failed
    }

    fn automatic(
        &self,
        deciding: Relationship,
        members: &[&ReferenceEntry],
        categories: BTreeSet<Category>,
    ) -> Resolution {
        let related: Vec<Code> = members.iter().map(|entry| entry.code().clone()).collect();
        let default = self.defaults.assign(&categories, &related, self.index);
        Resolution::Automatic(Automatic {
            categories,
            deciding,
            related,
            default,
        })
    }
}
