//! This bench test simulates mapping a batch of unmapped codes against a
//! reference index shaped like a real taxonomy.

#![allow(missing_docs)]

use criterion::{Criterion, criterion_group, criterion_main};
use kinmap::{Category, Code, ReferenceEntry, ReferenceIndex, Resolver};
use nonempty::NonEmpty;

/// Generates a reference index with three-character stems and a fan of
/// four-character descendants under each.
fn preseed_index() -> ReferenceIndex {
    let mut entries = Vec::new();
    for letter in ['A', 'B', 'C', 'E', 'J'] {
        for stem in 0..100 {
            for suffix in 0..5 {
                let code = Code::try_from(format!("{letter}{stem:02}{suffix}")).unwrap();
                let category = Category::try_from(format!("CAT{:03}", stem % 20)).unwrap();
                entries.push(
                    ReferenceEntry::new(code, NonEmpty::new(category.clone()), category).unwrap(),
                );
            }
        }
    }
    ReferenceIndex::from_entries(entries).unwrap()
}

/// A query mix of sibling-resolvable, parent-resolvable, and unmappable
/// codes.
fn queries() -> Vec<Code> {
    let mut queries = Vec::new();
    for stem in 0..100 {
        queries.push(Code::try_from(format!("A{stem:02}9")).unwrap());
        queries.push(Code::try_from(format!("B{stem:02}317")).unwrap());
        queries.push(Code::try_from(format!("Z{stem:02}0")).unwrap());
    }
    queries
}

fn resolve_codes(c: &mut Criterion) {
    let index = preseed_index();
    let queries = queries();

    c.bench_function("map codes", |b| {
        let resolver = Resolver::new(&index);
        b.iter(|| resolver.map_codes(&queries));
    });
}

criterion_group!(benches, resolve_codes);
criterion_main!(benches);
