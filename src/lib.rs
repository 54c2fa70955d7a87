//! Hierarchical diagnosis-code to category mapping.
//!
//! Codes absent from a reference taxonomy table are resolved to category
//! labels by searching progressively wider rings of structurally related
//! codes and checking whether the relatives agree on a classification.

pub mod domain;
pub use domain::{Category, Code, Config, ReferenceEntry, ReferenceIndex, Relationship, Tier};

pub mod resolve;
pub use resolve::{DefaultMap, MappingReport, Resolution, Resolver};

pub mod storage;
pub use storage::{DescriptionMap, ReferenceTable};
