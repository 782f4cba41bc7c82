//! Filter translation
//!
//! Converts provider-agnostic filter expressions into backend predicates:
//! - `translator`: operator enum and the dispatch trait
//! - `milvus`: Milvus boolean expression strings
//! - `memory`: closures used by the in-process provider

pub mod error;
pub mod memory;
pub mod milvus;
pub mod translator;


pub use error::{FilterError, FilterResult};
pub use memory::{MetadataPredicate, MetadataPredicateTranslator};
pub use milvus::MilvusFilterTranslator;
pub use translator::{
    translate_filter, ComparisonOperator, CompoundFilterTranslator, SearchFilterTranslator,
};
