//! Heuristic resolver from tabular trading data to MiFIR report fields.
//!
//! Given a [`mifir_model::Dataset`] and the standard field catalog, the
//! resolver proposes a column for each field it can justify, scores the
//! proposal, and explains its reasoning. Nothing here is binding: the
//! output is a draft [`mifir_model::Mapping`] for a human to review.

pub mod engine;
pub mod patterns;
pub mod score;
pub mod sniff;
pub mod types;

pub use engine::MappingResolver;
pub use types::SuggestionSet;
