//! disclose-extract: turns raw disclosure-document text into normalized
//! trade records.
//!
//! The pipeline runs in four stages: line classification into entry blocks
//! ([`classify`]), a descending ladder of extraction strategies
//! ([`strategies`]), an ordered correction cascade over the draft
//! ([`corrections`]), and validation/scoring/assembly into the final record
//! ([`validate`], [`assemble`]). [`document::parse_document`] wires the
//! stages together for one document.

pub mod assemble;
pub mod classify;
pub mod corrections;
pub mod document;
pub mod strategies;
pub mod tokens;
pub mod validate;

pub use assemble::assemble;
pub use classify::{LineTag, RawEntryBlock, TaggedLine, classify_document};
pub use corrections::{CorrectionRule, rules, run_corrections};
pub use document::{DocumentParse, StructuralFailure, parse_document};
pub use strategies::extract_draft;
pub use validate::{confidence_score, populated_core_fields, validate_draft};
