//! Field normalizers for the three noisiest disclosure fields.
//!
//! Each normalizer is a pure function from a raw substring to a
//! [`NormalizationResult`](crate::result::NormalizationResult): it never
//! panics on malformed input and never guesses silently. When a value cannot
//! be resolved with enough confidence the result carries `None` plus notes
//! explaining what was tried.

mod amount;
mod owner;
mod ticker;

pub use amount::normalize_amount;
pub use owner::normalize_owner;
pub use ticker::{detect_asset_type, normalize_ticker};
