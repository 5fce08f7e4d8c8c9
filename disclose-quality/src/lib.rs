//! disclose-quality: batch auditing over normalized trade records.
//!
//! Three tools, all pure over their input batch: a streaming quality
//! report ([`report`]), exact and fuzzy near-duplicate detection
//! ([`duplicates`]), and a dry-run bulk repair pass that re-runs the
//! normalizers against grown reference data ([`repair`]).

pub mod duplicates;
pub mod repair;
pub mod report;

pub use duplicates::{
    DUPLICATE_THRESHOLD, DuplicateGroup, DuplicateKind, find_duplicates, pair_similarity,
};
pub use repair::{RecordRepair, RepairPlan, plan_repairs};
pub use report::{QualityReport, QualitySummary};
