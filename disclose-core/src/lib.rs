//! disclose-core: canonical vocabularies, normalizers, and reference data
//! for congressional disclosure records.

pub mod amount;
pub mod error;
pub mod matching;
pub mod normalize;
pub mod owner;
pub mod record;
pub mod reference;
pub mod result;

pub use amount::{AmountBracket, AmountValue};
pub use error::ReferenceError;
pub use normalize::{detect_asset_type, normalize_amount, normalize_owner, normalize_ticker};
pub use owner::OwnerType;
pub use record::{
    DraftRecord, ParseStrategy, TradeRecord, TransactionType, split_member_name,
};
pub use reference::{CompanyEntry, KnownBadFix, KnownBadOverride, ReferenceData};
pub use result::{NormalizationMethod, NormalizationResult};
