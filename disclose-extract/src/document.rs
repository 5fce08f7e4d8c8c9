//! Whole-document pipeline: classify lines into entry blocks, extract a
//! draft per block, run the correction cascade, assemble.
//!
//! The pipeline is infallible by contract: malformed documents yield fewer
//! (or zero) records, never an error. Document-level context (member name,
//! filing id) is resolved once, before the per-block loop.

use std::sync::LazyLock;

use disclose_core::{ReferenceData, TradeRecord};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::assemble::assemble;
use crate::classify::classify_document;
use crate::corrections::run_corrections;
use crate::strategies::extract_draft;

/// Diagnostic for one entry block that yielded no record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StructuralFailure {
    /// Zero-based line where the block opened.
    pub start_line: usize,
    /// The structural text the strategies ran on.
    pub text: String,
    pub reason: String,
}

/// Everything one document produced: records, per-block skip diagnostics,
/// and counts for batch reporting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentParse {
    pub doc_id: String,
    /// Resolved member name; empty when no hint or header matched.
    pub member: String,
    pub blocks: usize,
    pub records: Vec<TradeRecord>,
    pub skipped: Vec<StructuralFailure>,
}

impl DocumentParse {
    /// Fraction of entry blocks that became records. A document with no
    /// blocks counts as fully successful.
    pub fn block_success_rate(&self) -> f64 {
        if self.blocks == 0 {
            return 1.0;
        }
        self.records.len() as f64 / self.blocks as f64
    }
}

static NAME_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*Name:\s*(?P<name>\S.*?)\s*$").unwrap());

static HONORIFIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\s*(?:The\s+)?(?:Hon\.?|Rep\.?|Sen\.?)\s+(?P<name>[A-Z][A-Za-z.'\-]*(?:\s+[A-Z][A-Za-z.'\-]*)+)\s*$",
    )
    .unwrap()
});

static FILING_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Filing\s+ID\s*#?\s*(?P<id>\d+)").unwrap());

/// Member name for the whole document: an explicit hint wins, then a
/// `Name:` header line, then an honorific line near the top.
fn resolve_member(text: &str, hint: Option<&str>) -> Option<String> {
    if let Some(hint) = hint {
        let hint = hint.trim();
        if !hint.is_empty() {
            return Some(hint.to_string());
        }
    }
    if let Some(caps) = NAME_HEADER_RE.captures(text) {
        return Some(caps["name"].trim().to_string());
    }
    HONORIFIC_RE
        .captures(text)
        .map(|caps| caps["name"].trim().to_string())
}

/// Document id: the caller's id wins; otherwise scan for a `Filing ID #`
/// marker in the text.
fn resolve_doc_id(text: &str, given: &str) -> String {
    let given = given.trim();
    if !given.is_empty() {
        return given.to_string();
    }
    FILING_ID_RE
        .captures(text)
        .map(|caps| caps["id"].to_string())
        .unwrap_or_default()
}

/// Extract every trade record from one disclosure document's text.
///
/// Infallible by contract: malformed documents yield fewer (or zero)
/// records plus skip diagnostics, never an error.
pub fn parse_document(
    text: &str,
    doc_id: &str,
    member_hint: Option<&str>,
    data: &ReferenceData,
) -> DocumentParse {
    let member = resolve_member(text, member_hint);
    let doc_id = resolve_doc_id(text, doc_id);

    let blocks = classify_document(text);
    let mut parse = DocumentParse {
        doc_id: doc_id.clone(),
        member: member.clone().unwrap_or_default(),
        blocks: blocks.len(),
        ..DocumentParse::default()
    };
    if blocks.is_empty() {
        debug!(doc_id = %doc_id, "no entry blocks found");
        return parse;
    }
    info!(doc_id = %doc_id, blocks = blocks.len(), "extracting trade entries");

    for block in &blocks {
        let Some((mut draft, strategy)) = extract_draft(block) else {
            warn!(
                doc_id = %doc_id,
                start_line = block.start_line,
                "no strategy recovered structure from block"
            );
            parse.skipped.push(StructuralFailure {
                start_line: block.start_line,
                text: block.primary_text(),
                reason: "no strategy recovered structure".to_string(),
            });
            continue;
        };
        draft.doc_id = doc_id.clone();
        match &member {
            Some(name) => draft.member = name.clone(),
            None => draft.push_note("member name could not be resolved"),
        }

        let (corrected, applied) = run_corrections(draft, data);
        match assemble(corrected, strategy, applied, data) {
            Some(record) => parse.records.push(record),
            None => {
                warn!(
                    doc_id = %doc_id,
                    start_line = block.start_line,
                    "block produced an empty record shell"
                );
                parse.skipped.push(StructuralFailure {
                    start_line: block.start_line,
                    text: block.primary_text(),
                    reason: "all required fields empty".to_string(),
                });
            }
        }
    }

    info!(
        doc_id = %doc_id,
        records = parse.records.len(),
        skipped = parse.skipped.len(),
        "document extraction finished"
    );
    parse
}
