//! Line classifier: segments raw document text into candidate trade-entry
//! blocks.
//!
//! Expected extracted-text shape, owner prefix first:
//!   JT Apple Inc. (AAPL) P 01/27/2023 02/06/2023 $1,001 - $15,000
//!   F S: New
//!   D: Rollover from 401(k)
//!   * For the complete list of asset type abbreviations, ...
//!
//! A line starting with an owner prefix (`SP`, `DC`, `JT`) opens a block;
//! the block runs until the next opener or a section terminator. Lines
//! inside a block are tagged by prefix for the extractor's second pass.

use std::sync::LazyLock;

use regex::Regex;

/// Role of one line inside an entry block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTag {
    /// The structural line that opened the block.
    Entry,
    /// `F S:` filing-status line.
    FilingStatus,
    /// `D:`/`S:` free-text description or subholding line.
    Description,
    /// A line that is nothing but a parenthesized symbol.
    TickerContinuation,
    /// Wrapped overflow from the structural line.
    Continuation,
}

#[derive(Debug, Clone)]
pub struct TaggedLine {
    pub tag: LineTag,
    pub text: String,
}

/// One candidate trade entry: the opening line plus everything up to the
/// next opener or terminator. Ephemeral, consumed within one parse pass.
#[derive(Debug, Clone)]
pub struct RawEntryBlock {
    pub lines: Vec<TaggedLine>,
    /// Zero-based line number of the opening line in the document.
    pub start_line: usize,
}

static OWNER_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)(SP|DC|JT)\b").unwrap());

/// An owner-prefix-less line that still carries the trade shape: a type
/// letter, at least one date, and a dollar figure.
static TRADE_SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\s(?i:P|S|E|S\s*\(partial\))[\s.,]+",
        r"(?:\d{1,2}/\d{1,2}/\d{4}|\d{4}-\d{2}-\d{2})",
        r".*\$",
    ))
    .unwrap()
});

static TERMINATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?ix)^\s*(?:",
        r"\*\s*For\s+the",
        r"|Initial\b",
        r"|I\s+certify\b",
        r"|Certification\b",
        r"|Asset\s*$",
        r")",
    ))
    .unwrap()
});

/// Page furniture repeated by the PDF layout: column headers, page counts.
static FURNITURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?ix)^\s*(?:",
        r"ID\s+Owner\b",
        r"|Owner\s+Asset\b",
        r"|Transaction\s+Type\b",
        r"|Notification\s+Date\b",
        r"|Amount\s*$",
        r"|Page\s+\d+\s+of\s+\d+",
        r"|Filing\s+Status\s*$",
        r")",
    ))
    .unwrap()
});

static FILING_STATUS_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*F(?:\s*S)?\s*:").unwrap());

static DESCRIPTION_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:D|S\s*O?)\s*:").unwrap());

static TICKER_ONLY_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[(\[][A-Za-z][A-Za-z./\-]{0,5}[)\]]\s*$").unwrap());

impl RawEntryBlock {
    /// The structural text the extraction strategies run on: the opening
    /// line plus wrapped continuation overflow, whitespace collapsed.
    pub fn primary_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for line in &self.lines {
            if matches!(line.tag, LineTag::Entry | LineTag::Continuation) {
                parts.push(line.text.trim());
            }
        }
        parts
            .join(" ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn filing_status_lines(&self) -> Vec<&str> {
        self.tagged(LineTag::FilingStatus)
    }

    pub fn description_lines(&self) -> Vec<&str> {
        self.tagged(LineTag::Description)
    }

    pub fn ticker_continuations(&self) -> Vec<&str> {
        self.tagged(LineTag::TickerContinuation)
    }

    fn tagged(&self, tag: LineTag) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| l.tag == tag)
            .map(|l| l.text.trim())
            .collect()
    }
}

fn tag_inner_line(text: &str) -> LineTag {
    if FILING_STATUS_LINE_RE.is_match(text) {
        LineTag::FilingStatus
    } else if DESCRIPTION_LINE_RE.is_match(text) {
        LineTag::Description
    } else if TICKER_ONLY_LINE_RE.is_match(text) {
        LineTag::TickerContinuation
    } else {
        LineTag::Continuation
    }
}

fn opens_block(text: &str) -> bool {
    OWNER_PREFIX_RE.is_match(text) || TRADE_SHAPE_RE.is_match(text)
}

/// Segment one document's extracted text into entry blocks.
///
/// A document with no recognizable entry lines yields an empty list; some
/// filings are certification-only and genuinely carry no trades.
pub fn classify_document(text: &str) -> Vec<RawEntryBlock> {
    let mut blocks: Vec<RawEntryBlock> = Vec::new();
    let mut current: Option<RawEntryBlock> = None;

    for (line_no, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if TERMINATOR_RE.is_match(line) {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            continue;
        }
        if FURNITURE_RE.is_match(line) {
            continue;
        }
        if opens_block(line) {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            current = Some(RawEntryBlock {
                lines: vec![TaggedLine {
                    tag: LineTag::Entry,
                    text: line.to_string(),
                }],
                start_line: line_no,
            });
            continue;
        }
        if let Some(block) = current.as_mut() {
            block.lines.push(TaggedLine {
                tag: tag_inner_line(line),
                text: line.to_string(),
            });
        }
    }
    if let Some(block) = current.take() {
        blocks.push(block);
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_prefix_opens_blocks() {
        let text = "\
JT Apple Inc. (AAPL) P 01/27/2023 02/06/2023 $1,001 - $15,000
F S: New
SP Microsoft Corporation (MSFT) S 03/01/2023 03/05/2023 $15,001 - $50,000
";
        let blocks = classify_document(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines[0].tag, LineTag::Entry);
        assert_eq!(blocks[0].filing_status_lines(), vec!["F S: New"]);
        assert!(blocks[1].primary_text().starts_with("SP Microsoft"));
    }

    #[test]
    fn test_terminator_closes_block() {
        let text = "\
DC Tesla Inc (TSLA) P 05/01/2023 05/03/2023 $1,001 - $15,000
* For the complete list of asset type abbreviations, see instructions
JT stray text that belongs to nothing
";
        let blocks = classify_document(text);
        // The stray JT line opens its own block after the terminator.
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines.len(), 1);
    }

    #[test]
    fn test_certification_only_document_yields_no_blocks() {
        let text = "\
Certification
I certify that the statements I have made on this form are true.
Page 1 of 1
";
        assert!(classify_document(text).is_empty());
    }

    #[test]
    fn test_inner_line_tagging() {
        let text = "\
JT Exxon Mobil Corporation P 02/10/2023 02/14/2023 $50,001 -
$100,000 gfedc
(XOM)
F S: New
D: Dividend reinvestment
";
        let blocks = classify_document(text);
        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert_eq!(block.ticker_continuations(), vec!["(XOM)"]);
        assert_eq!(block.description_lines(), vec!["D: Dividend reinvestment"]);
        assert!(block.primary_text().contains("$50,001 - $100,000 gfedc"));
    }

    #[test]
    fn test_trade_shape_without_owner_prefix_opens_block() {
        let text = "Apple Inc. (AAPL) P 01/27/2023 02/06/2023 $1,001 - $15,000\n";
        let blocks = classify_document(text);
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_furniture_skipped_inside_block() {
        let text = "\
JT NVIDIA Corporation (NVDA) P 06/02/2023 06/05/2023 $15,001 - $50,000
ID Owner Asset Transaction Type Date
Page 2 of 4
F S: New
";
        let blocks = classify_document(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines.len(), 2);
    }
}
