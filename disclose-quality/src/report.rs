//! Streaming batch quality report.
//!
//! One [`QualityReport`] observes any number of records (and whole document
//! parses, to count structural skips), then [`QualityReport::finish`] folds
//! the tallies into a [`QualitySummary`] with resolution rates and
//! dashboard-ready recommendation strings.

use std::collections::BTreeMap;

use disclose_core::TradeRecord;
use disclose_extract::DocumentParse;
use disclose_extract::corrections::KNOWN_BAD_RECORD;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Records at or below this confidence are counted for the review queue.
const LOW_CONFIDENCE: f64 = 0.5;
/// Resolution rates below these floors trigger a recommendation.
const TICKER_RATE_FLOOR: f64 = 0.90;
const OWNER_RATE_FLOOR: f64 = 0.95;
const AMOUNT_RATE_FLOOR: f64 = 0.95;
const REVIEW_QUEUE_CEILING: f64 = 0.20;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityReport {
    total: usize,
    ticker_resolved: usize,
    owner_resolved: usize,
    amount_resolved: usize,
    corrected: usize,
    low_confidence: usize,
    structural_failures: usize,
    confidence_sum: f64,
    strategy_counts: BTreeMap<String, usize>,
    rule_counts: BTreeMap<String, usize>,
    /// Unresolved-ticker tallies keyed by the leading word of the asset
    /// description; the biggest bucket is the next dictionary entry to add.
    failure_buckets: BTreeMap<String, usize>,
}

impl QualityReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record into the tallies.
    pub fn observe(&mut self, record: &TradeRecord) {
        self.total += 1;
        self.confidence_sum += record.confidence;
        if record.ticker.is_some() {
            self.ticker_resolved += 1;
        } else {
            let bucket = asset_bucket(&record.asset_description);
            *self.failure_buckets.entry(bucket).or_insert(0) += 1;
        }
        if record.owner.is_some() {
            self.owner_resolved += 1;
        }
        if record.amount.is_some() {
            self.amount_resolved += 1;
        }
        if record.was_corrected() {
            self.corrected += 1;
        }
        if record.confidence <= LOW_CONFIDENCE {
            self.low_confidence += 1;
        }
        *self
            .strategy_counts
            .entry(record.strategy.label().to_string())
            .or_insert(0) += 1;
        for rule in &record.edge_cases_applied {
            *self.rule_counts.entry(rule.clone()).or_insert(0) += 1;
        }
    }

    /// Fold a whole document parse: every record plus its skipped blocks.
    pub fn observe_document(&mut self, parse: &DocumentParse) {
        for record in &parse.records {
            self.observe(record);
        }
        self.structural_failures += parse.skipped.len();
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Close the report and compute rates and recommendations.
    pub fn finish(self) -> QualitySummary {
        let recommendations = recommendations(&self);
        let total = self.total;
        let rate = |n: usize| if total == 0 { 1.0 } else { n as f64 / total as f64 };
        let mean_confidence = if total == 0 {
            0.0
        } else {
            self.confidence_sum / total as f64
        };
        let summary = QualitySummary {
            total,
            structural_failures: self.structural_failures,
            corrected: self.corrected,
            low_confidence: self.low_confidence,
            ticker_rate: rate(self.ticker_resolved),
            owner_rate: rate(self.owner_resolved),
            amount_rate: rate(self.amount_resolved),
            mean_confidence,
            strategy_counts: self.strategy_counts,
            rule_counts: self.rule_counts,
            failure_buckets: self.failure_buckets,
            recommendations,
        };
        info!(
            total = summary.total,
            mean_confidence = summary.mean_confidence,
            "quality report finished"
        );
        summary
    }
}

/// Finished snapshot of a batch audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualitySummary {
    pub total: usize,
    pub structural_failures: usize,
    pub corrected: usize,
    pub low_confidence: usize,
    pub ticker_rate: f64,
    pub owner_rate: f64,
    pub amount_rate: f64,
    pub mean_confidence: f64,
    pub strategy_counts: BTreeMap<String, usize>,
    pub rule_counts: BTreeMap<String, usize>,
    pub failure_buckets: BTreeMap<String, usize>,
    pub recommendations: Vec<String>,
}

fn asset_bucket(asset: &str) -> String {
    asset
        .split_whitespace()
        .next()
        .map(|w| w.to_lowercase())
        .unwrap_or_else(|| "(blank)".to_string())
}

fn recommendations(report: &QualityReport) -> Vec<String> {
    let mut out = Vec::new();
    if report.total == 0 {
        return out;
    }
    let rate = |n: usize| n as f64 / report.total as f64;

    if rate(report.ticker_resolved) < TICKER_RATE_FLOOR {
        let top = report
            .failure_buckets
            .iter()
            .max_by_key(|(_, count)| **count)
            .map(|(bucket, count)| format!(" (top miss: {bucket:?}, {count} records)"))
            .unwrap_or_default();
        out.push(format!(
            "ticker resolution below {:.0}%; extend the company dictionary{top}",
            TICKER_RATE_FLOOR * 100.0
        ));
    }
    if rate(report.owner_resolved) < OWNER_RATE_FLOOR {
        out.push(format!(
            "owner resolution below {:.0}%; review owner synonym table",
            OWNER_RATE_FLOOR * 100.0
        ));
    }
    if rate(report.amount_resolved) < AMOUNT_RATE_FLOOR {
        out.push(format!(
            "amount resolution below {:.0}%; inspect unresolvable amount texts",
            AMOUNT_RATE_FLOOR * 100.0
        ));
    }
    if rate(report.low_confidence) > REVIEW_QUEUE_CEILING {
        out.push(format!(
            "{} of {} records at or below confidence {LOW_CONFIDENCE}; triage the review queue",
            report.low_confidence, report.total
        ));
    }
    if let Some(count) = report.rule_counts.get(KNOWN_BAD_RECORD) {
        out.push(format!(
            "{count} known-bad overrides fired; consider promoting them to general rules"
        ));
    }
    if report.structural_failures > 0 {
        out.push(format!(
            "{} blocks yielded no structure; sample them for a new strategy",
            report.structural_failures
        ));
    }
    out
}
