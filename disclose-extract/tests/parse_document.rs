//! End-to-end pipeline tests over realistic disclosure-document text.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use disclose_core::{ParseStrategy, ReferenceData, TradeRecord, TransactionType};
use disclose_extract::corrections::{KNOWN_BAD_RECORD, NOTIFICATION_DATE_AMOUNT_SHIFT};
use disclose_extract::parse_document;

fn data() -> ReferenceData {
    ReferenceData::curated()
}

fn records(text: &str, doc_id: &str, hint: Option<&str>) -> Vec<TradeRecord> {
    parse_document(text, doc_id, hint, &data()).records
}

const FILING: &str = "\
UNITED STATES HOUSE OF REPRESENTATIVES
Periodic Transaction Report
Filing ID #20018123

Name: McCaul, Michael T.
State/District: TX10

Transactions

ID Owner Asset Transaction Type Date Notification Date Amount
JT Apple Inc. (AAPL) P 01/27/2023 02/06/2023 $1,001 - $15,000
F S: New
JT Chevron Corporation (CVX) P 01/12/2023 $8,000 02/01/2023
SP NVIDIA Corporation (NVDA) S (partial) 03/10/2023 03/14/2023 $15,001 - $50,000
D: Partial sale to cover taxes
DC Pfizer Inc. (PFE) S 04/02/2023 04/06/2023

* For the complete list of assets, see the full filing.
I certify that the statements above are true and correct.
";

#[test]
fn test_full_filing_yields_four_records() {
    let parse = parse_document(FILING, "", None, &data());
    assert_eq!(parse.doc_id, "20018123");
    assert_eq!(parse.member, "McCaul, Michael T.");
    assert_eq!(parse.blocks, 4);
    assert_eq!(parse.records.len(), 4);
    assert!(parse.skipped.is_empty());
    assert_relative_eq!(parse.block_success_rate(), 1.0);
    for record in &parse.records {
        assert_eq!(record.member, "McCaul, Michael T.");
        assert_eq!(record.doc_id, "20018123");
        assert_eq!(record.last_name.as_deref(), Some("McCaul"));
    }
}

#[test]
fn test_clean_line_scores_point_eight_with_no_edge_cases() {
    let records = records(FILING, "", None);
    let apple = &records[0];
    assert_eq!(apple.strategy, ParseStrategy::Standard);
    assert_eq!(apple.ticker.as_deref(), Some("AAPL"));
    assert_eq!(apple.filing_status, "New");
    assert!(apple.edge_cases_applied.is_empty());
    assert_relative_eq!(apple.confidence, 0.8);
    assert!(apple.fully_normalized());
}

#[test]
fn test_shifted_line_is_repaired_by_the_cascade() {
    let records = records(FILING, "", None);
    let chevron = &records[1];
    assert_eq!(chevron.strategy, ParseStrategy::Shifted);
    assert_eq!(
        chevron.edge_cases_applied,
        vec![NOTIFICATION_DATE_AMOUNT_SHIFT.to_string()]
    );
    assert_eq!(
        chevron.transaction_date,
        NaiveDate::from_ymd_opt(2023, 1, 12)
    );
    assert_eq!(
        chevron.notification_date,
        NaiveDate::from_ymd_opt(2023, 2, 1)
    );
    assert!(!chevron.transaction_date_raw.starts_with('$'));
    assert!(!chevron.notification_date_raw.starts_with('$'));
    assert_eq!(chevron.amount_raw, "$8,000");
    assert!(chevron.amount.is_some());
    assert!(chevron.was_corrected());
}

#[test]
fn test_date_parked_in_amount_column_stays_unresolved() {
    let text = "\
Name: Doe, Jane
JT Apple Inc. (AAPL) P 01/12/2023 02/01/2023 03/05/2023
";
    let records = records(text, "20015555", None);
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.strategy, ParseStrategy::Shifted);
    assert_eq!(record.amount, None);
    assert_eq!(record.amount_raw, "03/05/2023");
    assert!(record.parsing_notes.iter().any(|n| n.contains("unresolvable")));
    assert!(!record.fully_normalized());
    assert_relative_eq!(record.confidence, 0.60);
}

#[test]
fn test_partial_sale_type_and_description_continuation() {
    let records = records(FILING, "", None);
    let nvidia = &records[2];
    assert_eq!(nvidia.transaction_type, Some(TransactionType::PartialSale));
    assert_eq!(nvidia.description, "Partial sale to cover taxes");
    assert_eq!(nvidia.ticker.as_deref(), Some("NVDA"));
}

#[test]
fn test_missing_amount_is_kept_but_scored_down() {
    let records = records(FILING, "", None);
    let pfizer = &records[3];
    assert_eq!(pfizer.strategy, ParseStrategy::Partial);
    assert_eq!(pfizer.amount, None);
    assert!(pfizer.parsing_notes.iter().any(|n| n.contains("amount missing")));
    assert!(pfizer.confidence < records[0].confidence);
    assert!(!pfizer.fully_normalized());
}

#[test]
fn test_confidence_orders_by_strategy_quality() {
    let records = records(FILING, "", None);
    assert!(records[0].confidence > records[1].confidence);
    assert!(records[1].confidence > records[3].confidence);
}

#[test]
fn test_certification_only_document_yields_nothing() {
    let text = "\
Periodic Transaction Report
Name: Doe, Jane

I certify that the statements above are true and correct.
Digitally signed.
";
    let parse = parse_document(text, "20010000", None, &data());
    assert_eq!(parse.blocks, 0);
    assert!(parse.records.is_empty());
    assert!(parse.skipped.is_empty());
    assert_relative_eq!(parse.block_success_rate(), 1.0);
}

#[test]
fn test_structureless_block_is_skipped_with_diagnostic() {
    let text = "\
Name: Doe, Jane
JT handwritten note about an asset with no dates at all
JT Apple Inc. (AAPL) P 01/27/2023 02/06/2023 $1,001 - $15,000
";
    let parse = parse_document(text, "20014444", None, &data());
    assert_eq!(parse.blocks, 2);
    assert_eq!(parse.records.len(), 1);
    assert_eq!(parse.skipped.len(), 1);
    let skip = &parse.skipped[0];
    assert_eq!(skip.start_line, 1);
    assert!(skip.text.contains("handwritten note"));
    assert_eq!(skip.reason, "no strategy recovered structure");
    assert_relative_eq!(parse.block_success_rate(), 0.5);
}

#[test]
fn test_unresolvable_member_is_noted_per_record() {
    let text = "JT Apple Inc. (AAPL) P 01/27/2023 02/06/2023 $1,001 - $15,000\n";
    let parse = parse_document(text, "20012222", None, &data());
    assert_eq!(parse.member, "");
    assert_eq!(parse.records.len(), 1);
    assert_eq!(parse.records[0].member, "");
    assert_eq!(parse.records[0].first_name, None);
    assert!(
        parse.records[0]
            .parsing_notes
            .iter()
            .any(|n| n.contains("member name could not be resolved"))
    );
}

#[test]
fn test_member_hint_overrides_document_headers() {
    let records = records(FILING, "", Some("Pelosi, Nancy"));
    assert_eq!(records[0].member, "Pelosi, Nancy");
    assert_eq!(records[0].first_name.as_deref(), Some("Nancy"));
}

#[test]
fn test_known_bad_override_fires_end_to_end() {
    let text = "\
Name: Doe, Jane
JT Facebook, Inc. Class A (FB) P 01/05/2022 01/08/2022 $15,001 - $50,000
";
    let records = records(text, "20019637", None);
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.ticker.as_deref(), Some("META"));
    assert_eq!(record.asset_description, "Meta Platforms, Inc. - Class A");
    assert!(
        record
            .edge_cases_applied
            .contains(&KNOWN_BAD_RECORD.to_string())
    );
    assert!(
        record
            .parsing_notes
            .iter()
            .any(|n| n.contains("manually curated override"))
    );
}
