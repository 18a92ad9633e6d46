//! End-to-end checks over the public API: records in, export text out.

use asr_export::access::{Action, Resource, Role, User, has_permission};
use asr_export::export::{ExportContext, ExportFormat, export, export_json};
use asr_export::extract::{CSV_HEADERS, ExtractOptions, extract_all};
use asr_export::filter::{FilterCriteria, QuickFilter, filter};
use asr_export::formatter::encode_csv;
use asr_export::model::{Classification, DocumentRecord, PaymentStatus, unwrap_records};
use chrono::NaiveDate;

fn record(filename: &str, vendor: Option<&str>, gl: Option<&str>) -> DocumentRecord {
    DocumentRecord {
        filename: Some(filename.to_string()),
        classification: Some(Classification {
            vendor_name: vendor.map(String::from),
            gl_account_code: gl.map(String::from),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn with_payment(filename: &str, status: PaymentStatus) -> DocumentRecord {
    DocumentRecord {
        filename: Some(filename.to_string()),
        classification: Some(Classification {
            payment_status: Some(status),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn parse_csv(text: &str) -> Vec<csv::StringRecord> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(text.as_bytes())
        .records()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn csv_for(records: &[DocumentRecord]) -> String {
    let refs: Vec<&DocumentRecord> = records.iter().collect();
    let rows = extract_all(&refs, &ExtractOptions::default());
    encode_csv(&rows, &CSV_HEADERS)
}

fn run_date() -> ExportContext {
    ExportContext::on(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap())
}

#[test]
fn csv_has_header_plus_one_row_per_record() {
    for n in [0usize, 1, 2, 7] {
        let records: Vec<DocumentRecord> = (0..n)
            .map(|i| record(&format!("doc-{i}.pdf"), Some("Vendor, Ltd"), None))
            .collect();
        let parsed = parse_csv(&csv_for(&records));
        assert_eq!(parsed.len(), n + 1, "for {n} records");
        assert_eq!(parsed[0].iter().collect::<Vec<_>>(), CSV_HEADERS.to_vec());
    }
}

#[test]
fn csv_round_trips_commas_and_quotes() {
    let records = vec![
        record("scan.pdf", Some("ACME, Inc."), Some("6100")),
        record("the \"final\" invoice.pdf", Some("Globex"), None),
        record("notes.pdf", Some("line one\nline two"), None),
    ];
    let parsed = parse_csv(&csv_for(&records));

    assert_eq!(&parsed[1][1], "ACME, Inc.");
    assert_eq!(&parsed[1][4], "6100");
    assert_eq!(&parsed[2][0], "the \"final\" invoice.pdf");
    assert_eq!(&parsed[3][1], "line one\nline two");
}

#[test]
fn missing_fields_take_defaults() {
    let bare = DocumentRecord::default();
    let partial = DocumentRecord {
        original_filename: Some("upload.png".into()),
        classification: Some(Classification {
            amount: Some(12.5),
            ..Default::default()
        }),
        ..Default::default()
    };
    let parsed = parse_csv(&csv_for(&[bare, partial]));

    assert_eq!(
        parsed[1].iter().collect::<Vec<_>>(),
        vec!["", "", "0", "", "", "", "", "0", ""]
    );
    assert_eq!(&parsed[2][0], "upload.png");
    assert_eq!(&parsed[2][2], "12.5");
    assert_eq!(&parsed[2][7], "0");
}

#[test]
fn json_export_of_nothing_is_empty_array() {
    let records: Vec<DocumentRecord> = Vec::new();
    let artifact = export_json(&records, &run_date());
    assert_eq!(artifact.as_text(), "[]");
    assert_eq!(artifact.content_type, "application/json;charset=utf-8;");
}

#[test]
fn json_export_keeps_key_order() {
    let records = vec![record("a.pdf", Some("ACME"), None)];
    let artifact = export_json(&records, &run_date());
    let text = artifact.as_text();

    let keys = [
        "\"id\"",
        "\"document_name\"",
        "\"vendor\"",
        "\"amount\"",
        "\"payment_status\"",
        "\"gl_account_code\"",
        "\"expense_category\"",
        "\"destination\"",
        "\"confidence\"",
        "\"date\"",
        "\"status\"",
        "\"tenant_id\"",
    ];
    let positions: Vec<usize> = keys.iter().map(|k| text.find(k).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(text.contains("\"amount\": 0,"));
}

#[test]
fn query_matches_filename_vendor_or_gl_in_order() {
    let records = vec![
        record("Invoice-001.pdf", Some("ACME"), None),
        record("receipt.jpg", Some("Cafe"), None),
        record("scan.pdf", Some("The Invoice Co"), None),
        record("photo.png", None, Some("INVOICE-GL")),
        record("contract.pdf", None, None),
    ];
    let criteria = FilterCriteria::new().with_query("invoice");
    let names: Vec<&str> = filter(&records, &criteria)
        .into_iter()
        .map(|r| r.display_name())
        .collect();

    assert_eq!(names, vec!["Invoice-001.pdf", "scan.pdf", "photo.png"]);
}

#[test]
fn unpaid_quick_filter_picks_the_unpaid_record() {
    let records = vec![
        with_payment("a.pdf", PaymentStatus::Unpaid),
        with_payment("b.pdf", PaymentStatus::Paid),
        with_payment("c.pdf", PaymentStatus::Partial),
    ];
    let criteria = FilterCriteria::new().with_quick_filter(QuickFilter::Unpaid);
    let matched = filter(&records, &criteria);

    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].display_name(), "a.pdf");
}

#[test]
fn filenames_carry_the_run_date() {
    let ctx = run_date();
    let records: Vec<DocumentRecord> = Vec::new();

    assert_eq!(
        export(&records, ExportFormat::Csv, &ctx).filename,
        "asr-documents-export-2026-01-15.csv"
    );
    assert_eq!(
        export(&records, ExportFormat::Json, &ctx).filename,
        "asr-documents-export-2026-01-15.json"
    );
}

#[test]
fn envelope_and_bare_array_decode_the_same() {
    let bare = r#"[{"id": "1", "filename": "a.pdf"}, {"id": "2"}]"#;
    let wrapped = r#"{"data": [{"id": "1", "filename": "a.pdf"}, {"id": "2"}], "total": 2}"#;

    let from_bare = unwrap_records(bare).unwrap();
    let from_wrapped = unwrap_records(wrapped).unwrap();
    assert_eq!(from_bare, from_wrapped);
    assert_eq!(from_bare.len(), 2);

    assert!(unwrap_records(r#"{"items": []}"#).is_err());
    assert!(unwrap_records("42").is_err());
}

#[test]
fn filtered_export_end_to_end() {
    let body = r#"{"data": [
        {"id": "1", "filename": "invoice-1.pdf", "created_at": "2026-01-10T09:30:00Z",
         "classification": {"vendor_name": "ACME, Inc.", "amount": 15000, "payment_status": "unpaid"}},
        {"id": "2", "filename": "invoice-2.pdf",
         "classification": {"vendor_name": "Initech", "amount": 20, "payment_status": "unpaid"}},
        {"id": "3", "filename": "receipt.pdf",
         "classification": {"amount": 99999, "payment_status": "paid"}}
    ]}"#;
    let records = unwrap_records(body).unwrap();
    let criteria = FilterCriteria::new()
        .with_query("invoice")
        .with_quick_filter(QuickFilter::HighValue);
    let matched = filter(&records, &criteria);

    let artifact = export(&matched, ExportFormat::Csv, &run_date());
    assert_eq!(artifact.row_count, 1);

    let parsed = parse_csv(artifact.as_text());
    assert_eq!(parsed.len(), 2);
    assert_eq!(&parsed[1][1], "ACME, Inc.");
    assert_eq!(&parsed[1][2], "15000");
    assert_eq!(&parsed[1][8], "1/10/2026");
}

#[test]
fn permissions_are_deterministic() {
    let accountant = User::new(Role::Accountant);
    for _ in 0..3 {
        assert!(has_permission(
            &accountant,
            Resource::Exports,
            Action::Export,
        ));
        assert!(!has_permission(
            &accountant,
            Resource::Settings,
            Action::Write,
        ));
    }
    let gone = User::inactive(Role::Accountant);
    assert!(!has_permission(&gone, Resource::Documents, Action::Read));
}
