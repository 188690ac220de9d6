//! End-to-end report runs against in-memory and XLSX stores

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use ivs::prelude::*;
use ivs_source::SourceResult;
use pretty_assertions::assert_eq;

/// Records handed over as-is
struct VecSource(Vec<RawRecord>);

impl RecordSource for VecSource {
    fn read_records(&self) -> SourceResult<Vec<RawRecord>> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        "test records".to_string()
    }
}

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 10).unwrap()
}

const EXPORT: &str = "\
Inventory Valuation
Company: Example Co
Printed: 04/10/2024

,,,
Location,Part,Description
Warehouse A,,,,,,,,,,,,,,,
,P100,Widget,,,,,,,,12.00,,EA,,$ 3.50,$ 42.00
";

fn write_export(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("export.csv");
    std::fs::write(&path, contents).unwrap();
    path
}

fn csv_config(csv: &Path, output_dir: &Path) -> ReportConfig {
    ReportSettings {
        csv_file: Some(csv.to_path_buf()),
        output_dir: Some(output_dir.to_path_buf()),
        report_name: Some("Inventory".into()),
        ..ReportSettings::default()
    }
    .resolve()
    .unwrap()
}

fn assert_single_row_report<D: Document>(doc: &D) {
    assert_eq!(doc.value(2, 1).unwrap().as_string(), Some("Warehouse A"));
    assert_eq!(doc.value(2, 2).unwrap().as_string(), Some("P100"));
    assert_eq!(doc.value(2, 3).unwrap().as_string(), Some("Widget"));
    assert_eq!(doc.value(2, 4).unwrap().as_number(), Some(12.0));
    assert_eq!(doc.value(2, 5).unwrap().as_string(), Some("EA"));
    assert_eq!(doc.value(2, 6).unwrap().as_number(), Some(3.5));
    assert_eq!(doc.value(2, 7).unwrap().formula_text(), Some("=SUM(D2*F2)"));
    assert_eq!(doc.value(4, 5).unwrap().as_string(), Some("Grand Total:"));
    assert_eq!(doc.value(4, 7).unwrap().formula_text(), Some("=SUM(G2:G2)"));
    assert!(doc.font(4, 7).unwrap().bold);
    assert_eq!(doc.max_row(), 4);
}

#[test]
fn test_csv_to_memory_store() {
    ivs::logging::init_test();
    let dir = tempfile::tempdir().unwrap();
    let csv = write_export(dir.path(), EXPORT);
    let config = csv_config(&csv, Path::new("/reports"));
    let store = MemoryStore::new();

    let summary = ivs::run(&config, &store, run_date()).unwrap();

    assert_eq!(summary.records_read, 2);
    assert_eq!(summary.rows_normalized, 1);
    assert_eq!(summary.rows_kept, 1);
    assert_eq!(
        summary.destination,
        PathBuf::from("/reports/1st Quarter 2024 Inventory.xlsx")
    );

    let saved = store.saved(&summary.destination).unwrap();
    assert_single_row_report(&saved);
}

#[test]
fn test_csv_to_xlsx_and_back() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_export(dir.path(), EXPORT);
    let config = csv_config(&csv, dir.path());
    let store = XlsxStore::new();

    let summary = ivs::run(&config, &store, run_date()).unwrap();
    assert!(summary.destination.exists());

    let reopened = store.open_existing(&summary.destination).unwrap();
    assert_single_row_report(&reopened);
    assert_eq!(
        reopened.number_format(2, 7).unwrap().format_string(),
        ivs::report::CURRENCY_FORMAT
    );
    assert!((reopened.column_width(3).unwrap() - 80.5).abs() < 1e-9);
}

#[test]
fn test_filtered_and_sorted() {
    let config = ReportSettings {
        csv_file: Some(PathBuf::from("unused.csv")),
        output_dir: Some(PathBuf::from("/reports")),
        report_name: Some("Inventory".into()),
        include: vec!["Main".into()],
        ..ReportSettings::default()
    }
    .resolve()
    .unwrap();

    let record = |line: u64, location: &str, part: &str| {
        let mut fields = vec![String::new(); 16];
        fields[0] = location.into();
        fields[1] = part.into();
        if !part.is_empty() {
            fields[10] = "1".into();
            fields[14] = "$ 1.00".into();
        }
        RawRecord::new(line, fields)
    };
    let source = VecSource(vec![
        record(7, "Main", ""),
        record(8, "", "Z9"),
        record(9, "", "A1"),
        record(10, "Annex", ""),
        record(11, "", "B2"),
    ]);
    let store = MemoryStore::new();

    let summary = ivs::run_with_source(&config, &source, &store, run_date()).unwrap();
    assert_eq!(summary.rows_normalized, 3);
    assert_eq!(summary.rows_kept, 2);

    let saved = store.saved(&summary.destination).unwrap();
    assert_eq!(saved.value(2, 2).unwrap().as_string(), Some("A1"));
    assert_eq!(saved.value(3, 2).unwrap().as_string(), Some("Z9"));
    assert_eq!(saved.value(5, 7).unwrap().formula_text(), Some("=SUM(G2:G3)"));
}

#[test]
fn test_empty_report_still_saved() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_export(dir.path(), "1\n2\n3\n4\n5\n6\n");
    let config = csv_config(&csv, Path::new("/reports"));
    let store = MemoryStore::new();

    let summary = ivs::run(&config, &store, run_date()).unwrap();
    assert_eq!(summary.rows_kept, 0);

    let saved = store.saved(&summary.destination).unwrap();
    assert_eq!(saved.value(3, 7).unwrap().formula_text(), Some("=SUM(G2:G2)"));
}

#[test]
fn test_malformed_record_aborts_before_save() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_export(
        dir.path(),
        "1\n2\n3\n4\n5\n6\nMain,,,,,,,,,,,,,,,\n,P1,Widget,,,,,,,,many,,EA,,$ 1.00,$ 1.00\n",
    );
    let config = csv_config(&csv, Path::new("/reports"));
    let store = MemoryStore::new();

    let err = ivs::run(&config, &store, run_date()).unwrap_err();
    assert!(matches!(err, Error::MalformedRecord { line: 8, .. }));
    assert!(store.saved_paths().is_empty());
}

#[test]
fn test_missing_export_is_source_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let config = csv_config(&dir.path().join("missing.csv"), dir.path());

    let err = ivs::run(&config, &MemoryStore::new(), run_date()).unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable(_)));
}

#[test]
fn test_failed_save_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_export(dir.path(), EXPORT);

    let config = csv_config(&csv, dir.path());
    let err = ivs::run(&config, &MemoryStore::failing(), run_date()).unwrap_err();
    assert!(matches!(err, Error::WriteError { .. }));

    let missing_dir = dir.path().join("no-such-dir");
    let config = csv_config(&csv, &missing_dir);
    let err = ivs::run(&config, &XlsxStore::new(), run_date()).unwrap_err();
    match err {
        Error::WriteError { path, .. } => assert!(!path.exists()),
        other => panic!("expected write error, got {other}"),
    }
    assert!(!missing_dir.exists());
}

fn create_inventory_db(dir: &Path) {
    let conn = rusqlite::Connection::open(dir.join("inventory.db")).unwrap();
    conn.execute_batch(
        "CREATE TABLE inventory (
            location_group TEXT, avg_cost REAL, std_cost REAL, location TEXT,
            part_number TEXT, description TEXT, location_name TEXT,
            inventory_account TEXT, uom_code TEXT, qty REAL, company TEXT
        );
        INSERT INTO inventory VALUES
            ('WH', 3.5, 3.5, 'L1', 'P100', 'Widget', 'Warehouse A', '1400', 'EA', 12, 'ACME'),
            ('UP', 9.0, 9.0, 'L2', 'F1', 'Fabric', 'Upholstery', '1400', 'YD', 3, 'ACME'),
            ('WH', 1.0, 1.0, 'L1', 'P200', 'Gone', 'Warehouse A', '1400', 'EA', 0, 'ACME');",
    )
    .unwrap();
}

fn db_settings(dir: &Path) -> ReportSettings {
    ReportSettings {
        host: Some(dir.to_string_lossy().into_owned()),
        database: Some("inventory.db".into()),
        output_dir: Some(PathBuf::from("/reports")),
        report_name: Some("Inventory".into()),
        preset: Some(Preset::Warehouse),
        ..ReportSettings::default()
    }
}

#[test]
fn test_database_to_memory_store() {
    let dir = tempfile::tempdir().unwrap();
    create_inventory_db(dir.path());
    let config = db_settings(dir.path()).resolve().unwrap();
    let store = MemoryStore::new();

    let summary = ivs::run(&config, &store, run_date()).unwrap();
    assert_eq!(summary.records_read, 2);
    assert_eq!(summary.rows_kept, 1);

    let saved = store.saved(&summary.destination).unwrap();
    assert_single_row_report(&saved);
}

#[test]
fn test_locked_database_is_source_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    create_inventory_db(dir.path());
    let writer = rusqlite::Connection::open(dir.path().join("inventory.db")).unwrap();
    writer.execute_batch("BEGIN EXCLUSIVE;").unwrap();

    let config = ReportSettings {
        timeout: Some(Duration::from_millis(50)),
        ..db_settings(dir.path())
    }
    .resolve()
    .unwrap();
    let store = MemoryStore::new();

    let err = ivs::run(&config, &store, run_date()).unwrap_err();
    assert!(matches!(
        err,
        Error::SourceUnavailable(ivs_source::SourceError::Database(_))
    ));
    assert!(store.saved_paths().is_empty());
}
