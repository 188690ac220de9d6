//! Write a report-shaped sheet to XLSX and read it back.

use std::io::Cursor;

use ivs_core::{CellValue, Document, DocumentStore, FontStyle, NumberFormat, Worksheet};
use ivs_xlsx::{XlsxReader, XlsxStore, XlsxWriter};
use pretty_assertions::assert_eq;

const CURRENCY: &str = "[$$-409]#,##0.00;[RED]\\-[$$-409]#,##0.00";

fn report_sheet() -> Worksheet {
    let mut sheet = Worksheet::default();
    let title = FontStyle::new().with_name("Arial").with_size(10.0).with_bold(true);
    let body = FontStyle::new().with_name("Arial").with_size(10.0);
    let currency = NumberFormat::from_string(CURRENCY);

    for (col, header) in ["Location", "Part", "Description", "Qty", "UOM", "Cost", "Extended"]
        .iter()
        .enumerate()
    {
        let col = col as u16 + 1;
        sheet.set_value(1, col, CellValue::from(*header)).unwrap();
        sheet.set_font(1, col, &title).unwrap();
    }
    for (col, width) in [16.25, 34.25, 80.50, 7.50, 6.50, 10.0, 12.75].iter().enumerate() {
        sheet.set_column_width(col as u16 + 1, *width).unwrap();
    }

    sheet.set_value(2, 1, "MAIN".into()).unwrap();
    sheet.set_value(2, 2, "A-100".into()).unwrap();
    sheet.set_value(2, 3, "Widget & bracket".into()).unwrap();
    sheet.set_value(2, 4, CellValue::Number(3.0)).unwrap();
    sheet.set_number_format(2, 4, &NumberFormat::decimal()).unwrap();
    sheet.set_value(2, 5, "EA".into()).unwrap();
    sheet.set_value(2, 6, CellValue::Number(2.5)).unwrap();
    sheet.set_number_format(2, 6, &currency).unwrap();
    sheet.set_value(2, 7, CellValue::formula("SUM(D2*F2)")).unwrap();
    sheet.set_number_format(2, 7, &currency).unwrap();
    for col in 1..=7 {
        sheet.set_font(2, col, &body).unwrap();
    }

    sheet.set_value(4, 5, "Grand Total:".into()).unwrap();
    sheet.set_font(4, 5, &title).unwrap();
    sheet.set_value(4, 7, CellValue::formula("SUM(G2:G2)")).unwrap();
    sheet.set_font(4, 7, &title).unwrap();
    sheet.set_number_format(4, 7, &currency).unwrap();

    sheet
}

#[test]
fn test_roundtrip_through_memory() {
    let sheet = report_sheet();

    let mut buf = Cursor::new(Vec::new());
    XlsxWriter::write(&sheet, &mut buf).unwrap();
    buf.set_position(0);
    let back = XlsxReader::read(buf).unwrap();

    assert_eq!(back.max_row(), 4);
    assert_eq!(back.value(1, 7).unwrap().as_string(), Some("Extended"));
    assert_eq!(back.value(2, 3).unwrap().as_string(), Some("Widget & bracket"));
    assert_eq!(back.value(2, 4).unwrap().as_number(), Some(3.0));
    assert_eq!(back.value(2, 7).unwrap().formula_text(), Some("=SUM(D2*F2)"));
    assert_eq!(back.value(4, 7).unwrap().formula_text(), Some("=SUM(G2:G2)"));
    assert_eq!(back.value(3, 1).unwrap(), CellValue::Empty);
}

#[test]
fn test_roundtrip_preserves_formatting() {
    let sheet = report_sheet();

    let mut buf = Cursor::new(Vec::new());
    XlsxWriter::write(&sheet, &mut buf).unwrap();
    buf.set_position(0);
    let back = XlsxReader::read(buf).unwrap();

    let title = back.font(1, 1).unwrap();
    assert_eq!(title.name, "Arial");
    assert!(title.bold);
    assert!((title.size - 10.0).abs() < f64::EPSILON);

    assert!(!back.font(2, 1).unwrap().bold);
    assert_eq!(back.number_format(2, 4).unwrap(), NumberFormat::decimal());
    assert_eq!(back.number_format(2, 6).unwrap().format_string(), CURRENCY);
    assert_eq!(back.number_format(4, 7).unwrap().format_string(), CURRENCY);
    assert!(back.font(4, 5).unwrap().bold);
    assert!(back.number_format(2, 1).unwrap().is_general());

    let widths: Vec<f64> = (1..=7).map(|c| back.column_width(c).unwrap()).collect();
    assert_eq!(widths, vec![16.25, 34.25, 80.5, 7.5, 6.5, 10.0, 12.75]);
}

#[test]
fn test_store_save_and_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("1st Quarter 2024 Inventory.xlsx");
    let store = XlsxStore::new();

    let mut doc = store.create_new();
    doc.set_value(1, 1, "Location".into()).unwrap();
    store.save_as(&doc, &path).unwrap();

    // Saving again overwrites
    doc.set_value(1, 1, "Part".into()).unwrap();
    store.save_as(&doc, &path).unwrap();

    let reopened = store.open_existing(&path).unwrap();
    assert_eq!(reopened.value(1, 1).unwrap().as_string(), Some("Part"));
}

#[test]
fn test_store_open_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = XlsxStore::new();
    assert!(store.open_existing(&dir.path().join("nope.xlsx")).is_err());
}

#[test]
fn test_strings_survive_save_and_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("strings.xlsx");
    let store = XlsxStore::new();

    let texts = [
        "Main ",
        "  P100",
        "BOLT_x0041_X",
        "_x005F_",
        "A_xB",
        "bell\u{7}tab\tcr\r\nend",
        " \t",
    ];

    let mut doc = store.create_new();
    for (row, text) in (1u32..).zip(texts) {
        doc.set_value(row, 2, CellValue::from(text)).unwrap();
    }
    store.save_as(&doc, &path).unwrap();

    let reopened = store.open_existing(&path).unwrap();
    for (row, text) in (1u32..).zip(texts) {
        assert_eq!(reopened.value(row, 2).unwrap().as_string(), Some(text));
    }
}
