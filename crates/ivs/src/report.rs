//! Report building
//!
//! The report is a single sheet: a bold header row, one row per inventory
//! line, a blank spacer row and a grand total. Extended values and the
//! total are formulas left for the spreadsheet application to evaluate.
//!
//! ```text
//! row 1      Location | Part | Description | Qty | UOM | Cost | Extended
//! row 2..    ...                                               =SUM(Dn*Fn)
//! last + 2                                   Grand Total:      =SUM(G2:G{last})
//! ```

use std::path::Path;

use ivs_core::{CellValue, Document, DocumentStore, FontStyle, NumberFormat};

use crate::error::{Error, Result};
use crate::row::CanonicalRow;

/// Positive `$#,##0.00`, negative red with a leading minus
pub const CURRENCY_FORMAT: &str = "[$$-409]#,##0.00;[RED]\\-[$$-409]#,##0.00";

/// First sheet row holding data
pub const FIRST_DATA_ROW: u32 = 2;

pub const COL_LOCATION: u16 = 1;
pub const COL_PART: u16 = 2;
pub const COL_DESCRIPTION: u16 = 3;
pub const COL_QTY: u16 = 4;
pub const COL_UOM: u16 = 5;
pub const COL_COST: u16 = 6;
pub const COL_EXTENDED: u16 = 7;

/// Number of report columns
pub const COLUMNS: usize = 7;

/// Fixed look of the report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub headers: [String; COLUMNS],
    /// Column widths in characters
    pub widths: [f64; COLUMNS],
    /// Number format per column
    pub formats: [NumberFormat; COLUMNS],
    pub title_font: FontStyle,
    pub body_font: FontStyle,
    /// Label placed left of the grand total
    pub total_label: String,
}

impl Default for ReportLayout {
    fn default() -> Self {
        let currency = NumberFormat::from_string(CURRENCY_FORMAT);
        let arial = FontStyle::new().with_name("Arial").with_size(10.0);

        Self {
            headers: ["Location", "Part", "Description", "Qty", "UOM", "Cost", "Extended"]
                .map(String::from),
            widths: [16.25, 34.25, 80.50, 7.50, 6.50, 10.0, 12.75],
            formats: [
                NumberFormat::General,
                NumberFormat::General,
                NumberFormat::General,
                NumberFormat::from_string("0.00"),
                NumberFormat::General,
                currency.clone(),
                currency,
            ],
            title_font: arial.clone().with_bold(true),
            body_font: arial,
            total_label: "Grand Total:".to_string(),
        }
    }
}

impl ReportLayout {
    fn format(&self, col: u16) -> &NumberFormat {
        &self.formats[usize::from(col - 1)]
    }
}

/// Where the rows of a populated report ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportShape {
    /// Last data row, or the header row when there is no data
    pub last_data_row: u32,
    pub total_row: u32,
}

/// Extended value formula for a data row
pub fn extended_formula(row: u32) -> String {
    format!("=SUM(D{row}*F{row})")
}

/// Grand total formula over the data rows
///
/// With no data rows the range collapses to the spacer cell `G2`.
pub fn total_formula(last_data_row: u32) -> String {
    format!("=SUM(G{}:G{})", FIRST_DATA_ROW, last_data_row.max(FIRST_DATA_ROW))
}

/// Write the header row
pub fn write_header<D: Document>(doc: &mut D, layout: &ReportLayout) -> Result<()> {
    for (col, header) in (1u16..).zip(layout.headers.iter()) {
        doc.set_value(1, col, CellValue::from(header.as_str()))?;
        doc.set_font(1, col, &layout.title_font)?;
    }
    Ok(())
}

/// Apply the fixed column widths
pub fn set_column_widths<D: Document>(doc: &mut D, layout: &ReportLayout) -> Result<()> {
    for (col, width) in (1u16..).zip(layout.widths.iter()) {
        doc.set_column_width(col, *width)?;
    }
    Ok(())
}

/// Write one inventory line at `sheet_row`
pub fn write_row<D: Document>(
    doc: &mut D,
    layout: &ReportLayout,
    sheet_row: u32,
    row: &CanonicalRow,
) -> Result<()> {
    let values = [
        CellValue::from(row.location.as_str()),
        CellValue::from(row.part.as_str()),
        CellValue::from(row.description.as_str()),
        CellValue::Number(row.qty.to_f64()),
        CellValue::from(row.uom.as_str()),
        CellValue::Number(row.cost.to_f64()),
        CellValue::formula(extended_formula(sheet_row)),
    ];

    for (col, value) in (1u16..).zip(values) {
        doc.set_value(sheet_row, col, value)?;
        doc.set_number_format(sheet_row, col, layout.format(col))?;
        doc.set_font(sheet_row, col, &layout.body_font)?;
    }
    Ok(())
}

/// Write the grand total below the data, returning its row
pub fn write_total<D: Document>(
    doc: &mut D,
    layout: &ReportLayout,
    last_data_row: u32,
) -> Result<u32> {
    let total_row = last_data_row + 2;

    doc.set_value(total_row, COL_UOM, CellValue::from(layout.total_label.as_str()))?;
    doc.set_font(total_row, COL_UOM, &layout.title_font)?;

    doc.set_value(
        total_row,
        COL_EXTENDED,
        CellValue::formula(total_formula(last_data_row)),
    )?;
    doc.set_font(total_row, COL_EXTENDED, &layout.title_font)?;
    doc.set_number_format(total_row, COL_EXTENDED, layout.format(COL_EXTENDED))?;

    Ok(total_row)
}

/// Fill a document with the full report
pub fn populate<D: Document>(
    doc: &mut D,
    layout: &ReportLayout,
    rows: &[CanonicalRow],
) -> Result<ReportShape> {
    write_header(doc, layout)?;
    set_column_widths(doc, layout)?;

    let mut last_data_row = FIRST_DATA_ROW - 1;
    for (sheet_row, row) in (FIRST_DATA_ROW..).zip(rows) {
        write_row(doc, layout, sheet_row, row)?;
        last_data_row = sheet_row;
    }

    if rows.is_empty() {
        tracing::warn!("report has no data rows");
    }

    let total_row = write_total(doc, layout, last_data_row)?;
    Ok(ReportShape {
        last_data_row,
        total_row,
    })
}

/// Build the report and save it to `destination`
///
/// The document is saved once, after it is fully populated; a failed save
/// is a [`Error::WriteError`].
pub fn build<S: DocumentStore>(
    store: &S,
    layout: &ReportLayout,
    rows: &[CanonicalRow],
    destination: &Path,
) -> Result<ReportShape> {
    let mut doc = store.create_new();
    let shape = populate(&mut doc, layout, rows)?;

    store
        .save_as(&doc, destination)
        .map_err(|e| Error::WriteError {
            path: destination.to_path_buf(),
            source: Box::new(e),
        })?;

    tracing::info!(
        path = %destination.display(),
        rows = rows.len(),
        total_row = shape.total_row,
        "saved report"
    );
    Ok(shape)
}
