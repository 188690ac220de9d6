//! Example: build an inventory report from a small CSV export

use std::path::PathBuf;

use ivs::normalize::normalize;
use ivs::prelude::*;
use ivs_source::CsvSourceOptions;

const EXPORT: &str = "\
Inventory Valuation
Company: Example Co
Printed: 07/20/2024
Page 1
,,,
Location,Part,Description
Main,,,,,,,,,,,,,,,
,P100,Widget,,,,,,,,12,,EA,,$ 3.50,$ 42.00
,P050,Bracket,,,,,,,,\"1,200\",,EA,,$ 0.25,$ 300.00
Apparel,,,,,,,,,,,,,,,
,T-01,T-shirt,,,,,,,,40,,EA,,$ 4.00,$ 160.00
";

fn main() -> Result<()> {
    let records = CsvSource::read(EXPORT.as_bytes(), &CsvSourceOptions::default())?;
    let normalized = normalize(&records, &ColumnMap::legacy_csv(), &BlankPartRule::default())?;

    let mut rows = Preset::Warehouse.criteria().apply(normalized.rows);
    ivs::sort::sort_rows(&mut rows);

    let path = std::env::temp_dir().join(PathBuf::from("ivs-example.xlsx"));
    let shape = report::build(&XlsxStore::new(), &ReportLayout::default(), &rows, &path)?;

    println!(
        "Wrote {} rows to {} (grand total in row {})",
        rows.len(),
        path.display(),
        shape.total_row
    );
    Ok(())
}
