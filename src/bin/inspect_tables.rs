use anyhow::Result;
use arrow::util::pretty::pretty_format_batches;
use vaxreport::{data::ReferenceTables, process, report::layout::data_sheets};

/// Print every data sheet's table as an ASCII grid, without writing a workbook.
fn main() -> Result<()> {
    let tables = process::build_report_tables(ReferenceTables::build()?)?;

    for (sheet, batch) in data_sheets(&tables) {
        println!("=== {} ({} rows) ===", sheet, batch.num_rows());
        println!("{}", pretty_format_batches(&[batch.clone()])?);
        println!();
    }
    Ok(())
}
