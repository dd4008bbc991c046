// src/process/mod.rs
pub mod aggregate;
pub mod date_parser;
pub mod join;
pub mod utils;

use anyhow::Result;
use arrow::record_batch::RecordBatch;
use tracing::info;

use crate::data::ReferenceTables;

/// Every table that ends up on a data sheet of the report.
#[derive(Debug, Clone)]
pub struct ReportTables {
    pub communities: RecordBatch,
    pub demographics: RecordBatch,
    pub vaccines: RecordBatch,
    /// Records enriched with community attributes and the derived month.
    pub records: RecordBatch,
    pub pivot_community: RecordBatch,
    pub pivot_trends: RecordBatch,
}

/// Join the records with their communities, then derive both pivots.
#[tracing::instrument(level = "info", skip_all)]
pub fn build_report_tables(reference: ReferenceTables) -> Result<ReportTables> {
    let ReferenceTables {
        communities,
        demographics,
        vaccines,
        records,
    } = reference;

    let enriched = join::enrich_records(&records, &communities)?;
    let records = join::with_month_column(&enriched)?;
    let pivot_community = aggregate::pivot_by_community(&records)?;
    let pivot_trends = aggregate::pivot_by_month(&records)?;
    info!(
        records = records.num_rows(),
        communities = pivot_community.num_rows(),
        months = pivot_trends.num_rows(),
        "aggregated"
    );

    Ok(ReportTables {
        communities,
        demographics,
        vaccines,
        records,
        pivot_community,
        pivot_trends,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_tables_from_reference_data() -> Result<()> {
        let tables = build_report_tables(ReferenceTables::build()?)?;
        assert_eq!(tables.records.num_rows(), 5);
        assert_eq!(tables.records.num_columns(), 10);
        assert_eq!(tables.pivot_community.num_rows(), 2);
        assert_eq!(tables.pivot_trends.num_rows(), 3);
        assert_eq!(tables.demographics.num_rows(), 4);
        Ok(())
    }
}
