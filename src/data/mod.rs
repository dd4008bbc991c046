// src/data/mod.rs
//! The fixed reference dataset, built as Arrow record batches.

use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, Date32Array, Int64Array, StringArray},
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::debug;

use crate::process::date_parser::{date_to_days, parse_iso_date};
use crate::schema::{
    build_arrow_schema,
    tables::{COMMUNITY_COLUMNS, DEMOGRAPHIC_COLUMNS, VACCINATION_RECORD_COLUMNS, VACCINE_COLUMNS},
};

/// The four base tables.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    pub communities: RecordBatch,
    pub demographics: RecordBatch,
    pub vaccines: RecordBatch,
    pub records: RecordBatch,
}

impl ReferenceTables {
    #[tracing::instrument(level = "info")]
    pub fn build() -> Result<Self> {
        let tables = Self {
            communities: community_table()?,
            demographics: demographic_table()?,
            vaccines: vaccine_table()?,
            records: record_table()?,
        };
        debug!(
            communities = tables.communities.num_rows(),
            demographics = tables.demographics.num_rows(),
            vaccines = tables.vaccines.num_rows(),
            records = tables.records.num_rows(),
            "built reference tables"
        );
        Ok(tables)
    }
}

pub fn community_table() -> Result<RecordBatch> {
    let schema = build_arrow_schema(COMMUNITY_COLUMNS);
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef,
            Arc::new(StringArray::from(vec!["Greenfield", "Rivertown"])) as ArrayRef,
            Arc::new(StringArray::from(vec!["North", "South"])) as ArrayRef,
            Arc::new(Int64Array::from(vec![15000, 22000])) as ArrayRef,
        ],
    )
    .context("building community table")
}

pub fn demographic_table() -> Result<RecordBatch> {
    let schema = build_arrow_schema(DEMOGRAPHIC_COLUMNS);
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(vec![1, 2, 3, 4])) as ArrayRef,
            Arc::new(StringArray::from(vec!["0-18", "19-35", "36-60", "60+"])) as ArrayRef,
            Arc::new(StringArray::from(vec!["All"; 4])) as ArrayRef,
        ],
    )
    .context("building demographic table")
}

pub fn vaccine_table() -> Result<RecordBatch> {
    let schema = build_arrow_schema(VACCINE_COLUMNS);
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef,
            Arc::new(StringArray::from(vec!["Vaccine A", "Vaccine B"])) as ArrayRef,
            Arc::new(StringArray::from(vec!["PharmaCorp", "HealthMeds"])) as ArrayRef,
        ],
    )
    .context("building vaccine table")
}

pub fn record_table() -> Result<RecordBatch> {
    let dates = [
        "2024-01-15",
        "2024-01-15",
        "2024-02-15",
        "2024-01-20",
        "2024-03-10",
    ]
    .iter()
    .map(|s| parse_iso_date(s).map(date_to_days))
    .collect::<Result<Vec<i32>>>()?;

    let schema = build_arrow_schema(VACCINATION_RECORD_COLUMNS);
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(vec![1, 2, 3, 4, 5])) as ArrayRef,
            Arc::new(Int64Array::from(vec![1, 1, 1, 2, 2])) as ArrayRef,
            Arc::new(Int64Array::from(vec![1, 2, 1, 3, 4])) as ArrayRef,
            Arc::new(Int64Array::from(vec![1, 1, 2, 1, 2])) as ArrayRef,
            Arc::new(Date32Array::from(dates)) as ArrayRef,
            Arc::new(Int64Array::from(vec![500, 700, 300, 600, 200])) as ArrayRef,
        ],
    )
    .context("building vaccination record table")
}
