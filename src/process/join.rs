use anyhow::{anyhow, Context, Result};
use arrow::{
    array::{Array, ArrayRef, Date32Array, Int64Array, StringArray, UInt32Array},
    compute::take,
    datatypes::{DataType, Field, FieldRef, Schema},
    record_batch::RecordBatch,
};
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, warn};

use super::date_parser::{days_to_date, month_key};
use super::utils::typed_column;

/// Community attributes carried onto every record.
const JOINED_COLUMNS: [&str; 3] = ["name", "region", "population"];

/// Left outer join of `records` with `communities` on `community_id`.
///
/// Output has exactly one row per record, in record order: all record columns
/// followed by the community's name, region and population. A record whose
/// community_id has no match keeps its row with nulls in the joined columns.
/// When `communities` repeats an id, its first row is used.
#[tracing::instrument(level = "info", skip_all, fields(records = records.num_rows()))]
pub fn enrich_records(records: &RecordBatch, communities: &RecordBatch) -> Result<RecordBatch> {
    let record_keys = typed_column::<Int64Array>(records, "community_id")?;
    let community_keys = typed_column::<Int64Array>(communities, "community_id")?;

    let mut lookup: HashMap<i64, u32> = HashMap::with_capacity(community_keys.len());
    for (idx, key) in community_keys.iter().enumerate() {
        if let Some(key) = key {
            lookup.entry(key).or_insert(idx as u32);
        }
    }

    let indices: UInt32Array = record_keys
        .iter()
        .map(|key| key.and_then(|k| lookup.get(&k).copied()))
        .collect();
    if indices.null_count() > 0 {
        warn!(
            unmatched = indices.null_count(),
            "records without a matching community; joined columns left null"
        );
    }

    let community_schema = communities.schema();
    let mut fields: Vec<FieldRef> = records.schema().fields().iter().cloned().collect();
    let mut columns: Vec<ArrayRef> = records.columns().to_vec();
    for name in JOINED_COLUMNS {
        let (idx, field) = community_schema
            .column_with_name(name)
            .ok_or_else(|| anyhow!("community table has no `{}` column", name))?;
        let joined = take(communities.column(idx).as_ref(), &indices, None)
            .with_context(|| format!("joining community column `{}`", name))?;
        fields.push(Arc::new(field.clone().with_nullable(true)));
        columns.push(joined);
    }

    let enriched = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .context("building enriched record batch")?;
    debug!(rows = enriched.num_rows(), "enriched records");
    Ok(enriched)
}

/// Append a `month` column (`YYYY-MM`) derived from `date_administered`.
pub fn with_month_column(enriched: &RecordBatch) -> Result<RecordBatch> {
    let dates = typed_column::<Date32Array>(enriched, "date_administered")?;
    let months: StringArray = dates
        .iter()
        .map(|d| d.and_then(days_to_date).map(month_key))
        .collect();

    let mut fields: Vec<FieldRef> = enriched.schema().fields().iter().cloned().collect();
    fields.push(Arc::new(Field::new("month", DataType::Utf8, true)));
    let mut columns = enriched.columns().to_vec();
    columns.push(Arc::new(months) as ArrayRef);

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .context("appending month column")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{community_table, record_table};
    use crate::process::date_parser::date_to_days;
    use crate::schema::{build_arrow_schema, tables::ENRICHED_RECORD_COLUMNS};
    use crate::schema::tables::{COMMUNITY_COLUMNS, VACCINATION_RECORD_COLUMNS};
    use chrono::NaiveDate;

    fn records_for(community_ids: Vec<Option<i64>>) -> Result<RecordBatch> {
        let n = community_ids.len() as i64;
        let day = date_to_days(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        Ok(RecordBatch::try_new(
            build_arrow_schema(VACCINATION_RECORD_COLUMNS),
            vec![
                Arc::new(Int64Array::from_iter_values(1..=n)) as ArrayRef,
                Arc::new(Int64Array::from(community_ids)) as ArrayRef,
                Arc::new(Int64Array::from_iter_values((0..n).map(|_| 1))) as ArrayRef,
                Arc::new(Int64Array::from_iter_values((0..n).map(|_| 1))) as ArrayRef,
                Arc::new(Date32Array::from_iter_values((0..n).map(|_| day))) as ArrayRef,
                Arc::new(Int64Array::from_iter_values((0..n).map(|_| 10))) as ArrayRef,
            ],
        )?)
    }

    #[test]
    fn join_keeps_cardinality_and_order() -> Result<()> {
        let enriched = enrich_records(&record_table()?, &community_table()?)?;
        assert_eq!(enriched.num_rows(), 5);

        let ids = typed_column::<Int64Array>(&enriched, "record_id")?;
        assert_eq!(ids.values().to_vec(), vec![1, 2, 3, 4, 5]);

        let names = typed_column::<StringArray>(&enriched, "name")?;
        let names: Vec<_> = names.iter().flatten().collect();
        assert_eq!(
            names,
            vec!["Greenfield", "Greenfield", "Greenfield", "Rivertown", "Rivertown"]
        );

        let populations = typed_column::<Int64Array>(&enriched, "population")?;
        assert_eq!(populations.value(3), 22000);
        Ok(())
    }

    #[test]
    fn unmatched_community_yields_nulls() -> Result<()> {
        let records = records_for(vec![Some(1), Some(99), None])?;
        let enriched = enrich_records(&records, &community_table()?)?;
        assert_eq!(enriched.num_rows(), 3);

        let names = typed_column::<StringArray>(&enriched, "name")?;
        let regions = typed_column::<StringArray>(&enriched, "region")?;
        let populations = typed_column::<Int64Array>(&enriched, "population")?;
        assert_eq!(names.value(0), "Greenfield");
        for row in 1..3 {
            assert!(names.is_null(row));
            assert!(regions.is_null(row));
            assert!(populations.is_null(row));
        }
        Ok(())
    }

    #[test]
    fn duplicate_community_ids_do_not_duplicate_rows() -> Result<()> {
        let communities = RecordBatch::try_new(
            build_arrow_schema(COMMUNITY_COLUMNS),
            vec![
                Arc::new(Int64Array::from(vec![1, 1])) as ArrayRef,
                Arc::new(StringArray::from(vec!["First", "Second"])) as ArrayRef,
                Arc::new(StringArray::from(vec!["East", "West"])) as ArrayRef,
                Arc::new(Int64Array::from(vec![100, 200])) as ArrayRef,
            ],
        )?;
        let enriched = enrich_records(&records_for(vec![Some(1), Some(1)])?, &communities)?;
        assert_eq!(enriched.num_rows(), 2);
        let names = typed_column::<StringArray>(&enriched, "name")?;
        assert_eq!(names.value(0), "First");
        assert_eq!(names.value(1), "First");
        Ok(())
    }

    #[test]
    fn month_column_completes_enriched_schema() -> Result<()> {
        let enriched = enrich_records(&record_table()?, &community_table()?)?;
        let with_month = with_month_column(&enriched)?;

        assert_eq!(
            with_month.schema(),
            build_arrow_schema(ENRICHED_RECORD_COLUMNS)
        );
        let months = typed_column::<StringArray>(&with_month, "month")?;
        let months: Vec<_> = months.iter().flatten().collect();
        assert_eq!(
            months,
            vec!["2024-01", "2024-01", "2024-02", "2024-01", "2024-03"]
        );
        Ok(())
    }
}
