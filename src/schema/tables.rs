// src/schema/tables.rs
//! Column layouts for every table the report writes.

use super::types::Column;

pub const COMMUNITY_COLUMNS: &[Column] = &[
    Column::new("community_id", "INTEGER"),
    Column::new("name", "VARCHAR"),
    Column::new("region", "VARCHAR"),
    Column::new("population", "INTEGER"),
];

pub const DEMOGRAPHIC_COLUMNS: &[Column] = &[
    Column::new("demographic_id", "INTEGER"),
    Column::new("age_group", "VARCHAR"),
    Column::new("gender", "VARCHAR"),
];

pub const VACCINE_COLUMNS: &[Column] = &[
    Column::new("vaccine_id", "INTEGER"),
    Column::new("vaccine_name", "VARCHAR"),
    Column::new("manufacturer", "VARCHAR"),
];

pub const VACCINATION_RECORD_COLUMNS: &[Column] = &[
    Column::new("record_id", "INTEGER"),
    Column::new("community_id", "INTEGER"),
    Column::new("demographic_id", "INTEGER"),
    Column::new("vaccine_id", "INTEGER"),
    Column::new("date_administered", "DATE"),
    Column::new("doses_administered", "INTEGER"),
];

/// Record columns, then the joined community attributes, then the derived month.
pub const ENRICHED_RECORD_COLUMNS: &[Column] = &[
    Column::new("record_id", "INTEGER"),
    Column::new("community_id", "INTEGER"),
    Column::new("demographic_id", "INTEGER"),
    Column::new("vaccine_id", "INTEGER"),
    Column::new("date_administered", "DATE"),
    Column::new("doses_administered", "INTEGER"),
    Column::new("name", "VARCHAR"),
    Column::new("region", "VARCHAR"),
    Column::new("population", "INTEGER"),
    Column::new("month", "VARCHAR"),
];

pub const PIVOT_COMMUNITY_COLUMNS: &[Column] = &[
    Column::new("name", "VARCHAR"),
    Column::new("population", "INTEGER"),
    Column::new("total_doses", "INTEGER"),
    Column::new("vaccination_rate(%)", "DOUBLE"),
];

pub const PIVOT_TRENDS_COLUMNS: &[Column] = &[
    Column::new("month", "VARCHAR"),
    Column::new("total_doses", "INTEGER"),
];
