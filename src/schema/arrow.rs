// src/schema/arrow.rs

use arrow::datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema, SchemaRef};
use std::sync::Arc;

use super::types::Column;

/// Map a column type tag into an Arrow DataType.
///
/// Covers:
/// - INTEGER, INT, BIGINT       → Int64
/// - DOUBLE, FLOAT, NUMBER      → Float64
/// - DATE                       → Date32
/// - VARCHAR*, CHAR*, TEXT      → Utf8
/// - fallback                   → Utf8
pub fn map_to_arrow_type(ty: &str) -> DataType {
    let upper = ty.to_ascii_uppercase();
    if upper == "INTEGER" || upper == "INT" || upper == "BIGINT" {
        DataType::Int64
    } else if upper == "DOUBLE" || upper == "FLOAT" || upper == "NUMBER" {
        DataType::Float64
    } else if upper == "DATE" {
        DataType::Date32
    } else {
        DataType::Utf8
    }
}

/// Build an ArrowSchema (inside an Arc) from a slice of `Column`s.
///
/// Every field is nullable: left-join enrichment produces nulls.
pub fn build_arrow_schema(cols: &[Column]) -> SchemaRef {
    let fields: Vec<ArrowField> = cols
        .iter()
        .map(|col| ArrowField::new(col.name, map_to_arrow_type(col.ty), true))
        .collect();

    Arc::new(ArrowSchema::new(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{ENRICHED_RECORD_COLUMNS, VACCINATION_RECORD_COLUMNS};

    #[test]
    fn maps_type_tags() {
        assert_eq!(map_to_arrow_type("integer"), DataType::Int64);
        assert_eq!(map_to_arrow_type("DOUBLE"), DataType::Float64);
        assert_eq!(map_to_arrow_type("DATE"), DataType::Date32);
        assert_eq!(map_to_arrow_type("VARCHAR(32)"), DataType::Utf8);
        assert_eq!(map_to_arrow_type("XMLTYPE"), DataType::Utf8);
    }

    #[test]
    fn enriched_schema_extends_record_schema() {
        let record = build_arrow_schema(VACCINATION_RECORD_COLUMNS);
        let enriched = build_arrow_schema(ENRICHED_RECORD_COLUMNS);

        assert_eq!(enriched.fields().len(), record.fields().len() + 4);
        for (a, b) in record.fields().iter().zip(enriched.fields().iter()) {
            assert_eq!(a, b);
        }
        assert!(enriched.fields().iter().all(|f| f.is_nullable()));
    }
}
