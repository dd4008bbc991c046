// src/report/sheet.rs
//! In-memory sheet contents: a header row plus data rows of typed cells.

use anyhow::{bail, Context, Result};
use arrow::{
    array::{Array, ArrayRef, Date32Array, Float64Array, Int64Array, StringArray},
    datatypes::DataType,
    record_batch::RecordBatch,
};
use chrono::NaiveDate;

use crate::process::date_parser::days_to_date;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Integer(i64),
    Number(f64),
    Date(NaiveDate),
    /// A live formula; `cached` is the value shown before recalculation.
    Formula { expr: String, cached: Option<f64> },
}

impl Cell {
    /// Numeric cell for `v`; NaN is written blank and infinities as text.
    pub fn number(v: f64) -> Self {
        if v.is_nan() {
            Cell::Empty
        } else if v.is_infinite() {
            Cell::Text(if v > 0.0 { "inf" } else { "-inf" }.to_string())
        } else {
            Cell::Number(v)
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Integer(v) => Some(*v as f64),
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }
}

/// One worksheet: row 0 is `header`, `rows[i]` is sheet row `i + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetGrid {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl SheetGrid {
    pub fn new(name: impl Into<String>, header: Vec<String>) -> Self {
        Self {
            name: name.into(),
            header,
            rows: Vec::new(),
        }
    }

    /// Header from the batch's field names, one data row per batch row.
    pub fn from_batch(name: impl Into<String>, batch: &RecordBatch) -> Result<Self> {
        let name = name.into();
        let header = batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();

        let columns = batch
            .columns()
            .iter()
            .zip(batch.schema().fields().iter())
            .map(|(array, field)| {
                column_cells(array)
                    .with_context(|| format!("sheet {}: column `{}`", name, field.name()))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut rows = vec![Vec::with_capacity(columns.len()); batch.num_rows()];
        for column in columns {
            for (row, cell) in rows.iter_mut().zip(column) {
                row.push(cell);
            }
        }

        Ok(Self { name, header, rows })
    }

    pub fn data_row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Cell at zero-based sheet coordinates; row 0 is the header.
    pub fn cell(&self, row: u32, col: u16) -> Option<&Cell> {
        let data_row = (row as usize).checked_sub(1)?;
        self.rows.get(data_row)?.get(col as usize)
    }

    pub fn set_cell(&mut self, row: u32, col: u16, cell: Cell) -> Result<()> {
        let name = &self.name;
        let slot = (row as usize)
            .checked_sub(1)
            .and_then(|r| self.rows.get_mut(r))
            .and_then(|r| r.get_mut(col as usize));
        match slot {
            Some(slot) => {
                *slot = cell;
                Ok(())
            }
            None => bail!("sheet {}: no data cell at {}", name, a1_ref(row, col)),
        }
    }
}

fn column_cells(array: &ArrayRef) -> Result<Vec<Cell>> {
    let any = array.as_any();
    let cells = match array.data_type() {
        DataType::Int64 => downcast::<Int64Array>(any)?
            .iter()
            .map(|v| v.map_or(Cell::Empty, Cell::Integer))
            .collect(),
        DataType::Float64 => downcast::<Float64Array>(any)?
            .iter()
            .map(|v| v.map_or(Cell::Empty, Cell::number))
            .collect(),
        DataType::Utf8 => downcast::<StringArray>(any)?
            .iter()
            .map(|v| v.map_or(Cell::Empty, |s| Cell::Text(s.to_string())))
            .collect(),
        DataType::Date32 => downcast::<Date32Array>(any)?
            .iter()
            .map(|v| v.and_then(days_to_date).map_or(Cell::Empty, Cell::Date))
            .collect(),
        other => bail!("unsupported column type {:?}", other),
    };
    Ok(cells)
}

fn downcast<T: Array + 'static>(any: &dyn std::any::Any) -> Result<&T> {
    any.downcast_ref::<T>()
        .with_context(|| format!("expected {}", std::any::type_name::<T>()))
}

/// Column letters for a zero-based column index: 0 → A, 25 → Z, 26 → AA.
pub fn column_letters(col: u16) -> String {
    let mut n = u32::from(col) + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push(b'A' + rem);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// A1-style reference for zero-based coordinates: (1, 1) → "B2".
pub fn a1_ref(row: u32, col: u16) -> String {
    format!("{}{}", column_letters(col), row + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{Field, Schema};
    use std::sync::Arc;

    #[test]
    fn a1_references() {
        assert_eq!(a1_ref(0, 0), "A1");
        assert_eq!(a1_ref(1, 1), "B2");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(701), "ZZ");
        assert_eq!(column_letters(702), "AAA");
    }

    #[test]
    fn grid_from_batch_maps_types_and_nulls() -> Result<()> {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, true),
            Field::new("label", DataType::Utf8, true),
            Field::new("value", DataType::Float64, true),
            Field::new("day", DataType::Date32, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![Some(1), None])) as ArrayRef,
                Arc::new(StringArray::from(vec![None, Some("b")])) as ArrayRef,
                Arc::new(Float64Array::from(vec![f64::NAN, f64::INFINITY])) as ArrayRef,
                Arc::new(Date32Array::from(vec![Some(19737), None])) as ArrayRef,
            ],
        )?;

        let grid = SheetGrid::from_batch("T", &batch)?;
        assert_eq!(grid.header, vec!["id", "label", "value", "day"]);
        assert_eq!(grid.data_row_count(), 2);
        assert_eq!(
            grid.rows[0],
            vec![
                Cell::Integer(1),
                Cell::Empty,
                Cell::Empty,
                Cell::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()),
            ]
        );
        assert_eq!(
            grid.rows[1],
            vec![
                Cell::Empty,
                Cell::Text("b".into()),
                Cell::Text("inf".into()),
                Cell::Empty,
            ]
        );
        Ok(())
    }

    #[test]
    fn unsupported_column_type_is_an_error() -> Result<()> {
        let schema = Arc::new(Schema::new(vec![Field::new("flag", DataType::Boolean, true)]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(arrow::array::BooleanArray::from(vec![true])) as ArrayRef],
        )?;
        let err = SheetGrid::from_batch("T", &batch).unwrap_err();
        assert!(format!("{:#}", err).contains("flag"));
        Ok(())
    }

    #[test]
    fn cell_addressing_skips_header() -> Result<()> {
        let mut grid = SheetGrid::new("T", vec!["a".into(), "b".into()]);
        grid.rows.push(vec![Cell::Integer(1), Cell::Integer(2)]);

        assert_eq!(grid.cell(0, 0), None);
        assert_eq!(grid.cell(1, 1), Some(&Cell::Integer(2)));
        grid.set_cell(1, 0, Cell::Text("x".into()))?;
        assert_eq!(grid.cell(1, 0), Some(&Cell::Text("x".into())));
        assert!(grid.set_cell(0, 0, Cell::Empty).is_err());
        assert!(grid.set_cell(2, 0, Cell::Empty).is_err());
        Ok(())
    }
}
