// src/report/chart.rs

use super::sheet::{column_letters, SheetGrid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Column,
    Line,
}

/// A rectangular cell range on a named sheet, zero-based and inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    pub sheet: String,
    pub first_row: u32,
    pub first_col: u16,
    pub last_row: u32,
    pub last_col: u16,
}

impl SheetRange {
    /// The data cells of column `col` in `grid`: rows 1..=n, past the header.
    pub fn data_column(grid: &SheetGrid, col: u16) -> Self {
        Self {
            sheet: grid.name.clone(),
            first_row: 1,
            first_col: col,
            last_row: grid.data_row_count(),
            last_col: col,
        }
    }

    pub fn row_count(&self) -> u32 {
        (self.last_row + 1).saturating_sub(self.first_row)
    }

    /// Absolute reference as a spreadsheet shows it, e.g. `Pivot_Trends!$B$2:$B$4`.
    pub fn to_formula(&self) -> String {
        let sheet = if self
            .sheet
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.sheet.clone()
        } else {
            format!("'{}'", self.sheet.replace('\'', "''"))
        };
        format!(
            "{}!${}${}:${}${}",
            sheet,
            column_letters(self.first_col),
            self.first_row + 1,
            column_letters(self.last_col),
            self.last_row + 1
        )
    }

    pub fn as_tuple(&self) -> (&str, u32, u16, u32, u16) {
        (
            self.sheet.as_str(),
            self.first_row,
            self.first_col,
            self.last_row,
            self.last_col,
        )
    }
}

/// A single-series chart bound to ranges of other sheets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub series_name: String,
    pub x_axis: String,
    pub y_axis: String,
    pub categories: SheetRange,
    pub values: SheetRange,
    /// Top-left cell (row, col) the chart is anchored at.
    pub anchor: (u32, u16),
}
