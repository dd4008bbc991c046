// src/report/layout.rs
//! The eight-sheet report: six data sheets, the calculations sheet, the charts sheet.

use anyhow::{Context, Result};
use arrow::{
    array::{Array, Float64Array, Int64Array, StringArray},
    record_batch::RecordBatch,
};
use tracing::debug;

use super::chart::{ChartKind, ChartSpec, SheetRange};
use super::sheet::{a1_ref, Cell, SheetGrid};
use crate::process::{utils::typed_column, ReportTables};

pub const OUTPUT_FILE: &str = "SDG_Data_Analysis.xlsx";

pub const COMMUNITY_SHEET: &str = "Community";
pub const DEMOGRAPHIC_SHEET: &str = "Demographic";
pub const VACCINE_SHEET: &str = "Vaccination_Type";
pub const RECORD_SHEET: &str = "Vaccination_Record";
pub const PIVOT_COMMUNITY_SHEET: &str = "Pivot_Community";
pub const PIVOT_TRENDS_SHEET: &str = "Pivot_Trends";
pub const CALCULATIONS_SHEET: &str = "Calculations";
pub const CHARTS_SHEET: &str = "Charts";

const CALCULATIONS_HEADER: [&str; 4] = [
    "Community",
    "Total Doses",
    "Population",
    "Vaccination Rate (%)",
];

/// Data sheets in workbook order, paired with the table each one holds.
pub fn data_sheets(tables: &ReportTables) -> [(&'static str, &RecordBatch); 6] {
    [
        (COMMUNITY_SHEET, &tables.communities),
        (DEMOGRAPHIC_SHEET, &tables.demographics),
        (VACCINE_SHEET, &tables.vaccines),
        (RECORD_SHEET, &tables.records),
        (PIVOT_COMMUNITY_SHEET, &tables.pivot_community),
        (PIVOT_TRENDS_SHEET, &tables.pivot_trends),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    /// Grid sheets in workbook order; the charts sheet follows them.
    pub sheets: Vec<SheetGrid>,
    pub charts_sheet: String,
    pub charts: Vec<ChartSpec>,
}

impl ReportLayout {
    #[tracing::instrument(level = "info", skip_all)]
    pub fn assemble(tables: &ReportTables) -> Result<Self> {
        let mut sheets = data_sheets(tables)
            .into_iter()
            .map(|(name, batch)| SheetGrid::from_batch(name, batch))
            .collect::<Result<Vec<_>>>()?;

        let calculations = calculations_sheet(&tables.pivot_community)?;
        let charts = {
            let by_name = |name: &str| sheets.iter().find(|s| s.name == name);
            let community = by_name(PIVOT_COMMUNITY_SHEET).context("community pivot sheet")?;
            let trends = by_name(PIVOT_TRENDS_SHEET).context("trends pivot sheet")?;
            vec![community_chart(community), trends_chart(trends)]
        };
        sheets.push(calculations);

        debug!(sheets = sheets.len() + 1, charts = charts.len(), "assembled layout");
        Ok(Self {
            sheets,
            charts_sheet: CHARTS_SHEET.to_string(),
            charts,
        })
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetGrid> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// All sheet names in workbook order, charts sheet included.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets
            .iter()
            .map(|s| s.name.as_str())
            .chain(std::iter::once(self.charts_sheet.as_str()))
            .collect()
    }
}

/// Community pivot rows re-laid as (name, total, population, rate), with the
/// first rate replaced by a live `=B2/C2*100` formula.
pub fn calculations_sheet(pivot_community: &RecordBatch) -> Result<SheetGrid> {
    let names = typed_column::<StringArray>(pivot_community, "name")?;
    let totals = typed_column::<Int64Array>(pivot_community, "total_doses")?;
    let populations = typed_column::<Int64Array>(pivot_community, "population")?;
    let rates = typed_column::<Float64Array>(pivot_community, "vaccination_rate(%)")?;

    let header = CALCULATIONS_HEADER.iter().map(|h| h.to_string()).collect();
    let mut grid = SheetGrid::new(CALCULATIONS_SHEET, header);
    for row in 0..pivot_community.num_rows() {
        grid.rows.push(vec![
            names
                .is_valid(row)
                .then(|| Cell::Text(names.value(row).to_string()))
                .unwrap_or(Cell::Empty),
            totals
                .is_valid(row)
                .then(|| Cell::Integer(totals.value(row)))
                .unwrap_or(Cell::Empty),
            populations
                .is_valid(row)
                .then(|| Cell::Integer(populations.value(row)))
                .unwrap_or(Cell::Empty),
            rates
                .is_valid(row)
                .then(|| Cell::number(rates.value(row)))
                .unwrap_or(Cell::Empty),
        ]);
    }

    if !grid.rows.is_empty() {
        let cached = rates.is_valid(0).then(|| rates.value(0)).filter(|v| v.is_finite());
        let expr = format!("={}/{}*100", a1_ref(1, 1), a1_ref(1, 2));
        grid.set_cell(1, 3, Cell::Formula { expr, cached })?;
    }
    Ok(grid)
}

fn community_chart(pivot: &SheetGrid) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Column,
        title: "Total Doses per Community".into(),
        series_name: "Total Doses per Community".into(),
        x_axis: "Community".into(),
        y_axis: "Total Doses".into(),
        categories: SheetRange::data_column(pivot, 0),
        values: SheetRange::data_column(pivot, 2),
        anchor: (1, 1),
    }
}

fn trends_chart(pivot: &SheetGrid) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Line,
        title: "Vaccination Trends by Month".into(),
        series_name: "Doses Administered".into(),
        x_axis: "Month".into(),
        y_axis: "Total Doses".into(),
        categories: SheetRange::data_column(pivot, 0),
        values: SheetRange::data_column(pivot, 1),
        anchor: (19, 1),
    }
}
