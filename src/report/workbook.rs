// src/report/workbook.rs
//! Renders a [`ReportLayout`] to XLSX bytes and writes them out in one go.

use anyhow::{anyhow, Context, Result};
use chrono::Datelike;
use rust_xlsxwriter::{
    Chart, ChartType, ExcelDateTime, Format, FormatAlign, FormatBorder, Formula, Workbook,
    Worksheet,
};
use std::{
    fs::{self, File},
    io::Write,
    path::Path,
    time::Instant,
};
use tracing::{debug, info};

use super::chart::{ChartKind, ChartSpec};
use super::layout::ReportLayout;
use super::sheet::{Cell, SheetGrid};

struct SheetFormats {
    header: Format,
    date: Format,
}

impl SheetFormats {
    fn new() -> Self {
        let header = Format::new()
            .set_bold()
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::Top);
        let date = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
        Self { header, date }
    }
}

/// Build the whole workbook in memory and return the XLSX bytes.
#[tracing::instrument(level = "info", skip_all)]
pub fn render_workbook(layout: &ReportLayout) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let formats = SheetFormats::new();

    for grid in &layout.sheets {
        let sheet = workbook.add_worksheet();
        write_grid(sheet, grid, &formats).with_context(|| format!("writing sheet {}", grid.name))?;
        debug!(sheet = %grid.name, rows = grid.rows.len(), "sheet written");
    }

    let sheet = workbook.add_worksheet();
    sheet
        .set_name(layout.charts_sheet.as_str())
        .with_context(|| format!("naming sheet {}", layout.charts_sheet))?;
    for spec in &layout.charts {
        let chart = build_chart(spec);
        sheet
            .insert_chart(spec.anchor.0, spec.anchor.1, &chart)
            .with_context(|| format!("inserting chart {:?}", spec.title))?;
    }

    workbook.save_to_buffer().context("serializing workbook")
}

fn write_grid(sheet: &mut Worksheet, grid: &SheetGrid, formats: &SheetFormats) -> Result<()> {
    sheet.set_name(grid.name.as_str())?;
    for (col, header) in grid.header.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, header.as_str(), &formats.header)?;
    }
    for (r, row) in grid.rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            write_cell(sheet, r as u32 + 1, c as u16, cell, formats)?;
        }
    }
    Ok(())
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    formats: &SheetFormats,
) -> Result<()> {
    match cell {
        Cell::Empty => {}
        Cell::Text(s) => {
            sheet.write_string(row, col, s.as_str())?;
        }
        Cell::Integer(v) => {
            sheet.write_number(row, col, *v as f64)?;
        }
        Cell::Number(v) => {
            sheet.write_number(row, col, *v)?;
        }
        Cell::Date(d) => {
            let year = u16::try_from(d.year()).map_err(|_| anyhow!("year out of range: {}", d))?;
            let dt = ExcelDateTime::from_ymd(year, d.month() as u8, d.day() as u8)?;
            sheet.write_datetime_with_format(row, col, &dt, &formats.date)?;
        }
        Cell::Formula { expr, cached } => {
            let mut formula = Formula::new(expr.as_str());
            if let Some(v) = cached {
                formula = formula.set_result(v.to_string());
            }
            sheet.write_formula(row, col, formula)?;
        }
    }
    Ok(())
}

fn build_chart(spec: &ChartSpec) -> Chart {
    let mut chart = Chart::new(match spec.kind {
        ChartKind::Column => ChartType::Column,
        ChartKind::Line => ChartType::Line,
    });
    chart
        .add_series()
        .set_name(spec.series_name.as_str())
        .set_categories(spec.categories.as_tuple())
        .set_values(spec.values.as_tuple());
    chart.title().set_name(spec.title.as_str());
    chart.x_axis().set_name(spec.x_axis.as_str());
    chart.y_axis().set_name(spec.y_axis.as_str());
    chart
}

/// Render `layout` and write it to `path`.
///
/// The workbook is fully rendered before the file is touched, written to a
/// hidden temp file beside `path`, then renamed over it. Returns bytes written.
#[tracing::instrument(level = "info", skip(layout, path), fields(target = %path.as_ref().display()))]
pub fn write_report<P: AsRef<Path>>(layout: &ReportLayout, path: P) -> Result<u64> {
    let start = Instant::now();
    let path = path.as_ref();
    let bytes = render_workbook(layout)?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("invalid output path {}", path.display()))?;
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let written = (|| -> Result<()> {
        let mut tmp = File::create(&tmp_path)
            .with_context(|| format!("creating {}", tmp_path.display()))?;
        tmp.write_all(&bytes)
            .with_context(|| format!("writing {}", tmp_path.display()))?;
        tmp.sync_all()
            .with_context(|| format!("syncing {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path)
            .with_context(|| format!("renaming {} -> {}", tmp_path.display(), path.display()))
    })();
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    info!(bytes = bytes.len(), elapsed = ?start.elapsed(), "report written");
    Ok(bytes.len() as u64)
}
