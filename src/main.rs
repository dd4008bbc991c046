use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use vaxreport::{
    data::ReferenceTables,
    process,
    report::{write_report, ReportLayout, OUTPUT_FILE},
};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) build the reference tables ───────────────────────────────
    let reference = ReferenceTables::build()?;

    // ─── 3) join & aggregate ─────────────────────────────────────────
    let tables = process::build_report_tables(reference)?;

    // ─── 4) lay out sheets, formula and charts ───────────────────────
    let layout = ReportLayout::assemble(&tables)?;

    // ─── 5) render in memory, write once ─────────────────────────────
    write_report(&layout, OUTPUT_FILE)?;

    println!("Excel file created: {}", OUTPUT_FILE);
    Ok(())
}
