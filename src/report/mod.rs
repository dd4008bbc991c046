pub mod chart;
pub mod layout;
pub mod sheet;
pub mod workbook;

pub use layout::{ReportLayout, OUTPUT_FILE};
pub use workbook::{render_workbook, write_report};
