pub mod data;
pub mod process;
pub mod report;
pub mod schema;
