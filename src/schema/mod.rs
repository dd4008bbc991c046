pub mod arrow;
pub mod tables;
pub mod types;

pub use self::arrow::{build_arrow_schema, map_to_arrow_type};
pub use types::Column;
