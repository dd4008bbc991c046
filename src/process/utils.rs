use anyhow::{anyhow, Result};
use arrow::array::Array;
use arrow::record_batch::RecordBatch;

/// Look up `name` in `batch` and downcast it to the concrete array type `T`.
pub fn typed_column<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    let col = batch
        .column_by_name(name)
        .ok_or_else(|| anyhow!("missing column `{}`", name))?;
    col.as_any().downcast_ref::<T>().ok_or_else(|| {
        anyhow!(
            "column `{}` has type {:?}, expected {}",
            name,
            col.data_type(),
            std::any::type_name::<T>()
        )
    })
}
