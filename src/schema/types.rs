// src/schema/types.rs

/// A single column definition: name plus a SQL-ish type tag.
#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash)]
pub struct Column {
    pub name: &'static str,
    pub ty: &'static str,
}

impl Column {
    pub const fn new(name: &'static str, ty: &'static str) -> Self {
        Self { name, ty }
    }
}
