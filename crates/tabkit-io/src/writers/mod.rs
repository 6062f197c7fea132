//! Writers for finished tables.

pub mod csv;
pub mod jsonl;
