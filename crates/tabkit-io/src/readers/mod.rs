//! Readers that produce a `RowBatch`.

pub mod csv;
