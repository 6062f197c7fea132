#![forbid(unsafe_code)]
//! tabkit-io: load source tables from CSV and write results back out.
//!
//! Readers materialize a whole file into one `RowBatch`; the tables this
//! crate serves are small enough that streaming would only add ceremony.

pub mod error;
pub mod readers;
pub mod writers;

pub use error::{Error, Result};
pub use readers::csv::CsvReader;
pub use writers::csv::CsvWriter;
pub use writers::jsonl::JsonlWriter;
