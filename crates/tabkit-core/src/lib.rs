#![forbid(unsafe_code)]
//! tabkit-core: the in-memory table model shared by every tabkit crate.
//!
//! A `RowBatch` is an ordered list of named, equal-length columns of
//! `Scalar` cells. Operators never mutate their inputs; they build new
//! batches from the helpers in `types`.

pub mod config;
pub mod error;
pub mod prelude;
pub mod schema;
pub mod types;

pub use error::{Error, Result};
