#![forbid(unsafe_code)]
//! tabkit: tabular helpers for county-level exploratory analysis.
//!
//! Re-exports the workspace crates under one roof:
//! - [`model`]: `RowBatch` table model, schema, config, errors
//! - [`operators`]: correlation ranking, location parsing, decades, reconciliation
//! - [`io`]: CSV / NDJSON readers and writers

pub use tabkit_core as model;
pub use tabkit_io as io;
pub use tabkit_operators as operators;

pub use tabkit_core::prelude::*;
pub use tabkit_operators::{
    add_county_state_key, assign_decade, create_correlation_df, get_decade, missing_keys,
    parse_state_county, sort_correlations, update_data, OpError, Operator,
};
