#![forbid(unsafe_code)]
//! tabkit-operators: the table transformations used by the analysis notebook.
//!
//! Every routine is available twice:
//! - as a free function with the notebook's default column names, and
//! - as an `Operator` value whose column names come from `AnalysisConfig`,
//!   with a `plan(...)` step that checks input schemas before any data moves.
//!
//! All operators are pure and synchronous; inputs are never mutated.

pub mod plan;
pub mod traits;

pub mod decade;
pub mod key;
pub mod location;
pub mod rank;
pub mod reconcile;
pub mod reshape;

pub use decade::{assign_decade, get_decade, AssignDecade};
pub use key::{add_county_state_key, county_state_key, AddCountyStateKey};
pub use location::{parse_state_county, ParseStateCounty};
pub use plan::OpPlan;
pub use rank::{sort_correlations, SortCorrelations};
pub use reconcile::{missing_keys, update_data, UpdateData};
pub use reshape::create_correlation_df;
pub use traits::{OpError, Operator};
