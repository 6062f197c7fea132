//! Operator planning surface.

use serde::{Deserialize, Serialize};
use tabkit_core::prelude::Schema;

/// Operator plan: the output schema an operator will produce, plus the
/// columns it matches rows on (if any).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpPlan {
    pub output_schema: Schema,

    /// Key columns used to correlate inputs (reconciliation only today).
    pub key_columns: Vec<String>,
}

impl OpPlan {
    pub fn new(output_schema: Schema) -> Self {
        Self {
            output_schema,
            key_columns: vec![],
        }
    }

    pub fn with_key_columns(mut self, cols: Vec<String>) -> Self {
        self.key_columns = cols;
        self
    }
}
