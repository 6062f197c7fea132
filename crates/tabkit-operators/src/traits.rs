//! Operator trait + common interfaces.
//!
//! Callers may `plan(...)` with input schemas to learn the output schema and
//! catch misnamed columns early, then `eval(...)` on concrete batches.

use tabkit_core::prelude::{RowBatch, Schema};

use crate::plan::OpPlan;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpError {
    #[error("planning error: {0}")]
    Plan(String),

    #[error("execution error: {0}")]
    Exec(String),

    #[error(transparent)]
    Core(#[from] tabkit_core::Error),
}

/// Trait that all operators implement.
///
/// Invariants:
/// - `eval` never mutates its inputs and returns a fresh batch.
/// - `eval` is deterministic given the same inputs.
pub trait Operator: Send + Sync + 'static {
    /// Human-readable operator name (stable).
    fn name(&self) -> &'static str;

    /// Given input schemas, return the output schema without touching data.
    fn plan(&self, input_schemas: &[Schema]) -> Result<OpPlan, OpError>;

    /// Evaluate over concrete inputs. Unary operators read `inputs[0]`.
    fn eval(&self, inputs: &[RowBatch]) -> Result<RowBatch, OpError>;
}

/// Fetch the `idx`-th batch or fail with the operator's name attached.
pub(crate) fn input_at<'a>(
    inputs: &'a [RowBatch],
    idx: usize,
    op: &str,
) -> Result<&'a RowBatch, OpError> {
    inputs
        .get(idx)
        .ok_or_else(|| OpError::Exec(format!("{} is missing input {}", op, idx)))
}

/// Fetch the `idx`-th schema during planning.
pub(crate) fn schema_at<'a>(
    schemas: &'a [Schema],
    idx: usize,
    op: &str,
) -> Result<&'a Schema, OpError> {
    schemas
        .get(idx)
        .ok_or_else(|| OpError::Plan(format!("{} expects input schema {}", op, idx)))
}
