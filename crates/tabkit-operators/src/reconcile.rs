//! Reconcile a per-year counts table against a rate table.
//!
//! Counties that appear in the rate table but have no counts row get a
//! synthesized row of zeros so both tables cover the same key set.

use std::collections::{BTreeMap, HashSet};

use tabkit_core::prelude::{AnalysisConfig, Column, DataType, RowBatch, Scalar, Schema};

use crate::plan::OpPlan;
use crate::traits::{input_at, schema_at, OpError, Operator};

/// Default key column shared by the rate and counts tables.
pub const COUNTY_STATE_KEY: &str = "county_state";

/// Two-input operator: `inputs[0]` is the rate table, `inputs[1]` the counts
/// table. Output has the counts schema.
#[derive(Debug, Clone)]
pub struct UpdateData {
    pub key_column: String,
}

impl Default for UpdateData {
    fn default() -> Self {
        Self {
            key_column: COUNTY_STATE_KEY.to_string(),
        }
    }
}

impl Operator for UpdateData {
    fn name(&self) -> &'static str {
        "update_data"
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<OpPlan, OpError> {
        if input_schemas.len() != 2 {
            return Err(OpError::Plan(format!(
                "update_data expects two inputs, got {}",
                input_schemas.len()
            )));
        }
        schema_at(input_schemas, 0, self.name())?.field_named(&self.key_column)?;
        let counts = schema_at(input_schemas, 1, self.name())?;
        counts.field_named(&self.key_column)?;
        Ok(OpPlan::new(counts.clone()).with_key_columns(vec![self.key_column.clone()]))
    }

    fn eval(&self, inputs: &[RowBatch]) -> Result<RowBatch, OpError> {
        let rate = input_at(inputs, 0, self.name())?;
        let counts = input_at(inputs, 1, self.name())?;
        self.reconcile(rate, counts)
    }
}

impl UpdateData {
    pub fn from_config(cfg: &AnalysisConfig) -> Self {
        Self {
            key_column: cfg.key_column.clone(),
        }
    }

    /// Borrowing form of `eval` for callers holding the two tables apart.
    pub fn reconcile(&self, rate: &RowBatch, counts: &RowBatch) -> Result<RowBatch, OpError> {
        let missing = missing_cells(rate, counts, &self.key_column)?;
        if missing.is_empty() {
            tracing::debug!(rows = counts.num_rows(), "counts already cover every rate key");
            return Ok(counts.clone());
        }

        let schema = counts.schema();
        let filler = counts
            .columns
            .iter()
            .zip(&schema.fields)
            .map(|(col, field)| {
                let values = if col.name == self.key_column {
                    missing.values().cloned().collect()
                } else {
                    vec![zero_for(field.data_type); missing.len()]
                };
                Column::new(col.name.clone(), values)
            })
            .collect();
        let filler = RowBatch::new(filler)?;

        tracing::debug!(
            key = %self.key_column,
            existing = counts.num_rows(),
            missing = missing.len(),
            "appending zero-count rows"
        );
        Ok(counts.append_rows(&filler)?)
    }
}

/// Zero in the column's own numeric flavour.
fn zero_for(data_type: DataType) -> Scalar {
    match data_type {
        DataType::Float64 => Scalar::F64(0.0),
        _ => Scalar::I64(0),
    }
}

/// Rate-table key cells with no counts row, keyed and ordered by their text.
fn missing_cells(
    rate: &RowBatch,
    counts: &RowBatch,
    key_col: &str,
) -> Result<BTreeMap<String, Scalar>, OpError> {
    let rate_keys = rate.column(key_col)?;
    let present: HashSet<String> = counts
        .column(key_col)?
        .values
        .iter()
        .filter(|v| !v.is_null())
        .map(|v| v.to_string())
        .collect();

    let mut missing = BTreeMap::new();
    for cell in rate_keys.values.iter().filter(|v| !v.is_null()) {
        let text = cell.to_string();
        if !present.contains(&text) {
            missing.entry(text).or_insert_with(|| cell.clone());
        }
    }
    Ok(missing)
}

/// Keys present in `rate` but absent from `counts`, sorted and deduplicated.
pub fn missing_keys(
    rate: &RowBatch,
    counts: &RowBatch,
    key_col: &str,
) -> Result<Vec<String>, OpError> {
    Ok(missing_cells(rate, counts, key_col)?.into_keys().collect())
}

/// Append a zero row to `counts` for every `key_col` value that only the
/// rate table has.
///
/// Every non-key column of `counts` is treated as a year column and gets a
/// zero. Existing rows are untouched and come first; synthesized rows follow
/// in sorted key order.
pub fn update_data(
    rate: &RowBatch,
    counts: &RowBatch,
    key_col: &str,
) -> Result<RowBatch, OpError> {
    let op = UpdateData {
        key_column: key_col.to_string(),
    };
    op.reconcile(rate, counts)
}
