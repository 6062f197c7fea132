//! Split a mixed "state, then its counties" location column.
//!
//! Source tables list a state name row followed by that state's county rows
//! ("Travis County, TX"). The parser walks the rows in order, remembers the
//! last state it saw, and keeps only county rows tagged with that state.

use tabkit_core::prelude::{
    AnalysisConfig, Column, DataType, Error, Field, RowBatch, Scalar, Schema,
};

use crate::plan::OpPlan;
use crate::traits::{input_at, schema_at, OpError, Operator};

#[derive(Debug, Clone)]
pub struct ParseStateCounty {
    pub location_column: String,
    pub state_column: String,
    pub county_column: String,
    /// A location containing this substring is a county row.
    pub marker: String,
}

impl Default for ParseStateCounty {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl ParseStateCounty {
    pub fn new(location_column: impl Into<String>) -> Self {
        Self {
            location_column: location_column.into(),
            ..Self::default()
        }
    }

    pub fn from_config(cfg: &AnalysisConfig) -> Self {
        Self {
            location_column: cfg.location_column.clone(),
            state_column: cfg.state_column.clone(),
            county_column: cfg.county_column.clone(),
            marker: cfg.county_marker.clone(),
        }
    }
}

impl Operator for ParseStateCounty {
    fn name(&self) -> &'static str {
        "parse_state_county"
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<OpPlan, OpError> {
        let schema = schema_at(input_schemas, 0, self.name())?;
        let field = schema.field_named(&self.location_column)?;
        if !matches!(field.data_type, DataType::Utf8 | DataType::Null) {
            return Err(OpError::Plan(format!(
                "location column '{}' is {:?}, expected text",
                self.location_column, field.data_type
            )));
        }
        let out = schema
            .clone()
            .with_field(Field::new(self.state_column.clone(), DataType::Utf8, false))
            .with_field(Field::new(self.county_column.clone(), DataType::Utf8, false));
        Ok(OpPlan::new(out))
    }

    fn eval(&self, inputs: &[RowBatch]) -> Result<RowBatch, OpError> {
        let input = input_at(inputs, 0, self.name())?;
        let locations = input.column(&self.location_column)?;

        let mut current_state = String::new();
        let mut keep = Vec::new();
        let mut states = Vec::new();
        let mut counties = Vec::new();

        for (row, cell) in locations.values.iter().enumerate() {
            let text = cell.as_str().ok_or_else(|| Error::Type {
                column: self.location_column.clone(),
                expected: "string",
                found: cell.type_name().to_string(),
            })?;
            if text.contains(self.marker.as_str()) {
                keep.push(row);
                states.push(Scalar::Str(current_state.clone()));
                counties.push(Scalar::Str(text.to_string()));
            } else {
                current_state = text.to_string();
            }
        }

        tracing::debug!(
            rows_in = input.num_rows(),
            counties = keep.len(),
            states_seen = input.num_rows() - keep.len(),
            "parsed state/county rows"
        );

        let out = input
            .take(&keep)?
            .with_column(Column::new(self.state_column.clone(), states))?
            .with_column(Column::new(self.county_column.clone(), counties))?;
        Ok(out)
    }
}

/// Keep the county rows of `batch`, tagged with the most recent state row.
///
/// Adds `State` and `County` columns. A county listed before any state row
/// gets an empty state.
pub fn parse_state_county(batch: &RowBatch, location_col: &str) -> Result<RowBatch, OpError> {
    ParseStateCounty::new(location_col).eval(std::slice::from_ref(batch))
}
