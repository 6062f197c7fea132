//! County/state join keys.

use tabkit_core::prelude::{AnalysisConfig, Column, DataType, Field, RowBatch, Scalar, Schema};

use crate::plan::OpPlan;
use crate::traits::{input_at, schema_at, OpError, Operator};

pub const KEY_SEPARATOR: &str = ", ";

/// Join a county and a state into the key shared by rate and counts tables.
pub fn county_state_key(county: &str, state: &str) -> String {
    format!("{}{}{}", county.trim(), KEY_SEPARATOR, state.trim())
}

/// Adds a `county_state` key column built from a county and a state column.
///
/// A row missing either part gets a `Null` key.
#[derive(Debug, Clone)]
pub struct AddCountyStateKey {
    pub county_column: String,
    pub state_column: String,
    pub key_column: String,
}

impl Default for AddCountyStateKey {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl AddCountyStateKey {
    pub fn from_config(cfg: &AnalysisConfig) -> Self {
        Self {
            county_column: cfg.county_column.clone(),
            state_column: cfg.state_column.clone(),
            key_column: cfg.key_column.clone(),
        }
    }
}

impl Operator for AddCountyStateKey {
    fn name(&self) -> &'static str {
        "add_county_state_key"
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<OpPlan, OpError> {
        let schema = schema_at(input_schemas, 0, self.name())?;
        schema.field_named(&self.county_column)?;
        schema.field_named(&self.state_column)?;
        let key = Field::new(self.key_column.clone(), DataType::Utf8, true);
        Ok(OpPlan::new(schema.clone().with_field(key))
            .with_key_columns(vec![self.key_column.clone()]))
    }

    fn eval(&self, inputs: &[RowBatch]) -> Result<RowBatch, OpError> {
        let input = input_at(inputs, 0, self.name())?;
        let counties = input.column(&self.county_column)?;
        let states = input.column(&self.state_column)?;

        let keys: Vec<Scalar> = counties
            .values
            .iter()
            .zip(&states.values)
            .map(|(county, state)| {
                if county.is_null() || state.is_null() {
                    Scalar::Null
                } else {
                    Scalar::Str(county_state_key(&county.to_string(), &state.to_string()))
                }
            })
            .collect();

        tracing::trace!(rows = keys.len(), key = %self.key_column, "built county/state keys");

        Ok(input
            .clone()
            .with_column(Column::new(self.key_column.clone(), keys))?)
    }
}

/// Add a `key_col` column joining `county_col` and `state_col`.
pub fn add_county_state_key(
    batch: &RowBatch,
    county_col: &str,
    state_col: &str,
    key_col: &str,
) -> Result<RowBatch, OpError> {
    let op = AddCountyStateKey {
        county_column: county_col.to_string(),
        state_column: state_col.to_string(),
        key_column: key_col.to_string(),
    };
    op.eval(std::slice::from_ref(batch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_trimmed_parts() {
        assert_eq!(county_state_key(" Travis ", "Texas"), "Travis, Texas");
    }

    #[test]
    fn missing_part_gives_null_key() {
        let b = RowBatch::new(vec![
            Column::new("County", vec![Scalar::from("Lane"), Scalar::from("Benton")]),
            Column::new("State", vec![Scalar::from("Oregon"), Scalar::Null]),
        ])
        .unwrap();
        let out = add_county_state_key(&b, "County", "State", "county_state").unwrap();
        assert_eq!(
            out.column("county_state").unwrap().values,
            vec![Scalar::from("Lane, Oregon"), Scalar::Null]
        );
    }

    #[test]
    fn plan_marks_key_column() {
        let b = RowBatch::new(vec![
            Column::from_values("County", ["Lane"]),
            Column::from_values("State", ["Oregon"]),
        ])
        .unwrap();
        let plan = AddCountyStateKey::default().plan(&[b.schema()]).unwrap();
        assert_eq!(plan.key_columns, vec!["county_state".to_string()]);
        assert_eq!(plan.output_schema.fields.len(), 3);
    }
}
