//! Correlation ranking: keep the strongest correlations by magnitude.

use tabkit_core::prelude::{
    AnalysisConfig, Column, DataType, Error, Field, RowBatch, Scalar, Schema, SortKey,
};

use crate::plan::OpPlan;
use crate::traits::{input_at, schema_at, OpError, Operator};

/// Name of the absolute-value column added by [`sort_correlations`].
pub const ABS_CORRELATION_COLUMN: &str = "Abs_Correlation";

/// Adds `|column|` as `abs_column`, sorts descending on it (stable), and
/// keeps the first `top_n` rows.
#[derive(Debug, Clone)]
pub struct SortCorrelations {
    pub column: String,
    pub abs_column: String,
    pub top_n: usize,
}

impl Default for SortCorrelations {
    fn default() -> Self {
        Self {
            column: "Correlation".to_string(),
            abs_column: ABS_CORRELATION_COLUMN.to_string(),
            top_n: 5,
        }
    }
}

impl SortCorrelations {
    pub fn from_config(cfg: &AnalysisConfig) -> Self {
        Self {
            column: cfg.correlation_column.clone(),
            abs_column: cfg.abs_column.clone(),
            top_n: cfg.top_n,
        }
    }
}

impl Operator for SortCorrelations {
    fn name(&self) -> &'static str {
        "sort_correlations"
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<OpPlan, OpError> {
        let schema = schema_at(input_schemas, 0, self.name())?;
        let field = schema.field_named(&self.column)?;
        if !matches!(
            field.data_type,
            DataType::Int64 | DataType::Float64 | DataType::Null
        ) {
            return Err(OpError::Plan(format!(
                "column '{}' is {:?}, expected a numeric type",
                self.column, field.data_type
            )));
        }
        // magnitudes are always floats; |i64::MIN| has no i64 form
        let abs_type = match field.data_type {
            DataType::Null => DataType::Null,
            _ => DataType::Float64,
        };
        let abs = Field::new(self.abs_column.clone(), abs_type, field.nullable);
        Ok(OpPlan::new(schema.clone().with_field(abs)))
    }

    fn eval(&self, inputs: &[RowBatch]) -> Result<RowBatch, OpError> {
        let input = input_at(inputs, 0, self.name())?;
        let source = input.column(&self.column)?;

        let abs_values = source
            .values
            .iter()
            .map(|v| abs_scalar(v, &self.column))
            .collect::<Result<Vec<_>, _>>()?;

        let mut ranked = input
            .clone()
            .with_column(Column::new(self.abs_column.clone(), abs_values))?;
        ranked.sort_by_columns(&[SortKey::desc(self.abs_column.clone())])?;
        let out = ranked.head(self.top_n);

        tracing::debug!(
            column = %self.column,
            rows_in = input.num_rows(),
            rows_out = out.num_rows(),
            top_n = self.top_n,
            "ranked correlations"
        );
        Ok(out)
    }
}

fn abs_scalar(v: &Scalar, column: &str) -> Result<Scalar, Error> {
    match v {
        Scalar::Null => Ok(Scalar::Null),
        Scalar::I64(i) => Ok(Scalar::F64((*i as f64).abs())),
        Scalar::F64(f) => Ok(Scalar::F64(f.abs())),
        other => Err(Error::Type {
            column: column.to_string(),
            expected: "number",
            found: other.type_name().to_string(),
        }),
    }
}

/// Rank `batch` by `|column|`, keeping the top `top_n` rows.
///
/// The result carries every original column plus `Abs_Correlation`. Rows
/// with equal magnitude keep their input order; missing values rank last.
pub fn sort_correlations(
    batch: &RowBatch,
    column: &str,
    top_n: usize,
) -> Result<RowBatch, OpError> {
    let op = SortCorrelations {
        column: column.to_string(),
        top_n,
        ..SortCorrelations::default()
    };
    op.eval(std::slice::from_ref(batch))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn years_batch(corr: Vec<Scalar>) -> RowBatch {
        let years = (2000..).take(corr.len()).map(Scalar::I64).collect();
        RowBatch::new(vec![
            Column::new("Year", years),
            Column::new("Correlation", corr),
        ])
        .unwrap()
    }

    #[test]
    fn keeps_top_n_by_magnitude() {
        let b = years_batch(vec![0.1.into(), (-0.2).into(), 0.3.into()]);
        let out = sort_correlations(&b, "Correlation", 2).unwrap();
        assert_eq!(out.column_names(), vec!["Year", "Correlation", "Abs_Correlation"]);
        assert_eq!(out.column("Year").unwrap().values, vec![Scalar::I64(2002), Scalar::I64(2001)]);
        assert_eq!(
            out.column("Abs_Correlation").unwrap().values,
            vec![Scalar::F64(0.3), Scalar::F64(0.2)]
        );
        assert_eq!(
            out.column("Correlation").unwrap().values[1],
            Scalar::F64(-0.2)
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let b = years_batch(vec![0.5.into(), (-0.5).into(), 0.1.into(), 0.5.into()]);
        let out = sort_correlations(&b, "Correlation", 10).unwrap();
        assert_eq!(
            out.column("Year").unwrap().values,
            vec![
                Scalar::I64(2000),
                Scalar::I64(2001),
                Scalar::I64(2003),
                Scalar::I64(2002)
            ]
        );
    }

    #[test]
    fn zero_top_n_keeps_columns() {
        let b = years_batch(vec![0.5.into()]);
        let out = sort_correlations(&b, "Correlation", 0).unwrap();
        assert_eq!(out.num_rows(), 0);
        assert_eq!(out.num_columns(), 3);
    }

    #[test]
    fn missing_rank_last() {
        let b = years_batch(vec![Scalar::Null, 0.1.into()]);
        let out = sort_correlations(&b, "Correlation", 2).unwrap();
        assert_eq!(out.column("Year").unwrap().values[0], Scalar::I64(2001));
        assert_eq!(out.column("Abs_Correlation").unwrap().values[1], Scalar::Null);
    }

    #[test]
    fn misnamed_column_fails() {
        let b = years_batch(vec![0.1.into()]);
        let err = sort_correlations(&b, "corr", 1).unwrap_err();
        assert!(matches!(err, OpError::Core(Error::ColumnNotFound(name)) if name == "corr"));
    }

    #[test]
    fn text_values_are_rejected() {
        let b = years_batch(vec!["high".into()]);
        let err = sort_correlations(&b, "Correlation", 1).unwrap_err();
        assert!(matches!(err, OpError::Core(Error::Type { .. })));
    }

    #[test]
    fn plan_adds_abs_field() {
        let b = years_batch(vec![0.1.into()]);
        let plan = SortCorrelations::default().plan(&[b.schema()]).unwrap();
        let names: Vec<_> = plan.output_schema.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Year", "Correlation", "Abs_Correlation"]);
    }

    #[test]
    fn integer_source_plans_and_yields_float_magnitudes() {
        let b = RowBatch::new(vec![
            Column::from_values("Year", [2000_i64, 2001]),
            Column::from_values("Correlation", [i64::MIN, 1]),
        ])
        .unwrap();
        let op = SortCorrelations::default();
        let plan = op.plan(&[b.schema()]).unwrap();
        let planned = plan.output_schema.field_named(ABS_CORRELATION_COLUMN).unwrap();
        assert_eq!(planned.data_type, DataType::Float64);

        let out = op.eval(&[b]).unwrap();
        assert_eq!(
            out.schema().field_named(ABS_CORRELATION_COLUMN).unwrap().data_type,
            DataType::Float64
        );
        assert_eq!(
            out.column(ABS_CORRELATION_COLUMN).unwrap().values,
            vec![Scalar::F64((i64::MIN as f64).abs()), Scalar::F64(1.0)]
        );
    }

    #[test]
    fn plan_rejects_text_column() {
        let b = years_batch(vec!["x".into()]);
        assert!(matches!(
            SortCorrelations::default().plan(&[b.schema()]),
            Err(OpError::Plan(_))
        ));
    }
}
