//! Decade labels for years.
//!
//! Bands are checked in declaration order and the first match wins. The
//! 1990 band closes inclusively at 2000, so 2000 resolves to "1990" even
//! though the 2000 band also starts there. 2012..=2016, anything before 1970
//! and anything from 2021 on fall in no band.

use tabkit_core::prelude::{AnalysisConfig, Column, DataType, Error, Field, RowBatch, Scalar, Schema};

use crate::plan::OpPlan;
use crate::traits::{input_at, schema_at, OpError, Operator};

struct Band {
    start: i64,
    end: i64,
    end_inclusive: bool,
    label: &'static str,
}

impl Band {
    const fn half_open(start: i64, end: i64, label: &'static str) -> Self {
        Self {
            start,
            end,
            end_inclusive: false,
            label,
        }
    }

    fn contains(&self, year: i64) -> bool {
        year >= self.start && (year < self.end || (self.end_inclusive && year == self.end))
    }
}

const BANDS: [Band; 6] = [
    Band::half_open(1970, 1980, "1970"),
    Band::half_open(1980, 1990, "1980"),
    Band {
        start: 1990,
        end: 2000,
        end_inclusive: true,
        label: "1990",
    },
    Band::half_open(2000, 2008, "2000"),
    Band::half_open(2008, 2012, "2008-12"),
    Band::half_open(2017, 2021, "2017-21"),
];

/// Decade label for `year`, or `None` when it falls in no band.
pub fn get_decade(year: i64) -> Option<&'static str> {
    BANDS.iter().find(|b| b.contains(year)).map(|b| b.label)
}

/// Every label `get_decade` can return, oldest first.
pub fn decade_labels() -> impl Iterator<Item = &'static str> {
    BANDS.iter().map(|b| b.label)
}

/// Adds a decade label column derived from a year column.
///
/// Years outside every band, and missing years, get `Null`.
#[derive(Debug, Clone)]
pub struct AssignDecade {
    pub year_column: String,
    pub decade_column: String,
}

impl Default for AssignDecade {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl AssignDecade {
    pub fn from_config(cfg: &AnalysisConfig) -> Self {
        Self {
            year_column: cfg.year_column.clone(),
            decade_column: cfg.decade_column.clone(),
        }
    }

    fn label_for(&self, cell: &Scalar) -> Result<Scalar, Error> {
        if cell.is_null() {
            return Ok(Scalar::Null);
        }
        let year = match cell {
            Scalar::Str(s) => s.trim().parse::<i64>().ok(),
            other => other.as_i64(),
        }
        .ok_or_else(|| Error::Type {
            column: self.year_column.clone(),
            expected: "integer year",
            found: cell.to_string(),
        })?;
        Ok(get_decade(year).map(Scalar::from).unwrap_or(Scalar::Null))
    }
}

impl Operator for AssignDecade {
    fn name(&self) -> &'static str {
        "assign_decade"
    }

    fn plan(&self, input_schemas: &[Schema]) -> Result<OpPlan, OpError> {
        let schema = schema_at(input_schemas, 0, self.name())?;
        let field = schema.field_named(&self.year_column)?;
        if field.data_type == DataType::Boolean {
            return Err(OpError::Plan(format!(
                "year column '{}' holds booleans",
                self.year_column
            )));
        }
        let decade = Field::new(self.decade_column.clone(), DataType::Utf8, true);
        Ok(OpPlan::new(schema.clone().with_field(decade)))
    }

    fn eval(&self, inputs: &[RowBatch]) -> Result<RowBatch, OpError> {
        let input = input_at(inputs, 0, self.name())?;
        let years = input.column(&self.year_column)?;

        let labels = years
            .values
            .iter()
            .map(|cell| self.label_for(cell))
            .collect::<Result<Vec<_>, _>>()?;

        let unmapped = labels.iter().filter(|l| l.is_null()).count();
        tracing::debug!(rows = labels.len(), unmapped, "assigned decades");

        Ok(input
            .clone()
            .with_column(Column::new(self.decade_column.clone(), labels))?)
    }
}

/// Label every row of `batch` with the decade of its `year_col`.
pub fn assign_decade(
    batch: &RowBatch,
    year_col: &str,
    decade_col: &str,
) -> Result<RowBatch, OpError> {
    let op = AssignDecade {
        year_column: year_col.to_string(),
        decade_column: decade_col.to_string(),
    };
    op.eval(std::slice::from_ref(batch))
}
