//! Lightweight cell/column/table types.
//!
//! A `RowBatch` is column-oriented: every `Column` holds one `Scalar` per
//! row and all columns have the same length. Row order is preserved by every
//! helper here unless the helper exists to reorder (`sort_by_columns`).

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::{DataType, Field, Schema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    Str(String),
}

impl Scalar {
    pub fn data_type(&self) -> DataType {
        match self {
            Scalar::Null => DataType::Null,
            Scalar::Bool(_) => DataType::Boolean,
            Scalar::I64(_) => DataType::Int64,
            Scalar::F64(_) => DataType::Float64,
            Scalar::Str(_) => DataType::Utf8,
        }
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::I64(_) => "int",
            Scalar::F64(_) => "float",
            Scalar::Str(_) => "string",
        }
    }

    /// Missing value: `Null`, or a float NaN.
    pub fn is_null(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::F64(f) => f.is_nan(),
            _ => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::I64(i) => Some(*i as f64),
            Scalar::F64(f) => Some(*f),
            _ => None,
        }
    }

    /// Integer view; floats qualify only when they carry no fraction.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::I64(i) => Some(*i),
            Scalar::F64(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::I64(i) => write!(f, "{}", i),
            Scalar::F64(x) => write!(f, "{}", x),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::I64(v as i64)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::I64(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::F64(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

impl From<&String> for Scalar {
    fn from(v: &String) -> Self {
        Scalar::Str(v.clone())
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Scalar::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Scalar>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Scalar>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Build a column from anything convertible into cells.
    pub fn from_values<I, T>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Scalar>,
    {
        Self::new(name, values.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One sort criterion for `RowBatch::sort_by_columns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }
}

/// In-memory table: named columns of equal length.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RowBatch {
    pub columns: Vec<Column>,
}

impl RowBatch {
    /// Build a batch, checking that names are unique and lengths agree.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(Error::DuplicateColumn(col.name.clone()));
            }
        }
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(Error::LengthMismatch {
                    column: bad.name.clone(),
                    expected,
                    found: bad.len(),
                });
            }
        }
        Ok(Self { columns })
    }

    /// Same column names, zero rows.
    pub fn empty_like(&self) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), Vec::new()))
                .collect(),
        }
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        let idx = self.column_index(name)?;
        Ok(&self.columns[idx])
    }

    /// Cells of row `idx`, in column order.
    pub fn row(&self, idx: usize) -> Option<Vec<&Scalar>> {
        if idx >= self.num_rows() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[idx]).collect())
    }

    /// Assign a column: replaces a same-named column in place, otherwise
    /// appends it at the end.
    pub fn with_column(mut self, column: Column) -> Result<Self> {
        let existing = self.columns.iter().position(|c| c.name == column.name);
        let others = self.columns.len() - usize::from(existing.is_some());
        if others > 0 && column.len() != self.num_rows() {
            return Err(Error::LengthMismatch {
                column: column.name,
                expected: self.num_rows(),
                found: column.values.len(),
            });
        }
        match existing {
            Some(idx) => self.columns[idx] = column,
            None => self.columns.push(column),
        }
        Ok(self)
    }

    /// Gather rows by index, in the order given.
    pub fn take(&self, indices: &[usize]) -> Result<Self> {
        let num_rows = self.num_rows();
        if let Some(&bad) = indices.iter().find(|&&i| i >= num_rows) {
            return Err(Error::Invariant(format!(
                "row index {} out of bounds for {} rows",
                bad, num_rows
            )));
        }
        let columns = self
            .columns
            .iter()
            .map(|col| Column {
                name: col.name.clone(),
                values: indices.iter().map(|&i| col.values[i].clone()).collect(),
            })
            .collect();
        Ok(Self { columns })
    }

    /// First `n` rows (all rows when `n` exceeds the row count).
    pub fn head(&self, n: usize) -> Self {
        let n = n.min(self.num_rows());
        let columns = self
            .columns
            .iter()
            .map(|col| Column {
                name: col.name.clone(),
                values: col.values[..n].to_vec(),
            })
            .collect();
        Self { columns }
    }

    /// Sort rows by the specified keys (in order).
    ///
    /// The sort is stable: rows that compare equal on every key keep their
    /// original relative order. Missing values (`Null`, NaN) go last in both
    /// directions.
    pub fn sort_by_columns(&mut self, sort_keys: &[SortKey]) -> Result<()> {
        let num_rows = self.num_rows();
        if num_rows == 0 {
            return Ok(());
        }

        let key_indices: Vec<(usize, bool)> = sort_keys
            .iter()
            .map(|key| {
                self.column_index(&key.column)
                    .map(|idx| (idx, key.descending))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut order: Vec<usize> = (0..num_rows).collect();
        order.sort_by(|&a, &b| {
            for &(col_idx, descending) in &key_indices {
                let values = &self.columns[col_idx].values;
                let ord = keyed_cmp(&values[a], &values[b], descending);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });

        *self = self.take(&order)?;
        Ok(())
    }

    /// Append the rows of `other` below the rows of `self`.
    ///
    /// The result carries the union of both column sets in first-seen order;
    /// cells a side does not have are filled with `Null`.
    pub fn append_rows(&self, other: &RowBatch) -> Result<Self> {
        let (top, bottom) = (self.num_rows(), other.num_rows());

        let mut names: Vec<&str> = self.column_names();
        for name in other.column_names() {
            if !names.contains(&name) {
                names.push(name);
            }
        }

        let columns = names
            .into_iter()
            .map(|name| {
                let mut values = Vec::with_capacity(top + bottom);
                match self.column(name) {
                    Ok(col) => values.extend(col.values.iter().cloned()),
                    Err(_) => values.resize(top, Scalar::Null),
                }
                match other.column(name) {
                    Ok(col) => values.extend(col.values.iter().cloned()),
                    Err(_) => values.resize(top + bottom, Scalar::Null),
                }
                Column::new(name, values)
            })
            .collect();

        RowBatch::new(columns)
    }

    /// Infer a schema from the first non-missing value of each column.
    pub fn schema(&self) -> Schema {
        let fields = self
            .columns
            .iter()
            .map(|col| {
                let data_type = col
                    .values
                    .iter()
                    .find(|v| !matches!(v, Scalar::Null))
                    .map(Scalar::data_type)
                    .unwrap_or(DataType::Null);
                let nullable = col.values.iter().any(Scalar::is_null);
                Field::new(col.name.clone(), data_type, nullable)
            })
            .collect();
        Schema::new(fields)
    }
}

/// Compare under a sort direction, keeping missing values last.
fn keyed_cmp(a: &Scalar, b: &Scalar, descending: bool) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = scalar_cmp(a, b);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
    }
}

/// Compare two present scalars. Ints and floats compare numerically.
fn scalar_cmp(a: &Scalar, b: &Scalar) -> Ordering {
    use Scalar::*;

    match (a, b) {
        (Bool(x), Bool(y)) => x.cmp(y),
        (I64(x), I64(y)) => x.cmp(y),
        (I64(_) | F64(_), I64(_) | F64(_)) => {
            let (x, y) = (a.as_f64().unwrap_or(f64::NAN), b.as_f64().unwrap_or(f64::NAN));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Str(x), Str(y)) => x.cmp(y),
        // Mixed types: order by variant order
        _ => scalar_type_order(a).cmp(&scalar_type_order(b)),
    }
}

/// Assign a numeric order to scalar types for mixed-type comparisons.
fn scalar_type_order(s: &Scalar) -> u8 {
    use Scalar::*;
    match s {
        Null => 0,
        Bool(_) => 1,
        I64(_) | F64(_) => 2,
        Str(_) => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> RowBatch {
        RowBatch::new(vec![
            Column::from_values("k", ["b", "a", "b", "a"]),
            Column::from_values("v", [2_i64, 3, 1, 1]),
        ])
        .unwrap()
    }

    #[test]
    fn new_rejects_ragged_columns() {
        let err = RowBatch::new(vec![
            Column::from_values("a", [1_i64, 2]),
            Column::from_values("b", [1_i64]),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { found: 1, .. }));
    }

    #[test]
    fn new_rejects_duplicate_names() {
        let err = RowBatch::new(vec![
            Column::from_values("a", [1_i64]),
            Column::from_values("a", [2_i64]),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateColumn(name) if name == "a"));
    }

    #[test]
    fn missing_column_is_a_lookup_error() {
        let err = batch().column("nope").unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound(name) if name == "nope"));
    }

    #[test]
    fn with_column_replaces_in_place() {
        let b = batch()
            .with_column(Column::from_values("k", ["x", "y", "z", "w"]))
            .unwrap();
        assert_eq!(b.column_names(), vec!["k", "v"]);
        assert_eq!(b.columns[0].values[2], Scalar::from("z"));
    }

    #[test]
    fn with_column_checks_length() {
        assert!(batch()
            .with_column(Column::from_values("extra", [1_i64]))
            .is_err());
    }

    #[test]
    fn multi_key_sort_is_stable() {
        let mut b = batch()
            .with_column(Column::from_values("id", [0_i64, 1, 2, 3]))
            .unwrap();
        b.sort_by_columns(&[SortKey::asc("k"), SortKey::desc("v")])
            .unwrap();
        assert_eq!(
            b.column("id").unwrap().values,
            vec![Scalar::I64(1), Scalar::I64(3), Scalar::I64(0), Scalar::I64(2)]
        );
    }

    #[test]
    fn missing_values_sort_last_both_ways() {
        let mut b = RowBatch::new(vec![Column::new(
            "x",
            vec![Scalar::Null, Scalar::F64(1.0), Scalar::F64(f64::NAN), Scalar::I64(2)],
        )])
        .unwrap();
        b.sort_by_columns(&[SortKey::desc("x")]).unwrap();
        assert_eq!(b.columns[0].values[0], Scalar::I64(2));
        assert_eq!(b.columns[0].values[1], Scalar::F64(1.0));
        assert!(b.columns[0].values[2].is_null());
        assert!(b.columns[0].values[3].is_null());
    }

    #[test]
    fn append_rows_unions_columns() {
        let top = RowBatch::new(vec![Column::from_values("a", [1_i64])]).unwrap();
        let bottom = RowBatch::new(vec![
            Column::from_values("b", ["x"]),
            Column::from_values("a", [2_i64]),
        ])
        .unwrap();
        let out = top.append_rows(&bottom).unwrap();
        assert_eq!(out.column_names(), vec!["a", "b"]);
        assert_eq!(out.column("a").unwrap().values, vec![Scalar::I64(1), Scalar::I64(2)]);
        assert_eq!(
            out.column("b").unwrap().values,
            vec![Scalar::Null, Scalar::from("x")]
        );
    }

    #[test]
    fn head_clamps_to_row_count() {
        assert_eq!(batch().head(10).num_rows(), 4);
        assert_eq!(batch().head(0).num_rows(), 0);
        assert_eq!(batch().head(0).column_names(), vec!["k", "v"]);
    }

    #[test]
    fn empty_like_keeps_names() {
        let e = batch().empty_like();
        assert_eq!(e.column_names(), vec!["k", "v"]);
        assert_eq!(e.num_rows(), 0);
    }

    #[test]
    fn take_rejects_out_of_range() {
        assert!(batch().take(&[0, 4]).is_err());
    }

    #[test]
    fn schema_skips_leading_nulls() {
        let b = RowBatch::new(vec![Column::new(
            "x",
            vec![Scalar::Null, Scalar::F64(0.5)],
        )])
        .unwrap();
        let schema = b.schema();
        assert_eq!(schema.fields[0].data_type, DataType::Float64);
        assert!(schema.fields[0].nullable);
    }

    #[test]
    fn integer_view_of_whole_floats() {
        assert_eq!(Scalar::F64(1999.0).as_i64(), Some(1999));
        assert_eq!(Scalar::F64(1999.5).as_i64(), None);
        assert_eq!(Scalar::from("1999").as_i64(), None);
    }
}
