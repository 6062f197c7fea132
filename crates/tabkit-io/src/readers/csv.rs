//! CSV reader with per-column type inference.
//!
//! A column becomes `I64` when every non-empty cell parses as an integer,
//! `F64` when every non-empty cell parses as a number, `Bool` for
//! `true`/`false`, and text otherwise. Empty cells are `Null`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tabkit_core::types::{Column, RowBatch, Scalar};

use crate::error::Result;

pub struct CsvReader<R: Read> {
    inner: ::csv::Reader<R>,
}

impl CsvReader<File> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let inner = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path.as_ref())?;
        Ok(Self { inner })
    }
}

impl<R: Read> CsvReader<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            inner: ::csv::ReaderBuilder::new()
                .has_headers(true)
                .from_reader(reader),
        }
    }

    /// Read every record into a single batch.
    pub fn read_all(mut self) -> Result<RowBatch> {
        let headers: Vec<String> = self.inner.headers()?.iter().map(str::to_string).collect();
        let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

        for record in self.inner.records() {
            let record = record?;
            for (col, field) in raw.iter_mut().zip(record.iter()) {
                col.push(field.to_string());
            }
        }

        let columns = headers
            .into_iter()
            .zip(raw)
            .map(|(name, cells)| Column::new(name, infer_column(&cells)))
            .collect();
        let batch = RowBatch::new(columns)?;

        tracing::debug!(
            rows = batch.num_rows(),
            columns = batch.num_columns(),
            "read csv"
        );
        Ok(batch)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Inferred {
    Int,
    Float,
    Bool,
    Text,
}

fn classify(cell: &str) -> Inferred {
    if cell.parse::<i64>().is_ok() {
        Inferred::Int
    } else if cell.bytes().any(|b| b.is_ascii_digit()) && cell.parse::<f64>().is_ok() {
        Inferred::Float
    } else if cell == "true" || cell == "false" {
        Inferred::Bool
    } else {
        Inferred::Text
    }
}

fn infer_column(cells: &[String]) -> Vec<Scalar> {
    let kind = cells
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(classify)
        .fold(None, |acc: Option<Inferred>, k| {
            Some(match acc {
                None => k,
                Some(prev) if prev == k => k,
                Some(Inferred::Int | Inferred::Float) if matches!(k, Inferred::Int | Inferred::Float) => {
                    Inferred::Float
                }
                Some(_) => Inferred::Text,
            })
        });

    cells
        .iter()
        .map(|cell| {
            let trimmed = cell.trim();
            if trimmed.is_empty() {
                return Scalar::Null;
            }
            match kind {
                Some(Inferred::Int) => trimmed.parse().map(Scalar::I64).unwrap_or(Scalar::Null),
                Some(Inferred::Float) => trimmed.parse().map(Scalar::F64).unwrap_or(Scalar::Null),
                Some(Inferred::Bool) => Scalar::Bool(trimmed == "true"),
                _ => Scalar::Str(cell.clone()),
            }
        })
        .collect()
}
