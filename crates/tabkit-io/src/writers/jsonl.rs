//! NDJSON writer: one JSON object per row.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::{Map, Value};
use tabkit_core::types::{RowBatch, Scalar};

use crate::error::Result;

pub struct JsonlWriter<W: Write> {
    writer: BufWriter<W>,
}

impl JsonlWriter<File> {
    pub fn to_path(path: impl AsRef<Path>) -> Result<Self> {
        let f = File::create(path)?;
        Ok(Self::to_writer(f))
    }
}

impl<W: Write> JsonlWriter<W> {
    pub fn to_writer(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Write a batch as one JSON object per line, keys in column order.
    pub fn write_batch(&mut self, batch: &RowBatch) -> Result<()> {
        for r in 0..batch.num_rows() {
            let obj: Map<String, Value> = batch
                .columns
                .iter()
                .map(|col| (col.name.clone(), scalar_to_json(&col.values[r])))
                .collect();
            let line = serde_json::to_string(&obj)?;
            writeln!(self.writer, "{}", line)?;
        }
        self.writer.flush()?;
        tracing::trace!(rows = batch.num_rows(), "wrote jsonl batch");
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::Error::Io(e.into_error()))
    }
}

fn scalar_to_json(v: &Scalar) -> Value {
    use Scalar::*;
    match v {
        Null => Value::Null,
        Bool(b) => Value::Bool(*b),
        I64(i) => Value::from(*i),
        // NaN has no JSON form
        F64(f) if f.is_nan() => Value::Null,
        F64(f) => Value::from(*f),
        Str(s) => Value::String(s.clone()),
    }
}
