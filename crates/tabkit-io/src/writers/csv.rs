//! CSV writer. Missing values are written as empty fields.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tabkit_core::types::RowBatch;

use crate::error::{Error, Result};

pub struct CsvWriter<W: Write> {
    inner: ::csv::Writer<W>,
    // header written with the first batch; later batches must match it
    columns: Option<Vec<String>>,
}

impl CsvWriter<File> {
    pub fn to_path(path: impl AsRef<Path>) -> Result<Self> {
        let f = File::create(path)?;
        Ok(Self::to_writer(f))
    }
}

impl<W: Write> CsvWriter<W> {
    pub fn to_writer(writer: W) -> Self {
        Self {
            inner: ::csv::Writer::from_writer(writer),
            columns: None,
        }
    }

    pub fn write_batch(&mut self, batch: &RowBatch) -> Result<()> {
        let names: Vec<String> = batch.columns.iter().map(|c| c.name.clone()).collect();
        match &self.columns {
            None => {
                self.inner.write_record(&names)?;
                self.columns = Some(names);
            }
            Some(existing) if *existing != names => {
                return Err(Error::Format(format!(
                    "batch columns {:?} do not match header {:?}",
                    names, existing
                )));
            }
            Some(_) => {}
        }

        for r in 0..batch.num_rows() {
            let record: Vec<String> = batch.columns.iter().map(|c| c.values[r].to_string()).collect();
            self.inner.write_record(&record)?;
        }
        self.inner.flush()?;

        tracing::trace!(rows = batch.num_rows(), "wrote csv batch");
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.inner
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabkit_core::types::{Column, Scalar};

    #[test]
    fn writes_header_once() {
        let batch = RowBatch::new(vec![
            Column::new("County", vec![Scalar::from("Travis County, TX"), Scalar::Null]),
            Column::from_values("2020", [3_i64, 0]),
        ])
        .unwrap();
        let mut w = CsvWriter::to_writer(Vec::new());
        w.write_batch(&batch).unwrap();
        w.write_batch(&batch.head(1)).unwrap();
        let text = String::from_utf8(w.into_inner().unwrap()).unwrap();
        assert_eq!(
            text,
            "County,2020\n\"Travis County, TX\",3\n,0\n\"Travis County, TX\",3\n"
        );
    }

    #[test]
    fn mismatched_batch_is_rejected() {
        let a = RowBatch::new(vec![Column::from_values("a", [1_i64])]).unwrap();
        let b = RowBatch::new(vec![Column::from_values("b", [1_i64])]).unwrap();
        let mut w = CsvWriter::to_writer(Vec::new());
        w.write_batch(&a).unwrap();
        assert!(matches!(w.write_batch(&b), Err(Error::Format(_))));
    }
}
