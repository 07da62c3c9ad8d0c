//! Delimited-text serialization, the inverse of [`super::line::LineParser`].
//!
//! For every field in schema order the writer emits `left quote + value + right quote +
//! separator`, then a newline. Skip fields have no record in a row; they are written as an empty
//! value so the output parses back with the same schema.

use std::fs::File;
use std::io::{BufWriter, Write};

use crate::dataset::Dataset;
use crate::error::{DatasetError, DatasetResult};
use crate::types::{Record, Schema};

use super::config::WriterConfig;

/// Writes rows as delimited lines.
#[derive(Debug)]
pub struct Writer<W> {
    out: W,
    schema: Schema,
}

impl Writer<BufWriter<File>> {
    /// Create (truncate) the configured output file.
    pub fn create(config: &WriterConfig) -> DatasetResult<Self> {
        let file = File::create(&config.output)?;
        Ok(Self::new(BufWriter::new(file), config.output_metadata.clone()))
    }
}

impl<W: Write> Writer<W> {
    pub fn new(out: W, schema: Schema) -> Self {
        Self { out, schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Write one row; it must hold one record per non-skip field.
    pub fn write_row(&mut self, row: &[Record]) -> DatasetResult<()> {
        let line = format_row(&self.schema, row)?;
        self.out.write_all(&line)?;
        Ok(())
    }

    /// Write every complete row of `dataset`, in any mode. Returns the number of rows written.
    pub fn write_dataset(&mut self, dataset: &Dataset) -> DatasetResult<usize> {
        let n = dataset.n_rows();
        for i in 0..n {
            if let Some(row) = dataset.row_at(i) {
                self.write_row(&row)?;
            }
        }
        Ok(n)
    }

    pub fn flush(&mut self) -> DatasetResult<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> DatasetResult<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Format one row as a line, newline included.
pub fn format_row(schema: &Schema, row: &[Record]) -> DatasetResult<Vec<u8>> {
    let expected = schema.column_count();
    if row.len() != expected {
        return Err(DatasetError::ShapeMismatch {
            expected,
            actual: row.len(),
        });
    }

    let mut out = Vec::new();
    let mut records = row.iter();
    for md in &schema.fields {
        out.extend_from_slice(md.left_quote.as_bytes());
        if !md.skip {
            if let Some(record) = records.next() {
                out.extend_from_slice(record.to_string().as_bytes());
            }
        }
        out.extend_from_slice(md.right_quote.as_bytes());
        out.extend_from_slice(md.separator.as_bytes());
    }
    out.push(b'\n');
    Ok(out)
}
