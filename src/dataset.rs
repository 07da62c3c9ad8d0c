//! In-memory tabular dataset with row, column and matrix views.
//!
//! A [`Dataset`] stores its records as rows ([`Mode::Rows`]), as columns ([`Mode::Columns`]) or
//! as both kept in sync ([`Mode::Matrix`]). Every mutation in matrix mode updates both views.
//!
//! ```rust
//! use delimited_dataset::dataset::Dataset;
//! use delimited_dataset::types::{DataType, Mode, Record};
//!
//! let mut ds = Dataset::new(Mode::Rows, vec![DataType::String, DataType::Integer]);
//! ds.push_row(vec![Record::String("a".into()), Record::Integer(1)]).unwrap();
//! ds.push_row(vec![Record::String("b".into()), Record::Integer(2)]).unwrap();
//!
//! ds.to_columns().unwrap();
//! assert_eq!(ds.column(1).unwrap().records, vec![Record::Integer(1), Record::Integer(2)]);
//!
//! ds.to_rows().unwrap();
//! assert_eq!(ds.rows()[1], vec![Record::String("b".into()), Record::Integer(2)]);
//! ```

use crate::error::{DatasetError, DatasetResult};
use crate::processing::sort::sort_by_index;
use crate::types::{Column, DataType, Mode, Record, Row, Schema};

/// Capability the batch reader (and outer wrappers) need from a dataset.
///
/// Wrappers that layer bookkeeping on top of a [`Dataset`] compose one and implement this trait
/// instead of extending it.
pub trait DatasetLike {
    fn mode(&self) -> Mode;
    fn column_types(&self) -> &[DataType];
    fn n_rows(&self) -> usize;
    fn n_columns(&self) -> usize;
    fn push_row(&mut self, row: Row) -> DatasetResult<()>;
    /// Drop all records, keeping mode and column declarations.
    fn reset(&mut self);
}

/// In-memory tabular dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    mode: Mode,
    column_types: Vec<DataType>,
    column_names: Vec<String>,
    rows: Vec<Row>,
    // Empty in rows mode; one entry per declared column otherwise.
    columns: Vec<Column>,
}

impl Dataset {
    /// Create an empty dataset with unnamed columns.
    pub fn new(mode: Mode, column_types: Vec<DataType>) -> Self {
        let column_names = vec![String::new(); column_types.len()];
        Self::with_names(mode, column_types, column_names)
    }

    /// Create an empty dataset whose columns are the non-skip fields of `schema`.
    pub fn from_schema(mode: Mode, schema: &Schema) -> Self {
        Self::with_names(mode, schema.column_types(), schema.column_names())
    }

    fn with_names(mode: Mode, column_types: Vec<DataType>, mut column_names: Vec<String>) -> Self {
        column_names.resize(column_types.len(), String::new());
        let columns = match mode {
            Mode::Rows => Vec::new(),
            Mode::Columns | Mode::Matrix => empty_columns(&column_types, &column_names),
        };
        Self {
            mode,
            column_types,
            column_names,
            rows: Vec::new(),
            columns,
        }
    }

    /// Create a dataset and push `rows` into it.
    pub fn from_rows(mode: Mode, column_types: Vec<DataType>, rows: Vec<Row>) -> DatasetResult<Self> {
        let mut ds = Self::new(mode, column_types);
        for row in rows {
            ds.push_row(row)?;
        }
        Ok(ds)
    }

    /// An empty dataset with the same mode and column declarations.
    pub fn empty_like(&self) -> Self {
        Self::with_names(self.mode, self.column_types.clone(), self.column_names.clone())
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn column_types(&self) -> &[DataType] {
        &self.column_types
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Number of complete rows.
    ///
    /// In columns mode this is the length of the shortest column.
    pub fn n_rows(&self) -> usize {
        match self.mode {
            Mode::Rows | Mode::Matrix => self.rows.len(),
            Mode::Columns => self.columns.iter().map(Column::len).min().unwrap_or(0),
        }
    }

    pub fn n_columns(&self) -> usize {
        self.column_types.len()
    }

    /// Row storage. Empty in columns mode; use [`Dataset::row_at`] there.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Column storage. Empty in rows mode.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Row `index` regardless of mode.
    pub fn row_at(&self, index: usize) -> Option<Row> {
        match self.mode {
            Mode::Rows | Mode::Matrix => self.rows.get(index).cloned(),
            Mode::Columns => {
                if index >= self.n_rows() {
                    return None;
                }
                Some(self.columns.iter().map(|c| c.records[index].clone()).collect())
            }
        }
    }

    /// Record at (`row`, `column`) regardless of mode.
    pub fn record_at(&self, row: usize, column: usize) -> Option<&Record> {
        match self.mode {
            Mode::Rows | Mode::Matrix => self.rows.get(row).and_then(|r| r.get(column)),
            Mode::Columns => {
                if row >= self.n_rows() {
                    return None;
                }
                self.columns.get(column).and_then(|c| c.records.get(row))
            }
        }
    }

    /// Declared type of `column`, or [`DatasetError::ColumnOutOfRange`].
    pub fn column_type(&self, column: usize) -> DatasetResult<DataType> {
        self.column_types
            .get(column)
            .copied()
            .ok_or(DatasetError::ColumnOutOfRange {
                column,
                columns: self.n_columns(),
            })
    }

    /// All records of `column` across the complete rows, in row order.
    pub fn column_values(&self, column: usize) -> DatasetResult<Vec<Record>> {
        self.column_type(column)?;
        Ok(match self.mode {
            Mode::Rows | Mode::Matrix => self.rows.iter().map(|r| r[column].clone()).collect(),
            Mode::Columns => self.columns[column].records[..self.n_rows()].to_vec(),
        })
    }

    /// Set the caller-owned flag of `column`. Flags live on [`Column`]s, so rows mode has none
    /// and returns [`DatasetError::UnsupportedMode`].
    pub fn set_column_flag(&mut self, column: usize, flag: bool) -> DatasetResult<()> {
        self.column_type(column)?;
        let mode = self.mode;
        let c = self.columns.get_mut(column).ok_or(DatasetError::UnsupportedMode {
            operation: "set_column_flag",
            mode,
        })?;
        c.flag = flag;
        Ok(())
    }

    /// Append one row. Its length must equal the declared column count.
    pub fn push_row(&mut self, row: Row) -> DatasetResult<()> {
        if row.len() != self.n_columns() {
            return Err(DatasetError::ShapeMismatch {
                expected: self.n_columns(),
                actual: row.len(),
            });
        }
        match self.mode {
            Mode::Rows => self.rows.push(row),
            Mode::Columns => append_to_columns(&mut self.columns, row),
            Mode::Matrix => {
                append_to_columns(&mut self.columns, row.clone());
                self.rows.push(row);
            }
        }
        Ok(())
    }

    /// Append one column, declaring its type.
    ///
    /// In rows and matrix mode the column must hold one record per existing row (an empty
    /// dataset without columns accepts any length). Columns mode accepts ragged columns.
    pub fn push_column(&mut self, column: Column) -> DatasetResult<()> {
        if self.mode != Mode::Columns {
            let fresh = self.rows.is_empty() && self.n_columns() == 0;
            if !fresh && column.len() != self.rows.len() {
                return Err(DatasetError::ShapeMismatch {
                    expected: self.rows.len(),
                    actual: column.len(),
                });
            }
            if fresh {
                self.rows = column.records.iter().map(|r| vec![r.clone()]).collect();
            } else {
                for (row, record) in self.rows.iter_mut().zip(column.records.iter()) {
                    row.push(record.clone());
                }
            }
        }

        self.column_types.push(column.data_type);
        self.column_names.push(column.name.clone());
        if self.mode != Mode::Rows {
            self.columns.push(column);
        }
        Ok(())
    }

    /// Drop all records, keeping mode and column declarations.
    pub fn reset(&mut self) {
        self.rows.clear();
        for c in &mut self.columns {
            c.records.clear();
        }
    }

    /// Transpose rows into columns. No-op unless in rows mode.
    pub fn to_columns(&mut self) -> DatasetResult<()> {
        if self.mode != Mode::Rows {
            return Ok(());
        }
        self.columns = self.build_columns()?;
        self.rows = Vec::new();
        self.mode = Mode::Columns;
        Ok(())
    }

    /// Transpose columns into rows. No-op unless in columns mode.
    ///
    /// Only `min(column lengths)` rows are built; records past that in longer columns are
    /// dropped.
    pub fn to_rows(&mut self) -> DatasetResult<()> {
        if self.mode != Mode::Columns {
            return Ok(());
        }
        let columns = std::mem::take(&mut self.columns);
        self.rows = zip_columns(columns);
        self.mode = Mode::Rows;
        Ok(())
    }

    /// Build the missing view and keep both. No-op in matrix mode.
    ///
    /// From columns mode, columns are first truncated to the shortest one so the two views agree.
    pub fn to_matrix(&mut self) -> DatasetResult<()> {
        match self.mode {
            Mode::Matrix => return Ok(()),
            Mode::Rows => self.columns = self.build_columns()?,
            Mode::Columns => {
                let m = self.n_rows();
                for c in &mut self.columns {
                    c.records.truncate(m);
                }
                self.rows = zip_columns(self.columns.clone());
            }
        }
        self.mode = Mode::Matrix;
        Ok(())
    }

    /// Switch to `mode`, transposing as needed.
    pub fn convert(&mut self, mode: Mode) -> DatasetResult<()> {
        match (self.mode, mode) {
            (Mode::Columns, Mode::Rows) => self.to_rows(),
            (Mode::Rows, Mode::Columns) => self.to_columns(),
            (_, Mode::Matrix) => self.to_matrix(),
            (Mode::Matrix, Mode::Rows) => {
                self.columns = Vec::new();
                self.mode = Mode::Rows;
                Ok(())
            }
            (Mode::Matrix, Mode::Columns) => {
                self.rows = Vec::new();
                self.mode = Mode::Columns;
                Ok(())
            }
            (Mode::Rows, Mode::Rows) | (Mode::Columns, Mode::Columns) => Ok(()),
        }
    }

    /// Reorder every row and column by `perm`, where position `i` of the result holds the
    /// record previously at `perm[i]`.
    pub fn sort_by_index(&mut self, perm: &[usize]) -> DatasetResult<()> {
        let ragged = self.columns.iter().find(|c| c.len() != perm.len());
        if let Some(c) = ragged {
            return Err(DatasetError::InvalidPermutation {
                message: format!("permutation has {} entries, column '{}' has {}", perm.len(), c.name, c.len()),
            });
        }
        if self.mode != Mode::Columns {
            sort_by_index(&mut self.rows, perm)?;
        }
        for c in &mut self.columns {
            sort_by_index(&mut c.records, perm)?;
        }
        Ok(())
    }

    fn build_columns(&self) -> DatasetResult<Vec<Column>> {
        let mut columns = empty_columns(&self.column_types, &self.column_names);
        for row in &self.rows {
            if row.len() != columns.len() {
                return Err(DatasetError::ShapeMismatch {
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
            for (c, record) in columns.iter_mut().zip(row.iter()) {
                c.records.push(record.clone());
            }
        }
        Ok(columns)
    }
}

impl DatasetLike for Dataset {
    fn mode(&self) -> Mode {
        self.mode
    }

    fn column_types(&self) -> &[DataType] {
        &self.column_types
    }

    fn n_rows(&self) -> usize {
        Dataset::n_rows(self)
    }

    fn n_columns(&self) -> usize {
        Dataset::n_columns(self)
    }

    fn push_row(&mut self, row: Row) -> DatasetResult<()> {
        Dataset::push_row(self, row)
    }

    fn reset(&mut self) {
        Dataset::reset(self)
    }
}

fn empty_columns(types: &[DataType], names: &[String]) -> Vec<Column> {
    types
        .iter()
        .zip(names.iter())
        .map(|(t, n)| Column::new(n.clone(), *t))
        .collect()
}

fn append_to_columns(columns: &mut [Column], row: Row) {
    for (c, record) in columns.iter_mut().zip(row) {
        c.records.push(record);
    }
}

fn zip_columns(columns: Vec<Column>) -> Vec<Row> {
    let m = columns.iter().map(Column::len).min().unwrap_or(0);
    let mut iters: Vec<_> = columns.into_iter().map(|c| c.records.into_iter()).collect();
    (0..m)
        .map(|_| iters.iter_mut().filter_map(Iterator::next).collect())
        .collect()
}
