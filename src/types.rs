//! Core data model types.
//!
//! A line is parsed according to a [`Schema`] (an ordered list of [`Metadata`], one per input
//! field) into a [`Row`] of typed [`Record`]s. Rows and [`Column`]s are the two views a
//! [`crate::dataset::Dataset`] keeps of the same records.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// UTF-8 text.
    String,
    /// 64-bit signed integer.
    Integer,
    /// 64-bit floating point number.
    Real,
}

impl DataType {
    /// Returns `true` for [`DataType::Integer`] and [`DataType::Real`].
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Real)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Integer => f.write_str("integer"),
            Self::Real => f.write_str("real"),
        }
    }
}

/// A single typed scalar value.
///
/// Comparison is type-directed: records of the same variant compare by value, records of
/// different variants are unordered.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    String(String),
    Integer(i64),
    Real(f64),
}

impl Record {
    /// Convert raw text to a record of `data_type`.
    ///
    /// The text is used as given; callers trim it first when whitespace is not significant.
    pub fn parse(data_type: DataType, raw: &str) -> Result<Self, String> {
        match data_type {
            DataType::String => Ok(Self::String(raw.to_owned())),
            DataType::Integer => raw
                .parse::<i64>()
                .map(Self::Integer)
                .map_err(|e| format!("expected integer, got '{raw}': {e}")),
            DataType::Real => raw
                .parse::<f64>()
                .map(Self::Real)
                .map_err(|e| format!("expected real, got '{raw}': {e}")),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Self::String(_) => DataType::String,
            Self::Integer(_) => DataType::Integer,
            Self::Real(_) => DataType::Real,
        }
    }

    /// Numeric value of the record, or `None` for strings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Real(v) => Some(*v),
            Self::String(_) => None,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
        }
    }
}

impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => a.partial_cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.partial_cmp(b),
            (Self::Real(a), Self::Real(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Describes how to extract and type one field from a line.
///
/// Field names in serialized configuration are PascalCase (`Name`, `Separator`, `LeftQuote`,
/// `RightQuote`, `Type`, `Skip`, `ValueSpace`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub separator: String,
    #[serde(default)]
    pub left_quote: String,
    #[serde(default)]
    pub right_quote: String,
    #[serde(rename = "Type", default = "default_data_type")]
    pub data_type: DataType,
    /// Consume the field but leave it out of the parsed row.
    #[serde(default)]
    pub skip: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_space: Option<Vec<String>>,
}

fn default_data_type() -> DataType {
    DataType::String
}

impl Metadata {
    /// Create an unquoted, unseparated field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            separator: String::new(),
            left_quote: String::new(),
            right_quote: String::new(),
            data_type,
            skip: false,
            value_space: None,
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_quotes(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left_quote = left.into();
        self.right_quote = right.into();
        self
    }

    pub fn with_value_space(mut self, values: Vec<String>) -> Self {
        self.value_space = Some(values);
        self
    }

    pub fn skipped(mut self) -> Self {
        self.skip = true;
        self
    }
}

/// Ordered field metadata. The order is authoritative for parsing and for row/column indexing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub fields: Vec<Metadata>,
}

impl Schema {
    pub fn new(fields: Vec<Metadata>) -> Self {
        Self { fields }
    }

    /// Fields that contribute a column (non-skip), in order.
    pub fn columns(&self) -> impl Iterator<Item = &Metadata> {
        self.fields.iter().filter(|f| !f.skip)
    }

    /// Number of non-skip fields, i.e. the length of every parsed row.
    pub fn column_count(&self) -> usize {
        self.columns().count()
    }

    pub fn column_types(&self) -> Vec<DataType> {
        self.columns().map(|f| f.data_type).collect()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns().map(|f| f.name.clone()).collect()
    }

    /// Column index of a non-skip field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns().position(|f| f.name == name)
    }
}

/// One record per non-skip field, in metadata order.
pub type Row = Vec<Record>;

/// One attribute across all rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    /// Free marker bit for callers; the dataset never reads it.
    pub flag: bool,
    pub records: Vec<Record>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            flag: false,
            records: Vec::new(),
        }
    }

    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = records;
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Which views a dataset keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Rows,
    Columns,
    /// Rows and columns kept in sync.
    Matrix,
}

impl FromStr for Mode {
    type Err = DatasetError;

    /// Case-insensitive: `rows`, `columns` or `matrix`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rows" => Ok(Self::Rows),
            "columns" => Ok(Self::Columns),
            "matrix" => Ok(Self::Matrix),
            _ => Err(DatasetError::UnknownMode { mode: s.to_owned() }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rows => f.write_str("ROWS"),
            Self::Columns => f.write_str("COLUMNS"),
            Self::Matrix => f.write_str("MATRIX"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_parse_by_declared_type() {
        assert_eq!(Record::parse(DataType::String, "AB").unwrap(), Record::String("AB".into()));
        assert_eq!(Record::parse(DataType::Integer, "-42").unwrap(), Record::Integer(-42));
        assert_eq!(Record::parse(DataType::Real, "0.1").unwrap(), Record::Real(0.1));
        assert!(Record::parse(DataType::Integer, "1.5").is_err());
        assert!(Record::parse(DataType::Real, "").is_err());
    }

    #[test]
    fn record_ordering_is_type_directed() {
        assert!(Record::Integer(1) < Record::Integer(2));
        assert!(Record::String("a".into()) < Record::String("b".into()));
        assert_eq!(Record::Integer(1).partial_cmp(&Record::Real(1.0)), None);
    }

    #[test]
    fn record_display_matches_input_text() {
        assert_eq!(Record::Real(0.1).to_string(), "0.1");
        assert_eq!(Record::Integer(7).to_string(), "7");
        assert_eq!(Record::String("x y".into()).to_string(), "x y");
    }

    #[test]
    fn schema_skips_do_not_count_as_columns() {
        let schema = Schema::new(vec![
            Metadata::new("id", DataType::Integer).with_separator(","),
            Metadata::new("junk", DataType::String).with_separator(",").skipped(),
            Metadata::new("score", DataType::Real),
        ]);
        assert_eq!(schema.column_count(), 2);
        assert_eq!(schema.column_types(), vec![DataType::Integer, DataType::Real]);
        assert_eq!(schema.index_of("score"), Some(1));
        assert_eq!(schema.index_of("junk"), None);
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("ROWS".parse::<Mode>().unwrap(), Mode::Rows);
        assert_eq!("Columns".parse::<Mode>().unwrap(), Mode::Columns);
        assert_eq!("matrix".parse::<Mode>().unwrap(), Mode::Matrix);
        assert!(matches!(
            "grid".parse::<Mode>(),
            Err(DatasetError::UnknownMode { .. })
        ));
    }

    #[test]
    fn metadata_deserializes_from_pascal_case_json() {
        let md: Metadata = serde_json::from_str(
            r#"{"Name":"label","Separator":";","LeftQuote":"\"","RightQuote":"\"","Type":"integer","ValueSpace":["0","1"]}"#,
        )
        .unwrap();
        assert_eq!(md.name, "label");
        assert_eq!(md.separator, ";");
        assert_eq!(md.left_quote, "\"");
        assert_eq!(md.data_type, DataType::Integer);
        assert!(!md.skip);
        assert_eq!(md.value_space, Some(vec!["0".to_string(), "1".to_string()]));
    }
}
