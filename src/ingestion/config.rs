//! JSON configuration for readers and writers.
//!
//! ```rust
//! use delimited_dataset::ingestion::ReaderConfig;
//! use delimited_dataset::types::{DataType, Mode};
//!
//! let cfg = ReaderConfig::from_json_str(r#"{
//!     "Input": "people.dat",
//!     "InputMetadata": [
//!         {"Name": "id", "Type": "integer", "Separator": "|"},
//!         {"Name": "name", "LeftQuote": "\"", "RightQuote": "\""}
//!     ],
//!     "MaxRows": 100,
//!     "DatasetMode": "Matrix"
//! }"#).unwrap();
//!
//! assert_eq!(cfg.input_metadata.fields[0].data_type, DataType::Integer);
//! assert_eq!(cfg.row_limit(), Some(100));
//! assert_eq!(cfg.mode().unwrap(), Mode::Matrix);
//! assert!(cfg.trim_space);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DatasetResult;
use crate::types::{Mode, Schema};

use super::line::LineParser;

/// Where to read from, how to parse it, and where rejected lines go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReaderConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub input_metadata: Schema,
    /// Rows per read call; non-positive means read until end of input.
    #[serde(default = "default_max_rows")]
    pub max_rows: i64,
    #[serde(default = "default_trim_space")]
    pub trim_space: bool,
    #[serde(default = "default_rejected")]
    pub rejected: PathBuf,
    /// `rows`, `columns` or `matrix`, case-insensitive.
    #[serde(default = "default_dataset_mode")]
    pub dataset_mode: String,
}

fn default_max_rows() -> i64 {
    -1
}

fn default_trim_space() -> bool {
    true
}

fn default_rejected() -> PathBuf {
    PathBuf::from("rejected.dat")
}

fn default_dataset_mode() -> String {
    "rows".to_string()
}

impl ReaderConfig {
    pub fn new(input: impl Into<PathBuf>, input_metadata: Schema) -> Self {
        Self {
            input: input.into(),
            input_metadata,
            max_rows: default_max_rows(),
            trim_space: default_trim_space(),
            rejected: default_rejected(),
            dataset_mode: default_dataset_mode(),
        }
    }

    pub fn from_json_str(s: &str) -> DatasetResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a config file. Relative `Input` and `Rejected` paths are resolved against the
    /// directory containing the file.
    pub fn from_path(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let path = path.as_ref();
        let mut cfg = Self::from_json_str(&fs::read_to_string(path)?)?;
        if let Some(dir) = path.parent() {
            cfg.input = resolve(dir, &cfg.input);
            cfg.rejected = resolve(dir, &cfg.rejected);
        }
        Ok(cfg)
    }

    /// `MaxRows` as a bound, `None` when unbounded.
    pub fn row_limit(&self) -> Option<usize> {
        usize::try_from(self.max_rows).ok().filter(|&n| n > 0)
    }

    pub fn mode(&self) -> DatasetResult<Mode> {
        self.dataset_mode.parse()
    }

    /// A line parser for `InputMetadata` honoring `TrimSpace`.
    pub fn parser(&self) -> LineParser {
        LineParser::new(self.input_metadata.clone()).trim_space(self.trim_space)
    }
}

/// Where to write and with which field layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WriterConfig {
    pub output: PathBuf,
    #[serde(default)]
    pub output_metadata: Schema,
}

impl WriterConfig {
    pub fn new(output: impl Into<PathBuf>, output_metadata: Schema) -> Self {
        Self {
            output: output.into(),
            output_metadata,
        }
    }

    pub fn from_json_str(s: &str) -> DatasetResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a config file, resolving a relative `Output` against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let path = path.as_ref();
        let mut cfg = Self::from_json_str(&fs::read_to_string(path)?)?;
        if let Some(dir) = path.parent() {
            cfg.output = resolve(dir, &cfg.output);
        }
        Ok(cfg)
    }
}

fn resolve(dir: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() { p.to_path_buf() } else { dir.join(p) }
}
