//! `delimited-dataset` reads delimiter-separated text whose quoting and separators are
//! configured per field, converts each field to a typed [`types::Record`], and collects the rows
//! into an in-memory [`dataset::Dataset`].
//!
//! ## Field metadata
//!
//! Every input field is described by a [`types::Metadata`]: a name, a declared
//! [`types::DataType`] (`string`, `integer`, `real`), an optional left/right quote, an optional
//! separator, and a skip flag. Because each field carries its own rules, one line can mix formats,
//! e.g. `id|"free text"|score`.
//!
//! Lines that do not match the metadata are rejected as a whole and written to a reject sink;
//! reading continues with the next line.
//!
//! ## Quick example: parse and collect
//!
//! ```rust
//! use delimited_dataset::dataset::Dataset;
//! use delimited_dataset::ingestion::{LineParser, ReadOptions, ReadStatus, Reader};
//! use delimited_dataset::types::{DataType, Metadata, Mode, Record, Schema};
//!
//! let schema = Schema::new(vec![
//!     Metadata::new("id", DataType::Integer).with_separator("|"),
//!     Metadata::new("name", DataType::String).with_quotes("\"", "\"").with_separator("|"),
//!     Metadata::new("score", DataType::Real),
//! ]);
//!
//! let input = "1|\"Ada\"|98.5\noops\n2|\"Grace\"|87.25\n";
//! let mut rejects = Vec::new();
//! let mut ds = Dataset::from_schema(Mode::Matrix, &schema);
//!
//! let mut reader = Reader::new(input.as_bytes(), &mut rejects, LineParser::new(schema), ReadOptions::default());
//! assert_eq!(reader.read(&mut ds).unwrap(), (2, ReadStatus::Eof));
//! drop(reader);
//!
//! assert_eq!(rejects, b"oops\n");
//! assert_eq!(ds.column(2).unwrap().records, vec![Record::Real(98.5), Record::Real(87.25)]);
//! ```
//!
//! ## Dataset modes
//!
//! - [`types::Mode::Rows`]: row storage only
//! - [`types::Mode::Columns`]: column storage only
//! - [`types::Mode::Matrix`]: both, kept in sync by every mutation
//!
//! [`dataset::Dataset::to_columns`] is lossless. [`dataset::Dataset::to_rows`] truncates ragged
//! columns to the shortest one.
//!
//! ## Modules
//!
//! - [`ingestion`]: line parser, batch reader, writer, configuration, observers
//! - [`dataset`]: the dataset and its transpositions
//! - [`processing`]: split, group, sort and sample
//! - [`types`]: records, metadata, rows and columns
//! - [`error`]: error types

pub mod dataset;
pub mod error;
pub mod ingestion;
pub mod processing;
pub mod types;

pub use dataset::{Dataset, DatasetLike};
pub use error::{DatasetError, DatasetResult, LineError, LineErrorKind};
