//! Reading and writing delimited text.
//!
//! Most callers should use [`read_all_from_config`] (from [`reader`]) which:
//!
//! - opens the configured input and reject file
//! - parses every line with the configured per-field metadata
//! - pushes accepted rows into a [`crate::dataset::Dataset`] of the configured mode
//! - optionally reports rejects, batches and failures to a [`ReadObserver`]
//!
//! For bounded, incremental reading drive a [`Reader`] directly.
//!
//! Building blocks:
//! - [`line`]: the per-line field parser
//! - [`writer`]: serialization back to delimited text
//! - [`config`]: JSON configuration

pub mod config;
pub mod line;
pub mod observability;
pub mod reader;
pub mod writer;

pub use config::{ReaderConfig, WriterConfig};
pub use line::{parse_line, LineParser};
pub use observability::{
    BatchStats, CompositeObserver, FileObserver, LogObserver, ReadContext, ReadObserver, ReadSeverity,
    StdErrObserver,
};
pub use reader::{read_all_from_config, ReadOptions, ReadStatus, Reader};
pub use writer::{format_row, Writer};
