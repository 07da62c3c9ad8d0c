//! In-memory dataset operations.
//!
//! The processing layer operates on [`crate::dataset::Dataset`] values produced by the reader.
//! Nothing here sorts keyed data in place or mutates the source dataset, with one exception:
//! [`group_by_value`] drains the rows it is given.
//!
//! - [`split`]: stable partitioning by numeric threshold or categorical membership
//! - [`group`]: grouping rows by value into an insertion-ordered [`GroupMap`]
//! - [`sort`]: stable merge-sort index and permutation application
//! - [`sample`]: random picking with or without replacement
//!
//! ## Example: split → group → sort
//!
//! ```rust
//! use delimited_dataset::dataset::Dataset;
//! use delimited_dataset::processing::{group_by_value, sort_by_column, split_by_numeric};
//! use delimited_dataset::types::{DataType, Mode, Record};
//!
//! let ds = Dataset::from_rows(
//!     Mode::Rows,
//!     vec![DataType::Real, DataType::String],
//!     vec![
//!         vec![Record::Real(0.9), Record::String("+".into())],
//!         vec![Record::Real(0.2), Record::String("-".into())],
//!         vec![Record::Real(0.4), Record::String("+".into())],
//!     ],
//! )
//! .unwrap();
//!
//! let (mut low, high) = split_by_numeric(&ds, 0, 0.5).unwrap();
//! assert_eq!(low.n_rows(), 2);
//! assert_eq!(high.n_rows(), 1);
//!
//! let perm = sort_by_column(&mut low, 0).unwrap();
//! assert_eq!(perm, vec![0, 1]);
//!
//! let mut rows = low.rows().to_vec();
//! let groups = group_by_value(&mut rows, 1).unwrap();
//! assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["-", "+"]);
//! ```

pub mod group;
pub mod sample;
pub mod sort;
pub mod split;

pub use group::{group_by_value, GroupMap};
pub use sample::{random_pick, sample_rows, Pick, RowSample, Sampler};
pub use sort::{sort_by_column, sort_by_index, sorted_index};
pub use split::{split_by_categorical, split_by_numeric, split_by_value};
