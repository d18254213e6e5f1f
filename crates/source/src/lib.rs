//! Prism Source - Columnar data source for Prism.
//!
//! This crate provides the mutable data store that filters and views read:
//!
//! - `Column`: Growable value arrays or fixed element size typed arrays
//! - `stream_to_column`: Rollover-bounded append
//! - `patch_to_column`: Scalar, slice and nested (ragged) partial updates
//! - `ColumnDataSource`: Shared handle over named columns with change signals
//! - `ChangeTracker` / `Dependencies`: Per-consumer, column-granular dirty tracking
//!
//! # Features
//!
//! - `hash-columns`: Store columns in a `hashbrown::HashMap` instead of a `BTreeMap`
//!
//! # Example
//!
//! ```rust
//! use prism_source::{Column, ColumnDataSource};
//! use std::collections::BTreeMap;
//!
//! let source = ColumnDataSource::builder()
//!     .column("x", vec![1.0, 2.0, 3.0])
//!     .build();
//!
//! let mut new_data = BTreeMap::new();
//! new_data.insert("x".to_string(), Column::from(vec![4.0, 5.0]));
//! source.stream(new_data, Some(4)).unwrap();
//!
//! assert_eq!(source.len(), Some(4));
//! ```

#![no_std]

extern crate alloc;

pub mod column;
pub mod patch;
mod source;
pub mod stream;
pub mod tracker;

pub use column::Column;
pub use patch::{patch_to_column, Patch, PatchIndex, PatchValue, Selector};
pub use source::{ColumnDataSource, ColumnDataSourceBuilder, ColumnMap, PatchEvent, StreamEvent, WeakSource};
pub use stream::stream_to_column;
pub use tracker::{ChangeTracker, Dependencies};
