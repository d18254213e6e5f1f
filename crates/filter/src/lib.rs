//! Prism Filter - Composable row filters for Prism.
//!
//! Filters select a subset of a data source's rows and compose into trees:
//!
//! - Leaves: `AllIndices`, index lists, boolean masks, group matches and
//!   user-supplied functions (`CustomFilter`)
//! - Combinators: union, intersection, difference, symmetric difference and
//!   inversion, also available as `|`, `&`, `-`, `^` and `!`
//!
//! Every node exposes a `changed` signal that fires when the node or any of
//! its operands is modified.
//!
//! # Example
//!
//! ```rust
//! use prism_filter::Filter;
//! use prism_source::ColumnDataSource;
//!
//! let source = ColumnDataSource::builder()
//!     .column("x", vec![0.0, 1.0, 2.0, 3.0])
//!     .build();
//!
//! let evens = Filter::index(vec![0, 2]);
//! let tail = Filter::boolean(vec![false, false, true, true]);
//!
//! let rows = (&evens | &tail).compute_indices(&source).unwrap();
//! assert_eq!(rows.to_vec(), vec![0, 2, 3]);
//! ```

#![no_std]

extern crate alloc;

pub mod custom;
mod filter;
pub mod group;
mod ops;

pub use custom::{CustomFilter, CustomFunc};
pub use filter::{Filter, FilterKind};
pub use group::{Group, GroupFilter};
