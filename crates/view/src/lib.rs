//! Prism View - Filtered views over Prism data sources.
//!
//! A `View` pairs a `ColumnDataSource` with a `Filter` and keeps the
//! selected rows up to date as either side changes. It also translates row
//! positions and selections between the full source and the filtered subset.
//!
//! # Example
//!
//! ```rust
//! use prism_filter::Filter;
//! use prism_source::ColumnDataSource;
//! use prism_view::View;
//!
//! let source = ColumnDataSource::builder()
//!     .column("x", vec![10.0, 20.0, 30.0, 40.0])
//!     .build();
//!
//! let filter = Filter::index(vec![1, 3]);
//! let view = View::new(source, filter.clone()).unwrap();
//! assert_eq!(&*view.subset_map(), &[1, 3]);
//!
//! filter.set_indices(Some(vec![0])).unwrap();
//! assert_eq!(view.len(), 1);
//! ```

#![no_std]

extern crate alloc;

mod selection;
mod view;

pub use selection::Selection;
pub use view::View;
