//! Prism Expr - Memoized expressions over Prism data sources.
//!
//! An [`Expression`] derives a value from a source's columns. Wrapping it in
//! [`Memoized`] caches the result per source and recomputes it lazily, only
//! when a column the expression depends on has changed since the last read.
//!
//! # Example
//!
//! ```rust
//! use prism_expr::{CumSum, Memoized};
//! use prism_source::ColumnDataSource;
//! use std::rc::Rc;
//!
//! let source = ColumnDataSource::builder()
//!     .column("y", vec![1.0, 2.0, 3.0])
//!     .build();
//!
//! let cumsum = Memoized::new(CumSum::new("y"));
//! let first = cumsum.compute(&source).unwrap();
//! assert_eq!(*first, vec![1.0, 3.0, 6.0]);
//!
//! // Nothing changed: the same result comes back
//! assert!(Rc::ptr_eq(&first, &cumsum.compute(&source).unwrap()));
//! ```

#![no_std]

extern crate alloc;

pub mod builtins;
mod expression;
mod memo;

pub use builtins::{CumSum, Maximum, Minimum, Stack};
pub use expression::Expression;
pub use memo::Memoized;
