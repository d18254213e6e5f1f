//! Prism Core - Shared value and index types for Prism.
//!
//! This crate provides the foundational types every other Prism crate builds on:
//!
//! - `Value`: Dynamically typed cell values, including nested arrays
//! - `NdArray` / `TypedArray`: Fixed element size numeric buffers with a shape
//! - `IndexSet`: Packed bitset of row positions produced by filters
//! - `Slice`: `start:stop:step` ranges used by patches
//! - `SourceId` / `ConsumerId`: Process-wide identities
//! - `Error`: Error types for all Prism operations
//!
//! # Example
//!
//! ```rust
//! use prism_core::{IndexSet, Value};
//!
//! let mut a = IndexSet::from_indices(6, &[0, 1, 2]).unwrap();
//! let b = IndexSet::from_booleans(6, &[false, true, true, true]);
//! a.intersect(&b).unwrap();
//! assert_eq!(a.to_vec(), vec![1, 2]);
//!
//! assert_eq!(Value::Int(3), Value::Float(3.0));
//! ```

#![no_std]

extern crate alloc;

mod error;
mod id;
pub mod indices;
pub mod ndarray;
mod slice;
mod value;

pub use error::{Error, Result};
pub use id::{ConsumerId, SourceId};
pub use indices::IndexSet;
pub use ndarray::{DType, Element, NdArray, TypedArray};
pub use slice::Slice;
pub use value::Value;
