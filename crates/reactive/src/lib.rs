//! Prism Reactive - Change signals for Prism.
//!
//! Data sources, filters and views announce changes through `Signal`s.
//! Anything interested connects a slot and keeps the returned `Connection`;
//! dropping the connection unhooks the slot again.
//!
//! # Core Concepts
//!
//! - `Signal<P>`: Ordered multicast notification carrying a payload `P`
//! - `Connection`: RAII handle for one connected slot
//! - `ConnectionSet`: A group of connections owned and dropped together
//!
//! # Example
//!
//! ```rust
//! use prism_reactive::Signal;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let changed: Signal<()> = Signal::new();
//! let hits = Rc::new(Cell::new(0));
//!
//! let h = hits.clone();
//! let conn = changed.connect(move |_| {
//!     h.set(h.get() + 1);
//!     Ok(())
//! });
//!
//! changed.emit(&()).unwrap();
//! drop(conn);
//! changed.emit(&()).unwrap();
//! assert_eq!(hits.get(), 1);
//! ```

#![no_std]

extern crate alloc;

mod connection;
mod signal;

pub use connection::{Connection, ConnectionSet};
pub use signal::{Signal, Slot, SlotId};
