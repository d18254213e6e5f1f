//! Change signals.
//!
//! A `Signal<P>` is a list of slots invoked in connection order every time
//! the signal is emitted. Connecting returns a `Connection` that removes the
//! slot again when dropped, so an owner that stores its connections is
//! unhooked automatically when it goes away.

use crate::connection::{Connection, Detach};
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use prism_core::Result;

/// Slot type invoked on emission.
pub type Slot<P> = Rc<dyn Fn(&P) -> Result<()>>;

/// Unique identifier of a slot within one signal.
pub type SlotId = u64;

pub(crate) struct SlotList<P> {
    slots: Vec<(SlotId, Slot<P>)>,
    next_id: SlotId,
}

impl<P> SlotList<P> {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 1,
        }
    }

    fn contains(&self, id: SlotId) -> bool {
        self.slots.iter().any(|(slot_id, _)| *slot_id == id)
    }
}

impl<P> Detach for RefCell<SlotList<P>> {
    fn detach(&self, id: SlotId) {
        if let Ok(mut list) = self.try_borrow_mut() {
            list.slots.retain(|(slot_id, _)| *slot_id != id);
        }
    }

    fn is_attached(&self, id: SlotId) -> bool {
        self.try_borrow().map(|list| list.contains(id)).unwrap_or(false)
    }
}

/// A multicast change notification carrying a payload of type `P`.
///
/// Cloning a signal yields another handle to the same slot list.
pub struct Signal<P> {
    slots: Rc<RefCell<SlotList<P>>>,
}

impl<P> Clone for Signal<P> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
        }
    }
}

impl<P: 'static> Default for Signal<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: 'static> Signal<P> {
    /// Creates a signal with no slots.
    pub fn new() -> Self {
        Self {
            slots: Rc::new(RefCell::new(SlotList::new())),
        }
    }

    /// Connects a slot. The slot stays connected until the returned
    /// connection is dropped or disconnected.
    pub fn connect<F>(&self, slot: F) -> Connection
    where
        F: Fn(&P) -> Result<()> + 'static,
    {
        let id = {
            let mut list = self.slots.borrow_mut();
            let id = list.next_id;
            list.next_id += 1;
            list.slots.push((id, Rc::new(slot)));
            id
        };
        let weak: Weak<RefCell<SlotList<P>>> = Rc::downgrade(&self.slots);
        Connection::new(weak, id)
    }

    /// Invokes every connected slot with `payload`, in connection order.
    ///
    /// All slots run even if one fails; the first error is returned. Slots
    /// may connect or disconnect while the signal is emitting: a slot
    /// disconnected mid-emission is skipped, one connected mid-emission
    /// first runs on the next emission.
    pub fn emit(&self, payload: &P) -> Result<()> {
        let snapshot: Vec<(SlotId, Slot<P>)> = self.slots.borrow().slots.clone();
        let mut first_error = None;
        for (id, slot) in snapshot {
            if !self.slots.borrow().contains(id) {
                continue;
            }
            if let Err(err) = slot(payload) {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Returns the number of connected slots.
    pub fn slot_count(&self) -> usize {
        self.slots.borrow().slots.len()
    }

    /// Returns true if no slot is connected.
    pub fn is_empty(&self) -> bool {
        self.slot_count() == 0
    }

    /// Disconnects every slot.
    pub fn clear(&self) {
        self.slots.borrow_mut().slots.clear();
    }
}

impl<P> fmt::Debug for Signal<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.slots.borrow().slots.len())
            .finish()
    }
}
