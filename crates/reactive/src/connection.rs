//! Connection handles returned by `Signal::connect`.

use crate::signal::SlotId;
use alloc::rc::Weak;
use alloc::vec::Vec;
use core::fmt;

/// Type-erased view of a slot list, so connections to signals of any payload
/// type can be stored together.
pub(crate) trait Detach {
    fn detach(&self, id: SlotId);
    fn is_attached(&self, id: SlotId) -> bool;
}

/// A live subscription to a signal.
///
/// Dropping the connection disconnects the slot. The connection only holds a
/// weak reference to the signal, so it never keeps the signal alive.
pub struct Connection {
    target: Option<Weak<dyn Detach>>,
    id: SlotId,
}

impl Connection {
    pub(crate) fn new(target: Weak<dyn Detach>, id: SlotId) -> Self {
        Self {
            target: Some(target),
            id,
        }
    }

    /// Disconnects the slot now. Idempotent.
    pub fn disconnect(&mut self) {
        if let Some(target) = self.target.take().and_then(|weak| weak.upgrade()) {
            target.detach(self.id);
        }
    }

    /// Returns true while the slot is still connected to a live signal.
    pub fn is_connected(&self) -> bool {
        self.target
            .as_ref()
            .and_then(|weak| weak.upgrade())
            .map(|target| target.is_attached(self.id))
            .unwrap_or(false)
    }

    /// Consumes the handle while leaving the slot connected for the rest of
    /// the signal's life.
    pub fn detach(mut self) {
        self.target = None;
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// An owned group of connections, dropped together.
#[derive(Debug, Default)]
pub struct ConnectionSet {
    connections: Vec<Connection>,
}

impl ConnectionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to the set.
    pub fn push(&mut self, connection: Connection) {
        self.connections.push(connection);
    }

    /// Disconnects and forgets every connection.
    pub fn clear(&mut self) {
        self.connections.clear();
    }

    /// Returns the number of held connections.
    #[inline]
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Returns true if the set holds no connection.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl Extend<Connection> for ConnectionSet {
    fn extend<I: IntoIterator<Item = Connection>>(&mut self, iter: I) {
        self.connections.extend(iter);
    }
}
