//! Per-consumer change tracking.
//!
//! A source keeps a monotonically increasing epoch and, for every column,
//! the epoch of its last change. Consumers identify themselves with a
//! `ConsumerId`; the tracker remembers the epoch each consumer last read at
//! and answers whether anything the consumer depends on changed since.

use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;
use prism_core::ConsumerId;

/// Columns a consumer reads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Dependencies {
    /// Any change to the source counts.
    #[default]
    All,
    /// Only changes to these columns count.
    Columns(Vec<String>),
}

impl Dependencies {
    /// Creates a column dependency list.
    pub fn columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Dependencies::Columns(names.into_iter().map(Into::into).collect())
    }
}

/// Epoch bookkeeping for one data source.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    epoch: u64,
    /// Epoch of the last change to the column set itself.
    structure_epoch: u64,
    columns: HashMap<String, u64>,
    consumers: HashMap<ConsumerId, u64>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current epoch.
    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Records a change to the listed columns.
    pub fn touch_columns<'a, I>(&mut self, names: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.epoch += 1;
        for name in names {
            match self.columns.get_mut(name) {
                Some(version) => *version = self.epoch,
                None => {
                    self.columns.insert(String::from(name), self.epoch);
                }
            }
        }
    }

    /// Records a change that may affect every column, such as replacing the
    /// whole data mapping or removing a column.
    pub fn touch_structure(&mut self) {
        self.epoch += 1;
        self.structure_epoch = self.epoch;
    }

    /// Returns true if anything `deps` covers changed since `consumer` last
    /// asked, and marks the consumer as up to date. A consumer's first call
    /// always reports a change.
    pub fn changed_for(&mut self, consumer: ConsumerId, deps: &Dependencies) -> bool {
        let changed = match self.consumers.get(&consumer) {
            None => true,
            Some(&seen) if self.structure_epoch > seen => true,
            Some(&seen) => match deps {
                Dependencies::All => self.epoch > seen,
                Dependencies::Columns(names) => names
                    .iter()
                    .any(|name| self.columns.get(name.as_str()).is_some_and(|v| *v > seen)),
            },
        };
        self.consumers.insert(consumer, self.epoch);
        changed
    }

    /// Drops the bookkeeping for a consumer.
    pub fn forget(&mut self, consumer: ConsumerId) {
        self.consumers.remove(&consumer);
    }

    /// Number of consumers currently tracked.
    pub fn consumer_count(&self) -> usize {
        self.consumers.len()
    }
}
