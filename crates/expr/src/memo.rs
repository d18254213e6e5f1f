//! Per-source memoization of expressions.
//!
//! `Memoized` keeps one result per data source, keyed by the source's id.
//! A result is reused until the source reports, through its change tracker,
//! that a column the expression depends on changed since this cache last
//! read it. Nothing is pushed: staleness is checked on every `compute`.

use crate::expression::Expression;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use core::fmt;
use hashbrown::HashMap;
use prism_core::{ConsumerId, Result, SourceId};
use prism_source::{ColumnDataSource, WeakSource};

struct Entry<T> {
    source: WeakSource,
    value: Rc<T>,
}

/// An expression with a per-source result cache.
pub struct Memoized<E: Expression> {
    expr: E,
    consumer: ConsumerId,
    results: RefCell<HashMap<SourceId, Entry<E::Output>>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl<E: Expression> Memoized<E> {
    pub fn new(expr: E) -> Self {
        Self {
            expr,
            consumer: ConsumerId::next(),
            results: RefCell::new(HashMap::new()),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// The wrapped expression.
    pub fn expression(&self) -> &E {
        &self.expr
    }

    /// The identity this cache reads sources under.
    pub fn consumer(&self) -> ConsumerId {
        self.consumer
    }

    /// Returns the result for `source`, recomputing it only if the source
    /// changed in a way the expression depends on.
    ///
    /// Unchanged sources get back the same allocation as the previous call.
    pub fn compute(&self, source: &ColumnDataSource) -> Result<Rc<E::Output>> {
        self.prune();

        let id = source.id();
        let stale = source.changed_for(self.consumer, &self.expr.dependencies());
        if !stale {
            if let Some(entry) = self.results.borrow().get(&id) {
                self.hits.set(self.hits.get() + 1);
                return Ok(entry.value.clone());
            }
        }

        self.misses.set(self.misses.get() + 1);
        let value = match self.expr.compute(source) {
            Ok(value) => Rc::new(value),
            Err(err) => {
                self.results.borrow_mut().remove(&id);
                return Err(err);
            }
        };
        tracing::trace!("recomputed expression for {}", id);
        self.results.borrow_mut().insert(
            id,
            Entry {
                source: source.downgrade(),
                value: value.clone(),
            },
        );
        Ok(value)
    }

    /// Returns the cached result for `source` without checking staleness.
    pub fn cached(&self, source: &ColumnDataSource) -> Option<Rc<E::Output>> {
        self.results.borrow().get(&source.id()).map(|e| e.value.clone())
    }

    /// Drops the cached result for `source`.
    pub fn invalidate(&self, source: &ColumnDataSource) {
        self.results.borrow_mut().remove(&source.id());
    }

    /// Drops every cached result and resets the statistics.
    pub fn clear(&self) {
        self.results.borrow_mut().clear();
        self.hits.set(0);
        self.misses.set(0);
    }

    /// Number of sources with a cached result.
    pub fn len(&self) -> usize {
        self.results.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.borrow().is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits.get()
    }

    pub fn misses(&self) -> u64 {
        self.misses.get()
    }

    /// Cache hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits.get() + self.misses.get();
        if total == 0 {
            0.0
        } else {
            self.hits.get() as f64 / total as f64
        }
    }

    /// Removes entries whose source has been dropped.
    fn prune(&self) {
        self.results
            .borrow_mut()
            .retain(|_, entry| !entry.source.is_dropped());
    }
}

impl<E: Expression> Drop for Memoized<E> {
    fn drop(&mut self) {
        for entry in self.results.get_mut().values() {
            if let Some(source) = entry.source.upgrade() {
                source.forget_consumer(self.consumer);
            }
        }
    }
}

impl<E: Expression + fmt::Debug> fmt::Debug for Memoized<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("expr", &self.expr)
            .field("consumer", &self.consumer)
            .field("cached", &self.len())
            .finish()
    }
}
