//! Filtered views.
//!
//! A `View` binds one filter tree to one data source and keeps the derived
//! row set together with the maps between full-source positions and subset
//! positions. It recomputes synchronously whenever the filter or the source
//! reports a change.

use crate::selection::Selection;
use alloc::collections::BTreeMap;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Ref, RefCell};
use core::fmt;
use hashbrown::HashMap;
use prism_core::{Error, IndexSet, Result};
use prism_filter::Filter;
use prism_reactive::{Connection, ConnectionSet, Signal};
use prism_source::ColumnDataSource;

struct ViewState {
    indices: IndexSet,
    /// Subset position → full position.
    subset_map: Vec<usize>,
    /// Full position → subset position.
    indices_map: HashMap<usize, usize>,
}

impl ViewState {
    fn empty() -> Self {
        Self {
            indices: IndexSet::all_unset(0),
            subset_map: Vec::new(),
            indices_map: HashMap::new(),
        }
    }
}

struct ViewInner {
    source: ColumnDataSource,
    filter: RefCell<Filter>,
    state: RefCell<ViewState>,
    changed: Signal<()>,
    filter_connection: RefCell<Option<Connection>>,
    source_connections: RefCell<ConnectionSet>,
}

impl ViewInner {
    fn recompute(&self) -> Result<()> {
        let filter = self.filter.borrow().clone();
        let size = self.source.len().unwrap_or(1);

        let mut indices = IndexSet::all_set(size);
        indices.intersect(&filter.compute_indices(&self.source)?)?;

        let subset_map = indices.to_vec();
        let indices_map = subset_map
            .iter()
            .enumerate()
            .map(|(subset, full)| (*full, subset))
            .collect();

        let mut state = self
            .state
            .try_borrow_mut()
            .map_err(|_| Error::borrowed("view state"))?;
        tracing::trace!("view over {} selects {} of {} rows", self.source.id(), subset_map.len(), size);
        *state = ViewState {
            indices,
            subset_map,
            indices_map,
        };
        drop(state);
        self.changed.emit(&())
    }

    fn connect_filter(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let connection = self.filter.borrow().changed().connect(recompute_slot(weak));
        *self.filter_connection.borrow_mut() = Some(connection);
    }

    fn connect_source(self: &Rc<Self>) {
        let mut connections = self.source_connections.borrow_mut();
        connections.clear();
        connections.push(self.source.change().connect(recompute_slot(Rc::downgrade(self))));
        connections.push(self.source.data_changed().connect(recompute_slot(Rc::downgrade(self))));
        connections.push(self.source.streaming().connect(recompute_slot(Rc::downgrade(self))));
        connections.push(self.source.patching().connect(recompute_slot(Rc::downgrade(self))));
    }
}

fn recompute_slot<P>(view: Weak<ViewInner>) -> impl Fn(&P) -> Result<()> {
    move |_| match view.upgrade() {
        Some(inner) => inner.recompute(),
        None => Ok(()),
    }
}

/// A filtered view of a data source.
#[derive(Clone)]
pub struct View {
    inner: Rc<ViewInner>,
}

impl View {
    /// Creates a view and computes its rows immediately.
    pub fn new(source: ColumnDataSource, filter: Filter) -> Result<View> {
        let inner = Rc::new(ViewInner {
            source,
            filter: RefCell::new(filter),
            state: RefCell::new(ViewState::empty()),
            changed: Signal::new(),
            filter_connection: RefCell::new(None),
            source_connections: RefCell::new(ConnectionSet::new()),
        });
        inner.connect_source();
        inner.connect_filter();
        inner.recompute()?;
        Ok(View { inner })
    }

    /// A view selecting every row.
    pub fn unfiltered(source: ColumnDataSource) -> Result<View> {
        Self::new(source, Filter::all())
    }

    /// Emitted after every recompute.
    pub fn changed(&self) -> &Signal<()> {
        &self.inner.changed
    }

    pub fn source(&self) -> &ColumnDataSource {
        &self.inner.source
    }

    /// The current filter tree.
    pub fn filter(&self) -> Filter {
        self.inner.filter.borrow().clone()
    }

    /// Replaces the filter tree and recomputes.
    pub fn set_filter(&self, filter: Filter) -> Result<()> {
        *self.inner.filter_connection.borrow_mut() = None;
        *self.inner.filter.borrow_mut() = filter;
        self.inner.connect_filter();
        self.inner.recompute()
    }

    /// Recomputes the rows now.
    pub fn recompute(&self) -> Result<()> {
        self.inner.recompute()
    }

    /// Selected rows of the source.
    ///
    /// This and the other map accessors hand out borrow guards. A recompute
    /// triggered while one is alive fails with `Error::Borrowed` and leaves
    /// the previous rows in place; drop the guard and call `recompute`.
    pub fn indices(&self) -> Ref<'_, IndexSet> {
        Ref::map(self.inner.state.borrow(), |s| &s.indices)
    }

    /// Subset position → full position.
    pub fn subset_map(&self) -> Ref<'_, [usize]> {
        Ref::map(self.inner.state.borrow(), |s| s.subset_map.as_slice())
    }

    /// Full position → subset position.
    pub fn indices_map(&self) -> Ref<'_, HashMap<usize, usize>> {
        Ref::map(self.inner.state.borrow(), |s| &s.indices_map)
    }

    /// Number of selected rows.
    pub fn len(&self) -> usize {
        self.inner.state.borrow().subset_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ========== Translation helpers ==========

    /// Maps subset positions to full positions.
    pub fn convert_indices_from_subset(&self, indices: &[usize]) -> Result<Vec<usize>> {
        let state = self.inner.state.borrow();
        indices.iter().map(|&i| from_subset(&state, i)).collect()
    }

    /// Maps full positions to subset positions, dropping rows outside the view.
    pub fn convert_indices_to_subset(&self, indices: &[usize]) -> Vec<usize> {
        let state = self.inner.state.borrow();
        indices
            .iter()
            .filter_map(|i| state.indices_map.get(i).copied())
            .collect()
    }

    /// Maps a selection made on the subset onto the full source.
    pub fn convert_selection_from_subset(&self, selection: &Selection) -> Result<Selection> {
        let state = self.inner.state.borrow();
        let map = |indices: &[usize]| -> Result<Vec<usize>> {
            indices.iter().map(|&i| from_subset(&state, i)).collect()
        };
        let mut multiline_indices = BTreeMap::new();
        for (row, points) in &selection.multiline_indices {
            multiline_indices.insert(from_subset(&state, *row)?, points.clone());
        }
        Ok(Selection {
            indices: map(&selection.indices)?,
            line_indices: map(&selection.line_indices)?,
            multiline_indices,
        })
    }

    /// Maps a selection made on the full source onto the subset, dropping
    /// rows outside the view.
    pub fn convert_selection_to_subset(&self, selection: &Selection) -> Selection {
        let state = self.inner.state.borrow();
        let map = |indices: &[usize]| -> Vec<usize> {
            indices
                .iter()
                .filter_map(|i| state.indices_map.get(i).copied())
                .collect()
        };
        let multiline_indices = selection
            .multiline_indices
            .iter()
            .filter_map(|(row, points)| state.indices_map.get(row).map(|s| (*s, points.clone())))
            .collect();
        Selection {
            indices: map(&selection.indices),
            line_indices: map(&selection.line_indices),
            multiline_indices,
        }
    }
}

fn from_subset(state: &ViewState, index: usize) -> Result<usize> {
    state
        .subset_map
        .get(index)
        .copied()
        .ok_or_else(|| Error::index_out_of_range(index, state.subset_map.len()))
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("source", &self.inner.source.id())
            .field("filter", &*self.inner.filter.borrow())
            .field("indices", &self.inner.state.borrow().indices)
            .finish()
    }
}
