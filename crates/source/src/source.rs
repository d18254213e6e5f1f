//! The columnar data source.

use crate::column::Column;
use crate::patch::{patched_column, Patch};
use crate::stream::{check_stream, stream_to_column};
use crate::tracker::{ChangeTracker, Dependencies};
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Ref, RefCell, RefMut};
use core::fmt;
use prism_core::{ConsumerId, Error, Result, SourceId};
use prism_reactive::Signal;

/// Column name → column storage.
#[cfg(feature = "hash-columns")]
pub type ColumnMap = hashbrown::HashMap<String, Column>;
#[cfg(not(feature = "hash-columns"))]
pub type ColumnMap = BTreeMap<String, Column>;

/// Payload of the `streaming` signal.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamEvent {
    pub new_data: BTreeMap<String, Column>,
    pub rollover: Option<usize>,
}

/// Payload of the `patching` signal.
#[derive(Clone, Debug, PartialEq)]
pub struct PatchEvent {
    /// Touched rows across all patched columns, ascending.
    pub rows: Vec<usize>,
    /// Patched column names, ascending.
    pub columns: Vec<String>,
}

struct SourceInner {
    id: SourceId,
    data: RefCell<ColumnMap>,
    tracker: RefCell<ChangeTracker>,
    change: Signal<()>,
    data_changed: Signal<()>,
    streaming: Signal<StreamEvent>,
    patching: Signal<PatchEvent>,
}

/// A shared handle to a mapping of named columns.
///
/// Cloning the handle is cheap and yields the same source. Column storage is
/// only ever borrowed for the duration of a call; every mutation releases its
/// borrow before emitting, so slots are free to read the source.
#[derive(Clone)]
pub struct ColumnDataSource {
    inner: Rc<SourceInner>,
}

impl Default for ColumnDataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnDataSource {
    /// Creates a source with no columns.
    pub fn new() -> Self {
        Self::from_columns(ColumnMap::default())
    }

    /// Creates a source over an existing column map.
    pub fn from_columns(data: ColumnMap) -> Self {
        let source = Self {
            inner: Rc::new(SourceInner {
                id: SourceId::next(),
                data: RefCell::new(data),
                tracker: RefCell::new(ChangeTracker::new()),
                change: Signal::new(),
                data_changed: Signal::new(),
                streaming: Signal::new(),
                patching: Signal::new(),
            }),
        };
        source.warn_inconsistent_lengths();
        source
    }

    /// Starts building a source column by column.
    pub fn builder() -> ColumnDataSourceBuilder {
        ColumnDataSourceBuilder::default()
    }

    /// Process-wide identity of this source.
    #[inline]
    pub fn id(&self) -> SourceId {
        self.inner.id
    }

    /// Returns true if both handles refer to the same source.
    pub fn ptr_eq(&self, other: &ColumnDataSource) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns a weak handle that does not keep the source alive.
    pub fn downgrade(&self) -> WeakSource {
        WeakSource {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // ========== Signals ==========

    /// Emitted after `set_column` / `remove_column`.
    pub fn change(&self) -> &Signal<()> {
        &self.inner.change
    }

    /// Emitted after `set_data` replaced the whole mapping.
    pub fn data_changed(&self) -> &Signal<()> {
        &self.inner.data_changed
    }

    /// Emitted after a successful `stream`.
    pub fn streaming(&self) -> &Signal<StreamEvent> {
        &self.inner.streaming
    }

    /// Emitted after a successful `patch`.
    pub fn patching(&self) -> &Signal<PatchEvent> {
        &self.inner.patching
    }

    // ========== Reading ==========

    /// Borrows one column.
    ///
    /// Mutations of this source fail with `Error::Borrowed` while the guard
    /// is alive; drop it before calling `stream`, `patch` or the `set_*`
    /// methods.
    pub fn get_column(&self, name: &str) -> Option<Ref<'_, Column>> {
        Ref::filter_map(self.inner.data.borrow(), |data| data.get(name)).ok()
    }

    /// Returns true if a column of that name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.inner.data.borrow().contains_key(name)
    }

    /// Borrows the whole column map. The same borrowing rule as for
    /// `get_column` applies.
    pub fn columns(&self) -> Ref<'_, ColumnMap> {
        self.inner.data.borrow()
    }

    /// Column names in ascending order.
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.data.borrow().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.inner.data.borrow().len()
    }

    /// Common row count of the columns.
    ///
    /// Returns `None` for a source without columns. When columns disagree, a
    /// soft query answers with the shortest length; a strict one fails with
    /// `Error::InconsistentLengths`. The disagreement itself is logged once,
    /// by the mutation that introduced it.
    pub fn get_length(&self, soft: bool) -> Result<Option<usize>> {
        let lengths = self.lengths();
        let Some(&min) = lengths.iter().min() else {
            return Ok(None);
        };
        if !soft && lengths.iter().any(|len| *len != min) {
            return Err(Error::InconsistentLengths { lengths });
        }
        Ok(Some(min))
    }

    /// Soft row count. `None` when the source has no columns.
    pub fn len(&self) -> Option<usize> {
        // A soft query never fails
        self.get_length(true).unwrap_or(None)
    }

    /// Returns true if the source has no rows.
    pub fn is_empty(&self) -> bool {
        self.len().unwrap_or(0) == 0
    }

    fn lengths(&self) -> Vec<usize> {
        let data = self.inner.data.borrow();
        let mut named: Vec<(&String, usize)> = data.iter().map(|(k, c)| (k, c.len())).collect();
        named.sort_unstable_by(|a, b| a.0.cmp(b.0));
        named.into_iter().map(|(_, len)| len).collect()
    }

    /// Logs a warning if the columns disagree on their length. Returns true
    /// if it warned.
    fn warn_inconsistent_lengths(&self) -> bool {
        let lengths = self.lengths();
        let Some(&min) = lengths.iter().min() else {
            return false;
        };
        if lengths.iter().all(|len| *len == min) {
            return false;
        }
        tracing::warn!(
            "data source {} has columns of inconsistent lengths {:?}, using {}",
            self.id(),
            lengths,
            min
        );
        true
    }

    /// Borrows the column map for writing.
    ///
    /// Fails instead of panicking while a guard from `get_column` or
    /// `columns` is still alive.
    fn data_mut(&self) -> Result<RefMut<'_, ColumnMap>> {
        self.inner
            .data
            .try_borrow_mut()
            .map_err(|_| Error::borrowed("data source columns"))
    }

    // ========== Mutation ==========

    /// Replaces the whole column map and emits `data_changed`.
    pub fn set_data(&self, data: ColumnMap) -> Result<()> {
        *self.data_mut()? = data;
        self.inner.tracker.borrow_mut().touch_structure();
        self.warn_inconsistent_lengths();
        self.inner.data_changed.emit(&())
    }

    /// Inserts or replaces a column and emits `change`.
    pub fn set_column(&self, name: impl Into<String>, column: impl Into<Column>) -> Result<()> {
        let name = name.into();
        self.data_mut()?.insert(name.clone(), column.into());
        self.inner.tracker.borrow_mut().touch_columns([name.as_str()]);
        self.warn_inconsistent_lengths();
        self.inner.change.emit(&())
    }

    /// Removes a column, emitting `change` if it existed.
    pub fn remove_column(&self, name: &str) -> Result<Option<Column>> {
        let removed = self.data_mut()?.remove(name);
        if removed.is_some() {
            self.inner.tracker.borrow_mut().touch_structure();
            self.warn_inconsistent_lengths();
            self.inner.change.emit(&())?;
        }
        Ok(removed)
    }

    /// Appends rows to every column, keeping at most `rollover` rows.
    ///
    /// `new_data` must name exactly the existing columns and give each the
    /// same number of rows. Nothing is modified unless the whole update is
    /// valid.
    pub fn stream(&self, new_data: BTreeMap<String, Column>, rollover: Option<usize>) -> Result<()> {
        let mut data = self.data_mut()?;
        check_stream_columns(&data, &new_data)?;

        let lengths: Vec<usize> = new_data.values().map(Column::len).collect();
        if lengths.windows(2).any(|w| w[0] != w[1]) {
            return Err(Error::StreamLengths { lengths });
        }
        for (name, new) in &new_data {
            if let Some(old) = data.get(name) {
                check_stream(old, new).map_err(|e| e.with_column(name))?;
            }
        }

        for (name, new) in &new_data {
            if let Some(slot) = data.get_mut(name) {
                let old = core::mem::take(slot);
                *slot = stream_to_column(old, new, rollover).map_err(|e| e.with_column(name))?;
            }
        }
        drop(data);

        self.inner
            .tracker
            .borrow_mut()
            .touch_columns(new_data.keys().map(String::as_str));
        self.warn_inconsistent_lengths();

        tracing::trace!(
            "streamed {} rows into data source {}",
            new_data.values().next().map(Column::len).unwrap_or(0),
            self.id()
        );
        self.inner.streaming.emit(&StreamEvent { new_data, rollover })
    }

    /// Applies partial updates to columns.
    ///
    /// Each column's patches run in order against a copy of it. The copies
    /// replace the columns only once every patch of every column succeeded,
    /// so a rejected batch leaves the source untouched.
    pub fn patch(&self, patches: BTreeMap<String, Vec<Patch>>) -> Result<()> {
        let mut data = self.data_mut()?;
        let patched: Vec<(Column, BTreeSet<usize>)> = patches
            .iter()
            .map(|(name, column_patches)| {
                let column = data.get(name).ok_or_else(|| Error::column_not_found(name.as_str()))?;
                patched_column(column, column_patches).map_err(|e| e.with_column(name))
            })
            .collect::<Result<_>>()?;

        let mut rows = BTreeSet::new();
        for (name, (column, touched)) in patches.keys().zip(patched) {
            if let Some(slot) = data.get_mut(name) {
                *slot = column;
            }
            rows.extend(touched);
        }
        drop(data);

        self.inner
            .tracker
            .borrow_mut()
            .touch_columns(patches.keys().map(String::as_str));

        let event = PatchEvent {
            rows: rows.into_iter().collect(),
            columns: patches.into_keys().collect(),
        };
        self.inner.patching.emit(&event)
    }

    // ========== Change tracking ==========

    /// Returns true if anything `deps` covers changed since `consumer` last
    /// asked, and marks the consumer as up to date.
    pub fn changed_for(&self, consumer: ConsumerId, deps: &Dependencies) -> bool {
        self.inner.tracker.borrow_mut().changed_for(consumer, deps)
    }

    /// Drops the change bookkeeping for a consumer.
    pub fn forget_consumer(&self, consumer: ConsumerId) {
        self.inner.tracker.borrow_mut().forget(consumer);
    }
}

fn check_stream_columns(data: &ColumnMap, new_data: &BTreeMap<String, Column>) -> Result<()> {
    let mut missing: Vec<String> = data
        .keys()
        .filter(|name| !new_data.contains_key(name.as_str()))
        .cloned()
        .collect();
    missing.sort_unstable();
    let extra: Vec<String> = new_data
        .keys()
        .filter(|name| !data.contains_key(name.as_str()))
        .cloned()
        .collect();
    if missing.is_empty() && extra.is_empty() {
        Ok(())
    } else {
        Err(Error::StreamColumns { missing, extra })
    }
}

impl fmt::Debug for ColumnDataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDataSource")
            .field("id", &self.inner.id)
            .field("columns", &self.column_names())
            .field("len", &self.len())
            .finish()
    }
}

/// Weak counterpart of `ColumnDataSource`.
#[derive(Clone)]
pub struct WeakSource {
    inner: Weak<SourceInner>,
}

impl WeakSource {
    /// Returns a strong handle if the source is still alive.
    pub fn upgrade(&self) -> Option<ColumnDataSource> {
        self.inner.upgrade().map(|inner| ColumnDataSource { inner })
    }

    /// Returns true if the source has been dropped.
    pub fn is_dropped(&self) -> bool {
        self.inner.strong_count() == 0
    }
}

impl fmt::Debug for WeakSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakSource")
            .field("dropped", &self.is_dropped())
            .finish()
    }
}

/// Builder for `ColumnDataSource`.
#[derive(Debug, Default)]
pub struct ColumnDataSourceBuilder {
    data: ColumnMap,
}

impl ColumnDataSourceBuilder {
    /// Adds a column, replacing any previous column of that name.
    pub fn column(mut self, name: impl Into<String>, column: impl Into<Column>) -> Self {
        self.data.insert(name.into(), column.into());
        self
    }

    pub fn build(self) -> ColumnDataSource {
        ColumnDataSource::from_columns(self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::Patch;
    use alloc::vec;
    use prism_core::{Slice, Value};

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().map(|v| Value::Int(*v)).collect()
    }

    fn counter<P: 'static>(signal: &Signal<P>) -> (Rc<RefCell<usize>>, prism_reactive::Connection) {
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let conn = signal.connect(move |_| {
            *c.borrow_mut() += 1;
            Ok(())
        });
        (count, conn)
    }

    #[test]
    fn test_builder_and_reads() {
        let source = ColumnDataSource::builder()
            .column("x", vec![1.0, 2.0, 3.0])
            .column("y", ints(&[4, 5, 6]))
            .build();
        assert_eq!(source.column_names(), vec!["x", "y"]);
        assert_eq!(source.len(), Some(3));
        assert_eq!(source.get_column("y").and_then(|c| c.get(1)), Some(Value::Int(5)));
        assert!(source.get_column("z").is_none());
        assert!(source.has_column("x"));
    }

    #[test]
    fn test_length_of_empty_source() {
        let source = ColumnDataSource::new();
        assert_eq!(source.len(), None);
        assert_eq!(source.get_length(false).unwrap(), None);
        assert!(source.is_empty());
    }

    #[test]
    fn test_inconsistent_lengths() {
        let source = ColumnDataSource::builder()
            .column("a", ints(&[1, 2, 3]))
            .column("b", ints(&[1, 2]))
            .build();
        assert_eq!(source.get_length(true).unwrap(), Some(2));
        assert_eq!(
            source.get_length(false).unwrap_err(),
            Error::InconsistentLengths { lengths: vec![3, 2] }
        );
    }

    #[test]
    fn test_inconsistent_lengths_warned_by_mutation() {
        let source = ColumnDataSource::builder().column("a", ints(&[1, 2])).build();
        assert!(!source.warn_inconsistent_lengths());

        source.set_column("b", ints(&[1])).unwrap();
        assert!(source.warn_inconsistent_lengths());
        // Reads answer with the shortest column without failing
        assert_eq!(source.len(), Some(1));

        source.remove_column("b").unwrap();
        assert!(!source.warn_inconsistent_lengths());
    }

    #[test]
    fn test_mutation_while_column_borrowed() {
        let source = ColumnDataSource::builder().column("x", ints(&[1, 2])).build();
        let (count, _conn) = counter(source.patching());
        let mut patches = BTreeMap::new();
        patches.insert(String::from("x"), vec![Patch::scalar(0, 9)]);

        let guard = source.get_column("x");
        assert_eq!(source.patch(patches.clone()).unwrap_err(), Error::borrowed("data source columns"));
        assert_eq!(
            source.set_column("y", ints(&[0, 0])).unwrap_err(),
            Error::borrowed("data source columns")
        );
        drop(guard);

        source.patch(patches).unwrap();
        assert_eq!(*count.borrow(), 1);
        assert_eq!(source.get_column("x").and_then(|c| c.get(0)), Some(Value::Int(9)));
        assert!(!source.has_column("y"));
    }

    #[test]
    fn test_rejected_patch_batch_leaves_source_untouched() {
        let rows = || Column::from(vec![Value::from(ints(&[1, 2, 3])), Value::from(ints(&[4, 5, 6]))]);
        let source = ColumnDataSource::builder()
            .column("xs", rows())
            .column("y", ints(&[0, 0]))
            .build();
        let (count, _conn) = counter(source.patching());
        let consumer = ConsumerId::next();
        source.changed_for(consumer, &Dependencies::All);

        let mut patches = BTreeMap::new();
        patches.insert(String::from("y"), vec![Patch::scalar(1, 5)]);
        patches.insert(
            String::from("xs"),
            vec![
                Patch {
                    index: crate::patch::PatchIndex::Scalar(0),
                    value: crate::patch::PatchValue::List(ints(&[9])),
                },
                Patch::nested(0, 2usize, ints(&[7])),
            ],
        );
        let err = source.patch(patches).unwrap_err();
        assert!(matches!(err, Error::InvalidPatch { ref column, .. } if column == "xs"));

        assert_eq!(*source.get_column("xs").unwrap(), rows());
        assert_eq!(*source.get_column("y").unwrap(), Column::from(ints(&[0, 0])));
        assert_eq!(*count.borrow(), 0);
        assert!(!source.changed_for(consumer, &Dependencies::All));
    }

    #[test]
    fn test_set_column_emits_change() {
        let source = ColumnDataSource::new();
        let (count, _conn) = counter(source.change());
        source.set_column("x", ints(&[1])).unwrap();
        assert_eq!(*count.borrow(), 1);

        assert!(source.remove_column("missing").unwrap().is_none());
        assert_eq!(*count.borrow(), 1);
        assert!(source.remove_column("x").unwrap().is_some());
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_set_data_emits_data_changed() {
        let source = ColumnDataSource::new();
        let (changed, _c1) = counter(source.data_changed());
        let (change, _c2) = counter(source.change());

        let mut data = ColumnMap::default();
        data.insert("x".into(), Column::from(vec![1.0]));
        source.set_data(data).unwrap();

        assert_eq!(*changed.borrow(), 1);
        assert_eq!(*change.borrow(), 0);
        assert_eq!(source.len(), Some(1));
    }

    #[test]
    fn test_stream() {
        let source = ColumnDataSource::builder().column("x", ints(&[1, 2, 3])).build();
        let events = Rc::new(RefCell::new(Vec::new()));
        let e = events.clone();
        let _conn = source.streaming().connect(move |ev: &StreamEvent| {
            e.borrow_mut().push(ev.rollover);
            Ok(())
        });

        let mut new_data = BTreeMap::new();
        new_data.insert(String::from("x"), Column::from(ints(&[4, 5])));
        source.stream(new_data, Some(4)).unwrap();

        assert_eq!(source.get_column("x").map(|c| c.to_values()), Some(ints(&[2, 3, 4, 5])));
        assert_eq!(*events.borrow(), vec![Some(4)]);
    }

    #[test]
    fn test_stream_column_mismatch() {
        let source = ColumnDataSource::builder()
            .column("x", ints(&[1]))
            .column("y", ints(&[1]))
            .build();
        let mut new_data = BTreeMap::new();
        new_data.insert(String::from("x"), Column::from(ints(&[2])));
        new_data.insert(String::from("z"), Column::from(ints(&[2])));

        let err = source.stream(new_data, None).unwrap_err();
        assert_eq!(
            err,
            Error::StreamColumns {
                missing: vec!["y".into()],
                extra: vec!["z".into()],
            }
        );
        assert_eq!(source.len(), Some(1));
    }

    #[test]
    fn test_stream_length_mismatch() {
        let source = ColumnDataSource::builder()
            .column("x", ints(&[1]))
            .column("y", ints(&[1]))
            .build();
        let mut new_data = BTreeMap::new();
        new_data.insert(String::from("x"), Column::from(ints(&[2, 3])));
        new_data.insert(String::from("y"), Column::from(ints(&[2])));

        let err = source.stream(new_data, None).unwrap_err();
        assert_eq!(err, Error::StreamLengths { lengths: vec![2, 1] });
    }

    #[test]
    fn test_stream_rejects_bad_typed_data_atomically() {
        let source = ColumnDataSource::builder()
            .column("a", ints(&[1]))
            .column("b", vec![1.0])
            .build();
        let mut new_data = BTreeMap::new();
        new_data.insert(String::from("a"), Column::from(ints(&[2])));
        new_data.insert(String::from("b"), Column::from(vec![Value::from("nope")]));

        let err = source.stream(new_data, None).unwrap_err();
        assert!(matches!(err, Error::UnsupportedColumn { ref column, .. } if column == "b"));
        assert_eq!(source.get_column("a").map(|c| c.len()), Some(1));
    }

    #[test]
    fn test_patch() {
        let source = ColumnDataSource::builder()
            .column("x", ints(&[1, 2, 3, 4, 5]))
            .column("y", vec![0.0; 5])
            .build();
        let events = Rc::new(RefCell::new(Vec::new()));
        let e = events.clone();
        let _conn = source.patching().connect(move |ev: &PatchEvent| {
            e.borrow_mut().push(ev.clone());
            Ok(())
        });

        let mut patches = BTreeMap::new();
        patches.insert(
            String::from("x"),
            vec![Patch::slice(Slice::range(1, 3), ints(&[20, 30]))],
        );
        patches.insert(String::from("y"), vec![Patch::scalar(4, 1.5)]);
        source.patch(patches).unwrap();

        assert_eq!(
            source.get_column("x").map(|c| c.to_values()),
            Some(ints(&[1, 20, 30, 4, 5]))
        );
        assert_eq!(source.get_column("y").and_then(|c| c.get(4)), Some(Value::Float(1.5)));
        assert_eq!(
            *events.borrow(),
            vec![PatchEvent {
                rows: vec![1, 2, 4],
                columns: vec!["x".into(), "y".into()],
            }]
        );
    }

    #[test]
    fn test_patch_unknown_column() {
        let source = ColumnDataSource::builder().column("x", ints(&[1])).build();
        let mut patches = BTreeMap::new();
        patches.insert(String::from("x"), vec![Patch::scalar(0, 9)]);
        patches.insert(String::from("q"), vec![Patch::scalar(0, 9)]);

        let err = source.patch(patches).unwrap_err();
        assert_eq!(err, Error::column_not_found("q"));
        // Nothing applied
        assert_eq!(source.get_column("x").and_then(|c| c.get(0)), Some(Value::Int(1)));
    }

    #[test]
    fn test_patch_error_names_column() {
        let source = ColumnDataSource::builder().column("x", ints(&[1])).build();
        let mut patches = BTreeMap::new();
        patches.insert(String::from("x"), vec![Patch::scalar(5, 9)]);
        match source.patch(patches).unwrap_err() {
            Error::InvalidPatch { column, .. } => assert_eq!(column, "x"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_changed_for_tracks_columns() {
        let source = ColumnDataSource::builder()
            .column("x", ints(&[1, 2]))
            .column("y", ints(&[1, 2]))
            .build();
        let consumer = ConsumerId::next();
        let deps = Dependencies::columns(["x"]);
        assert!(source.changed_for(consumer, &deps));
        assert!(!source.changed_for(consumer, &deps));

        let mut patches = BTreeMap::new();
        patches.insert(String::from("y"), vec![Patch::scalar(0, 7)]);
        source.patch(patches).unwrap();
        assert!(!source.changed_for(consumer, &deps));

        source.set_column("x", ints(&[3, 4])).unwrap();
        assert!(source.changed_for(consumer, &deps));
    }

    #[test]
    fn test_slot_may_read_source_during_emit() {
        let source = ColumnDataSource::builder().column("x", ints(&[1])).build();
        let seen = Rc::new(RefCell::new(None));
        let s = seen.clone();
        let weak = source.downgrade();
        let _conn = source.change().connect(move |_| {
            if let Some(src) = weak.upgrade() {
                *s.borrow_mut() = src.len();
            }
            Ok(())
        });
        source.set_column("x", ints(&[1, 2, 3])).unwrap();
        assert_eq!(*seen.borrow(), Some(3));
    }

    #[test]
    fn test_weak_source() {
        let source = ColumnDataSource::new();
        let weak = source.downgrade();
        assert!(weak.upgrade().is_some_and(|s| s.ptr_eq(&source)));
        drop(source);
        assert!(weak.is_dropped());
        assert!(weak.upgrade().is_none());
    }
}
