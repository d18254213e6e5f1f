//! The filter tree.
//!
//! A `Filter` is a shared handle over one node of a filter tree. Leaves
//! compute their row set straight from the data source; combinators evaluate
//! their operands against the same source and fold the results with index
//! set algebra. Every node owns a `changed` signal. Combinators connect to
//! each operand's signal through a weak back-reference and re-emit their own,
//! so a change anywhere in the tree reaches the root without forming `Rc`
//! cycles.

use crate::custom::{CustomFilter, CustomFunc};
use crate::group::{Group, GroupFilter};
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::{Ref, RefCell};
use core::fmt;
use prism_core::{Error, IndexSet, Result, Value};
use prism_reactive::{ConnectionSet, Signal};
use prism_source::ColumnDataSource;

/// The closed set of filter node kinds.
#[derive(Clone, Debug)]
pub enum FilterKind {
    /// Every row.
    AllIndices,
    /// Explicit row positions. `None` selects every row.
    Index(Option<Vec<usize>>),
    /// Boolean row mask. `None` selects every row.
    Boolean(Option<Vec<bool>>),
    Group(GroupFilter),
    Custom(CustomFilter),
    Union(Vec<Filter>),
    Intersection(Vec<Filter>),
    Difference(Vec<Filter>),
    SymmetricDifference(Vec<Filter>),
    Inversion(Filter),
}

impl FilterKind {
    /// Short name of the kind, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::AllIndices => "AllIndices",
            FilterKind::Index(_) => "IndexFilter",
            FilterKind::Boolean(_) => "BooleanFilter",
            FilterKind::Group(_) => "GroupFilter",
            FilterKind::Custom(_) => "CustomFilter",
            FilterKind::Union(_) => "UnionFilter",
            FilterKind::Intersection(_) => "IntersectionFilter",
            FilterKind::Difference(_) => "DifferenceFilter",
            FilterKind::SymmetricDifference(_) => "SymmetricDifferenceFilter",
            FilterKind::Inversion(_) => "InversionFilter",
        }
    }

    /// Direct operands of a combinator; empty for leaves.
    pub fn operands(&self) -> Vec<Filter> {
        match self {
            FilterKind::Union(ops)
            | FilterKind::Intersection(ops)
            | FilterKind::Difference(ops)
            | FilterKind::SymmetricDifference(ops) => ops.clone(),
            FilterKind::Inversion(op) => vec![op.clone()],
            _ => Vec::new(),
        }
    }
}

type Combine = fn(&mut IndexSet, &IndexSet) -> Result<()>;

/// Work left to do once the node's own borrow is released.
enum Pending {
    Custom(CustomFilter),
    Fold(Vec<Filter>, Combine),
    Invert(Filter),
}

struct FilterInner {
    kind: RefCell<FilterKind>,
    changed: Signal<()>,
    operand_connections: RefCell<ConnectionSet>,
}

/// Shared handle to a filter node. Identity is by pointer.
#[derive(Clone)]
pub struct Filter {
    inner: Rc<FilterInner>,
}

impl Filter {
    /// Creates a node of the given kind and wires it to its operands.
    pub fn new(kind: FilterKind) -> Self {
        let filter = Self {
            inner: Rc::new(FilterInner {
                kind: RefCell::new(kind),
                changed: Signal::new(),
                operand_connections: RefCell::new(ConnectionSet::new()),
            }),
        };
        filter.rewire();
        filter
    }

    pub fn all() -> Self {
        Self::new(FilterKind::AllIndices)
    }

    pub fn index(indices: impl Into<Option<Vec<usize>>>) -> Self {
        Self::new(FilterKind::Index(indices.into()))
    }

    pub fn boolean(booleans: impl Into<Option<Vec<bool>>>) -> Self {
        Self::new(FilterKind::Boolean(booleans.into()))
    }

    pub fn group(column_name: impl Into<String>, group: impl Into<Value>) -> Self {
        Self::new(FilterKind::Group(GroupFilter::new(column_name, group)))
    }

    pub fn group_multiple(column_name: impl Into<String>, groups: Vec<Value>) -> Self {
        Self::new(FilterKind::Group(GroupFilter::multiple(column_name, groups)))
    }

    pub fn custom(custom: CustomFilter) -> Self {
        Self::new(FilterKind::Custom(custom))
    }

    pub fn union(operands: Vec<Filter>) -> Self {
        Self::new(FilterKind::Union(operands))
    }

    pub fn intersection(operands: Vec<Filter>) -> Self {
        Self::new(FilterKind::Intersection(operands))
    }

    pub fn difference(operands: Vec<Filter>) -> Self {
        Self::new(FilterKind::Difference(operands))
    }

    pub fn symmetric_difference(operands: Vec<Filter>) -> Self {
        Self::new(FilterKind::SymmetricDifference(operands))
    }

    pub fn inversion(operand: Filter) -> Self {
        Self::new(FilterKind::Inversion(operand))
    }

    /// Emitted whenever this node or any node below it changes.
    pub fn changed(&self) -> &Signal<()> {
        &self.inner.changed
    }

    /// Borrows this node's kind.
    pub fn kind(&self) -> Ref<'_, FilterKind> {
        self.inner.kind.borrow()
    }

    /// Direct operands of this node.
    pub fn operands(&self) -> Vec<Filter> {
        self.inner.kind.borrow().operands()
    }

    /// Returns true if both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Filter) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns true if `target` is reachable from this node's operands.
    pub fn contains(&self, target: &Filter) -> bool {
        self.operands()
            .iter()
            .any(|op| op.ptr_eq(target) || op.contains(target))
    }

    // ========== Evaluation ==========

    /// Computes the selected rows of `source`.
    ///
    /// The capacity of the result is the source's row count, or 1 when the
    /// source has no columns.
    pub fn compute_indices(&self, source: &ColumnDataSource) -> Result<IndexSet> {
        let size = source.len().unwrap_or(1);

        let pending = {
            let kind = self.inner.kind.borrow();
            match &*kind {
                FilterKind::AllIndices | FilterKind::Index(None) | FilterKind::Boolean(None) => {
                    return Ok(IndexSet::all_set(size));
                }
                FilterKind::Index(Some(indices)) => return IndexSet::from_indices(size, indices),
                FilterKind::Boolean(Some(booleans)) => {
                    return Ok(IndexSet::from_booleans(size, booleans));
                }
                FilterKind::Group(group) => return Ok(group.compute(source, size)),
                FilterKind::Custom(custom) => Pending::Custom(custom.clone()),
                FilterKind::Union(ops) => Pending::Fold(ops.clone(), IndexSet::union),
                FilterKind::Intersection(ops) => Pending::Fold(ops.clone(), IndexSet::intersect),
                FilterKind::Difference(ops) => Pending::Fold(ops.clone(), IndexSet::subtract),
                FilterKind::SymmetricDifference(ops) => {
                    Pending::Fold(ops.clone(), IndexSet::symmetric_subtract)
                }
                FilterKind::Inversion(op) => Pending::Invert(op.clone()),
            }
        };

        match pending {
            Pending::Custom(custom) => custom.compute(source, size),
            Pending::Fold(operands, combine) => {
                let mut iter = operands.iter();
                let Some(first) = iter.next() else {
                    return Ok(IndexSet::all_set(size));
                };
                let mut acc = first.compute_indices(source)?;
                for op in iter {
                    combine(&mut acc, &op.compute_indices(source)?)?;
                }
                Ok(acc)
            }
            Pending::Invert(op) => {
                let mut set = op.compute_indices(source)?;
                set.invert();
                Ok(set)
            }
        }
    }

    // ========== Attribute setters ==========

    /// Replaces the node wholesale, rewiring operand notifications.
    pub fn set_kind(&self, kind: FilterKind) -> Result<()> {
        self.check_operands(&kind.operands())?;
        *self.inner.kind.borrow_mut() = kind;
        self.rewire();
        self.inner.changed.emit(&())
    }

    pub fn set_indices(&self, indices: Option<Vec<usize>>) -> Result<()> {
        self.update("indices", |kind| match kind {
            FilterKind::Index(current) => {
                *current = indices;
                true
            }
            _ => false,
        })
    }

    pub fn set_booleans(&self, booleans: Option<Vec<bool>>) -> Result<()> {
        self.update("booleans", |kind| match kind {
            FilterKind::Boolean(current) => {
                *current = booleans;
                true
            }
            _ => false,
        })
    }

    pub fn set_group(&self, group: Group) -> Result<()> {
        self.update("group", |kind| match kind {
            FilterKind::Group(g) => {
                g.group = group;
                true
            }
            _ => false,
        })
    }

    pub fn set_column_name(&self, column_name: impl Into<String>) -> Result<()> {
        let column_name = column_name.into();
        self.update("column_name", |kind| match kind {
            FilterKind::Group(g) => {
                g.column_name = column_name;
                true
            }
            _ => false,
        })
    }

    pub fn set_args(&self, args: Vec<(String, Value)>) -> Result<()> {
        self.update("args", |kind| match kind {
            FilterKind::Custom(c) => {
                c.args = args;
                true
            }
            _ => false,
        })
    }

    pub fn set_func(&self, func: CustomFunc) -> Result<()> {
        self.update("func", |kind| match kind {
            FilterKind::Custom(c) => {
                c.func = func;
                true
            }
            _ => false,
        })
    }

    /// Replaces the operand list of an n-ary combinator.
    pub fn set_operands(&self, operands: Vec<Filter>) -> Result<()> {
        self.check_operands(&operands)?;
        self.update("operands", |kind| match kind {
            FilterKind::Union(ops)
            | FilterKind::Intersection(ops)
            | FilterKind::Difference(ops)
            | FilterKind::SymmetricDifference(ops) => {
                *ops = operands;
                true
            }
            _ => false,
        })
    }

    /// Replaces the operand of an inversion.
    pub fn set_operand(&self, operand: Filter) -> Result<()> {
        self.check_operands(core::slice::from_ref(&operand))?;
        self.update("operand", |kind| match kind {
            FilterKind::Inversion(op) => {
                *op = operand;
                true
            }
            _ => false,
        })
    }

    /// Applies `edit` to the kind; emits `changed` if it applied.
    fn update<F>(&self, attr: &str, edit: F) -> Result<()>
    where
        F: FnOnce(&mut FilterKind) -> bool,
    {
        let rejected_by = {
            let mut kind = self.inner.kind.borrow_mut();
            if edit(&mut *kind) {
                None
            } else {
                Some(kind.name())
            }
        };
        if let Some(name) = rejected_by {
            return Err(Error::invalid_operand(format!("{} has no attribute {}", name, attr)));
        }
        self.rewire();
        self.inner.changed.emit(&())
    }

    fn check_operands(&self, operands: &[Filter]) -> Result<()> {
        for op in operands {
            if op.ptr_eq(self) || op.contains(self) {
                return Err(Error::invalid_operand(format!(
                    "{} cannot be its own operand",
                    self.inner.kind.borrow().name()
                )));
            }
        }
        Ok(())
    }

    /// Drops the previous operand subscriptions and subscribes to the
    /// current operands.
    fn rewire(&self) {
        let operands = self.operands();
        let mut connections = self.inner.operand_connections.borrow_mut();
        connections.clear();
        for op in operands {
            let parent = Rc::downgrade(&self.inner);
            connections.push(op.changed().connect(move |_| match parent.upgrade() {
                Some(inner) => inner.changed.emit(&()),
                None => Ok(()),
            }));
        }
    }
}

impl From<FilterKind> for Filter {
    fn from(kind: FilterKind) -> Self {
        Filter::new(kind)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.kind.try_borrow() {
            Ok(kind) => fmt::Debug::fmt(&*kind, f),
            Err(_) => f.write_str("Filter(<borrowed>)"),
        }
    }
}
