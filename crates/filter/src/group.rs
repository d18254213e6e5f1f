//! Group filter: rows whose column value matches a target.

use alloc::string::String;
use alloc::vec::Vec;
use prism_core::{IndexSet, Value};
use prism_source::ColumnDataSource;

/// Target value(s) of a group filter.
#[derive(Clone, Debug, PartialEq)]
pub enum Group {
    /// Rows equal to this value.
    Single(Value),
    /// Rows equal to any of these values.
    Multiple(Vec<Value>),
}

impl Group {
    fn matches(&self, column: &prism_source::Column, row: usize) -> bool {
        match self {
            Group::Single(target) => column.value_eq(row, target),
            Group::Multiple(targets) => targets.iter().any(|t| column.value_eq(row, t)),
        }
    }
}

/// Selects the rows of `column_name` that deep-equal the group.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupFilter {
    pub column_name: String,
    pub group: Group,
}

impl GroupFilter {
    pub fn new(column_name: impl Into<String>, group: impl Into<Value>) -> Self {
        Self {
            column_name: column_name.into(),
            group: Group::Single(group.into()),
        }
    }

    pub fn multiple(column_name: impl Into<String>, groups: Vec<Value>) -> Self {
        Self {
            column_name: column_name.into(),
            group: Group::Multiple(groups),
        }
    }

    /// Computes the matching rows. A missing column selects every row.
    pub(crate) fn compute(&self, source: &ColumnDataSource, size: usize) -> IndexSet {
        match source.get_column(&self.column_name) {
            Some(column) => IndexSet::select(size, |row| self.group.matches(&column, row)),
            None => {
                tracing::warn!(
                    "group filter could not find column '{}', selecting all rows",
                    self.column_name
                );
                IndexSet::all_set(size)
            }
        }
    }
}
