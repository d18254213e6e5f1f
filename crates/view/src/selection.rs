//! Row selections.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

/// A selection of rows, and of points within line-like rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// Selected rows.
    pub indices: Vec<usize>,
    /// Selected rows of a single line glyph.
    pub line_indices: Vec<usize>,
    /// Row → selected points within that row, for multi-line glyphs.
    pub multiline_indices: BTreeMap<usize, Vec<usize>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// A selection of whole rows only.
    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self {
            indices,
            ..Self::default()
        }
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty() && self.line_indices.is_empty() && self.multiline_indices.is_empty()
    }
}
