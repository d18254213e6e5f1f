//! The expression trait.

use prism_core::Result;
use prism_source::{ColumnDataSource, Dependencies};

/// A pure function of a data source's columns.
///
/// Wrap an expression in [`Memoized`](crate::Memoized) to cache its result
/// per source.
pub trait Expression {
    /// The computed result.
    type Output;

    /// Columns the result depends on. Defaults to every column.
    fn dependencies(&self) -> Dependencies {
        Dependencies::All
    }

    /// Computes the result for `source`.
    fn compute(&self, source: &ColumnDataSource) -> Result<Self::Output>;
}

impl<E: Expression + ?Sized> Expression for &E {
    type Output = E::Output;

    fn dependencies(&self) -> Dependencies {
        (**self).dependencies()
    }

    fn compute(&self, source: &ColumnDataSource) -> Result<Self::Output> {
        (**self).compute(source)
    }
}
