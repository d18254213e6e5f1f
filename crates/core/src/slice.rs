//! Half-open, strided ranges over row positions.

use crate::error::{Error, Result};
use alloc::format;
use alloc::vec::Vec;

/// A `start:stop:step` range with optional bounds.
///
/// Missing bounds resolve against a length: `start` defaults to 0, `stop` to
/// the length and `step` to 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Slice {
    pub start: Option<usize>,
    pub stop: Option<usize>,
    pub step: Option<usize>,
}

impl Slice {
    /// Creates a slice with every bound given.
    pub fn new(start: usize, stop: usize, step: usize) -> Self {
        Self {
            start: Some(start),
            stop: Some(stop),
            step: Some(step),
        }
    }

    /// Creates an unbounded slice covering everything.
    pub fn full() -> Self {
        Self::default()
    }

    /// Creates a unit-step slice `start..stop`.
    pub fn range(start: usize, stop: usize) -> Self {
        Self {
            start: Some(start),
            stop: Some(stop),
            step: None,
        }
    }

    /// Sets the step.
    pub fn with_step(mut self, step: usize) -> Self {
        self.step = Some(step);
        self
    }

    /// Resolves missing bounds against `len` into `(start, stop, step)`.
    ///
    /// Bounds are not clamped to `len`; callers that index with the result
    /// check `stop` themselves.
    pub fn resolve(&self, len: usize) -> Result<(usize, usize, usize)> {
        let start = self.start.unwrap_or(0);
        let stop = self.stop.unwrap_or(len);
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(Error::invalid_slice("step must be positive"));
        }
        if start > stop {
            return Err(Error::invalid_slice(format!(
                "start {} is greater than stop {}",
                start, stop
            )));
        }
        Ok((start, stop, step))
    }

    /// Number of positions the resolved slice addresses.
    pub fn count(&self, len: usize) -> Result<usize> {
        let (start, stop, step) = self.resolve(len)?;
        Ok((stop - start + step - 1) / step)
    }

    /// Positions the resolved slice addresses, in order.
    pub fn indices(&self, len: usize) -> Result<Vec<usize>> {
        let (start, stop, step) = self.resolve(len)?;
        Ok((start..stop).step_by(step).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_resolve_defaults() {
        assert_eq!(Slice::full().resolve(7).unwrap(), (0, 7, 1));
        assert_eq!(Slice::range(2, 4).resolve(7).unwrap(), (2, 4, 1));
    }

    #[test]
    fn test_resolve_rejects_bad_bounds() {
        assert!(Slice::new(0, 4, 0).resolve(10).is_err());
        assert!(Slice::range(5, 2).resolve(10).is_err());
    }

    #[test]
    fn test_count_and_indices() {
        let s = Slice::new(1, 8, 3);
        assert_eq!(s.count(10).unwrap(), 3);
        assert_eq!(s.indices(10).unwrap(), vec![1, 4, 7]);

        let empty = Slice::range(3, 3);
        assert_eq!(empty.count(10).unwrap(), 0);
        assert!(empty.indices(10).unwrap().is_empty());
    }

    #[test]
    fn test_stop_beyond_len_is_kept() {
        // Bounds checking is left to the caller
        assert_eq!(Slice::range(0, 12).resolve(4).unwrap(), (0, 12, 1));
    }
}
