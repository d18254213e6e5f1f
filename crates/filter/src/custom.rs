//! User-supplied filter functions.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use prism_core::{Error, IndexSet, Result, Value};
use prism_source::ColumnDataSource;

/// Filter function: receives the bound argument values in binding order and
/// the source, returns `Null`, an array of row positions or a boolean mask.
pub type CustomFunc = Rc<dyn Fn(&[Value], &ColumnDataSource) -> Result<Value>>;

/// A filter computed by a closure over named argument values.
#[derive(Clone)]
pub struct CustomFilter {
    pub args: Vec<(String, Value)>,
    pub func: CustomFunc,
}

impl CustomFilter {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&[Value], &ColumnDataSource) -> Result<Value> + 'static,
    {
        Self {
            args: Vec::new(),
            func: Rc::new(func),
        }
    }

    /// Binds an argument. Arguments are passed in binding order.
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.push((name.into(), value.into()));
        self
    }

    pub(crate) fn compute(&self, source: &ColumnDataSource, size: usize) -> Result<IndexSet> {
        let values: Vec<Value> = self.args.iter().map(|(_, v)| v.clone()).collect();
        let result = (self.func)(&values, source)?;
        interpret(result, size)
    }
}

impl fmt::Debug for CustomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomFilter")
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Turns a filter function's return value into an index set.
///
/// An empty array counts as an array of integers, so it selects nothing.
fn interpret(result: Value, size: usize) -> Result<IndexSet> {
    let items = match &result {
        Value::Null => return Ok(IndexSet::all_set(size)),
        Value::Array(items) => items.clone(),
        Value::NdArray(arr) if arr.ndim() == 1 => arr.to_values(),
        _ => return Err(Error::invalid_filter_result(result)),
    };

    if items.iter().all(Value::is_integer) {
        let mut indices = Vec::with_capacity(items.len());
        for item in &items {
            match item.as_index() {
                Some(i) => indices.push(i),
                None => return Err(Error::invalid_filter_result(result)),
            }
        }
        return IndexSet::from_indices(size, &indices);
    }

    let booleans: Option<Vec<bool>> = items.iter().map(Value::as_bool).collect();
    match booleans {
        Some(mask) => Ok(IndexSet::from_booleans(size, &mask)),
        None => Err(Error::invalid_filter_result(result)),
    }
}
