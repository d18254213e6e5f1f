//! Column storage.

use alloc::vec::Vec;
use prism_core::{NdArray, TypedArray, Value};

/// Backing storage of one column.
///
/// `Array` columns grow freely and may hold nested arrays or nd-arrays per
/// row (ragged data). `Typed` columns are fixed element size buffers whose
/// first dimension is the row count.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    Array(Vec<Value>),
    Typed(NdArray),
}

impl Column {
    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Column::Array(values) => values.len(),
            Column::Typed(arr) => arr.shape().first().copied().unwrap_or(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true for fixed element size storage.
    pub fn is_typed(&self) -> bool {
        matches!(self, Column::Typed(_))
    }

    /// Returns the row at `index`.
    ///
    /// Rows of a multi-dimensional typed column come back as arrays.
    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            Column::Array(values) => values.get(index).cloned(),
            Column::Typed(arr) if arr.ndim() <= 1 => arr.get(index),
            Column::Typed(arr) => {
                if index >= self.len() {
                    return None;
                }
                let block: usize = arr.shape()[1..].iter().product();
                let start = index * block;
                let row = (start..start + block).filter_map(|i| arr.get(i)).collect::<Vec<_>>();
                Some(Value::Array(row))
            }
        }
    }

    /// Compares the row at `index` against `target` with deep value equality.
    pub fn value_eq(&self, index: usize, target: &Value) -> bool {
        match self {
            Column::Array(values) => values.get(index).map(|v| v == target).unwrap_or(false),
            Column::Typed(arr) if arr.ndim() <= 1 => {
                arr.get(index).map(|v| v == *target).unwrap_or(false)
            }
            Column::Typed(_) => self.get(index).map(|v| v == *target).unwrap_or(false),
        }
    }

    /// Copies every row out as a dynamic value.
    pub fn to_values(&self) -> Vec<Value> {
        match self {
            Column::Array(values) => values.clone(),
            Column::Typed(arr) if arr.ndim() <= 1 => arr.to_values(),
            Column::Typed(_) => (0..self.len()).filter_map(|i| self.get(i)).collect(),
        }
    }

    /// Copies the rows out as floats. Non-numeric rows become NaN.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            Column::Array(values) => values
                .iter()
                .map(|v| match v {
                    Value::Boolean(b) => f64::from(u8::from(*b)),
                    other => other.as_f64().unwrap_or(f64::NAN),
                })
                .collect(),
            Column::Typed(arr) if arr.ndim() <= 1 => arr.to_f64_vec(),
            Column::Typed(_) => (0..self.len()).map(|_| f64::NAN).collect(),
        }
    }
}

impl Default for Column {
    fn default() -> Self {
        Column::Array(Vec::new())
    }
}

impl From<Vec<Value>> for Column {
    fn from(values: Vec<Value>) -> Self {
        Column::Array(values)
    }
}

impl From<NdArray> for Column {
    fn from(arr: NdArray) -> Self {
        Column::Typed(arr)
    }
}

macro_rules! typed_column_from {
    ($($t:ty => $variant:ident),*) => {
        $(
            impl From<Vec<$t>> for Column {
                fn from(data: Vec<$t>) -> Self {
                    Column::Typed(NdArray::$variant(TypedArray::from_vec(data)))
                }
            }
        )*
    };
}

typed_column_from!(u8 => Uint8, i32 => Int32, f32 => Float32, f64 => Float64);
