//! Fixed element size arrays.
//!
//! `TypedArray<T>` is a boxed slice plus a shape. The buffer never grows in
//! place: operations that change the element count allocate a new buffer,
//! which is what lets the streaming path reason about capacity exactly.

use crate::error::{Error, Result};
use crate::value::Value;
use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

/// Element type of a typed array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    Uint8,
    Int32,
    Float32,
    Float64,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::Uint8 => "uint8",
            DType::Int32 => "int32",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
        };
        f.write_str(name)
    }
}

/// A numeric element that can live in a `TypedArray`.
pub trait Element: Copy + Default + PartialEq + fmt::Debug + 'static {
    /// The dtype tag for this element type.
    const DTYPE: DType;

    /// Converts a dynamic value, or returns None if it is not numeric.
    ///
    /// Conversions follow typed-array assignment: booleans become 0/1, null
    /// becomes the NaN/zero of the type, out-of-range integers wrap.
    fn from_value(value: &Value) -> Option<Self>;

    /// Converts this element into a dynamic value.
    fn to_value(self) -> Value;

    /// Converts this element into a float.
    fn to_f64(self) -> f64;
}

impl Element for u8 {
    const DTYPE: DType = DType::Uint8;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(*v as u8),
            Value::Float(v) => Some(*v as i64 as u8),
            Value::Boolean(v) => Some(*v as u8),
            Value::Null => Some(0),
            _ => None,
        }
    }

    fn to_value(self) -> Value {
        Value::Int(self as i64)
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Element for i32 {
    const DTYPE: DType = DType::Int32;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(*v as i32),
            Value::Float(v) => Some(*v as i32),
            Value::Boolean(v) => Some(*v as i32),
            Value::Null => Some(0),
            _ => None,
        }
    }

    fn to_value(self) -> Value {
        Value::Int(self as i64)
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Element for f32 {
    const DTYPE: DType = DType::Float32;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(*v as f32),
            Value::Float(v) => Some(*v as f32),
            Value::Boolean(v) => Some(*v as u8 as f32),
            Value::Null => Some(f32::NAN),
            _ => None,
        }
    }

    fn to_value(self) -> Value {
        Value::Float(self as f64)
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Element for f64 {
    const DTYPE: DType = DType::Float64;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Boolean(v) => Some(*v as u8 as f64),
            Value::Null => Some(f64::NAN),
            _ => None,
        }
    }

    fn to_value(self) -> Value {
        Value::Float(self)
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// A fixed-capacity buffer of `T` with an n-dimensional shape.
#[derive(Clone, PartialEq)]
pub struct TypedArray<T: Element> {
    data: Box<[T]>,
    shape: Vec<usize>,
}

impl<T: Element> TypedArray<T> {
    /// Creates a 1-D array from a vector.
    pub fn from_vec(data: Vec<T>) -> Self {
        let len = data.len();
        Self {
            data: data.into_boxed_slice(),
            shape: vec![len],
        }
    }

    /// Creates a 1-D array from a boxed buffer without copying.
    pub fn from_boxed(data: Box<[T]>) -> Self {
        let len = data.len();
        Self {
            data,
            shape: vec![len],
        }
    }

    /// Creates an array with an explicit shape.
    ///
    /// Fails if the product of the shape does not match the element count.
    pub fn with_shape(data: Vec<T>, shape: Vec<usize>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(Error::size_mismatch(expected, data.len()));
        }
        Ok(Self {
            data: data.into_boxed_slice(),
            shape,
        })
    }

    /// Creates a zero-filled 1-D array of the given length.
    pub fn zeroed(len: usize) -> Self {
        Self::from_vec(vec![T::default(); len])
    }

    /// Returns the total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if there are no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the shape.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the number of dimensions.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Returns the flat element buffer.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the flat element buffer mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the array and returns its buffer.
    pub fn into_boxed_slice(self) -> Box<[T]> {
        self.data
    }

    /// Stores a dynamic value at a flat position.
    pub fn set_value(&mut self, index: usize, value: &Value) -> Result<()> {
        let len = self.data.len();
        let slot = self
            .data
            .get_mut(index)
            .ok_or_else(|| Error::index_out_of_range(index, len))?;
        *slot = T::from_value(value).ok_or_else(|| Error::type_mismatch(T::DTYPE, value.clone()))?;
        Ok(())
    }
}

impl<T: Element> fmt::Debug for TypedArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedArray")
            .field("dtype", &T::DTYPE)
            .field("shape", &self.shape)
            .field("data", &&self.data[..])
            .finish()
    }
}

/// A typed array of any supported dtype.
#[derive(Clone, Debug, PartialEq)]
pub enum NdArray {
    Uint8(TypedArray<u8>),
    Int32(TypedArray<i32>),
    Float32(TypedArray<f32>),
    Float64(TypedArray<f64>),
}

macro_rules! dispatch {
    ($self:expr, $arr:ident => $body:expr) => {
        match $self {
            NdArray::Uint8($arr) => $body,
            NdArray::Int32($arr) => $body,
            NdArray::Float32($arr) => $body,
            NdArray::Float64($arr) => $body,
        }
    };
}

impl NdArray {
    /// Returns the dtype.
    pub fn dtype(&self) -> DType {
        match self {
            NdArray::Uint8(_) => DType::Uint8,
            NdArray::Int32(_) => DType::Int32,
            NdArray::Float32(_) => DType::Float32,
            NdArray::Float64(_) => DType::Float64,
        }
    }

    /// Returns the total number of elements.
    pub fn len(&self) -> usize {
        dispatch!(self, a => a.len())
    }

    /// Returns true if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the shape.
    pub fn shape(&self) -> &[usize] {
        dispatch!(self, a => a.shape())
    }

    /// Returns the number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Returns the element at a flat position as a dynamic value.
    pub fn get(&self, index: usize) -> Option<Value> {
        dispatch!(self, a => a.as_slice().get(index).map(|v| v.to_value()))
    }

    /// Returns the element at a flat position as a float.
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        dispatch!(self, a => a.as_slice().get(index).map(|v| v.to_f64()))
    }

    /// Stores a dynamic value at a flat position.
    pub fn set(&mut self, index: usize, value: &Value) -> Result<()> {
        dispatch!(self, a => a.set_value(index, value))
    }

    /// Returns true if `value` could be stored in this array.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            NdArray::Uint8(_) => u8::from_value(value).is_some(),
            NdArray::Int32(_) => i32::from_value(value).is_some(),
            NdArray::Float32(_) => f32::from_value(value).is_some(),
            NdArray::Float64(_) => f64::from_value(value).is_some(),
        }
    }

    /// Copies the elements out as dynamic values.
    pub fn to_values(&self) -> Vec<Value> {
        dispatch!(self, a => a.as_slice().iter().map(|v| v.to_value()).collect())
    }

    /// Copies the elements out as floats.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        dispatch!(self, a => a.as_slice().iter().map(|v| v.to_f64()).collect())
    }
}

impl From<Vec<u8>> for NdArray {
    fn from(v: Vec<u8>) -> Self {
        NdArray::Uint8(TypedArray::from_vec(v))
    }
}

impl From<Vec<i32>> for NdArray {
    fn from(v: Vec<i32>) -> Self {
        NdArray::Int32(TypedArray::from_vec(v))
    }
}

impl From<Vec<f32>> for NdArray {
    fn from(v: Vec<f32>) -> Self {
        NdArray::Float32(TypedArray::from_vec(v))
    }
}

impl From<Vec<f64>> for NdArray {
    fn from(v: Vec<f64>) -> Self {
        NdArray::Float64(TypedArray::from_vec(v))
    }
}
