//! Rollover-bounded column append.

use crate::column::Column;
use alloc::format;
use alloc::vec::Vec;
use prism_core::{Element, Error, NdArray, Result, TypedArray, Value};

/// Checks that `new` can be appended to `old` without touching either.
///
/// Errors carry no column name; callers attach one with `Error::with_column`.
pub fn check_stream(old: &Column, new: &Column) -> Result<()> {
    let Column::Typed(arr) = old else {
        return Ok(());
    };
    if arr.ndim() != 1 {
        return Err(Error::unsupported_column(
            "",
            format!("cannot stream to a {}-d typed array", arr.ndim()),
        ));
    }
    match new {
        Column::Typed(incoming) if incoming.ndim() != 1 => Err(Error::unsupported_column(
            "",
            format!("cannot stream a {}-d typed array", incoming.ndim()),
        )),
        Column::Typed(_) => Ok(()),
        Column::Array(values) => match values.iter().find(|v| !arr.accepts(v)) {
            Some(bad) => Err(Error::unsupported_column(
                "",
                format!("cannot stream {} into a {} array", bad, arr.dtype()),
            )),
            None => Ok(()),
        },
    }
}

/// Appends `new` to `old`, keeping at most `rollover` trailing rows.
///
/// The backing kind of `old` is preserved. A typed column that is already
/// exactly `rollover` long is updated in place; otherwise the result is a
/// fresh buffer of exactly the retained length.
pub fn stream_to_column(old: Column, new: &Column, rollover: Option<usize>) -> Result<Column> {
    check_stream(&old, new)?;
    match old {
        Column::Array(mut values) => {
            match new {
                Column::Array(incoming) => values.extend(incoming.iter().cloned()),
                Column::Typed(incoming) => values.extend(incoming.to_values()),
            }
            if let Some(rollover) = rollover {
                if values.len() > rollover {
                    let excess = values.len() - rollover;
                    values.drain(..excess);
                }
            }
            Ok(Column::Array(values))
        }
        Column::Typed(arr) => {
            let streamed = match arr {
                NdArray::Uint8(a) => NdArray::Uint8(stream_typed(a, &convert(new)?, rollover)),
                NdArray::Int32(a) => NdArray::Int32(stream_typed(a, &convert(new)?, rollover)),
                NdArray::Float32(a) => NdArray::Float32(stream_typed(a, &convert(new)?, rollover)),
                NdArray::Float64(a) => NdArray::Float64(stream_typed(a, &convert(new)?, rollover)),
            };
            Ok(Column::Typed(streamed))
        }
    }
}

fn convert<T: Element>(new: &Column) -> Result<Vec<T>> {
    let values: Vec<Value> = match new {
        Column::Array(values) => return values.iter().map(element::<T>).collect(),
        Column::Typed(arr) => arr.to_values(),
    };
    values.iter().map(element::<T>).collect()
}

fn element<T: Element>(value: &Value) -> Result<T> {
    T::from_value(value).ok_or_else(|| Error::type_mismatch(T::DTYPE, value.clone()))
}

fn stream_typed<T: Element>(old: TypedArray<T>, new: &[T], rollover: Option<usize>) -> TypedArray<T> {
    let old_len = old.len();
    let total = old_len + new.len();

    let rollover = match rollover {
        Some(r) if total > r => r,
        _ => {
            let mut data = Vec::with_capacity(total);
            data.extend_from_slice(old.as_slice());
            data.extend_from_slice(new);
            return TypedArray::from_vec(data);
        }
    };

    let start = total - rollover;
    if old_len != rollover {
        let mut data = Vec::with_capacity(rollover);
        if start < old_len {
            data.extend_from_slice(&old.as_slice()[start..]);
            data.extend_from_slice(new);
        } else {
            data.extend_from_slice(&new[start - old_len..]);
        }
        return TypedArray::from_vec(data);
    }

    // Already at capacity: shift in place
    let mut buf = old.into_boxed_slice();
    if start < old_len {
        let retained = old_len - start;
        buf.copy_within(start..old_len, 0);
        buf[retained..].copy_from_slice(new);
    } else {
        buf.copy_from_slice(&new[start - old_len..]);
    }
    TypedArray::from_boxed(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn values(col: &Column) -> Vec<f64> {
        col.to_f64_vec()
    }

    #[test]
    fn test_stream_array_no_rollover() {
        let old = Column::from(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let new = Column::from(vec![Value::Int(4), Value::Int(5)]);
        let out = stream_to_column(old, &new, None).unwrap();
        assert_eq!(values(&out), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(!out.is_typed());
    }

    #[test]
    fn test_stream_array_rollover() {
        let old = Column::from(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let new = Column::from(vec![Value::Int(4), Value::Int(5)]);
        let out = stream_to_column(old, &new, Some(4)).unwrap();
        assert_eq!(values(&out), vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_stream_typed_at_rollover_len() {
        let old = Column::from(vec![1.0f32, 2.0, 3.0, 4.0, 5.0]);
        let new = Column::from(vec![100.0f32, 200.0, 300.0]);
        let out = stream_to_column(old, &new, Some(5)).unwrap();
        assert_eq!(out, Column::from(vec![4.0f32, 5.0, 100.0, 200.0, 300.0]));
    }

    #[test]
    fn test_stream_typed_grows_to_exactly_rollover() {
        let old = Column::from(vec![1.0f32, 2.0, 3.0, 4.0, 5.0]);
        let new = Column::from(vec![100.0f32, 200.0, 300.0]);
        let out = stream_to_column(old, &new, Some(6)).unwrap();
        assert_eq!(out, Column::from(vec![3.0f32, 4.0, 5.0, 100.0, 200.0, 300.0]));
        assert_eq!(out.len(), 6);
    }

    #[test]
    fn test_stream_typed_rollover_not_exceeded() {
        let old = Column::from(vec![1.0f32, 2.0, 3.0, 4.0, 5.0]);
        let new = Column::from(vec![100.0f32, 200.0, 300.0]);
        let out = stream_to_column(old, &new, Some(10)).unwrap();
        assert_eq!(
            out,
            Column::from(vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 100.0, 200.0, 300.0])
        );
    }

    #[test]
    fn test_stream_typed_new_exceeds_rollover() {
        let old = Column::from(vec![1i32, 2, 3]);
        let new = Column::from(vec![10i32, 20, 30, 40, 50]);
        let out = stream_to_column(old, &new, Some(3)).unwrap();
        assert_eq!(out, Column::from(vec![30i32, 40, 50]));

        let old = Column::from(vec![1i32, 2]);
        let new = Column::from(vec![10i32, 20, 30, 40, 50]);
        let out = stream_to_column(old, &new, Some(4)).unwrap();
        assert_eq!(out, Column::from(vec![20i32, 30, 40, 50]));
    }

    #[test]
    fn test_stream_typed_old_longer_than_rollover() {
        let old = Column::from(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let new = Column::from(vec![6.0]);
        let out = stream_to_column(old, &new, Some(3)).unwrap();
        assert_eq!(out, Column::from(vec![4.0, 5.0, 6.0]));
    }

    #[test]
    fn test_stream_values_into_typed() {
        let old = Column::from(vec![1.0, 2.0]);
        let new = Column::from(vec![Value::Int(3), Value::Null]);
        let out = stream_to_column(old, &new, None).unwrap();
        let got = values(&out);
        assert_eq!(&got[..3], &[1.0, 2.0, 3.0]);
        assert!(got[3].is_nan());
        assert!(out.is_typed());
    }

    #[test]
    fn test_stream_typed_into_array_keeps_array() {
        let old = Column::from(vec![Value::from("a")]);
        let new = Column::from(vec![1i32, 2]);
        let out = stream_to_column(old, &new, None).unwrap();
        assert_eq!(
            out,
            Column::from(vec![Value::from("a"), Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn test_stream_converts_dtype() {
        let old = Column::from(vec![1u8, 2]);
        let new = Column::from(vec![3.0f64, 4.0]);
        let out = stream_to_column(old, &new, None).unwrap();
        assert_eq!(out, Column::from(vec![1u8, 2, 3, 4]));
    }

    #[test]
    fn test_stream_rejects_non_numeric_into_typed() {
        let old = Column::from(vec![1.0, 2.0]);
        let new = Column::from(vec![Value::from("x")]);
        let err = stream_to_column(old, &new, None).unwrap_err();
        assert!(matches!(err, Error::UnsupportedColumn { .. }));
    }

    #[test]
    fn test_stream_rejects_multidimensional() {
        let grid = NdArray::Float64(TypedArray::with_shape(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]).unwrap());
        let err = stream_to_column(Column::Typed(grid), &Column::from(vec![1.0]), None).unwrap_err();
        assert!(matches!(err, Error::UnsupportedColumn { .. }));
    }
}
