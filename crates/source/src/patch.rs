//! Shape-aware partial column updates.
//!
//! Every patch is normalized to an `(outer, rows, cols)` triple against a
//! two-dimensional view of its target: scalar and slice patches address the
//! column itself as shape `[1, len]`, a two-part multi-index addresses the
//! ragged item at `outer` as `[1, item_len]`, and a three-part multi-index
//! addresses a 2-D item as `[rows, cols]`. Values are written in row-major
//! order over that view.
//!
//! A batch is applied in order to a scratch copy of the column, each patch
//! checked against the result of the ones before it. The column is only
//! replaced once the whole batch went through, so a rejected batch leaves it
//! untouched.

use crate::column::Column;
use alloc::collections::BTreeSet;
use alloc::format;
use alloc::vec::Vec;
use prism_core::{Error, NdArray, Result, Slice, Value};

/// One axis of a multi-index: a single position or a slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Selector {
    Index(usize),
    Slice(Slice),
}

impl Selector {
    fn resolve(&self, len: usize) -> Result<(usize, usize, usize)> {
        match *self {
            Selector::Index(i) if i < len => Ok((i, i + 1, 1)),
            Selector::Index(i) => Err(Error::invalid_patch(
                "",
                format!("index {} out of bounds for length {}", i, len),
            )),
            Selector::Slice(slice) => resolve_slice(&slice, len),
        }
    }
}

impl From<usize> for Selector {
    fn from(i: usize) -> Self {
        Selector::Index(i)
    }
}

impl From<Slice> for Selector {
    fn from(slice: Slice) -> Self {
        Selector::Slice(slice)
    }
}

/// Where a patch writes.
#[derive(Clone, Debug, PartialEq)]
pub enum PatchIndex {
    /// One row of the column.
    Scalar(usize),
    /// A strided range of rows of the column.
    Slice(Slice),
    /// Positions inside the ragged item at `outer`. With `col` unset the
    /// item is addressed as 1-D by `row`; otherwise as 2-D by `[row, col]`.
    Multi {
        outer: usize,
        row: Selector,
        col: Option<Selector>,
    },
}

/// What a patch writes.
#[derive(Clone, Debug, PartialEq)]
pub enum PatchValue {
    Scalar(Value),
    List(Vec<Value>),
}

impl PatchValue {
    /// The value stored by a scalar patch. A list replaces the whole row.
    fn single(&self) -> Value {
        match self {
            PatchValue::Scalar(v) => v.clone(),
            PatchValue::List(vs) => Value::Array(vs.clone()),
        }
    }

    /// The values written by a range patch, in row-major order.
    fn elements(&self) -> &[Value] {
        match self {
            PatchValue::Scalar(v) => core::slice::from_ref(v),
            PatchValue::List(vs) => vs,
        }
    }
}

impl From<Value> for PatchValue {
    fn from(v: Value) -> Self {
        PatchValue::Scalar(v)
    }
}

impl From<Vec<Value>> for PatchValue {
    fn from(vs: Vec<Value>) -> Self {
        PatchValue::List(vs)
    }
}

/// A single partial update.
#[derive(Clone, Debug, PartialEq)]
pub struct Patch {
    pub index: PatchIndex,
    pub value: PatchValue,
}

impl Patch {
    /// Replaces row `index`.
    pub fn scalar(index: usize, value: impl Into<Value>) -> Self {
        Self {
            index: PatchIndex::Scalar(index),
            value: PatchValue::Scalar(value.into()),
        }
    }

    /// Replaces the rows addressed by `slice`, one value per row.
    pub fn slice(slice: Slice, values: Vec<Value>) -> Self {
        Self {
            index: PatchIndex::Slice(slice),
            value: PatchValue::List(values),
        }
    }

    /// Writes into the 1-D item at `outer`.
    pub fn nested(outer: usize, sub: impl Into<Selector>, values: Vec<Value>) -> Self {
        Self {
            index: PatchIndex::Multi {
                outer,
                row: sub.into(),
                col: None,
            },
            value: PatchValue::List(values),
        }
    }

    /// Writes into the 2-D item at `outer`.
    pub fn nested_2d(
        outer: usize,
        row: impl Into<Selector>,
        col: impl Into<Selector>,
        values: Vec<Value>,
    ) -> Self {
        Self {
            index: PatchIndex::Multi {
                outer,
                row: row.into(),
                col: Some(col.into()),
            },
            value: PatchValue::List(values),
        }
    }
}

/// A validated, normalized patch.
#[derive(Clone, Debug)]
struct Plan {
    outer: Option<usize>,
    rows: (usize, usize, usize),
    cols: (usize, usize, usize),
    /// Row stride of the addressed item, for flat storage.
    width: usize,
    two_d: bool,
}

impl Plan {
    fn positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (r0, r1, rs) = self.rows;
        let (c0, c1, cs) = self.cols;
        (r0..r1)
            .step_by(rs)
            .flat_map(move |r| (c0..c1).step_by(cs).map(move |c| (r, c)))
    }

    fn count(&self) -> usize {
        span(self.rows) * span(self.cols)
    }
}

fn span((start, stop, step): (usize, usize, usize)) -> usize {
    (stop - start + step - 1) / step
}

fn resolve_slice(slice: &Slice, len: usize) -> Result<(usize, usize, usize)> {
    let (start, stop, step) = slice
        .resolve(len)
        .map_err(|e| Error::invalid_patch("", format!("{}", e)))?;
    if stop > len {
        return Err(Error::invalid_patch(
            "",
            format!("slice stop {} out of bounds for length {}", stop, len),
        ));
    }
    Ok((start, stop, step))
}

/// Applies `patches` to `column` in order and returns the touched rows.
///
/// The column is left untouched if any patch is rejected.
pub fn patch_to_column(column: &mut Column, patches: &[Patch]) -> Result<BTreeSet<usize>> {
    let (patched, touched) = patched_column(column, patches)?;
    *column = patched;
    Ok(touched)
}

/// Applies `patches` in order to a copy of `column` and returns the copy
/// with the touched rows. Each patch is checked against the column as the
/// patches before it left it.
pub(crate) fn patched_column(column: &Column, patches: &[Patch]) -> Result<(Column, BTreeSet<usize>)> {
    let mut scratch = column.clone();
    let mut touched = BTreeSet::new();
    for patch in patches {
        let plan = plan(&scratch, patch)?;
        apply(&mut scratch, patch, &plan, &mut touched)?;
    }
    Ok((scratch, touched))
}

fn apply(column: &mut Column, patch: &Patch, plan: &Plan, touched: &mut BTreeSet<usize>) -> Result<()> {
    match patch.index {
        PatchIndex::Scalar(i) => {
            write(column, plan, (0, i), &patch.value.single())?;
            touched.insert(i);
        }
        PatchIndex::Slice(_) | PatchIndex::Multi { .. } => {
            for (pos, value) in plan.positions().zip(patch.value.elements()) {
                write(column, plan, pos, value)?;
            }
            match plan.outer {
                Some(outer) => {
                    touched.insert(outer);
                }
                None => touched.extend(plan.positions().map(|(_, c)| c)),
            }
        }
    }
    Ok(())
}

fn plan(column: &Column, patch: &Patch) -> Result<Plan> {
    let len = column.len();
    match &patch.index {
        PatchIndex::Scalar(i) => {
            if *i >= len {
                return Err(Error::invalid_patch(
                    "",
                    format!("index {} out of bounds for length {}", i, len),
                ));
            }
            check_flat_column(column)?;
            let value = patch.value.single();
            check_typed(column_array(column), core::slice::from_ref(&value))?;
            Ok(Plan {
                outer: None,
                rows: (0, 1, 1),
                cols: (*i, i + 1, 1),
                width: len,
                two_d: false,
            })
        }
        PatchIndex::Slice(slice) => {
            check_flat_column(column)?;
            let cols = resolve_slice(slice, len)?;
            let plan = Plan {
                outer: None,
                rows: (0, 1, 1),
                cols,
                width: len,
                two_d: false,
            };
            check_count(&plan, patch.value.elements())?;
            check_typed(column_array(column), patch.value.elements())?;
            Ok(plan)
        }
        PatchIndex::Multi { outer, row, col } => {
            if *outer >= len {
                return Err(Error::invalid_patch(
                    "",
                    format!("index {} out of bounds for length {}", outer, len),
                ));
            }
            let two_d = col.is_some();
            let [height, width] = item_shape(column, *outer, two_d)?;
            let plan = match col {
                None => Plan {
                    outer: Some(*outer),
                    rows: (0, 1, 1),
                    cols: row.resolve(width)?,
                    width,
                    two_d,
                },
                Some(col) => Plan {
                    outer: Some(*outer),
                    rows: row.resolve(height)?,
                    cols: col.resolve(width)?,
                    width,
                    two_d,
                },
            };
            check_count(&plan, patch.value.elements())?;
            check_typed(item_array(column, *outer), patch.value.elements())?;
            Ok(plan)
        }
    }
}

fn check_flat_column(column: &Column) -> Result<()> {
    match column {
        Column::Typed(arr) if arr.ndim() != 1 => Err(Error::invalid_patch(
            "",
            format!("cannot patch rows of a {}-d typed column", arr.ndim()),
        )),
        _ => Ok(()),
    }
}

fn check_count(plan: &Plan, values: &[Value]) -> Result<()> {
    if plan.count() != values.len() {
        return Err(Error::invalid_patch(
            "",
            format!(
                "patch addresses {} elements but {} values were given",
                plan.count(),
                values.len()
            ),
        ));
    }
    Ok(())
}

fn check_typed(target: Option<&NdArray>, values: &[Value]) -> Result<()> {
    let Some(arr) = target else {
        return Ok(());
    };
    match values.iter().find(|v| !arr.accepts(v)) {
        Some(bad) => Err(Error::invalid_patch(
            "",
            format!("cannot store {} in a {} array", bad, arr.dtype()),
        )),
        None => Ok(()),
    }
}

fn column_array(column: &Column) -> Option<&NdArray> {
    match column {
        Column::Typed(arr) => Some(arr),
        Column::Array(_) => None,
    }
}

/// The typed buffer a multi-index patch ends up writing into, if any.
fn item_array(column: &Column, outer: usize) -> Option<&NdArray> {
    match column {
        Column::Typed(arr) => Some(arr),
        Column::Array(values) => values.get(outer).and_then(Value::as_ndarray),
    }
}

/// Shape of the item at `outer`, as `[rows, cols]`.
fn item_shape(column: &Column, outer: usize, two_d: bool) -> Result<[usize; 2]> {
    let not_array = || Error::invalid_patch("", format!("item {} is not an array", outer));
    let wrong_dims = |ndim: usize| {
        Error::invalid_patch(
            "",
            format!("item {} has {} dimensions, patch expects {}", outer, ndim, if two_d { 2 } else { 1 }),
        )
    };

    match column {
        Column::Typed(arr) => {
            let inner = &arr.shape()[1..];
            match (two_d, inner) {
                (false, [n]) => Ok([1, *n]),
                (true, [r, c]) => Ok([*r, *c]),
                _ => Err(wrong_dims(inner.len())),
            }
        }
        Column::Array(values) => match values.get(outer) {
            Some(Value::NdArray(nd)) => match (two_d, nd.shape()) {
                (false, _) => Ok([1, nd.len()]),
                (true, [r, c]) => Ok([*r, *c]),
                (true, shape) => Err(wrong_dims(shape.len())),
            },
            Some(Value::Array(items)) if !two_d => Ok([1, items.len()]),
            Some(Value::Array(rows)) => {
                let mut width = None;
                for row in rows {
                    let row_len = row.as_array().ok_or_else(|| wrong_dims(1))?.len();
                    match width {
                        None => width = Some(row_len),
                        Some(w) if w != row_len => {
                            return Err(Error::invalid_patch(
                                "",
                                format!("item {} has rows of different lengths", outer),
                            ))
                        }
                        Some(_) => {}
                    }
                }
                Ok([rows.len(), width.unwrap_or(0)])
            }
            _ => Err(not_array()),
        },
    }
}

fn write(column: &mut Column, plan: &Plan, (r, c): (usize, usize), value: &Value) -> Result<()> {
    let flat = r * plan.width + c;
    let outer = match plan.outer {
        None => {
            return match column {
                Column::Array(values) => {
                    let len = values.len();
                    let slot = values
                        .get_mut(c)
                        .ok_or_else(|| Error::index_out_of_range(c, len))?;
                    *slot = value.clone();
                    Ok(())
                }
                Column::Typed(arr) => arr.set(c, value),
            };
        }
        Some(outer) => outer,
    };

    match column {
        Column::Typed(arr) => {
            let block: usize = arr.shape()[1..].iter().product();
            arr.set(outer * block + flat, value)
        }
        Column::Array(values) => {
            let len = values.len();
            let item = values
                .get_mut(outer)
                .ok_or_else(|| Error::index_out_of_range(outer, len))?;
            match item {
                Value::NdArray(nd) => nd.set(flat, value),
                Value::Array(items) => {
                    let slot = if plan.two_d {
                        items
                            .get_mut(r)
                            .and_then(Value::as_array_mut)
                            .and_then(|row| row.get_mut(c))
                    } else {
                        items.get_mut(c)
                    };
                    let slot = slot.ok_or_else(|| Error::index_out_of_range(flat, plan.width))?;
                    *slot = value.clone();
                    Ok(())
                }
                _ => Err(Error::invalid_patch("", format!("item {} is not an array", outer))),
            }
        }
    }
}
