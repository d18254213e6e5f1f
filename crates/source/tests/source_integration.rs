//! Integration tests for streaming and patching through a data source.

use prism_core::{NdArray, Slice, TypedArray, Value};
use prism_source::{Column, ColumnDataSource, Dependencies, Patch, PatchEvent};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().map(|v| Value::Int(*v)).collect()
}

fn grid(values: Vec<i32>, shape: Vec<usize>) -> Value {
    Value::NdArray(NdArray::Int32(TypedArray::with_shape(values, shape).unwrap()))
}

#[test]
fn test_stream_then_patch_round() {
    let source = ColumnDataSource::builder()
        .column("x", vec![1.0, 2.0, 3.0])
        .column("y", ints(&[10, 20, 30]))
        .build();

    let mut new_data = BTreeMap::new();
    new_data.insert("x".to_string(), Column::from(vec![4.0, 5.0]));
    new_data.insert("y".to_string(), Column::from(ints(&[40, 50])));
    source.stream(new_data, Some(4)).unwrap();

    assert_eq!(source.len(), Some(4));
    assert_eq!(
        source.get_column("x").map(|c| c.to_f64_vec()),
        Some(vec![2.0, 3.0, 4.0, 5.0])
    );

    let mut patches = BTreeMap::new();
    patches.insert("y".to_string(), vec![Patch::scalar(0, 99)]);
    source.patch(patches).unwrap();
    assert_eq!(
        source.get_column("y").map(|c| c.to_values()),
        Some(ints(&[99, 30, 40, 50]))
    );
}

#[test]
fn test_patch_ragged_column() {
    let source = ColumnDataSource::builder()
        .column(
            "image",
            vec![
                grid(vec![1, 2, 3, 4, 5, 6], vec![2, 3]),
                grid(vec![10, 20, -1, -2, 0, 10], vec![3, 2]),
                grid(vec![1, 2], vec![1, 2]),
            ],
        )
        .build();

    let rows = Rc::new(RefCell::new(Vec::new()));
    let r = rows.clone();
    let _conn = source.patching().connect(move |ev: &PatchEvent| {
        r.borrow_mut().extend(ev.rows.iter().copied());
        Ok(())
    });

    let mut patches = BTreeMap::new();
    patches.insert(
        "image".to_string(),
        vec![
            Patch::nested_2d(0, Slice::full(), 2usize, ints(&[100, 101])),
            Patch::nested_2d(1, Slice::range(0, 2), Slice::range(0, 1), ints(&[100, 101])),
        ],
    );
    source.patch(patches).unwrap();

    let col = source.get_column("image").unwrap();
    assert_eq!(col.get(0), Some(grid(vec![1, 2, 100, 4, 5, 101], vec![2, 3])));
    assert_eq!(col.get(1), Some(grid(vec![100, 20, 101, -2, 0, 10], vec![3, 2])));
    assert_eq!(col.get(2), Some(grid(vec![1, 2], vec![1, 2])));
    drop(col);

    assert_eq!(*rows.borrow(), vec![0, 1]);
}

#[test]
fn test_consumer_not_invalidated_by_unrelated_patch() {
    let source = ColumnDataSource::builder()
        .column("x", ints(&[1, 2, 3]))
        .column("y", ints(&[1, 2, 3]))
        .build();
    let consumer = prism_core::ConsumerId::next();
    let deps = Dependencies::columns(["x"]);
    source.changed_for(consumer, &deps);

    let mut patches = BTreeMap::new();
    patches.insert("y".to_string(), vec![Patch::scalar(1, 0)]);
    source.patch(patches).unwrap();
    assert!(!source.changed_for(consumer, &deps));

    let mut patches = BTreeMap::new();
    patches.insert("x".to_string(), vec![Patch::scalar(1, 0)]);
    source.patch(patches).unwrap();
    assert!(source.changed_for(consumer, &deps));
}
