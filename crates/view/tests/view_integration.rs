//! End-to-end behaviour of views over live sources.

use prism_core::Value;
use prism_filter::{CustomFilter, Filter};
use prism_source::{Column, ColumnDataSource, Patch};
use std::collections::BTreeMap;

fn numbers(len: usize) -> ColumnDataSource {
    ColumnDataSource::builder()
        .column("x", (0..len as i32).collect::<Vec<_>>())
        .build()
}

#[test]
fn test_view_follows_filter_replacement() {
    let view = prism_view::View::new(numbers(10), Filter::all()).unwrap();
    assert_eq!(view.len(), 10);
    assert_eq!(view.subset_map().to_vec(), (0..10).collect::<Vec<_>>());

    view.set_filter(Filter::index(vec![2, 4])).unwrap();
    assert_eq!(view.indices().to_vec(), vec![2, 4]);
    assert_eq!(view.subset_map().to_vec(), vec![2, 4]);
    assert_eq!(view.indices_map().get(&2), Some(&0));
    assert_eq!(view.indices_map().get(&4), Some(&1));
    assert_eq!(view.convert_indices_from_subset(&[1]).unwrap(), vec![4]);
}

#[test]
fn test_view_over_group_filter_with_multiple_groups() {
    let source = ColumnDataSource::builder()
        .column("g", vec![Value::from("x"), Value::from("y"), Value::from("x")])
        .build();
    let filter = Filter::group_multiple("g", vec![Value::from("x"), Value::from("y")]);
    let view = prism_view::View::new(source, filter).unwrap();
    assert_eq!(view.indices().to_vec(), vec![0, 1, 2]);
}

#[test]
fn test_view_over_custom_filter_tracks_streaming() {
    let source = numbers(4);
    let odd = CustomFilter::new(|_: &[Value], source: &ColumnDataSource| {
        let column = source.get_column("x").unwrap();
        let mask = column
            .to_f64_vec()
            .into_iter()
            .map(|v| Value::Boolean(v as i64 % 2 == 1))
            .collect();
        Ok(Value::Array(mask))
    });
    let view = prism_view::View::new(source.clone(), Filter::custom(odd)).unwrap();
    assert_eq!(view.indices().to_vec(), vec![1, 3]);

    let mut new_data = BTreeMap::new();
    new_data.insert("x".to_string(), Column::from(vec![4, 5]));
    source.stream(new_data, Some(5)).unwrap();

    // Rows are now [1, 2, 3, 4, 5]
    assert_eq!(view.indices().to_vec(), vec![0, 2, 4]);
}

#[test]
fn test_view_after_patch() {
    let source = numbers(3);
    let view = prism_view::View::new(source.clone(), Filter::group("x", Value::Int(7))).unwrap();
    assert!(view.is_empty());

    let mut patches = BTreeMap::new();
    patches.insert("x".to_string(), vec![Patch::scalar(1, Value::Int(7))]);
    source.patch(patches).unwrap();

    assert_eq!(view.indices().to_vec(), vec![1]);
}

#[test]
fn test_views_share_a_filter() {
    let filter = Filter::boolean(vec![true, false, true]);
    let a = prism_view::View::new(numbers(3), filter.clone()).unwrap();
    let b = prism_view::View::new(numbers(3), !&filter).unwrap();
    assert_eq!(a.indices().to_vec(), vec![0, 2]);
    assert_eq!(b.indices().to_vec(), vec![1]);

    filter.set_booleans(Some(vec![false, false, true])).unwrap();
    assert_eq!(a.indices().to_vec(), vec![2]);
    assert_eq!(b.indices().to_vec(), vec![0, 1]);
}
