use std::collections::HashSet;

use proptest::prelude::*;

use delimited_dataset::dataset::Dataset;
use delimited_dataset::ingestion::{format_row, parse_line};
use delimited_dataset::processing::{
    group_by_value, random_pick, sorted_index, split_by_categorical, split_by_numeric, Sampler,
};
use delimited_dataset::types::{DataType, Metadata, Mode, Record, Row, Schema};

fn dataset_of(values: &[i64], mode: Mode) -> Dataset {
    let rows = values
        .iter()
        .enumerate()
        .map(|(i, v)| vec![Record::Integer(i as i64), Record::Integer(*v)])
        .collect();
    Dataset::from_rows(mode, vec![DataType::Integer, DataType::Integer], rows).unwrap()
}

fn rows_of(ds: &Dataset) -> Vec<Row> {
    (0..ds.n_rows()).filter_map(|i| ds.row_at(i)).collect()
}

fn mixed_schema() -> Schema {
    Schema::new(vec![
        Metadata::new("id", DataType::Integer).with_separator("|"),
        Metadata::new("name", DataType::String).with_quotes("\"", "\"").with_separator("|"),
        Metadata::new("score", DataType::Real).with_separator(";"),
        Metadata::new("tag", DataType::String),
    ])
}

fn mixed_row() -> impl Strategy<Value = Row> {
    (
        any::<i64>(),
        "[a-zA-Z0-9 ,;|]{0,16}",
        -1.0e12f64..1.0e12,
        "[a-z+-]{0,6}",
    )
        .prop_map(|(id, name, score, tag)| {
            vec![
                Record::Integer(id),
                Record::String(name.trim().to_string()),
                Record::Real(score),
                Record::String(tag),
            ]
        })
}

fn rectangular_rows() -> impl Strategy<Value = (usize, Vec<Row>)> {
    (1usize..5).prop_flat_map(|width| {
        prop::collection::vec(
            prop::collection::vec(any::<i64>().prop_map(Record::Integer), width),
            0..20,
        )
        .prop_map(move |rows| (width, rows))
    })
}

proptest! {
    #[test]
    fn written_rows_parse_back_unchanged(row in mixed_row()) {
        let schema = mixed_schema();
        let line = format_row(&schema, &row).unwrap();
        let body = &line[..line.len() - 1];

        let parsed = parse_line(body, &schema).unwrap();
        prop_assert_eq!(&parsed, &row);
        prop_assert_eq!(format_row(&schema, &parsed).unwrap(), line);
    }

    #[test]
    fn columns_then_rows_is_lossless((width, rows) in rectangular_rows()) {
        let original = Dataset::from_rows(Mode::Rows, vec![DataType::Integer; width], rows).unwrap();
        let mut ds = original.clone();

        ds.to_columns().unwrap();
        prop_assert_eq!(ds.n_rows(), original.n_rows());
        ds.to_rows().unwrap();
        prop_assert_eq!(ds, original);
    }

    #[test]
    fn numeric_split_partitions_in_order(values in prop::collection::vec(-50i64..50, 0..60), t in -60i64..60) {
        let ds = dataset_of(&values, Mode::Rows);
        let (left, right) = split_by_numeric(&ds, 1, t as f64).unwrap();

        for row in rows_of(&left) {
            prop_assert!(row[1].as_f64().unwrap() <= t as f64);
        }
        for row in rows_of(&right) {
            prop_assert!(row[1].as_f64().unwrap() > t as f64);
        }

        let expected_left: Vec<Row> = rows_of(&ds).into_iter().filter(|r| r[1].as_f64().unwrap() <= t as f64).collect();
        let expected_right: Vec<Row> = rows_of(&ds).into_iter().filter(|r| r[1].as_f64().unwrap() > t as f64).collect();
        prop_assert_eq!(rows_of(&left), expected_left);
        prop_assert_eq!(rows_of(&right), expected_right);
    }

    #[test]
    fn pick_without_replacement_never_repeats(len in 0usize..80, n in 0usize..100, seed in any::<u64>(), excluded in prop::collection::vec(0usize..80, 0..10)) {
        let items: Vec<usize> = (0..len).collect();
        let mut sampler = Sampler::with_seed(seed);
        let pick = random_pick(&items, n, false, &excluded, &mut sampler);

        let unique: HashSet<usize> = pick.picked_idx.iter().copied().collect();
        prop_assert_eq!(unique.len(), pick.picked_idx.len());
        prop_assert_eq!(pick.picked.len() + pick.unpicked.len(), items.len());
        prop_assert!(pick.picked_idx.iter().all(|i| !excluded.contains(i)));
    }

    #[test]
    fn sorted_index_orders_keys(keys in prop::collection::vec(-1000i64..1000, 0..200)) {
        let idx = sorted_index(&keys);
        let mut seen = idx.clone();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..keys.len()).collect::<Vec<_>>());
        prop_assert!(idx.windows(2).all(|w| keys[w[0]] < keys[w[1]] || (keys[w[0]] == keys[w[1]] && w[0] < w[1])));
    }
}

#[test]
fn categorical_split_in_matrix_mode_keeps_both_views() {
    let ds = dataset_of(&[3, 1, 4, 1, 5], Mode::Matrix);
    let (left, right) = split_by_categorical(&ds, 1, &["1", "5"]).unwrap();

    assert_eq!(left.mode(), Mode::Matrix);
    assert_eq!(left.column(0).unwrap().records, vec![Record::Integer(1), Record::Integer(3), Record::Integer(4)]);
    assert_eq!(right.rows().len(), 2);
    assert_eq!(right.column(1).unwrap().records, vec![Record::Integer(3), Record::Integer(4)]);
}

#[test]
fn group_order_is_first_seen_not_lexical() {
    let labels = ["+", "-", "-", "+"];
    let mut rows: Vec<Row> = labels
        .iter()
        .enumerate()
        .map(|(i, l)| vec![Record::Integer(i as i64), Record::String(l.to_string())])
        .collect();

    let groups = group_by_value(&mut rows, 1).unwrap();

    assert!(rows.is_empty());
    assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["+", "-"]);
    let (minority, members) = groups.minority().unwrap();
    assert_eq!(minority, "+");
    assert_eq!(members.len(), 2);
}

#[test]
fn sorted_index_of_descending_run() {
    let values = [9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0];
    let idx = sorted_index(&values);
    assert_eq!(idx, vec![6, 5, 4, 3, 2, 1, 0]);
    let sorted: Vec<f64> = idx.iter().map(|&i| values[i]).collect();
    assert_eq!(sorted, vec![3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
}
