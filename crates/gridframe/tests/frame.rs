use gridframe::{AggKind, ColumnSummary, DataFrame, FrameError, Value};
use pretty_assertions::assert_eq;

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::Int).collect()
}

fn sample() -> DataFrame {
    DataFrame::from_columns([
        ("x", ints(&[1, 3, 5, 7])),
        ("y", ints(&[2, 4, 6, 8])),
        ("z", ints(&[0, 0, 5, 6])),
    ])
    .expect("sample frame")
}

fn add_one(v: &Value) -> Value {
    match v {
        Value::Int(i) => Value::Int(i + 1),
        other => other.clone(),
    }
}

#[test]
fn shape_counts_rows_and_columns() {
    assert_eq!(sample().shape(), (4, 3));
    assert_eq!(sample().row_count(), 4);
    assert_eq!(sample().column_count(), 3);
}

#[test]
fn construction_requires_at_least_one_column() {
    let err = DataFrame::from_columns(Vec::<(String, Vec<Value>)>::new()).unwrap_err();
    assert!(matches!(err, FrameError::Malformed { .. }));
}

#[test]
fn construction_rejects_duplicate_names() {
    let err =
        DataFrame::from_columns([("x", ints(&[1])), ("x", ints(&[2]))]).unwrap_err();
    assert!(matches!(err, FrameError::Malformed { .. }));
}

#[test]
fn projection_copies_one_column() -> Result<(), FrameError> {
    let frame = sample();
    let x = frame.column("x")?;
    assert_eq!(x.shape(), (4, 1));
    assert_eq!(x.values("x")?, frame.values("x")?);
    // The projection is a copy, not a view: mutating it leaves the source
    // untouched.
    let mut x = x;
    x.set_column("x", ints(&[9, 9, 9, 9]))?;
    assert_eq!(frame.values("x")?, ints(&[1, 3, 5, 7]).as_slice());
    Ok(())
}

#[test]
fn projection_of_unknown_column_fails() {
    let err = sample().column("nope").unwrap_err();
    assert!(matches!(err, FrameError::UnknownColumn(name) if name == "nope"));
}

#[test]
fn set_column_appends_new_name_at_end() -> Result<(), FrameError> {
    let mut frame = sample();
    frame.set_column("w", ints(&[10, 11, 12, 13]))?;
    assert_eq!(
        frame.column_names().collect::<Vec<_>>(),
        vec!["x", "y", "z", "w"]
    );
    assert_eq!(frame.values("w")?, ints(&[10, 11, 12, 13]).as_slice());
    assert_eq!(frame.shape(), (4, 4));
    Ok(())
}

#[test]
fn set_column_replaces_in_place() -> Result<(), FrameError> {
    let mut frame = sample();
    frame.set_column("y", ints(&[9, 9, 9, 9]))?;
    assert_eq!(
        frame.column_names().collect::<Vec<_>>(),
        vec!["x", "y", "z"]
    );
    assert_eq!(frame.values("y")?, ints(&[9, 9, 9, 9]).as_slice());
    Ok(())
}

#[test]
fn set_column_of_wrong_length_leaves_frame_unchanged() {
    let mut frame = sample();
    let err = frame.set_column("w", ints(&[1, 2])).unwrap_err();
    assert!(matches!(
        err,
        FrameError::ShapeMismatch {
            expected: 4,
            got: 2
        }
    ));
    assert_eq!(frame, sample());
}

#[test]
fn agg_sum_reduces_each_column_to_one_row() -> Result<(), FrameError> {
    let out = sample().agg(AggKind::Sum)?;
    assert_eq!(out.shape(), (1, 3));
    assert_eq!(out.values("x")?, &[Value::Int(16)]);
    assert_eq!(out.values("y")?, &[Value::Int(20)]);
    assert_eq!(out.values("z")?, &[Value::Int(11)]);
    Ok(())
}

#[test]
fn agg_mean_is_float() -> Result<(), FrameError> {
    let out = sample().agg(AggKind::Mean)?;
    assert_eq!(out.values("x")?, &[Value::Float(4.0)]);
    assert_eq!(out.values("y")?, &[Value::Float(5.0)]);
    Ok(())
}

#[test]
fn agg_kind_parses_known_spellings_only() {
    assert_eq!("sum".parse::<AggKind>().unwrap(), AggKind::Sum);
    assert_eq!("mean".parse::<AggKind>().unwrap(), AggKind::Mean);
    let err = "median".parse::<AggKind>().unwrap_err();
    assert!(matches!(err, FrameError::UnsupportedAggregation(kind) if kind == "median"));
}

#[test]
fn agg_refuses_text_cells() {
    let frame = DataFrame::from_columns([(
        "s",
        vec![Value::from("a"), Value::from("b")],
    )])
    .unwrap();
    let err = frame.agg(AggKind::Sum).unwrap_err();
    assert!(matches!(err, FrameError::NonNumeric { column } if column == "s"));
}

#[test]
fn agg_skips_missing_cells() -> Result<(), FrameError> {
    let frame = DataFrame::from_columns([
        ("a", vec![Value::Int(1), Value::Missing, Value::Int(3)]),
        ("b", vec![Value::Missing, Value::Missing, Value::Missing]),
    ])?;
    let sum = frame.agg(AggKind::Sum)?;
    assert_eq!(sum.values("a")?, &[Value::Int(4)]);
    assert_eq!(sum.values("b")?, &[Value::Missing]);
    let mean = frame.agg(AggKind::Mean)?;
    assert_eq!(mean.values("a")?, &[Value::Float(2.0)]);
    assert_eq!(mean.values("b")?, &[Value::Missing]);
    Ok(())
}

#[test]
fn filter_retains_aligned_rows() -> Result<(), FrameError> {
    let out = sample().filter("x", |v| v.as_f64().is_some_and(|x| x > 3.0))?;
    assert_eq!(out.shape(), (2, 3));
    assert_eq!(out.values("x")?, ints(&[5, 7]).as_slice());
    assert_eq!(out.values("y")?, ints(&[6, 8]).as_slice());
    assert_eq!(out.values("z")?, ints(&[5, 6]).as_slice());
    Ok(())
}

#[test]
fn filter_with_no_matches_keeps_every_column() -> Result<(), FrameError> {
    let out = sample().filter("x", |_| false)?;
    assert_eq!(out.shape(), (0, 3));
    assert_eq!(
        out.column_names().collect::<Vec<_>>(),
        vec!["x", "y", "z"]
    );
    Ok(())
}

#[test]
fn filter_unknown_column_fails() {
    let err = sample().filter("nope", |_| true).unwrap_err();
    assert!(matches!(err, FrameError::UnknownColumn(_)));
}

#[test]
fn sort_ascending_is_non_decreasing() -> Result<(), FrameError> {
    let frame = DataFrame::from_columns([
        ("k", ints(&[3, 1, 2, 1])),
        ("tag", ints(&[30, 10, 20, 11])),
    ])?;
    let out = frame.sort_values("k", true)?;
    assert_eq!(out.values("k")?, ints(&[1, 1, 2, 3]).as_slice());
    // Stable: the two k == 1 rows keep their original relative order.
    assert_eq!(out.values("tag")?, ints(&[10, 11, 20, 30]).as_slice());
    Ok(())
}

#[test]
fn sort_descending_reverses_a_duplicate_free_column() -> Result<(), FrameError> {
    let out = sample().sort_values("x", false)?;
    assert_eq!(out.values("x")?, ints(&[7, 5, 3, 1]).as_slice());
    assert_eq!(out.values("y")?, ints(&[8, 6, 4, 2]).as_slice());
    Ok(())
}

#[test]
fn sort_keeps_missing_rows_last() -> Result<(), FrameError> {
    let frame = DataFrame::from_columns([(
        "k",
        vec![Value::Missing, Value::Int(2), Value::Int(1)],
    )])?;
    let out = frame.sort_values("k", true)?;
    assert_eq!(
        out.values("k")?,
        &[Value::Int(1), Value::Int(2), Value::Missing]
    );
    Ok(())
}

#[test]
fn drop_duplicates_summarizes_each_column_independently() -> Result<(), FrameError> {
    let summary = sample().drop_duplicates(None)?;
    assert_eq!(
        summary.columns().collect::<Vec<_>>(),
        vec!["x", "y", "z"]
    );
    // First-appearance order, not sorted.
    assert_eq!(summary.values("z").unwrap(), ints(&[0, 5, 6]).as_slice());
    assert_eq!(summary.values("x").unwrap(), ints(&[1, 3, 5, 7]).as_slice());
    Ok(())
}

#[test]
fn drop_duplicates_by_subset() -> Result<(), FrameError> {
    let summary = sample().drop_duplicates(Some(&["z"]))?;
    assert_eq!(summary.columns().collect::<Vec<_>>(), vec!["z"]);
    assert_eq!(summary.values("x"), None);
    Ok(())
}

#[test]
fn drop_duplicates_unknown_column_fails() {
    let err = sample().drop_duplicates(Some(&["nope"])).unwrap_err();
    assert!(matches!(err, FrameError::UnknownColumn(_)));
}

fn assert_summary_close(got: ColumnSummary, mean: f64, median: f64, std: f64) {
    assert!((got.mean - mean).abs() < 1e-12, "mean {got:?}");
    assert!((got.median - median).abs() < 1e-12, "median {got:?}");
    assert!((got.std - std).abs() < 1e-12, "std {got:?}");
}

#[test]
fn describe_covers_every_column_in_order() -> Result<(), FrameError> {
    let described = sample().describe()?;
    let names: Vec<&str> = described.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["x", "y", "z"]);

    // x = [1, 3, 5, 7]: population variance 5.
    assert_summary_close(described[0].1, 4.0, 4.0, 5.0_f64.sqrt());
    // z = [0, 0, 5, 6]: mean 2.75, median 2.5, variance 7.6875.
    assert_summary_close(described[2].1, 2.75, 2.5, 7.6875_f64.sqrt());
    Ok(())
}

#[test]
fn describe_column_fetches_that_column() -> Result<(), FrameError> {
    let got = sample().describe_column("y")?;
    assert_summary_close(got, 5.0, 5.0, 5.0_f64.sqrt());

    let err = sample().describe_column("nope").unwrap_err();
    assert!(matches!(err, FrameError::UnknownColumn(_)));
    Ok(())
}

#[test]
fn describe_rejects_text_and_empty_columns() {
    let frame = DataFrame::from_columns([
        ("s", vec![Value::from("a")]),
        ("gap", vec![Value::Missing]),
    ])
    .unwrap();
    let err = frame.describe_column("s").unwrap_err();
    assert!(matches!(err, FrameError::NonNumeric { .. }));
    let err = frame.describe_column("gap").unwrap_err();
    assert!(matches!(err, FrameError::EmptyColumn { .. }));
}

#[test]
fn apply_to_one_column_leaves_the_rest_alone() -> Result<(), FrameError> {
    let frame = sample();
    let out = frame.apply(add_one, Some("x"))?;
    assert_eq!(out.values("x")?, ints(&[2, 4, 6, 8]).as_slice());
    assert_eq!(out.values("y")?, ints(&[2, 4, 6, 8]).as_slice());
    assert_eq!(out.values("z")?, ints(&[0, 0, 5, 6]).as_slice());
    // Receiver untouched.
    assert_eq!(frame, sample());
    Ok(())
}

#[test]
fn apply_without_column_transforms_everything() -> Result<(), FrameError> {
    let out = sample().apply(add_one, None)?;
    assert_eq!(out.values("x")?, ints(&[2, 4, 6, 8]).as_slice());
    assert_eq!(out.values("y")?, ints(&[3, 5, 7, 9]).as_slice());
    assert_eq!(out.values("z")?, ints(&[1, 1, 6, 7]).as_slice());
    Ok(())
}

#[test]
fn apply_to_unknown_column_fails() {
    let err = sample().apply(add_one, Some("nope")).unwrap_err();
    assert!(matches!(err, FrameError::UnknownColumn(_)));
}

#[test]
fn display_renders_rows_and_summary_line() {
    let frame = DataFrame::from_columns([
        ("x", ints(&[1, 3])),
        ("y", vec![Value::Float(2.5), Value::Missing]),
    ])
    .unwrap();
    // A missing cell renders empty, leaving the separator's trailing space.
    let expected = concat!(
        "x | y\n",
        "-----\n",
        "1 | 2.5\n",
        "3 | \n",
        "-----\n",
        "2 rows and 2 columns.",
    );
    assert_eq!(frame.to_string(), expected);
}

#[test]
fn values_serialize_with_tagged_layout() {
    let json = serde_json::to_value(Value::Int(3)).unwrap();
    assert_eq!(json, serde_json::json!({"type": "int", "value": 3}));
    let json = serde_json::to_value(Value::Missing).unwrap();
    assert_eq!(json, serde_json::json!({"type": "missing"}));
    let back: Value =
        serde_json::from_value(serde_json::json!({"type": "float", "value": 2.5})).unwrap();
    assert_eq!(back, Value::Float(2.5));
}
