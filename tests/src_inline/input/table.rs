use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::Compression;
use flate2::write::GzEncoder;

use super::*;
use crate::error::EvalError;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("drp_eval_table_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_file(path: &Path, contents: &str) {
    let mut f = File::create(path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
}

fn sample_table() -> PredictionTable {
    PredictionTable::new(
        vec!["c1".into(), "c2".into(), "c3".into()],
        vec!["d1".into(), "d2".into(), "d1".into()],
        vec![1.0, 2.5, 3.0],
        vec![1.1, 2.4, 2.9],
    )
    .unwrap()
}

#[test]
fn test_new_rejects_unequal_lengths() {
    let err = PredictionTable::new(
        vec!["c1".into()],
        vec!["d1".into(), "d2".into()],
        vec![1.0],
        vec![1.0],
    )
    .unwrap_err();
    assert!(err.contains("unequal column lengths"), "{err}");
}

#[test]
fn test_write_then_read_round_trip() {
    let dir = make_temp_dir();
    let path = dir.join("run.csv");
    let table = sample_table();
    write_table(&table, &path).unwrap();

    let loaded = read_table(&path).unwrap();
    assert_eq!(loaded.cells, table.cells);
    assert_eq!(loaded.drugs, table.drugs);
    assert_eq!(loaded.true_values, table.true_values);
    assert_eq!(loaded.predicted_values, table.predicted_values);
}

#[test]
fn test_write_emits_canonical_header() {
    let dir = make_temp_dir();
    let path = dir.join("run.csv");
    write_table(&sample_table(), &path).unwrap();
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("cell,drug,true_value,predicted_value\n"));
}

#[test]
fn test_read_accepts_shuffled_and_extra_columns() {
    let dir = make_temp_dir();
    let path = dir.join("run.csv");
    write_file(
        &path,
        "fold,predicted_value,drug,cell,true_value\n0,1.5,d1,c1,1.0\n1,2.5,d2,c2,2.0\n",
    );
    let table = read_table(&path).unwrap();
    assert_eq!(table.cells, vec!["c1", "c2"]);
    assert_eq!(table.drugs, vec!["d1", "d2"]);
    assert_eq!(table.true_values, vec![1.0, 2.0]);
    assert_eq!(table.predicted_values, vec![1.5, 2.5]);
}

#[test]
fn test_read_missing_column_is_schema_error() {
    let dir = make_temp_dir();
    let path = dir.join("run.csv");
    write_file(&path, "cell,drug,true_value\nc1,d1,1.0\n");
    match read_table(&path) {
        Err(EvalError::Schema(msg)) => assert!(msg.contains("predicted_value"), "{msg}"),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn test_read_empty_file_is_schema_error() {
    let dir = make_temp_dir();
    let path = dir.join("empty.csv");
    write_file(&path, "");
    assert!(matches!(read_table(&path), Err(EvalError::Schema(_))));
}

#[test]
fn test_read_invalid_float_is_parse_error() {
    let dir = make_temp_dir();
    let path = dir.join("run.csv");
    write_file(
        &path,
        "cell,drug,true_value,predicted_value\nc1,d1,abc,1.0\n",
    );
    assert!(matches!(read_table(&path), Err(EvalError::Parse(_))));
}

#[test]
fn test_read_short_row_is_parse_error() {
    let dir = make_temp_dir();
    let path = dir.join("run.csv");
    write_file(&path, "cell,drug,true_value,predicted_value\nc1,d1,1.0\n");
    assert!(matches!(read_table(&path), Err(EvalError::Parse(_))));
}

#[test]
fn test_read_gzipped_table() {
    let dir = make_temp_dir();
    let path = dir.join("run.csv.gz");
    let file = File::create(&path).unwrap();
    let mut enc = GzEncoder::new(file, Compression::default());
    enc.write_all(b"cell,drug,true_value,predicted_value\nc1,d1,1.0,1.5\n")
        .unwrap();
    enc.finish().unwrap();

    let table = read_table(&path).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.predicted_values, vec![1.5]);
}
