use std::path::Path;

use serde_json::Value;

use crate::error::EvalError;
use crate::input::open_maybe_gz;
use crate::input::table::PredictionTable;

/// Position of the test partition inside a result bundle. Index 0 holds the
/// training partition, which the converter never reads.
const TEST_PARTITION_INDEX: usize = 1;

/// Reads one serialized result bundle and extracts its test partition as a
/// prediction table.
pub fn read_bundle(path: &Path) -> Result<PredictionTable, EvalError> {
    let mut reader = open_maybe_gz(path)?;
    let root: Value = serde_json::from_reader(&mut reader)?;
    parse_bundle(&root).map_err(|reason| EvalError::Bundle(format!("{}: {reason}", path.display())))
}

/// The test partition is `[ids, true_values, predicted_values]` where `ids`
/// is either two parallel columns `[cells, drugs]` or a sequence of
/// `[cell, drug]` pairs.
pub(crate) fn parse_bundle(root: &Value) -> Result<PredictionTable, String> {
    let parts = root
        .as_array()
        .ok_or_else(|| "bundle root is not an array".to_string())?;
    let test_p = parts
        .get(TEST_PARTITION_INDEX)
        .ok_or_else(|| format!("bundle has no element at index {TEST_PARTITION_INDEX}"))?
        .as_array()
        .ok_or_else(|| "test partition is not an array".to_string())?;
    if test_p.len() != 3 {
        return Err(format!(
            "test partition has {} elements, expected 3",
            test_p.len()
        ));
    }

    let (cells, drugs) = split_identifiers(&test_p[0])?;
    let true_values = float_seq(&test_p[1], "true values")?;
    let predicted_values = float_seq(&test_p[2], "predicted values")?;

    PredictionTable::new(cells, drugs, true_values, predicted_values)
}

/// Splits the identifier block into (cells, drugs).
///
/// Tagged form: `{"layout": "pairs" | "parallel", "ids": [...]}`. Untagged
/// arrays fall back to the producer's historical shape rule: more than two
/// entries can only be a pair sequence; at most two entries are read as the
/// parallel columns. An untagged pair sequence of length <= 2 is therefore
/// indistinguishable from the parallel form and must be tagged by the
/// producer.
fn split_identifiers(ids: &Value) -> Result<(Vec<String>, Vec<String>), String> {
    if let Some(obj) = ids.as_object() {
        let layout = obj
            .get("layout")
            .and_then(Value::as_str)
            .ok_or_else(|| "identifier object has no \"layout\" tag".to_string())?;
        let items = obj
            .get("ids")
            .and_then(Value::as_array)
            .ok_or_else(|| "identifier object has no \"ids\" array".to_string())?;
        return match layout {
            "pairs" => unzip_pairs(items),
            "parallel" => parallel_columns(items),
            other => Err(format!("unknown identifier layout {other:?}")),
        };
    }

    let items = ids
        .as_array()
        .ok_or_else(|| "identifier block is neither an array nor a tagged object".to_string())?;
    if items.len() > 2 {
        unzip_pairs(items)
    } else {
        parallel_columns(items)
    }
}

fn unzip_pairs(items: &[Value]) -> Result<(Vec<String>, Vec<String>), String> {
    let mut cells = Vec::with_capacity(items.len());
    let mut drugs = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let pair = item
            .as_array()
            .ok_or_else(|| format!("identifier pair {idx} is not an array"))?;
        if pair.len() != 2 {
            return Err(format!(
                "identifier pair {idx} has {} entries, expected 2",
                pair.len()
            ));
        }
        cells.push(string_value(&pair[0], "cell", idx)?);
        drugs.push(string_value(&pair[1], "drug", idx)?);
    }
    Ok((cells, drugs))
}

fn parallel_columns(items: &[Value]) -> Result<(Vec<String>, Vec<String>), String> {
    if items.len() != 2 {
        return Err(format!(
            "parallel identifier block has {} columns, expected 2",
            items.len()
        ));
    }
    let cells = string_seq(&items[0], "cells")?;
    let drugs = string_seq(&items[1], "drugs")?;
    Ok((cells, drugs))
}

fn string_seq(value: &Value, what: &str) -> Result<Vec<String>, String> {
    let items = value
        .as_array()
        .ok_or_else(|| format!("{what} is not an array"))?;
    items
        .iter()
        .enumerate()
        .map(|(idx, v)| string_value(v, what, idx))
        .collect()
}

fn string_value(value: &Value, what: &str, idx: usize) -> Result<String, String> {
    // Producers emit identifiers as strings or bare numeric ids.
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(format!("{what} entry {idx} is not an identifier")),
    }
}

fn float_seq(value: &Value, what: &str) -> Result<Vec<f64>, String> {
    let items = value
        .as_array()
        .ok_or_else(|| format!("{what} is not an array"))?;
    items
        .iter()
        .enumerate()
        .map(|(idx, v)| {
            v.as_f64()
                .ok_or_else(|| format!("{what} entry {idx} is not a number"))
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/bundle.rs"]
mod tests;
