use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use crate::error::EvalError;
use crate::input::open_maybe_gz;

/// Canonical column order for the on-disk prediction table.
pub const COLUMNS: [&str; 4] = ["cell", "drug", "true_value", "predicted_value"];

/// One experiment run as parallel columns. Lengths are equal by construction.
#[derive(Debug, Clone, Default)]
pub struct PredictionTable {
    pub cells: Vec<String>,
    pub drugs: Vec<String>,
    pub true_values: Vec<f64>,
    pub predicted_values: Vec<f64>,
}

impl PredictionTable {
    pub fn new(
        cells: Vec<String>,
        drugs: Vec<String>,
        true_values: Vec<f64>,
        predicted_values: Vec<f64>,
    ) -> Result<Self, String> {
        let n = cells.len();
        if drugs.len() != n || true_values.len() != n || predicted_values.len() != n {
            return Err(format!(
                "unequal column lengths: cells={}, drugs={}, true_values={}, predicted_values={}",
                n,
                drugs.len(),
                true_values.len(),
                predicted_values.len()
            ));
        }
        Ok(PredictionTable {
            cells,
            drugs,
            true_values,
            predicted_values,
        })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Reads a prediction table from a delimited text file. The header must
/// contain the four required columns; they may appear in any order and extra
/// columns are ignored.
pub fn read_table(path: &Path) -> Result<PredictionTable, EvalError> {
    let reader = open_maybe_gz(path)?;
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => {
            return Err(EvalError::Schema(format!(
                "{}: file is empty",
                path.display()
            )));
        }
    };
    let header_cols: Vec<&str> = header.trim_end().split(',').map(str::trim).collect();

    let mut col_idx = [0usize; 4];
    for (slot, name) in COLUMNS.iter().enumerate() {
        col_idx[slot] = header_cols
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| {
                EvalError::Schema(format!(
                    "{}: missing required column {name:?}",
                    path.display()
                ))
            })?;
    }

    let mut cells = Vec::new();
    let mut drugs = Vec::new();
    let mut true_values = Vec::new();
    let mut predicted_values = Vec::new();

    let mut line_no = 1usize;
    for line in lines {
        let line = line?;
        line_no += 1;
        let row = line.trim_end();
        if row.is_empty() {
            continue;
        }
        let fields: Vec<&str> = row.split(',').collect();
        if fields.len() < header_cols.len() {
            return Err(EvalError::Parse(format!(
                "{}:{line_no}: expected {} fields, found {}",
                path.display(),
                header_cols.len(),
                fields.len()
            )));
        }
        cells.push(fields[col_idx[0]].to_string());
        drugs.push(fields[col_idx[1]].to_string());
        true_values.push(parse_float(fields[col_idx[2]], path, line_no)?);
        predicted_values.push(parse_float(fields[col_idx[3]], path, line_no)?);
    }

    PredictionTable::new(cells, drugs, true_values, predicted_values)
        .map_err(|msg| EvalError::Schema(format!("{}: {msg}", path.display())))
}

/// Writes the table with the canonical header, no index column.
pub fn write_table(table: &PredictionTable, path: &Path) -> Result<(), EvalError> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", COLUMNS.join(","))?;
    for i in 0..table.len() {
        writeln!(
            out,
            "{},{},{},{}",
            table.cells[i], table.drugs[i], table.true_values[i], table.predicted_values[i]
        )?;
    }
    out.flush()?;
    Ok(())
}

fn parse_float(field: &str, path: &Path, line_no: usize) -> Result<f64, EvalError> {
    field.trim().parse::<f64>().map_err(|_| {
        EvalError::Parse(format!(
            "{}:{line_no}: invalid float {field:?}",
            path.display()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/table.rs"]
mod tests;
