use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::EvalError;
use crate::input::list_entries_sorted;
use crate::input::table::{PredictionTable, read_table};
use crate::metrics::Metric;
use crate::report::json::write_metrics_json;
use crate::report::text::render_report_text;

/// Groups below this size are skipped in the fixed-drug and fixed-cell
/// scopes; the metrics are unstable under 2 points.
pub const MIN_GROUP_SIZE: usize = 2;

/// Per-run raw values of one scope, one vector per metric in
/// `Metric::ALL` order.
#[derive(Debug, Clone, Default)]
pub struct ScopePerf {
    per_metric: [Vec<f64>; 4],
}

impl ScopePerf {
    pub fn push(&mut self, metric: Metric, value: f64) {
        self.per_metric[metric as usize].push(value);
    }

    pub fn get(&self, metric: Metric) -> &[f64] {
        &self.per_metric[metric as usize]
    }
}

/// Accumulated state of one aggregator invocation. Built fresh per call and
/// never shared; nothing lives at module scope.
#[derive(Debug, Clone, Default)]
pub struct BatchPerf {
    pub global: ScopePerf,
    pub fixed_drug: ScopePerf,
    pub fixed_cell: ScopePerf,
    pub n_runs: usize,
}

/// Loads every run under `path` (a prediction file, or a directory whose
/// direct children are runs), accumulates the three metric scopes per run,
/// prints the aggregate report, and optionally persists the raw per-run
/// values as JSON.
pub fn process_predictions(path: &Path, save_metrics: bool) -> Result<(), EvalError> {
    let runs = resolve_runs(path)?;
    let mut perf = BatchPerf::default();
    for f_path in &runs {
        info!("loading run {}", f_path.display());
        let table = read_table(f_path)?;
        if table.is_empty() {
            warn!("run {} has no prediction rows", f_path.display());
        }
        accumulate_run(&mut perf, &table);
    }

    print!("{}", render_report_text(&label_for(path), &perf));

    if save_metrics {
        let out_path = metrics_json_path(path);
        write_metrics_json(&perf, &out_path)?;
        println!("Metrics saved in {}", out_path.display());
    } else {
        println!("Metrics not saved");
    }
    Ok(())
}

fn resolve_runs(path: &Path) -> Result<Vec<PathBuf>, EvalError> {
    if path.is_dir() {
        list_entries_sorted(path)
    } else {
        Ok(vec![path.to_path_buf()])
    }
}

fn accumulate_run(perf: &mut BatchPerf, table: &PredictionTable) {
    for metric in Metric::ALL {
        perf.global.push(
            metric,
            metric.compute(&table.true_values, &table.predicted_values),
        );
    }
    accumulate_grouped(&mut perf.fixed_drug, &table.drugs, table);
    accumulate_grouped(&mut perf.fixed_cell, &table.cells, table);
    perf.n_runs += 1;
}

/// Per-group metrics averaged across groups with a NaN-aware mean. Zero
/// variance inside a group yields NaN from the correlations; those values are
/// dropped from the group average but the global scope keeps its NaN as-is.
fn accumulate_grouped(scope: &mut ScopePerf, keys: &[String], table: &PredictionTable) {
    let mut per_group = ScopePerf::default();
    for rows in group_indices(keys).values() {
        if rows.len() < MIN_GROUP_SIZE {
            continue;
        }
        let truth: Vec<f64> = rows.iter().map(|&i| table.true_values[i]).collect();
        let pred: Vec<f64> = rows.iter().map(|&i| table.predicted_values[i]).collect();
        for metric in Metric::ALL {
            per_group.push(metric, metric.compute(&truth, &pred));
        }
    }
    for metric in Metric::ALL {
        scope.push(metric, nan_mean(per_group.get(metric)));
    }
}

fn group_indices(keys: &[String]) -> BTreeMap<&str, Vec<usize>> {
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, key) in keys.iter().enumerate() {
        groups.entry(key.as_str()).or_default().push(idx);
    }
    groups
}

/// Mean over the non-NaN entries; NaN when none remain.
pub fn nan_mean(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for &v in values {
        if !v.is_nan() {
            sum += v;
            count += 1;
        }
    }
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// The path string up to its first `.`, the label the report and the metrics
/// file are both named by.
fn label_for(path: &Path) -> String {
    let s = path.to_string_lossy();
    s.split('.').next().unwrap_or_default().to_string()
}

fn metrics_json_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}_metrics.json", label_for(path)))
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/mod.rs"]
mod tests;
