use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::EvalError;
use crate::metrics::Metric;
use crate::pipeline::{BatchPerf, ScopePerf};

/// Serialized form of one invocation's raw per-run metric values. NaN entries
/// become `null` under serde_json.
#[derive(Debug, Serialize)]
struct MetricsDoc<'a> {
    global: ScopeDoc<'a>,
    fixed_drug: ScopeDoc<'a>,
    fixed_cell: ScopeDoc<'a>,
}

#[derive(Debug, Serialize)]
struct ScopeDoc<'a> {
    #[serde(rename = "RMSE")]
    rmse: &'a [f64],
    #[serde(rename = "R2")]
    r2: &'a [f64],
    #[serde(rename = "Spearman")]
    spearman: &'a [f64],
    #[serde(rename = "Pearson")]
    pearson: &'a [f64],
}

impl<'a> ScopeDoc<'a> {
    fn from_scope(scope: &'a ScopePerf) -> Self {
        ScopeDoc {
            rmse: scope.get(Metric::Rmse),
            r2: scope.get(Metric::R2),
            spearman: scope.get(Metric::Spearman),
            pearson: scope.get(Metric::Pearson),
        }
    }
}

pub fn render_metrics_json(perf: &BatchPerf) -> Result<String, EvalError> {
    let doc = MetricsDoc {
        global: ScopeDoc::from_scope(&perf.global),
        fixed_drug: ScopeDoc::from_scope(&perf.fixed_drug),
        fixed_cell: ScopeDoc::from_scope(&perf.fixed_cell),
    };
    Ok(serde_json::to_string(&doc)?)
}

pub fn write_metrics_json(perf: &BatchPerf, path: &Path) -> Result<(), EvalError> {
    let rendered = render_metrics_json(perf)?;
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(rendered.as_bytes())?;
    out.flush()?;
    Ok(())
}
