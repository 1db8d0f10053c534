use crate::metrics::Metric;
use crate::pipeline::{BatchPerf, ScopePerf};
use crate::report::{format_f64_3, mean, std_pop};

/// Renders the aggregate report for one processed path: run count, then the
/// four metrics per scope as mean and standard deviation across runs.
pub fn render_report_text(label: &str, perf: &BatchPerf) -> String {
    let mut out = String::new();

    out.push_str(&format!("Metrics for {label}\n"));
    out.push_str(&format!("Number of runs: {}\n", perf.n_runs));

    out.push_str("Global metrics:\n");
    push_scope_block(&mut out, &perf.global);

    out.push_str("\nFixed_drug metrics:\n");
    push_scope_block(&mut out, &perf.fixed_drug);

    out.push_str("\nFixed_cell metrics:\n");
    push_scope_block(&mut out, &perf.fixed_cell);

    out.push('\n');
    out
}

fn push_scope_block(out: &mut String, scope: &ScopePerf) {
    for metric in Metric::ALL {
        let values = scope.get(metric);
        out.push_str(&format!(
            "\t{}: {}, std: {}\n",
            metric.name(),
            format_f64_3(mean(values)),
            format_f64_3(std_pop(values))
        ));
    }
}
