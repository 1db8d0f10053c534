use super::json::render_metrics_json;
use super::text::render_report_text;
use super::*;
use crate::metrics::Metric;
use crate::pipeline::BatchPerf;

#[test]
fn test_mean_and_std_two_runs() {
    assert_eq!(mean(&[2.0, 4.0]), 3.0);
    assert_eq!(std_pop(&[2.0, 4.0]), 1.0);
}

#[test]
fn test_std_single_run_is_zero() {
    assert_eq!(std_pop(&[7.0]), 0.0);
}

#[test]
fn test_mean_empty_is_nan() {
    assert!(mean(&[]).is_nan());
    assert!(std_pop(&[]).is_nan());
}

#[test]
fn test_mean_propagates_nan() {
    assert!(mean(&[1.0, f64::NAN]).is_nan());
}

#[test]
fn test_format_three_digits() {
    assert_eq!(format_f64_3(1.23456), "1.235");
    assert_eq!(format_f64_3(3.0), "3.000");
    assert_eq!(format_f64_3(f64::NAN), "nan");
}

fn two_run_perf() -> BatchPerf {
    let mut perf = BatchPerf::default();
    for metric in Metric::ALL {
        perf.global.push(metric, 2.0);
        perf.global.push(metric, 4.0);
        perf.fixed_drug.push(metric, 0.5);
        perf.fixed_drug.push(metric, 0.5);
        perf.fixed_cell.push(metric, f64::NAN);
        perf.fixed_cell.push(metric, 1.0);
    }
    perf.n_runs = 2;
    perf
}

#[test]
fn test_render_report_text_layout() {
    let report = render_report_text("preds/batch", &two_run_perf());
    assert!(report.starts_with("Metrics for preds/batch\n"));
    assert!(report.contains("Number of runs: 2\n"));
    assert!(report.contains("Global metrics:\n"));
    assert!(report.contains("\nFixed_drug metrics:\n"));
    assert!(report.contains("\nFixed_cell metrics:\n"));
    assert!(report.contains("\tRMSE: 3.000, std: 1.000\n"));
    assert!(report.contains("\tPearson: 0.500, std: 0.000\n"));
    // NaN in one run makes the whole scope mean NaN
    assert!(report.contains("\tSpearman: nan, std: nan\n"));
}

#[test]
fn test_render_metrics_json_shape() {
    let rendered = render_metrics_json(&two_run_perf()).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    for scope in ["global", "fixed_drug", "fixed_cell"] {
        for metric in ["RMSE", "R2", "Spearman", "Pearson"] {
            assert_eq!(doc[scope][metric].as_array().unwrap().len(), 2);
        }
    }
    assert_eq!(doc["global"]["RMSE"][0].as_f64(), Some(2.0));
    // NaN serializes as null
    assert!(doc["fixed_cell"]["RMSE"][0].is_null());
}
