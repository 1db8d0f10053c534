//! The fixed metric set applied to (true, predicted) vectors. Each metric is
//! a pure function; numeric degeneracies are values (NaN), never errors.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Rmse,
    R2,
    Spearman,
    Pearson,
}

impl Metric {
    /// Report and persistence order.
    pub const ALL: [Metric; 4] = [Metric::Rmse, Metric::R2, Metric::Spearman, Metric::Pearson];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Rmse => "RMSE",
            Metric::R2 => "R2",
            Metric::Spearman => "Spearman",
            Metric::Pearson => "Pearson",
        }
    }

    pub fn compute(self, truth: &[f64], pred: &[f64]) -> f64 {
        match self {
            Metric::Rmse => rmse(truth, pred),
            Metric::R2 => r2_score(truth, pred),
            Metric::Spearman => spearman(truth, pred),
            Metric::Pearson => pearson(truth, pred),
        }
    }
}

/// `sqrt(mean((truth - pred)^2))`; NaN for empty input.
pub fn rmse(truth: &[f64], pred: &[f64]) -> f64 {
    if truth.is_empty() || truth.len() != pred.len() {
        return f64::NAN;
    }
    let n = truth.len() as f64;
    let sum_sq: f64 = truth
        .iter()
        .zip(pred.iter())
        .map(|(t, p)| (t - p) * (t - p))
        .sum();
    (sum_sq / n).sqrt()
}

/// Coefficient of determination, `1 - ss_res/ss_tot`. When the true values
/// have zero variance the result is 1.0 for a perfect fit and 0.0 otherwise,
/// matching the scikit-learn convention.
pub fn r2_score(truth: &[f64], pred: &[f64]) -> f64 {
    if truth.is_empty() || truth.len() != pred.len() {
        return f64::NAN;
    }
    let n = truth.len() as f64;
    let mean_t: f64 = truth.iter().sum::<f64>() / n;
    let ss_res: f64 = truth
        .iter()
        .zip(pred.iter())
        .map(|(t, p)| (t - p) * (t - p))
        .sum();
    let ss_tot: f64 = truth.iter().map(|t| (t - mean_t) * (t - mean_t)).sum();
    if ss_tot == 0.0 {
        if ss_res == 0.0 { 1.0 } else { 0.0 }
    } else {
        1.0 - ss_res / ss_tot
    }
}

/// Pearson linear correlation; NaN when either vector has zero variance or
/// fewer than 2 points.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return f64::NAN;
    }
    let n = x.len() as f64;
    let mean_x: f64 = x.iter().sum::<f64>() / n;
    let mean_y: f64 = y.iter().sum::<f64>() / n;

    let mut num = 0.0;
    let mut den_x = 0.0;
    let mut den_y = 0.0;
    for (&xv, &yv) in x.iter().zip(y.iter()) {
        let dx = xv - mean_x;
        let dy = yv - mean_y;
        num += dx * dy;
        den_x += dx * dx;
        den_y += dy * dy;
    }
    let denom = (den_x * den_y).sqrt();
    if denom == 0.0 { f64::NAN } else { num / denom }
}

/// Spearman rank correlation: Pearson over average-ranked data. NaN entries
/// have no rank, so a NaN anywhere makes the coefficient NaN, as with the
/// other metrics.
pub fn spearman(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return f64::NAN;
    }
    if x.iter().chain(y.iter()).any(|v| v.is_nan()) {
        return f64::NAN;
    }
    let rx = rank_average(x);
    let ry = rank_average(y);
    pearson(&rx, &ry)
}

/// 1-based ranks; tied values receive the mean of the ranks they span.
fn rank_average(values: &[f64]) -> Vec<f64> {
    let mut indexed: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < indexed.len() {
        let mut j = i + 1;
        while j < indexed.len() && indexed[j].1 == indexed[i].1 {
            j += 1;
        }
        let avg_rank = ((i + 1) + j) as f64 / 2.0;
        for k in i..j {
            ranks[indexed[k].0] = avg_rank;
        }
        i = j;
    }
    ranks
}

#[cfg(test)]
#[path = "../../tests/src_inline/metrics/mod.rs"]
mod tests;
