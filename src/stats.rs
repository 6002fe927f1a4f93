//! Descriptive statistics over millisecond sample sets.
//!
//! Variances are population variances (no Bessel correction). Percentiles
//! interpolate linearly between the two closest ranks.

use crate::FacetBenchError;

pub const TRIM_LOWER_PERCENTILE: f64 = 1.0;
pub const TRIM_UPPER_PERCENTILE: f64 = 99.0;

pub fn mean(samples: &[f64]) -> Result<f64, FacetBenchError> {
    if samples.is_empty() {
        return Err(FacetBenchError::insufficient_data(0, 1));
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

pub fn variance(samples: &[f64]) -> Result<f64, FacetBenchError> {
    let m = mean(samples)?;
    Ok(samples.iter().map(|x| (x - m).powi(2)).sum::<f64>() / samples.len() as f64)
}

pub fn std_dev(samples: &[f64]) -> Result<f64, FacetBenchError> {
    variance(samples).map(f64::sqrt)
}

pub fn percentile(samples: &[f64], pct: f64) -> Result<f64, FacetBenchError> {
    if samples.is_empty() {
        return Err(FacetBenchError::insufficient_data(0, 1));
    }
    if !(0.0..=100.0).contains(&pct) {
        return Err(FacetBenchError::invalid_input(format!(
            "percentile {pct} outside [0, 100]"
        )));
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Samples inside the inclusive `[lower_pct, upper_pct]` percentile range, in input order.
pub fn trimmed(samples: &[f64], lower_pct: f64, upper_pct: f64) -> Result<Vec<f64>, FacetBenchError> {
    let low = percentile(samples, lower_pct)?;
    let high = percentile(samples, upper_pct)?;
    Ok(samples
        .iter()
        .copied()
        .filter(|x| low <= *x && *x <= high)
        .collect())
}

/// Population standard deviation of the samples within the 1st..99th percentile.
pub fn trimmed_std_dev(samples: &[f64]) -> Result<f64, FacetBenchError> {
    let kept = trimmed(samples, TRIM_LOWER_PERCENTILE, TRIM_UPPER_PERCENTILE)?;
    std_dev(&kept)
}

/// Two-sample z score of `mean0 - mean1` under unpooled population variances.
pub fn z_statistic(mean0: f64, mean1: f64, std0: f64, std1: f64, n0: usize, n1: usize) -> f64 {
    let se = ((std0 * std0) / n0 as f64 + (std1 * std1) / n1 as f64).sqrt();
    (mean0 - mean1) / se
}
