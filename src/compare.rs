//! Pairwise bar comparison: ratio estimates with normal-approximation
//! confidence margins, and a quadratic trend across group indices.
//!
//! The margin is the absolute-difference interval pushed through the ratio
//! transform to first order. It is not an exact ratio-distribution interval.

use ahash::AHashSet;
use nalgebra::{DMatrix, DVector};
use serde::Serialize;

use crate::{
    FacetBenchError,
    selector::{Bar, Group},
    stats,
};

/// Two-tailed z critical value for a 99% interval.
pub const Z_99: f64 = 2.576;
/// Minimum samples per compared bar for the normal approximation.
pub const MIN_SAMPLES: usize = 30;
/// The trend curve is extrapolated to this multiple of the largest index.
pub const EXTRAPOLATION_FACTOR: f64 = 1.05;

const COMPARED_BARS: usize = 2;
const TREND_TERMS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RatioEstimate {
    pub ratio_mean: f64,
    pub ratio_error_margin: f64,
    pub diff_mean: f64,
    pub diff_std_error: f64,
    /// Two-sample z score of `diff_mean`.
    pub z_score: f64,
    pub n0: usize,
    pub n1: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RatioPoint {
    pub index: f64,
    pub estimate: Result<RatioEstimate, FacetBenchError>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

/// `ratio(x) = a·x² + b·x + c`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrendFit {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub r_squared: f64,
    pub curve: Vec<CurvePoint>,
}

impl TrendFit {
    pub fn evaluate(&self, x: f64) -> f64 {
        self.a * x * x + self.b * x + self.c
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonReport {
    pub points: Vec<RatioPoint>,
    pub trend: Result<TrendFit, FacetBenchError>,
}

impl ComparisonReport {
    pub fn valid_points(&self) -> impl Iterator<Item = (f64, &RatioEstimate)> {
        self.points
            .iter()
            .filter_map(|point| point.estimate.as_ref().ok().map(|est| (point.index, est)))
    }
}

/// Millisecond samples of every record in the bar, concatenated.
pub fn bar_total(bar: &Bar<'_>) -> Vec<f64> {
    bar.iter()
        .flat_map(|record| record.record.samples_ms())
        .collect()
}

pub fn compare_group(group: &Group<'_>) -> Result<RatioEstimate, FacetBenchError> {
    if group.len() != COMPARED_BARS {
        return Err(FacetBenchError::arity(COMPARED_BARS, group.len()));
    }
    if group[0].len() != group[1].len() {
        return Err(FacetBenchError::shape_mismatch(
            group[0].len(),
            group.iter().map(Vec::len).collect(),
        ));
    }
    let bar0 = bar_total(&group[0]);
    let bar1 = bar_total(&group[1]);
    for total in [&bar0, &bar1] {
        if total.len() < MIN_SAMPLES {
            return Err(FacetBenchError::insufficient_data(total.len(), MIN_SAMPLES));
        }
    }
    ratio_estimate(&bar0, &bar1)
}

fn ratio_estimate(bar0: &[f64], bar1: &[f64]) -> Result<RatioEstimate, FacetBenchError> {
    let (n0, n1) = (bar0.len(), bar1.len());
    let mean0 = stats::mean(bar0)?;
    let mean1 = stats::mean(bar1)?;
    if mean1 == 0.0 {
        return Err(FacetBenchError::invalid_input(
            "reference bar has a zero mean, ratio undefined",
        ));
    }
    let diff_mean = mean0 - mean1;
    let diff_std_error =
        (stats::variance(bar0)? / n0 as f64 + stats::variance(bar1)? / n1 as f64).sqrt();
    let half_width = Z_99 * diff_std_error;
    let ratio_mean = 1.0 + diff_mean / mean1;
    let ratio_error_margin = ratio_mean - (1.0 + (diff_mean - half_width) / mean1);
    let z_score = stats::z_statistic(
        mean0,
        mean1,
        stats::std_dev(bar0)?,
        stats::std_dev(bar1)?,
        n0,
        n1,
    );
    Ok(RatioEstimate {
        ratio_mean,
        ratio_error_margin,
        diff_mean,
        diff_std_error,
        z_score,
        n0,
        n1,
    })
}

/// Compares every group against its index, isolating failures per index,
/// then fits the trend over the indices that produced a ratio.
pub fn compare_groups(
    groups: &[Group<'_>],
    indices: &[f64],
) -> Result<ComparisonReport, FacetBenchError> {
    if indices.len() != groups.len() {
        return Err(FacetBenchError::label_count(
            "group index",
            groups.len(),
            indices.len(),
        ));
    }
    let points: Vec<RatioPoint> = groups
        .iter()
        .zip(indices)
        .map(|(group, &index)| {
            let estimate = compare_group(group);
            if let Err(err) = &estimate {
                tracing::warn!(index, error = %err, "skipping group in comparison");
            }
            RatioPoint { index, estimate }
        })
        .collect();

    let observations: Vec<(f64, f64, f64)> = points
        .iter()
        .filter_map(|point| {
            point
                .estimate
                .as_ref()
                .ok()
                .map(|est| (point.index, est.ratio_mean, est.ratio_error_margin))
        })
        .collect();
    let extrapolate_to = indices.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        * EXTRAPOLATION_FACTOR;
    let trend = fit_quadratic(&observations, extrapolate_to);
    match &trend {
        Ok(fit) => tracing::debug!(a = fit.a, b = fit.b, c = fit.c, r2 = fit.r_squared, "trend fitted"),
        Err(err) => tracing::warn!(error = %err, "trend fit unavailable"),
    }
    Ok(ComparisonReport { points, trend })
}

/// Weighted least-squares fit of `y = a·x² + b·x + c` over `(x, y, sigma)`
/// observations, each weighted by `1 / sigma²`.
///
/// `curve` covers the distinct observed indices in ascending order followed by
/// `extrapolate_to`. It starts at the smallest observed index; no point at
/// `x = 1` is prepended.
pub fn fit_quadratic(
    observations: &[(f64, f64, f64)],
    extrapolate_to: f64,
) -> Result<TrendFit, FacetBenchError> {
    let distinct: AHashSet<u64> = observations.iter().map(|(x, _, _)| x.to_bits()).collect();
    if distinct.len() < TREND_TERMS {
        return Err(FacetBenchError::fit_failure(format!(
            "{TREND_TERMS} coefficients need at least {TREND_TERMS} distinct group indices, have {}",
            distinct.len()
        )));
    }
    if let Some((x, _, sigma)) = observations
        .iter()
        .find(|(x, y, sigma)| !x.is_finite() || !y.is_finite() || !sigma.is_finite() || *sigma <= 0.0)
    {
        return Err(FacetBenchError::fit_failure(format!(
            "unusable observation at index {x} (sigma {sigma})"
        )));
    }

    // Normalise the index axis so x² does not dominate the conditioning.
    let scale = observations
        .iter()
        .map(|(x, _, _)| x.abs())
        .fold(0.0, f64::max);
    let n = observations.len();
    let mut design = Vec::with_capacity(n * TREND_TERMS);
    let mut rhs = Vec::with_capacity(n);
    for &(x, y, sigma) in observations {
        let t = x / scale;
        design.extend_from_slice(&[t * t / sigma, t / sigma, 1.0 / sigma]);
        rhs.push(y / sigma);
    }
    let design = DMatrix::from_row_slice(n, TREND_TERMS, &design);
    let rhs = DVector::from_vec(rhs);

    let svd = design.svd(true, true);
    let tolerance = svd.singular_values.max() * 1e-12;
    if svd.rank(tolerance) < TREND_TERMS {
        return Err(FacetBenchError::fit_failure("design matrix is rank deficient"));
    }
    let solution = svd
        .solve(&rhs, tolerance)
        .map_err(|e| FacetBenchError::fit_failure(e.to_string()))?;

    let mut fit = TrendFit {
        a: solution[0] / (scale * scale),
        b: solution[1] / scale,
        c: solution[2],
        r_squared: 0.0,
        curve: Vec::new(),
    };
    let observed: Vec<f64> = observations.iter().map(|(_, y, _)| *y).collect();
    let predicted: Vec<f64> = observations.iter().map(|(x, _, _)| fit.evaluate(*x)).collect();
    fit.r_squared = r_squared(&observed, &predicted)?;

    let mut xs: Vec<f64> = observations.iter().map(|(x, _, _)| *x).collect();
    xs.sort_by(f64::total_cmp);
    xs.dedup();
    xs.push(extrapolate_to);
    fit.curve = xs
        .into_iter()
        .map(|x| CurvePoint {
            x,
            y: fit.evaluate(x),
        })
        .collect();
    Ok(fit)
}

/// Coefficient of determination of `predicted` against `observed`.
pub fn r_squared(observed: &[f64], predicted: &[f64]) -> Result<f64, FacetBenchError> {
    if observed.len() != predicted.len() {
        return Err(FacetBenchError::shape_mismatch(
            observed.len(),
            vec![predicted.len()],
        ));
    }
    let mean = stats::mean(observed)?;
    let ss_res: f64 = observed
        .iter()
        .zip(predicted)
        .map(|(y, f)| (y - f).powi(2))
        .sum();
    let ss_tot: f64 = observed.iter().map(|y| (y - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_fit_recovers_exact_quadratic() {
        let obs: Vec<(f64, f64, f64)> = [1000.0, 5000.0, 10000.0, 15000.0, 20000.0]
            .iter()
            .map(|&x| (x, 2e-9 * x * x - 3e-5 * x + 1.5, 0.05))
            .collect();
        let fit = fit_quadratic(&obs, 21000.0).unwrap();
        assert_relative_eq!(fit.a, 2e-9, max_relative = 1e-6);
        assert_relative_eq!(fit.b, -3e-5, max_relative = 1e-6);
        assert_relative_eq!(fit.c, 1.5, max_relative = 1e-9);
        assert_relative_eq!(fit.r_squared, 1.0, epsilon = 1e-9);
        assert_eq!(fit.curve.len(), 6);
        assert_eq!(fit.curve.last().map(|p| p.x), Some(21000.0));
    }

    #[test]
    fn test_weighted_fit_follows_tight_sigmas() {
        // No quadratic passes through these; indices 2 and 4 carry loose sigmas.
        let obs = [
            (1.0, 2.0, 0.01),
            (2.0, 1.0, 1.0),
            (3.0, 3.5, 0.05),
            (4.0, 2.0, 2.0),
            (5.0, 6.0, 0.02),
        ];
        let fit = fit_quadratic(&obs, 5.25).unwrap();

        // Solution of the 1/sigma² weighted normal equations.
        assert_relative_eq!(fit.a, 0.126_058_72, epsilon = 1e-6);
        assert_relative_eq!(fit.b, 0.243_656_53, epsilon = 1e-6);
        assert_relative_eq!(fit.c, 1.630_232_13, epsilon = 1e-6);

        // Ordinary least squares lands somewhere else entirely.
        let (ua, ub, uc) = (3.0 / 7.0, -1.671_428_57, 3.2);
        assert!((fit.a - ua).abs() > 0.1);
        assert!((fit.b - ub).abs() > 1.0);
        assert!((fit.c - uc).abs() > 1.0);

        // R² is unweighted against the observed ratios.
        let mean_y = obs.iter().map(|o| o.1).sum::<f64>() / obs.len() as f64;
        let ss_tot: f64 = obs.iter().map(|o| (o.1 - mean_y).powi(2)).sum();
        let ss_res: f64 = obs.iter().map(|o| (o.1 - fit.evaluate(o.0)).powi(2)).sum();
        assert_relative_eq!(fit.r_squared, 1.0 - ss_res / ss_tot, epsilon = 1e-12);
        assert_relative_eq!(fit.r_squared, 0.374_736, epsilon = 1e-5);

        let xs: Vec<f64> = fit.curve.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0, 4.0, 5.0, 5.25]);
    }

    #[test]
    fn test_fit_rejects_repeated_indices() {
        let obs = [(1.0, 1.0, 0.1), (1.0, 1.1, 0.1), (2.0, 1.2, 0.1), (2.0, 1.3, 0.1)];
        assert!(matches!(
            fit_quadratic(&obs, 2.1),
            Err(FacetBenchError::FitFailure { .. })
        ));
    }

    #[test]
    fn test_fit_rejects_zero_sigma() {
        let obs = [(1.0, 1.0, 0.1), (2.0, 1.1, 0.0), (3.0, 1.2, 0.1)];
        assert!(matches!(
            fit_quadratic(&obs, 3.15),
            Err(FacetBenchError::FitFailure { .. })
        ));
    }

    #[test]
    fn test_r_squared_constant_observations() {
        assert_eq!(r_squared(&[2.0, 2.0], &[2.0, 2.0]).unwrap(), 1.0);
        assert_eq!(r_squared(&[2.0, 2.0], &[2.0, 2.5]).unwrap(), 0.0);
    }

    #[test]
    fn test_ratio_margin_is_half_width_over_reference_mean() {
        let bar0: Vec<f64> = (0..40).map(|i| 20.0 + (i % 4) as f64).collect();
        let bar1: Vec<f64> = (0..40).map(|i| 10.0 + (i % 2) as f64).collect();
        let est = ratio_estimate(&bar0, &bar1).unwrap();
        let mean1 = stats::mean(&bar1).unwrap();
        assert_relative_eq!(est.ratio_mean, stats::mean(&bar0).unwrap() / mean1, max_relative = 1e-12);
        assert_relative_eq!(
            est.ratio_error_margin,
            Z_99 * est.diff_std_error / mean1,
            max_relative = 1e-9
        );
    }
}
