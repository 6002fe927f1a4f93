//! Stacked-bar statistics: per-segment means, stacking offsets and the
//! accumulated trimmed error reported at the top of each bar.

use serde::Serialize;

use crate::{
    FacetBenchError,
    selector::{Bar, Group, check_uniform_bars, check_uniform_groups},
    stats,
};

/// Headroom applied to the largest sample when sharing a y-axis across groups.
pub const Y_AXIS_HEADROOM: f64 = 1.1;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AggregateStat {
    pub mean: f64,
    pub cumulative_offset: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StackedAggregate {
    /// `segments[s][b]` is segment `s` of bar `b`.
    pub segments: Vec<Vec<AggregateStat>>,
    /// Stack height of every bar.
    pub totals: Vec<f64>,
    /// Sum over segments of each segment's trimmed standard deviation.
    pub trimmed_std_errors: Vec<f64>,
}

impl StackedAggregate {
    pub fn bar_count(&self) -> usize {
        self.totals.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScalabilityAggregate {
    pub groups: Vec<StackedAggregate>,
    pub y_max: f64,
}

pub fn aggregate_bars(bars: &[Bar<'_>]) -> Result<StackedAggregate, FacetBenchError> {
    let segment_count = check_uniform_bars(bars)?;
    aggregate_checked(bars, segment_count)
}

fn aggregate_checked(
    bars: &[Bar<'_>],
    segment_count: usize,
) -> Result<StackedAggregate, FacetBenchError> {
    let mut offsets = vec![0.0; bars.len()];
    let mut errors = vec![0.0; bars.len()];
    let mut segments = Vec::with_capacity(segment_count);
    for idx in 0..segment_count {
        let mut row = Vec::with_capacity(bars.len());
        for (bar_idx, bar) in bars.iter().enumerate() {
            let samples = bar[idx].record.samples_ms();
            let mean = stats::mean(&samples)?;
            errors[bar_idx] += stats::trimmed_std_dev(&samples)?;
            row.push(AggregateStat {
                mean,
                cumulative_offset: offsets[bar_idx],
            });
        }
        for (offset, stat) in offsets.iter_mut().zip(&row) {
            *offset += stat.mean;
        }
        segments.push(row);
    }
    tracing::debug!(
        bars = bars.len(),
        segments = segment_count,
        totals = ?offsets,
        "aggregated stacked bars"
    );
    Ok(StackedAggregate {
        segments,
        totals: offsets,
        trimmed_std_errors: errors,
    })
}

pub fn aggregate_groups(groups: &[Group<'_>]) -> Result<ScalabilityAggregate, FacetBenchError> {
    let (_, segment_count) = check_uniform_groups(groups)?;
    let aggregates = groups
        .iter()
        .map(|group| aggregate_checked(group, segment_count))
        .collect::<Result<Vec<_>, _>>()?;
    let y_max = groups
        .iter()
        .flatten()
        .flatten()
        .flat_map(|record| record.record.samples_ms())
        .fold(f64::NEG_INFINITY, f64::max)
        * Y_AXIS_HEADROOM;
    Ok(ScalabilityAggregate {
        groups: aggregates,
        y_max,
    })
}
