//! Plot requests and the structured artifacts handed to a renderer.
//!
//! Drawing is not done here. A [`Renderer`] receives a [`PlotArtifact`]
//! holding aggregate values and text labels and decides how to present them.

use std::io::Write;

use serde::Serialize;

use crate::{
    FacetBenchError,
    aggregate::{ScalabilityAggregate, StackedAggregate, aggregate_bars, aggregate_groups},
    compare::{TrendFit, compare_groups},
    labeler::LabeledRecord,
    selector::{Bar, Group, check_label_count, check_uniform_bars, check_uniform_groups},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotKind {
    Line,
    StackedBar,
    Scalability,
    Relative,
}

#[derive(Clone, Debug)]
pub enum PlotRequest<'a> {
    Line {
        title: String,
        records: Vec<&'a LabeledRecord>,
    },
    StackedBar {
        title: String,
        bars: Vec<Bar<'a>>,
        bar_labels: Vec<String>,
        segment_labels: Vec<String>,
    },
    Scalability {
        title: String,
        groups: Vec<Group<'a>>,
        group_labels: Vec<String>,
        bar_labels: Vec<String>,
        segment_labels: Vec<String>,
    },
    Relative {
        title: String,
        groups: Vec<Group<'a>>,
        group_indices: Vec<f64>,
        y_label: String,
    },
}

impl PlotRequest<'_> {
    pub fn kind(&self) -> PlotKind {
        match self {
            PlotRequest::Line { .. } => PlotKind::Line,
            PlotRequest::StackedBar { .. } => PlotKind::StackedBar,
            PlotRequest::Scalability { .. } => PlotKind::Scalability,
            PlotRequest::Relative { .. } => PlotKind::Relative,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            PlotRequest::Line { title, .. }
            | PlotRequest::StackedBar { title, .. }
            | PlotRequest::Scalability { title, .. }
            | PlotRequest::Relative { title, .. } => title,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineSeries {
    pub label: String,
    pub values_ms: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineArtifact {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<LineSeries>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StackedBarArtifact {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bar_labels: Vec<String>,
    pub segment_labels: Vec<String>,
    pub aggregate: StackedAggregate,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScalabilityArtifact {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub group_labels: Vec<String>,
    pub bar_labels: Vec<String>,
    pub segment_labels: Vec<String>,
    pub aggregate: ScalabilityAggregate,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RelativePoint {
    pub index: f64,
    pub ratio_mean: f64,
    pub ratio_error_margin: f64,
    pub z_score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IndexFailure {
    pub index: f64,
    pub error: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RelativeArtifact {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_max: f64,
    pub points: Vec<RelativePoint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<IndexFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendFit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend_error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlotArtifact {
    Line(LineArtifact),
    StackedBar(StackedBarArtifact),
    Scalability(ScalabilityArtifact),
    Relative(RelativeArtifact),
}

impl PlotArtifact {
    pub fn kind(&self) -> PlotKind {
        match self {
            PlotArtifact::Line(_) => PlotKind::Line,
            PlotArtifact::StackedBar(_) => PlotKind::StackedBar,
            PlotArtifact::Scalability(_) => PlotKind::Scalability,
            PlotArtifact::Relative(_) => PlotKind::Relative,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            PlotArtifact::Line(a) => &a.title,
            PlotArtifact::StackedBar(a) => &a.title,
            PlotArtifact::Scalability(a) => &a.title,
            PlotArtifact::Relative(a) => &a.title,
        }
    }
}

pub fn build_artifact(request: &PlotRequest<'_>) -> Result<PlotArtifact, FacetBenchError> {
    match request {
        PlotRequest::Line { title, records } => Ok(PlotArtifact::Line(LineArtifact {
            title: title.clone(),
            x_label: "Execution number".into(),
            y_label: "Time (milliseconds)".into(),
            series: records
                .iter()
                .map(|record| LineSeries {
                    label: record.record.qualified_name(),
                    values_ms: record.record.samples_ms(),
                })
                .collect(),
        })),
        PlotRequest::StackedBar {
            title,
            bars,
            bar_labels,
            segment_labels,
        } => {
            let segments = check_uniform_bars(bars)?;
            check_label_count("bar", bar_labels.as_slice(), bars.len())?;
            check_label_count("segment", segment_labels.as_slice(), segments)?;
            Ok(PlotArtifact::StackedBar(StackedBarArtifact {
                title: title.clone(),
                x_label: "Data type".into(),
                y_label: "Execution time (milliseconds)".into(),
                bar_labels: bar_labels.clone(),
                segment_labels: segment_labels.clone(),
                aggregate: aggregate_bars(bars)?,
            }))
        }
        PlotRequest::Scalability {
            title,
            groups,
            group_labels,
            bar_labels,
            segment_labels,
        } => {
            let (group_length, segments) = check_uniform_groups(groups)?;
            check_label_count("group", group_labels.as_slice(), groups.len())?;
            check_label_count("bar", bar_labels.as_slice(), group_length)?;
            check_label_count("segment", segment_labels.as_slice(), segments)?;
            tracing::debug!(
                groups = groups.len(),
                bars = group_length,
                segments,
                "building scalability artifact"
            );
            Ok(PlotArtifact::Scalability(ScalabilityArtifact {
                title: title.clone(),
                x_label: "Data type".into(),
                y_label: "Execution time (milliseconds)".into(),
                group_labels: group_labels.clone(),
                bar_labels: bar_labels.clone(),
                segment_labels: segment_labels.clone(),
                aggregate: aggregate_groups(groups)?,
            }))
        }
        PlotRequest::Relative {
            title,
            groups,
            group_indices,
            y_label,
        } => {
            let report = compare_groups(groups, group_indices)?;
            let mut points = Vec::new();
            let mut failures = Vec::new();
            for point in &report.points {
                match &point.estimate {
                    Ok(est) => points.push(RelativePoint {
                        index: point.index,
                        ratio_mean: est.ratio_mean,
                        ratio_error_margin: est.ratio_error_margin,
                        z_score: est.z_score,
                    }),
                    Err(err) => failures.push(IndexFailure {
                        index: point.index,
                        error: err.to_string(),
                    }),
                }
            }
            let (trend, trend_error) = match report.trend {
                Ok(fit) => (Some(fit), None),
                Err(err) => (None, Some(err.to_string())),
            };
            let x_max = group_indices.iter().copied().fold(0.0, f64::max)
                * crate::compare::EXTRAPOLATION_FACTOR;
            Ok(PlotArtifact::Relative(RelativeArtifact {
                title: title.clone(),
                x_label: "Data size".into(),
                y_label: y_label.clone(),
                x_max,
                points,
                failures,
                trend,
                trend_error,
            }))
        }
    }
}

/// Consumer of finished artifacts.
pub trait Renderer {
    fn render(&mut self, artifact: &PlotArtifact) -> Result<(), FacetBenchError>;
}

/// Writes each artifact as one pretty-printed JSON document.
pub struct JsonRenderer<W> {
    writer: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, artifact: &PlotArtifact) -> Result<(), FacetBenchError> {
        serde_json::to_writer_pretty(&mut self.writer, artifact)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Collects artifacts in memory.
#[derive(Debug, Default)]
pub struct CollectingRenderer {
    pub artifacts: Vec<PlotArtifact>,
}

impl Renderer for CollectingRenderer {
    fn render(&mut self, artifact: &PlotArtifact) -> Result<(), FacetBenchError> {
        self.artifacts.push(artifact.clone());
        Ok(())
    }
}

/// Builds and renders one request; failures stay local to that request.
pub fn render_request<R: Renderer>(
    renderer: &mut R,
    request: &PlotRequest<'_>,
) -> Result<(), FacetBenchError> {
    let artifact = build_artifact(request).inspect_err(|err| {
        tracing::warn!(title = request.title(), kind = ?request.kind(), error = %err, "plot request failed");
    })?;
    renderer.render(&artifact)
}
