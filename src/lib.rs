//! Faceted statistics over benchmark latency measurements.
//!
//! Records are labeled with facets (format, I/O direction, compression, size),
//! selected into bars and groups, and reduced to stacked aggregates or
//! pairwise ratio estimates that a renderer turns into plots.

pub mod aggregate;
pub mod bench_utils;
pub mod compare;
pub mod config;
pub mod document;
pub mod errors;
pub mod labeler;
pub mod pipeline;
pub mod plan;
pub mod render;
pub mod selector;
pub mod stats;

pub use crate::aggregate::{AggregateStat, ScalabilityAggregate, StackedAggregate};
pub use crate::compare::{ComparisonReport, RatioEstimate, TrendFit};
pub use crate::document::{BenchmarkDocument, BenchmarkRecord};
pub use crate::errors::FacetBenchError;
pub use crate::labeler::{Compression, DataType, Facets, IoType, LabeledRecord, SizeTable};
pub use crate::plan::Generator;
pub use crate::render::{PlotArtifact, PlotRequest, Renderer};
pub use crate::selector::{Bar, Group, Predicates};
