use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::FacetBenchError;

pub const NANOS_PER_MILLI: f64 = 1_000_000.0;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BenchmarkDocument {
    pub benchmarks: Vec<BenchmarkEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkEntry {
    pub name: String,
    pub class_name: String,
    pub metrics: BenchmarkMetrics,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkMetrics {
    pub time_ns: TimeSeries,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TimeSeries {
    pub runs: Vec<f64>,
}

/// A named timed operation and its raw per-run latencies in nanoseconds.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkRecord {
    pub name: String,
    pub class_name: String,
    pub samples_ns: Vec<f64>,
}

impl BenchmarkRecord {
    pub fn new(name: &str, class_name: &str, samples_ns: Vec<f64>) -> Self {
        Self {
            name: name.to_string(),
            class_name: class_name.to_string(),
            samples_ns,
        }
    }

    /// Last dotted component of the class identifier.
    pub fn class_tail(&self) -> &str {
        self.class_name.rsplit('.').next().unwrap_or(&self.class_name)
    }

    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.class_tail(), self.name)
    }

    pub fn samples_ms(&self) -> Vec<f64> {
        self.samples_ns.iter().map(|ns| ns / NANOS_PER_MILLI).collect()
    }

    pub fn len(&self) -> usize {
        self.samples_ns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples_ns.is_empty()
    }
}

impl From<BenchmarkEntry> for BenchmarkRecord {
    fn from(entry: BenchmarkEntry) -> Self {
        Self {
            name: entry.name,
            class_name: entry.class_name,
            samples_ns: entry.metrics.time_ns.runs,
        }
    }
}

impl BenchmarkDocument {
    pub fn into_records(self) -> Vec<BenchmarkRecord> {
        self.benchmarks.into_iter().map(BenchmarkRecord::from).collect()
    }
}

pub fn parse_document(input: &str) -> Result<BenchmarkDocument, FacetBenchError> {
    let document: BenchmarkDocument = serde_json::from_str(input)?;
    for entry in &document.benchmarks {
        if entry.metrics.time_ns.runs.iter().any(|x| !x.is_finite()) {
            return Err(FacetBenchError::invalid_input(format!(
                "benchmark {} holds a non-finite sample",
                entry.name
            )));
        }
    }
    Ok(document)
}

pub fn load_document(path: &Path) -> Result<BenchmarkDocument, FacetBenchError> {
    let data = fs::read_to_string(path)
        .map_err(|e| FacetBenchError::io(format!("{}: {e}", path.display())))?;
    if data.trim().is_empty() {
        return Err(FacetBenchError::invalid_input(format!(
            "{} is empty",
            path.display()
        )));
    }
    let document = parse_document(&data)?;
    tracing::info!(
        path = %path.display(),
        benchmarks = document.benchmarks.len(),
        "loaded benchmark document"
    );
    Ok(document)
}

pub fn load_records(path: &Path) -> Result<Vec<BenchmarkRecord>, FacetBenchError> {
    load_document(path).map(BenchmarkDocument::into_records)
}
