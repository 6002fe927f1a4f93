//! Facet classification of raw benchmark records.
//!
//! Labeling never mutates a record: it produces a separate [`Facets`] value that
//! is paired with the record in a [`LabeledRecord`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{FacetBenchError, document::BenchmarkRecord};

pub const DEFAULT_SIZES: [u64; 5] = [1000, 5000, 10000, 15000, 20000];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Csv,
    Parquet,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IoType {
    Read,
    Write,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Snappy,
    Uncompressed,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Csv => "csv",
            DataType::Parquet => "parquet",
        }
    }
}

impl IoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IoType::Read => "read",
            IoType::Write => "write",
        }
    }
}

impl Compression {
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::Snappy => "snappy",
            Compression::Uncompressed => "uncompressed",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for IoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered table of data sizes, indexed by the digit in a benchmark name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SizeTable {
    sizes: Vec<u64>,
}

impl SizeTable {
    pub fn new(sizes: Vec<u64>) -> Result<Self, FacetBenchError> {
        if sizes.is_empty() {
            return Err(FacetBenchError::invalid_input("size table must not be empty"));
        }
        if sizes.len() > 10 {
            return Err(FacetBenchError::invalid_input(
                "size table is indexed by a single digit, at most 10 entries",
            ));
        }
        Ok(Self { sizes })
    }

    pub fn get(&self, index: usize) -> Option<u64> {
        self.sizes.get(index).copied()
    }

    pub fn sizes(&self) -> &[u64] {
        &self.sizes
    }

    pub fn sorted(&self) -> Vec<u64> {
        let mut sorted = self.sizes.clone();
        sorted.sort_unstable();
        sorted
    }

    /// Middle element of the sorted table (upper middle for even lengths).
    pub fn midsize(&self) -> u64 {
        let sorted = self.sorted();
        sorted[sorted.len() / 2]
    }
}

impl Default for SizeTable {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Facets {
    pub data_type: DataType,
    pub io_type: IoType,
    pub compression: Compression,
    pub size: u64,
}

impl Facets {
    /// Grouping key used when a selection is ordered before being split into bars.
    pub fn sort_key(&self) -> String {
        format!(
            "{}{}{}",
            self.data_type.as_str(),
            self.compression.as_str(),
            self.io_type.as_str()
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabeledRecord {
    pub record: BenchmarkRecord,
    pub facets: Facets,
}

impl LabeledRecord {
    pub fn new(record: BenchmarkRecord, table: &SizeTable) -> Result<Self, FacetBenchError> {
        let facets = label(&record, table)?;
        Ok(Self { record, facets })
    }

    pub fn relabel(&self, table: &SizeTable) -> Result<Self, FacetBenchError> {
        Self::new(self.record.clone(), table)
    }
}

pub fn label(record: &BenchmarkRecord, table: &SizeTable) -> Result<Facets, FacetBenchError> {
    Ok(Facets {
        data_type: identify_data_type(record)?,
        io_type: identify_io_type(record)?,
        compression: identify_compression(record),
        size: identify_size(record, table)?,
    })
}

pub fn label_all(
    records: Vec<BenchmarkRecord>,
    table: &SizeTable,
) -> Result<Vec<LabeledRecord>, FacetBenchError> {
    records
        .into_iter()
        .map(|record| LabeledRecord::new(record, table))
        .collect()
}

/// Labels every record independently; unidentifiable records are returned
/// separately instead of failing the whole set.
pub fn label_each(
    records: Vec<BenchmarkRecord>,
    table: &SizeTable,
) -> (Vec<LabeledRecord>, Vec<FacetBenchError>) {
    let mut labeled = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();
    for record in records {
        match LabeledRecord::new(record, table) {
            Ok(record) => labeled.push(record),
            Err(err) => {
                tracing::warn!(error = %err, "skipping unidentifiable benchmark");
                rejected.push(err);
            }
        }
    }
    (labeled, rejected)
}

fn identify_data_type(record: &BenchmarkRecord) -> Result<DataType, FacetBenchError> {
    let tail = record.class_tail().to_lowercase();
    if tail.contains("csv") {
        Ok(DataType::Csv)
    } else if tail.contains("parquet") {
        Ok(DataType::Parquet)
    } else {
        Err(FacetBenchError::unidentifiable(
            record.qualified_name(),
            "datatype",
        ))
    }
}

fn identify_io_type(record: &BenchmarkRecord) -> Result<IoType, FacetBenchError> {
    let name = record.name.to_lowercase();
    if name.contains("read") {
        Ok(IoType::Read)
    } else if name.contains("write") {
        Ok(IoType::Write)
    } else {
        Err(FacetBenchError::unidentifiable(
            record.qualified_name(),
            "iotype",
        ))
    }
}

fn identify_compression(record: &BenchmarkRecord) -> Compression {
    if record.name.to_lowercase().contains("snappy") {
        Compression::Snappy
    } else {
        Compression::Uncompressed
    }
}

fn identify_size(record: &BenchmarkRecord, table: &SizeTable) -> Result<u64, FacetBenchError> {
    let index = bracketed_digit(&record.name).ok_or_else(|| {
        FacetBenchError::unidentifiable(record.qualified_name(), "datasize")
    })?;
    table.get(index).ok_or_else(|| {
        FacetBenchError::unidentifiable(
            record.qualified_name(),
            format!("datasize index {index} outside size table"),
        )
    })
}

/// First `[d]` occurrence in `name`, `d` being a single ASCII digit.
fn bracketed_digit(name: &str) -> Option<usize> {
    name.as_bytes().windows(3).find_map(|w| match w {
        [b'[', d, b']'] if d.is_ascii_digit() => Some((d - b'0') as usize),
        _ => None,
    })
}
