use std::fmt;

use crate::{
    FacetBenchError,
    labeler::{Compression, DataType, IoType, LabeledRecord},
};

/// Ordered records stacked as segments of one bar.
pub type Bar<'a> = Vec<&'a LabeledRecord>;

/// Bars compared side by side.
pub type Group<'a> = Vec<Bar<'a>>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Predicates {
    pub data_type: Option<DataType>,
    pub io_type: Option<IoType>,
    pub size: Option<u64>,
    pub compression: Option<Compression>,
}

impl Predicates {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    pub fn io_type(mut self, io_type: IoType) -> Self {
        self.io_type = Some(io_type);
        self
    }

    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn matches(&self, record: &LabeledRecord) -> bool {
        let facets = &record.facets;
        if let Some(data_type) = self.data_type {
            if facets.data_type != data_type {
                return false;
            }
        }
        if let Some(io_type) = self.io_type {
            if facets.io_type != io_type {
                return false;
            }
        }
        if let Some(size) = self.size {
            if facets.size != size {
                return false;
            }
        }
        if let Some(compression) = self.compression {
            if facets.compression != compression {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for Predicates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(data_type) = self.data_type {
            parts.push(format!("datatype={data_type}"));
        }
        if let Some(io_type) = self.io_type {
            parts.push(format!("iotype={io_type}"));
        }
        if let Some(size) = self.size {
            parts.push(format!("datasize={size}"));
        }
        if let Some(compression) = self.compression {
            parts.push(format!("compression={compression}"));
        }
        if parts.is_empty() {
            f.write_str("{*}")
        } else {
            write!(f, "{{{}}}", parts.join(", "))
        }
    }
}

/// Lazily yields every record satisfying all provided predicates, in input order.
pub fn filter<'a, I>(records: I, predicates: Predicates) -> impl Iterator<Item = &'a LabeledRecord>
where
    I: IntoIterator<Item = &'a LabeledRecord>,
{
    records
        .into_iter()
        .filter(move |record| predicates.matches(record))
}

pub fn filter_first<'a, I>(
    records: I,
    predicates: Predicates,
) -> Result<&'a LabeledRecord, FacetBenchError>
where
    I: IntoIterator<Item = &'a LabeledRecord>,
{
    filter(records, predicates)
        .next()
        .ok_or_else(|| FacetBenchError::not_found(predicates.to_string()))
}

/// Stable ordering by data type, compression and I/O direction.
pub fn sort_by_facets(records: &mut [&LabeledRecord]) {
    records.sort_by_cached_key(|record| record.facets.sort_key());
}

pub fn check_uniform_bars(bars: &[Bar<'_>]) -> Result<usize, FacetBenchError> {
    let Some(first) = bars.first() else {
        return Err(FacetBenchError::shape_mismatch(1, Vec::new()));
    };
    let expected = first.len();
    if bars.iter().any(|bar| bar.len() != expected) {
        return Err(FacetBenchError::shape_mismatch(
            expected,
            bars.iter().map(Vec::len).collect(),
        ));
    }
    Ok(expected)
}

/// Checks group arity and bar length across every group; returns `(bars, segments)`.
pub fn check_uniform_groups(groups: &[Group<'_>]) -> Result<(usize, usize), FacetBenchError> {
    let Some(first) = groups.first() else {
        return Err(FacetBenchError::shape_mismatch(1, Vec::new()));
    };
    let group_length = first.len();
    if groups.iter().any(|group| group.len() != group_length) {
        return Err(FacetBenchError::shape_mismatch(
            group_length,
            groups.iter().map(Vec::len).collect(),
        ));
    }
    let segments = check_uniform_bars(first)?;
    for group in groups {
        if group.iter().any(|bar| bar.len() != segments) {
            return Err(FacetBenchError::shape_mismatch(
                segments,
                group.iter().map(Vec::len).collect(),
            ));
        }
    }
    Ok((group_length, segments))
}

pub fn check_label_count<S: AsRef<str>>(
    what: &str,
    labels: &[S],
    expected: usize,
) -> Result<(), FacetBenchError> {
    if labels.len() != expected {
        return Err(FacetBenchError::label_count(what, expected, labels.len()));
    }
    Ok(())
}
