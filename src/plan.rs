//! Default plot requests for each generator over a labeled benchmark set.

use std::{fmt, str::FromStr};

use crate::{
    FacetBenchError,
    labeler::{Compression, DataType, IoType, LabeledRecord, SizeTable},
    render::PlotRequest,
    selector::{Bar, Group, Predicates, filter, filter_first, sort_by_facets},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Generator {
    #[default]
    Line,
    StackedBar,
    Scalability,
    Relative,
}

impl Generator {
    pub const ALL: [Generator; 4] = [
        Generator::Line,
        Generator::StackedBar,
        Generator::Scalability,
        Generator::Relative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Generator::Line => "line",
            Generator::StackedBar => "stackedbar",
            Generator::Scalability => "scalability",
            Generator::Relative => "relative",
        }
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Generator {
    type Err = FacetBenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Generator::ALL
            .into_iter()
            .find(|g| g.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| {
                FacetBenchError::invalid_input(format!(
                    "unknown generator {s}, expected one of line|stackedbar|scalability|relative"
                ))
            })
    }
}

const BAR_LABELS: [&str; 3] = ["csv", "pq", "pq-snappy"];

pub fn build_requests<'a>(
    generator: Generator,
    records: &'a [LabeledRecord],
    sizes: &SizeTable,
) -> Vec<Result<PlotRequest<'a>, FacetBenchError>> {
    match generator {
        Generator::Line => line_requests(records, sizes),
        Generator::StackedBar => vec![stacked_bar_request(records, sizes)],
        Generator::Scalability => vec![Ok(scalability_request(records, sizes))],
        Generator::Relative => vec![Ok(relative_request(records, sizes))],
    }
}

fn line_requests<'a>(
    records: &'a [LabeledRecord],
    sizes: &SizeTable,
) -> Vec<Result<PlotRequest<'a>, FacetBenchError>> {
    let mut requests = Vec::new();
    for &size in sizes.sizes() {
        for (io_type, heading) in [(IoType::Write, "Write"), (IoType::Read, "Read")] {
            let selected = filter(records, Predicates::any().io_type(io_type).size(size)).collect();
            requests.push(Ok(PlotRequest::Line {
                title: format!("{heading} performance ({size} rows)"),
                records: selected,
            }));
        }
    }
    requests
}

fn write_then_read<'a>(
    records: &'a [LabeledRecord],
    base: Predicates,
) -> Result<Bar<'a>, FacetBenchError> {
    Ok(vec![
        filter_first(records, base.io_type(IoType::Write))?,
        filter_first(records, base.io_type(IoType::Read))?,
    ])
}

fn stacked_bar_request<'a>(
    records: &'a [LabeledRecord],
    sizes: &SizeTable,
) -> Result<PlotRequest<'a>, FacetBenchError> {
    let midsize = sizes.midsize();
    let at_mid = Predicates::any().size(midsize);
    let bars = vec![
        write_then_read(records, at_mid.data_type(DataType::Csv))?,
        write_then_read(
            records,
            at_mid
                .data_type(DataType::Parquet)
                .compression(Compression::Uncompressed),
        )?,
        write_then_read(
            records,
            at_mid
                .data_type(DataType::Parquet)
                .compression(Compression::Snappy),
        )?,
    ];
    Ok(PlotRequest::StackedBar {
        title: format!("Read+Write performance ({midsize} rows)"),
        bars,
        bar_labels: BAR_LABELS.iter().map(|s| s.to_string()).collect(),
        segment_labels: vec!["Write".into(), "Read".into()],
    })
}

/// Records of one size ordered by facet key, split into format bars.
fn size_group<'a>(records: &'a [LabeledRecord], size: u64, with_snappy: bool) -> Group<'a> {
    let mut at_size: Vec<&LabeledRecord> =
        filter(records, Predicates::any().size(size)).collect();
    sort_by_facets(&mut at_size);
    let mut bars: Group<'a> = vec![
        filter(at_size.iter().copied(), Predicates::any().data_type(DataType::Csv)).collect(),
        filter(
            at_size.iter().copied(),
            Predicates::any()
                .data_type(DataType::Parquet)
                .compression(Compression::Uncompressed),
        )
        .collect(),
    ];
    if with_snappy {
        bars.push(
            filter(
                at_size.iter().copied(),
                Predicates::any()
                    .data_type(DataType::Parquet)
                    .compression(Compression::Snappy),
            )
            .collect(),
        );
    }
    bars
}

fn scalability_request<'a>(records: &'a [LabeledRecord], sizes: &SizeTable) -> PlotRequest<'a> {
    let sorted = sizes.sorted();
    PlotRequest::Scalability {
        title: "Read performance".into(),
        groups: sorted.iter().map(|&size| size_group(records, size, true)).collect(),
        group_labels: sorted.iter().map(|size| format!("{size} rows")).collect(),
        bar_labels: BAR_LABELS.iter().map(|s| s.to_string()).collect(),
        // Facet ordering puts the read segment below the write segment.
        segment_labels: vec!["Read".into(), "Write".into()],
    }
}

fn relative_request<'a>(records: &'a [LabeledRecord], sizes: &SizeTable) -> PlotRequest<'a> {
    let sorted = sizes.sorted();
    PlotRequest::Relative {
        title: "Speedup factor of uncompressed pq vs csv".into(),
        groups: sorted.iter().map(|&size| size_group(records, size, false)).collect(),
        group_indices: sorted.iter().map(|&size| size as f64).collect(),
        y_label: "Speedup factor".into(),
    }
}
