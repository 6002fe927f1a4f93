//! Synthetic benchmark documents for benches and tests.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{document::BenchmarkRecord, labeler::SizeTable};

#[derive(Clone, Debug)]
pub struct SyntheticSpec {
    pub samples_per_record: usize,
    /// Base latency in milliseconds per table entry; scaled by the size.
    pub ms_per_thousand_rows: f64,
    /// Relative jitter applied uniformly around each sample.
    pub jitter: f64,
    pub with_snappy: bool,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        Self {
            samples_per_record: 50,
            ms_per_thousand_rows: 2.0,
            jitter: 0.1,
            with_snappy: true,
        }
    }
}

const FORMATS: [(&str, &str, f64); 3] = [
    ("csv", "org.bench.CsvBenchmark", 1.0),
    ("parquet", "org.bench.ParquetBenchmark", 0.45),
    ("parquetSnappy", "org.bench.ParquetBenchmark", 0.55),
];

/// One record per format, direction and size index, with seeded latencies.
pub fn generate_records(spec: &SyntheticSpec, sizes: &SizeTable, seed: u64) -> Vec<BenchmarkRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::new();
    for (index, &size) in sizes.sizes().iter().enumerate() {
        for &(prefix, class_name, factor) in &FORMATS {
            if !spec.with_snappy && prefix.ends_with("Snappy") {
                continue;
            }
            for (direction, direction_factor) in [("Write", 1.3), ("Read", 1.0)] {
                let base_ms =
                    spec.ms_per_thousand_rows * size as f64 / 1000.0 * factor * direction_factor;
                let samples_ns = (0..spec.samples_per_record)
                    .map(|_| sample_ns(&mut rng, base_ms, spec.jitter))
                    .collect();
                let name = match prefix.strip_suffix("Snappy") {
                    Some(stem) => format!("{stem}{direction}Snappy[{index}]"),
                    None => format!("{prefix}{direction}[{index}]"),
                };
                records.push(BenchmarkRecord::new(&name, class_name, samples_ns));
            }
        }
    }
    records
}

fn sample_ns(rng: &mut StdRng, base_ms: f64, jitter: f64) -> f64 {
    let spread = if jitter > 0.0 {
        rng.gen_range(-jitter..jitter)
    } else {
        0.0
    };
    (base_ms * (1.0 + spread) * 1_000_000.0).round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labeler::label_all;

    #[test]
    fn test_generated_records_all_label() {
        let sizes = SizeTable::default();
        let records = generate_records(&SyntheticSpec::default(), &sizes, 0x5EED);
        assert_eq!(records.len(), sizes.sizes().len() * 6);
        let labeled = label_all(records, &sizes).expect("label");
        assert!(labeled.iter().all(|r| r.record.len() == 50));
    }

    #[test]
    fn test_generation_is_seeded() {
        let sizes = SizeTable::default();
        let spec = SyntheticSpec::default();
        assert_eq!(
            generate_records(&spec, &sizes, 1),
            generate_records(&spec, &sizes, 1)
        );
    }
}
