use approx::assert_relative_eq;
use facetbench::{
    BenchmarkRecord, FacetBenchError, LabeledRecord, SizeTable,
    compare::{EXTRAPOLATION_FACTOR, MIN_SAMPLES, Z_99, bar_total, compare_group, compare_groups},
    stats,
};

fn labeled(name: &str, class_name: &str, samples_ms: Vec<f64>) -> LabeledRecord {
    let samples_ns = samples_ms.iter().map(|ms| ms * 1_000_000.0).collect();
    LabeledRecord::new(
        BenchmarkRecord::new(name, class_name, samples_ns),
        &SizeTable::default(),
    )
    .expect("label")
}

fn wobble(base: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| base + ((i * 7) % 5) as f64 * 0.25).collect()
}

struct Pair {
    csv: LabeledRecord,
    parquet: LabeledRecord,
}

fn pair(index: usize, csv_ms: f64, parquet_ms: f64, count: usize) -> Pair {
    Pair {
        csv: labeled(&format!("csvRead[{index}]"), "CsvBenchmark", wobble(csv_ms, count)),
        parquet: labeled(
            &format!("parquetRead[{index}]"),
            "ParquetBenchmark",
            wobble(parquet_ms, count),
        ),
    }
}

#[test]
fn test_equal_means_give_unit_ratio() {
    let same = wobble(12.0, 40);
    let a = labeled("csvRead[0]", "CsvBenchmark", same.clone());
    let b = labeled("parquetRead[0]", "ParquetBenchmark", same);
    let est = compare_group(&vec![vec![&a], vec![&b]]).expect("compare");
    assert_eq!(est.diff_mean, 0.0);
    assert_eq!(est.ratio_mean, 1.0);
    assert!(est.ratio_error_margin > 0.0);
}

#[test]
fn test_ratio_uses_concatenated_bar_samples() {
    let read = labeled("csvRead[0]", "CsvBenchmark", wobble(10.0, 20));
    let write = labeled("csvWrite[0]", "CsvBenchmark", wobble(30.0, 20));
    let pq_read = labeled("parquetRead[0]", "ParquetBenchmark", wobble(5.0, 20));
    let pq_write = labeled("parquetWrite[0]", "ParquetBenchmark", wobble(15.0, 20));
    let group = vec![vec![&read, &write], vec![&pq_read, &pq_write]];

    let bar0 = bar_total(&group[0]);
    let bar1 = bar_total(&group[1]);
    assert_eq!(bar0.len(), 40);

    let est = compare_group(&group).expect("compare");
    let mean0 = stats::mean(&bar0).unwrap();
    let mean1 = stats::mean(&bar1).unwrap();
    let se = (stats::variance(&bar0).unwrap() / 40.0 + stats::variance(&bar1).unwrap() / 40.0).sqrt();
    assert_eq!((est.n0, est.n1), (40, 40));
    assert_relative_eq!(est.diff_mean, mean0 - mean1, max_relative = 1e-12);
    assert_relative_eq!(est.diff_std_error, se, max_relative = 1e-12);
    assert_relative_eq!(est.ratio_mean, 1.0 + (mean0 - mean1) / mean1, max_relative = 1e-12);
    assert_relative_eq!(est.ratio_error_margin, Z_99 * se / mean1, max_relative = 1e-9);
    assert_relative_eq!(est.z_score, (mean0 - mean1) / se, max_relative = 1e-9);
}

#[test]
fn test_small_bar_is_insufficient_data() {
    let big = labeled("csvRead[0]", "CsvBenchmark", wobble(10.0, 40));
    let small = labeled("parquetRead[0]", "ParquetBenchmark", wobble(10.0, 12));
    let err = compare_group(&vec![vec![&big], vec![&small]]).unwrap_err();
    assert_eq!(err, FacetBenchError::insufficient_data(12, MIN_SAMPLES));
    assert!(err.is_statistical());

    let err = compare_group(&vec![vec![&small], vec![&big]]).unwrap_err();
    assert_eq!(err, FacetBenchError::insufficient_data(12, MIN_SAMPLES));
}

#[test]
fn test_three_bars_is_arity_error() {
    let a = labeled("csvRead[0]", "CsvBenchmark", wobble(10.0, 40));
    let err = compare_group(&vec![vec![&a], vec![&a], vec![&a]]).unwrap_err();
    assert_eq!(err, FacetBenchError::arity(2, 3));
}

#[test]
fn test_undersized_index_does_not_block_siblings() {
    let p0 = pair(0, 10.0, 5.0, 40);
    let p1 = pair(1, 20.0, 9.0, 10);
    let p2 = pair(2, 30.0, 12.0, 40);
    let p3 = pair(3, 40.0, 15.0, 40);
    let p4 = pair(4, 50.0, 17.0, 40);
    let pairs = [&p0, &p1, &p2, &p3, &p4];
    let groups: Vec<_> = pairs
        .iter()
        .map(|p| vec![vec![&p.csv], vec![&p.parquet]])
        .collect();
    let indices = [1000.0, 5000.0, 10000.0, 15000.0, 20000.0];

    let report = compare_groups(&groups, &indices).expect("report");
    assert_eq!(report.points.len(), 5);
    assert!(matches!(
        report.points[1].estimate,
        Err(FacetBenchError::InsufficientData { have: 10, needed: 30 })
    ));
    assert_eq!(report.valid_points().count(), 4);

    let fit = report.trend.as_ref().expect("trend");
    assert!(fit.r_squared <= 1.0);
    let last = fit.curve.last().expect("curve");
    assert_relative_eq!(last.x, 20000.0 * EXTRAPOLATION_FACTOR);
    assert_relative_eq!(last.y, fit.evaluate(last.x));
    assert_eq!(fit.curve.len(), 5);
}

#[test]
fn test_three_indices_fit_passes_through_points() {
    let p0 = pair(0, 10.0, 5.0, 40);
    let p1 = pair(1, 20.0, 8.0, 40);
    let p2 = pair(2, 30.0, 10.0, 40);
    let groups = vec![
        vec![vec![&p0.csv], vec![&p0.parquet]],
        vec![vec![&p1.csv], vec![&p1.parquet]],
        vec![vec![&p2.csv], vec![&p2.parquet]],
    ];
    let report = compare_groups(&groups, &[1000.0, 5000.0, 10000.0]).expect("report");
    let fit = report.trend.expect("trend");
    for (index, est) in report
        .points
        .iter()
        .map(|p| (p.index, p.estimate.as_ref().expect("estimate")))
    {
        assert_relative_eq!(fit.evaluate(index), est.ratio_mean, max_relative = 1e-8);
    }
    assert_relative_eq!(fit.r_squared, 1.0, epsilon = 1e-8);
}

#[test]
fn test_two_indices_fail_fit_but_keep_ratios() {
    let p0 = pair(0, 10.0, 5.0, 40);
    let p1 = pair(1, 20.0, 8.0, 40);
    let groups = vec![
        vec![vec![&p0.csv], vec![&p0.parquet]],
        vec![vec![&p1.csv], vec![&p1.parquet]],
    ];
    let report = compare_groups(&groups, &[1000.0, 5000.0]).expect("report");
    assert!(matches!(report.trend, Err(FacetBenchError::FitFailure { .. })));
    assert_eq!(report.valid_points().count(), 2);
}

#[test]
fn test_index_count_must_match_groups() {
    let p0 = pair(0, 10.0, 5.0, 40);
    let groups = vec![vec![vec![&p0.csv], vec![&p0.parquet]]];
    let err = compare_groups(&groups, &[1000.0, 5000.0]).unwrap_err();
    assert_eq!(err, FacetBenchError::label_count("group index", 1, 2));
}
