use std::path::PathBuf;

use facetbench::{
    FacetBenchError, Generator, SizeTable,
    config::{CommandLineConfig, DEFAULT_INPUT, parse_sizes},
};

#[test]
fn test_defaults_without_arguments() {
    let cfg = CommandLineConfig::from_args_with_env(&["facetbench"], None).expect("config");
    assert_eq!(cfg.input, PathBuf::from(DEFAULT_INPUT));
    assert_eq!(cfg.generator, Generator::Line);
    assert_eq!(cfg.sizes, SizeTable::default());
    assert_eq!(cfg.output, None);
}

#[test]
fn test_flags_and_positional_path() {
    let cfg = CommandLineConfig::from_args_with_env(
        &[
            "facetbench",
            "--generator",
            "scalability",
            "results.json",
            "--sizes",
            "10, 20,30",
            "--output",
            "out.json",
        ],
        Some("1,2,3"),
    )
    .expect("config");
    assert_eq!(cfg.input, PathBuf::from("results.json"));
    assert_eq!(cfg.generator, Generator::Scalability);
    assert_eq!(cfg.sizes.sizes(), &[10, 20, 30]);
    assert_eq!(cfg.output, Some(PathBuf::from("out.json")));
}

#[test]
fn test_environment_sizes_apply_without_flag() {
    let cfg = CommandLineConfig::from_args_with_env(&["facetbench", "-o", "-"], Some("7,8"))
        .expect("config");
    assert_eq!(cfg.sizes.sizes(), &[7, 8]);
    assert_eq!(cfg.output, None);
}

#[test]
fn test_bad_arguments_are_invalid_input() {
    for args in [
        vec!["facetbench", "--sizes"],
        vec!["facetbench", "--bogus"],
        vec!["facetbench", "--sizes", "1,x"],
        vec!["facetbench", "--sizes", ""],
    ] {
        let err = CommandLineConfig::from_args_with_env(&args, None).unwrap_err();
        assert!(matches!(err, FacetBenchError::InvalidInput(_)), "{args:?}");
    }
    assert!(parse_sizes("0,1,2,3,4,5,6,7,8,9,10").is_err());
}
