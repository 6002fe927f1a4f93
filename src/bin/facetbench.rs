use std::{env, fs::File, io, process};

use facetbench::{
    FacetBenchError, config::CommandLineConfig, document, pipeline, render::JsonRenderer,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", CommandLineConfig::help());
        return;
    }
    let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let config = match CommandLineConfig::from_args(&arg_refs) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };

    match run(&config) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    }
}

/// Returns `Ok(false)` when at least one record or request failed.
fn run(config: &CommandLineConfig) -> Result<bool, FacetBenchError> {
    let records = document::load_records(&config.input)?;
    let summary = match &config.output {
        Some(path) => {
            let mut renderer = JsonRenderer::new(File::create(path)?);
            pipeline::run(records, config.generator, &config.sizes, &mut renderer)
        }
        None => {
            let mut renderer = JsonRenderer::new(io::stdout().lock());
            pipeline::run(records, config.generator, &config.sizes, &mut renderer)
        }
    };
    Ok(!summary.has_failures())
}
