use std::{env, path::PathBuf};

use crate::{FacetBenchError, labeler::SizeTable, plan::Generator};

pub const DEFAULT_INPUT: &str = "measurements/benchmarkData.json";
pub const SIZES_ENV: &str = "FACETBENCH_SIZES";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLineConfig {
    pub input: PathBuf,
    pub generator: Generator,
    pub sizes: SizeTable,
    /// `None` writes artifacts to stdout.
    pub output: Option<PathBuf>,
}

impl CommandLineConfig {
    pub fn from_args(args: &[&str]) -> Result<Self, FacetBenchError> {
        Self::from_args_with_env(args, env::var(SIZES_ENV).ok().as_deref())
    }

    pub fn from_args_with_env(
        args: &[&str],
        env_sizes: Option<&str>,
    ) -> Result<Self, FacetBenchError> {
        let mut input = PathBuf::from(DEFAULT_INPUT);
        let mut generator = Generator::default();
        let mut sizes = None;
        let mut output = None;
        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            match *arg {
                "--generator" => {
                    generator = next_value(&mut iter, "--generator")?.parse()?;
                }
                "--sizes" => {
                    sizes = Some(parse_sizes(next_value(&mut iter, "--sizes")?)?);
                }
                "--output" | "-o" => {
                    let value = next_value(&mut iter, "--output")?;
                    output = (value != "-").then(|| PathBuf::from(value));
                }
                other if other.starts_with('-') => {
                    return Err(FacetBenchError::invalid_input(format!(
                        "unknown flag {other}"
                    )));
                }
                path => {
                    input = PathBuf::from(path);
                }
            }
        }
        let sizes = match (sizes, env_sizes) {
            (Some(sizes), _) => sizes,
            (None, Some(raw)) => parse_sizes(raw)?,
            (None, None) => SizeTable::default(),
        };
        Ok(Self {
            input,
            generator,
            sizes,
            output,
        })
    }

    pub fn help() -> &'static str {
        "Usage: facetbench [PATH] [--generator line|stackedbar|scalability|relative] \
         [--sizes 1000,5000,...] [--output PATH|-]\n\
         The size table may also be set through FACETBENCH_SIZES.\n"
    }
}

fn next_value<'a, 'b, I>(iter: &mut I, flag: &str) -> Result<&'a str, FacetBenchError>
where
    'a: 'b,
    I: Iterator<Item = &'b &'a str>,
{
    iter.next()
        .copied()
        .ok_or_else(|| FacetBenchError::invalid_input(format!("{flag} requires a value")))
}

pub fn parse_sizes(raw: &str) -> Result<SizeTable, FacetBenchError> {
    let sizes = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u64>()
                .map_err(|e| FacetBenchError::invalid_input(format!("bad size {part}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    SizeTable::new(sizes)
}
