//! `kpoints-generator` -- command-line front end for `kpgen-core`.
//!
//! Generates a VASP `KPOINTS` file with the Java grid generator, or checks
//! that the generator can run on this machine. Logs go to stderr; stdout
//! carries only results.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default                         | Description                        |
//! |------------------------|----------|---------------------------------|------------------------------------|
//! | `KPOINTS_RESOURCE_DIR` | no       | `java_resources` beside binary  | Holds `GridGenerator.jar` and `minDistanceCollections/` |
//! | `KPOINTS_JAVA`         | no       | `java`                          | Java launcher                      |
//! | `KPOINTS_JVM_MIN_HEAP` | no       | `512m`                          | `-Xms` value                       |
//! | `KPOINTS_JVM_MAX_HEAP` | no       | `2048m`                         | `-Xmx` value                       |
//! | `RUST_LOG`             | no       | `kpoints_generator=info,kpgen_core=info` | Log filter                |

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kpgen_core::{GenerateRequest, GeneratorConfig, KpointsGenerator, PrerequisiteCheck};

/// Filter used when `RUST_LOG` is unset. The first target is this binary's
/// crate name, so errors from `run_generate` are shown by default.
const DEFAULT_LOG_FILTER: &str = "kpoints_generator=info,kpgen_core=info";

#[derive(Debug, Parser)]
#[command(name = "kpoints-generator", version, about = "Generate VASP KPOINTS files with GridGenerator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a KPOINTS file from the POSCAR (and optional INCAR) in a directory.
    Generate {
        /// Minimum distance between real-space lattice points, in angstrom.
        #[arg(allow_negative_numbers = true)]
        mindistance: f64,

        /// Directory containing POSCAR/INCAR; the output is written here too.
        #[arg(long, short = 'd', value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Extra PRECALC directive, repeatable; written in the order given.
        #[arg(long = "param", short = 'p', value_name = "KEY=VALUE", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Name of the output file inside DIR.
        #[arg(long, short = 'o', default_value = "KPOINTS")]
        output: String,
    },

    /// Check that Java and the generator resources are available.
    Check {
        /// Print the full report as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Parse `KEY=VALUE`, splitting at the first `=` so values may contain `=`.
fn parse_param(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = GeneratorConfig::from_env();
    tracing::debug!(
        resource_dir = %config.resource_dir.display(),
        java = %config.java_command,
        "Loaded generator configuration",
    );

    match cli.command {
        Command::Generate {
            mindistance,
            dir,
            params,
            output,
        } => run_generate(config, mindistance, dir, params, output),
        Command::Check { json } => run_check(&config, json),
    }
}

fn run_generate(
    config: GeneratorConfig,
    mindistance: f64,
    dir: Option<PathBuf>,
    params: Vec<(String, String)>,
    output: String,
) -> ExitCode {
    let mut request = GenerateRequest::new(mindistance)
        .params(params)
        .output_filename(output);
    if let Some(dir) = dir {
        request = request.source_directory(dir);
    }

    match KpointsGenerator::new(config).generate(&request) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "K-points generation failed");
            ExitCode::FAILURE
        }
    }
}

fn run_check(config: &GeneratorConfig, json: bool) -> ExitCode {
    let report = PrerequisiteCheck::run(config);

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize prerequisite report");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", report.message);
    }

    if report.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_splits_at_first_equals() {
        assert_eq!(
            parse_param("INCLUDEGAMMA=AUTO"),
            Ok(("INCLUDEGAMMA".to_string(), "AUTO".to_string()))
        );
        assert_eq!(
            parse_param("HEADER=a=b"),
            Ok(("HEADER".to_string(), "a=b".to_string()))
        );
    }

    #[test]
    fn param_allows_empty_value() {
        assert_eq!(parse_param("KEY="), Ok(("KEY".to_string(), String::new())));
    }

    #[test]
    fn param_rejects_missing_separator_and_empty_key() {
        assert!(parse_param("INCLUDEGAMMA").is_err());
        assert!(parse_param("=AUTO").is_err());
    }

    #[test]
    fn default_log_filter_covers_this_binary() {
        let targets: Vec<&str> = DEFAULT_LOG_FILTER
            .split(',')
            .filter_map(|directive| directive.split('=').next())
            .collect();
        assert!(targets.contains(&env!("CARGO_CRATE_NAME")), "{targets:?}");
        assert!(targets.contains(&"kpgen_core"));
    }

    #[test]
    fn default_log_filter_parses() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_args_keep_param_order() {
        let cli = Cli::try_parse_from([
            "kpoints-generator",
            "generate",
            "55",
            "--dir",
            "example_05",
            "-p",
            "INCLUDEGAMMA=AUTO",
            "-p",
            "HEADER=SIMPLE",
        ])
        .expect("parse");

        match cli.command {
            Command::Generate {
                mindistance,
                dir,
                params,
                output,
            } => {
                assert_eq!(mindistance, 55.0);
                assert_eq!(dir, Some(PathBuf::from("example_05")));
                assert_eq!(
                    params,
                    vec![
                        ("INCLUDEGAMMA".to_string(), "AUTO".to_string()),
                        ("HEADER".to_string(), "SIMPLE".to_string()),
                    ]
                );
                assert_eq!(output, "KPOINTS");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn check_accepts_json_flag() {
        let cli = Cli::try_parse_from(["kpoints-generator", "check", "--json"]).expect("parse");
        assert!(matches!(cli.command, Command::Check { json: true }));
    }
}
