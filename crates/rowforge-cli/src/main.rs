mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use logging::{LogFormat, init_logging};
use rowforge_core::compile_entity;
use rowforge_generate::{GenerateOptions, GenerationEngine, GenerationError, ValueSpec};
use rowforge_plan::{PlanError, config_json_schema, load_config, validate_config};
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("config error: {0}")]
    Plan(#[from] PlanError),
    #[error("schema error: {0}")]
    Schema(#[from] rowforge_core::Error),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(name = "rowforge", version, about = "Synthetic parent/child CSV generator")]
struct Cli {
    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate parent and child CSV files.
    Generate(GenerateArgs),
    /// Validate a configuration and compile its models without generating.
    Check(CheckArgs),
    /// Print the JSON Schema of the configuration file.
    Schema,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Configuration file (.yml, .yaml, .json or .toml).
    #[arg(long, value_name = "PATH")]
    config: PathBuf,
    /// Directory output files are written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    /// Seed override for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Optional path for the JSON run report.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
    /// End of the timestamp window (`YYYY-MM-DD HH:MM:SS`, UTC); defaults to now.
    #[arg(long, value_name = "TIME", value_parser = parse_reference_time)]
    reference_time: Option<NaiveDateTime>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Configuration file (.yml, .yaml, .json or .toml).
    #[arg(long, value_name = "PATH")]
    config: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.log_format) {
        eprintln!("{}", CliError::Logging(err));
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Check(args) => run_check(&args.config),
        Command::Schema => print_schema(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let GenerateArgs {
        config,
        out_dir,
        seed,
        report,
        reference_time,
    } = args;

    let config = load_config(&config)?;
    let options = GenerateOptions {
        out_dir,
        seed,
        reference_time,
        report_path: report,
    };
    let result = GenerationEngine::new(options).run(&config)?;

    for entity in &result.report.entities {
        println!(
            "{} ({}): {} rows -> {}",
            entity.entity,
            entity.role,
            entity.rows_generated,
            entity.output_file.display()
        );
    }
    println!("seed: {}", result.report.seed);
    println!("reference time: {}", result.report.reference_time);
    Ok(())
}

fn parse_reference_time(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|err| format!("expected YYYY-MM-DD HH:MM:SS: {err}"))
}

fn run_check(path: &Path) -> Result<(), CliError> {
    let config = load_config(path)?;
    let report = validate_config(&config);

    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    for issue in &report.errors {
        println!("error: {issue}");
    }
    if !report.is_ok() {
        return Err(CliError::InvalidConfig(format!(
            "{} error(s) in {}",
            report.errors.len(),
            path.display()
        )));
    }

    for (entity, fields) in &config.models {
        if !config.config.contains_key(entity) {
            continue;
        }
        let schema = compile_entity(entity, fields)?;
        for field in &schema.fields {
            ValueSpec::compile(&schema.name, field)?;
        }
        println!("{entity}: {} field(s) ok", schema.fields.len());
    }
    println!("config ok: {}", path.display());
    Ok(())
}

fn print_schema() -> Result<(), CliError> {
    let schema = config_json_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
