//! # kanon-cli
//!
//! Command-line front end for kanon.
//!
//! `kanon check` validates a JSON or YAML document against a schema
//! descriptor; `kanon merge` deep-merges two documents.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use kanon::{SafeParseResult, SchemaLoader};
use kanon_value::{Precedence, Value, merge_values};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kanon")]
#[command(about = "Schema validation for JSON and YAML documents")]
#[command(version)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a document against a schema descriptor
    Check {
        /// Input document (JSON or YAML)
        input: PathBuf,

        /// Schema descriptor file
        #[arg(short, long)]
        schema: PathBuf,
    },

    /// Deep-merge two documents and print the result as JSON
    Merge {
        /// First document
        left: PathBuf,

        /// Second document
        right: PathBuf,

        /// Which side wins on conflicting keys
        #[arg(short, long, value_enum, default_value_t = Prefer::Left)]
        prefer: Prefer,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Prefer {
    Left,
    Right,
}

impl From<Prefer> for Precedence {
    fn from(prefer: Prefer) -> Self {
        match prefer {
            Prefer::Left => Precedence::Left,
            Prefer::Right => Precedence::Right,
        }
    }
}

fn read_document(path: &Path) -> anyhow::Result<Value> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let is_yaml = path
        .extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml");
    let value = if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML in {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON in {}", path.display()))?
    };
    Ok(value)
}

fn check(input: &Path, descriptor: &Path) -> anyhow::Result<bool> {
    info!("Validating {} against {}", input.display(), descriptor.display());
    let loader = SchemaLoader::default();
    let schema = loader
        .load_file(descriptor)
        .with_context(|| format!("failed to load schema {}", descriptor.display()))?;
    debug!(schema = %schema.tag(), "Schema loaded");

    let document = read_document(input)?;
    match schema.safe_parse(&document) {
        SafeParseResult::Success { data } => {
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(true)
        }
        SafeParseResult::Failure { error } => {
            eprintln!("error: {error}");
            Ok(false)
        }
    }
}

fn merge(left: &Path, right: &Path, prefer: Prefer) -> anyhow::Result<()> {
    info!("Merging {} and {}", left.display(), right.display());
    let left_value = read_document(left)?;
    let right_value = read_document(right)?;
    let merged = merge_values(&left_value, &right_value, prefer.into())
        .context("both documents must be objects")?;
    println!("{}", serde_json::to_string_pretty(&merged)?);
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { input, schema } => {
            if check(&input, &schema)? {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Merge { left, right, prefer } => {
            merge(&left, &right, prefer)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
