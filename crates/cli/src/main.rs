//! `unigen`: run the model-transformation pass over a parsed API description.
//!
//! Reads the parser's JSON hand-off, applies the configured transformations
//! and writes the renderer's JSON input: transformed models and operations,
//! pass-through renderer flags and an assembly report.

#![forbid(unsafe_code)]
#![deny(warnings, unused_must_use, dead_code, missing_debug_implementations)]

use clap::{Args, Parser, Subcommand};
use console::style;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use unigen_core::{
    ApiDescription, AssemblyReport, GeneratorConfig, ModelDefinition, NamingPolicy, Operation,
    assemble,
};

#[derive(Parser, Debug)]
#[command(name = "unigen", version, about = "C#/Unity client generator model transformer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transform a parsed API description into renderer input
    Transform(TransformArgs),
}

#[derive(Args, Debug, Clone)]
struct TransformArgs {
    /// Parsed API description (JSON)
    #[arg(long, short, value_name = "FILE")]
    input: PathBuf,
    /// Generator configuration (TOML)
    #[arg(long, short, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Where to write the result; stdout when omitted
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Property naming policy: original, camelCase, PascalCase or snake_case
    #[arg(long, value_name = "POLICY")]
    naming_policy: Option<NamingPolicy>,
    /// Rewrite List<T>/Collection<T> return types to the collection view
    #[arg(long)]
    collapse_returns: bool,
    /// Report invalid validation patterns instead of failing
    #[arg(long)]
    skip_invalid_patterns: bool,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TransformOutput<'a> {
    models: BTreeMap<&'a str, &'a ModelDefinition>,
    operations: &'a [Operation],
    renderer_flags: BTreeMap<&'static str, Value>,
    report: &'a AssemblyReport,
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error" | "off"
    )
}

/// UNIGEN_LOG takes a plain level ("debug") or a full filter spec.
fn init_tracing() {
    let filter = match std::env::var("UNIGEN_LOG") {
        Ok(level) if is_plain_level(&level) => format!("unigen={level},unigen_core={level}"),
        Ok(spec) => spec,
        Err(_) => "unigen=info,unigen_core=info".to_string(),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn load_config(args: &TransformArgs) -> Result<GeneratorConfig, String> {
    let mut config = match &args.config {
        Some(path) => {
            let contents = read(path)?;
            GeneratorConfig::from_toml_str(&contents)
                .map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => GeneratorConfig::default(),
    };

    if let Some(policy) = args.naming_policy {
        config.naming_policy = policy;
    }
    if args.collapse_returns {
        config.collapse_return_to_collection_view = true;
    }
    if args.skip_invalid_patterns {
        config.skip_invalid_patterns = true;
    }
    Ok(config)
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))
}

fn transform(args: &TransformArgs) -> Result<AssemblyReport, String> {
    let config = load_config(args)?;
    debug!(naming_policy = %config.naming_policy, "Loaded configuration.");

    let contents = read(&args.input)?;
    let mut api: ApiDescription = serde_json::from_str(&contents)
        .map_err(|e| format!("Invalid API description {}: {e}", args.input.display()))?;

    let report = assemble(&mut api, &config).map_err(|e| e.to_string())?;

    let output = TransformOutput {
        models: api.models.iter().map(|(k, v)| (k.as_str(), v)).collect(),
        operations: &api.operations,
        renderer_flags: config.renderer_flags(),
        report: &report,
    };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| format!("Failed to serialize output: {e}"))?;

    match &args.output {
        Some(path) => fs::write(path, json + "\n")
            .map_err(|e| format!("Failed to write {}: {e}", path.display()))?,
        None => println!("{json}"),
    }

    Ok(report)
}

fn print_summary(report: &AssemblyReport) {
    eprintln!(
        "{} {} models ({} reconciled, {} inherited properties), {} patterns, {} collection returns",
        style("✓").green().bold(),
        report.models_processed,
        report.models_reconciled,
        report.inherited_properties,
        report.patterns_translated,
        report.returns_collapsed,
    );
    for skipped in &report.skipped_patterns {
        eprintln!(
            "{} skipped pattern on {}.{}: {}",
            style("!").yellow().bold(),
            skipped.owner,
            skipped.property,
            skipped.message
        );
    }
}

fn run(args: &TransformArgs) -> i32 {
    match transform(args) {
        Ok(report) => {
            print_summary(&report);
            0
        }
        Err(err) => {
            eprintln!("{} {err}", style("error:").red().bold());
            1
        }
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let code = match &cli.command {
        Commands::Transform(args) => run(args),
    };
    std::process::exit(code);
}
