use clap::{Parser, ValueEnum};
use nagare::prelude::*;
use std::fs;
use std::time::Instant;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

/// What to print once the workflow compiled.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Output {
    /// Only report whether the file is valid
    Check,
    /// Print the resolved document as JSON
    Json,
    /// Print the canonical source text
    Fmt,
}

/// Compiles workflow definition files into positioned dependency graphs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the workflow source file
    workflow_path: String,

    /// Path to the action catalog JSON file
    #[arg(short, long)]
    catalog: String,

    /// Optional path to a card geometry JSON file
    #[arg(short, long)]
    layout: Option<String>,

    /// What to print on success
    #[arg(short, long, value_enum, default_value = "check")]
    output: Output,

    /// Increase log verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let start = Instant::now();

    let catalog = ActionCatalog::from_file(&cli.catalog)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load catalog: {}", e)));
    info!(actions = catalog.len(), path = %cli.catalog, "Loaded action catalog");

    let layout = match &cli.layout {
        Some(path) => {
            let json = fs::read_to_string(path)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to read layout file: {}", e)));
            LayoutConfig::from_json(&json)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse layout JSON: {}", e)))
        }
        None => LayoutConfig::default(),
    };

    let text = fs::read_to_string(&cli.workflow_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read workflow file: {}", e)));

    let ast = nagare::parser::parse_source(Source::named(cli.workflow_path.as_str(), text))
        .unwrap_or_else(|e| exit_with_diagnostic(&WorkflowError::from(e)));
    let document = Transformer::builder(&catalog)
        .with_layout(layout)
        .build()
        .transform(&ast)
        .unwrap_or_else(|e| exit_with_diagnostic(&WorkflowError::from(e)));
    info!(nodes = document.len(), elapsed = ?start.elapsed(), "Compiled workflow");

    match cli.output {
        Output::Check => println!("{}: ok ({} nodes)", cli.workflow_path, document.len()),
        Output::Json => {
            let json = serde_json::to_string_pretty(&document)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode document: {}", e)));
            println!("{}", json);
        }
        Output::Fmt => print!("{}", serialize(&document)),
    }
}

/// Prints the error with the offending source line underlined.
fn exit_with_diagnostic(error: &WorkflowError) -> ! {
    eprintln!("\nError: {}", error);
    if let Some(loc) = error.loc() {
        if let Some(line) = loc.source.line(loc.start.line) {
            let width = if loc.end.line == loc.start.line {
                loc.end.column.saturating_sub(loc.start.column).max(1)
            } else {
                1
            };
            eprintln!("  {}", line);
            eprintln!("  {}{}", " ".repeat(loc.start.column.saturating_sub(1)), "^".repeat(width));
        }
    }
    std::process::exit(1);
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
