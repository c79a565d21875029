use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use astlens::{CompileOptions, Compilation, compile};

/// Tokenize, parse and scope-check a source file, printing the results as JSON.
#[derive(Debug, Parser)]
#[command(name = "astlens", version, about, long_about = None)]
struct Cli {
    /// Source file to compile; reads stdin when omitted
    input: Option<PathBuf>,

    /// Which part of the result to print
    #[arg(short, long, value_enum, default_value_t = Emit::All)]
    emit: Emit,

    /// YAML file with compile options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print JSON on a single line
    #[arg(long)]
    compact: bool,

    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    Tokens,
    Ast,
    Diagnostics,
    Entities,
    Symbols,
    All,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(cli.verbose))),
        )
        .with_writer(io::stderr)
        .init();

    let options = match &cli.config {
        Some(path) => CompileOptions::load(path)?,
        None => CompileOptions::default(),
    };

    let source = if let Some(path) = &cli.input {
        fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?
    } else {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Reading stdin")?;
        buffer
    };

    match compile(&source, &options) {
        Ok(compilation) => {
            info!(
                nodes = compilation.node_count,
                diagnostics = compilation.diagnostics.len(),
                "compiled"
            );
            for diagnostic in &compilation.diagnostics {
                warn!("{diagnostic}");
            }
            emit(&cli, &compilation)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            info!(kind = err.kind(), "front end failed");
            print_json(&err.report(), cli.compact)?;
            Ok(ExitCode::from(1))
        }
    }
}

fn emit(cli: &Cli, compilation: &Compilation) -> Result<()> {
    match cli.emit {
        Emit::Tokens => print_json(&compilation.tokens, cli.compact),
        Emit::Ast => print_json(&compilation.program, cli.compact),
        Emit::Diagnostics => print_json(&compilation.diagnostics, cli.compact),
        Emit::Entities => print_json(&compilation.entities, cli.compact),
        Emit::Symbols => print_json(&compilation.symbols, cli.compact),
        Emit::All => print_json(compilation, cli.compact),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T, compact: bool) -> Result<()> {
    let output = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .context("Serializing output")?;
    println!("{output}");
    Ok(())
}

fn directive_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "astlens=warn",
        1 => "astlens=debug",
        _ => "astlens=trace",
    }
}
