use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use ll1::{analyze, analyze_without_elimination, Grammar};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// `{"order": [...], "productions_set": {...}}`
    Json,
    /// One `A -> α | β` rule per line
    Notation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

/// LL(1) grammar analyzer: FIRST, FOLLOW and prediction sets
#[derive(Parser, Debug)]
#[command(name = "ll1")]
#[command(about = "Computes FIRST, FOLLOW and prediction sets of a grammar", long_about = None)]
struct Args {
    /// Grammar file, `-` or nothing to read standard input
    #[arg(value_name = "GRAMMAR")]
    input: Option<PathBuf>,

    /// Input format, inferred from the file extension when omitted
    #[arg(long, value_enum)]
    input_format: Option<InputFormat>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Analyze the grammar as given, without removing left recursion
    #[arg(long)]
    keep_left_recursion: bool,

    /// Log more (-v for debug, -vv for trace); RUST_LOG is used otherwise
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("failed to read grammar from {}", path.display())),
        _ => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read grammar from standard input")?;
            Ok(input)
        }
    }
}

fn input_format(args: &Args) -> InputFormat {
    args.input_format.unwrap_or_else(|| {
        match args.input.as_deref().and_then(Path::extension) {
            Some(extension) if extension == "json" => InputFormat::Json,
            _ => InputFormat::Notation,
        }
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose);

    let input = read_input(args.input.as_deref())?;
    let format = input_format(&args);
    info!(?format, "read grammar");

    let grammar = match format {
        InputFormat::Json => Grammar::from_json(&input),
        InputFormat::Notation => Grammar::from_notation(&input),
    }
    .context("invalid grammar")?;

    let response = if args.keep_left_recursion {
        analyze_without_elimination(grammar)
    } else {
        analyze(grammar)
    }
    .context("grammar analysis failed")?;

    match args.output {
        OutputFormat::Table => {
            println!("{}", response.grammar.definition());
            print!("{}", response.result);
        }
        OutputFormat::Json => {
            println!(
                "{}",
                response.to_json().context("failed to serialize the analysis")?
            );
        }
    }

    Ok(())
}
