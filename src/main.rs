use std::{io, path::PathBuf};

use clap::{Parser as ClapParser, error::ErrorKind};
use confq::cli::{self, CliError, RunOptions, RunOutcome};
use confq::{OutputFormat, WriterSink};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "confq")]
#[command(about = "confq - evaluate a configuration program and print every q(...) directive")]
#[command(version)]
struct Cli {
    /// Path to the program to run
    file: PathBuf,

    /// Output format for emitted values
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    format: OutputFormat,

    /// Only validate syntax, don't evaluate
    #[arg(long)]
    check: bool,
}

fn main() {
    // Diagnostics go to stderr; stdout carries program output only
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    if let Err(e) = parse_args().and_then(run) {
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}

fn parse_args() -> Result<Cli, CliError> {
    match Cli::try_parse() {
        Ok(cli) => Ok(cli),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => Err(CliError::Usage(e.render().to_string().trim_end().to_string())),
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let options = RunOptions {
        path: cli.file,
        format: cli.format,
        syntax_only: cli.check,
    };

    let mut sink = WriterSink::new(io::stdout().lock(), options.format);
    let outcome = cli::execute(&options, &mut sink)?;
    drop(sink);

    match outcome {
        RunOutcome::SyntaxValid => println!("Syntax is valid"),
        RunOutcome::Completed { statements, directives } => {
            tracing::debug!(statements, directives, "run complete");
        }
    }
    Ok(())
}
