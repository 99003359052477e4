//! Run confq programs from files or strings

use std::{fs, io, path::Path, path::PathBuf};

use tracing::{debug, info};

use super::CliError;
use crate::{Evaluator, OutputFormat, Sink, parse};

/// Options for a run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// The source file to run
    pub path: PathBuf,
    /// How emitted values are rendered
    pub format: OutputFormat,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
}

/// Result of a successful run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Syntax validation passed
    SyntaxValid,
    /// Every statement was evaluated
    Completed {
        statements: usize,
        directives: usize,
    },
}

/// Read a source file, distinguishing a missing file from other failures.
pub fn read_source(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => CliError::NotFound {
            path: path.to_path_buf(),
        },
        _ => CliError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Execute the file named by `options`, sending directive output to `sink`.
pub fn execute<S: Sink + ?Sized>(options: &RunOptions, sink: &mut S) -> Result<RunOutcome, CliError> {
    let source = read_source(&options.path)?;
    info!(path = %options.path.display(), bytes = source.len(), "read source");

    if options.syntax_only {
        parse(&source)?;
        return Ok(RunOutcome::SyntaxValid);
    }

    execute_source(&source, sink)
}

/// Parse all of `source`, then evaluate all of it.
///
/// A syntax error anywhere means nothing is evaluated and nothing reaches
/// `sink`. An evaluation error stops at the failing statement; values
/// already sent to `sink` remain there.
pub fn execute_source<S: Sink + ?Sized>(source: &str, sink: &mut S) -> Result<RunOutcome, CliError> {
    let program = parse(source)?;
    debug!(directives = program.query_count(), "evaluating program");

    let mut evaluator = Evaluator::new();
    evaluator.run(&program, sink)?;

    Ok(RunOutcome::Completed {
        statements: program.len(),
        directives: program.query_count(),
    })
}
