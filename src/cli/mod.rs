//! CLI support for confq
//!
//! Provides programmatic access to the `confq` command for embedding in
//! other tools: read a file, parse all of it, then evaluate all of it.

mod run;

pub use run::{RunOptions, RunOutcome, execute, execute_source, read_source};

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::{EvalError, SyntaxError};

/// Errors that end a `confq` run. Every one maps to exit code 1.
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad command-line invocation; holds the rendered usage message
    #[error("{0}")]
    Usage(String),

    /// The source file does not exist
    #[error("Error: file '{}' not found", .path.display())]
    NotFound { path: PathBuf },

    /// The source file exists but could not be read
    #[error("Error reading file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The program failed to parse; nothing was evaluated
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// A statement failed to evaluate; earlier output stands
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        1
    }
}
