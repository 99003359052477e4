//! # Abstract Syntax Tree
//!
//! A program is a flat sequence of top-level statements:
//!
//! ```text
//! let port = 8080
//! let server = {host => "localhost", port => $[port]}
//! q($[server])
//! ```
//!
//! - **[expressions]** - value expressions (numbers, strings, dictionaries,
//!   variable references)
//! - **[statements]** - `let` bindings, `q(...)` directives and bare
//!   expression statements
//! - **[program]** - the complete, parsed statement list
//!
//! The tree is only ever built in full: a program that fails to parse has
//! no AST at all.
pub mod expressions;
pub mod program;
pub mod statements;

pub use expressions::Expr;
pub use program::Program;
pub use statements::Statement;
