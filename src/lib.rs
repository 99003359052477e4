pub mod ast;
pub mod cli;
pub mod evaluator;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod value;

pub use ast::{Expr, Program, Statement};
pub use cli::{CliError, RunOptions, RunOutcome};
pub use evaluator::{Environment, EvalError, Evaluator};
pub use lexer::{Position, Scanner, SyntaxError, SyntaxErrorKind};
pub use output::{OutputFormat, Sink, WriterSink, to_json_pretty, to_yaml};
pub use parser::{Parser, parse};
pub use value::Value;
