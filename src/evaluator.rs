use std::{collections::HashMap, io};

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    ast::{Expr, Program, Statement},
    output::Sink,
    value::Value,
};

/// Name to value bindings visible to the evaluator.
///
/// Only `let` statements change it, and the latest binding for a name wins.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Binds `name`, returning the value it replaced.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.bindings.insert(name.into(), value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Reference to a name with no current binding
    #[error("variable '{0}' is not defined")]
    UndefinedVariable(String),

    /// The sink could not write a directive's output
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Sequential tree-walking evaluator.
///
/// Statements run strictly in order against one [`Environment`]. Each
/// variable reference sees the binding current at the moment it is
/// resolved; later rebindings never reach back.
#[derive(Debug, Default)]
pub struct Evaluator {
    env: Environment,
}

impl Evaluator {
    /// Creates an evaluator with no bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an evaluator that starts from existing bindings.
    pub fn with_environment(env: Environment) -> Self {
        Evaluator { env }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn into_environment(self) -> Environment {
        self.env
    }

    /// Evaluates every statement of `program` in order, handing each
    /// directive's value to `sink` as soon as it is resolved.
    ///
    /// The first failing statement stops the run. Anything already
    /// emitted stays emitted.
    ///
    /// # Examples
    ///
    /// ```
    /// use confq::{Evaluator, Value, parse};
    ///
    /// let program = parse("let x = 1\nq($[x])\nlet x = 2\nq($[x])").unwrap();
    ///
    /// let mut emitted: Vec<Value> = Vec::new();
    /// Evaluator::new().run(&program, &mut emitted).unwrap();
    /// assert_eq!(emitted, vec![Value::Number(1), Value::Number(2)]);
    /// ```
    pub fn run<S: Sink + ?Sized>(&mut self, program: &Program, sink: &mut S) -> Result<(), EvalError> {
        for (index, stmt) in program.iter().enumerate() {
            trace!(index, "evaluating statement");
            if let Some(value) = self.eval_statement(stmt)? {
                sink.emit(&value)?;
            }
        }
        Ok(())
    }

    /// Evaluates one statement. Returns the value to emit for a `q(...)`
    /// directive and `None` for everything else.
    pub fn eval_statement(&mut self, stmt: &Statement) -> Result<Option<Value>, EvalError> {
        match stmt {
            Statement::Let { name, value } => {
                let value = self.resolve(value)?;
                debug!(name = name.as_str(), kind = value.type_name(), "bound variable");
                self.env.bind(name.clone(), value);
                Ok(None)
            }
            Statement::Query(expr) => {
                let value = self.resolve(expr)?;
                debug!(kind = value.type_name(), "emitting directive");
                Ok(Some(value))
            }
            Statement::Expression(expr) => {
                self.resolve(expr)?;
                trace!("discarded expression statement");
                Ok(None)
            }
        }
    }

    /// Resolves an expression into a value, replacing variable references
    /// with their current bindings. Dictionary entries are resolved in
    /// source order.
    pub fn resolve(&self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::String(s) => Ok(Value::String(s.clone())),
            Expr::VarRef(name) => self
                .env
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),
            Expr::Dict(entries) => {
                let mut resolved = IndexMap::with_capacity(entries.len());
                for (key, value) in entries {
                    resolved.insert(key.clone(), self.resolve(value)?);
                }
                Ok(Value::Dict(resolved))
            }
        }
    }
}
