use crate::ast::Expr;

/// Top-level statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Variable binding
    ///
    /// Resolves `value` against the current bindings and stores the result
    /// under `name`, replacing any earlier binding.
    ///
    /// # Example
    /// ```text
    /// let port = 8080
    /// ```
    Let { name: String, value: Expr },

    /// Query directive
    ///
    /// Resolves the value and emits it.
    ///
    /// # Example
    /// ```text
    /// q({port => $[port]})
    /// ```
    Query(Expr),

    /// Bare expression
    ///
    /// Resolved and then discarded. Only a failed variable lookup is
    /// observable.
    Expression(Expr),
}
