use indexmap::IndexMap;

/// A value expression.
///
/// Note that `PartialEq` on [`Expr::Dict`] compares entries regardless of
/// their order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Unsigned integer literal
    ///
    /// # Example
    /// ```text
    /// 42
    /// ```
    Number(u64),

    /// String literal. Escape sequences are kept exactly as written, so the
    /// source `"a\"b"` holds the four characters `a`, `\`, `"`, `b`.
    String(String),

    /// Dictionary literal, in source order. A repeated key replaces the
    /// earlier entry's value and keeps the earlier entry's position.
    ///
    /// # Example
    /// ```text
    /// {host => "localhost", port => $[port]}
    /// ```
    Dict(IndexMap<String, Expr>),

    /// Variable reference (`$[name]`)
    VarRef(String),
}
