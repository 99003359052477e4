use indexmap::IndexMap;

/// A runtime value produced by resolving an [`Expr`](crate::ast::Expr).
///
/// Values are immutable once produced. Dictionaries keep their entries in
/// source order.
///
/// # Examples
///
/// ```
/// use confq::Value;
/// use indexmap::IndexMap;
///
/// let port = Value::Number(8080);
/// let host = Value::String("localhost".to_string());
///
/// let mut server = IndexMap::new();
/// server.insert("host".to_string(), host);
/// server.insert("port".to_string(), port);
/// let server = Value::Dict(server);
///
/// assert_eq!(server.type_name(), "dict");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Unsigned integer
    Number(u64),

    /// Text, with escape sequences as written in the source
    String(String),

    /// Ordered mapping from identifier to value
    Dict(IndexMap<String, Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Dict(_) => "dict",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Dict(entries) => Some(entries),
            _ => None,
        }
    }
}
