//! Output serialization for emitted values.
//!
//! This module renders the values produced by `q(...)` directives:
//!
//! - **Block mapping** via [`to_yaml()`] - scalars as plain text, dictionaries
//!   as one `key: value` line per entry with nested dictionaries indented.
//!   Never uses inline `{...}` rendering except for an empty dictionary,
//!   which has no block form.
//! - **JSON** via [`to_json_pretty()`] - 2-space indentation, key order kept.
//!
//! Entries are always written in insertion order, never sorted.
//!
//! # Examples
//!
//! ```
//! use confq::Value;
//! use confq::output::to_yaml;
//! use indexmap::IndexMap;
//!
//! let mut inner = IndexMap::new();
//! inner.insert("port".to_string(), Value::Number(8080));
//!
//! let mut outer = IndexMap::new();
//! outer.insert("name".to_string(), Value::String("api".to_string()));
//! outer.insert("server".to_string(), Value::Dict(inner));
//!
//! assert_eq!(to_yaml(&Value::Number(42)), "42");
//! assert_eq!(to_yaml(&Value::Dict(outer)), "name: api\nserver:\n  port: 8080");
//! ```

use std::io::{self, Write};
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::value::Value;

/// Plain scalars that a YAML 1.1 reader would take for a number, a
/// timestamp or a special float.
static NUMERIC_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        \A(?:
            [-+]?0b[01_]+
          | [-+]?0o?[0-7_]+
          | [-+]?(?:0|[1-9][0-9_]*)
          | [-+]?0x[0-9a-fA-F_]+
          | [-+]?[0-9][0-9_]*(?::[0-5]?[0-9])+(?:\.[0-9_]*)?
          | [-+]?[0-9][0-9_]*\.[0-9_]*(?:[eE][-+][0-9]+)?
          | \.[0-9][0-9_]*(?:[eE][-+][0-9]+)?
          | [-+]?\.(?:inf|Inf|INF)
          | \.(?:nan|NaN|NAN)
          | [0-9]{4}-[0-9]{1,2}-[0-9]{1,2}.*
        )\z",
    )
    .expect("numeric scalar pattern is a valid regular expression")
});

/// Plain scalars that read back as booleans, null or the value key.
const RESERVED_WORDS: &[&str] = &[
    "null", "Null", "NULL", "~", "true", "True", "TRUE", "false", "False", "FALSE", "yes", "Yes",
    "YES", "no", "No", "NO", "on", "On", "ON", "off", "Off", "OFF", "=",
];

/// Characters that may not start a plain scalar.
const INDICATORS: &[char] = &[
    ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@', '`',
];

/// Characters that only act as indicators at the start of a scalar when
/// followed by whitespace or nothing.
const SPACED_INDICATORS: &[char] = &['-', '?', ':'];

/// Output format for emitted values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// Block-style mapping
    #[default]
    Yaml,
    /// Pretty-printed JSON
    Json,
}

impl OutputFormat {
    pub fn render(self, value: &Value) -> String {
        match self {
            OutputFormat::Yaml => to_yaml(value),
            OutputFormat::Json => to_json_pretty(value),
        }
    }
}

/// Receives the value of every directive, in evaluation order.
pub trait Sink {
    fn emit(&mut self, value: &Value) -> io::Result<()>;
}

/// Collects emitted values in memory.
impl Sink for Vec<Value> {
    fn emit(&mut self, value: &Value) -> io::Result<()> {
        self.push(value.clone());
        Ok(())
    }
}

/// Serializes each emitted value to a writer, flushing after every
/// directive so that output already produced survives a later failure.
pub struct WriterSink<W: Write> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        WriterSink { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn emit(&mut self, value: &Value) -> io::Result<()> {
        writeln!(self.writer, "{}", self.format.render(value))?;
        self.writer.flush()
    }
}

/// Block-style printer.
pub struct BlockPrinter {
    indent_width: usize,
}

impl Default for BlockPrinter {
    fn default() -> Self {
        BlockPrinter { indent_width: 2 }
    }
}

impl BlockPrinter {
    pub fn new(indent_width: usize) -> Self {
        BlockPrinter { indent_width }
    }

    /// Renders `value` with trailing whitespace trimmed.
    pub fn print(&self, value: &Value) -> String {
        let mut out = String::new();
        match value {
            Value::Dict(entries) if !entries.is_empty() => self.print_mapping(&mut out, entries, 0),
            scalar => self.print_inline(&mut out, scalar),
        }
        out.truncate(out.trim_end().len());
        out
    }

    /// Scalars, and the empty dictionary.
    fn print_inline(&self, out: &mut String, value: &Value) {
        match value {
            Value::Number(n) => out.push_str(&n.to_string()),
            Value::String(s) => out.push_str(&quote_scalar(s)),
            Value::Dict(_) => out.push_str("{}"),
        }
    }

    fn print_mapping(&self, out: &mut String, entries: &IndexMap<String, Value>, level: usize) {
        for (key, value) in entries {
            out.push_str(&" ".repeat(level * self.indent_width));
            out.push_str(&quote_scalar(key));
            out.push(':');

            match value {
                Value::Dict(inner) if !inner.is_empty() => {
                    out.push('\n');
                    self.print_mapping(out, inner, level + 1);
                }
                other => {
                    out.push(' ');
                    self.print_inline(out, other);
                    out.push('\n');
                }
            }
        }
    }
}

/// Writes `s` as a plain scalar when that reads back as the same string,
/// single-quoted when it would not, and double-quoted with escapes when it
/// holds control characters.
fn quote_scalar(s: &str) -> String {
    if s.chars().any(char::is_control) {
        return double_quoted(s);
    }
    if needs_quotes(s) {
        return format!("'{}'", s.replace('\'', "''"));
    }
    s.to_string()
}

fn needs_quotes(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return true;
    };
    let spaced = chars.next().is_none_or(char::is_whitespace);

    INDICATORS.contains(&first)
        || (spaced && SPACED_INDICATORS.contains(&first))
        || s.starts_with(char::is_whitespace)
        || s.ends_with(char::is_whitespace)
        || s.ends_with(':')
        || s.contains(": ")
        || s.contains(" #")
        || RESERVED_WORDS.contains(&s)
        || NUMERIC_LIKE.is_match(s)
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\x{:02X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Converts a value to a `serde_json::Value`, keeping dictionary order.
pub fn to_json_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Number(n) => serde_json::Value::Number((*n).into()),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Dict(entries) => serde_json::Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), to_json_value(v)))
                .collect(),
        ),
    }
}

/// Renders a value as block-style YAML.
pub fn to_yaml(value: &Value) -> String {
    BlockPrinter::default().print(value)
}

/// Renders a value as pretty-printed JSON.
pub fn to_json_pretty(value: &Value) -> String {
    format!("{:#}", to_json_value(value))
}
