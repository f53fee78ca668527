// SPDX-License-Identifier: Apache-2.0

//! Value parser trait definition and built-in parsers.
//!
//! This module defines the `ValueParser` trait, the port through which a
//! parameter turns raw text from any source into a typed
//! [`Value`](crate::domain::Value). Built-in parsers cover the closed set of
//! value shapes; embedding applications can implement the trait for
//! domain-specific grammars (identifiers, durations, addresses).

use crate::domain::value::Value;
use std::path::PathBuf;

/// A trait for parsing raw configuration text into a typed value.
///
/// Implementations must be `Send + Sync`: a parser is shared by every source
/// adapter that binds its parameter. The error type is a plain message; the
/// caller wraps it into a grammar error tagged with the parameter and the
/// expected type name.
///
/// # Examples
///
/// ```rust
/// use layercfg::domain::Value;
/// use layercfg::ports::ValueParser;
///
/// struct PortParser;
///
/// impl ValueParser for PortParser {
///     fn parse(&self, text: &str) -> Result<Value, String> {
///         let port: u16 = text.parse().map_err(|e| format!("{e}"))?;
///         Ok(Value::Int(i64::from(port)))
///     }
///
///     fn type_name(&self) -> &'static str {
///         "port"
///     }
/// }
///
/// assert_eq!(PortParser.parse("8080").unwrap(), Value::Int(8080));
/// assert!(PortParser.parse("70000").is_err());
/// ```
pub trait ValueParser: Send + Sync {
    /// Parses raw text into a value, or returns a grammar message.
    fn parse(&self, text: &str) -> Result<Value, String>;

    /// Returns the name of the type this parser produces, used in error
    /// messages ("invalid integer value ...").
    fn type_name(&self) -> &'static str;
}

/// Accepts any text as a [`Value::Str`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StringParser;

impl ValueParser for StringParser {
    fn parse(&self, text: &str) -> Result<Value, String> {
        Ok(Value::Str(text.to_string()))
    }

    fn type_name(&self) -> &'static str {
        "string"
    }
}

/// Parses a signed decimal integer into a [`Value::Int`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IntParser;

impl ValueParser for IntParser {
    fn parse(&self, text: &str) -> Result<Value, String> {
        text.trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| e.to_string())
    }

    fn type_name(&self) -> &'static str {
        "integer"
    }
}

/// Parses a floating-point number into a [`Value::Float`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatParser;

impl ValueParser for FloatParser {
    fn parse(&self, text: &str) -> Result<Value, String> {
        text.trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| e.to_string())
    }

    fn type_name(&self) -> &'static str {
        "float"
    }
}

/// Parses a boolean into a [`Value::Bool`].
///
/// Recognizes the following spellings (case-insensitive):
/// - `true`: "true", "yes", "1", "on"
/// - `false`: "false", "no", "0", "off"
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolParser;

impl ValueParser for BoolParser {
    fn parse(&self, text: &str) -> Result<Value, String> {
        match text.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(Value::Bool(true)),
            "false" | "no" | "0" | "off" => Ok(Value::Bool(false)),
            other => Err(format!("'{other}' is not a recognized boolean")),
        }
    }

    fn type_name(&self) -> &'static str {
        "boolean"
    }
}

/// Parses a non-empty path into a [`Value::Path`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PathParser;

impl ValueParser for PathParser {
    fn parse(&self, text: &str) -> Result<Value, String> {
        if text.is_empty() {
            return Err("path must not be empty".to_string());
        }
        Ok(Value::Path(PathBuf::from(text)))
    }

    fn type_name(&self) -> &'static str {
        "path"
    }
}
