// SPDX-License-Identifier: Apache-2.0

//! Error types for the resolution engine.
//!
//! Errors here are deliberately *collected*, not thrown: every leaf failure is
//! a [`ConfigError`] carrying a growable [`ErrorContext`], and independent
//! failures are merged into a non-empty [`AggregateError`] at each boundary
//! where the caller needs a final verdict. The only hard failures in the
//! crate are registration-time assertions and unparseable defaults, both of
//! which indicate a broken schema rather than bad user input.

use crate::domain::param::SpecialAction;
use crate::domain::param_name::ParamName;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The kind of a leaf configuration failure.
///
/// Each variant corresponds to one of the independent ways a source event or
/// the finalizer can fail. The enum is `#[non_exhaustive]` to allow future
/// additions without breaking embedders that match on it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A raw text value did not match its parameter's grammar.
    #[error("invalid {expected} value '{value}': {message}")]
    Grammar {
        /// The raw text that failed to parse.
        value: String,
        /// The type name the parser expected.
        expected: &'static str,
        /// The parser's own description of the failure.
        message: String,
    },

    /// A flag that needs an argument was the last token on the line.
    #[error("flag '{flag}' requires a value")]
    MissingValue {
        /// The flag that was missing its value.
        flag: String,
    },

    /// A leading-dash token matched no registered flag.
    #[error("unknown flag '{token}'")]
    UnknownFlag {
        /// The unrecognized token.
        token: String,
    },

    /// A positional token arrived after every positional parameter was consumed.
    #[error("unexpected argument '{token}'")]
    UnknownArgument {
        /// The token that had no positional parameter left to bind to.
        token: String,
    },

    /// A strict file section contained a key that is not registered for it.
    #[error("unknown key '{key}'")]
    UnknownKey {
        /// The unrecognized key.
        key: String,
    },

    /// A file contained a section name that is not registered at all.
    #[error("unknown section '{section}'")]
    UnknownSection {
        /// The unrecognized section name.
        section: String,
    },

    /// A line in a configuration file matched neither a section header nor a
    /// key/value assignment.
    #[error("malformed line {line}: '{text}'")]
    Syntax {
        /// One-based line number within the file.
        line: usize,
        /// The offending line, trimmed.
        text: String,
    },

    /// A collector saw the wrong number of occurrences for a parameter.
    #[error("expected {expected} value, found {found}")]
    Multiplicity {
        /// A description of the accepted count ("exactly one", "at most one").
        expected: &'static str,
        /// The number of occurrences actually collected across all sources.
        found: usize,
    },

    /// A queued configuration file does not exist, is not a regular file, or
    /// could not be read. Fatal for that file only.
    #[error("cannot read configuration file: {message}")]
    FilePrecondition {
        /// A description of the I/O precondition that failed.
        message: String,
    },

    /// Two different special actions were requested in one invocation.
    #[error("conflicting actions: '{held}' was already requested, then '{requested}'")]
    SpecialActionConflict {
        /// The action that was raised first.
        held: SpecialAction,
        /// The action that arrived second.
        requested: SpecialAction,
    },

    /// A registered validator rejected the resolved configuration.
    #[error("{message}")]
    Validation {
        /// The validator's description of the problem.
        message: String,
    },
}

/// The origin tags attached to an error as it bubbles up.
///
/// Tags are *growable*: each merge point fills in whatever it knows, and a
/// tag that is already present is never overwritten, so the innermost
/// (most precise) origin wins.
#[derive(Clone, Debug, Default)]
pub struct ErrorContext {
    /// The parameter the failing value belongs to.
    pub param: Option<ParamName>,
    /// The CLI flag that introduced the failing value.
    pub flag: Option<String>,
    /// The environment variable that introduced the failing value.
    pub env_var: Option<String>,
    /// The configuration file the failing value was read from.
    pub file: Option<PathBuf>,
    /// The file section the failing value was read from.
    pub section: Option<String>,
}

impl ErrorContext {
    /// Returns `true` when no tag has been attached yet.
    pub fn is_empty(&self) -> bool {
        self.param.is_none()
            && self.flag.is_none()
            && self.env_var.is_none()
            && self.file.is_none()
            && self.section.is_none()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let mut tags = Vec::new();
        if let Some(param) = &self.param {
            tags.push(format!("parameter '{param}'"));
        }
        if let Some(flag) = &self.flag {
            tags.push(format!("flag '{flag}'"));
        }
        if let Some(var) = &self.env_var {
            tags.push(format!("env '{var}'"));
        }
        if let Some(section) = &self.section {
            tags.push(format!("section '{section}'"));
        }
        if let Some(file) = &self.file {
            tags.push(format!("file '{}'", file.display()));
        }
        write!(f, " ({})", tags.join(", "))
    }
}

/// A single context-tagged configuration error.
///
/// # Examples
///
/// ```
/// use layercfg::domain::{ConfigError, ErrorKind};
///
/// let error = ConfigError::new(ErrorKind::UnknownKey { key: "prot".into() })
///     .with_section("server");
/// assert_eq!(error.to_string(), "unknown key 'prot' (section 'server')");
/// ```
#[derive(Debug, Error)]
#[error("{kind}{context}")]
pub struct ConfigError {
    kind: ErrorKind,
    context: ErrorContext,
}

impl ConfigError {
    /// Creates an error with no context tags yet.
    pub fn new(kind: ErrorKind) -> Self {
        ConfigError {
            kind,
            context: ErrorContext::default(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the origin tags attached so far.
    pub fn context(&self) -> &ErrorContext {
        &self.context
    }

    /// Tags this error with the parameter it belongs to, unless already tagged.
    pub fn with_param(mut self, name: &ParamName) -> Self {
        self.context.param.get_or_insert_with(|| name.clone());
        self
    }

    /// Tags this error with the CLI flag it came from, unless already tagged.
    pub fn with_flag(mut self, flag: &str) -> Self {
        self.context.flag.get_or_insert_with(|| flag.to_string());
        self
    }

    /// Tags this error with the environment variable it came from, unless
    /// already tagged.
    pub fn with_env_var(mut self, var: &str) -> Self {
        self.context.env_var.get_or_insert_with(|| var.to_string());
        self
    }

    /// Tags this error with the configuration file it came from, unless
    /// already tagged.
    pub fn with_file(mut self, path: &Path) -> Self {
        self.context.file.get_or_insert_with(|| path.to_path_buf());
        self
    }

    /// Tags this error with the file section it came from, unless already
    /// tagged.
    pub fn with_section(mut self, section: &str) -> Self {
        self.context
            .section
            .get_or_insert_with(|| section.to_string());
        self
    }
}

/// A non-empty collection of independently discovered errors.
///
/// Aggregates are built at merge points (one file, one source pass, the
/// finalizer) so that the caller receives every problem found in a single
/// resolution attempt rather than one at a time.
#[derive(Debug)]
pub struct AggregateError {
    errors: Vec<ConfigError>,
}

impl AggregateError {
    /// Wraps a list of errors, returning `None` when the list is empty.
    ///
    /// The `Option` keeps the non-emptiness invariant at the type level: an
    /// `AggregateError` that exists always contains at least one error.
    pub fn from_errors(errors: Vec<ConfigError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(AggregateError { errors })
        }
    }

    /// Returns the collected errors, in discovery order.
    pub fn errors(&self) -> &[ConfigError] {
        &self.errors
    }

    /// Returns the number of collected errors. Always at least one.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always `false`; provided for clippy's sake alongside [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Consumes the aggregate and returns the underlying errors.
    pub fn into_errors(self) -> Vec<ConfigError> {
        self.errors
    }

    /// Splices earlier-discovered errors in front of this aggregate's own.
    pub(crate) fn prepend(&mut self, mut earlier: Vec<ConfigError>) {
        earlier.append(&mut self.errors);
        self.errors = earlier;
    }
}

impl From<ConfigError> for AggregateError {
    fn from(error: ConfigError) -> Self {
        AggregateError {
            errors: vec![error],
        }
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} configuration error(s):", self.errors.len())?;
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {}

impl IntoIterator for AggregateError {
    type Item = ConfigError;
    type IntoIter = std::vec::IntoIter<ConfigError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// A specialized `Result` type for single-error operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
