// SPDX-License-Identifier: Apache-2.0

//! Parameter name newtype for type-safe name handling.
//!
//! This module provides the `ParamName` type, a newtype wrapper around `String`
//! that prevents parameter names from being confused with other strings such as
//! flag spellings or environment variable names.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A type-safe wrapper for parameter names.
///
/// `ParamName` is the unique key under which a parameter is registered and the
/// key under which its resolved field is stored. Wrapping it keeps the API
/// self-documenting: functions that take a `ParamName` cannot accidentally be
/// handed a flag string or a file key.
///
/// # Examples
///
/// ```
/// use layercfg::domain::ParamName;
///
/// let name = ParamName::from("count");
/// assert_eq!(name.as_str(), "count");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParamName(String);

impl ParamName {
    /// Creates a new `ParamName` from a `String`.
    pub fn new(name: String) -> Self {
        ParamName(name)
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `ParamName` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for ParamName {
    fn from(s: String) -> Self {
        ParamName(s)
    }
}

impl From<&str> for ParamName {
    fn from(s: &str) -> Self {
        ParamName(s.to_string())
    }
}

impl From<ParamName> for String {
    fn from(name: ParamName) -> Self {
        name.0
    }
}

impl AsRef<str> for ParamName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ParamName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
