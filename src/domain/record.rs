// SPDX-License-Identifier: Apache-2.0

//! The resolved configuration record.
//!
//! A `ResolvedConfig` is built once, at most once, per resolution pass, after
//! every collector has folded its parameter's occurrences and no errors
//! remain. It is immutable from then on; its lifetime belongs to the caller.

use crate::domain::errors::Result;
use crate::domain::param_name::ParamName;
use crate::domain::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// The final value of one parameter after its collector ran.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// A single value (singleton or optional-with-value).
    One(Value),
    /// An optional parameter that received no value and has no default.
    None,
    /// An accumulating parameter's values, in encounter order.
    Many(Vec<Value>),
    /// A flag-count parameter's occurrence count.
    Count(u64),
}

/// The immutable typed record produced by a successful resolution.
///
/// Typed accessors return `None` both when the field is absent and when it
/// holds a different shape, mirroring the per-variant accessors on
/// [`Value`].
///
/// # Examples
///
/// ```
/// use layercfg::prelude::*;
/// use std::collections::BTreeMap;
///
/// let mut registry = Registry::new();
/// registry.register(Parameter::int("count").flag("--count").default_text("1"));
/// let resolver = Resolver::new(registry);
///
/// let outcome = resolver
///     .resolve(".", &[] as &[&str], &BTreeMap::new())
///     .unwrap();
/// let Outcome::Resolved(config) = outcome else { unreachable!() };
/// assert_eq!(config.get_i64("count"), Some(1));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    fields: BTreeMap<ParamName, FieldValue>,
}

impl ResolvedConfig {
    pub(crate) fn new(fields: BTreeMap<ParamName, FieldValue>) -> Self {
        ResolvedConfig { fields }
    }

    /// Returns the raw field for a parameter name, if present.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns whether a parameter resolved to an actual value.
    ///
    /// `false` for absent parameters and for optional parameters that
    /// received nothing.
    pub fn is_set(&self, name: &str) -> bool {
        !matches!(self.fields.get(name), None | Some(FieldValue::None))
    }

    /// Returns the string content of a single-valued field.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(FieldValue::One(value)) => value.as_str(),
            _ => None,
        }
    }

    /// Returns the integer content of a single-valued field.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.fields.get(name) {
            Some(FieldValue::One(value)) => value.as_int(),
            _ => None,
        }
    }

    /// Returns the float content of a single-valued field.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        match self.fields.get(name) {
            Some(FieldValue::One(value)) => value.as_float(),
            _ => None,
        }
    }

    /// Returns the boolean content of a single-valued field.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.fields.get(name) {
            Some(FieldValue::One(value)) => value.as_bool(),
            _ => None,
        }
    }

    /// Returns the path content of a single-valued field.
    pub fn get_path(&self, name: &str) -> Option<&Path> {
        match self.fields.get(name) {
            Some(FieldValue::One(value)) => value.as_path(),
            _ => None,
        }
    }

    /// Returns the occurrence count of a flag-count field.
    pub fn get_count(&self, name: &str) -> Option<u64> {
        match self.fields.get(name) {
            Some(FieldValue::Count(n)) => Some(*n),
            _ => None,
        }
    }

    /// Returns the values of an accumulating field, in encounter order.
    pub fn get_many(&self, name: &str) -> Option<&[Value]> {
        match self.fields.get(name) {
            Some(FieldValue::Many(values)) => Some(values),
            _ => None,
        }
    }

    /// Iterates over the resolved field names.
    pub fn names(&self) -> impl Iterator<Item = &ParamName> {
        self.fields.keys()
    }
}

/// A validation function invoked on the finished record.
///
/// Validators run in registration order, may not mutate the record, and
/// their errors are aggregated rather than failing fast.
pub type Validator = Box<dyn Fn(&ResolvedConfig) -> Result<()> + Send + Sync>;
