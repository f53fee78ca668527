// SPDX-License-Identifier: Apache-2.0

//! The mutable accumulator threaded through one resolution pass.
//!
//! `ResolutionState` is exclusively owned by the call stack executing the
//! pass: adapters receive it by mutable reference, append parsed values, and
//! enqueue discovered configuration files. Nothing reads the per-parameter
//! value sequences until the finalizer runs, so adapters never observe a
//! "final" value.

use crate::domain::errors::{ConfigError, ErrorKind, Result};
use crate::domain::param::{Registry, SpecialAction};
use crate::domain::param_name::ParamName;
use crate::domain::value::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The mutable accumulator of one resolution pass.
///
/// Holds the seeded defaults (kept apart from source occurrences so that a
/// default never trips a singleton multiplicity check), the ordered
/// per-parameter value sequences, the queued-file worklist, and the optional
/// special-action marker.
#[derive(Debug, Default)]
pub struct ResolutionState {
    defaults: BTreeMap<ParamName, Value>,
    values: BTreeMap<ParamName, Vec<Value>>,
    queued_files: Vec<PathBuf>,
    special: Option<SpecialAction>,
}

impl ResolutionState {
    /// Seeds a fresh state from a registry: every parameter's default text is
    /// parsed through its own parser.
    ///
    /// # Panics
    ///
    /// Panics when a default fails to parse. A default that does not satisfy
    /// its own parameter's grammar is a broken schema, not bad user input,
    /// and must surface immediately.
    pub fn seed(registry: &Registry) -> Self {
        let mut defaults = BTreeMap::new();
        for param in registry.params() {
            if let Some(text) = param.default() {
                match param.parse_text(text) {
                    Ok(value) => {
                        defaults.insert(param.name().clone(), value);
                    }
                    Err(error) => panic!(
                        "default '{text}' for parameter '{}' does not parse: {error}",
                        param.name()
                    ),
                }
            }
        }
        tracing::debug!("seeded {} parameter default(s)", defaults.len());
        ResolutionState {
            defaults,
            values: BTreeMap::new(),
            queued_files: Vec::new(),
            special: None,
        }
    }

    /// Appends a parsed value to the parameter's ordered sequence.
    ///
    /// Insertion order is encounter order across all sources, newest last.
    pub fn append(&mut self, name: &ParamName, value: Value) {
        self.values.entry(name.clone()).or_default().push(value);
    }

    /// Queues a configuration file path for processing.
    pub fn enqueue_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        tracing::trace!("queued configuration file {}", path.display());
        self.queued_files.push(path);
    }

    /// Takes the current generation of queued files, leaving the queue empty.
    ///
    /// Files processed out of this batch may enqueue further files; the
    /// driver loops over `drain_files` until it returns an empty batch.
    pub fn drain_files(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.queued_files)
    }

    /// Returns whether any files are currently queued.
    pub fn has_queued_files(&self) -> bool {
        !self.queued_files.is_empty()
    }

    /// Raises a special action.
    ///
    /// Raising the same action again is idempotent; raising a *different*
    /// action while one is held is a conflict error, never a silent
    /// overwrite.
    pub fn raise_special(&mut self, action: SpecialAction) -> Result<()> {
        match self.special {
            None => {
                self.special = Some(action);
                Ok(())
            }
            Some(held) if held == action => Ok(()),
            Some(held) => Err(ConfigError::new(ErrorKind::SpecialActionConflict {
                held,
                requested: action,
            })),
        }
    }

    /// Returns the raised special action, if any.
    pub fn special(&self) -> Option<SpecialAction> {
        self.special
    }

    /// Returns the number of source occurrences collected for a parameter.
    pub fn occurrences(&self, name: &ParamName) -> usize {
        self.values.get(name).map_or(0, Vec::len)
    }

    /// Returns the seeded default for a parameter, if it had one.
    pub(crate) fn default_of(&self, name: &ParamName) -> Option<&Value> {
        self.defaults.get(name)
    }

    /// Removes and returns a parameter's collected sequence. Finalizer only.
    pub(crate) fn take_values(&mut self, name: &ParamName) -> Vec<Value> {
        self.values.remove(name).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::param::Parameter;

    fn registry_with_default() -> Registry {
        let mut registry = Registry::new();
        registry.register(Parameter::int("count").default_text("1"));
        registry
    }

    #[test]
    fn test_seed_parses_defaults() {
        let state = ResolutionState::seed(&registry_with_default());
        assert_eq!(
            state.default_of(&ParamName::from("count")),
            Some(&Value::Int(1))
        );
        assert_eq!(state.occurrences(&ParamName::from("count")), 0);
    }

    #[test]
    #[should_panic(expected = "does not parse")]
    fn test_seed_bad_default_panics() {
        let mut registry = Registry::new();
        registry.register(Parameter::int("count").default_text("not-a-number"));
        let _ = ResolutionState::seed(&registry);
    }

    #[test]
    fn test_append_preserves_order() {
        let mut state = ResolutionState::default();
        let name = ParamName::from("tags");
        state.append(&name, Value::Str("a".into()));
        state.append(&name, Value::Str("b".into()));
        assert_eq!(state.occurrences(&name), 2);
        assert_eq!(
            state.take_values(&name),
            vec![Value::Str("a".into()), Value::Str("b".into())]
        );
    }

    #[test]
    fn test_drain_files_one_generation() {
        let mut state = ResolutionState::default();
        state.enqueue_file("a.conf");
        state.enqueue_file("b.conf");

        let batch = state.drain_files();
        assert_eq!(batch.len(), 2);
        assert!(!state.has_queued_files());

        // Files enqueued while processing a batch form the next generation.
        state.enqueue_file("c.conf");
        assert_eq!(state.drain_files().len(), 1);
    }

    #[test]
    fn test_special_idempotent() {
        let mut state = ResolutionState::default();
        assert!(state.raise_special(SpecialAction::Help).is_ok());
        assert!(state.raise_special(SpecialAction::Help).is_ok());
        assert_eq!(state.special(), Some(SpecialAction::Help));
    }

    #[test]
    fn test_special_conflict() {
        let mut state = ResolutionState::default();
        state.raise_special(SpecialAction::Help).unwrap();
        let error = state.raise_special(SpecialAction::Version).unwrap_err();
        assert!(matches!(
            error.kind(),
            ErrorKind::SpecialActionConflict {
                held: SpecialAction::Help,
                requested: SpecialAction::Version,
            }
        ));
        // The held action is not overwritten.
        assert_eq!(state.special(), Some(SpecialAction::Help));
    }
}
