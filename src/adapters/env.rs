// SPDX-License-Identifier: Apache-2.0

//! Environment variable source adapter.
//!
//! The environment is the lowest-precedence source. Only variables that a
//! parameter explicitly binds are consumed; everything else in the process
//! environment is somebody else's business and is skipped without comment.

use crate::domain::errors::ConfigError;
use crate::domain::param::Registry;
use crate::domain::state::ResolutionState;

/// Reads bound variables out of an environment snapshot.
#[derive(Debug, Default)]
pub struct EnvAdapter;

impl EnvAdapter {
    /// Creates a new environment adapter.
    pub fn new() -> Self {
        EnvAdapter
    }

    /// Applies a single environment entry to the resolution state.
    ///
    /// Variables with no binding are ignored. A bound variable whose value
    /// fails its parameter's grammar yields one error tagged with the
    /// variable name; the state is left untouched for that entry.
    pub fn handle(
        &self,
        registry: &Registry,
        state: &mut ResolutionState,
        var: &str,
        raw: &str,
    ) -> Option<ConfigError> {
        let Some(param) = registry.by_env_var(var) else {
            tracing::trace!(%var, "environment variable not bound, skipping");
            return None;
        };

        match param.parse_text(raw) {
            Ok(value) => {
                if param.is_file_source() {
                    state.enqueue_file(raw);
                }
                tracing::debug!(%var, parameter = %param.name(), "environment value accepted");
                state.append(param.name(), value);
                None
            }
            Err(error) => Some(error.with_env_var(var)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;
    use crate::domain::param::Parameter;
    use crate::domain::param_name::ParamName;
    use crate::domain::value::Value;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register(Parameter::string("name").env_var("APP_NAME"))
            .register(Parameter::int("count").env_var("APP_COUNT"))
            .register(Parameter::path("config").env_var("APP_CONFIG").enqueues_file());
        registry
    }

    #[test]
    fn test_bound_variable_appends() {
        let registry = registry();
        let mut state = ResolutionState::seed(&registry);
        let adapter = EnvAdapter::new();

        assert!(adapter
            .handle(&registry, &mut state, "APP_NAME", "alice")
            .is_none());
        assert_eq!(state.occurrences(&ParamName::from("name")), 1);
    }

    #[test]
    fn test_unbound_variable_ignored() {
        let registry = registry();
        let mut state = ResolutionState::seed(&registry);
        let adapter = EnvAdapter::new();

        assert!(adapter
            .handle(&registry, &mut state, "HOME", "/root")
            .is_none());
        assert_eq!(state.occurrences(&ParamName::from("name")), 0);
    }

    #[test]
    fn test_grammar_error_tagged_with_var() {
        let registry = registry();
        let mut state = ResolutionState::seed(&registry);
        let adapter = EnvAdapter::new();

        let error = adapter
            .handle(&registry, &mut state, "APP_COUNT", "lots")
            .unwrap();
        assert!(matches!(error.kind(), ErrorKind::Grammar { .. }));
        assert_eq!(error.context().env_var.as_deref(), Some("APP_COUNT"));
        assert_eq!(state.occurrences(&ParamName::from("count")), 0);
    }

    #[test]
    fn test_file_source_enqueues() {
        let registry = registry();
        let mut state = ResolutionState::seed(&registry);
        let adapter = EnvAdapter::new();

        assert!(adapter
            .handle(&registry, &mut state, "APP_CONFIG", "app.conf")
            .is_none());
        assert!(state.has_queued_files());
        assert_eq!(
            state.take_values(&ParamName::from("config")),
            vec![Value::Path("app.conf".into())]
        );
    }
}
