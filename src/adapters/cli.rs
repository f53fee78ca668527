// SPDX-License-Identifier: Apache-2.0

//! Command-line token source adapter.
//!
//! Tokens are processed strictly left to right, one per [`CliAdapter::handle`]
//! call, so the driver can check for a raised special action between tokens.
//! A token is either a registered flag (dispatched through its
//! [`FlagAction`]), an unknown leading-dash token (an error), or a positional
//! candidate consumed by the next unfilled positional parameter.

use crate::domain::errors::{ConfigError, ErrorKind};
use crate::domain::param::{FlagAction, Registry};
use crate::domain::param_name::ParamName;
use crate::domain::state::ResolutionState;
use crate::domain::value::Value;
use std::collections::VecDeque;

/// Walks a CLI token stream against the registry's flag dispatch table.
///
/// The adapter carries the positional consumption queue across calls: each
/// non-flag token binds to the front positional parameter, which is retired
/// once filled unless it is repeatable.
#[derive(Debug)]
pub struct CliAdapter<'r> {
    registry: &'r Registry,
    positionals: VecDeque<ParamName>,
}

impl<'r> CliAdapter<'r> {
    /// Creates an adapter over a registry, priming the positional queue in
    /// registration order.
    pub fn new(registry: &'r Registry) -> Self {
        CliAdapter {
            registry,
            positionals: registry.positionals().into(),
        }
    }

    /// Consumes the front token (and possibly its value token) from the
    /// stream, mutating the state.
    ///
    /// Returns `None` on success or when the stream was already empty. Errors
    /// never abort the stream; the driver keeps calling until the stream is
    /// drained so that every problem on the line is reported.
    pub fn handle(
        &mut self,
        tokens: &mut VecDeque<String>,
        state: &mut ResolutionState,
    ) -> Option<ConfigError> {
        let token = tokens.pop_front()?;

        if let Some(action) = self.registry.flag_action(&token) {
            return match action.clone() {
                FlagAction::Special(special) => state
                    .raise_special(special)
                    .err()
                    .map(|error| error.with_flag(&token)),
                FlagAction::Insert(expansion) => {
                    tracing::debug!(flag = %token, "expanding alias");
                    for synthetic in expansion.into_iter().rev() {
                        tokens.push_front(synthetic);
                    }
                    None
                }
                FlagAction::Bind(name) => self.bind(&token, &name, tokens, state),
            };
        }

        if token.starts_with('-') && token.len() > 1 {
            return Some(ConfigError::new(ErrorKind::UnknownFlag { token }));
        }

        self.positional(token, state)
    }

    fn bind(
        &self,
        flag: &str,
        name: &ParamName,
        tokens: &mut VecDeque<String>,
        state: &mut ResolutionState,
    ) -> Option<ConfigError> {
        // Bind actions are only ever inserted by Registry::register, which
        // also stores the parameter, so the lookup cannot fail.
        let param = self
            .registry
            .get(name)
            .unwrap_or_else(|| panic!("flag '{flag}' bound to unregistered parameter '{name}'"));

        if !param.takes_value() {
            state.append(param.name(), Value::Bool(true));
            return None;
        }

        let Some(raw) = tokens.pop_front() else {
            return Some(
                ConfigError::new(ErrorKind::MissingValue {
                    flag: flag.to_string(),
                })
                .with_param(param.name()),
            );
        };

        match param.parse_text(&raw) {
            Ok(value) => {
                if param.is_file_source() {
                    state.enqueue_file(raw);
                }
                state.append(param.name(), value);
                None
            }
            Err(error) => Some(error.with_flag(flag)),
        }
    }

    fn positional(&mut self, token: String, state: &mut ResolutionState) -> Option<ConfigError> {
        let Some(name) = self.positionals.front().cloned() else {
            return Some(ConfigError::new(ErrorKind::UnknownArgument { token }));
        };
        let param = self
            .registry
            .get(&name)
            .unwrap_or_else(|| panic!("positional parameter '{name}' not registered"));

        if !param.is_repeatable() {
            self.positionals.pop_front();
        }

        match param.parse_text(&token) {
            Ok(value) => {
                if param.is_file_source() {
                    state.enqueue_file(token);
                }
                state.append(param.name(), value);
                None
            }
            Err(error) => Some(error),
        }
    }
}
