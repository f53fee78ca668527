// SPDX-License-Identifier: Apache-2.0

//! The resolution engine driving the source passes.
//!
//! One call to [`Resolver::resolve`] runs the full pipeline: seed defaults,
//! apply the environment snapshot, apply the CLI token stream, then fold and
//! validate. Configuration files are processed as soon as a source event
//! names one, and files they name in turn are drained in the same loop,
//! always resolving relative paths against the single working directory
//! given to `resolve`.
//!
//! Both source passes run to completion so that every problem on the line is
//! reported together, including a second, conflicting special action. A
//! raised special action skips finalization: collectors and validators never
//! run for it. When the passes collected errors, those errors are the
//! outcome even if a special action was also raised.

use crate::adapters::{CliAdapter, EnvAdapter, FileAdapter};
use crate::domain::errors::{AggregateError, ConfigError, Result as DomainResult};
use crate::domain::param::{Registry, SpecialAction};
use crate::domain::record::{ResolvedConfig, Validator};
use crate::domain::state::ResolutionState;
use crate::service::finalize;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

/// The successful outcome of a resolution: either a finished record or a
/// short-circuiting special action for the caller to act on.
#[derive(Debug)]
pub enum Outcome {
    /// Every parameter resolved and every validator passed.
    Resolved(ResolvedConfig),
    /// A special action was requested; no record was built.
    Special(SpecialAction),
}

/// Resolves configuration from environment, files, and CLI tokens against a
/// parameter registry.
///
/// # Examples
///
/// ```
/// use layercfg::prelude::*;
/// use std::collections::BTreeMap;
///
/// let mut registry = Registry::new();
/// registry
///     .register(Parameter::string("name").flag("--name").env_var("APP_NAME"))
///     .register(Parameter::int("count").flag("--count").default_text("1"));
/// let resolver = Resolver::new(registry);
///
/// let outcome = resolver
///     .resolve(".", &["--name", "alice"], &BTreeMap::new())
///     .unwrap();
/// let Outcome::Resolved(config) = outcome else { unreachable!() };
/// assert_eq!(config.get_str("name"), Some("alice"));
/// assert_eq!(config.get_i64("count"), Some(1));
/// ```
pub struct Resolver {
    registry: Registry,
    validators: Vec<Validator>,
}

impl Resolver {
    /// Creates a resolver over a finished registry.
    pub fn new(registry: Registry) -> Self {
        Resolver {
            registry,
            validators: Vec::new(),
        }
    }

    /// Registers a whole-record validator, run in registration order after
    /// every collector succeeded.
    pub fn add_validator<F>(&mut self, validate: F) -> &mut Self
    where
        F: Fn(&ResolvedConfig) -> DomainResult<()> + Send + Sync + 'static,
    {
        self.validators.push(Box::new(validate));
        self
    }

    /// Returns the registry this resolver dispatches against.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Runs one full resolution over an environment snapshot and a CLI token
    /// stream.
    ///
    /// Relative configuration file paths, including recursively discovered
    /// ones, resolve against `working_dir`. The environment pass runs first,
    /// then the CLI pass, then finalization; each queued file is processed at
    /// most once per call, so inclusion cycles terminate.
    pub fn resolve<S: AsRef<str>>(
        &self,
        working_dir: impl AsRef<Path>,
        cli_tokens: &[S],
        env: &BTreeMap<String, String>,
    ) -> Result<Outcome, AggregateError> {
        let files = FileAdapter::new(working_dir.as_ref());
        let mut state = ResolutionState::seed(&self.registry);
        let mut processed: HashSet<PathBuf> = HashSet::new();
        let mut errors: Vec<ConfigError> = Vec::new();

        tracing::debug!(entries = env.len(), "environment pass");
        let env_adapter = EnvAdapter::new();
        for (var, raw) in env {
            if let Some(error) = env_adapter.handle(&self.registry, &mut state, var, raw) {
                errors.push(error);
            }
            self.drain_queued(&files, &mut state, &mut processed, &mut errors);
        }

        tracing::debug!(tokens = cli_tokens.len(), "command-line pass");
        let mut cli = CliAdapter::new(&self.registry);
        let mut stream: VecDeque<String> = cli_tokens
            .iter()
            .map(|token| token.as_ref().to_string())
            .collect();
        while !stream.is_empty() {
            if let Some(error) = cli.handle(&mut stream, &mut state) {
                errors.push(error);
            }
            self.drain_queued(&files, &mut state, &mut processed, &mut errors);
        }

        if let Some(action) = state.special() {
            tracing::debug!(%action, "special action requested, skipping finalization");
            return match AggregateError::from_errors(errors) {
                None => Ok(Outcome::Special(action)),
                Some(aggregate) => Err(aggregate),
            };
        }

        match finalize::finish(state, &self.registry, &self.validators) {
            Ok(config) => match AggregateError::from_errors(errors) {
                None => Ok(Outcome::Resolved(config)),
                Some(aggregate) => Err(aggregate),
            },
            Err(mut aggregate) => {
                aggregate.prepend(errors);
                Err(aggregate)
            }
        }
    }

    /// Processes queued files until the worklist stays empty, skipping any
    /// path already processed in this call.
    fn drain_queued(
        &self,
        files: &FileAdapter,
        state: &mut ResolutionState,
        processed: &mut HashSet<PathBuf>,
        errors: &mut Vec<ConfigError>,
    ) {
        while state.has_queued_files() {
            for path in state.drain_files() {
                let resolved = files.resolve_path(&path);
                if !processed.insert(resolved.clone()) {
                    tracing::debug!(file = %resolved.display(), "file already processed, skipping");
                    continue;
                }
                if let Err(aggregate) = files.process(&resolved, &self.registry, state) {
                    errors.extend(aggregate);
                }
            }
        }
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("registry", &self.registry)
            .field("validators", &self.validators.len())
            .finish()
    }
}
