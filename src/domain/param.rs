// SPDX-License-Identifier: Apache-2.0

//! Parameter declarations and the registry.
//!
//! A [`Parameter`] is an immutable declaration: name, value parser, optional
//! default text, collector policy, and bindings to each source. Parameters
//! are registered once, before resolution begins, in a [`Registry`], which
//! also holds the derived lookup tables (flag dispatch, environment variable
//! bindings, file section/key bindings) and the per-section strictness
//! policies.
//!
//! Registration mistakes — duplicate names, duplicate flags, a positional
//! declared after a repeatable positional — are structural program errors and
//! are checked with assertions, not runtime errors.

use crate::domain::errors::{ConfigError, ErrorKind, Result};
use crate::domain::param_name::ParamName;
use crate::domain::value::Value;
use crate::ports::parser::{BoolParser, FloatParser, IntParser, PathParser, StringParser};
use crate::ports::ValueParser;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A short-circuiting outcome requested by a flag, preempting resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialAction {
    /// Show usage information.
    Help,
    /// Show version information.
    Version,
}

impl fmt::Display for SpecialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecialAction::Help => write!(f, "help"),
            SpecialAction::Version => write!(f, "version"),
        }
    }
}

/// The policy that folds a parameter's collected occurrences into one field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collector {
    /// Exactly one occurrence across all sources (the default fills in when
    /// no source provided one).
    Singleton,
    /// Zero or one occurrence; zero falls back to the default or absence.
    Optional,
    /// Any number of occurrences, kept in encounter order.
    Accumulate,
    /// Any number of occurrences; the field value is the count itself.
    FlagCount,
}

/// What the command-line adapter does when it recognizes a flag token.
///
/// The variant set is fixed at registry-build time and dispatched by a single
/// `match` in the adapter.
#[derive(Clone, Debug)]
pub enum FlagAction {
    /// Parse a value for the named parameter.
    Bind(ParamName),
    /// Raise a special action on the resolution state.
    Special(SpecialAction),
    /// Splice synthetic tokens onto the front of the remaining token stream.
    Insert(Vec<String>),
}

/// Unknown-key policy for a registered file section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionPolicy {
    /// Every key in the section must be registered; unknown keys error.
    Strict,
    /// Unknown keys are silently ignored.
    Lenient,
}

/// Policy for file sections that are not registered at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum UnknownSectionPolicy {
    /// Unregistered sections are skipped without a report.
    #[default]
    Ignore,
    /// Unregistered sections produce an error naming the section.
    Report,
}

/// An immutable parameter declaration.
///
/// Built fluently and handed to [`Registry::register`]. A parameter may bind
/// to any combination of sources: CLI flags, one environment variable, one
/// file section/key pair, and/or a positional slot.
///
/// # Examples
///
/// ```
/// use layercfg::domain::{Collector, Parameter};
///
/// let param = Parameter::int("port")
///     .flag("--port")
///     .env_var("APP_PORT")
///     .file_key("server", "port")
///     .default_text("8080");
/// assert_eq!(param.name().as_str(), "port");
/// assert_eq!(param.collector(), Collector::Singleton);
/// ```
#[derive(Clone)]
pub struct Parameter {
    name: ParamName,
    parser: Arc<dyn ValueParser>,
    default: Option<String>,
    collector: Collector,
    flags: Vec<String>,
    env_var: Option<String>,
    file_key: Option<(String, String)>,
    positional: bool,
    repeatable: bool,
    enqueues_file: bool,
}

impl Parameter {
    /// Creates a parameter with an explicit parser.
    ///
    /// The collector defaults to [`Collector::Singleton`].
    pub fn new(name: impl Into<ParamName>, parser: Arc<dyn ValueParser>) -> Self {
        Parameter {
            name: name.into(),
            parser,
            default: None,
            collector: Collector::Singleton,
            flags: Vec::new(),
            env_var: None,
            file_key: None,
            positional: false,
            repeatable: false,
            enqueues_file: false,
        }
    }

    /// Creates a string-valued parameter.
    pub fn string(name: impl Into<ParamName>) -> Self {
        Self::new(name, Arc::new(StringParser))
    }

    /// Creates an integer-valued parameter.
    pub fn int(name: impl Into<ParamName>) -> Self {
        Self::new(name, Arc::new(IntParser))
    }

    /// Creates a float-valued parameter.
    pub fn float(name: impl Into<ParamName>) -> Self {
        Self::new(name, Arc::new(FloatParser))
    }

    /// Creates a boolean-valued parameter.
    pub fn boolean(name: impl Into<ParamName>) -> Self {
        Self::new(name, Arc::new(BoolParser))
    }

    /// Creates a path-valued parameter.
    pub fn path(name: impl Into<ParamName>) -> Self {
        Self::new(name, Arc::new(PathParser))
    }

    /// Creates a flag-count parameter.
    ///
    /// Counters take no value token on the command line; each occurrence of
    /// one of their flags increments the resolved count.
    pub fn counter(name: impl Into<ParamName>) -> Self {
        let mut param = Self::new(name, Arc::new(BoolParser));
        param.collector = Collector::FlagCount;
        param
    }

    /// Sets the default raw text, parsed through this parameter's own parser
    /// at seed time.
    pub fn default_text(mut self, text: impl Into<String>) -> Self {
        self.default = Some(text.into());
        self
    }

    /// Sets the collector policy.
    pub fn with_collector(mut self, collector: Collector) -> Self {
        self.collector = collector;
        self
    }

    /// Binds an additional CLI flag spelling (e.g. `"--count"` or `"-c"`).
    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    /// Binds an environment variable name.
    pub fn env_var(mut self, var: impl Into<String>) -> Self {
        self.env_var = Some(var.into());
        self
    }

    /// Binds a file section/key pair. Keys outside any `[section]` header use
    /// the empty section name.
    pub fn file_key(mut self, section: impl Into<String>, key: impl Into<String>) -> Self {
        self.file_key = Some((section.into(), key.into()));
        self
    }

    /// Marks this parameter as consuming a positional token.
    pub fn positional(mut self) -> Self {
        self.positional = true;
        self
    }

    /// Marks this positional as repeatable: it consumes every remaining
    /// positional token, so it must be the last positional registered.
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    /// Marks this parameter's values as naming further configuration files:
    /// on every successful parse the raw text is enqueued for the file
    /// adapter.
    pub fn enqueues_file(mut self) -> Self {
        self.enqueues_file = true;
        self
    }

    /// Returns the unique name.
    pub fn name(&self) -> &ParamName {
        &self.name
    }

    /// Returns the default raw text, if any.
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Returns the collector policy.
    pub fn collector(&self) -> Collector {
        self.collector
    }

    /// Returns the bound CLI flag spellings.
    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    /// Returns the bound environment variable, if any.
    pub fn bound_env_var(&self) -> Option<&str> {
        self.env_var.as_deref()
    }

    /// Returns the bound file section/key pair, if any.
    pub fn bound_file_key(&self) -> Option<(&str, &str)> {
        self.file_key
            .as_ref()
            .map(|(section, key)| (section.as_str(), key.as_str()))
    }

    /// Returns whether this parameter consumes a positional token.
    pub fn is_positional(&self) -> bool {
        self.positional
    }

    /// Returns whether this positional consumes all remaining tokens.
    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    /// Returns whether successfully parsed values also enqueue a file.
    pub fn is_file_source(&self) -> bool {
        self.enqueues_file
    }

    /// Returns whether the CLI adapter pulls a value token for this
    /// parameter's flags. Counters do not take a value.
    pub fn takes_value(&self) -> bool {
        self.collector != Collector::FlagCount
    }

    /// Runs this parameter's parser over raw text, tagging grammar failures
    /// with the parameter name.
    pub fn parse_text(&self, text: &str) -> Result<Value> {
        self.parser.parse(text).map_err(|message| {
            ConfigError::new(ErrorKind::Grammar {
                value: text.to_string(),
                expected: self.parser.type_name(),
                message,
            })
            .with_param(&self.name)
        })
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("type", &self.parser.type_name())
            .field("default", &self.default)
            .field("collector", &self.collector)
            .field("flags", &self.flags)
            .field("env_var", &self.env_var)
            .field("file_key", &self.file_key)
            .field("positional", &self.positional)
            .field("repeatable", &self.repeatable)
            .field("enqueues_file", &self.enqueues_file)
            .finish()
    }
}

/// The registration-ordered parameter set and its derived lookup tables.
///
/// `-h` and `--help` are always implicitly bound to
/// [`SpecialAction::Help`]. Further special-action flags and alias flags can
/// be added explicitly.
///
/// # Examples
///
/// ```
/// use layercfg::domain::{Parameter, Registry, SectionPolicy, SpecialAction};
///
/// let mut registry = Registry::new();
/// registry
///     .register(Parameter::string("name").flag("--name").file_key("main", "name"))
///     .special_flag("--version", SpecialAction::Version)
///     .section("main", SectionPolicy::Strict);
///
/// assert_eq!(registry.params().len(), 1);
/// ```
#[derive(Debug)]
pub struct Registry {
    params: Vec<Parameter>,
    by_name: HashMap<ParamName, usize>,
    flags: HashMap<String, FlagAction>,
    env_vars: HashMap<String, ParamName>,
    file_keys: HashMap<(String, String), ParamName>,
    sections: HashMap<String, SectionPolicy>,
    unknown_sections: UnknownSectionPolicy,
    has_repeatable_positional: bool,
}

impl Registry {
    /// Creates a registry with the implicit help flags pre-registered.
    pub fn new() -> Self {
        let mut registry = Registry {
            params: Vec::new(),
            by_name: HashMap::new(),
            flags: HashMap::new(),
            env_vars: HashMap::new(),
            file_keys: HashMap::new(),
            sections: HashMap::new(),
            unknown_sections: UnknownSectionPolicy::Ignore,
            has_repeatable_positional: false,
        };
        registry.flags.insert(
            "-h".to_string(),
            FlagAction::Special(SpecialAction::Help),
        );
        registry.flags.insert(
            "--help".to_string(),
            FlagAction::Special(SpecialAction::Help),
        );
        registry
    }

    /// Registers a parameter.
    ///
    /// # Panics
    ///
    /// Panics on structural program errors: a duplicate parameter name, a
    /// flag, environment variable, or file key bound twice, a repeatable
    /// marker on a non-positional, or a positional declared after a
    /// repeatable positional.
    pub fn register(&mut self, param: Parameter) -> &mut Self {
        assert!(
            !self.by_name.contains_key(param.name()),
            "parameter '{}' registered twice",
            param.name()
        );
        assert!(
            !param.is_repeatable() || param.is_positional(),
            "parameter '{}' is repeatable but not positional",
            param.name()
        );
        if param.is_positional() {
            assert!(
                !self.has_repeatable_positional,
                "positional parameter '{}' declared after a repeatable positional",
                param.name()
            );
            if param.is_repeatable() {
                self.has_repeatable_positional = true;
            }
        }

        for flag in param.flags() {
            let previous = self
                .flags
                .insert(flag.clone(), FlagAction::Bind(param.name().clone()));
            assert!(previous.is_none(), "flag '{flag}' bound twice");
        }
        if let Some(var) = param.bound_env_var() {
            let previous = self.env_vars.insert(var.to_string(), param.name().clone());
            assert!(previous.is_none(), "environment variable '{var}' bound twice");
        }
        if let Some((section, key)) = param.bound_file_key() {
            let previous = self
                .file_keys
                .insert((section.to_string(), key.to_string()), param.name().clone());
            assert!(
                previous.is_none(),
                "file key '{key}' in section '{section}' bound twice"
            );
            // A bound section defaults to lenient until declared otherwise.
            self.sections
                .entry(section.to_string())
                .or_insert(SectionPolicy::Lenient);
        }

        self.by_name.insert(param.name().clone(), self.params.len());
        self.params.push(param);
        self
    }

    /// Binds a flag to a special action (e.g. `--version`).
    ///
    /// # Panics
    ///
    /// Panics when the flag spelling is already taken.
    pub fn special_flag(&mut self, flag: &str, action: SpecialAction) -> &mut Self {
        let previous = self
            .flags
            .insert(flag.to_string(), FlagAction::Special(action));
        assert!(previous.is_none(), "flag '{flag}' bound twice");
        self
    }

    /// Binds an alias flag that expands into other tokens, spliced onto the
    /// front of the remaining token stream when encountered.
    ///
    /// # Panics
    ///
    /// Panics when the flag spelling is already taken.
    pub fn alias(&mut self, flag: &str, expansion: &[&str]) -> &mut Self {
        let tokens = expansion.iter().map(|t| t.to_string()).collect();
        let previous = self.flags.insert(flag.to_string(), FlagAction::Insert(tokens));
        assert!(previous.is_none(), "flag '{flag}' bound twice");
        self
    }

    /// Declares the unknown-key policy for a file section, overriding the
    /// lenient default.
    pub fn section(&mut self, name: &str, policy: SectionPolicy) -> &mut Self {
        self.sections.insert(name.to_string(), policy);
        self
    }

    /// Sets the policy for file sections that are not registered at all.
    pub fn unknown_sections(&mut self, policy: UnknownSectionPolicy) -> &mut Self {
        self.unknown_sections = policy;
        self
    }

    /// Returns the parameters in registration order.
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Looks up a parameter by name.
    pub fn get(&self, name: &ParamName) -> Option<&Parameter> {
        self.by_name.get(name).map(|&i| &self.params[i])
    }

    /// Returns the dispatch action for a flag token, if registered.
    pub fn flag_action(&self, token: &str) -> Option<&FlagAction> {
        self.flags.get(token)
    }

    /// Looks up the parameter bound to an environment variable.
    pub fn by_env_var(&self, var: &str) -> Option<&Parameter> {
        self.env_vars.get(var).and_then(|name| self.get(name))
    }

    /// Looks up the parameter bound to a file section/key pair.
    pub fn by_file_key(&self, section: &str, key: &str) -> Option<&Parameter> {
        self.file_keys
            .get(&(section.to_string(), key.to_string()))
            .and_then(|name| self.get(name))
    }

    /// Returns the unknown-key policy of a section, or `None` when the
    /// section is not registered.
    pub fn section_policy(&self, name: &str) -> Option<SectionPolicy> {
        self.sections.get(name).copied()
    }

    /// Returns the policy for unregistered sections.
    pub fn unknown_section_policy(&self) -> UnknownSectionPolicy {
        self.unknown_sections
    }

    /// Returns the names of the positional parameters in consumption order.
    ///
    /// Consumption order is registration order.
    pub fn positionals(&self) -> Vec<ParamName> {
        self.params
            .iter()
            .filter(|p| p.is_positional())
            .map(|p| p.name().clone())
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_defaults() {
        let param = Parameter::string("name");
        assert_eq!(param.collector(), Collector::Singleton);
        assert!(param.takes_value());
        assert!(!param.is_positional());
        assert!(param.default().is_none());
    }

    #[test]
    fn test_counter_takes_no_value() {
        let param = Parameter::counter("verbose");
        assert_eq!(param.collector(), Collector::FlagCount);
        assert!(!param.takes_value());
    }

    #[test]
    fn test_parse_text_tags_param() {
        let param = Parameter::int("count");
        let error = param.parse_text("abc").unwrap_err();
        assert_eq!(error.context().param.as_ref().unwrap().as_str(), "count");
    }

    #[test]
    fn test_registry_implicit_help_flags() {
        let registry = Registry::new();
        assert!(matches!(
            registry.flag_action("-h"),
            Some(FlagAction::Special(SpecialAction::Help))
        ));
        assert!(matches!(
            registry.flag_action("--help"),
            Some(FlagAction::Special(SpecialAction::Help))
        ));
    }

    #[test]
    fn test_registry_lookup_tables() {
        let mut registry = Registry::new();
        registry.register(
            Parameter::string("name")
                .flag("--name")
                .env_var("APP_NAME")
                .file_key("main", "name"),
        );

        assert!(matches!(
            registry.flag_action("--name"),
            Some(FlagAction::Bind(_))
        ));
        assert_eq!(
            registry.by_env_var("APP_NAME").unwrap().name().as_str(),
            "name"
        );
        assert_eq!(
            registry.by_file_key("main", "name").unwrap().name().as_str(),
            "name"
        );
        assert_eq!(
            registry.section_policy("main"),
            Some(SectionPolicy::Lenient)
        );
    }

    #[test]
    fn test_registry_section_override() {
        let mut registry = Registry::new();
        registry
            .register(Parameter::string("host").file_key("server", "host"))
            .section("server", SectionPolicy::Strict);
        assert_eq!(
            registry.section_policy("server"),
            Some(SectionPolicy::Strict)
        );
    }

    #[test]
    fn test_positional_order() {
        let mut registry = Registry::new();
        registry
            .register(Parameter::string("input").positional())
            .register(Parameter::string("rest").positional().repeatable());
        assert_eq!(
            registry
                .positionals()
                .iter()
                .map(|n| n.as_str().to_string())
                .collect::<Vec<_>>(),
            vec!["input", "rest"]
        );
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_duplicate_name_panics() {
        let mut registry = Registry::new();
        registry
            .register(Parameter::string("name"))
            .register(Parameter::int("name"));
    }

    #[test]
    #[should_panic(expected = "bound twice")]
    fn test_duplicate_flag_panics() {
        let mut registry = Registry::new();
        registry
            .register(Parameter::string("a").flag("--x"))
            .register(Parameter::string("b").flag("--x"));
    }

    #[test]
    #[should_panic(expected = "after a repeatable positional")]
    fn test_positional_after_repeatable_panics() {
        let mut registry = Registry::new();
        registry
            .register(Parameter::string("rest").positional().repeatable())
            .register(Parameter::string("late").positional());
    }

    #[test]
    #[should_panic(expected = "repeatable but not positional")]
    fn test_repeatable_non_positional_panics() {
        let mut registry = Registry::new();
        registry.register(Parameter::string("x").repeatable());
    }
}
