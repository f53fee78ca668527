// SPDX-License-Identifier: Apache-2.0

//! End-to-end resolution tests over environment and command-line sources.
//!
//! These tests exercise the full pipeline: registry construction, the two
//! source passes, finalization, and the error aggregate shapes a caller
//! actually matches on.

use layercfg::prelude::*;
use std::collections::BTreeMap;

mod common;

fn registry() -> Registry {
    common::init_tracing();
    let mut registry = Registry::new();
    registry
        .register(Parameter::string("name").flag("--name").env_var("APP_NAME"))
        .register(Parameter::int("count").flag("--count").default_text("1"))
        .register(Parameter::counter("verbose").flag("--verbose"));
    registry
}

fn env(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn resolved(outcome: Outcome) -> ResolvedConfig {
    match outcome {
        Outcome::Resolved(config) => config,
        Outcome::Special(action) => panic!("unexpected special action '{action}'"),
    }
}

#[test]
fn test_cli_values_resolve() {
    let resolver = Resolver::new(registry());
    let outcome = resolver
        .resolve(".", &["--name", "alice", "--count", "3"], &BTreeMap::new())
        .unwrap();

    let config = resolved(outcome);
    assert_eq!(config.get_str("name"), Some("alice"));
    assert_eq!(config.get_i64("count"), Some(3));
    assert_eq!(config.get_count("verbose"), Some(0));
}

#[test]
fn test_env_value_with_default_fallback() {
    let resolver = Resolver::new(registry());
    let outcome = resolver
        .resolve(".", &[] as &[&str], &env(&[("APP_NAME", "bob")]))
        .unwrap();

    let config = resolved(outcome);
    assert_eq!(config.get_str("name"), Some("bob"));
    assert_eq!(config.get_i64("count"), Some(1));
    assert_eq!(config.get_count("verbose"), Some(0));
}

#[test]
fn test_missing_required_singleton() {
    let resolver = Resolver::new(registry());
    let aggregate = resolver
        .resolve(".", &[] as &[&str], &BTreeMap::new())
        .unwrap_err();

    assert_eq!(aggregate.len(), 1);
    let error = &aggregate.errors()[0];
    assert!(matches!(
        error.kind(),
        ErrorKind::Multiplicity {
            expected: "exactly one",
            found: 0,
        }
    ));
    assert_eq!(error.context().param.as_ref().unwrap().as_str(), "name");
}

#[test]
fn test_grammar_error_tagged_with_parameter() {
    let resolver = Resolver::new(registry());
    let aggregate = resolver
        .resolve(".", &["--count", "abc"], &env(&[("APP_NAME", "carol")]))
        .unwrap_err();

    assert_eq!(aggregate.len(), 1);
    let error = &aggregate.errors()[0];
    assert!(matches!(error.kind(), ErrorKind::Grammar { .. }));
    assert_eq!(error.context().param.as_ref().unwrap().as_str(), "count");
    assert_eq!(error.context().flag.as_deref(), Some("--count"));
}

#[test]
fn test_errors_aggregate_instead_of_fail_fast() {
    // One pass-time grammar error plus one finalize-time multiplicity error.
    let resolver = Resolver::new(registry());
    let aggregate = resolver
        .resolve(".", &["--count", "abc"], &BTreeMap::new())
        .unwrap_err();

    assert_eq!(aggregate.len(), 2);
    assert!(matches!(
        aggregate.errors()[0].kind(),
        ErrorKind::Grammar { .. }
    ));
    assert!(matches!(
        aggregate.errors()[1].kind(),
        ErrorKind::Multiplicity { .. }
    ));
}

#[test]
fn test_singleton_via_two_sources_is_multiplicity_error() {
    let resolver = Resolver::new(registry());
    let aggregate = resolver
        .resolve(".", &["--name", "alice"], &env(&[("APP_NAME", "bob")]))
        .unwrap_err();

    assert_eq!(aggregate.len(), 1);
    assert!(matches!(
        aggregate.errors()[0].kind(),
        ErrorKind::Multiplicity {
            expected: "exactly one",
            found: 2,
        }
    ));
}

#[test]
fn test_help_short_circuits() {
    let resolver = Resolver::new(registry());
    let outcome = resolver.resolve(".", &["-h"], &BTreeMap::new()).unwrap();
    assert!(matches!(outcome, Outcome::Special(SpecialAction::Help)));
}

#[test]
fn test_help_preempts_finalization() {
    // Without --name a multiplicity error would be raised, but a special
    // action skips collectors and validators entirely.
    let resolver = Resolver::new(registry());
    let outcome = resolver
        .resolve(".", &["--help"], &BTreeMap::new())
        .unwrap();
    assert!(matches!(outcome, Outcome::Special(SpecialAction::Help)));
}

#[test]
fn test_help_twice_is_idempotent() {
    let resolver = Resolver::new(registry());
    let outcome = resolver
        .resolve(".", &["-h", "--help"], &BTreeMap::new())
        .unwrap();
    assert!(matches!(outcome, Outcome::Special(SpecialAction::Help)));
}

#[test]
fn test_help_then_version_is_a_conflict() {
    let mut registry = registry();
    registry.special_flag("--version", SpecialAction::Version);
    let resolver = Resolver::new(registry);

    let aggregate = resolver
        .resolve(".", &["-h", "--version"], &BTreeMap::new())
        .unwrap_err();

    assert_eq!(aggregate.len(), 1);
    assert!(matches!(
        aggregate.errors()[0].kind(),
        ErrorKind::SpecialActionConflict {
            held: SpecialAction::Help,
            requested: SpecialAction::Version,
        }
    ));
}

#[test]
fn test_unknown_flag_reported() {
    let resolver = Resolver::new(registry());
    let aggregate = resolver
        .resolve(".", &["--bogus", "--name", "alice"], &BTreeMap::new())
        .unwrap_err();

    assert_eq!(aggregate.len(), 1);
    assert!(matches!(
        aggregate.errors()[0].kind(),
        ErrorKind::UnknownFlag { token } if token == "--bogus"
    ));
}

#[test]
fn test_unbound_env_vars_ignored() {
    let resolver = Resolver::new(registry());
    let outcome = resolver
        .resolve(
            ".",
            &["--name", "alice"],
            &env(&[("HOME", "/root"), ("PATH", "/usr/bin")]),
        )
        .unwrap();

    assert_eq!(resolved(outcome).get_str("name"), Some("alice"));
}

#[test]
fn test_alias_expands_per_occurrence() {
    let mut registry = registry();
    registry.alias("--loud", &["--verbose", "--verbose"]);
    let resolver = Resolver::new(registry);

    let outcome = resolver
        .resolve(".", &["--name", "alice", "--loud", "--loud"], &BTreeMap::new())
        .unwrap();
    assert_eq!(resolved(outcome).get_count("verbose"), Some(4));
}

#[test]
fn test_positionals_consume_in_order() {
    let mut registry = Registry::new();
    registry
        .register(Parameter::path("input").positional())
        .register(Parameter::string("extras").positional().repeatable());
    let resolver = Resolver::new(registry);

    let outcome = resolver
        .resolve(".", &["in.txt", "a", "b"], &BTreeMap::new())
        .unwrap();
    let config = resolved(outcome);
    assert_eq!(config.get_path("input").unwrap().to_str(), Some("in.txt"));
    assert_eq!(config.get_many("extras").unwrap().len(), 2);
}

#[test]
fn test_unexpected_positional_reported() {
    let mut registry = Registry::new();
    registry.register(Parameter::string("only").positional());
    let resolver = Resolver::new(registry);

    let aggregate = resolver
        .resolve(".", &["one", "two"], &BTreeMap::new())
        .unwrap_err();
    assert!(matches!(
        aggregate.errors()[0].kind(),
        ErrorKind::UnknownArgument { token } if token == "two"
    ));
}

#[test]
fn test_validator_failure_aggregates() {
    let mut resolver = Resolver::new(registry());
    resolver.add_validator(|config| {
        if config.get_i64("count") > Some(10) {
            Err(ConfigError::new(ErrorKind::Validation {
                message: "count must be at most 10".to_string(),
            }))
        } else {
            Ok(())
        }
    });

    let aggregate = resolver
        .resolve(".", &["--name", "alice", "--count", "11"], &BTreeMap::new())
        .unwrap_err();
    assert_eq!(aggregate.len(), 1);
    assert!(matches!(
        aggregate.errors()[0].kind(),
        ErrorKind::Validation { .. }
    ));
}

#[test]
fn test_validator_passes() {
    let mut resolver = Resolver::new(registry());
    resolver.add_validator(|config| {
        if config.is_set("name") {
            Ok(())
        } else {
            Err(ConfigError::new(ErrorKind::Validation {
                message: "name required".to_string(),
            }))
        }
    });

    let outcome = resolver
        .resolve(".", &["--name", "alice"], &BTreeMap::new())
        .unwrap();
    assert_eq!(resolved(outcome).get_str("name"), Some("alice"));
}

#[test]
fn test_aggregate_display_is_numbered() {
    let resolver = Resolver::new(registry());
    let aggregate = resolver
        .resolve(".", &["--count", "abc"], &BTreeMap::new())
        .unwrap_err();

    let rendered = aggregate.to_string();
    assert!(rendered.starts_with("2 configuration error(s):"));
    assert!(rendered.contains("  1. "));
    assert!(rendered.contains("  2. "));
}
