// SPDX-License-Identifier: Apache-2.0

//! A layered configuration-resolution engine.
//!
//! This crate merges three independent configuration sources — process
//! environment variables, sectioned on-disk configuration files, and raw
//! command-line tokens — into a single validated, strongly-typed
//! configuration record.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types (`Parameter`, `Registry`, `ResolutionState`,
//!   `ResolvedConfig`, errors)
//! - **Ports**: Trait definitions that define interfaces (`ValueParser`)
//! - **Adapters**: One adapter per raw input channel (environment,
//!   command line, sectioned files)
//! - **Service**: The `Resolver`, which orchestrates a single resolution pass
//!
//! # Resolution model
//!
//! Every parameter is declared once, up front, in a [`Registry`](domain::Registry):
//! a name, a value parser, an optional default, a collector policy, and its
//! bindings to each source. A [`Resolver`](service::Resolver) then runs one
//! synchronous pass: defaults are seeded, every environment entry is fed
//! through the environment adapter, every CLI token through the command-line
//! adapter, and any configuration files discovered along the way are drained
//! recursively after each source event. A finalizer folds the accumulated
//! values into one typed record and runs validators.
//!
//! Three properties distinguish this engine from a first-value-wins lookup:
//!
//! - **All errors are aggregated.** A user fixing their invocation sees every
//!   independent mistake at once, each tagged with its origin (parameter,
//!   flag, environment variable, file, section).
//! - **Files can enqueue further files.** A value found in any source may
//!   name a configuration file, which is processed to completion — relative
//!   paths always resolve against the original working directory.
//! - **Special actions short-circuit.** Flags like `--help` preempt
//!   collection and validation entirely.
//!
//! # Quick Start
//!
//! ```rust
//! use layercfg::prelude::*;
//! use std::collections::BTreeMap;
//!
//! let mut registry = Registry::new();
//! registry
//!     .register(Parameter::string("name").flag("--name").env_var("APP_NAME"))
//!     .register(Parameter::int("count").flag("--count").default_text("1"))
//!     .register(Parameter::counter("verbose").flag("--verbose"));
//!
//! let resolver = Resolver::new(registry);
//! let tokens = ["--name", "alice", "--count", "3"];
//! let outcome = resolver.resolve(".", &tokens, &BTreeMap::new()).unwrap();
//!
//! match outcome {
//!     Outcome::Resolved(config) => {
//!         assert_eq!(config.get_str("name"), Some("alice"));
//!         assert_eq!(config.get_i64("count"), Some(3));
//!         assert_eq!(config.get_count("verbose"), Some(0));
//!     }
//!     Outcome::Special(action) => println!("special action: {action}"),
//! }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for
/// convenient access.
pub mod prelude {
    pub use crate::domain::{
        AggregateError, Collector, ConfigError, ErrorKind, FieldValue, ParamName, Parameter,
        Registry, ResolutionState, ResolvedConfig, Result, SectionPolicy, SpecialAction,
        UnknownSectionPolicy, Value,
    };
    pub use crate::ports::{
        BoolParser, FloatParser, IntParser, PathParser, StringParser, ValueParser,
    };
    pub use crate::service::{Outcome, Resolver};
}
