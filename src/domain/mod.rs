// SPDX-License-Identifier: Apache-2.0

//! Domain layer containing core business logic and types.
//!
//! This module contains the core domain types for the resolution engine:
//! parameter declarations and their registry, the mutable resolution state,
//! the resolved record, and the error model. It is independent of any
//! external concerns.

pub mod errors;
pub mod param;
pub mod param_name;
pub mod record;
pub mod state;
pub mod value;

// Re-export commonly used types
pub use errors::{AggregateError, ConfigError, ErrorContext, ErrorKind, Result};
pub use param::{
    Collector, FlagAction, Parameter, Registry, SectionPolicy, SpecialAction,
    UnknownSectionPolicy,
};
pub use param_name::ParamName;
pub use record::{FieldValue, ResolvedConfig, Validator};
pub use state::ResolutionState;
pub use value::Value;
