// SPDX-License-Identifier: Apache-2.0

//! The resolution service tying the adapters together.
//!
//! [`Resolver`] owns the registry and validators and drives the passes;
//! the finalizer folds the collected state into a
//! [`ResolvedConfig`](crate::domain::ResolvedConfig).

mod finalize;
pub mod resolver;

pub use resolver::{Outcome, Resolver};
