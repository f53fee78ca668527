// SPDX-License-Identifier: Apache-2.0

//! Ports (interfaces) through which the domain talks to the outside.
//!
//! The only port the resolution engine needs is the value parser: the seam
//! where raw text from a source becomes a typed value. Source adapters live
//! in [`crate::adapters`] and are concrete rather than trait-shaped because
//! the set of layers is closed.

pub mod parser;

pub use parser::{BoolParser, FloatParser, IntParser, PathParser, StringParser, ValueParser};
