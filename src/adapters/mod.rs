// SPDX-License-Identifier: Apache-2.0

//! Source adapters feeding the resolution state.
//!
//! Each adapter turns one kind of input into parameter value occurrences and
//! queued files: [`EnvAdapter`] for environment snapshots, [`CliAdapter`] for
//! command-line token streams, and [`FileAdapter`] for sectioned
//! configuration files. Adapters never decide final values; they only append
//! to the state, and the finalizer folds the sequences afterwards.

pub mod cli;
pub mod env;
pub mod file;

pub use cli::CliAdapter;
pub use env::EnvAdapter;
pub use file::FileAdapter;
