// SPDX-License-Identifier: Apache-2.0

//! Configuration file source adapter.
//!
//! Files use a sectioned key/value format: `[section]` headers group plain
//! `key = value` assignments, `#` and `;` start comments, and keys above the
//! first header belong to the unnamed section `""`. Relative file paths are
//! resolved against the resolver's working directory, never against the file
//! that named them.
//!
//! A file either satisfies its preconditions (exists, is a regular file,
//! reads cleanly, parses line by line) or contributes a single fatal error
//! for that file. Once parsed, every assignment is checked independently so
//! one bad key never hides another.

use crate::domain::errors::{AggregateError, ConfigError, ErrorKind, Result};
use crate::domain::param::{Registry, SectionPolicy, UnknownSectionPolicy};
use crate::domain::state::ResolutionState;
use std::fs;
use std::path::{Path, PathBuf};

/// One `key = value` assignment with the section it appeared under.
#[derive(Debug, PartialEq, Eq)]
struct Assignment {
    section: String,
    key: String,
    value: String,
}

/// Reads and applies sectioned configuration files.
#[derive(Debug)]
pub struct FileAdapter {
    working_dir: PathBuf,
}

impl FileAdapter {
    /// Creates an adapter whose relative paths resolve against `working_dir`.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        FileAdapter {
            working_dir: working_dir.into(),
        }
    }

    /// Resolves a queued path: relative paths are joined onto the working
    /// directory, absolute paths pass through.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }

    /// Reads, parses, and applies one configuration file.
    ///
    /// Precondition failures (missing file, unreadable file, malformed line)
    /// are fatal for this file and yield a single error. Assignment-level
    /// failures (unknown keys, grammar errors) are collected so every problem
    /// in the file is reported.
    pub fn process(
        &self,
        path: &Path,
        registry: &Registry,
        state: &mut ResolutionState,
    ) -> std::result::Result<(), AggregateError> {
        let content = self.read(path).map_err(AggregateError::from)?;
        let assignments = match parse_sections(&content) {
            Ok(assignments) => assignments,
            Err(error) => return Err(AggregateError::from(error.with_file(path))),
        };
        tracing::debug!(
            file = %path.display(),
            assignments = assignments.len(),
            "parsed configuration file"
        );

        let mut errors = Vec::new();
        for assignment in assignments {
            if let Some(error) = self.apply(&assignment, registry, state) {
                errors.push(error.with_section(&assignment.section).with_file(path));
            }
        }
        match AggregateError::from_errors(errors) {
            None => Ok(()),
            Some(aggregate) => Err(aggregate),
        }
    }

    fn read(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(ConfigError::new(ErrorKind::FilePrecondition {
                message: "not found or not a regular file".to_string(),
            })
            .with_file(path));
        }
        fs::read_to_string(path).map_err(|e| {
            ConfigError::new(ErrorKind::FilePrecondition {
                message: e.to_string(),
            })
            .with_file(path)
        })
    }

    fn apply(
        &self,
        assignment: &Assignment,
        registry: &Registry,
        state: &mut ResolutionState,
    ) -> Option<ConfigError> {
        let Assignment {
            section,
            key,
            value,
        } = assignment;

        if let Some(param) = registry.by_file_key(section, key) {
            return match param.parse_text(value) {
                Ok(parsed) => {
                    if param.is_file_source() {
                        state.enqueue_file(value.as_str());
                    }
                    state.append(param.name(), parsed);
                    None
                }
                Err(error) => Some(error),
            };
        }

        match registry.section_policy(section) {
            Some(SectionPolicy::Strict) => {
                Some(ConfigError::new(ErrorKind::UnknownKey { key: key.clone() }))
            }
            Some(SectionPolicy::Lenient) => {
                tracing::trace!(%section, %key, "ignoring unregistered key");
                None
            }
            None => match registry.unknown_section_policy() {
                UnknownSectionPolicy::Ignore => {
                    tracing::trace!(%section, "ignoring unregistered section");
                    None
                }
                UnknownSectionPolicy::Report => Some(ConfigError::new(ErrorKind::UnknownSection {
                    section: section.clone(),
                })),
            },
        }
    }
}

/// Parses sectioned key/value content into assignments in file order.
///
/// Stops at the first malformed line; a file that does not parse as a whole
/// is not applied at all.
fn parse_sections(content: &str) -> Result<Vec<Assignment>> {
    let mut assignments = Vec::new();
    let mut section = String::new();

    for (index, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(rest) = line.strip_prefix('[') {
            let Some(name) = rest.strip_suffix(']') else {
                return Err(ConfigError::new(ErrorKind::Syntax {
                    line: index + 1,
                    text: line.to_string(),
                }));
            };
            section = name.trim().to_string();
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(ConfigError::new(ErrorKind::Syntax {
                line: index + 1,
                text: line.to_string(),
            }));
        };
        assignments.push(Assignment {
            section: section.clone(),
            key: key.trim().to_string(),
            value: value.trim().to_string(),
        });
    }
    Ok(assignments)
}
