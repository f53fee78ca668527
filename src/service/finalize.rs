// SPDX-License-Identifier: Apache-2.0

//! Folds collected occurrences into the final record.

use crate::domain::errors::{AggregateError, ConfigError, ErrorKind};
use crate::domain::param::{Collector, Registry};
use crate::domain::record::{FieldValue, ResolvedConfig, Validator};
use crate::domain::state::ResolutionState;
use std::collections::BTreeMap;

/// Runs every parameter's collector over its occurrence sequence, then runs
/// the validators over the finished record.
///
/// Collector failures for different parameters are independent and are all
/// reported. Validators only run when every collector succeeded, because
/// they need the complete record; their failures are aggregated too.
pub(crate) fn finish(
    mut state: ResolutionState,
    registry: &Registry,
    validators: &[Validator],
) -> Result<ResolvedConfig, AggregateError> {
    let mut fields = BTreeMap::new();
    let mut errors = Vec::new();

    for param in registry.params() {
        let name = param.name();
        let values = state.take_values(name);
        let default = state.default_of(name).cloned();

        let field = match param.collector() {
            Collector::Singleton => match (values.len(), default) {
                (1, _) => Ok(FieldValue::One(values.into_iter().next().unwrap())),
                (0, Some(default)) => Ok(FieldValue::One(default)),
                (found, _) => Err(ErrorKind::Multiplicity {
                    expected: "exactly one",
                    found,
                }),
            },
            Collector::Optional => match (values.len(), default) {
                (1, _) => Ok(FieldValue::One(values.into_iter().next().unwrap())),
                (0, Some(default)) => Ok(FieldValue::One(default)),
                (0, None) => Ok(FieldValue::None),
                (found, _) => Err(ErrorKind::Multiplicity {
                    expected: "at most one",
                    found,
                }),
            },
            Collector::Accumulate => match (values.is_empty(), default) {
                (true, Some(default)) => Ok(FieldValue::Many(vec![default])),
                (true, None) => Ok(FieldValue::Many(Vec::new())),
                (false, _) => Ok(FieldValue::Many(values)),
            },
            Collector::FlagCount => Ok(FieldValue::Count(values.len() as u64)),
        };

        match field {
            Ok(field) => {
                fields.insert(name.clone(), field);
            }
            Err(kind) => errors.push(ConfigError::new(kind).with_param(name)),
        }
    }

    if let Some(aggregate) = AggregateError::from_errors(errors) {
        return Err(aggregate);
    }

    let config = ResolvedConfig::new(fields);
    let validation_errors: Vec<ConfigError> = validators
        .iter()
        .filter_map(|validate| validate(&config).err())
        .collect();
    match AggregateError::from_errors(validation_errors) {
        None => Ok(config),
        Some(aggregate) => Err(aggregate),
    }
}
