//! Value validators for configuration entries.
//!
//! Every configuration key is paired with one of these validators; raw
//! document values are coerced into [`ConfigValue`]s on the way in, or
//! rejected. Validators are pure: no I/O beyond reading the process
//! environment for `~` and working-directory expansion of paths.
//!
//! Failures distinguish two kinds:
//! - [`ValidationError::WrongType`]: the raw value has an inappropriate
//!   shape for the validator (a list where a number is required).
//! - [`ValidationError::Invalid`]: the shape is acceptable but the value
//!   is semantically rejected (out of range, unknown name).

use crate::paths::{absolutize, expand_user};
use crate::value::ConfigValue;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

/// Rejection reported by a validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The raw value has the wrong shape entirely.
    #[error("expected {expected}, got {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    /// The raw value has an acceptable shape but is semantically invalid.
    #[error("{0}")]
    Invalid(String),
}

/// Describe a raw document value's kind for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

/// The validator applied to a configuration key.
///
/// List validators carry an optional exact-length constraint, so a
/// "list of exactly N numbers" is a parameterization rather than a
/// separate validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    Bool,
    /// Number strictly greater than zero.
    Positive,
    /// Diagnostic strictness: integer 1-5 or a named alias.
    CheckLevel,
    IntOrNone,
    PositiveIntOrNone,
    Str,
    StrOrNone,
    /// Comma-split when given as a single string; duplicates preserved.
    StrList,
    FloatList(Option<usize>),
    IntList(Option<usize>),
    /// `~`-expanded, absolute filesystem path.
    Path,
    PathOrNone,
    /// Diagnostic selection patterns, collected into a set.
    Diagnostics,
    /// Structured project entry; converted during validated insertion.
    Project,
}

impl Validator {
    /// Coerce a raw value into a typed one, or reject it.
    pub fn validate(self, raw: &Value) -> Result<ConfigValue, ValidationError> {
        match self {
            Validator::Bool => validate_bool(raw),
            Validator::Positive => validate_positive(raw),
            Validator::CheckLevel => validate_check_level(raw),
            Validator::IntOrNone => validate_int_or_none(raw, false),
            Validator::PositiveIntOrNone => validate_int_or_none(raw, true),
            Validator::Str => validate_string(raw),
            Validator::StrOrNone => match raw {
                Value::Null => Ok(ConfigValue::None),
                _ => validate_string(raw),
            },
            Validator::StrList => validate_string_list(raw),
            Validator::FloatList(n) => {
                Ok(ConfigValue::FloatList(validate_numeric_list(raw, n)?))
            }
            Validator::IntList(n) => {
                let floats = validate_numeric_list(raw, n)?;
                Ok(ConfigValue::IntList(floats.into_iter().map(|f| f as i64).collect()))
            }
            Validator::Path => validate_path(raw),
            Validator::PathOrNone => match raw {
                Value::Null => Ok(ConfigValue::None),
                _ => validate_path(raw),
            },
            Validator::Diagnostics => validate_diagnostics(raw),
            // Project substructures need the key name and may fail with
            // structural errors; ValidatedConfig::set converts them.
            Validator::Project => Err(ValidationError::Invalid(
                "project data is validated as a structured entry".to_string(),
            )),
        }
    }
}

fn validate_bool(raw: &Value) -> Result<ConfigValue, ValidationError> {
    match raw {
        Value::Bool(b) => Ok(ConfigValue::Bool(*b)),
        other => Err(ValidationError::Invalid(format!(
            "expected `true` or `false`, got {}",
            value_kind(other)
        ))),
    }
}

fn validate_positive(raw: &Value) -> Result<ConfigValue, ValidationError> {
    let Value::Number(n) = raw else {
        return Err(ValidationError::WrongType {
            expected: "a number",
            found: value_kind(raw),
        });
    };
    let f = n.as_f64().unwrap_or(f64::NAN);
    if !(f > 0.0) {
        return Err(ValidationError::Invalid(format!(
            "expected a positive number, got {n}"
        )));
    }
    match n.as_i64() {
        Some(i) => Ok(ConfigValue::Int(i)),
        None => Ok(ConfigValue::Float(f)),
    }
}

fn validate_check_level(raw: &Value) -> Result<ConfigValue, ValidationError> {
    match raw {
        Value::Number(n) => {
            let level = n.as_i64().ok_or_else(|| {
                ValidationError::Invalid(format!("expected an integer level, got {n}"))
            })?;
            if (1..=5).contains(&level) {
                Ok(ConfigValue::Int(level))
            } else {
                Err(ValidationError::Invalid(format!(
                    "check level must be between 1 and 5, got {level}"
                )))
            }
        }
        Value::String(name) => match name.to_lowercase().as_str() {
            "debug" => Ok(ConfigValue::Int(1)),
            "info" => Ok(ConfigValue::Int(2)),
            "default" => Ok(ConfigValue::Int(3)),
            "warning" => Ok(ConfigValue::Int(4)),
            _ => Err(ValidationError::Invalid(format!(
                "unknown check level `{name}`"
            ))),
        },
        other => Err(ValidationError::WrongType {
            expected: "an integer or level name",
            found: value_kind(other),
        }),
    }
}

fn validate_int_or_none(raw: &Value, positive: bool) -> Result<ConfigValue, ValidationError> {
    match raw {
        Value::Null => Ok(ConfigValue::None),
        Value::Number(n) => {
            let i = n.as_i64().ok_or_else(|| {
                ValidationError::Invalid(format!("expected an integer, got {n}"))
            })?;
            if positive && i <= 0 {
                return Err(ValidationError::Invalid(format!(
                    "expected a positive integer, got {i}"
                )));
            }
            Ok(ConfigValue::Int(i))
        }
        other => Err(ValidationError::WrongType {
            expected: "an integer or null",
            found: value_kind(other),
        }),
    }
}

fn validate_string(raw: &Value) -> Result<ConfigValue, ValidationError> {
    match raw {
        Value::String(s) => Ok(ConfigValue::Str(s.clone())),
        other => Err(ValidationError::WrongType {
            expected: "a string",
            found: value_kind(other),
        }),
    }
}

/// Split a comma-separated string, dropping empty tokens.
///
/// Duplicates pass through untouched.
fn split_commas(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|tok| !tok.is_empty())
        .map(str::to_string)
        .collect()
}

fn validate_string_list(raw: &Value) -> Result<ConfigValue, ValidationError> {
    match raw {
        Value::String(s) => Ok(ConfigValue::StrList(split_commas(s))),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => out.push(s.clone()),
                    Value::Number(n) => out.push(n.to_string()),
                    other => {
                        return Err(ValidationError::Invalid(format!(
                            "list elements must be strings, got {}",
                            value_kind(other)
                        )));
                    }
                }
            }
            Ok(ConfigValue::StrList(out))
        }
        other => Err(ValidationError::Invalid(format!(
            "expected a string or list of strings, got {}",
            value_kind(other)
        ))),
    }
}

fn numeric_item(item: &Value) -> Result<f64, ValidationError> {
    match item {
        Value::Number(n) => Ok(n.as_f64().unwrap_or(f64::NAN)),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            ValidationError::Invalid(format!("could not convert `{s}` to a number"))
        }),
        other => Err(ValidationError::Invalid(format!(
            "list elements must be numbers, got {}",
            value_kind(other)
        ))),
    }
}

fn validate_numeric_list(raw: &Value, n: Option<usize>) -> Result<Vec<f64>, ValidationError> {
    let items = match raw {
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|tok| !tok.is_empty())
            .map(|tok| numeric_item(&Value::String(tok.to_string())))
            .collect::<Result<Vec<_>, _>>()?,
        Value::Array(items) => items
            .iter()
            .map(numeric_item)
            .collect::<Result<Vec<_>, _>>()?,
        other => {
            return Err(ValidationError::Invalid(format!(
                "expected a comma-separated string or list of numbers, got {}",
                value_kind(other)
            )));
        }
    };
    if let Some(expected) = n
        && items.len() != expected
    {
        return Err(ValidationError::Invalid(format!(
            "expected {expected} values, got {}",
            items.len()
        )));
    }
    Ok(items)
}

fn validate_path(raw: &Value) -> Result<ConfigValue, ValidationError> {
    match raw {
        Value::String(s) => {
            let expanded = expand_user(Path::new(s));
            Ok(ConfigValue::Path(absolutize(&expanded)))
        }
        other => Err(ValidationError::Invalid(format!(
            "expected a path, got {}",
            value_kind(other)
        ))),
    }
}

/// Turn a diagnostic selector into a path pattern.
///
/// A bare group name selects everything below it.
fn diagnostic_pattern(token: &str) -> String {
    if token.contains('/') {
        token.to_string()
    } else {
        format!("{token}/*")
    }
}

fn validate_diagnostics(raw: &Value) -> Result<ConfigValue, ValidationError> {
    let mut patterns = BTreeSet::new();
    match raw {
        Value::String(s) => {
            patterns.extend(s.split_whitespace().map(diagnostic_pattern));
        }
        Value::Array(items) => {
            for item in items {
                let Value::String(s) = item else {
                    return Err(ValidationError::WrongType {
                        expected: "a string or list of strings",
                        found: value_kind(item),
                    });
                };
                patterns.extend(s.split_whitespace().map(diagnostic_pattern));
            }
        }
        other => {
            return Err(ValidationError::WrongType {
                expected: "a string or list of strings",
                found: value_kind(other),
            });
        }
    }
    Ok(ConfigValue::StrSet(patterns))
}
