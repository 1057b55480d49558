//! The single validation routine shared by every record kind.

use serde_json::{Map, Value};

use super::RecordKind;
use super::constraints::{FieldSpec, FieldType};

/// Pseudo-field name used when the input as a whole is unusable.
pub const ROOT_FIELD: &str = "$";

/// Why a single field was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FailureReason {
    /// A required field is absent.
    #[error("field required")]
    Missing,
    /// The value has the wrong JSON type.
    #[error("expected {expected}")]
    WrongType {
        /// Type the field must carry.
        expected: FieldType,
    },
    /// A number is below its lower bound.
    #[error("must be greater than or equal to {min}")]
    BelowMinimum {
        /// Inclusive lower bound.
        min: f64,
    },
    /// A number is above its upper bound.
    #[error("must be less than or equal to {max}")]
    AboveMaximum {
        /// Inclusive upper bound.
        max: f64,
    },
    /// Text is shorter than allowed.
    #[error("must have at least {min} characters (got {actual})")]
    TooShort {
        /// Inclusive lower bound.
        min: usize,
        /// Characters supplied.
        actual: usize,
    },
    /// Text is longer than allowed.
    #[error("must have at most {max} characters (got {actual})")]
    TooLong {
        /// Inclusive upper bound.
        max: usize,
        /// Characters supplied.
        actual: usize,
    },
    /// The input is not a JSON object.
    #[error("expected a JSON object")]
    NotAnObject,
    /// The checked input could not be converted into the typed record.
    #[error("could not build record: {0}")]
    Undecodable(String),
    /// The request body is not a readable JSON document.
    #[error("invalid JSON body: {0}")]
    MalformedBody(String),
}

/// A rejected field and the reason.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{field}: {reason}")]
pub struct FieldFailure {
    /// Field path, e.g. `price` or `tags[2]`.
    pub field: String,
    /// What was wrong with it.
    pub reason: FailureReason,
}

impl FieldFailure {
    fn new(field: impl Into<String>, reason: FailureReason) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }
}

/// Every failing field of one validation attempt.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("invalid {kind}: {}", summarize(.failures))]
pub struct ValidationError {
    kind: RecordKind,
    failures: Vec<FieldFailure>,
}

impl ValidationError {
    pub(crate) fn undecodable(kind: RecordKind, err: &serde_json::Error) -> Self {
        Self {
            kind,
            failures: vec![FieldFailure::new(
                ROOT_FIELD,
                FailureReason::Undecodable(err.to_string()),
            )],
        }
    }

    /// The body meant to hold a `kind` record could not be read as JSON.
    #[must_use]
    pub fn malformed_body(kind: RecordKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            failures: vec![FieldFailure::new(
                ROOT_FIELD,
                FailureReason::MalformedBody(reason.into()),
            )],
        }
    }

    /// Record kind that failed validation.
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        self.kind
    }

    /// All failing fields, in declaration order.
    #[must_use]
    pub fn failures(&self) -> &[FieldFailure] {
        &self.failures
    }

    /// Whether the given field is among the failures.
    #[must_use]
    pub fn has_failure(&self, field: &str) -> bool {
        self.failures.iter().any(|f| f.field == field)
    }

    /// Consumes the error and returns the failures.
    #[must_use]
    pub fn into_failures(self) -> Vec<FieldFailure> {
        self.failures
    }
}

fn summarize(failures: &[FieldFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check untyped input against a record kind's constraint table.
///
/// Returns the normalized field map: only declared fields, defaults filled
/// in, nulls and absent optionals removed, whole floats in integer fields
/// converted to integers. Unknown keys are dropped.
///
/// # Errors
///
/// Returns a [`ValidationError`] listing every failing field.
pub fn check(kind: RecordKind, input: &Value) -> Result<Map<String, Value>, ValidationError> {
    let Some(object) = input.as_object() else {
        return Err(ValidationError {
            kind,
            failures: vec![FieldFailure::new(ROOT_FIELD, FailureReason::NotAnObject)],
        });
    };

    let mut normalized = Map::new();
    let mut failures = Vec::new();

    for spec in kind.fields() {
        match object.get(spec.name) {
            None | Some(Value::Null) if !spec.required => {
                if let Some(default) = spec.default.value() {
                    normalized.insert(spec.name.to_owned(), default);
                }
            }
            None => failures.push(FieldFailure::new(spec.name, FailureReason::Missing)),
            Some(value) => match check_value(spec, value) {
                Ok(value) => {
                    normalized.insert(spec.name.to_owned(), value);
                }
                Err(mut field_failures) => failures.append(&mut field_failures),
            },
        }
    }

    if failures.is_empty() {
        Ok(normalized)
    } else {
        Err(ValidationError { kind, failures })
    }
}

fn check_value(spec: &FieldSpec, value: &Value) -> Result<Value, Vec<FieldFailure>> {
    let wrong_type = || {
        vec![FieldFailure::new(
            spec.name,
            FailureReason::WrongType { expected: spec.ty },
        )]
    };

    match spec.ty {
        FieldType::Text => {
            let text = value.as_str().ok_or_else(wrong_type)?;
            check_length(spec, text).map_err(|reason| vec![FieldFailure::new(spec.name, reason)])?;
            Ok(value.clone())
        }
        FieldType::Number => {
            let n = value.as_f64().ok_or_else(wrong_type)?;
            check_range(spec, n).map_err(|reason| vec![FieldFailure::new(spec.name, reason)])?;
            Ok(value.clone())
        }
        FieldType::Integer => {
            let n = as_integer(spec, value)
                .map_err(|reason| vec![FieldFailure::new(spec.name, reason)])?;
            Ok(Value::from(n))
        }
        FieldType::Boolean => {
            if value.is_boolean() {
                Ok(value.clone())
            } else {
                Err(wrong_type())
            }
        }
        FieldType::TextList => {
            let items = value.as_array().ok_or_else(wrong_type)?;
            let failures: Vec<FieldFailure> = items
                .iter()
                .enumerate()
                .filter(|(_, item)| !item.is_string())
                .map(|(i, _)| {
                    FieldFailure::new(
                        format!("{}[{i}]", spec.name),
                        FailureReason::WrongType {
                            expected: FieldType::Text,
                        },
                    )
                })
                .collect();
            if failures.is_empty() {
                Ok(value.clone())
            } else {
                Err(failures)
            }
        }
    }
}

/// 2^63, the first whole number past `i64::MAX`.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// A whole number within the field's bounds and `i64`.
///
/// Whole floats (`30.0`) count as integers. Whole numbers too large or small
/// for `i64` are out of range, not of the wrong type.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn as_integer(spec: &FieldSpec, value: &Value) -> Result<i64, FailureReason> {
    let n = if let Some(n) = value.as_i64() {
        n
    } else {
        let f = value
            .as_f64()
            .filter(|f| f.fract() == 0.0)
            .ok_or(FailureReason::WrongType { expected: spec.ty })?;
        check_range(spec, f)?;
        if f >= I64_LIMIT {
            return Err(FailureReason::AboveMaximum {
                max: i64::MAX as f64,
            });
        }
        if f < -I64_LIMIT {
            return Err(FailureReason::BelowMinimum {
                min: i64::MIN as f64,
            });
        }
        f as i64
    };

    check_range(spec, n as f64)?;
    Ok(n)
}

fn check_length(spec: &FieldSpec, text: &str) -> Result<(), FailureReason> {
    let actual = text.chars().count();
    if let Some(min) = spec.min_len
        && actual < min
    {
        return Err(FailureReason::TooShort { min, actual });
    }
    if let Some(max) = spec.max_len
        && actual > max
    {
        return Err(FailureReason::TooLong { max, actual });
    }
    Ok(())
}

fn check_range(spec: &FieldSpec, n: f64) -> Result<(), FailureReason> {
    if let Some(min) = spec.min
        && n < min
    {
        return Err(FailureReason::BelowMinimum { min });
    }
    if let Some(max) = spec.max
        && n > max
    {
        return Err(FailureReason::AboveMaximum { max });
    }
    Ok(())
}
