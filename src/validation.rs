//! Field-path qualified validation errors.
//!
//! Every model exposes [`Validate::get_validated`], which either hands back a
//! sanitized copy or a [`ValidationError`] listing each offending field. Nested
//! models prefix the paths reported by their children, so an error on the third
//! bill's amount surfaces as `bills.2.amount`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Aggregate code attached to every validation failure.
pub const INVALID_DATA_CODE: &str = "INVALID_DATA";

/// Aggregate message attached to every validation failure.
pub const INVALID_DATA_MESSAGE: &str = "One or more fields was either missing or invalid.";

/// Why a single field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldCode {
    Missing,
    BadEnumChoice,
    OutOfRange,
    BadDate,
    BadUuid,
    TooMany,
}

impl FieldCode {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldCode::Missing => "MISSING",
            FieldCode::BadEnumChoice => "BAD_ENUM_CHOICE",
            FieldCode::OutOfRange => "OUT_OF_RANGE",
            FieldCode::BadDate => "BAD_DATE",
            FieldCode::BadUuid => "BAD_UUID",
            FieldCode::TooMany => "TOO_MANY",
        }
    }
}

impl fmt::Display for FieldCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem with one field, located by a dotted path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidField {
    pub field_name: String,
    pub code: FieldCode,
    pub message: String,
}

impl InvalidField {
    pub fn new(field_name: impl Into<String>, code: FieldCode, message: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            code,
            message: message.into(),
        }
    }

    fn prefixed(mut self, prefix: &str) -> Self {
        self.field_name = if self.field_name.is_empty() {
            prefix.to_string()
        } else {
            format!("{}.{}", prefix, self.field_name)
        };
        self
    }
}

/// One or more invalid fields. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(try_from = "FieldList")]
#[error("Errors involving these fields: {}", joined_names(.fields))]
pub struct ValidationError {
    fields: Vec<InvalidField>,
}

#[derive(Deserialize)]
struct FieldList {
    fields: Vec<InvalidField>,
}

impl TryFrom<FieldList> for ValidationError {
    type Error = String;

    fn try_from(list: FieldList) -> Result<Self, Self::Error> {
        if list.fields.is_empty() {
            return Err("a validation error must list at least one field".to_string());
        }
        Ok(Self {
            fields: list.fields,
        })
    }
}

impl ValidationError {
    /// Builds an error carrying a single field entry.
    pub fn new(field_name: impl Into<String>, code: FieldCode, message: impl Into<String>) -> Self {
        Self {
            fields: vec![InvalidField::new(field_name, code, message)],
        }
    }

    pub fn code(&self) -> &'static str {
        INVALID_DATA_CODE
    }

    pub fn message(&self) -> &'static str {
        INVALID_DATA_MESSAGE
    }

    pub fn fields(&self) -> &[InvalidField] {
        &self.fields
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.field_name.as_str()).collect()
    }

    /// Returns the first entry reported for `field_name`, if any.
    pub fn field(&self, field_name: &str) -> Option<&InvalidField> {
        self.fields.iter().find(|f| f.field_name == field_name)
    }

    pub fn has(&self, field_name: &str, code: FieldCode) -> bool {
        self.fields
            .iter()
            .any(|f| f.field_name == field_name && f.code == code)
    }

    /// Nests every entry under `prefix`. Entries without a path take the prefix itself.
    pub fn with_context(self, prefix: &str) -> Self {
        Self {
            fields: self
                .fields
                .into_iter()
                .map(|field| field.prefixed(prefix))
                .collect(),
        }
    }

    /// Appends the entries of `other`, keeping order.
    pub fn merge(mut self, other: ValidationError) -> Self {
        self.fields.extend(other.fields);
        self
    }
}

fn joined_names(fields: &[InvalidField]) -> String {
    fields
        .iter()
        .map(|f| f.field_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Combines several optional errors; `None` when nothing failed.
pub fn combine<I>(errors: I) -> Option<ValidationError>
where
    I: IntoIterator<Item = Option<ValidationError>>,
{
    let mut collector = ErrorCollector::new();
    for err in errors.into_iter().flatten() {
        collector.merge(err);
    }
    collector.into_error()
}

/// Prefixes the field paths of `error`, if present.
pub fn add_context(error: Option<ValidationError>, prefix: &str) -> Option<ValidationError> {
    error.map(|err| err.with_context(prefix))
}

/// Accumulates field errors while a model validates its parts.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    fields: Vec<InvalidField>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn push(&mut self, field_name: impl Into<String>, code: FieldCode, message: impl Into<String>) {
        self.fields.push(InvalidField::new(field_name, code, message));
    }

    pub fn merge(&mut self, error: ValidationError) {
        self.fields.extend(error.fields);
    }

    pub fn merge_with_context(&mut self, prefix: &str, error: ValidationError) {
        self.merge(error.with_context(prefix));
    }

    /// Records the error of `result` under `prefix` and returns the clean value on success.
    pub fn check<T>(&mut self, prefix: &str, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) if prefix.is_empty() => {
                self.merge(err);
                None
            }
            Err(err) => {
                self.merge_with_context(prefix, err);
                None
            }
        }
    }

    pub fn into_error(self) -> Option<ValidationError> {
        if self.fields.is_empty() {
            None
        } else {
            Some(ValidationError {
                fields: self.fields,
            })
        }
    }

    /// Returns `value` when nothing was collected, otherwise the aggregate error.
    pub fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        match self.into_error() {
            None => Ok(value),
            Some(err) => Err(err),
        }
    }

    /// Lazy variant of [`ErrorCollector::finish`]; `build` only runs on success.
    pub fn finish_with<T>(self, build: impl FnOnce() -> T) -> Result<T, ValidationError> {
        match self.into_error() {
            None => Ok(build()),
            Some(err) => Err(err),
        }
    }
}

/// Implemented by every value that can sanitize itself.
pub trait Validate {
    type Clean;

    fn get_validated(&self) -> Result<Self::Clean, ValidationError>;
}

/// Validates each element, prefixing failures with the element's index.
/// The clean list is only returned when no element failed.
pub fn validate_list<T: Validate>(items: &[T]) -> Result<Vec<T::Clean>, ValidationError> {
    let mut collector = ErrorCollector::new();
    let mut clean = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        if let Some(value) = collector.check(&idx.to_string(), item.get_validated()) {
            clean.push(value);
        }
    }
    collector.finish(clean)
}

/// Returns true when `input` only holds whitespace.
pub fn is_blank(input: &str) -> bool {
    input.trim().is_empty()
}
