use std::{any::Any, fmt::Display};

use crate::{
    collection::Document,
    common::Value,
    errors::{ErrorKind, RepoError, RepoResult},
};

use super::{basic_filters::validate_field_name, FilterProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ComparisonMode {
    Greater,
    GreaterEqual,
    Lesser,
    LesserEqual,
}

impl Display for ComparisonMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparisonMode::Greater => write!(f, ">"),
            ComparisonMode::GreaterEqual => write!(f, ">="),
            ComparisonMode::Lesser => write!(f, "<"),
            ComparisonMode::LesserEqual => write!(f, "<="),
        }
    }
}

fn validate_comparable(field_name: &str, value: &Value) -> RepoResult<()> {
    match value {
        Value::Null | Value::Document(_) | Value::Array(_) => {
            log::error!(
                "Cannot compare field {} against non comparable value {}",
                field_name,
                value
            );
            Err(RepoError::new(
                &format!(
                    "Cannot compare field {} against a {} value",
                    field_name,
                    value.type_name()
                ),
                ErrorKind::FilterError,
            ))
        }
        _ => Ok(()),
    }
}

/// Orders a field against a scalar search value.
///
/// Only values of the same kind compare: a number never matches a string
/// bound, and a missing field never matches.
pub(crate) struct ComparisonFilter {
    field_name: String,
    field_value: Value,
    comparison_mode: ComparisonMode,
}

impl ComparisonFilter {
    pub(crate) fn new(field_name: String, field_value: Value, comparison_mode: ComparisonMode) -> Self {
        ComparisonFilter {
            field_name,
            field_value,
            comparison_mode,
        }
    }
}

impl Display for ComparisonFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({} {} {})",
            self.field_name, self.comparison_mode, self.field_value
        )
    }
}

impl FilterProvider for ComparisonFilter {
    fn apply(&self, entry: &Document) -> RepoResult<bool> {
        validate_field_name(&self.field_name)?;
        validate_comparable(&self.field_name, &self.field_value)?;

        let value = entry.get(&self.field_name);
        let same_kind = (value.is_number() && self.field_value.is_number())
            || std::mem::discriminant(&value) == std::mem::discriminant(&self.field_value);
        if !same_kind {
            return Ok(false);
        }

        match self.comparison_mode {
            ComparisonMode::Greater => Ok(value > self.field_value),
            ComparisonMode::GreaterEqual => Ok(value >= self.field_value),
            ComparisonMode::Lesser => Ok(value < self.field_value),
            ComparisonMode::LesserEqual => Ok(value <= self.field_value),
        }
    }

    fn has_field(&self) -> bool {
        true
    }

    fn get_field_name(&self) -> RepoResult<String> {
        Ok(self.field_name.clone())
    }

    fn get_field_value(&self) -> RepoResult<Option<Value>> {
        Ok(Some(self.field_value.clone()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Matches documents whose field equals one of a set of values.
pub(crate) struct InFilter {
    field_name: String,
    field_values: Vec<Value>,
}

impl InFilter {
    pub(crate) fn new(field_name: String, field_values: Vec<Value>) -> Self {
        InFilter {
            field_name,
            field_values,
        }
    }

    pub(crate) fn values(&self) -> &[Value] {
        &self.field_values
    }
}

impl Display for InFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} in [{}])", self.field_name, join_values(&self.field_values))
    }
}

impl FilterProvider for InFilter {
    #[inline]
    fn apply(&self, entry: &Document) -> RepoResult<bool> {
        validate_field_name(&self.field_name)?;
        let value = entry.get(&self.field_name);
        Ok(self.field_values.contains(&value))
    }

    fn has_field(&self) -> bool {
        true
    }

    fn get_field_name(&self) -> RepoResult<String> {
        Ok(self.field_name.clone())
    }

    fn get_field_value(&self) -> RepoResult<Option<Value>> {
        Ok(Some(Value::Array(self.field_values.clone())))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub(crate) struct NotInFilter {
    field_name: String,
    field_values: Vec<Value>,
}

impl NotInFilter {
    pub(crate) fn new(field_name: String, field_values: Vec<Value>) -> Self {
        NotInFilter {
            field_name,
            field_values,
        }
    }
}

impl Display for NotInFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} not in [{}])", self.field_name, join_values(&self.field_values))
    }
}

impl FilterProvider for NotInFilter {
    #[inline]
    fn apply(&self, entry: &Document) -> RepoResult<bool> {
        validate_field_name(&self.field_name)?;
        let value = entry.get(&self.field_name);
        Ok(!self.field_values.contains(&value))
    }

    fn has_field(&self) -> bool {
        true
    }

    fn get_field_name(&self) -> RepoResult<String> {
        Ok(self.field_name.clone())
    }

    fn get_field_value(&self) -> RepoResult<Option<Value>> {
        Ok(Some(Value::Array(self.field_values.clone())))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
