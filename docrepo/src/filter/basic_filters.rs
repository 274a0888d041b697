use std::{any::Any, fmt::Display};

use crate::{
    collection::Document,
    common::Value,
    errors::{ErrorKind, RepoError, RepoResult},
};

use super::FilterProvider;

pub(crate) fn validate_field_name(field_name: &str) -> RepoResult<()> {
    if field_name.is_empty() {
        log::error!("Filter field name cannot be empty");
        return Err(RepoError::new(
            "Filter field name cannot be empty",
            ErrorKind::FilterError,
        ));
    }
    Ok(())
}

pub(crate) struct AllFilter;

impl FilterProvider for AllFilter {
    fn apply(&self, _entry: &Document) -> RepoResult<bool> {
        Ok(true)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Display for AllFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AllFilter")
    }
}

/// Matches documents whose field equals a value.
pub(crate) struct EqualsFilter {
    field_name: String,
    field_value: Value,
}

impl EqualsFilter {
    #[inline]
    pub(crate) fn new(field_name: String, field_value: Value) -> Self {
        EqualsFilter {
            field_name,
            field_value,
        }
    }
}

impl Display for EqualsFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} == {})", self.field_name, self.field_value)
    }
}

impl FilterProvider for EqualsFilter {
    #[inline]
    fn apply(&self, entry: &Document) -> RepoResult<bool> {
        validate_field_name(&self.field_name)?;
        Ok(entry.get(&self.field_name) == self.field_value)
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

pub(crate) struct NotEqualsFilter {
    field_name: String,
    field_value: Value,
}

impl NotEqualsFilter {
    #[inline]
    pub(crate) fn new(field_name: String, field_value: Value) -> Self {
        NotEqualsFilter {
            field_name,
            field_value,
        }
    }
}

impl Display for NotEqualsFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} != {})", self.field_name, self.field_value)
    }
}

impl FilterProvider for NotEqualsFilter {
    #[inline]
    fn apply(&self, entry: &Document) -> RepoResult<bool> {
        validate_field_name(&self.field_name)?;
        Ok(entry.get(&self.field_name) != self.field_value)
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

/// Matches documents where a field is present (or absent, when negated).
pub(crate) struct ExistsFilter {
    field_name: String,
    exists: bool,
}

impl ExistsFilter {
    pub(crate) fn new(field_name: String, exists: bool) -> Self {
        ExistsFilter { field_name, exists }
    }
}

impl Display for ExistsFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.exists {
            write!(f, "({} exists)", self.field_name)
        } else {
            write!(f, "({} not exists)", self.field_name)
        }
    }
}

impl FilterProvider for ExistsFilter {
    fn apply(&self, entry: &Document) -> RepoResult<bool> {
        validate_field_name(&self.field_name)?;
        Ok(entry.contains_field(&self.field_name) == self.exists)
    }

    fn has_field(&self) -> bool {
        true
    }

    fn get_field_name(&self) -> RepoResult<String> {
        Ok(self.field_name.clone())
    }

    fn get_field_value(&self) -> RepoResult<Option<Value>> {
        Ok(None)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
