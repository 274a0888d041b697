use crate::collection::Document;
use crate::common::{Value, DOC_ID, FIELD_SEPARATOR};
use crate::errors::{ErrorKind, RepoError, RepoResult};
use std::fmt::{Display, Formatter};

/// A single field modification.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOperation {
    /// Sets a field path, creating intermediate documents.
    Set(String, Value),
    /// Removes a field path.
    Unset(String),
    /// Adds a number to a numeric field; a missing field starts at zero.
    Inc(String, Value),
    /// Appends to an array field; a missing field becomes a one element array.
    Push(String, Value),
    /// Moves a field to a new path.
    Rename(String, String),
}

impl Display for UpdateOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateOperation::Set(field, value) => write!(f, "set {} = {}", field, value),
            UpdateOperation::Unset(field) => write!(f, "unset {}", field),
            UpdateOperation::Inc(field, value) => write!(f, "inc {} by {}", field, value),
            UpdateOperation::Push(field, value) => write!(f, "push {} onto {}", value, field),
            UpdateOperation::Rename(from, to) => write!(f, "rename {} to {}", from, to),
        }
    }
}

/// An ordered patch applied to matching documents.
///
/// Operations run in the order they were added. A patch either applies as
/// a whole or leaves the document untouched.
///
/// ```text
/// let update = set("status", "active").inc("logins", 1).unset("token");
/// let changed = update.apply(&mut document)?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    operations: Vec<UpdateOperation>,
}

pub fn set<T: Into<Value>>(field: &str, value: T) -> Update {
    Update::new().set(field, value)
}

pub fn unset(field: &str) -> Update {
    Update::new().unset(field)
}

pub fn inc<T: Into<Value>>(field: &str, amount: T) -> Update {
    Update::new().inc(field, amount)
}

pub fn push<T: Into<Value>>(field: &str, value: T) -> Update {
    Update::new().push(field, value)
}

pub fn rename(from: &str, to: &str) -> Update {
    Update::new().rename(from, to)
}

impl Update {
    pub fn new() -> Update {
        Update {
            operations: Vec::new(),
        }
    }

    pub fn set<T: Into<Value>>(mut self, field: &str, value: T) -> Update {
        self.operations
            .push(UpdateOperation::Set(field.to_string(), value.into()));
        self
    }

    pub fn unset(mut self, field: &str) -> Update {
        self.operations.push(UpdateOperation::Unset(field.to_string()));
        self
    }

    pub fn inc<T: Into<Value>>(mut self, field: &str, amount: T) -> Update {
        self.operations
            .push(UpdateOperation::Inc(field.to_string(), amount.into()));
        self
    }

    pub fn push<T: Into<Value>>(mut self, field: &str, value: T) -> Update {
        self.operations
            .push(UpdateOperation::Push(field.to_string(), value.into()));
        self
    }

    pub fn rename(mut self, from: &str, to: &str) -> Update {
        self.operations
            .push(UpdateOperation::Rename(from.to_string(), to.to_string()));
        self
    }

    pub fn operations(&self) -> &[UpdateOperation] {
        &self.operations
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Checks every field path without touching any document.
    pub fn validate(&self) -> RepoResult<()> {
        for operation in &self.operations {
            match operation {
                UpdateOperation::Set(field, _)
                | UpdateOperation::Unset(field)
                | UpdateOperation::Inc(field, _)
                | UpdateOperation::Push(field, _) => validate_field(field)?,
                UpdateOperation::Rename(from, to) => {
                    validate_field(from)?;
                    validate_field(to)?;
                }
            }
        }
        Ok(())
    }

    /// Applies the patch and reports whether the document changed.
    ///
    /// # Errors
    ///
    /// * [`ErrorKind::InvalidArgument`] when a path is empty or targets `_id`
    /// * [`ErrorKind::UpdateError`] when `inc` meets a non-numeric value or
    ///   overflows, or `push` meets a non-array value
    pub fn apply(&self, document: &mut Document) -> RepoResult<bool> {
        self.validate()?;

        let mut patched = document.clone();
        for operation in &self.operations {
            apply_operation(&mut patched, operation)?;
        }

        if patched.is_identical(document) {
            return Ok(false);
        }
        *document = patched;
        Ok(true)
    }
}

impl Display for Update {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let operations: Vec<String> = self.operations.iter().map(|op| op.to_string()).collect();
        write!(f, "[{}]", operations.join(", "))
    }
}

fn validate_field(field: &str) -> RepoResult<()> {
    if field.is_empty() || field.split(FIELD_SEPARATOR).any(str::is_empty) {
        log::error!("Update field path {:?} is empty or malformed", field);
        return Err(RepoError::new(
            &format!("Invalid update field path '{}'", field),
            ErrorKind::InvalidArgument,
        ));
    }

    let root = field.split(FIELD_SEPARATOR).next().unwrap_or(field);
    if root == DOC_ID {
        log::error!("Update cannot modify the {} field", DOC_ID);
        return Err(RepoError::new(
            &format!("Field {} cannot be updated", DOC_ID),
            ErrorKind::InvalidArgument,
        ));
    }
    Ok(())
}

fn apply_operation(document: &mut Document, operation: &UpdateOperation) -> RepoResult<()> {
    match operation {
        UpdateOperation::Set(field, value) => document.put(field, value.clone()),
        UpdateOperation::Unset(field) => {
            document.remove(field);
            Ok(())
        }
        UpdateOperation::Inc(field, amount) => {
            let current = document.get(field);
            let next = add_numbers(field, &current, amount)?;
            document.put(field, next)
        }
        UpdateOperation::Push(field, value) => match document.get(field) {
            Value::Null => document.put(field, Value::Array(vec![value.clone()])),
            Value::Array(mut values) => {
                values.push(value.clone());
                document.put(field, Value::Array(values))
            }
            other => {
                log::error!("Cannot push onto field {} of type {}", field, other.type_name());
                Err(RepoError::new(
                    &format!("Cannot push onto non-array field {}", field),
                    ErrorKind::UpdateError,
                ))
            }
        },
        UpdateOperation::Rename(from, to) => {
            if from == to || !document.contains_field(from) {
                return Ok(());
            }
            match document.remove(from) {
                Some(value) => document.put(to, value),
                None => Ok(()),
            }
        }
    }
}

fn add_numbers(field: &str, current: &Value, amount: &Value) -> RepoResult<Value> {
    if !amount.is_number() {
        log::error!("Cannot increment field {} by non-numeric {}", field, amount);
        return Err(RepoError::new(
            &format!("Increment amount for {} must be a number", field),
            ErrorKind::UpdateError,
        ));
    }

    let overflow = || {
        log::error!("Incrementing field {} by {} overflows", field, amount);
        RepoError::new(
            &format!("Increment of {} overflows", field),
            ErrorKind::UpdateError,
        )
    };

    match (current, amount) {
        (Value::Null, _) => Ok(amount.clone()),
        (Value::F64(_), _) | (_, Value::F64(_)) if current.is_number() => {
            let sum = current.as_f64().unwrap_or_default() + amount.as_f64().unwrap_or_default();
            Ok(Value::F64(sum))
        }
        (Value::I64(a), Value::I64(b)) => a.checked_add(*b).map(Value::I64).ok_or_else(overflow),
        (Value::U64(a), Value::U64(b)) => a.checked_add(*b).map(Value::U64).ok_or_else(overflow),
        (Value::I64(_), Value::U64(_)) | (Value::U64(_), Value::I64(_)) => {
            let sum = integer(current) + integer(amount);
            if let Ok(v) = i64::try_from(sum) {
                Ok(Value::I64(v))
            } else if let Ok(v) = u64::try_from(sum) {
                Ok(Value::U64(v))
            } else {
                Err(overflow())
            }
        }
        _ => {
            log::error!("Cannot increment field {} of type {}", field, current.type_name());
            Err(RepoError::new(
                &format!("Cannot increment non-numeric field {}", field),
                ErrorKind::UpdateError,
            ))
        }
    }
}

fn integer(value: &Value) -> i128 {
    match value {
        Value::I64(v) => *v as i128,
        Value::U64(v) => *v as i128,
        _ => 0,
    }
}
