use crate::collection::{Document, DocumentId};
use crate::common::Value;
use crate::errors::{ErrorKind, RepoError, RepoResult};

/// Conversion between a Rust type and a [`Value`].
///
/// Domain items stored through a repository implement `Convertible` and
/// produce a `Value::Document` from `to_value`.
pub trait Convertible {
    type Output;

    fn to_value(&self) -> RepoResult<Value>;
    fn from_value(value: &Value) -> RepoResult<Self::Output>;
}

fn mapping_error(expected: &str, value: &Value) -> RepoError {
    log::error!("Value {} is not {}", value, expected);
    RepoError::new(
        &format!("Value of type {} is not {}", value.type_name(), expected),
        ErrorKind::ObjectMappingError,
    )
}

impl Convertible for bool {
    type Output = bool;

    fn to_value(&self) -> RepoResult<Value> {
        Ok(Value::Bool(*self))
    }

    fn from_value(value: &Value) -> RepoResult<Self> {
        value.as_bool().ok_or_else(|| mapping_error("a bool", value))
    }
}

impl Convertible for i32 {
    type Output = i32;

    fn to_value(&self) -> RepoResult<Value> {
        Ok(Value::I64(*self as i64))
    }

    fn from_value(value: &Value) -> RepoResult<Self> {
        value
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| mapping_error("an i32", value))
    }
}

impl Convertible for i64 {
    type Output = i64;

    fn to_value(&self) -> RepoResult<Value> {
        Ok(Value::I64(*self))
    }

    fn from_value(value: &Value) -> RepoResult<Self> {
        value.as_i64().ok_or_else(|| mapping_error("an i64", value))
    }
}

impl Convertible for u32 {
    type Output = u32;

    fn to_value(&self) -> RepoResult<Value> {
        Ok(Value::U64(*self as u64))
    }

    fn from_value(value: &Value) -> RepoResult<Self> {
        match value {
            Value::U64(v) => u32::try_from(*v).ok(),
            Value::I64(v) => u32::try_from(*v).ok(),
            _ => None,
        }
        .ok_or_else(|| mapping_error("a u32", value))
    }
}

impl Convertible for u64 {
    type Output = u64;

    fn to_value(&self) -> RepoResult<Value> {
        Ok(Value::U64(*self))
    }

    fn from_value(value: &Value) -> RepoResult<Self> {
        match value {
            Value::U64(v) => Some(*v),
            Value::I64(v) => u64::try_from(*v).ok(),
            _ => None,
        }
        .ok_or_else(|| mapping_error("a u64", value))
    }
}

impl Convertible for f64 {
    type Output = f64;

    fn to_value(&self) -> RepoResult<Value> {
        Ok(Value::F64(*self))
    }

    fn from_value(value: &Value) -> RepoResult<Self> {
        value.as_f64().ok_or_else(|| mapping_error("an f64", value))
    }
}

impl Convertible for String {
    type Output = String;

    fn to_value(&self) -> RepoResult<Value> {
        Ok(Value::String(self.clone()))
    }

    fn from_value(value: &Value) -> RepoResult<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mapping_error("a string", value))
    }
}

impl Convertible for DocumentId {
    type Output = DocumentId;

    fn to_value(&self) -> RepoResult<Value> {
        Ok(Value::Id(self.clone()))
    }

    fn from_value(value: &Value) -> RepoResult<Self> {
        value
            .as_id()
            .cloned()
            .ok_or_else(|| mapping_error("a document id", value))
    }
}

impl Convertible for Document {
    type Output = Document;

    fn to_value(&self) -> RepoResult<Value> {
        Ok(Value::Document(self.clone()))
    }

    fn from_value(value: &Value) -> RepoResult<Self> {
        value
            .as_document()
            .cloned()
            .ok_or_else(|| mapping_error("a document", value))
    }
}

impl<T> Convertible for Option<T>
where
    T: Convertible<Output = T>,
{
    type Output = Option<T>;

    fn to_value(&self) -> RepoResult<Value> {
        match self {
            Some(v) => v.to_value(),
            None => Ok(Value::Null),
        }
    }

    fn from_value(value: &Value) -> RepoResult<Self::Output> {
        match value {
            Value::Null => Ok(None),
            other => Ok(Some(T::from_value(other)?)),
        }
    }
}

impl<T> Convertible for Vec<T>
where
    T: Convertible<Output = T>,
{
    type Output = Vec<T>;

    fn to_value(&self) -> RepoResult<Value> {
        let values = self
            .iter()
            .map(|v| v.to_value())
            .collect::<RepoResult<Vec<Value>>>()?;
        Ok(Value::Array(values))
    }

    fn from_value(value: &Value) -> RepoResult<Self::Output> {
        match value.as_array() {
            Some(values) => values.iter().map(T::from_value).collect(),
            None => Err(mapping_error("an array", value)),
        }
    }
}

/// Converts an item into the document it is stored as.
///
/// Fails with [`ErrorKind::ObjectMappingError`] when the item does not
/// convert into a `Value::Document`.
pub fn to_document<T: Convertible>(item: &T) -> RepoResult<Document> {
    match item.to_value()? {
        Value::Document(document) => Ok(document),
        other => {
            log::error!("Expected Document from Convertible, got {:?}", other);
            Err(RepoError::new(
                "Item must convert into a document",
                ErrorKind::ObjectMappingError,
            ))
        }
    }
}

/// Converts a stored document back into an item.
pub fn from_document<T: Convertible<Output = T>>(document: &Document) -> RepoResult<T> {
    T::from_value(&Value::Document(document.clone()))
}
