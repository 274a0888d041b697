use crate::collection::DocumentId;
use crate::common::{Value, DOC_ID, FIELD_SEPARATOR, RESERVED_FIELDS};
use crate::errors::{ErrorKind, RepoError, RepoResult};
use im::OrdMap;
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::{Debug, Display};

type FieldVec = SmallVec<[String; 8]>;

/// The stored representation of an item.
///
/// A document is an ordered map of field names to [Value]s backed by a
/// persistent map, so cloning is cheap. Nested fields are addressed with
/// `.` separated paths: for `{"a": {"b": 1}}`, `document.get("a.b")`
/// returns `1`. A path segment that is a number indexes into an array.
///
/// The `_id` field is reserved. It can only hold a [DocumentId] and the
/// store assigns one during insertion when the document has none.
#[derive(Clone, Eq, PartialEq, Default, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Document {
    data: OrdMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: OrdMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of top-level fields, including `_id`.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Associates a value with a field path.
    ///
    /// Intermediate documents are created for nested paths, replacing any
    /// non-document value found on the way.
    ///
    /// # Errors
    ///
    /// * the key or one of its path segments is empty
    /// * the key is `_id` and the value is not a [DocumentId]
    ///
    /// ```text
    /// let mut doc = Document::new();
    /// doc.put("user.name", "Alice")?;
    /// assert_eq!(doc.get("user.name"), Value::from("Alice"));
    /// ```
    pub fn put<T: Into<Value>>(&mut self, key: &str, value: T) -> RepoResult<()> {
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(RepoError::new(
                "Document does not support empty key",
                ErrorKind::InvalidArgument,
            ));
        }

        let value = value.into();
        if key == DOC_ID && !value.is_id() {
            log::error!("Field {} only accepts a document id, got {}", DOC_ID, value.type_name());
            return Err(RepoError::new(
                &format!("Field {} only accepts a document id", DOC_ID),
                ErrorKind::InvalidArgument,
            ));
        }

        if key.contains(FIELD_SEPARATOR) {
            let splits: Vec<&str> = key.split(FIELD_SEPARATOR).collect();
            self.deep_put(&splits, value)
        } else {
            self.data.insert(key.to_string(), value);
            Ok(())
        }
    }

    /// Gets the value at a field path, or [Value::Null] when there is none.
    ///
    /// When a path crosses an array with a non-numeric segment, the
    /// remaining path is resolved against every element and the distinct
    /// results are collected into an array.
    pub fn get(&self, key: &str) -> Value {
        if let Some(value) = self.data.get(key) {
            return value.clone();
        }

        if !key.contains(FIELD_SEPARATOR) {
            return Value::Null;
        }

        let splits: Vec<&str> = key.split(FIELD_SEPARATOR).collect();
        if splits.iter().any(|s| s.is_empty()) {
            return Value::Null;
        }
        recursive_get(self.data.get(splits[0]), &splits[1..])
    }

    /// Checks whether a field path resolves to a stored value.
    pub fn contains_field(&self, key: &str) -> bool {
        if self.data.contains_key(key) {
            return true;
        }
        !self.get(key).is_null()
    }

    /// Checks whether a top-level key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Removes a field path and returns the removed value.
    ///
    /// A nested document left empty by the removal is removed as well,
    /// except for array elements, which stay in place as empty documents.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        if self.data.contains_key(key) || !key.contains(FIELD_SEPARATOR) {
            return self.data.remove(key);
        }

        let splits: Vec<&str> = key.split(FIELD_SEPARATOR).collect();
        if splits.iter().any(|s| s.is_empty()) {
            return None;
        }
        self.deep_remove(&splits)
    }

    /// Compares field by field, requiring every value to keep its variant.
    pub(crate) fn is_identical(&self, other: &Document) -> bool {
        self.size() == other.size()
            && self
                .iter()
                .zip(other.iter())
                .all(|((k1, v1), (k2, v2))| k1 == k2 && v1.is_identical(v2))
    }

    /// Gets the identity of this document, if it has one.
    pub fn id(&self) -> Option<DocumentId> {
        self.data.get(DOC_ID).and_then(|v| v.as_id()).cloned()
    }

    pub fn has_id(&self) -> bool {
        self.data.contains_key(DOC_ID)
    }

    pub(crate) fn set_id(&mut self, id: DocumentId) {
        self.data.insert(DOC_ID.to_string(), Value::Id(id));
    }

    /// Returns a copy of this document without its `_id` field.
    pub fn without_id(&self) -> Document {
        Document {
            data: self.data.without(DOC_ID),
        }
    }

    /// Gets all leaf field paths of this document, reserved fields excluded.
    pub fn fields(&self) -> FieldVec {
        self.fields_with_prefix("")
    }

    /// Iterates over the top-level fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    fn fields_with_prefix(&self, prefix: &str) -> FieldVec {
        let mut fields = FieldVec::new();
        for (key, value) in self.data.iter() {
            if RESERVED_FIELDS.contains(&key.as_str()) {
                continue;
            }

            let field = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}{}{}", prefix, FIELD_SEPARATOR, key)
            };

            match value {
                Value::Document(doc) if !doc.is_empty() => {
                    fields.append(&mut doc.fields_with_prefix(&field))
                }
                _ => fields.push(field),
            }
        }
        fields
    }

    fn deep_put(&mut self, splits: &[&str], value: Value) -> RepoResult<()> {
        let key = match splits.first() {
            Some(key) if !key.is_empty() => *key,
            _ => {
                log::error!("Document does not support empty key");
                return Err(RepoError::new(
                    "Document does not support empty key",
                    ErrorKind::InvalidArgument,
                ));
            }
        };

        if splits.len() == 1 {
            return self.put(key, value);
        }

        let mut nested = match self.data.get(key) {
            Some(Value::Document(doc)) => doc.clone(),
            _ => Document::new(),
        };
        nested.deep_put(&splits[1..], value)?;
        self.data.insert(key.to_string(), Value::Document(nested));
        Ok(())
    }

    fn deep_remove(&mut self, splits: &[&str]) -> Option<Value> {
        let key = splits[0];
        if splits.len() == 1 {
            return self.data.remove(key);
        }

        match self.data.get(key).cloned() {
            Some(Value::Document(mut nested)) => {
                let removed = nested.deep_remove(&splits[1..]);
                if nested.is_empty() {
                    self.data.remove(key);
                } else {
                    self.data.insert(key.to_string(), Value::Document(nested));
                }
                removed
            }
            Some(Value::Array(mut arr)) => {
                let index = splits[1].parse::<usize>().ok()?;
                if index >= arr.len() {
                    return None;
                }

                // an element emptied by the removal stays, so later indexes keep their position
                let removed = if splits.len() > 2 {
                    match arr.get_mut(index) {
                        Some(Value::Document(nested)) => nested.deep_remove(&splits[2..]),
                        _ => None,
                    }
                } else {
                    Some(arr.remove(index))
                };
                self.data.insert(key.to_string(), Value::Array(arr));
                removed
            }
            _ => None,
        }
    }
}

fn recursive_get(value: Option<&Value>, splits: &[&str]) -> Value {
    let value = match value {
        None => return Value::Null,
        Some(v) => v,
    };

    let key = match splits.first() {
        None => return value.clone(),
        Some(key) => *key,
    };

    match value {
        Value::Document(doc) => recursive_get(doc.data.get(key), &splits[1..]),
        Value::Array(arr) => match key.parse::<usize>() {
            Ok(index) => recursive_get(arr.get(index), &splits[1..]),
            Err(_) => decompose(arr, splits),
        },
        _ => Value::Null,
    }
}

fn decompose(arr: &[Value], splits: &[&str]) -> Value {
    let mut items: Vec<Value> = Vec::with_capacity(arr.len());
    let mut collect = |value: Value| {
        if !value.is_null() && !items.contains(&value) {
            items.push(value);
        }
    };

    for item in arr {
        match recursive_get(Some(item), splits) {
            Value::Array(values) => values.into_iter().for_each(&mut collect),
            value => collect(value),
        }
    }
    Value::Array(items)
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.data
                .iter()
                .map(|(key, value)| format!("\"{}\": {}", key, value))
                .join(", ")
        )
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.data.iter()).finish()
    }
}

/// Strips the quotes `stringify!` leaves around string-literal keys.
pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a [Document] with JSON-like syntax.
///
/// Keys may be bare identifiers or string literals. Values may be
/// expressions, nested `{ ... }` documents or `[ ... ]` arrays.
///
/// ```rust,ignore
/// use docrepo::doc;
///
/// let empty = doc!{};
/// let user = doc!{
///     name: "Alice",
///     age: 30,
///     address: { city: "Paris" },
///     tags: ["a", "b"],
/// };
/// ```
#[macro_export]
macro_rules! doc {
    ({}) => {
        $crate::collection::Document::new()
    };

    () => {
        $crate::collection::Document::new()
    };

    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::doc!($($key : $value),*)
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::doc_value;

            let mut doc = $crate::collection::Document::new();
            $(
                doc.put(&$crate::collection::normalize(stringify!($key)), $crate::doc_value!($value))
                .expect(&format!("Failed to put value {} in document", stringify!($value)));
            )*
            doc
        }
    };
}

/// Converts a value token for the [doc!] macro.
#[macro_export]
macro_rules! doc_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        {
            $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
        }
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
