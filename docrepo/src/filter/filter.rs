use crate::collection::{Document, DocumentId};
use crate::common::{Value, DOC_ID};
use crate::errors::{ErrorKind, RepoError, RepoResult};
use once_cell::sync::Lazy;
use std::any::Any;
use std::fmt::Display;
use std::ops::Deref;
use std::sync::Arc;

use super::{AllFilter, AndFilter, EqualsFilter, InFilter, NotFilter, OrFilter};

static ALL: Lazy<Filter> = Lazy::new(|| Filter::new(AllFilter));

/// A predicate over documents.
///
/// Providers are immutable once built and shared behind a [Filter]. Field
/// filters expose their field name and search value so a store can look
/// documents up directly instead of scanning.
pub trait FilterProvider: Any + Send + Sync + Display {
    /// Evaluates the predicate against a document.
    fn apply(&self, entry: &Document) -> RepoResult<bool>;

    #[inline]
    fn has_field(&self) -> bool {
        false
    }

    fn get_field_name(&self) -> RepoResult<String> {
        log::error!("Filter {} does not have field name", self);
        Err(RepoError::new(
            "Filter does not have field name",
            ErrorKind::FilterError,
        ))
    }

    fn get_field_value(&self) -> RepoResult<Option<Value>> {
        log::debug!("Filter {} does not have field value", self);
        Err(RepoError::new(
            "Filter does not have field value",
            ErrorKind::FilterError,
        ))
    }

    fn logical_filters(&self) -> RepoResult<Vec<Filter>> {
        Err(RepoError::new(
            "Filter is not a logical filter",
            ErrorKind::FilterError,
        ))
    }

    fn as_any(&self) -> &dyn Any;
}

/// A cheaply clonable handle to a [FilterProvider].
///
/// ```text
/// let adults = field("age").gte(18).and(field("active").eq(true));
/// let not_admin = field("role").eq("admin").not();
/// ```
#[derive(Clone)]
pub struct Filter {
    inner: Arc<dyn FilterProvider>,
}

impl Filter {
    pub fn new<T: FilterProvider + 'static>(inner: T) -> Self {
        Filter {
            inner: Arc::new(inner),
        }
    }

    pub fn and(&self, filter: Filter) -> Self {
        Filter::new(AndFilter::new(vec![self.clone(), filter]))
    }

    pub fn or(&self, filter: Filter) -> Self {
        Filter::new(OrFilter::new(vec![self.clone(), filter]))
    }

    pub fn not(&self) -> Self {
        Filter::new(NotFilter::new(self.clone()))
    }

    /// Checks whether this filter matches every document.
    pub fn is_all(&self) -> bool {
        self.inner.as_any().is::<AllFilter>()
    }
}

impl Display for Filter {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Filter{}", self.inner)
    }
}

impl Deref for Filter {
    type Target = Arc<dyn FilterProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Matches every document.
pub fn all() -> Filter {
    ALL.clone()
}

/// Matches the document with the given identity.
pub fn by_id(id: DocumentId) -> Filter {
    Filter::new(EqualsFilter::new(DOC_ID.to_string(), Value::Id(id)))
}

/// Matches the documents with any of the given identities.
pub fn by_ids(ids: Vec<DocumentId>) -> Filter {
    Filter::new(InFilter::new(
        DOC_ID.to_string(),
        ids.into_iter().map(Value::Id).collect(),
    ))
}

pub fn and(filters: Vec<Filter>) -> Filter {
    Filter::new(AndFilter::new(filters))
}

pub fn or(filters: Vec<Filter>) -> Filter {
    Filter::new(OrFilter::new(filters))
}

pub fn not(filter: Filter) -> Filter {
    Filter::new(NotFilter::new(filter))
}

/// Builds a filter selecting the stored counterpart of `document`.
///
/// A document carrying an `_id` is matched by identity. Otherwise every
/// top-level field must be equal.
///
/// # Errors
///
/// Fails with [`ErrorKind::InvalidArgument`] when the document has neither
/// an identity nor any field, since such a filter would match everything.
pub fn matching(document: &Document) -> RepoResult<Filter> {
    if let Some(id) = document.id() {
        return Ok(by_id(id));
    }

    let filters: Vec<Filter> = document
        .iter()
        .filter(|(key, _)| key.as_str() != DOC_ID)
        .map(|(key, value)| Filter::new(EqualsFilter::new(key.clone(), value.clone())))
        .collect();

    match filters.len() {
        0 => {
            log::error!("Cannot derive a filter from an empty document");
            Err(RepoError::new(
                "Cannot derive a filter from a document without fields",
                ErrorKind::InvalidArgument,
            ))
        }
        1 => Ok(filters.into_iter().next().unwrap_or_else(all)),
        _ => Ok(and(filters)),
    }
}

/// Extracts the identities an identity filter selects, if `filter` is one.
pub(crate) fn id_lookup(filter: &Filter) -> Option<Vec<DocumentId>> {
    let is_id_field = filter.has_field()
        && filter
            .get_field_name()
            .map(|name| name == DOC_ID)
            .unwrap_or(false);
    if !is_id_field {
        return None;
    }

    let any = filter.as_any();
    if any.is::<EqualsFilter>() {
        return match filter.get_field_value() {
            Ok(Some(Value::Id(id))) => Some(vec![id]),
            _ => None,
        };
    }

    if let Some(in_filter) = any.downcast_ref::<InFilter>() {
        let ids: Option<Vec<DocumentId>> = in_filter
            .values()
            .iter()
            .map(|value| value.as_id().cloned())
            .collect();
        return ids;
    }
    None
}
