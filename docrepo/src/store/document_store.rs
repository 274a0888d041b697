use crate::collection::{Document, DocumentId, FindOptions};
use crate::errors::RepoResult;
use crate::filter::Filter;
use crate::update::Update;
use std::ops::Deref;
use std::sync::Arc;

/// The primitives a document store client offers to a repository.
///
/// Every primitive is atomic on its own; nothing spans calls. A `None`
/// filter selects every document. Errors from the backend surface as
/// [`crate::errors::RepoError`]s and are propagated unchanged.
pub trait DocumentStoreProvider: Send + Sync {
    /// Counts the documents a filter selects.
    fn count(&self, filter: Option<&Filter>) -> RepoResult<u64>;

    /// Finds the documents a filter selects, ordered and windowed by `options`.
    fn find(&self, filter: Option<&Filter>, options: &FindOptions) -> RepoResult<Vec<Document>>;

    fn find_one(&self, filter: &Filter) -> RepoResult<Option<Document>>;

    fn find_by_id(&self, id: &DocumentId) -> RepoResult<Option<Document>>;

    /// Stores a document, assigning an identity when it has none, and
    /// returns it as stored.
    fn insert_one(&self, document: Document) -> RepoResult<Document>;

    /// Stores documents in order. Documents stored before a failure stay.
    fn insert_many(&self, documents: Vec<Document>) -> RepoResult<Vec<Document>>;

    /// Deletes the first selected document and returns the removed count.
    fn delete_one(&self, filter: &Filter) -> RepoResult<u64>;

    /// Deletes every selected document and returns the removed count.
    fn delete_many(&self, filter: &Filter) -> RepoResult<u64>;

    /// Patches the first selected document and returns it as stored.
    fn update_one(&self, filter: &Filter, update: &Update) -> RepoResult<Option<Document>>;

    /// Patches every selected document and returns how many changed.
    fn update_many(&self, filter: &Filter, update: &Update) -> RepoResult<u64>;

    fn close(&self) -> RepoResult<()>;

    fn is_closed(&self) -> RepoResult<bool>;
}

/// A shared handle to a [DocumentStoreProvider].
#[derive(Clone)]
pub struct DocumentStore {
    inner: Arc<dyn DocumentStoreProvider>,
}

impl DocumentStore {
    pub fn new<T: DocumentStoreProvider + 'static>(inner: T) -> Self {
        DocumentStore {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for DocumentStore {
    type Target = Arc<dyn DocumentStoreProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
