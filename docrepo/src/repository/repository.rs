use crate::collection::Document;
use crate::common::{from_document, Convertible, Sort, SortOrder};
use crate::errors::RepoResult;
use crate::filter::Filter;
use crate::repository::{
    InsertMany, InsertOne, Paginated, Pagination, RemoveMany, RemoveOne, RepositoryBuilder,
};
use crate::update::Update;
use std::ops::Deref;
use std::sync::Arc;

/// The capabilities of a document repository.
///
/// `I` is the domain item type, `D` the stored document type, `O` the
/// sort direction payload, `F` the filter type and `U` the update type.
/// Lookups that find nothing return `Ok(None)`; errors are reserved for
/// invalid input and store failures.
pub trait RepositoryProvider<I, D = Document, O = SortOrder, F = Filter, U = Update>:
    Send + Sync
{
    /// Returns the first document the filter selects.
    fn find_one(&self, filter: &F) -> RepoResult<Option<D>>;

    /// Looks a document up by identity. A malformed identity is an
    /// argument error, not a miss.
    fn find_by_id(&self, id: &str) -> RepoResult<Option<D>>;

    /// Returns every document. Meant for small collections.
    fn find_all(&self) -> RepoResult<Vec<D>>;

    fn find_all_paginated(
        &self,
        current: u64,
        items_per_page: u64,
        sort: Option<Sort<O>>,
    ) -> RepoResult<Paginated<D>>;

    fn find_paginated(&self, pagination: Pagination<F, O>) -> RepoResult<Paginated<D>>;

    fn count(&self, filter: Option<&F>) -> RepoResult<u64>;

    fn insert_one(&self, insert: InsertOne<I, D>) -> RepoResult<D>;

    /// Inserts in order. Documents stored before a failure stay stored.
    fn insert_many(&self, insert: InsertMany<I, D>) -> RepoResult<Vec<D>>;

    /// Removes the first document the key selects. No match is a no-op.
    fn remove_one(&self, remove: RemoveOne<I, D>) -> RepoResult<()>;

    /// Removes every document the keys select and returns how many went.
    fn remove_many(&self, remove: RemoveMany<I, D>) -> RepoResult<u64>;

    /// Patches the first match and returns it as stored afterwards.
    fn update_one(&self, filter: &F, update: &U) -> RepoResult<Option<D>>;

    /// Patches every match and returns how many documents changed.
    fn update_many(&self, filter: &F, update: &U) -> RepoResult<u64>;
}

/// A cloneable handle to a repository of `I` items.
///
/// ```text
/// let repository: Repository<Book> = Repository::builder()
///     .build(InMemoryStore::default().as_document_store())?;
///
/// repository.insert_one(InsertOne::item(book))?;
/// let page = repository.find_items_paginated(Pagination::new(0, 10))?;
/// ```
pub struct Repository<I> {
    inner: Arc<dyn RepositoryProvider<I>>,
}

impl<I> Clone for Repository<I> {
    fn clone(&self) -> Self {
        Repository {
            inner: self.inner.clone(),
        }
    }
}

impl<I> Repository<I> {
    pub fn new<T: RepositoryProvider<I> + 'static>(inner: T) -> Self {
        Repository {
            inner: Arc::new(inner),
        }
    }

    pub fn builder() -> RepositoryBuilder<I> {
        RepositoryBuilder::new()
    }
}

impl<I: Convertible<Output = I>> Repository<I> {
    pub fn to_item(&self, document: &Document) -> RepoResult<I> {
        from_document(document)
    }

    /// Resolves a page and converts its documents into items.
    pub fn find_items_paginated(&self, pagination: Pagination) -> RepoResult<Paginated<I>> {
        let page = self.inner.find_paginated(pagination)?;
        page.try_map(|document| from_document(&document))
    }
}

impl<I> Deref for Repository<I> {
    type Target = Arc<dyn RepositoryProvider<I>>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
