use crate::collection::{Document, DocumentId, FindOptions};
use crate::common::{to_document, Convertible, Sort, SortableFields, SortOrder, DOC_ID};
use crate::errors::{ErrorKind, RepoError, RepoResult};
use crate::filter::{by_id, by_ids, matching, or, Filter};
use crate::repository::selectors::{RemoveKey, Supplied};
use crate::repository::{
    InsertMany, InsertOne, PageWindow, Paginated, Pagination, RemoveMany, RemoveOne,
    RepositoryConfig, RepositoryProvider,
};
use crate::store::DocumentStore;
use crate::update::Update;
use std::marker::PhantomData;

/// A repository resolved against a [`DocumentStore`].
///
/// It keeps no documents of its own; every call is translated into one or
/// more store primitives.
pub(crate) struct DefaultRepository<I> {
    store: DocumentStore,
    config: RepositoryConfig,
    _phantom: PhantomData<fn() -> I>,
}

impl<I> DefaultRepository<I> {
    pub(crate) fn new(store: DocumentStore, config: RepositoryConfig) -> Self {
        DefaultRepository {
            store,
            config,
            _phantom: PhantomData,
        }
    }

    /// Resolves one page of the documents a filter selects.
    ///
    /// Both paginated lookups go through here.
    fn resolve_page(
        &self,
        filter: Option<&Filter>,
        current: u64,
        items_per_page: u64,
        sort: Option<Sort>,
    ) -> RepoResult<Paginated<Document>> {
        self.config.check_page_size(items_per_page)?;

        let total = self.store.count(filter)?;
        let window = PageWindow::new(total, current, items_per_page)?;
        if window.is_beyond_end() {
            log::debug!(
                "[{}] page {} is past the last of {} pages, skipping the query",
                self.config.name(),
                current,
                window.page_count
            );
            return Ok(Paginated::new(Vec::new(), current, window.page_count, total));
        }

        let options = FindOptions::new()
            .sort_by_fields(self.sort_fields(sort))
            .skip(window.skip)
            .limit(window.limit);

        log::debug!(
            "[{}] resolving page {} of {} with filter {} and {}",
            self.config.name(),
            current,
            window.page_count,
            filter.map_or_else(|| "none".to_string(), |f| f.to_string()),
            options
        );

        let items = self.store.find(filter, &options)?;
        Ok(Paginated::new(items, current, window.page_count, total))
    }

    fn sort_fields(&self, sort: Option<Sort>) -> SortableFields {
        match sort {
            Some(sort) => {
                let needs_tie_break = self.config.tie_break_on_id() && sort.field != DOC_ID;
                let fields = SortableFields::new().add_sorted_field(sort.field, sort.by);
                if needs_tie_break {
                    fields.add_sorted_field(DOC_ID.to_string(), SortOrder::Descending)
                } else {
                    fields
                }
            }
            None => self.config.default_sort().clone(),
        }
    }
}

/// The filter that selects a stored document: its identity when it has
/// one, otherwise equality on each of its top level fields.
fn key_filter(document: &Document) -> RepoResult<Filter> {
    match document.id() {
        Some(id) => Ok(by_id(id)),
        None => matching(document),
    }
}

fn parse_ids(ids: &[String]) -> RepoResult<Vec<DocumentId>> {
    ids.iter().map(|id| DocumentId::parse(id)).collect()
}

impl<I> DefaultRepository<I>
where
    I: Convertible<Output = I>,
{
    fn delete_by_documents(&self, documents: &[Document]) -> RepoResult<u64> {
        if documents.is_empty() {
            log::warn!("[{}] remove_many called with no documents", self.config.name());
            return Ok(0);
        }

        let filter = if documents.iter().all(Document::has_id) {
            by_ids(documents.iter().filter_map(Document::id).collect())
        } else {
            let filters = documents
                .iter()
                .map(key_filter)
                .collect::<RepoResult<Vec<Filter>>>()?;
            or(filters)
        };
        self.store.delete_many(&filter)
    }
}

impl<I> RepositoryProvider<I> for DefaultRepository<I>
where
    I: Convertible<Output = I>,
{
    fn find_one(&self, filter: &Filter) -> RepoResult<Option<Document>> {
        self.store.find_one(filter)
    }

    fn find_by_id(&self, id: &str) -> RepoResult<Option<Document>> {
        let id = DocumentId::parse(id)?;
        self.store.find_by_id(&id)
    }

    fn find_all(&self) -> RepoResult<Vec<Document>> {
        let options = FindOptions::new().sort_by_fields(self.config.default_sort().clone());
        self.store.find(None, &options)
    }

    fn find_all_paginated(
        &self,
        current: u64,
        items_per_page: u64,
        sort: Option<Sort>,
    ) -> RepoResult<Paginated<Document>> {
        self.resolve_page(None, current, items_per_page, sort)
    }

    fn find_paginated(&self, pagination: Pagination) -> RepoResult<Paginated<Document>> {
        self.resolve_page(
            pagination.filter.as_ref(),
            pagination.current,
            pagination.items_per_page,
            pagination.sort,
        )
    }

    fn count(&self, filter: Option<&Filter>) -> RepoResult<u64> {
        self.store.count(filter)
    }

    fn insert_one(&self, insert: InsertOne<I>) -> RepoResult<Document> {
        let document = match insert.into_supplied()? {
            Supplied::Item(item) => to_document(&item)?,
            Supplied::Document(document) => document,
        };
        self.store.insert_one(document)
    }

    fn insert_many(&self, insert: InsertMany<I>) -> RepoResult<Vec<Document>> {
        let documents = match insert.into_supplied()? {
            Supplied::Item(items) => items
                .iter()
                .map(to_document)
                .collect::<RepoResult<Vec<Document>>>()?,
            Supplied::Document(documents) => documents,
        };

        if documents.is_empty() {
            log::warn!("[{}] insert_many called with nothing to insert", self.config.name());
            return Ok(Vec::new());
        }
        self.store.insert_many(documents)
    }

    fn remove_one(&self, remove: RemoveOne<I>) -> RepoResult<()> {
        let filter = match remove.into_key()? {
            RemoveKey::Id(id) => by_id(DocumentId::parse(&id)?),
            RemoveKey::Document(document) => key_filter(&document)?,
            RemoveKey::Item(item) => key_filter(&to_document(&item)?)?,
        };

        let removed = self.store.delete_one(&filter)?;
        if removed == 0 {
            log::debug!("[{}] nothing matched {} for removal", self.config.name(), filter);
        }
        Ok(())
    }

    fn remove_many(&self, remove: RemoveMany<I>) -> RepoResult<u64> {
        match remove.into_key()? {
            RemoveKey::Id(ids) => {
                if ids.is_empty() {
                    log::warn!("[{}] remove_many called with no ids", self.config.name());
                    return Ok(0);
                }
                let ids = parse_ids(&ids)?;
                self.store.delete_many(&by_ids(ids))
            }
            RemoveKey::Document(documents) => self.delete_by_documents(&documents),
            RemoveKey::Item(items) => {
                let documents = items
                    .iter()
                    .map(to_document)
                    .collect::<RepoResult<Vec<Document>>>()?;
                self.delete_by_documents(&documents)
            }
        }
    }

    fn update_one(&self, filter: &Filter, update: &Update) -> RepoResult<Option<Document>> {
        update.validate()?;
        self.store.update_one(filter, update)
    }

    fn update_many(&self, filter: &Filter, update: &Update) -> RepoResult<u64> {
        update.validate()?;
        self.store.update_many(filter, update)
    }
}
