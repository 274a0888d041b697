use crate::common::{Convertible, Sort, SortOrder, SortableFields, DEFAULT_REPOSITORY_NAME, DOC_ID};
use crate::errors::{ErrorKind, RepoError, RepoResult};
use crate::repository::{DefaultRepository, Repository};
use crate::store::DocumentStore;
use std::marker::PhantomData;

/// Settings of a [`Repository`].
///
/// - `name` labels the repository in log output
/// - `default_sort` orders pages requested without a sort (`_id` descending)
/// - `max_items_per_page` caps the page size a caller may request
/// - `tie_break_on_id` appends `_id` descending after a caller sort
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryConfig {
    name: String,
    default_sort: SortableFields,
    max_items_per_page: Option<u64>,
    tie_break_on_id: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryConfig {
    pub fn new() -> Self {
        RepositoryConfig {
            name: DEFAULT_REPOSITORY_NAME.to_string(),
            default_sort: SortableFields::new()
                .add_sorted_field(DOC_ID.to_string(), SortOrder::Descending),
            max_items_per_page: None,
            tie_break_on_id: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_sort(&self) -> &SortableFields {
        &self.default_sort
    }

    pub fn max_items_per_page(&self) -> Option<u64> {
        self.max_items_per_page
    }

    pub fn tie_break_on_id(&self) -> bool {
        self.tie_break_on_id
    }

    pub fn set_name(&mut self, name: &str) -> RepoResult<()> {
        if name.trim().is_empty() {
            log::error!("Repository name cannot be empty");
            return Err(RepoError::new(
                "Repository name cannot be empty",
                ErrorKind::InvalidArgument,
            ));
        }
        self.name = name.to_string();
        Ok(())
    }

    /// Replaces the default order. When the new order does not end on the
    /// identity, `_id` descending is appended so default pages stay
    /// deterministic.
    pub fn set_default_sort(&mut self, sort: Sort) -> RepoResult<()> {
        if sort.field.is_empty() {
            log::error!("Default sort field cannot be empty");
            return Err(RepoError::new(
                "Default sort field cannot be empty",
                ErrorKind::InvalidArgument,
            ));
        }

        let mut fields = SortableFields::new().add_sorted_field(sort.field.clone(), sort.by);
        if sort.field != DOC_ID {
            fields = fields.add_sorted_field(DOC_ID.to_string(), SortOrder::Descending);
        }
        self.default_sort = fields;
        Ok(())
    }

    pub fn set_max_items_per_page(&mut self, max: u64) -> RepoResult<()> {
        if max == 0 {
            log::error!("Maximum items per page must be greater than zero");
            return Err(RepoError::new(
                "Maximum items per page must be greater than zero",
                ErrorKind::InvalidArgument,
            ));
        }
        self.max_items_per_page = Some(max);
        Ok(())
    }

    pub fn set_tie_break_on_id(&mut self, tie_break: bool) {
        self.tie_break_on_id = tie_break;
    }

    /// Fails when a page size is zero or above the configured maximum.
    pub(crate) fn check_page_size(&self, items_per_page: u64) -> RepoResult<()> {
        if items_per_page == 0 {
            log::error!("Items per page must be greater than zero");
            return Err(RepoError::new(
                "Items per page must be greater than zero",
                ErrorKind::InvalidArgument,
            ));
        }

        if let Some(max) = self.max_items_per_page {
            if items_per_page > max {
                log::error!("Items per page {} exceeds the maximum of {}", items_per_page, max);
                return Err(RepoError::new(
                    &format!("Items per page {} exceeds the maximum of {}", items_per_page, max),
                    ErrorKind::InvalidArgument,
                ));
            }
        }
        Ok(())
    }
}

/// Builder for a [`Repository`] over a [`DocumentStore`].
///
/// The first configuration error is kept and returned from [`build`](Self::build).
///
/// ```text
/// let repository: Repository<Book> = Repository::builder()
///     .name("books")
///     .max_items_per_page(100)
///     .build(InMemoryStore::default().as_document_store())?;
/// ```
pub struct RepositoryBuilder<I> {
    error: Option<RepoError>,
    config: RepositoryConfig,
    _item: PhantomData<fn() -> I>,
}

impl<I> Default for RepositoryBuilder<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> RepositoryBuilder<I> {
    pub fn new() -> Self {
        RepositoryBuilder {
            error: None,
            config: RepositoryConfig::new(),
            _item: PhantomData,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_name(name) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn default_sort(mut self, sort: Sort) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_default_sort(sort) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn max_items_per_page(mut self, max: u64) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_max_items_per_page(max) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn tie_break_on_id(mut self, tie_break: bool) -> Self {
        self.config.set_tie_break_on_id(tie_break);
        self
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }
}

impl<I: Convertible<Output = I> + 'static> RepositoryBuilder<I> {
    pub fn build(self, store: DocumentStore) -> RepoResult<Repository<I>> {
        if let Some(error) = self.error {
            return Err(error);
        }

        if store.is_closed()? {
            log::error!("Cannot build repository {} on a closed store", self.config.name());
            return Err(RepoError::new(
                "Cannot build a repository on a closed store",
                ErrorKind::StoreClosed,
            ));
        }

        log::debug!("Building repository {}", self.config.name());
        Ok(Repository::new(DefaultRepository::new(store, self.config)))
    }
}
