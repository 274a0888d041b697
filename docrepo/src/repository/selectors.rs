use crate::collection::Document;
use crate::errors::{ErrorKind, RepoError, RepoResult};

/// The one input an insert selector resolved to.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Supplied<I, D> {
    Item(I),
    Document(D),
}

/// The key a remove selector resolved to.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RemoveKey<K, I, D> {
    Id(K),
    Document(D),
    Item(I),
}

fn invalid(message: &str) -> RepoError {
    log::error!("{}", message);
    RepoError::new(message, ErrorKind::InvalidArgument)
}

/// Input of `insert_one`: exactly one of an item or a document.
#[derive(Debug, Clone)]
pub struct InsertOne<I, D = Document> {
    pub item: Option<I>,
    pub document: Option<D>,
}

impl<I, D> InsertOne<I, D> {
    pub fn item(item: I) -> Self {
        InsertOne {
            item: Some(item),
            document: None,
        }
    }

    pub fn document(document: D) -> Self {
        InsertOne {
            item: None,
            document: Some(document),
        }
    }

    pub(crate) fn into_supplied(self) -> RepoResult<Supplied<I, D>> {
        match (self.item, self.document) {
            (Some(item), None) => Ok(Supplied::Item(item)),
            (None, Some(document)) => Ok(Supplied::Document(document)),
            (Some(_), Some(_)) => Err(invalid("insert_one accepts an item or a document, not both")),
            (None, None) => Err(invalid("insert_one requires an item or a document")),
        }
    }
}

/// Input of `insert_many`: exactly one of an item list or a document list.
#[derive(Debug, Clone)]
pub struct InsertMany<I, D = Document> {
    pub items: Option<Vec<I>>,
    pub documents: Option<Vec<D>>,
}

impl<I, D> InsertMany<I, D> {
    pub fn items(items: Vec<I>) -> Self {
        InsertMany {
            items: Some(items),
            documents: None,
        }
    }

    pub fn documents(documents: Vec<D>) -> Self {
        InsertMany {
            items: None,
            documents: Some(documents),
        }
    }

    pub(crate) fn into_supplied(self) -> RepoResult<Supplied<Vec<I>, Vec<D>>> {
        match (self.items, self.documents) {
            (Some(items), None) => Ok(Supplied::Item(items)),
            (None, Some(documents)) => Ok(Supplied::Document(documents)),
            (Some(_), Some(_)) => Err(invalid("insert_many accepts items or documents, not both")),
            (None, None) => Err(invalid("insert_many requires items or documents")),
        }
    }
}

/// Input of `remove_one`.
///
/// When several keys are given, `id` wins over `document`, which wins over
/// `item`.
#[derive(Debug, Clone)]
pub struct RemoveOne<I, D = Document> {
    pub id: Option<String>,
    pub document: Option<D>,
    pub item: Option<I>,
}

impl<I, D> RemoveOne<I, D> {
    pub fn id(id: &str) -> Self {
        RemoveOne {
            id: Some(id.to_string()),
            document: None,
            item: None,
        }
    }

    pub fn document(document: D) -> Self {
        RemoveOne {
            id: None,
            document: Some(document),
            item: None,
        }
    }

    pub fn item(item: I) -> Self {
        RemoveOne {
            id: None,
            document: None,
            item: Some(item),
        }
    }

    pub(crate) fn into_key(self) -> RepoResult<RemoveKey<String, I, D>> {
        let supplied = [self.id.is_some(), self.document.is_some(), self.item.is_some()]
            .iter()
            .filter(|present| **present)
            .count();
        if supplied > 1 {
            log::warn!("remove_one received {} keys, using the highest precedence one", supplied);
        }

        if let Some(id) = self.id {
            Ok(RemoveKey::Id(id))
        } else if let Some(document) = self.document {
            Ok(RemoveKey::Document(document))
        } else if let Some(item) = self.item {
            Ok(RemoveKey::Item(item))
        } else {
            Err(invalid("remove_one requires an id, a document or an item"))
        }
    }
}

/// Input of `remove_many`.
///
/// When several keys are given, `ids` win over `documents`, which win over
/// `items`.
#[derive(Debug, Clone)]
pub struct RemoveMany<I, D = Document> {
    pub ids: Option<Vec<String>>,
    pub documents: Option<Vec<D>>,
    pub items: Option<Vec<I>>,
}

impl<I, D> RemoveMany<I, D> {
    pub fn ids(ids: Vec<String>) -> Self {
        RemoveMany {
            ids: Some(ids),
            documents: None,
            items: None,
        }
    }

    pub fn documents(documents: Vec<D>) -> Self {
        RemoveMany {
            ids: None,
            documents: Some(documents),
            items: None,
        }
    }

    pub fn items(items: Vec<I>) -> Self {
        RemoveMany {
            ids: None,
            documents: None,
            items: Some(items),
        }
    }

    pub(crate) fn into_key(self) -> RepoResult<RemoveKey<Vec<String>, Vec<I>, Vec<D>>> {
        let supplied = [self.ids.is_some(), self.documents.is_some(), self.items.is_some()]
            .iter()
            .filter(|present| **present)
            .count();
        if supplied > 1 {
            log::warn!("remove_many received {} keys, using the highest precedence one", supplied);
        }

        if let Some(ids) = self.ids {
            Ok(RemoveKey::Id(ids))
        } else if let Some(documents) = self.documents {
            Ok(RemoveKey::Document(documents))
        } else if let Some(items) = self.items {
            Ok(RemoveKey::Item(items))
        } else {
            Err(invalid("remove_many requires ids, documents or items"))
        }
    }
}
