use crate::collection::{Document, DocumentId, FindOptions};
use crate::common::{atomic, Atomic, ReadExecutor, SortableFields, WriteExecutor};
use crate::errors::{ErrorKind, RepoError, RepoResult};
use crate::filter::{id_lookup, Filter};
use crate::store::memory::config::InMemoryStoreConfig;
use crate::store::{DocumentStore, DocumentStoreProvider};
use crate::update::Update;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

type DocumentMap = BTreeMap<DocumentId, Document>;

/// A document store that keeps everything in process memory.
///
/// Documents live in an identity ordered map behind a read/write lock.
/// Filters are evaluated by scanning, except identity filters which are
/// answered by direct lookup.
#[derive(Clone)]
pub struct InMemoryStore {
    inner: Arc<InMemoryStoreInner>,
}

impl InMemoryStore {
    pub fn new(store_config: InMemoryStoreConfig) -> InMemoryStore {
        InMemoryStore {
            inner: Arc::new(InMemoryStoreInner::new(store_config)),
        }
    }

    pub fn store_config(&self) -> InMemoryStoreConfig {
        self.inner.store_config.clone()
    }

    /// Wraps this store into a shareable [DocumentStore] handle.
    pub fn as_document_store(&self) -> DocumentStore {
        DocumentStore::new(self.clone())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        InMemoryStore::new(InMemoryStoreConfig::new())
    }
}

impl DocumentStoreProvider for InMemoryStore {
    fn count(&self, filter: Option<&Filter>) -> RepoResult<u64> {
        self.inner.count(filter)
    }

    fn find(&self, filter: Option<&Filter>, options: &FindOptions) -> RepoResult<Vec<Document>> {
        self.inner.find(filter, options)
    }

    fn find_one(&self, filter: &Filter) -> RepoResult<Option<Document>> {
        self.inner.find_one(filter)
    }

    fn find_by_id(&self, id: &DocumentId) -> RepoResult<Option<Document>> {
        self.inner.find_by_id(id)
    }

    fn insert_one(&self, document: Document) -> RepoResult<Document> {
        self.inner.insert_one(document)
    }

    fn insert_many(&self, documents: Vec<Document>) -> RepoResult<Vec<Document>> {
        self.inner.insert_many(documents)
    }

    fn delete_one(&self, filter: &Filter) -> RepoResult<u64> {
        self.inner.delete(filter, true)
    }

    fn delete_many(&self, filter: &Filter) -> RepoResult<u64> {
        self.inner.delete(filter, false)
    }

    fn update_one(&self, filter: &Filter, update: &Update) -> RepoResult<Option<Document>> {
        self.inner.update_one(filter, update)
    }

    fn update_many(&self, filter: &Filter, update: &Update) -> RepoResult<u64> {
        self.inner.update_many(filter, update)
    }

    fn close(&self) -> RepoResult<()> {
        self.inner.close()
    }

    fn is_closed(&self) -> RepoResult<bool> {
        Ok(self.inner.closed.load(AtomicOrdering::Acquire))
    }
}

struct InMemoryStoreInner {
    closed: AtomicBool,
    store_config: InMemoryStoreConfig,
    documents: Atomic<DocumentMap>,
}

impl InMemoryStoreInner {
    fn new(store_config: InMemoryStoreConfig) -> InMemoryStoreInner {
        InMemoryStoreInner {
            closed: AtomicBool::from(false),
            store_config,
            documents: atomic(BTreeMap::new()),
        }
    }

    fn check_opened(&self) -> RepoResult<()> {
        if self.closed.load(AtomicOrdering::Acquire) {
            log::error!("In-memory store is closed");
            return Err(RepoError::new(
                "Store is closed",
                ErrorKind::StoreClosed,
            ));
        }
        Ok(())
    }

    fn check_writable(&self) -> RepoResult<()> {
        self.check_opened()?;
        if self.store_config.is_read_only() {
            log::error!("Cannot write to a read-only in-memory store");
            return Err(RepoError::new(
                "Store is read-only",
                ErrorKind::StoreFailure,
            ));
        }
        Ok(())
    }

    fn count(&self, filter: Option<&Filter>) -> RepoResult<u64> {
        self.check_opened()?;
        self.documents
            .read_with(|documents| -> RepoResult<u64> {
                match filter {
                    Some(filter) if !filter.is_all() => {
                        Ok(select(documents, Some(filter))?.len() as u64)
                    }
                    _ => Ok(documents.len() as u64),
                }
            })
    }

    fn find(&self, filter: Option<&Filter>, options: &FindOptions) -> RepoResult<Vec<Document>> {
        self.check_opened()?;
        let mut found: Vec<Document> = self.documents.read_with(|documents| {
            select(documents, filter)
                .map(|entries| {
                    entries
                        .into_iter()
                        .map(|(_, doc)| doc.clone())
                        .collect::<Vec<Document>>()
                })
        })?;

        if let Some(sort_by) = options.sorting() {
            sort_documents(&mut found, sort_by);
        }

        let skip = options.skip_count().map(to_usize).unwrap_or(0);
        let limit = options.limit_count().map(to_usize).unwrap_or(usize::MAX);
        log::debug!(
            "Found {} documents, applying skip {} and limit {:?}",
            found.len(),
            skip,
            options.limit_count()
        );
        Ok(found.into_iter().skip(skip).take(limit).collect())
    }

    fn find_one(&self, filter: &Filter) -> RepoResult<Option<Document>> {
        self.check_opened()?;
        self.documents.read_with(|documents| -> RepoResult<Option<Document>> {
            Ok(select(documents, Some(filter))?
                .first()
                .map(|(_, doc)| (*doc).clone()))
        })
    }

    fn find_by_id(&self, id: &DocumentId) -> RepoResult<Option<Document>> {
        self.check_opened()?;
        Ok(self.documents.read_with(|documents| documents.get(id).cloned()))
    }

    fn insert_one(&self, document: Document) -> RepoResult<Document> {
        self.check_writable()?;
        self.documents
            .write_with(|documents| insert_into(documents, document))
    }

    fn insert_many(&self, documents: Vec<Document>) -> RepoResult<Vec<Document>> {
        self.check_writable()?;
        self.documents.write_with(|stored| -> RepoResult<Vec<Document>> {
            let mut inserted = Vec::with_capacity(documents.len());
            for document in documents {
                inserted.push(insert_into(stored, document)?);
            }
            Ok(inserted)
        })
    }

    fn delete(&self, filter: &Filter, just_once: bool) -> RepoResult<u64> {
        self.check_writable()?;
        self.documents.write_with(|documents| -> RepoResult<u64> {
            let mut ids: Vec<DocumentId> = select(documents, Some(filter))?
                .into_iter()
                .map(|(id, _)| id.clone())
                .collect();
            if just_once {
                ids.truncate(1);
            }

            let removed = ids
                .iter()
                .filter(|id| documents.remove(*id).is_some())
                .count() as u64;
            log::debug!("Removed {} documents matching {}", removed, filter);
            Ok(removed)
        })
    }

    fn update_one(&self, filter: &Filter, update: &Update) -> RepoResult<Option<Document>> {
        self.check_writable()?;
        update.validate()?;
        self.documents.write_with(|documents| -> RepoResult<Option<Document>> {
            let target = select(documents, Some(filter))?
                .first()
                .map(|(_, doc)| (*doc).clone());

            match target {
                Some(mut document) => {
                    if update.apply(&mut document)? {
                        store_updated(documents, &document)?;
                    }
                    Ok(Some(document))
                }
                None => Ok(None),
            }
        })
    }

    fn update_many(&self, filter: &Filter, update: &Update) -> RepoResult<u64> {
        self.check_writable()?;
        update.validate()?;
        self.documents.write_with(|documents| -> RepoResult<u64> {
            let mut changed = Vec::new();
            for (_, document) in select(documents, Some(filter))? {
                let mut patched = document.clone();
                if update.apply(&mut patched)? {
                    changed.push(patched);
                }
            }

            for document in &changed {
                store_updated(documents, document)?;
            }
            log::debug!("Updated {} documents matching {}", changed.len(), filter);
            Ok(changed.len() as u64)
        })
    }

    fn close(&self) -> RepoResult<()> {
        if !self.closed.swap(true, AtomicOrdering::AcqRel) {
            log::debug!("In-memory store closed");
        }
        Ok(())
    }
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

fn select<'a>(
    documents: &'a DocumentMap,
    filter: Option<&Filter>,
) -> RepoResult<Vec<(&'a DocumentId, &'a Document)>> {
    let filter = match filter {
        Some(filter) if !filter.is_all() => filter,
        _ => return Ok(documents.iter().collect()),
    };

    if let Some(ids) = id_lookup(filter) {
        let ids: BTreeSet<DocumentId> = ids.into_iter().collect();
        return Ok(ids
            .iter()
            .filter_map(|id| documents.get_key_value(id))
            .collect());
    }

    let mut selected = Vec::new();
    for (id, document) in documents.iter() {
        if filter.apply(document)? {
            selected.push((id, document));
        }
    }
    Ok(selected)
}

fn sort_documents(documents: &mut [Document], sort_by: &SortableFields) {
    documents.sort_by(|a, b| {
        for (field, order) in sort_by.sorting_order() {
            let ordering = order.apply(a.get(field).cmp(&b.get(field)));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

fn insert_into(documents: &mut DocumentMap, mut document: Document) -> RepoResult<Document> {
    let id = match document.id() {
        Some(id) => id,
        None => {
            let id = DocumentId::new();
            document.set_id(id.clone());
            id
        }
    };

    if documents.contains_key(&id) {
        log::error!("Document with id {} already exists", id);
        return Err(RepoError::new(
            &format!("Duplicate document id {}", id),
            ErrorKind::UniqueConstraintViolation,
        ));
    }

    documents.insert(id, document.clone());
    Ok(document)
}

fn store_updated(documents: &mut DocumentMap, document: &Document) -> RepoResult<()> {
    match document.id() {
        Some(id) => {
            documents.insert(id, document.clone());
            Ok(())
        }
        None => {
            log::error!("Updated document lost its id: {}", document);
            Err(RepoError::new(
                "Updated document has no id",
                ErrorKind::InternalError,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{order_by, skip_by};
    use crate::common::{SortOrder, Value};
    use crate::doc;
    use crate::filter::{all, by_id, by_ids, field};
    use crate::update::{inc, set};

    fn seeded_store(n: i64) -> InMemoryStore {
        let store = InMemoryStore::default();
        for i in 0..n {
            store.insert_one(doc! { seq: i, parity: (i % 2) }).unwrap();
        }
        store
    }

    #[test]
    fn test_insert_assigns_id() {
        let store = InMemoryStore::default();
        let stored = store.insert_one(doc! { a: 1 }).unwrap();
        let id = stored.id().unwrap();
        assert_eq!(store.find_by_id(&id).unwrap(), Some(stored));
        assert_eq!(store.count(None).unwrap(), 1);
    }

    #[test]
    fn test_insert_keeps_caller_id_and_rejects_duplicates() {
        let store = InMemoryStore::default();
        let mut document = doc! { a: 1 };
        document.set_id(DocumentId::parse("fixed").unwrap());

        let stored = store.insert_one(document.clone()).unwrap();
        assert_eq!(stored.id().unwrap().as_str(), "fixed");

        let err = store.insert_one(document).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UniqueConstraintViolation);
    }

    #[test]
    fn test_insert_many_stops_at_first_failure() {
        let store = InMemoryStore::default();
        let mut duplicate = doc! { a: 2 };
        duplicate.set_id(DocumentId::parse("dup").unwrap());

        let result = store.insert_many(vec![
            doc! { a: 1 },
            duplicate.clone(),
            duplicate,
            doc! { a: 3 },
        ]);
        assert!(result.is_err());
        assert_eq!(store.count(None).unwrap(), 2);
    }

    #[test]
    fn test_count_with_filter() {
        let store = seeded_store(10);
        assert_eq!(store.count(Some(&field("parity").eq(0))).unwrap(), 5);
        assert_eq!(store.count(Some(&all())).unwrap(), 10);
    }

    #[test]
    fn test_find_default_order_is_id_ascending() {
        let store = seeded_store(5);
        let found = store.find(None, &FindOptions::new()).unwrap();
        let seqs: Vec<Value> = found.iter().map(|d| d.get("seq")).collect();
        assert_eq!(seqs, (0..5).map(Value::from).collect::<Vec<_>>());
    }

    #[test]
    fn test_find_sorts_then_windows() {
        let store = seeded_store(10);
        let options = order_by("seq", SortOrder::Descending).skip(2).limit(3);
        let found = store.find(None, &options).unwrap();
        let seqs: Vec<Value> = found.iter().map(|d| d.get("seq")).collect();
        assert_eq!(seqs, vec![Value::from(7), Value::from(6), Value::from(5)]);

        let beyond = store.find(None, &skip_by(u64::MAX)).unwrap();
        assert!(beyond.is_empty());
    }

    #[test]
    fn test_find_multi_key_sort() {
        let store = seeded_store(6);
        let options = order_by("parity", SortOrder::Ascending)
            .sort_by("seq".to_string(), SortOrder::Descending);
        let found = store.find(None, &options).unwrap();
        let seqs: Vec<Value> = found.iter().map(|d| d.get("seq")).collect();
        assert_eq!(
            seqs,
            [4, 2, 0, 5, 3, 1].into_iter().map(Value::from).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_missing_sort_field_sorts_as_null() {
        let store = InMemoryStore::default();
        store.insert_one(doc! { rank: 2 }).unwrap();
        store.insert_one(doc! { other: 1 }).unwrap();
        let found = store
            .find(None, &order_by("rank", SortOrder::Ascending))
            .unwrap();
        assert!(found[0].get("rank").is_null());
    }

    #[test]
    fn test_find_by_id_filters() {
        let store = seeded_store(3);
        let all_docs = store.find(None, &FindOptions::new()).unwrap();
        let first = all_docs[0].id().unwrap();
        let third = all_docs[2].id().unwrap();

        let found = store.find_one(&by_id(first.clone())).unwrap().unwrap();
        assert_eq!(found.get("seq"), Value::from(0));

        let found = store
            .find(Some(&by_ids(vec![third, first])), &FindOptions::new())
            .unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].get("seq"), Value::from(0));
    }

    #[test]
    fn test_delete() {
        let store = seeded_store(6);
        assert_eq!(store.delete_one(&field("parity").eq(1)).unwrap(), 1);
        assert_eq!(store.count(None).unwrap(), 5);
        assert_eq!(store.delete_many(&field("parity").eq(1)).unwrap(), 2);
        assert_eq!(store.delete_many(&field("parity").eq(1)).unwrap(), 0);
        assert_eq!(store.count(None).unwrap(), 3);
    }

    #[test]
    fn test_update_one_returns_stored_state() {
        let store = seeded_store(3);
        let updated = store
            .update_one(&field("seq").eq(1), &set("name", "one"))
            .unwrap()
            .unwrap();
        assert_eq!(updated.get("name"), Value::from("one"));

        let stored = store.find_by_id(&updated.id().unwrap()).unwrap().unwrap();
        assert_eq!(stored, updated);
        assert!(store
            .update_one(&field("seq").eq(99), &set("name", "x"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_update_many_counts_changes_only() {
        let store = seeded_store(4);
        assert_eq!(store.update_many(&all(), &set("parity", 0)).unwrap(), 2);
        assert_eq!(store.update_many(&all(), &set("parity", 0)).unwrap(), 0);
        assert_eq!(store.count(Some(&field("parity").eq(0))).unwrap(), 4);
    }

    #[test]
    fn test_update_many_counts_numeric_kind_change() {
        let store = InMemoryStore::default();
        store.insert_one(doc! { n: 9_007_199_254_740_992.0 }).unwrap();
        assert_eq!(store.update_many(&all(), &set("n", 9_007_199_254_740_993_i64)).unwrap(), 1);
        assert_eq!(store.count(Some(&field("n").eq(9_007_199_254_740_993_i64))).unwrap(), 1);
        assert_eq!(store.count(Some(&field("n").eq(9_007_199_254_740_992.0))).unwrap(), 0);
    }

    #[test]
    fn test_failed_update_many_changes_nothing() {
        let store = seeded_store(2);
        store.insert_one(doc! { seq: "text" }).unwrap();
        let err = store.update_many(&all(), &inc("seq", 1)).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UpdateError);
        assert_eq!(store.count(Some(&field("seq").eq(0))).unwrap(), 1);
    }

    #[test]
    fn test_read_only_store_rejects_writes() {
        let store = InMemoryStore::new(InMemoryStoreConfig::new().read_only(true));
        let err = store.insert_one(doc! { a: 1 }).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::StoreFailure);
        assert_eq!(store.count(None).unwrap(), 0);
    }

    #[test]
    fn test_closed_store_fails() {
        let store = seeded_store(1);
        store.close().unwrap();
        assert!(store.is_closed().unwrap());
        assert_eq!(store.count(None).unwrap_err().kind(), &ErrorKind::StoreClosed);
        assert_eq!(
            store.insert_one(doc! { a: 1 }).unwrap_err().kind(),
            &ErrorKind::StoreClosed
        );
    }

    #[test]
    fn test_filter_errors_propagate() {
        let store = seeded_store(1);
        let err = store.count(Some(&field("").eq(1))).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::FilterError);
    }
}
