use docrepo::collection::Document;
use docrepo::doc;
use docrepo::errors::ErrorKind;
use docrepo::filter::{all, field};
use docrepo::repository::{InsertMany, InsertOne, Pagination, RemoveMany, RemoveOne, Repository};
use docrepo::store::memory::InMemoryStore;
use docrepo::update::{inc, push, set};
use docrepo_int_test::test_util::{
    cleanup, create_read_only_context, create_test_context, generate_book, run_test, Book,
};

#[test]
fn test_zero_items_per_page() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            let err = repo.find_all_paginated(0, 0, None).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidArgument);

            let err = repo.find_paginated(Pagination::new(0, 0)).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidArgument);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_page_size_above_configured_maximum() {
    run_test(
        create_test_context,
        |ctx| {
            let err = ctx.repository().find_all_paginated(0, 101, None).unwrap_err();
            assert!(err.is_argument_error());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_malformed_identities() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            let too_long = "9".repeat(129);
            for id in ["", "has space", too_long.as_str()] {
                assert!(repo.find_by_id(id).unwrap_err().is_argument_error());
                assert!(repo.remove_one(RemoveOne::id(id)).unwrap_err().is_argument_error());
            }
            assert!(repo.find_by_id("unknown-but-valid")?.is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_selector_misuse() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            let neither: InsertOne<Book> = InsertOne {
                item: None,
                document: None,
            };
            assert!(repo.insert_one(neither).unwrap_err().is_argument_error());

            let both: InsertMany<Book> = InsertMany {
                items: Some(vec![generate_book()]),
                documents: Some(vec![doc! { a: 1 }]),
            };
            assert!(repo.insert_many(both).unwrap_err().is_argument_error());
            assert_eq!(repo.count(None)?, 0);

            assert!(repo.insert_many(InsertMany::documents(vec![]))?.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_remove_without_usable_key() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            repo.insert_one(InsertOne::item(generate_book()))?;

            let none: RemoveOne<Book> = RemoveOne {
                id: None,
                document: None,
                item: None,
            };
            assert!(repo.remove_one(none).unwrap_err().is_argument_error());

            let empty = RemoveMany::documents(vec![Document::new()]);
            assert!(repo.remove_many(empty).unwrap_err().is_argument_error());
            assert_eq!(repo.count(None)?, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_duplicate_identity_rejected() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            let stored = repo.insert_one(InsertOne::item(generate_book()))?;
            let err = repo.insert_one(InsertOne::document(stored)).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::UniqueConstraintViolation);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_partial_insert_many() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            let stored = repo.insert_one(InsertOne::document(doc! { n: 0 }))?;
            let batch = vec![doc! { n: 1 }, stored, doc! { n: 2 }];
            let err = repo.insert_many(InsertMany::documents(batch)).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::UniqueConstraintViolation);
            assert_eq!(repo.count(None)?, 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_invalid_updates() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            repo.insert_one(InsertOne::item(Book::new("Title", "Author", 10)))?;

            let err = repo.update_one(&all(), &inc("title", 1)).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::UpdateError);

            let err = repo.update_many(&all(), &push("pages", 1)).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::UpdateError);

            let unchanged = repo.find_one(&field("title").eq("Title"))?.unwrap();
            assert_eq!(ctx.repository().to_item(&unchanged)?, Book::new("Title", "Author", 10));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_read_only_store_failures_propagate() {
    run_test(
        create_read_only_context,
        |ctx| {
            let repo = ctx.repository();
            let err = repo.insert_one(InsertOne::item(generate_book())).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::StoreFailure);

            let err = repo.update_many(&all(), &set("a", 1)).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::StoreFailure);

            let page = repo.find_all_paginated(0, 10, None)?;
            assert!(page.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_closed_store_failures_propagate() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            ctx.store().close()?;

            let err = repo.find_all_paginated(0, 10, None).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::StoreClosed);
            let err = repo.count(None).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::StoreClosed);

            let result: Result<Repository<Book>, _> = Repository::builder().build(ctx.store());
            assert_eq!(result.err().map(|e| e.kind().clone()), Some(ErrorKind::StoreClosed));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_invalid_filter_propagates() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            repo.insert_one(InsertOne::item(generate_book()))?;
            let err = repo
                .find_paginated(Pagination::new(0, 10).with_filter(field("pages").gt(doc! {})))
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::FilterError);

            let other: Repository<Book> =
                Repository::builder().build(InMemoryStore::default().as_document_store())?;
            assert_eq!(other.count(Some(&field("pages").gt(doc! {})))?, 0);
            Ok(())
        },
        cleanup,
    )
}
