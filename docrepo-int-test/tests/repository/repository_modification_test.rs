use docrepo::collection::Document;
use docrepo::common::{Value, DOC_ID};
use docrepo::doc;
use docrepo::filter::{all, field};
use docrepo::repository::{InsertMany, InsertOne, RemoveMany, RemoveOne};
use docrepo::update::{inc, push, rename, set, unset, Update};
use docrepo_int_test::test_util::{
    cleanup, create_test_context, generate_book, generate_books, run_test, Book,
};

#[test]
fn test_insert_item_assigns_identity() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            let book = generate_book();
            let stored = repo.insert_one(InsertOne::item(book.clone()))?;

            let id = stored.id().unwrap();
            assert_eq!(id.as_str().len(), 19);
            assert_eq!(repo.to_item(&stored)?, book);

            let found = repo.find_by_id(id.as_str())?.unwrap();
            assert_eq!(found, stored);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_document_keeps_fields() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            let stored = repo.insert_one(InsertOne::document(doc! {
                title: "Dune",
                tags: ["scifi", "classic"],
            }))?;
            assert!(stored.has_id());
            assert_eq!(stored.get("tags.0"), Value::from("scifi"));
            assert_eq!(repo.count(None)?, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_many_documents() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            let documents = vec![doc! { n: 1 }, doc! { n: 2 }, doc! { n: 3 }];
            let stored = repo.insert_many(InsertMany::documents(documents))?;
            assert_eq!(stored.len(), 3);
            assert!(stored.iter().all(Document::has_id));
            assert!(stored[0].id() < stored[2].id());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_remove_one_by_each_key() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            let books = generate_books(3);
            let stored = repo.insert_many(InsertMany::items(books.clone()))?;

            let id = stored[0].id().unwrap();
            repo.remove_one(RemoveOne::id(id.as_str()))?;
            assert!(repo.find_by_id(id.as_str())?.is_none());

            repo.remove_one(RemoveOne::document(stored[1].clone()))?;
            repo.remove_one(RemoveOne::item(books[2].clone()))?;
            assert_eq!(repo.count(None)?, 0);

            repo.remove_one(RemoveOne::item(books[2].clone()))?;
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_remove_one_unknown_id_keeps_count() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            repo.insert_many(InsertMany::items(generate_books(4)))?;

            repo.remove_one(RemoveOne::id("x"))?;
            assert_eq!(repo.count(None)?, 4);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_remove_many_returns_removed_count() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            let stored = repo.insert_many(InsertMany::items(generate_books(10)))?;

            let ids = stored[..4]
                .iter()
                .filter_map(|d| d.id())
                .map(|id| id.to_string())
                .collect();
            assert_eq!(repo.remove_many(RemoveMany::ids(ids))?, 4);

            let documents: Vec<Document> = stored[4..7].iter().map(|d| d.without_id()).collect();
            assert_eq!(repo.remove_many(RemoveMany::documents(documents))?, 3);

            assert_eq!(repo.remove_many(RemoveMany::documents(vec![]))?, 0);
            assert_eq!(repo.count(None)?, 3);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_remove_many_ignores_lower_precedence_keys() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            let books = generate_books(4);
            let stored = repo.insert_many(InsertMany::items(books.clone()))?;

            let remove = RemoveMany {
                ids: Some(vec![stored[0].id().unwrap().to_string()]),
                documents: None,
                items: Some(books[1..].to_vec()),
            };
            assert_eq!(repo.remove_many(remove)?, 1);
            assert_eq!(repo.count(None)?, 3);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_one_returns_updated_document() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            repo.insert_one(InsertOne::item(Book::new("Emma", "Austen", 400)))?;

            let update = set("publisher", "Penguin")
                .inc("pages", 25)
                .push("editions", 1)
                .rename("author", "writer");
            let updated = repo.update_one(&field("title").eq("Emma"), &update)?.unwrap();
            assert_eq!(updated.get("publisher"), Value::from("Penguin"));
            assert_eq!(updated.get("pages"), Value::I64(425));
            assert_eq!(updated.get("editions"), Value::Array(vec![Value::I64(1)]));
            assert_eq!(updated.get("writer"), Value::from("Austen"));
            assert!(!updated.contains_key("author"));

            let stored = repo.find_by_id(updated.id().unwrap().as_str())?.unwrap();
            assert_eq!(stored, updated);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_many_counts_changed_documents() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            let books = vec![
                Book::new("A", "X", 10),
                Book::new("B", "X", 20),
                Book::new("C", "Y", 30),
            ];
            repo.insert_many(InsertMany::items(books))?;

            assert_eq!(repo.update_many(&field("author").eq("X"), &set("author", "Z"))?, 2);
            assert_eq!(repo.update_many(&all(), &set("author", "Z"))?, 1);
            assert_eq!(repo.update_many(&all(), &unset("missing"))?, 0);
            assert_eq!(repo.update_many(&all(), &Update::new())?, 0);
            assert_eq!(repo.update_many(&all(), &inc("pages", 1))?, 3);
            assert_eq!(repo.count(Some(&field("pages").gt(30)))?, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_replaces_float_with_nearby_integer() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            repo.insert_one(InsertOne::document(doc! { n: 9_007_199_254_740_992.0 }))?;

            assert_eq!(repo.update_many(&all(), &set("n", 9_007_199_254_740_993_i64))?, 1);
            assert_eq!(repo.count(Some(&field("n").eq(9_007_199_254_740_993_i64)))?, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_unset_inside_array_keeps_element_positions() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            repo.insert_one(InsertOne::document(doc! { arr: [{ x: 1 }, { x: 2 }] }))?;

            assert_eq!(repo.update_many(&all(), &unset("arr.0.x"))?, 1);
            let stored = repo.find_one(&all())?.unwrap();
            assert_eq!(stored.get("arr.0"), Value::Document(Document::new()));
            assert_eq!(stored.get("arr.1.x"), Value::from(2));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_identity_rejected() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            repo.insert_one(InsertOne::item(generate_book()))?;
            let err = repo.update_many(&all(), &rename(DOC_ID, "id")).unwrap_err();
            assert!(err.is_argument_error());
            let err = repo.update_one(&all(), &push(DOC_ID, 1)).unwrap_err();
            assert!(err.is_argument_error());
            Ok(())
        },
        cleanup,
    )
}
