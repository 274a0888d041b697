use docrepo::common::Value;
use docrepo::filter::{and, by_ids, field, not, or};
use docrepo::repository::InsertMany;
use docrepo_int_test::test_util::{cleanup, create_test_context, run_test, Book};

fn library() -> Vec<Book> {
    vec![
        Book::new("Dune", "Herbert", 412),
        Book::new("Emma", "Austen", 474),
        Book::new("Persuasion", "Austen", 249),
        Book::new("Solaris", "Lem", 204),
        Book::new("Ubik", "Dick", 202),
    ]
}

#[test]
fn test_find_one_and_count_with_filters() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            repo.insert_many(InsertMany::items(library()))?;

            let found = repo.find_one(&field("title").eq("Solaris"))?.unwrap();
            assert_eq!(found.get("author"), Value::from("Lem"));
            assert!(repo.find_one(&field("title").eq("Missing"))?.is_none());

            assert_eq!(repo.count(Some(&field("author").eq("Austen")))?, 2);
            assert_eq!(repo.count(Some(&field("pages").lt(250)))?, 3);
            assert_eq!(repo.count(Some(&field("pages").gte(412)))?, 2);
            assert_eq!(repo.count(Some(&field("author").in_array(vec!["Lem", "Dick"])))?, 2);
            assert_eq!(repo.count(Some(&field("author").not_in_array(vec!["Austen"])))?, 3);
            assert_eq!(repo.count(Some(&field("isbn").exists(false)))?, 5);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_logical_filters() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            repo.insert_many(InsertMany::items(library()))?;

            let austen_short = and(vec![field("author").eq("Austen"), field("pages").lt(300)]);
            assert_eq!(repo.count(Some(&austen_short))?, 1);

            let either = or(vec![field("title").eq("Dune"), field("title").eq("Ubik")]);
            assert_eq!(repo.count(Some(&either))?, 2);

            assert_eq!(repo.count(Some(&not(either)))?, 3);
            assert_eq!(repo.count(Some(&field("author").ne("Austen")))?, 3);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_all_and_identity_filters() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            let stored = repo.insert_many(InsertMany::items(library()))?;

            let all = repo.find_all()?;
            assert_eq!(all.len(), 5);
            assert_eq!(all.first(), stored.last());

            let ids = stored.iter().take(2).filter_map(|d| d.id()).collect();
            assert_eq!(repo.count(Some(&by_ids(ids)))?, 2);
            Ok(())
        },
        cleanup,
    )
}
