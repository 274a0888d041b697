use docrepo::collection::Document;
use docrepo::common::{Sort, Value};
use docrepo::filter::{all, field};
use docrepo::repository::{InsertMany, Pagination};
use docrepo_int_test::test_util::{cleanup, create_test_context, generate_books, run_test, Book};
use std::collections::HashSet;

#[test]
fn test_paging_twenty_five_books() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            repo.insert_many(InsertMany::items(generate_books(25)))?;

            let expected = [(0, 10), (1, 10), (2, 5), (3, 0), (40, 0)];
            for (current, len) in expected {
                let page = repo.find_all_paginated(current, 10, None)?;
                assert_eq!(page.items.len(), len, "page {}", current);
                assert_eq!(page.count, 3);
                assert_eq!(page.total, 25);
                assert_eq!(page.current, current);
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_pages_partition_the_collection() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            repo.insert_many(InsertMany::items(generate_books(47)))?;

            let mut seen = HashSet::new();
            let mut current = 0;
            loop {
                let page = repo.find_all_paginated(current, 6, Some(Sort::ascending("pages")))?;
                for document in &page.items {
                    assert!(seen.insert(document.id().unwrap()));
                }
                if !page.has_next() {
                    break;
                }
                current += 1;
            }
            assert_eq!(current, 7);
            assert_eq!(seen.len(), 47);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_sorted_pages_are_ordered() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            repo.insert_many(InsertMany::items(generate_books(30)))?;

            let page = repo.find_all_paginated(0, 30, Some(Sort::descending("pages")))?;
            let pages: Vec<i64> = page
                .items
                .iter()
                .filter_map(|d| d.get("pages").as_i64())
                .collect();
            let mut sorted = pages.clone();
            sorted.sort_by(|a, b| b.cmp(a));
            assert_eq!(pages, sorted);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_default_order_is_newest_first() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            let inserted = repo.insert_many(InsertMany::items(generate_books(8)))?;

            let page = repo.find_all_paginated(0, 3, None)?;
            let expected: Vec<Document> = inserted.iter().rev().take(3).cloned().collect();
            assert_eq!(page.items, expected);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_filtered_pages_count_only_matches() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            let mut books = Vec::new();
            for i in 0..20 {
                let author = if i % 4 == 0 { "Le Guin" } else { "Someone Else" };
                books.push(Book::new(&format!("Volume {}", i), author, 100 + i));
            }
            repo.insert_many(InsertMany::items(books))?;

            let request = Pagination::new(0, 2)
                .with_filter(field("author").eq("Le Guin"))
                .with_sort(Sort::ascending("pages"));
            let page = repo.find_paginated(request)?;
            assert_eq!(page.total, 5);
            assert_eq!(page.count, 3);
            assert_eq!(page.items[0].get("pages"), Value::I64(100));
            assert_eq!(page.items[1].get("pages"), Value::I64(104));

            let typed = repo.find_items_paginated(
                Pagination::new(2, 2)
                    .with_filter(field("author").eq("Le Guin"))
                    .with_sort(Sort::ascending("pages")),
            )?;
            assert_eq!(typed.items, vec![Book::new("Volume 16", "Le Guin", 116)]);
            assert!(!typed.has_next());
            assert!(typed.has_previous());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_all_filter_matches_unfiltered_paging() {
    run_test(
        create_test_context,
        |ctx| {
            let repo = ctx.repository();
            repo.insert_many(InsertMany::items(generate_books(12)))?;

            let filtered = repo.find_paginated(Pagination::new(1, 5).with_filter(all()))?;
            let unfiltered = repo.find_all_paginated(1, 5, None)?;
            assert_eq!(filtered, unfiltered);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_empty_repository_has_no_pages() {
    run_test(
        create_test_context,
        |ctx| {
            let page = ctx.repository().find_all_paginated(0, 10, None)?;
            assert!(page.is_empty());
            assert_eq!(page.count, 0);
            assert_eq!(page.total, 0);
            Ok(())
        },
        cleanup,
    )
}
