use docrepo::collection::Document;
use docrepo::common::{Convertible, Value};
use docrepo::doc;
use docrepo::errors::{ErrorKind, RepoError, RepoResult};
use docrepo::repository::Repository;
use docrepo::store::memory::{InMemoryStore, InMemoryStoreConfig};
use docrepo::store::DocumentStore;
use fake::faker::company::en::CompanyName;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::Fake;
use rand::Rng;
use std::backtrace::Backtrace;
use std::time::{Duration, Instant};
use std::thread;

/// Runs a test between a setup and a teardown step, retrying a failed run
/// a few times before panicking with the last error.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> RepoResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> RepoResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> RepoResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    const MAX_RETRIES: u32 = 3;
    let mut last_error: Option<String> = None;

    for attempt in 1..=MAX_RETRIES {
        let start_time = Instant::now();

        let result = std::panic::catch_unwind(|| {
            let backtrace = Backtrace::capture();
            match before() {
                Ok(ctx) => match test(ctx.clone()) {
                    Ok(_) => after(ctx)
                        .map_err(|e| (format!("After run failed: {:?}", e), backtrace.to_string())),
                    Err(e) => {
                        let _ = after(ctx);
                        Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                    }
                },
                Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
            }
        });

        let elapsed = start_time.elapsed();
        match result {
            Ok(Ok(_)) => return,
            Ok(Err((e, bt))) => {
                if !bt.is_empty() && !bt.contains("disabled") {
                    eprintln!("Backtrace:\n{}", bt);
                }
                last_error = Some(e);
            }
            Err(panic_err) => {
                let message = if let Some(s) = panic_err.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_err.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                last_error = Some(format!("Panic: {}", message));
            }
        }

        if attempt < MAX_RETRIES {
            eprintln!(
                "Test attempt {}/{} failed after {:?}: {}",
                attempt,
                MAX_RETRIES,
                elapsed,
                last_error.as_deref().unwrap_or("Unknown")
            );
            thread::sleep(Duration::from_millis(50 * attempt as u64));
        }
    }

    panic!(
        "Test failed after {} attempts. Last error: {}",
        MAX_RETRIES,
        last_error.unwrap_or_default()
    );
}

/// A fresh in-memory store and a book repository over it.
#[derive(Clone)]
pub struct TestContext {
    store: InMemoryStore,
    repository: Repository<Book>,
}

impl TestContext {
    pub fn new(store: InMemoryStore, repository: Repository<Book>) -> Self {
        Self { store, repository }
    }

    pub fn store(&self) -> DocumentStore {
        self.store.as_document_store()
    }

    pub fn repository(&self) -> Repository<Book> {
        self.repository.clone()
    }
}

pub fn create_test_context() -> RepoResult<TestContext> {
    let store = InMemoryStore::new(InMemoryStoreConfig::new());
    let repository = Repository::builder()
        .name(&format!("books-{}", uuid::Uuid::new_v4()))
        .max_items_per_page(100)
        .build(store.as_document_store())?;
    Ok(TestContext::new(store, repository))
}

pub fn create_read_only_context() -> RepoResult<TestContext> {
    let store = InMemoryStore::new(InMemoryStoreConfig::new().read_only(true));
    let repository = Repository::builder().build(store.as_document_store())?;
    Ok(TestContext::new(store, repository))
}

pub fn cleanup(ctx: TestContext) -> RepoResult<()> {
    ctx.store().close()
}

/// A domain item stored through the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub pages: i64,
}

impl Book {
    pub fn new(title: &str, author: &str, pages: i64) -> Self {
        Book {
            title: title.to_string(),
            author: author.to_string(),
            publisher: "Unknown".to_string(),
            pages,
        }
    }
}

fn required_string(document: &Document, field: &str) -> RepoResult<String> {
    document
        .get(field)
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| RepoError::new(&format!("missing {}", field), ErrorKind::ObjectMappingError))
}

impl Convertible for Book {
    type Output = Book;

    fn to_value(&self) -> RepoResult<Value> {
        Ok(Value::Document(doc! {
            title: (self.title.clone()),
            author: (self.author.clone()),
            publisher: (self.publisher.clone()),
            pages: (self.pages),
        }))
    }

    fn from_value(value: &Value) -> RepoResult<Book> {
        let document = value
            .as_document()
            .ok_or_else(|| RepoError::new("book must be a document", ErrorKind::ObjectMappingError))?;
        Ok(Book {
            title: required_string(document, "title")?,
            author: required_string(document, "author")?,
            publisher: required_string(document, "publisher")?,
            pages: document.get("pages").as_i64().ok_or_else(|| {
                RepoError::new("missing pages", ErrorKind::ObjectMappingError)
            })?,
        })
    }
}

pub fn generate_book() -> Book {
    let title: String = Sentence(2..5).fake();
    Book {
        title,
        author: Name().fake(),
        publisher: CompanyName().fake(),
        pages: rand::rng().random_range(50..900),
    }
}

pub fn generate_books(count: usize) -> Vec<Book> {
    (0..count).map(|_| generate_book()).collect()
}
