use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Configuration of an [`super::InMemoryStore`].
///
/// ```text
/// let config = InMemoryStoreConfig::new().read_only(true);
/// let store = InMemoryStore::new(config);
/// ```
#[derive(Default, Clone)]
pub struct InMemoryStoreConfig {
    inner: Arc<InMemoryStoreConfigInner>,
}

impl InMemoryStoreConfig {
    pub fn new() -> InMemoryStoreConfig {
        InMemoryStoreConfig {
            inner: Arc::new(InMemoryStoreConfigInner::new()),
        }
    }

    /// Makes every write primitive fail with a store failure.
    pub fn read_only(self, read_only: bool) -> InMemoryStoreConfig {
        InMemoryStoreConfig {
            inner: Arc::new(InMemoryStoreConfigInner { read_only }),
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.inner.read_only
    }
}

impl Debug for InMemoryStoreConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStoreConfig")
            .field("read_only", &self.inner.read_only)
            .finish()
    }
}

#[derive(Default)]
struct InMemoryStoreConfigInner {
    read_only: bool,
}

impl InMemoryStoreConfigInner {
    fn new() -> InMemoryStoreConfigInner {
        InMemoryStoreConfigInner { read_only: false }
    }
}
