//! Non-durable link store.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::entities::LinkEntry;
use crate::domain::errors::StoreError;
use crate::domain::repositories::LinkStore;

/// Keeps the last saved entry set in memory.
///
/// Used for `STORAGE_BACKEND=memory` and in tests. Sharing one instance
/// between two registries behaves like a process restart against the same
/// state.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Mutex<Vec<LinkEntry>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    pub fn with_entries(entries: Vec<LinkEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }
}

#[async_trait]
impl LinkStore for InMemoryStore {
    async fn load(&self) -> Result<Vec<LinkEntry>, StoreError> {
        Ok(self.entries.lock().await.clone())
    }

    async fn save(&self, entries: &[LinkEntry]) -> Result<(), StoreError> {
        *self.entries.lock().await = entries.to_vec();
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
