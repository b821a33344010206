//! Storage port for the link registry.

use crate::domain::entities::LinkEntry;
use crate::domain::errors::StoreError;
use async_trait::async_trait;

/// Durable storage for the full set of link entries.
///
/// The registry owns all invariants (uniqueness, deduplication, ordering);
/// a store only loads and replaces the whole entry set. The registry calls
/// [`LinkStore::save`] from inside its exclusive section, so implementations
/// never see concurrent writes.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::JsonFileStore`] - JSON state file
/// - [`crate::infrastructure::persistence::InMemoryStore`] - non-durable, for tests and ephemeral runs
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Loads every stored entry in stored order.
    ///
    /// A store that has never been written returns an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the stored data cannot be parsed and
    /// [`StoreError::Io`] if it cannot be read.
    async fn load(&self) -> Result<Vec<LinkEntry>, StoreError>;

    /// Replaces the stored set with `entries`.
    ///
    /// Must not return `Ok` before the data is durable.
    async fn save(&self, entries: &[LinkEntry]) -> Result<(), StoreError>;

    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &'static str;
}
