//! The short-link registry: id generation, deduplication, lookup and
//! durable creation behind a single registry-wide lock.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::domain::entities::LinkEntry;
use crate::domain::errors::RegistryError;
use crate::domain::repositories::LinkStore;
use crate::utils::code_generator::{CodeGenerator, RandomHexGenerator};

/// Default cap on id-generation attempts per create.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

/// Default upper bound on a single durable write.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunables for [`LinkRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct RegistryOptions {
    /// Candidate ids tried before giving up with a namespace-exhaustion error.
    pub max_attempts: usize,
    /// Timeout applied to every [`LinkStore::save`] call.
    pub write_timeout: Duration,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }
}

/// Result of a create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shortened {
    /// A new entry was minted and persisted.
    Created(String),
    /// The URL was already registered under this id; nothing was written.
    Existing(String),
}

impl Shortened {
    pub fn short_id(&self) -> &str {
        match self {
            Shortened::Created(id) | Shortened::Existing(id) => id,
        }
    }

    pub fn into_short_id(self) -> String {
        match self {
            Shortened::Created(id) | Shortened::Existing(id) => id,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Shortened::Created(_))
    }
}

/// Entry set with lookup indexes by id and by original URL.
///
/// `links` keeps insertion order; both maps index into it.
#[derive(Debug, Default)]
struct EntrySet {
    links: Vec<LinkEntry>,
    by_id: HashMap<String, usize>,
    by_url: HashMap<String, usize>,
}

impl EntrySet {
    fn from_loaded(entries: Vec<LinkEntry>) -> Self {
        let mut set = Self::default();
        for entry in entries {
            if set.by_id.contains_key(&entry.short_id) {
                warn!(short_id = %entry.short_id, "Duplicate short id in stored links, keeping first");
                continue;
            }
            set.push(entry);
        }
        set
    }

    fn get(&self, short_id: &str) -> Option<&LinkEntry> {
        self.by_id.get(short_id).map(|&i| &self.links[i])
    }

    fn find_by_url(&self, original_url: &str) -> Option<&LinkEntry> {
        self.by_url.get(original_url).map(|&i| &self.links[i])
    }

    fn contains_id(&self, short_id: &str) -> bool {
        self.by_id.contains_key(short_id)
    }

    fn push(&mut self, entry: LinkEntry) {
        let index = self.links.len();
        self.by_id.insert(entry.short_id.clone(), index);
        self.by_url.entry(entry.original_url.clone()).or_insert(index);
        self.links.push(entry);
    }

    /// Undoes the most recent [`EntrySet::push`].
    fn pop(&mut self) {
        let Some(entry) = self.links.pop() else {
            return;
        };
        let index = self.links.len();
        self.by_id.remove(&entry.short_id);
        if self.by_url.get(&entry.original_url) == Some(&index) {
            self.by_url.remove(&entry.original_url);
        }
    }
}

/// The process-wide short-link registry.
///
/// Constructed once at startup with [`LinkRegistry::open`] and shared behind
/// an `Arc`. Readers ([`resolve`](Self::resolve), [`count`](Self::count),
/// [`list_all`](Self::list_all)) take the shared lock; [`create`](Self::create)
/// holds the exclusive lock across dedup check, id generation, insert and the
/// durable write, so concurrent creates never interleave and readers never
/// observe a half-applied create.
pub struct LinkRegistry {
    store: Arc<dyn LinkStore>,
    generator: Box<dyn CodeGenerator>,
    options: RegistryOptions,
    entries: RwLock<EntrySet>,
}

impl LinkRegistry {
    /// Loads the registry from `store`.
    ///
    /// A failed load is not fatal: it is logged and the registry starts empty.
    pub async fn open(
        store: Arc<dyn LinkStore>,
        generator: Box<dyn CodeGenerator>,
        options: RegistryOptions,
    ) -> Self {
        let entries = match store.load().await {
            Ok(entries) => {
                info!(
                    backend = store.backend_name(),
                    count = entries.len(),
                    "Loaded short links"
                );
                EntrySet::from_loaded(entries)
            }
            Err(e) => {
                warn!(
                    backend = store.backend_name(),
                    error = %e,
                    "Failed to load short links, starting with an empty registry"
                );
                EntrySet::default()
            }
        };

        Self {
            store,
            generator,
            options,
            entries: RwLock::new(entries),
        }
    }

    /// Loads the registry with the random hex generator and default options.
    pub async fn open_default(store: Arc<dyn LinkStore>) -> Self {
        Self::open(
            store,
            Box::new(RandomHexGenerator::default()),
            RegistryOptions::default(),
        )
        .await
    }

    /// Returns the original URL bound to `short_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for any id that is not registered,
    /// well-formed or not.
    pub async fn resolve(&self, short_id: &str) -> Result<String, RegistryError> {
        let entries = self.entries.read().await;
        entries
            .get(short_id)
            .map(|entry| entry.original_url.clone())
            .ok_or_else(|| RegistryError::NotFound(short_id.to_string()))
    }

    /// Returns the short id for `original_url`, minting one if needed.
    ///
    /// See [`LinkRegistry::shorten`] for the full contract.
    pub async fn create(&self, original_url: &str) -> Result<String, RegistryError> {
        self.shorten(original_url)
            .await
            .map(Shortened::into_short_id)
    }

    /// Registers `original_url`, reporting whether a new entry was created.
    ///
    /// URLs are compared byte for byte: no normalization is applied, so
    /// `https://a.com` and `https://a.com/` are distinct links.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidInput`] if `original_url` is empty.
    /// - [`RegistryError::PersistenceFailure`] if no free id was found within
    ///   the attempt cap, or the durable write failed or timed out. The
    ///   registry is left exactly as it was before the call.
    pub async fn shorten(&self, original_url: &str) -> Result<Shortened, RegistryError> {
        if original_url.is_empty() {
            return Err(RegistryError::InvalidInput(
                "URL must not be empty".to_string(),
            ));
        }

        let mut entries = self.entries.write().await;

        if let Some(existing) = entries.find_by_url(original_url) {
            debug!(short_id = %existing.short_id, "URL already registered");
            return Ok(Shortened::Existing(existing.short_id.clone()));
        }

        let short_id = self.next_free_id(&entries)?;
        entries.push(LinkEntry::created_now(
            short_id.clone(),
            original_url.to_string(),
        ));

        if let Err(e) = self.persist(&entries.links).await {
            entries.pop();
            error!(short_id = %short_id, error = %e, "Failed to persist new short link, rolled back");
            return Err(e);
        }

        info!(short_id = %short_id, total = entries.links.len(), "Created short link");
        Ok(Shortened::Created(short_id))
    }

    /// Number of registered links.
    pub async fn count(&self) -> usize {
        self.entries.read().await.links.len()
    }

    /// Snapshot of every entry in insertion order.
    pub async fn list_all(&self) -> Vec<LinkEntry> {
        self.entries.read().await.links.clone()
    }

    /// Name of the underlying storage backend.
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    fn next_free_id(&self, entries: &EntrySet) -> Result<String, RegistryError> {
        for attempt in 1..=self.options.max_attempts {
            let candidate = self.generator.generate().map_err(|e| {
                RegistryError::PersistenceFailure(format!("entropy source unavailable: {e}"))
            })?;

            if !entries.contains_id(&candidate) {
                return Ok(candidate);
            }
            debug!(attempt, candidate = %candidate, "Short id collision, retrying");
        }

        error!(
            attempts = self.options.max_attempts,
            total = entries.links.len(),
            "Short id namespace exhausted"
        );
        Err(RegistryError::PersistenceFailure(format!(
            "no free short id after {} attempts",
            self.options.max_attempts
        )))
    }

    async fn persist(&self, links: &[LinkEntry]) -> Result<(), RegistryError> {
        match timeout(self.options.write_timeout, self.store.save(links)).await {
            Ok(result) => result.map_err(RegistryError::from),
            Err(_) => Err(RegistryError::PersistenceFailure(format!(
                "durable write timed out after {} ms",
                self.options.write_timeout.as_millis()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::StoreError;
    use crate::domain::repositories::MockLinkStore;
    use crate::infrastructure::persistence::InMemoryStore;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::{HashSet, VecDeque};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Yields the scripted ids in order, then repeats the last one.
    struct ScriptedGenerator {
        codes: Mutex<VecDeque<String>>,
        last: Mutex<String>,
    }

    impl ScriptedGenerator {
        fn new(codes: &[&str]) -> Self {
            Self {
                codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
                last: Mutex::new(String::new()),
            }
        }
    }

    impl CodeGenerator for ScriptedGenerator {
        fn generate(&self) -> Result<String, getrandom::Error> {
            let mut last = self.last.lock().unwrap();
            if let Some(next) = self.codes.lock().unwrap().pop_front() {
                *last = next;
            }
            Ok(last.clone())
        }
    }

    /// A store whose writes never finish in time.
    struct StalledStore;

    #[async_trait]
    impl LinkStore for StalledStore {
        async fn load(&self) -> Result<Vec<LinkEntry>, StoreError> {
            Ok(Vec::new())
        }

        async fn save(&self, _entries: &[LinkEntry]) -> Result<(), StoreError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }

        fn backend_name(&self) -> &'static str {
            "stalled"
        }
    }

    async fn memory_registry() -> LinkRegistry {
        LinkRegistry::open_default(Arc::new(InMemoryStore::new())).await
    }

    async fn scripted_registry(codes: &[&str], max_attempts: usize) -> LinkRegistry {
        LinkRegistry::open(
            Arc::new(InMemoryStore::new()),
            Box::new(ScriptedGenerator::new(codes)),
            RegistryOptions {
                max_attempts,
                ..RegistryOptions::default()
            },
        )
        .await
    }

    fn mock_store() -> MockLinkStore {
        let mut store = MockLinkStore::new();
        store.expect_load().times(1).returning(|| Ok(Vec::new()));
        store.expect_backend_name().return_const("mock");
        store
    }

    #[tokio::test]
    async fn test_create_then_resolve() {
        let registry = memory_registry().await;

        let id = registry
            .create("https://example.com/very/long/path")
            .await
            .unwrap();

        assert_eq!(id.len(), 6);
        assert_eq!(
            registry.resolve(&id).await.unwrap(),
            "https://example.com/very/long/path"
        );
    }

    #[tokio::test]
    async fn test_create_same_url_twice_returns_same_id() {
        let registry = memory_registry().await;

        let first = registry.shorten("https://dedup.com").await.unwrap();
        let second = registry.shorten("https://dedup.com").await.unwrap();

        assert!(first.is_created());
        assert_eq!(second, Shortened::Existing(first.short_id().to_string()));
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_dedup_hit_does_not_write() {
        let mut store = mock_store();
        store.expect_save().times(1).returning(|_| Ok(()));
        let registry = LinkRegistry::open_default(Arc::new(store)).await;

        registry.create("https://once.com").await.unwrap();
        registry.create("https://once.com").await.unwrap();
    }

    #[tokio::test]
    async fn test_no_url_normalization() {
        let registry = memory_registry().await;

        let a = registry.create("https://example.com").await.unwrap();
        let b = registry.create("https://example.com/").await.unwrap();
        let c = registry.create("HTTPS://example.com").await.unwrap();

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(registry.count().await, 3);
    }

    #[tokio::test]
    async fn test_create_empty_url_is_invalid() {
        let mut store = mock_store();
        store.expect_save().times(0);
        let registry = LinkRegistry::open_default(Arc::new(store)).await;

        let err = registry.create("").await.unwrap_err();

        assert!(matches!(err, RegistryError::InvalidInput(_)));
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn test_resolve_unknown_id() {
        let registry = memory_registry().await;

        let err = registry.resolve("doesNotExist").await.unwrap_err();

        assert_eq!(err, RegistryError::NotFound("doesNotExist".to_string()));
    }

    #[tokio::test]
    async fn test_collision_retries_until_free() {
        let registry = scripted_registry(&["aaaaaa", "aaaaaa", "aaaaaa", "bbbbbb"], 10).await;

        let first = registry.create("https://one.com").await.unwrap();
        let second = registry.create("https://two.com").await.unwrap();

        assert_eq!(first, "aaaaaa");
        assert_eq!(second, "bbbbbb");
    }

    #[tokio::test]
    async fn test_namespace_exhaustion_is_persistence_failure() {
        let registry = scripted_registry(&["aaaaaa"], 5).await;
        registry.create("https://one.com").await.unwrap();

        let err = registry.create("https://two.com").await.unwrap_err();

        assert!(matches!(err, RegistryError::PersistenceFailure(_)));
        assert!(err.to_string().contains("5 attempts"));
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back() {
        let mut store = mock_store();
        let calls = AtomicUsize::new(0);
        store.expect_save().times(2).returning(move |_| {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(StoreError::Io(std::io::Error::other("disk full")))
            } else {
                Ok(())
            }
        });
        let registry = LinkRegistry::open(
            Arc::new(store),
            Box::new(ScriptedGenerator::new(&["abc123", "def456"])),
            RegistryOptions::default(),
        )
        .await;

        let err = registry.create("https://example.com").await.unwrap_err();
        assert!(matches!(err, RegistryError::PersistenceFailure(_)));
        assert_eq!(registry.count().await, 0);
        assert!(registry.resolve("abc123").await.is_err());

        // The failed URL is not remembered for dedup; a retry mints afresh.
        let id = registry.create("https://example.com").await.unwrap();
        assert_eq!(id, "def456");
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_saved_snapshot_contains_new_entry() {
        let mut store = mock_store();
        store
            .expect_save()
            .withf(|entries: &[LinkEntry]| {
                entries.len() == 1 && entries[0].original_url == "https://saved.com"
            })
            .times(1)
            .returning(|_| Ok(()));
        let registry = LinkRegistry::open_default(Arc::new(store)).await;

        registry.create("https://saved.com").await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_timeout_is_persistence_failure() {
        let registry = LinkRegistry::open(
            Arc::new(StalledStore),
            Box::new(RandomHexGenerator::default()),
            RegistryOptions {
                write_timeout: Duration::from_millis(50),
                ..RegistryOptions::default()
            },
        )
        .await;

        let err = registry.create("https://slow.com").await.unwrap_err();

        assert!(err.to_string().contains("timed out"));
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn test_load_failure_starts_empty() {
        let mut store = MockLinkStore::new();
        store
            .expect_load()
            .times(1)
            .returning(|| Err(StoreError::Corrupt("unexpected EOF".to_string())));
        store.expect_backend_name().return_const("mock");

        let registry = LinkRegistry::open_default(Arc::new(store)).await;

        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn test_loaded_duplicates_keep_first() {
        let now = Utc::now();
        let store = InMemoryStore::with_entries(vec![
            LinkEntry::new("abc123".into(), "https://first.com".into(), now),
            LinkEntry::new("abc123".into(), "https://second.com".into(), now),
            LinkEntry::new("def456".into(), "https://third.com".into(), now),
        ]);

        let registry = LinkRegistry::open_default(Arc::new(store)).await;

        assert_eq!(registry.count().await, 2);
        assert_eq!(registry.resolve("abc123").await.unwrap(), "https://first.com");
    }

    #[tokio::test]
    async fn test_list_all_keeps_insertion_order() {
        let registry = scripted_registry(&["ffffff", "000000", "888888"], 10).await;

        for url in ["https://c.com", "https://a.com", "https://b.com"] {
            registry.create(url).await.unwrap();
        }

        let ids: Vec<String> = registry
            .list_all()
            .await
            .into_iter()
            .map(|e| e.short_id)
            .collect();
        assert_eq!(ids, vec!["ffffff", "000000", "888888"]);
    }

    #[tokio::test]
    async fn test_reopen_from_same_store() {
        let store = Arc::new(InMemoryStore::new());
        let first = LinkRegistry::open_default(store.clone()).await;
        let id = first.create("https://persisted.com").await.unwrap();
        drop(first);

        let reopened = LinkRegistry::open_default(store).await;

        assert_eq!(reopened.resolve(&id).await.unwrap(), "https://persisted.com");
        assert_eq!(
            reopened.create("https://persisted.com").await.unwrap(),
            id
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_distinct_urls() {
        let registry = Arc::new(memory_registry().await);
        let mut handles = Vec::new();

        for i in 0..64 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                registry
                    .create(&format!("https://example{i}.com"))
                    .await
                    .unwrap()
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }

        assert_eq!(ids.len(), 64);
        assert_eq!(registry.count().await, 64);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_same_url() {
        let registry = Arc::new(memory_registry().await);
        let mut handles = Vec::new();

        for _ in 0..64 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                registry.create("https://same.com").await.unwrap()
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }

        assert_eq!(ids.len(), 1);
        assert_eq!(registry.count().await, 1);
    }
}
