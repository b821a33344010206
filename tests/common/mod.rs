#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use linkstash::application::services::{LinkRegistry, RegistryOptions};
use linkstash::domain::entities::LinkEntry;
use linkstash::domain::errors::StoreError;
use linkstash::domain::repositories::LinkStore;
use linkstash::infrastructure::persistence::InMemoryStore;
use linkstash::routes::build_router;
use linkstash::state::AppState;
use linkstash::utils::code_generator::RandomHexGenerator;
use std::io;
use std::sync::Arc;

pub const BASE_URL: &str = "http://short.test";

/// Store whose writes always fail.
pub struct FailingStore;

#[async_trait]
impl LinkStore for FailingStore {
    async fn load(&self) -> Result<Vec<LinkEntry>, StoreError> {
        Ok(Vec::new())
    }

    async fn save(&self, _entries: &[LinkEntry]) -> Result<(), StoreError> {
        Err(StoreError::Io(io::Error::other("disk full")))
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

pub async fn create_registry(store: Arc<dyn LinkStore>) -> Arc<LinkRegistry> {
    Arc::new(
        LinkRegistry::open(
            store,
            Box::new(RandomHexGenerator::default()),
            RegistryOptions::default(),
        )
        .await,
    )
}

pub async fn create_test_state() -> AppState {
    create_state_with_store(Arc::new(InMemoryStore::new())).await
}

pub async fn create_state_with_store(store: Arc<dyn LinkStore>) -> AppState {
    AppState::new(create_registry(store).await, BASE_URL)
}

pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(build_router(state)).unwrap()
}

/// Creates a link through the registry and returns its short id.
pub async fn create_test_link(state: &AppState, url: &str) -> String {
    state.registry.create(url).await.unwrap()
}
