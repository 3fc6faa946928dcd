//! Shared helpers for synchronization integration tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use aporia_core::{
    document::Document,
    error::AporiaError,
    remote::{DocumentStore, MemoryStore},
};
use async_trait::async_trait;
use tokio::sync::Semaphore;

/// Wraps a [`MemoryStore`], counting fetches and saves.
#[derive(Clone, Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    fetches: Arc<AtomicUsize>,
    saves: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn new(inner: MemoryStore) -> Self {
        CountingStore {
            inner,
            fetches: Arc::default(),
            saves: Arc::default(),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn fetch_document(&self, url: &str) -> Result<Document, AporiaError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_document(url).await
    }

    async fn save_document(&self, url: &str, document: &Document) -> Result<(), AporiaError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save_document(url, document).await
    }
}

/// Wraps a [`MemoryStore`], holding every fetch at a gate until a permit is
/// released. Lets tests fire triggers while a load is demonstrably still in
/// flight.
#[derive(Clone)]
pub struct GatedStore {
    pub inner: MemoryStore,
    pub gate: Arc<Semaphore>,
    fetches: Arc<AtomicUsize>,
}

impl GatedStore {
    pub fn new(inner: MemoryStore) -> Self {
        GatedStore {
            inner,
            gate: Arc::new(Semaphore::new(0)),
            fetches: Arc::default(),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for GatedStore {
    async fn fetch_document(&self, url: &str) -> Result<Document, AporiaError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let _permit = self.gate.acquire().await.expect("gate closed");
        self.inner.fetch_document(url).await
    }

    async fn save_document(&self, url: &str, document: &Document) -> Result<(), AporiaError> {
        self.inner.save_document(url, document).await
    }
}

/// Poll `condition` until it holds or roughly two seconds elapse.
pub async fn wait_for(condition: impl Fn() -> bool) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}
