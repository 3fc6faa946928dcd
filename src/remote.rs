//! The consumed remote-document capability and its adapters.
//!
//! The synchronization controller never talks to a concrete backend; it is
//! handed a [`DocumentStore`] at construction. Two adapters ship with the
//! crate: [`MemoryStore`] (in-process, always available) and `HttpStore`
//! (JSON over HTTP, behind the `http` feature). Embedders with their own
//! persistence implement the trait themselves.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::{collections::BTreeMap, sync::Arc};

use crate::{document::Document, error::AporiaError};

/// A generic key-document store.
///
/// The contract is small: documents are fetched and saved whole, and a fetch
/// of an unknown identifier fails with [`AporiaError::NotFound`] so callers
/// can distinguish "absent" from "broken". Implementations decide nothing
/// about timeouts or retries; operations resolve or fail on their own terms.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the document at `url`. Fails with [`AporiaError::NotFound`] when
    /// the identifier does not exist; any other failure kind propagates
    /// unchanged.
    async fn fetch_document(&self, url: &str) -> Result<Document, AporiaError>;

    /// Produce a new, empty document.
    async fn create_empty_document(&self) -> Result<Document, AporiaError> {
        Ok(Document::default())
    }

    /// Persist `document` at `url`, replacing whatever was there.
    async fn save_document(&self, url: &str, document: &Document) -> Result<(), AporiaError>;
}

/// In-process adapter: a key-document map behind a lock.
///
/// Serves both as the test double and as session-local persistence for
/// embedders running without a remote. Clones share the same map.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    documents: Arc<RwLock<BTreeMap<String, Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Seed a document directly, bypassing the capability surface.
    pub fn insert(&self, url: impl Into<String>, document: Document) {
        self.documents.write().insert(url.into(), document);
    }

    /// Peek at a stored document directly, bypassing the capability surface.
    pub fn get(&self, url: &str) -> Option<Document> {
        self.documents.read().get(url).cloned()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn fetch_document(&self, url: &str) -> Result<Document, AporiaError> {
        self.documents
            .read()
            .get(url)
            .cloned()
            .ok_or_else(|| AporiaError::NotFound(url.to_string()))
    }

    async fn save_document(&self, url: &str, document: &Document) -> Result<(), AporiaError> {
        self.documents
            .write()
            .insert(url.to_string(), document.clone());
        Ok(())
    }
}

#[cfg(feature = "http")]
pub use self::http::HttpStore;

#[cfg(feature = "http")]
mod http {
    use super::*;

    /// Network adapter: documents move as JSON, GET to fetch, PUT to save.
    /// A 404 response maps to [`AporiaError::NotFound`]; every other failure
    /// surfaces as a service error.
    #[derive(Debug, Default, Clone)]
    pub struct HttpStore {
        client: reqwest::Client,
    }

    impl HttpStore {
        pub fn new() -> Self {
            HttpStore::default()
        }

        /// Use a preconfigured client (auth headers, proxies, TLS settings).
        pub fn with_client(client: reqwest::Client) -> Self {
            HttpStore { client }
        }
    }

    #[async_trait]
    impl DocumentStore for HttpStore {
        async fn fetch_document(&self, url: &str) -> Result<Document, AporiaError> {
            let response = self.client.get(url).send().await?;
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Err(AporiaError::NotFound(url.to_string()));
            }
            let response = response.error_for_status()?;
            Ok(response.json::<Document>().await?)
        }

        async fn save_document(&self, url: &str, document: &Document) -> Result<(), AporiaError> {
            self.client
                .put(url)
                .json(document)
                .send()
                .await?
                .error_for_status()?;
            Ok(())
        }
    }
}
