//! Synchronization controller: one-shot remote load, save-on-change.
//!
//! A [`SyncController`] owns the remote document lifecycle for one store. It
//! subscribes to the store at construction and then runs two serialized
//! flows:
//!
//! - **Load**, at most once per controller lifetime: fetch the document
//!   (creating and persisting an empty one when absent), decode every node,
//!   and replace the store's collection wholesale. Repeated or concurrent
//!   trigger firings share a single in-flight fetch; a failed load leaves the
//!   latch unset so the next firing retries.
//! - **Save**, after the load has completed, whenever the collection changes
//!   by content: fetch the document fresh, encode the full collection over
//!   it, persist it whole. Changes arriving during an in-flight save are not
//!   queued individually; the latest observed state wins on the next idle
//!   slot, so rapid back-to-back changes may have intermediate states
//!   skipped.
//!
//! Failures never cross the boundary as panics: they land on the shared
//! [`SyncStatus`] as a readable message and the local cache stays usable.
//! There is no cancellation and no timeout; an in-flight operation runs to
//! completion on the remote adapter's own terms.

use parking_lot::Mutex;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::sync::{
    mpsc::{self, UnboundedReceiver},
    OnceCell,
};

use crate::{
    codec,
    error::AporiaError,
    properties::Doubt,
    remote::DocumentStore,
    store::{DoubtStore, SubscriberId},
};

/// Read-only synchronization status shared with the presentation layer.
#[derive(Debug, Default)]
pub struct SyncStatus {
    syncing: AtomicBool,
    error: Mutex<Option<String>>,
}

impl SyncStatus {
    /// True for the entire duration of a load or save round trip.
    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::Acquire)
    }

    /// Readable message from the most recent failed operation. Cleared when
    /// the next operation begins.
    pub fn error(&self) -> Option<String> {
        self.error.lock().clone()
    }

    fn begin(&self) {
        self.syncing.store(true, Ordering::Release);
        self.error.lock().take();
    }

    fn finish(&self, result: &Result<(), AporiaError>) {
        if let Err(err) = result {
            tracing::warn!("sync operation failed: {err}");
            *self.error.lock() = Some(err.to_string());
        }
        self.syncing.store(false, Ordering::Release);
    }
}

pub struct SyncController<S: DocumentStore> {
    store: Arc<DoubtStore>,
    remote: S,
    dataset_url: String,
    status: Arc<SyncStatus>,
    loaded: OnceCell<()>,
    save_lock: tokio::sync::Mutex<()>,
    last_synced: Mutex<Vec<Doubt>>,
    changes: Mutex<Option<UnboundedReceiver<Vec<Doubt>>>>,
    subscription: SubscriberId,
}

impl<S: DocumentStore> SyncController<S> {
    /// Wire a controller to `store`, persisting to `dataset_url` through the
    /// injected `remote` adapter.
    ///
    /// Subscribes to the store immediately. Call [`Self::ensure_loaded`]
    /// whenever a session becomes available, and drive [`Self::run`] (or
    /// [`Self::spawn`]) to propagate changes.
    pub fn new(store: Arc<DoubtStore>, remote: S, dataset_url: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = store.subscribe(move |snapshot: &[Doubt]| {
            // The receiver side is gone once the controller drops.
            let _ = tx.send(snapshot.to_vec());
        });
        SyncController {
            store,
            remote,
            dataset_url: dataset_url.into(),
            status: Arc::new(SyncStatus::default()),
            loaded: OnceCell::new(),
            save_lock: tokio::sync::Mutex::new(()),
            last_synced: Mutex::new(Vec::new()),
            changes: Mutex::new(Some(rx)),
            subscription,
        }
    }

    /// Shared status handle for the presentation layer.
    pub fn status(&self) -> Arc<SyncStatus> {
        Arc::clone(&self.status)
    }

    /// One-shot load of the remote document into the store.
    ///
    /// Executes at most once per controller lifetime; callers invoke it every
    /// time their session state fires and the latch absorbs the repeats.
    /// Concurrent calls share the in-flight load. A failed load leaves the
    /// latch unset, so the next call retries.
    pub async fn ensure_loaded(&self) -> Result<(), AporiaError> {
        self.loaded
            .get_or_try_init(|| self.load())
            .await
            .map(|_| ())
    }

    /// Whether the one-shot load has completed.
    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    async fn load(&self) -> Result<(), AporiaError> {
        self.status.begin();
        let result = self.load_inner().await;
        self.status.finish(&result);
        result
    }

    async fn load_inner(&self) -> Result<(), AporiaError> {
        let document = match self.remote.fetch_document(&self.dataset_url).await {
            Ok(document) => document,
            Err(AporiaError::NotFound(_)) => {
                // Establish the document now so later saves have a target.
                tracing::debug!("no document at {}, creating one", self.dataset_url);
                let document = self.remote.create_empty_document().await?;
                self.remote
                    .save_document(&self.dataset_url, &document)
                    .await?;
                document
            }
            Err(err) => return Err(err),
        };

        let doubts = codec::decode_document(&document, self.store.config());
        tracing::debug!(
            "loaded {} doubts from {} nodes at {}",
            doubts.len(),
            document.len(),
            self.dataset_url
        );
        // Record the snapshot before the store notifies, so the pump sees the
        // resulting change as already synced.
        *self.last_synced.lock() = doubts.clone();
        self.store.replace_all(doubts);
        Ok(())
    }

    /// Propagation pump. Consumes store-change snapshots until the store
    /// drops; intended to run as a background task. A second concurrent call
    /// is a logged no-op.
    pub async fn run(&self) {
        let receiver = self.changes.lock().take();
        let Some(mut changes) = receiver else {
            tracing::warn!("sync pump is already running");
            return;
        };
        while let Some(mut snapshot) = changes.recv().await {
            // Collapse whatever queued up while the last save was in flight;
            // only the latest observed state matters.
            while let Ok(newer) = changes.try_recv() {
                snapshot = newer;
            }
            self.observe(snapshot).await;
        }
    }

    /// Spawn [`Self::run`] onto the current tokio runtime.
    pub fn spawn(self: Arc<Self>) -> tokio::task::JoinHandle<()>
    where
        S: 'static,
    {
        tokio::spawn(async move { self.run().await })
    }

    /// Apply the save policy to one observed snapshot.
    async fn observe(&self, snapshot: Vec<Doubt>) {
        if self.loaded.get().is_none() {
            tracing::debug!("collection changed before the initial load; keeping it local");
            return;
        }
        if *self.last_synced.lock() == snapshot {
            return;
        }
        match self.save(&snapshot).await {
            Ok(()) => *self.last_synced.lock() = snapshot,
            // Already on the status field; the next change retries with the
            // full state.
            Err(_) => {}
        }
    }

    /// Persist the store's current collection explicitly. Loads first if the
    /// one-shot load has not happened yet.
    pub async fn save_now(&self) -> Result<(), AporiaError> {
        self.ensure_loaded().await?;
        let snapshot = self.store.get_all_doubts();
        self.save(&snapshot).await?;
        *self.last_synced.lock() = snapshot;
        Ok(())
    }

    async fn save(&self, doubts: &[Doubt]) -> Result<(), AporiaError> {
        let _serialized = self.save_lock.lock().await;
        self.status.begin();
        let result = self.save_inner(doubts).await;
        self.status.finish(&result);
        result
    }

    async fn save_inner(&self, doubts: &[Doubt]) -> Result<(), AporiaError> {
        // Always start from a fresh fetch, never a stale local copy.
        let mut document = self.remote.fetch_document(&self.dataset_url).await?;
        for doubt in doubts {
            let [belief, argumentation] = codec::encode(doubt, self.store.config());
            document.set_node(belief);
            document.set_node(argumentation);
        }
        self.remote
            .save_document(&self.dataset_url, &document)
            .await?;
        tracing::debug!("saved {} doubts to {}", doubts.len(), self.dataset_url);
        Ok(())
    }
}

impl<S: DocumentStore> Drop for SyncController<S> {
    fn drop(&mut self) {
        self.store.unsubscribe(self.subscription);
    }
}
