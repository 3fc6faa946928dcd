//! Synchronization integration tests: controller + store + codec over the
//! in-memory document adapter.

mod common;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use aporia_core::{
    codec,
    context::DoubtContext,
    document::Document,
    error::AporiaError,
    properties::{Actor, Doubt, DoubtConfig},
    remote::{DocumentStore, MemoryStore},
    store::DoubtStore,
    sync::SyncController,
};
use async_trait::async_trait;
use common::{wait_for, CountingStore, GatedStore};

const URL: &str = "https://pod.example/doubts";

fn seeded_remote(doubts: &[Doubt]) -> MemoryStore {
    let config = DoubtConfig::default();
    let mut document = Document::new();
    for doubt in doubts {
        let [belief, argumentation] = codec::encode(doubt, &config);
        document.set_node(belief);
        document.set_node(argumentation);
    }
    let remote = MemoryStore::new();
    remote.insert(URL, document);
    remote
}

#[test_log::test(tokio::test)]
async fn one_shot_load_fetches_once_despite_repeated_triggers() {
    let remote = GatedStore::new(seeded_remote(&[]));
    let store = Arc::new(DoubtStore::new(DoubtConfig::default()));
    let controller = Arc::new(SyncController::new(store, remote.clone(), URL));

    let tasks: Vec<_> = (0..3)
        .map(|_| {
            let controller = controller.clone();
            tokio::spawn(async move { controller.ensure_loaded().await })
        })
        .collect();

    // All three triggers have fired; exactly one fetch is in flight.
    assert!(wait_for(|| remote.fetches() == 1).await);
    remote.gate.add_permits(3);

    for task in tasks {
        task.await.unwrap().unwrap();
    }
    assert_eq!(remote.fetches(), 1);

    // Later firings are absorbed by the latch.
    controller.ensure_loaded().await.unwrap();
    assert_eq!(remote.fetches(), 1);
}

#[test_log::test(tokio::test)]
async fn created_doubts_propagate_to_the_remote_document() {
    let store = Arc::new(DoubtStore::new(DoubtConfig::default()));
    let remote = MemoryStore::new();
    let controller = Arc::new(SyncController::new(store.clone(), remote.clone(), URL));

    controller.ensure_loaded().await.unwrap();
    let pump = controller.clone().spawn();

    store.create_doubt("doc-1", "Is this dated correctly?", None);
    store.create_doubt("doc-1", "Who authenticated this?", None);
    let last = store.create_doubt("doc-2", "Is the translation accurate?", None);

    assert!(
        wait_for(|| {
            remote
                .get(URL)
                .map(|d| d.node(&last.id).is_some())
                .unwrap_or(false)
        })
        .await
    );

    let saved = remote.get(URL).unwrap();
    // Each doubt landed as its two-node pair.
    assert_eq!(saved.len(), 6);
    let decoded = codec::decode_document(&saved, store.config());
    let mut subjects: Vec<&str> = decoded.iter().map(|d| d.about.as_str()).collect();
    subjects.sort_unstable();
    assert_eq!(subjects, vec!["doc-1", "doc-1", "doc-2"]);

    pump.abort();
}

#[tokio::test]
async fn missing_document_is_established_before_any_change() {
    let remote = CountingStore::new(MemoryStore::new());
    let store = Arc::new(DoubtStore::new(DoubtConfig::default()));
    let controller = SyncController::new(store, remote.clone(), URL);

    controller.ensure_loaded().await.unwrap();
    assert_eq!(remote.inner.get(URL), Some(Document::default()));
    // One fetch (the 404) and one save (establishing the document).
    assert_eq!(remote.fetches(), 1);
    assert_eq!(remote.saves(), 1);
}

#[tokio::test]
async fn just_loaded_data_is_not_resaved() {
    let existing = Doubt::new("doc-1", "already persisted?", Actor::named("a"));
    let remote = CountingStore::new(seeded_remote(&[existing]));
    let store = Arc::new(DoubtStore::new(DoubtConfig::default()));
    let controller = Arc::new(SyncController::new(store.clone(), remote.clone(), URL));

    controller.ensure_loaded().await.unwrap();
    assert_eq!(store.get_all_doubts().len(), 1);

    let pump = controller.clone().spawn();
    // Give the pump a chance to (wrongly) react to the load's own
    // replace_all notification.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(remote.saves(), 0);

    pump.abort();
}

#[tokio::test]
async fn save_preserves_foreign_nodes_and_overwrites_by_identity() {
    let first = Doubt::new("doc-1", "first?", Actor::named("a"));
    let remote = seeded_remote(&[first.clone()]);

    // A node unrelated to doubts lives in the same document.
    let mut document = remote.get(URL).unwrap();
    document.set_node(aporia_core::document::Node::new("unrelated-metadata"));
    remote.insert(URL, document);

    let store = Arc::new(DoubtStore::new(DoubtConfig::default()));
    let controller = SyncController::new(store.clone(), remote.clone(), URL);
    controller.ensure_loaded().await.unwrap();

    store.create_doubt("doc-2", "second?", None);
    controller.save_now().await.unwrap();

    let saved = remote.get(URL).unwrap();
    // Foreign node untouched, first pair overwritten in place, second added.
    assert!(saved.node("unrelated-metadata").is_some());
    assert!(saved.node(&first.id).is_some());
    assert_eq!(saved.len(), 5);
    assert_eq!(codec::decode_document(&saved, store.config()).len(), 2);
}

/// Fetches succeed, saves fail on demand.
#[derive(Clone)]
struct SaveFailStore {
    inner: MemoryStore,
    failing: Arc<AtomicBool>,
}

#[async_trait]
impl DocumentStore for SaveFailStore {
    async fn fetch_document(&self, url: &str) -> Result<Document, AporiaError> {
        self.inner.fetch_document(url).await
    }

    async fn save_document(&self, url: &str, document: &Document) -> Result<(), AporiaError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AporiaError::Service("remote rejected the write".to_string()));
        }
        self.inner.save_document(url, document).await
    }
}

#[tokio::test]
async fn failed_save_surfaces_on_status_and_cache_stays_usable() {
    let existing = Doubt::new("doc-1", "q?", Actor::named("a"));
    let remote = SaveFailStore {
        inner: seeded_remote(&[existing]),
        failing: Arc::new(AtomicBool::new(false)),
    };
    let store = Arc::new(DoubtStore::new(DoubtConfig::default()));
    let controller = SyncController::new(store.clone(), remote.clone(), URL);
    let context = DoubtContext::with_status(store.clone(), controller.status());

    controller.ensure_loaded().await.unwrap();
    remote.failing.store(true, Ordering::SeqCst);

    store.create_doubt("doc-2", "will not persist yet?", None);
    let err = controller.save_now().await.unwrap_err();
    assert!(matches!(err, AporiaError::Service(_)));

    assert!(!context.is_syncing());
    assert!(context
        .sync_error()
        .unwrap()
        .contains("remote rejected the write"));
    // The local cache is intact and queryable.
    assert_eq!(context.get_all_doubts().len(), 2);

    // The next attempt retries the full state and clears the error.
    remote.failing.store(false, Ordering::SeqCst);
    controller.save_now().await.unwrap();
    assert!(context.sync_error().is_none());
    let saved = remote.inner.get(URL).unwrap();
    assert_eq!(codec::decode_document(&saved, store.config()).len(), 2);
}

#[tokio::test]
async fn rapid_changes_collapse_to_latest_state() {
    let store = Arc::new(DoubtStore::new(DoubtConfig::default()));
    let remote = CountingStore::new(seeded_remote(&[]));
    let controller = Arc::new(SyncController::new(store.clone(), remote.clone(), URL));

    controller.ensure_loaded().await.unwrap();

    // Burst of creates before the pump ever runs: the queue collapses to one
    // observation of the final state.
    for i in 0..10 {
        store.create_doubt("doc-1", &format!("question {i}?"), None);
    }
    let pump = controller.clone().spawn();

    assert!(
        wait_for(|| {
            remote
                .inner
                .get(URL)
                .map(|d| d.len() == 20)
                .unwrap_or(false)
        })
        .await
    );
    assert_eq!(remote.saves(), 1);
    assert_eq!(
        codec::decode_document(&remote.inner.get(URL).unwrap(), store.config()).len(),
        10
    );

    pump.abort();
}
