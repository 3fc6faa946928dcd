//! Presentation boundary: the contract a UI layer consumes.
//!
//! [`DoubtContext`] bundles the store's create/query/subscribe surface, the
//! sync status surface, and the raise-doubt intent hook. Raising a doubt
//! through the hook performs no creation; it only signals that a creation
//! affordance should open for the given subject. The UI collects the question
//! (rejecting empty input - the store does not re-validate) and then calls
//! [`DoubtContext::create_doubt`].

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::{
    properties::{Actor, Doubt},
    store::{DoubtStore, SubscriberId},
    sync::SyncStatus,
};

type IntentListener = Arc<dyn Fn(&str) + Send + Sync>;

/// Token returned by [`DoubtContext::on_raise_doubt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IntentId(u64);

pub struct DoubtContext {
    store: Arc<DoubtStore>,
    status: Option<Arc<SyncStatus>>,
    intents: RwLock<BTreeMap<u64, IntentListener>>,
    next_token: AtomicU64,
}

impl DoubtContext {
    /// Context over a local-only store: `is_syncing` is always false and
    /// `sync_error` always absent.
    pub fn new(store: Arc<DoubtStore>) -> Self {
        DoubtContext {
            store,
            status: None,
            intents: RwLock::new(BTreeMap::new()),
            next_token: AtomicU64::new(0),
        }
    }

    /// Context over a synchronized store; `status` comes from
    /// [`crate::sync::SyncController::status`].
    pub fn with_status(store: Arc<DoubtStore>, status: Arc<SyncStatus>) -> Self {
        DoubtContext {
            status: Some(status),
            ..DoubtContext::new(store)
        }
    }

    /// Signal that a creation affordance should open for `about`.
    pub fn raise_doubt(&self, about: &str) {
        let listeners: Vec<IntentListener> = self.intents.read().values().cloned().collect();
        if listeners.is_empty() {
            tracing::debug!("raise_doubt({about:?}) with no intent listeners registered");
        }
        for listener in listeners {
            listener(about);
        }
    }

    /// Register for raise-doubt intents.
    pub fn on_raise_doubt<F>(&self, listener: F) -> IntentId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        self.intents.write().insert(token, Arc::new(listener));
        IntentId(token)
    }

    /// Deregister an intent listener; unknown tokens are a no-op.
    pub fn dismiss_intent(&self, id: IntentId) -> bool {
        self.intents.write().remove(&id.0).is_some()
    }

    pub fn create_doubt(
        &self,
        about: impl Into<String>,
        question: &str,
        actor_override: Option<Actor>,
    ) -> Doubt {
        self.store.create_doubt(about, question, actor_override)
    }

    pub fn get_doubts_about(&self, about: &str) -> Vec<Doubt> {
        self.store.get_doubts_about(about)
    }

    pub fn get_all_doubts(&self) -> Vec<Doubt> {
        self.store.get_all_doubts()
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriberId
    where
        F: Fn(&[Doubt]) + Send + Sync + 'static,
    {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.store.unsubscribe(id)
    }

    /// True while a load or save round trip is in flight.
    pub fn is_syncing(&self) -> bool {
        self.status.as_ref().map(|s| s.is_syncing()).unwrap_or(false)
    }

    /// Readable message from the most recent failed sync operation.
    pub fn sync_error(&self) -> Option<String> {
        self.status.as_ref().and_then(|s| s.error())
    }
}
