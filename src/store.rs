//! In-memory doubt store: an ordered, append-only collection with
//! synchronous subscriber notification.
//!
//! The store is the only mutable state in the crate. All operations are total
//! functions of their inputs; validation beyond whitespace trimming (such as
//! rejecting empty questions) is a precondition the presentation boundary
//! enforces.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::properties::{Actor, Doubt, DoubtConfig};

/// Callback invoked with a full, order-preserving collection snapshot after
/// every change.
pub type Listener = Arc<dyn Fn(&[Doubt]) + Send + Sync>;

/// Token returned by [`DoubtStore::subscribe`]. Removes exactly the
/// registration that produced it; the same callback registered twice yields
/// two independently removable tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(u64);

#[derive(Default)]
pub struct DoubtStore {
    config: DoubtConfig,
    doubts: RwLock<Vec<Doubt>>,
    listeners: RwLock<BTreeMap<u64, Listener>>,
    next_token: AtomicU64,
}

impl fmt::Debug for DoubtStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoubtStore")
            .field("doubts", &self.doubts.read().len())
            .field("listeners", &self.listeners.read().len())
            .finish()
    }
}

impl DoubtStore {
    pub fn new(config: DoubtConfig) -> Self {
        DoubtStore {
            config,
            doubts: RwLock::new(Vec::new()),
            listeners: RwLock::new(BTreeMap::new()),
            next_token: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &DoubtConfig {
        &self.config
    }

    /// Create and append a new doubt.
    ///
    /// The actor resolves as `actor_override`, else the configured default,
    /// else [`Actor::unknown`], and is copied by value. The question is
    /// trimmed here; empty-question rejection is the caller's concern. Every
    /// current subscriber is notified synchronously before this returns.
    pub fn create_doubt(
        &self,
        about: impl Into<String>,
        question: &str,
        actor_override: Option<Actor>,
    ) -> Doubt {
        let actor = actor_override
            .or_else(|| self.config.default_actor.clone())
            .unwrap_or_else(Actor::unknown);
        let doubt = Doubt::new(about, question, actor);
        self.doubts.write().push(doubt.clone());
        tracing::debug!("created doubt {} about {:?}", doubt.id, doubt.about);
        self.notify();
        doubt
    }

    /// Every stored doubt whose `about` exactly equals the argument, in
    /// insertion order. Case-sensitive, no normalization.
    pub fn get_doubts_about(&self, about: &str) -> Vec<Doubt> {
        self.doubts
            .read()
            .iter()
            .filter(|d| d.about == about)
            .cloned()
            .collect()
    }

    /// Snapshot copy of the entire collection in insertion order. Mutating
    /// the returned vector has no effect on the store.
    pub fn get_all_doubts(&self) -> Vec<Doubt> {
        self.doubts.read().clone()
    }

    /// Replace the collection wholesale with a freshly loaded snapshot and
    /// notify subscribers. Used by the one-shot remote load; doubts absent
    /// from `doubts` are gone afterwards.
    pub fn replace_all(&self, doubts: Vec<Doubt>) {
        *self.doubts.write() = doubts;
        self.notify();
    }

    /// Register `listener` for change notifications.
    pub fn subscribe<F>(&self, listener: F) -> SubscriberId
    where
        F: Fn(&[Doubt]) + Send + Sync + 'static,
    {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        self.listeners.write().insert(token, Arc::new(listener));
        SubscriberId(token)
    }

    /// Deregister a listener. Unknown or already-removed tokens are a no-op;
    /// returns whether a registration was actually removed.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.listeners.write().remove(&id.0).is_some()
    }

    /// Snapshot outside the locks, then invoke. Listeners may re-enter the
    /// store; registrations changed mid-pass apply from the next pass.
    fn notify(&self) {
        let snapshot = self.doubts.read().clone();
        let listeners: Vec<Listener> = self.listeners.read().values().cloned().collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}
