//! # aporia-core
//!
//! A Rust library for attaching lightweight "doubts" - questions and
//! objections - to any addressable resource, and keeping them synchronized
//! with a remote document store.
//!
//! The name comes from the Greek *aporia*, a state of reasoned puzzlement.
//!
//! ## Overview
//!
//! aporia-core keeps doubt records in an in-memory [`store::DoubtStore`] and
//! persists each of them as a pair of linked graph nodes - a Belief asserting
//! a doubtful stance toward the subject, and an Argumentation recording the
//! question and its author - inside an addressable [`document::Document`].
//! A [`sync::SyncController`] owns the remote lifecycle: one-shot load when a
//! session becomes available, save-on-change afterwards, with guards against
//! duplicate loads, re-entrant saves, and re-saving data that was just
//! loaded.
//!
//! ### Key pieces
//!
//! - **[`store`]**: the only mutable state - create, query, subscribe
//! - **[`codec`]**: pure Doubt ⇄ node-pair conversions, partial-tolerant
//!   document decoding
//! - **[`sync`]**: the load-once/save-on-change state machine and its status
//!   surface
//! - **[`remote`]**: the injected key-document capability
//!   ([`remote::MemoryStore`] built in; HTTP adapter behind the `http`
//!   feature)
//! - **[`context`]**: the facade a presentation layer consumes
//! - **[`vocab`]**, **[`properties`]**, **[`document`]**: identifiers and
//!   data shapes
//!
//! ## Quick Start
//!
//! Local-only use needs no runtime:
//!
//! ```rust
//! use aporia_core::{properties::DoubtConfig, store::DoubtStore};
//!
//! let store = DoubtStore::new(DoubtConfig::default());
//! let doubt = store.create_doubt("doc-1", " Is this dated correctly? ", None);
//! assert_eq!(doubt.question, "Is this dated correctly?");
//! assert_eq!(store.get_doubts_about("doc-1").len(), 1);
//! ```
//!
//! ## Synchronization
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use aporia_core::{
//!     properties::DoubtConfig,
//!     remote::MemoryStore,
//!     store::DoubtStore,
//!     sync::SyncController,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), aporia_core::AporiaError> {
//!     let store = Arc::new(DoubtStore::new(DoubtConfig::default()));
//!     let controller = Arc::new(SyncController::new(
//!         store.clone(),
//!         MemoryStore::new(),
//!         "https://pod.example/doubts",
//!     ));
//!
//!     // One-shot load; call this whenever the session becomes available.
//!     controller.ensure_loaded().await?;
//!     // Propagate store changes to the remote in the background.
//!     let pump = controller.clone().spawn();
//!
//!     store.create_doubt("doc-1", "Who authenticated this?", None);
//!     # drop(pump);
//!     Ok(())
//! }
//! ```
//!
//! ## Persistence shape
//!
//! Doubts persist under the CIDOC-CRM argumentation convention (see
//! [`vocab`]). The shape does not model an actor's `same_as` links, so those
//! do not survive a round trip; everything else does.

pub mod codec;
pub mod context;
pub mod document;
pub mod error;
pub mod properties;
pub mod remote;
pub mod store;
pub mod sync;
pub mod vocab;

pub use error::*;
