//! Basic building blocks for assembling and manipulating doubt records and
//! the stores that hold them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default base URL used to expand `about` keys into absolute subject URIs
/// when a document is written, and stripped again when one is read.
/// Configurable per store via [`DoubtConfig::base_url`].
pub const DEFAULT_BASE_URL: &str = "https://encoded-ghosts.org/";

/// The attributed author of a doubt: a display name plus optional links to
/// other identifiers for the same real-world entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    #[serde(default)]
    pub same_as: Vec<String>,
}

impl Actor {
    pub fn named(name: impl Into<String>) -> Self {
        Actor {
            name: name.into(),
            same_as: Vec::new(),
        }
    }

    /// Fallback attribution when no actor is configured or supplied.
    pub fn unknown() -> Self {
        Actor::named("unknown")
    }
}

/// Creation metadata for a doubt. The actor is copied by value when the doubt
/// is created, so later mutation of the caller's actor does not rewrite
/// history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoubtMaking {
    pub actor: Actor,
}

/// A question or objection raised about a specific resource or claim.
///
/// Doubts are append-only: `about` and `question` never change after
/// creation, and a doubt disappears only when a freshly loaded remote
/// snapshot replaces the collection wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doubt {
    /// Unique identifier, assigned at creation and never reassigned.
    pub id: String,
    /// Identifier (URI or opaque key) of the resource this doubt concerns.
    /// Many doubts may share an `about`.
    pub about: String,
    /// The question being raised. Stored trimmed.
    pub question: String,
    /// Who raised it.
    pub making: DoubtMaking,
}

impl Doubt {
    /// Build a doubt with a fresh id, trimming the question and snapshotting
    /// the actor.
    pub fn new(about: impl Into<String>, question: &str, actor: Actor) -> Self {
        Doubt {
            id: generate_doubt_id(),
            about: about.into(),
            question: question.trim().to_string(),
            making: DoubtMaking { actor },
        }
    }
}

/// Generate a doubt identifier: a v4 UUID rendered hyphenated-lowercase.
/// 122 random bits make collisions negligible within a session.
pub fn generate_doubt_id() -> String {
    Uuid::new_v4().to_string()
}

/// Per-store configuration surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoubtConfig {
    /// Prefix concatenated with raw `about` keys to form subject URIs on
    /// encode and stripped again on decode. Encode and decode must agree on
    /// this value or round-tripping breaks.
    pub base_url: String,
    /// Attribution applied when `create_doubt` receives no override.
    pub default_actor: Option<Actor>,
}

impl Default for DoubtConfig {
    fn default() -> Self {
        DoubtConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_actor: None,
        }
    }
}
