//! Pure conversions between [`Doubt`] records and their two-node
//! argumentation shape.
//!
//! One doubt maps to exactly two linked nodes: a Belief asserting a
//! `"doubtful"` stance toward the subject, and an Argumentation recording the
//! question and its author, concluding that Belief. Node identities derive
//! from the doubt id (`{id}-belief` and `{id}`), so re-encoding the same
//! doubt into the same document overwrites instead of duplicating.
//!
//! Decoding is partial-tolerant: a node that is not a well-formed
//! Argumentation/Belief pair is skipped with a logged diagnostic and never
//! aborts the rest of the document.

use chrono::Utc;

use crate::{
    document::{node_name, Document, Node},
    properties::{Actor, Doubt, DoubtConfig, DoubtMaking},
    vocab::{crm, crminf, HOLDS_TO_BE_DOUBTFUL, RDF_TYPE},
};

/// Encode one doubt as its `[belief, argumentation]` node pair.
///
/// Deterministic except for the Belief timestamp, which records the encoding
/// wall-clock time.
pub fn encode(doubt: &Doubt, config: &DoubtConfig) -> [Node; 2] {
    let mut belief = Node::new(format!("{}-belief", doubt.id));
    belief.add_link(RDF_TYPE, crminf::BELIEF);
    belief.add_link(crminf::THAT, format!("{}{}", config.base_url, doubt.about));
    belief.add_literal(crminf::HOLDS_TO_BE, HOLDS_TO_BE_DOUBTFUL);
    belief.add_date(crm::HAS_TIME_SPAN, Utc::now());

    let mut argumentation = Node::new(doubt.id.clone());
    argumentation.add_link(RDF_TYPE, crminf::ARGUMENTATION);
    argumentation.add_literal(crm::HAS_NOTE, doubt.question.as_str());
    argumentation.add_link(crminf::CONCLUDED_THAT, belief.id());
    let actor_name = match doubt.making.actor.name.as_str() {
        "" => "unknown",
        name => name,
    };
    argumentation.add_literal(crm::CARRIED_OUT_BY, actor_name);

    [belief, argumentation]
}

/// Decode a doubt from an Argumentation node and its host document.
///
/// Returns `None` for any node that is not an Argumentation, carries no
/// recoverable id, lacks a `concludedThat` link, links to a Belief absent
/// from the document, or whose Belief has no subject. The question and actor
/// name default to empty strings when missing; `same_as` is not modeled in
/// this shape and always decodes empty.
pub fn decode(node: &Node, document: &Document, config: &DoubtConfig) -> Option<Doubt> {
    if !node.links(RDF_TYPE).any(|kind| kind == crminf::ARGUMENTATION) {
        return None;
    }

    let Some(id) = node_name(node.id()) else {
        tracing::debug!("no recoverable id in node identifier {:?}", node.id());
        return None;
    };

    let question = node.literal(crm::HAS_NOTE).unwrap_or_default().to_string();
    let actor_name = node
        .literal(crm::CARRIED_OUT_BY)
        .unwrap_or_default()
        .to_string();

    let Some(conclusion) = node.link(crminf::CONCLUDED_THAT) else {
        tracing::warn!("argumentation node {id} has no concludedThat link");
        return None;
    };
    let Some(belief) = document.resolve(conclusion) else {
        tracing::warn!("concludedThat target {conclusion:?} not present in document");
        return None;
    };
    let Some(that) = belief.link(crminf::THAT) else {
        tracing::warn!("belief node {} has no subject", belief.id());
        return None;
    };

    // Accept both encoded and already-bare subject forms.
    let about = that
        .strip_prefix(config.base_url.as_str())
        .unwrap_or(that)
        .to_string();

    Some(Doubt {
        id,
        about,
        question,
        making: DoubtMaking {
            actor: Actor {
                name: actor_name,
                same_as: Vec::new(),
            },
        },
    })
}

/// Decode every doubt in a document. Order is not guaranteed to match the
/// original insertion order; documents are unordered collections of nodes.
pub fn decode_document(document: &Document, config: &DoubtConfig) -> Vec<Doubt> {
    document
        .nodes()
        .filter_map(|node| decode(node, document, config))
        .collect()
}
