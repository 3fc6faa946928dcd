//! Vocabulary constants for the argumentation persistence shape.
//!
//! Doubts persist under the CIDOC-CRM argumentation modeling convention: an
//! `Argumentation` node records the act of reasoning, a `Belief` node the
//! stance it concludes. The identifiers here are fixed; changing them breaks
//! compatibility with documents written by earlier sessions.
//!
//! See <http://www.cidoc-crm.org/extensions/crminf/> and
//! <http://www.cidoc-crm.org/cidoc-crm/>.

/// The RDF `type` predicate.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// CIDOC-CRM extension CRMinf: argumentation and belief modeling.
pub mod crminf {
    pub const ARGUMENTATION: &str =
        "http://www.cidoc-crm.org/extensions/crminf/I1_Argumentation";
    pub const BELIEF: &str = "http://www.cidoc-crm.org/extensions/crminf/I2_Belief";
    pub const CONCLUDED_THAT: &str =
        "http://www.cidoc-crm.org/extensions/crminf/J2_concluded_that";
    pub const HOLDS_TO_BE: &str = "http://www.cidoc-crm.org/extensions/crminf/J5_holds_to_be";
    pub const THAT: &str = "http://www.cidoc-crm.org/extensions/crminf/J4_that";
}

/// Core CIDOC-CRM properties used by the shape.
pub mod crm {
    pub const HAS_NOTE: &str = "http://www.cidoc-crm.org/cidoc-crm/P3_has_note";
    pub const HAS_TIME_SPAN: &str = "http://www.cidoc-crm.org/cidoc-crm/P4_has_time-span";
    pub const CARRIED_OUT_BY: &str = "http://www.cidoc-crm.org/cidoc-crm/P14_carried_out_by";
}

/// Literal recorded on every Belief node's `holdsToBe` property. A doubt
/// always asserts the same stance toward its subject.
pub const HOLDS_TO_BE_DOUBTFUL: &str = "doubtful";
