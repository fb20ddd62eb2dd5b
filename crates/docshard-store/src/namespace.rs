//! Per-resource collection naming for tenant isolation.
//!
//! Every logical resource (one tenant's document set) gets its own Qdrant
//! collection. The mapping is a pure function of the resource identifier, so
//! ingestion and query always agree on where a resource's chunks live.

pub use uuid::Uuid as ResourceId;

/// Derive the collection name for a resource.
///
/// Format: `resource_{uuid}_documents` with the UUID's hyphens replaced by
/// underscores, e.g. `resource_123e4567_e89b_12d3_a456_426614174000_documents`.
/// The output is 55 characters of `[a-z0-9_]`, which satisfies Qdrant's
/// collection naming rules and stays under common backend identifier limits.
///
/// The mapping is deterministic and injective: the canonical hyphenated UUID
/// form contains only hex digits and hyphens, so the hyphen-to-underscore
/// substitution cannot collide for distinct identifiers.
#[must_use]
pub fn collection_name(resource_id: ResourceId) -> String {
    let id = resource_id.as_hyphenated().to_string().replace('-', "_");
    format!("resource_{id}_documents")
}
