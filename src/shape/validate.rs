//! Structural validation of shaped elements before emission.
//!
//! Validation is optional and fail-fast: the first violation aborts the whole
//! run. There is no partial-row patching.

use thiserror::Error;

use crate::shape::classify;
use crate::shape::types::ShapedElement;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{kind} record has an empty id")]
    EmptyOwnerId { kind: &'static str },

    #[error("tag record on {kind} {owner_id} carries foreign owner id {found}")]
    TagOwnerMismatch {
        kind: &'static str,
        owner_id: String,
        found: String,
    },

    #[error("tag ({tag_type}, {key}) on {kind} {owner_id} contains a disallowed character")]
    DisallowedTagKey {
        kind: &'static str,
        owner_id: String,
        tag_type: String,
        key: String,
    },

    #[error("node reference {index} of way {way_id} carries foreign way id {found}")]
    NodeRefOwnerMismatch {
        way_id: String,
        index: usize,
        found: String,
    },

    #[error("way {way_id} node positions are not dense: expected {expected}, found {found}")]
    NonDensePosition {
        way_id: String,
        expected: usize,
        found: usize,
    },
}

/// Check a shaped element against the invariants its tables rely on:
/// non-empty owner id, child records referencing the owner, admissible tag
/// keys, and a dense `0..n-1` position sequence for way-node references.
pub fn validate(element: &ShapedElement) -> Result<(), ValidationError> {
    let kind = element.kind_name();
    let owner_id = element.owner_id();

    if owner_id.is_empty() {
        return Err(ValidationError::EmptyOwnerId { kind });
    }

    for tag in element.tags() {
        if tag.id != owner_id {
            return Err(ValidationError::TagOwnerMismatch {
                kind,
                owner_id: owner_id.to_string(),
                found: tag.id.clone(),
            });
        }
        if !classify::admit(&tag.key) || !classify::admit(&tag.tag_type) {
            return Err(ValidationError::DisallowedTagKey {
                kind,
                owner_id: owner_id.to_string(),
                tag_type: tag.tag_type.clone(),
                key: tag.key.clone(),
            });
        }
    }

    if let ShapedElement::Way { node_refs, .. } = element {
        for (index, node_ref) in node_refs.iter().enumerate() {
            if node_ref.id != owner_id {
                return Err(ValidationError::NodeRefOwnerMismatch {
                    way_id: owner_id.to_string(),
                    index,
                    found: node_ref.id.clone(),
                });
            }
            if node_ref.position != index {
                return Err(ValidationError::NonDensePosition {
                    way_id: owner_id.to_string(),
                    expected: index,
                    found: node_ref.position,
                });
            }
        }
    }

    Ok(())
}
