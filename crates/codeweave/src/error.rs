//! Error types for Codeweave operations.
//!
//! This module provides the main error type [`CodeweaveError`] returned by
//! every fallible model, diagram and engine operation.

use std::fmt;

use thiserror::Error;

use codeweave_core::{
    identifier::{NodeId, RelationshipId},
    stereotype::{NodeStereotype, RelationshipStereotype},
};

use crate::structure::GraphError;

/// The kind of element an operation expected to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    ModelNode,
    ModelRelationship,
    DiagramNode,
    DiagramConnector,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModelNode => write!(f, "model node"),
            Self::ModelRelationship => write!(f, "model relationship"),
            Self::DiagramNode => write!(f, "diagram node"),
            Self::DiagramConnector => write!(f, "diagram connector"),
        }
    }
}

/// The main error type for Codeweave operations.
///
/// Lookups never produce errors; they return `Option` or empty collections.
/// Mutators that require a target to exist fail with [`CodeweaveError::NotFound`]
/// and leave the current snapshot untouched.
#[derive(Debug, Error)]
pub enum CodeweaveError {
    #[error("{kind} `{id}` not found")]
    NotFound { kind: ElementKind, id: String },

    #[error("{stereotype} relationship is not allowed from {source_kind} to {target_kind}")]
    InvalidRelationship {
        stereotype: RelationshipStereotype,
        source_kind: NodeStereotype,
        target_kind: NodeStereotype,
    },

    #[error(
        "connector `{connector}` joins nodes in different layout groups ({} and {})",
        group_label(.source_group),
        group_label(.target_group)
    )]
    CrossLayoutGroup {
        connector: RelationshipId,
        source_group: Option<NodeId>,
        target_group: Option<NodeId>,
    },

    #[error("operation cancelled")]
    Cancelled,

    #[error("Discovery error: {0}")]
    Discovery(String),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

impl CodeweaveError {
    /// Create a `NotFound` error for a model node.
    pub fn model_node_not_found(id: NodeId) -> Self {
        Self::NotFound {
            kind: ElementKind::ModelNode,
            id: id.to_string(),
        }
    }

    /// Create a `NotFound` error for a model relationship.
    pub fn model_relationship_not_found(id: RelationshipId) -> Self {
        Self::NotFound {
            kind: ElementKind::ModelRelationship,
            id: id.to_string(),
        }
    }

    /// Create a `NotFound` error for a diagram node.
    pub fn diagram_node_not_found(id: NodeId) -> Self {
        Self::NotFound {
            kind: ElementKind::DiagramNode,
            id: id.to_string(),
        }
    }

    /// Create a `NotFound` error for a diagram connector.
    pub fn diagram_connector_not_found(id: RelationshipId) -> Self {
        Self::NotFound {
            kind: ElementKind::DiagramConnector,
            id: id.to_string(),
        }
    }

    /// Returns true if the error only signals a cancelled operation.
    ///
    /// Callers usually discard such errors silently.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

fn group_label(owner: &Option<NodeId>) -> String {
    match owner {
        Some(id) => format!("group of `{id}`"),
        None => "the top-level group".to_string(),
    }
}
