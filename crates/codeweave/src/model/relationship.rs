use codeweave_core::{
    identifier::{EntityRef, NodeId, RelationshipId},
    stereotype::RelationshipStereotype,
};

use super::ModelNode;
use crate::{error::CodeweaveError, features::RelationshipFeatures, structure::GraphEdge};

/// A typed, directed relationship between two model nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRelationship {
    id: RelationshipId,
    source: NodeId,
    target: NodeId,
    stereotype: RelationshipStereotype,
    payload: Option<EntityRef>,
}

impl ModelRelationship {
    /// Creates a relationship between two nodes with a fresh identity.
    ///
    /// # Errors
    ///
    /// Returns [`CodeweaveError::InvalidRelationship`] if the stereotypes of
    /// `source` and `target` are not a legal pair for `stereotype`.
    pub fn new(
        source: &ModelNode,
        target: &ModelNode,
        stereotype: RelationshipStereotype,
        payload: Option<EntityRef>,
    ) -> Result<Self, CodeweaveError> {
        validate(source, target, stereotype)?;
        Ok(Self {
            id: RelationshipId::new(),
            source: source.id(),
            target: target.id(),
            stereotype,
            payload,
        })
    }

    pub fn id(&self) -> RelationshipId {
        self.id
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn stereotype(&self) -> RelationshipStereotype {
        self.stereotype
    }

    pub fn payload(&self) -> Option<&EntityRef> {
        self.payload.as_ref()
    }

    /// Returns true if the relationship starts or ends at `node`.
    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }

    /// Returns the endpoint opposite to `node`, if `node` is an endpoint.
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if self.source == node {
            Some(self.target)
        } else if self.target == node {
            Some(self.source)
        } else {
            None
        }
    }
}

impl GraphEdge for ModelRelationship {
    fn id(&self) -> RelationshipId {
        self.id
    }

    fn source(&self) -> NodeId {
        self.source
    }

    fn target(&self) -> NodeId {
        self.target
    }
}

/// Checks the fixed legal-pair table for a relationship between two nodes.
pub(crate) fn validate(
    source: &ModelNode,
    target: &ModelNode,
    stereotype: RelationshipStereotype,
) -> Result<(), CodeweaveError> {
    if stereotype.is_valid_between(source.stereotype(), target.stereotype()) {
        Ok(())
    } else {
        Err(invalid(source, target, stereotype))
    }
}

/// Checks the fixed table, then the narrower table of `features`.
pub(crate) fn validate_with(
    features: &dyn RelationshipFeatures,
    source: &ModelNode,
    target: &ModelNode,
    stereotype: RelationshipStereotype,
) -> Result<(), CodeweaveError> {
    validate(source, target, stereotype)?;
    let pair = (source.stereotype(), target.stereotype());
    if features.valid_pairs(stereotype).contains(&pair) {
        Ok(())
    } else {
        Err(invalid(source, target, stereotype))
    }
}

fn invalid(
    source: &ModelNode,
    target: &ModelNode,
    stereotype: RelationshipStereotype,
) -> CodeweaveError {
    CodeweaveError::InvalidRelationship {
        stereotype,
        source_kind: source.stereotype(),
        target_kind: target.stereotype(),
    }
}
