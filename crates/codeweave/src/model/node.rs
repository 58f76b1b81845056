use codeweave_core::{
    identifier::{EntityRef, Name, NodeId},
    stereotype::{NodeStereotype, Origin},
};

use crate::structure::GraphVertex;

/// An entity of the structural model.
///
/// The identity is assigned once at construction and never recomputed from
/// content; [`ModelNode::with_payload`] keeps it.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelNode {
    id: NodeId,
    name: Name,
    stereotype: NodeStereotype,
    origin: Origin,
    payload: EntityRef,
}

impl ModelNode {
    /// Creates a node with a fresh identity.
    pub fn new(name: Name, stereotype: NodeStereotype, origin: Origin, payload: EntityRef) -> Self {
        Self {
            id: NodeId::new(),
            name,
            stereotype,
            origin,
            payload,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> Name {
        self.name
    }

    pub fn stereotype(&self) -> NodeStereotype {
        self.stereotype
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Returns the external entity this node stands for.
    pub fn payload(&self) -> &EntityRef {
        &self.payload
    }

    /// Returns a copy of this node pointing at another entity.
    pub fn with_payload(&self, payload: EntityRef) -> Self {
        Self {
            payload,
            ..self.clone()
        }
    }
}

impl GraphVertex for ModelNode {
    fn id(&self) -> NodeId {
        self.id
    }
}
