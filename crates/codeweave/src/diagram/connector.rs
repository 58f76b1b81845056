use std::sync::Arc;

use codeweave_core::{
    connector::ConnectorType,
    geometry::Point,
    identifier::{NodeId, RelationshipId},
    stereotype::RelationshipStereotype,
};

use crate::{model::ModelRelationship, structure::GraphEdge};

/// A model relationship drawn between two diagram nodes.
///
/// The route is kept in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramConnector {
    relationship: Arc<ModelRelationship>,
    connector_type: ConnectorType,
    route: Vec<Point>,
}

impl DiagramConnector {
    pub fn new(relationship: Arc<ModelRelationship>, connector_type: ConnectorType) -> Self {
        Self {
            relationship,
            connector_type,
            route: Vec::new(),
        }
    }

    /// Returns the id of the shown model relationship.
    pub fn id(&self) -> RelationshipId {
        self.relationship.id()
    }

    pub fn relationship(&self) -> &Arc<ModelRelationship> {
        &self.relationship
    }

    pub fn stereotype(&self) -> RelationshipStereotype {
        self.relationship.stereotype()
    }

    pub fn source(&self) -> NodeId {
        self.relationship.source()
    }

    pub fn target(&self) -> NodeId {
        self.relationship.target()
    }

    pub fn connector_type(&self) -> ConnectorType {
        self.connector_type
    }

    pub fn route(&self) -> &[Point] {
        &self.route
    }

    pub fn with_route(&self, route: Vec<Point>) -> Self {
        Self {
            route,
            ..self.clone()
        }
    }
}

impl GraphEdge for DiagramConnector {
    fn id(&self) -> RelationshipId {
        self.relationship.id()
    }

    fn source(&self) -> NodeId {
        self.relationship.source()
    }

    fn target(&self) -> NodeId {
        self.relationship.target()
    }
}
