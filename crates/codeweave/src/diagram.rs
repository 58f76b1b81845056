//! The diagram graph: a laid-out, nested presentation of part of the model.
//!
//! A [`Diagram`] is an immutable snapshot holding the model snapshot it was
//! built against and a tree of [`LayoutGroup`]s. Like the model, every
//! mutator returns a [`DiagramUpdate`] with the next snapshot and the ordered
//! [`DiagramEvent`]s describing the change.
//!
//! Reachability queries ([`Diagram::path_exists`],
//! [`Diagram::is_connector_redundant`]) only follow connectors whose
//! stereotypes share a transitivity partition. The per-partition indices are
//! built lazily on the first query against a snapshot and dropped by every
//! mutation.

mod connector;
mod layout_group;
mod node;
mod partition;

pub use connector::DiagramConnector;
pub use layout_group::LayoutGroup;
pub use node::DiagramNode;

use std::sync::{Arc, OnceLock};

use log::{debug, trace};

use codeweave_core::{
    geometry::{Bounds, Point, Size},
    identifier::{NodeId, RelationshipId},
    stereotype::RelationshipStereotype,
};

use crate::{
    error::CodeweaveError,
    features::RelationshipFeatures,
    model::{Model, ModelNode},
};

use partition::PartitionIndex;

/// A change to the diagram.
#[derive(Debug, Clone)]
pub enum DiagramEvent {
    NodeAdded(Arc<DiagramNode>),
    NodeRemoved(Arc<DiagramNode>),
    NodeModelUpdated {
        id: NodeId,
        old: Arc<ModelNode>,
        new: Arc<ModelNode>,
    },
    /// The rect relative to the containing group changed.
    NodeRectChanged {
        id: NodeId,
        old: Option<Bounds>,
        new: Option<Bounds>,
    },
    NodeChildrenAreaChanged {
        id: NodeId,
        old: Size,
        new: Size,
    },
    NodeAbsoluteRectChanged {
        id: NodeId,
        old: Option<Bounds>,
        new: Option<Bounds>,
    },
    ConnectorAdded(Arc<DiagramConnector>),
    ConnectorRemoved(Arc<DiagramConnector>),
    ConnectorRouteChanged {
        id: RelationshipId,
        old: Vec<Point>,
        new: Vec<Point>,
    },
}

/// The result of a diagram mutation: the next snapshot and what changed.
#[derive(Debug, Clone)]
pub struct DiagramUpdate {
    pub diagram: Diagram,
    pub events: Vec<DiagramEvent>,
}

impl DiagramUpdate {
    fn unchanged(diagram: &Diagram) -> Self {
        Self {
            diagram: diagram.clone(),
            events: Vec::new(),
        }
    }

    /// Returns true if the mutation changed nothing.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Immutable snapshot of diagram nodes and connectors.
#[derive(Debug, Clone)]
pub struct Diagram {
    model: Model,
    root: LayoutGroup,
    features: Arc<dyn RelationshipFeatures>,
    partitions: Arc<OnceLock<PartitionIndex>>,
    version: u64,
}

impl Diagram {
    /// Creates an empty diagram over `model`.
    pub fn new(model: Model, features: Arc<dyn RelationshipFeatures>) -> Self {
        Self {
            model,
            root: LayoutGroup::new(None),
            features,
            partitions: Arc::default(),
            version: 0,
        }
    }

    /// Returns the model snapshot this diagram was built against.
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn features(&self) -> &Arc<dyn RelationshipFeatures> {
        &self.features
    }

    /// Returns the number of effective mutations applied since creation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns the top-level layout group.
    pub fn root(&self) -> &LayoutGroup {
        &self.root
    }

    /// Returns the same diagram over another model snapshot.
    ///
    /// Shapes whose model counterpart vanished stay until they are removed
    /// explicitly.
    pub fn with_model(&self, model: Model) -> Self {
        Self {
            model,
            ..self.clone()
        }
    }

    pub fn try_get_node(&self, id: NodeId) -> Option<&Arc<DiagramNode>> {
        self.root.find_node(id)
    }

    pub fn try_get_connector(&self, id: RelationshipId) -> Option<&Arc<DiagramConnector>> {
        self.root.find_connector(id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.try_get_node(id).is_some()
    }

    pub fn contains_connector(&self, id: RelationshipId) -> bool {
        self.try_get_connector(id).is_some()
    }

    /// Returns all nodes, every container before its children.
    pub fn nodes(&self) -> Vec<Arc<DiagramNode>> {
        let mut nodes = Vec::new();
        self.root.collect_nodes(&mut nodes);
        nodes
    }

    /// Returns all connectors.
    pub fn connectors(&self) -> Vec<Arc<DiagramConnector>> {
        let mut connectors = Vec::new();
        self.root.collect_connectors(&mut connectors);
        connectors
    }

    /// Returns the owner of the layout group holding `id`, or `None` if the
    /// node is not on the diagram.
    pub fn group_owner_of(&self, id: NodeId) -> Option<Option<NodeId>> {
        self.root.find_group_of(id).map(LayoutGroup::owner)
    }

    /// Returns true if both nodes are on the diagram in the same layout group.
    pub fn share_group(&self, a: NodeId, b: NodeId) -> bool {
        match (self.group_owner_of(a), self.group_owner_of(b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Returns the nodes placed directly inside `parent`, or the top-level
    /// nodes for `None`.
    pub fn get_child_nodes(&self, parent: Option<NodeId>) -> Vec<Arc<DiagramNode>> {
        self.root
            .find_group(parent)
            .map(|group| group.nodes().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns the union of the absolute rects of the given nodes.
    ///
    /// Unknown and unplaced nodes are skipped; `None` if nothing remains.
    pub fn get_rect(&self, ids: &[NodeId]) -> Option<Bounds> {
        Bounds::union_all(
            ids.iter()
                .filter_map(|id| self.try_get_node(*id))
                .filter_map(|node| node.absolute_rect()),
        )
    }

    /// Returns true if `target` can be reached from `source` using only
    /// connectors in the partition of `stereotype`.
    ///
    /// Both nodes must be on the diagram. A node always reaches itself.
    pub fn path_exists(
        &self,
        source: NodeId,
        target: NodeId,
        stereotype: RelationshipStereotype,
    ) -> bool {
        if !self.contains_node(source) || !self.contains_node(target) {
            return false;
        }
        let key = self.features.partition_key(stereotype);
        self.partition_index().path_exists(key, source, target)
    }

    /// Returns true if removing the connector from the partition of
    /// `stereotype` would not change reachability between its endpoints.
    ///
    /// False for unknown connectors and for connectors outside that partition.
    pub fn is_connector_redundant(
        &self,
        connector_id: RelationshipId,
        stereotype: RelationshipStereotype,
    ) -> bool {
        let Some(connector) = self.try_get_connector(connector_id) else {
            return false;
        };
        let key = self.features.partition_key(stereotype);
        if self.features.partition_key(connector.stereotype()) != key {
            return false;
        }
        self.partition_index().is_redundant(key, connector)
    }

    fn partition_index(&self) -> &PartitionIndex {
        self.partitions.get_or_init(|| {
            let connectors = self.connectors();
            PartitionIndex::build(
                connectors.iter().map(Arc::as_ref),
                self.features.as_ref(),
            )
        })
    }

    /// Shows a node.
    ///
    /// Re-adding a node already on the diagram is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CodeweaveError::NotFound`] if the model node or the parent
    /// is missing.
    pub fn add_node(&self, node: DiagramNode) -> Result<DiagramUpdate, CodeweaveError> {
        debug!(node_id:? = node.id(), parent:? = node.parent(); "Adding diagram node");
        if self.contains_node(node.id()) {
            return Ok(DiagramUpdate::unchanged(self));
        }
        if self.model.try_get_node(node.id()).is_none() {
            return Err(CodeweaveError::model_node_not_found(node.id()));
        }

        let id = node.id();
        let mut root = self.root.clone();
        root.insert_node(node)?;
        let diagram = self.next(root);
        let events = diagram
            .try_get_node(id)
            .cloned()
            .map(DiagramEvent::NodeAdded)
            .into_iter()
            .collect();
        Ok(DiagramUpdate { diagram, events })
    }

    /// Shows a connector.
    ///
    /// Re-adding a connector already on the diagram is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CodeweaveError::NotFound`] if the model relationship or an
    /// endpoint on the diagram is missing, or
    /// [`CodeweaveError::CrossLayoutGroup`] if the endpoints live in different
    /// layout groups.
    pub fn add_connector(
        &self,
        connector: DiagramConnector,
    ) -> Result<DiagramUpdate, CodeweaveError> {
        debug!(connector_id:? = connector.id(); "Adding diagram connector");
        if self.contains_connector(connector.id()) {
            return Ok(DiagramUpdate::unchanged(self));
        }
        if self.model.try_get_relationship(connector.id()).is_none() {
            return Err(CodeweaveError::model_relationship_not_found(connector.id()));
        }

        let id = connector.id();
        let mut root = self.root.clone();
        root.insert_connector(connector)?;
        let diagram = self.next(root);
        let events = diagram
            .try_get_connector(id)
            .cloned()
            .map(DiagramEvent::ConnectorAdded)
            .into_iter()
            .collect();
        Ok(DiagramUpdate { diagram, events })
    }

    /// Removes a node, all of its descendants and every connector incident to
    /// any of them.
    ///
    /// Connectors are reported first, then the node, then its descendants;
    /// each exactly once. Removing a node that is not on the diagram is a
    /// no-op.
    pub fn remove_node(&self, id: NodeId) -> DiagramUpdate {
        debug!(node_id:? = id; "Removing diagram node");
        let mut root = self.root.clone();
        let Some(removed) = root.remove_node(id) else {
            trace!(node_id:? = id; "Diagram node not shown");
            return DiagramUpdate::unchanged(self);
        };

        let events = removed
            .connectors
            .into_iter()
            .map(DiagramEvent::ConnectorRemoved)
            .chain(removed.nodes.into_iter().map(DiagramEvent::NodeRemoved))
            .collect();
        DiagramUpdate {
            diagram: self.next(root),
            events,
        }
    }

    /// Removes a connector. Removing a connector that is not on the diagram
    /// is a no-op.
    pub fn remove_connector(&self, id: RelationshipId) -> DiagramUpdate {
        debug!(connector_id:? = id; "Removing diagram connector");
        let mut root = self.root.clone();
        let Some(removed) = root.remove_connector(id) else {
            return DiagramUpdate::unchanged(self);
        };
        DiagramUpdate {
            diagram: self.next(root),
            events: vec![DiagramEvent::ConnectorRemoved(removed)],
        }
    }

    /// Refreshes the model value shown by a node.
    ///
    /// A no-op if the node is not on the diagram or already shows this value.
    pub fn update_model_node(
        &self,
        model_node: Arc<ModelNode>,
    ) -> Result<DiagramUpdate, CodeweaveError> {
        let id = model_node.id();
        let Some(current) = self.try_get_node(id) else {
            return Ok(DiagramUpdate::unchanged(self));
        };
        if current.model_node() == &model_node {
            return Ok(DiagramUpdate::unchanged(self));
        }

        let old = Arc::clone(current.model_node());
        let diagram = self.replace_node(current.with_model_node(Arc::clone(&model_node)))?;
        Ok(DiagramUpdate {
            diagram,
            events: vec![DiagramEvent::NodeModelUpdated {
                id,
                old,
                new: model_node,
            }],
        })
    }

    /// Replaces the route of a connector; points are in canvas coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`CodeweaveError::NotFound`] if the connector is not on the diagram.
    pub fn update_route(
        &self,
        id: RelationshipId,
        route: Vec<Point>,
    ) -> Result<DiagramUpdate, CodeweaveError> {
        let current = self
            .try_get_connector(id)
            .ok_or_else(|| CodeweaveError::diagram_connector_not_found(id))?;
        if current.route() == route.as_slice() {
            return Ok(DiagramUpdate::unchanged(self));
        }

        let old = current.route().to_vec();
        let mut root = self.root.clone();
        root.replace_connector(current.with_route(route.clone()))?;
        Ok(DiagramUpdate {
            diagram: self.next(root),
            events: vec![DiagramEvent::ConnectorRouteChanged {
                id,
                old,
                new: route,
            }],
        })
    }

    /// Removes every node and connector.
    pub fn clear(&self) -> DiagramUpdate {
        debug!(version = self.version; "Clearing diagram");
        let connectors = self.connectors();
        let nodes = self.nodes();
        if nodes.is_empty() {
            return DiagramUpdate::unchanged(self);
        }

        let events = connectors
            .into_iter()
            .map(DiagramEvent::ConnectorRemoved)
            .chain(nodes.into_iter().map(DiagramEvent::NodeRemoved))
            .collect();
        DiagramUpdate {
            diagram: self.next(LayoutGroup::new(None)),
            events,
        }
    }

    /// Replaces a node value without reporting events.
    ///
    /// Used by derived-geometry passes, which report their own events.
    pub(crate) fn replace_node(&self, node: DiagramNode) -> Result<Self, CodeweaveError> {
        let mut root = self.root.clone();
        root.replace_node(node)?;
        Ok(self.next(root))
    }

    fn next(&self, root: LayoutGroup) -> Self {
        Self {
            model: self.model.clone(),
            root,
            features: Arc::clone(&self.features),
            partitions: Arc::default(),
            version: self.version + 1,
        }
    }
}
