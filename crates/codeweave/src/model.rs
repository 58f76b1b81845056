//! The structural model: entities and their typed relationships.
//!
//! A [`Model`] is an immutable snapshot. Every mutator returns a
//! [`ModelUpdate`] holding the next snapshot and the ordered [`ModelEvent`]s
//! that describe the change; the receiver stays valid and unchanged. Unchanged
//! nodes and relationships are shared between snapshots.
//!
//! # Example
//!
//! ```
//! use codeweave::model::{Model, ModelNode};
//! use codeweave::identifier::{EntityRef, Name};
//! use codeweave::stereotype::{NodeStereotype, Origin, RelationshipStereotype};
//!
//! let base = ModelNode::new(
//!     Name::new("Shape"),
//!     NodeStereotype::Class,
//!     Origin::Source,
//!     EntityRef::from("T:Shape"),
//! );
//! let derived = ModelNode::new(
//!     Name::new("Circle"),
//!     NodeStereotype::Class,
//!     Origin::Source,
//!     EntityRef::from("T:Circle"),
//! );
//!
//! let model = Model::new()
//!     .add_node(base.clone())
//!     .model
//!     .add_node(derived.clone())
//!     .model;
//! let (_, update) = model
//!     .get_or_add_relationship(derived.id(), base.id(), RelationshipStereotype::Inheritance, None)
//!     .expect("class to class inheritance is legal");
//!
//! assert_eq!(update.model.relationship_count(), 1);
//! assert_eq!(model.relationship_count(), 0);
//! ```

mod node;
mod relationship;

pub use node::ModelNode;
pub use relationship::ModelRelationship;

use std::sync::Arc;

use imbl::HashMap;

use log::{debug, trace};

use codeweave_core::{
    identifier::{EntityRef, Name, NodeId, RelationshipId},
    stereotype::{
        DirectedRelationshipType, EdgeDirection, NodeStereotype, Origin, RelationshipStereotype,
    },
};

use crate::{
    error::CodeweaveError,
    features::{DefaultRelationshipFeatures, RelationshipFeatures},
    structure::Graph,
};

/// A change to the structural model.
#[derive(Debug, Clone)]
pub enum ModelEvent {
    NodeAdded(Arc<ModelNode>),
    NodeUpdated {
        old: Arc<ModelNode>,
        new: Arc<ModelNode>,
    },
    NodeRemoved(Arc<ModelNode>),
    RelationshipAdded(Arc<ModelRelationship>),
    RelationshipRemoved(Arc<ModelRelationship>),
}

/// The result of a model mutation: the next snapshot and what changed.
///
/// An update without events is a no-op; its `model` is the receiver itself.
#[derive(Debug, Clone)]
pub struct ModelUpdate {
    pub model: Model,
    pub events: Vec<ModelEvent>,
}

impl ModelUpdate {
    fn unchanged(model: &Model) -> Self {
        Self {
            model: model.clone(),
            events: Vec::new(),
        }
    }

    /// Returns true if the mutation changed nothing.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Immutable snapshot of model nodes and relationships.
#[derive(Debug, Clone, Default)]
pub struct Model {
    graph: Graph<ModelNode, ModelRelationship>,
    payload_index: HashMap<EntityRef, NodeId>,
    version: u64,
}

impl Model {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of effective mutations applied since creation.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn node_count(&self) -> usize {
        self.graph.vertex_count()
    }

    pub fn relationship_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Arc<ModelNode>> {
        self.graph.vertices()
    }

    /// Returns all relationships in insertion order.
    pub fn relationships(&self) -> impl Iterator<Item = &Arc<ModelRelationship>> {
        self.graph.edges()
    }

    pub fn try_get_node(&self, id: NodeId) -> Option<&Arc<ModelNode>> {
        self.graph.vertex(id)
    }

    pub fn try_get_relationship(&self, id: RelationshipId) -> Option<&Arc<ModelRelationship>> {
        self.graph.edge(id)
    }

    /// Returns the node standing for the given external entity.
    pub fn try_get_node_by_payload(&self, payload: &EntityRef) -> Option<&Arc<ModelNode>> {
        self.payload_index
            .get(payload)
            .and_then(|id| self.graph.vertex(*id))
    }

    /// Returns every relationship starting or ending at `node`, each once.
    pub fn relationships_of(&self, node: NodeId) -> Vec<&Arc<ModelRelationship>> {
        self.graph.all_edges(node)
    }

    /// Returns the relationship of the given stereotype from `source` to
    /// `target`, if one exists.
    pub fn find_relationship(
        &self,
        source: NodeId,
        target: NodeId,
        stereotype: RelationshipStereotype,
    ) -> Option<&Arc<ModelRelationship>> {
        self.graph
            .out_edges(source)
            .find(|rel| rel.target() == target && rel.stereotype() == stereotype)
    }

    /// Returns the nodes related to `node_id` through relationships of the
    /// given stereotype, followed in the given direction.
    ///
    /// With `recursive` the relation is followed transitively. Each node
    /// appears once, in discovery order; `node_id` itself is never included.
    pub fn get_related_nodes(
        &self,
        node_id: NodeId,
        relationship_type: DirectedRelationshipType,
        recursive: bool,
    ) -> Vec<Arc<ModelNode>> {
        let stereotype = relationship_type.stereotype();
        let direction = relationship_type.direction();
        let follows = |rel: &ModelRelationship| rel.stereotype() == stereotype;

        let ids = if recursive {
            self.graph.reachable(node_id, direction, follows)
        } else {
            let mut ids: Vec<NodeId> = Vec::new();
            for rel in self.graph.directed_edges(node_id, direction) {
                if !follows(rel.as_ref()) {
                    continue;
                }
                let other = match direction {
                    EdgeDirection::Outgoing => rel.target(),
                    EdgeDirection::Incoming => rel.source(),
                };
                if other != node_id && !ids.contains(&other) {
                    ids.push(other);
                }
            }
            ids
        };

        ids.into_iter()
            .filter_map(|id| self.graph.vertex(id).cloned())
            .collect()
    }

    /// Adds a node.
    ///
    /// Re-adding a node whose identity is already present is a no-op. The
    /// payload index keeps the first node registered for an entity.
    pub fn add_node(&self, node: ModelNode) -> ModelUpdate {
        debug!(node_id:? = node.id(), name:% = node.name(); "Adding model node");
        if self.graph.contains_vertex(node.id()) {
            trace!(node_id:? = node.id(); "Model node already present");
            return ModelUpdate::unchanged(self);
        }

        let id = node.id();
        let payload = node.payload().clone();
        let Ok(graph) = self.graph.add_vertex(node) else {
            return ModelUpdate::unchanged(self);
        };

        let mut payload_index = self.payload_index.clone();
        payload_index.entry(payload).or_insert(id);

        let model = self.next(graph, payload_index);
        let added = model.graph.vertex(id).cloned().into_iter();
        ModelUpdate {
            events: added.map(ModelEvent::NodeAdded).collect(),
            model,
        }
    }

    /// Returns the node standing for `payload`, creating it if needed.
    pub fn get_or_add_node(
        &self,
        name: Name,
        stereotype: NodeStereotype,
        origin: Origin,
        payload: EntityRef,
    ) -> (NodeId, ModelUpdate) {
        if let Some(existing) = self.try_get_node_by_payload(&payload) {
            return (existing.id(), ModelUpdate::unchanged(self));
        }
        let node = ModelNode::new(name, stereotype, origin, payload);
        let id = node.id();
        (id, self.add_node(node))
    }

    /// Points an existing node at another external entity, keeping its identity.
    ///
    /// # Errors
    ///
    /// Returns [`CodeweaveError::NotFound`] if the node does not exist.
    pub fn update_node_payload(
        &self,
        id: NodeId,
        payload: EntityRef,
    ) -> Result<ModelUpdate, CodeweaveError> {
        debug!(node_id:? = id, payload:% = payload; "Updating model node payload");
        let old = self
            .graph
            .vertex(id)
            .cloned()
            .ok_or_else(|| CodeweaveError::model_node_not_found(id))?;
        if old.payload() == &payload {
            return Ok(ModelUpdate::unchanged(self));
        }

        let graph = self.graph.replace_vertex(old.with_payload(payload.clone()))?;

        let mut payload_index = self.payload_index.clone();
        if payload_index.get(old.payload()) == Some(&id) {
            payload_index.remove(old.payload());
        }
        payload_index.entry(payload).or_insert(id);

        let model = self.next(graph, payload_index);
        let events = model
            .graph
            .vertex(id)
            .cloned()
            .map(|new| ModelEvent::NodeUpdated { old, new })
            .into_iter()
            .collect();
        Ok(ModelUpdate { model, events })
    }

    /// Removes a node together with every relationship incident to it.
    ///
    /// The removed relationships are reported before the node.
    ///
    /// # Errors
    ///
    /// Returns [`CodeweaveError::NotFound`] if the node does not exist.
    pub fn remove_node(&self, id: NodeId) -> Result<ModelUpdate, CodeweaveError> {
        debug!(node_id:? = id; "Removing model node");
        let node = self
            .graph
            .vertex(id)
            .cloned()
            .ok_or_else(|| CodeweaveError::model_node_not_found(id))?;

        let (graph, removed) = self.graph.remove_vertex(id)?;

        let mut payload_index = self.payload_index.clone();
        if self.payload_index.get(node.payload()) == Some(&id) {
            payload_index.remove(node.payload());
        }

        let mut events: Vec<ModelEvent> = removed
            .into_iter()
            .map(ModelEvent::RelationshipRemoved)
            .collect();
        events.push(ModelEvent::NodeRemoved(node));

        Ok(ModelUpdate {
            model: self.next(graph, payload_index),
            events,
        })
    }

    /// Adds a relationship.
    ///
    /// Re-adding a relationship whose identity is already present is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CodeweaveError::NotFound`] if an endpoint does not exist, or
    /// [`CodeweaveError::InvalidRelationship`] if the endpoints' stereotypes
    /// are not a legal pair.
    pub fn add_relationship(
        &self,
        relationship: ModelRelationship,
    ) -> Result<ModelUpdate, CodeweaveError> {
        self.add_relationship_with(relationship, &DefaultRelationshipFeatures)
    }

    /// Adds a relationship, also rejecting pairs missing from
    /// `features.valid_pairs`.
    ///
    /// # Errors
    ///
    /// Same as [`Model::add_relationship`].
    pub fn add_relationship_with(
        &self,
        relationship: ModelRelationship,
        features: &dyn RelationshipFeatures,
    ) -> Result<ModelUpdate, CodeweaveError> {
        debug!(
            relationship_id:? = relationship.id(),
            stereotype:% = relationship.stereotype();
            "Adding model relationship"
        );
        if self.graph.contains_edge(relationship.id()) {
            return Ok(ModelUpdate::unchanged(self));
        }

        let source = self.require_node(relationship.source())?;
        let target = self.require_node(relationship.target())?;
        relationship::validate_with(features, source, target, relationship.stereotype())?;

        let id = relationship.id();
        let graph = self.graph.add_edge(relationship)?;
        let model = self.next(graph, self.payload_index.clone());
        let events = model
            .graph
            .edge(id)
            .cloned()
            .map(ModelEvent::RelationshipAdded)
            .into_iter()
            .collect();
        Ok(ModelUpdate { model, events })
    }

    /// Returns the relationship of the given stereotype between two nodes,
    /// creating it if needed.
    ///
    /// # Errors
    ///
    /// Same as [`Model::add_relationship`].
    pub fn get_or_add_relationship(
        &self,
        source: NodeId,
        target: NodeId,
        stereotype: RelationshipStereotype,
        payload: Option<EntityRef>,
    ) -> Result<(RelationshipId, ModelUpdate), CodeweaveError> {
        self.get_or_add_relationship_with(
            source,
            target,
            stereotype,
            payload,
            &DefaultRelationshipFeatures,
        )
    }

    /// [`Model::get_or_add_relationship`] checked against `features`.
    ///
    /// # Errors
    ///
    /// Same as [`Model::add_relationship`].
    pub fn get_or_add_relationship_with(
        &self,
        source: NodeId,
        target: NodeId,
        stereotype: RelationshipStereotype,
        payload: Option<EntityRef>,
        features: &dyn RelationshipFeatures,
    ) -> Result<(RelationshipId, ModelUpdate), CodeweaveError> {
        if let Some(existing) = self.find_relationship(source, target, stereotype) {
            return Ok((existing.id(), ModelUpdate::unchanged(self)));
        }

        let relationship = ModelRelationship::new(
            self.require_node(source)?,
            self.require_node(target)?,
            stereotype,
            payload,
        )?;
        let id = relationship.id();
        Ok((id, self.add_relationship_with(relationship, features)?))
    }

    /// Removes a relationship.
    ///
    /// # Errors
    ///
    /// Returns [`CodeweaveError::NotFound`] if the relationship does not exist.
    pub fn remove_relationship(&self, id: RelationshipId) -> Result<ModelUpdate, CodeweaveError> {
        debug!(relationship_id:? = id; "Removing model relationship");
        if !self.graph.contains_edge(id) {
            return Err(CodeweaveError::model_relationship_not_found(id));
        }

        let (graph, removed) = self.graph.remove_edge(id)?;
        Ok(ModelUpdate {
            model: self.next(graph, self.payload_index.clone()),
            events: vec![ModelEvent::RelationshipRemoved(removed)],
        })
    }

    /// Removes every relationship, then every node.
    pub fn clear(&self) -> ModelUpdate {
        debug!(nodes = self.node_count(), relationships = self.relationship_count(); "Clearing model");
        if self.graph.vertex_count() == 0 {
            return ModelUpdate::unchanged(self);
        }

        let events = self
            .graph
            .edges()
            .cloned()
            .map(ModelEvent::RelationshipRemoved)
            .chain(self.graph.vertices().cloned().map(ModelEvent::NodeRemoved))
            .collect();

        ModelUpdate {
            model: self.next(Graph::new(), HashMap::new()),
            events,
        }
    }

    fn require_node(&self, id: NodeId) -> Result<&ModelNode, CodeweaveError> {
        self.graph
            .vertex(id)
            .map(Arc::as_ref)
            .ok_or_else(|| CodeweaveError::model_node_not_found(id))
    }

    fn next(
        &self,
        graph: Graph<ModelNode, ModelRelationship>,
        payload_index: HashMap<EntityRef, NodeId>,
    ) -> Self {
        Self {
            graph,
            payload_index,
            version: self.version + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, stereotype: NodeStereotype) -> ModelNode {
        ModelNode::new(
            Name::new(name),
            stereotype,
            Origin::Source,
            EntityRef::from(format!("T:{name}")),
        )
    }

    fn model_with(nodes: &[&ModelNode]) -> Model {
        nodes
            .iter()
            .fold(Model::new(), |model, node| model.add_node((*node).clone()).model)
    }

    fn relate(
        model: &Model,
        source: &ModelNode,
        target: &ModelNode,
        stereotype: RelationshipStereotype,
    ) -> (RelationshipId, Model) {
        let (id, update) = model
            .get_or_add_relationship(source.id(), target.id(), stereotype, None)
            .unwrap();
        (id, update.model)
    }

    fn names(nodes: &[Arc<ModelNode>]) -> Vec<String> {
        nodes.iter().map(|node| node.name().to_string()).collect()
    }

    #[test]
    fn test_add_node_emits_event() {
        let a = node("A", NodeStereotype::Class);
        let update = Model::new().add_node(a.clone());

        assert_eq!(update.model.node_count(), 1);
        assert_eq!(update.model.version(), 1);
        assert!(matches!(&update.events[..], [ModelEvent::NodeAdded(n)] if n.id() == a.id()));
        assert_eq!(
            update.model.try_get_node_by_payload(a.payload()).map(|n| n.id()),
            Some(a.id())
        );
    }

    #[test]
    fn test_add_node_is_idempotent() {
        let a = node("A", NodeStereotype::Class);
        let model = model_with(&[&a]);

        let update = model.add_node(a.clone());

        assert!(update.is_empty());
        assert_eq!(update.model.version(), model.version());
        assert_eq!(update.model.node_count(), 1);
    }

    #[test]
    fn test_get_or_add_node_by_payload() {
        let model = Model::new();
        let payload = EntityRef::from("T:Service");

        let (first, update) = model.get_or_add_node(
            Name::new("Service"),
            NodeStereotype::Class,
            Origin::Source,
            payload.clone(),
        );
        let (second, again) = update.model.get_or_add_node(
            Name::new("Service"),
            NodeStereotype::Class,
            Origin::Source,
            payload,
        );

        assert_eq!(first, second);
        assert_eq!(update.events.len(), 1);
        assert!(again.is_empty());
    }

    #[test]
    fn test_update_node_payload_keeps_identity() {
        let a = node("A", NodeStereotype::Class);
        let model = model_with(&[&a]);

        let update = model
            .update_node_payload(a.id(), EntityRef::from("T:A2"))
            .unwrap();

        let updated = update.model.try_get_node(a.id()).unwrap();
        assert_eq!(updated.payload().as_str(), "T:A2");
        assert!(update.model.try_get_node_by_payload(a.payload()).is_none());
        assert!(matches!(
            &update.events[..],
            [ModelEvent::NodeUpdated { old, new }] if old.payload() == a.payload() && new.id() == a.id()
        ));
        // The previous snapshot is untouched.
        assert_eq!(model.try_get_node(a.id()).unwrap().payload(), a.payload());

        let same = update
            .model
            .update_node_payload(a.id(), EntityRef::from("T:A2"))
            .unwrap();
        assert!(same.is_empty());
    }

    #[test]
    fn test_update_missing_node_fails() {
        let err = Model::new()
            .update_node_payload(NodeId::new(), EntityRef::from("x"))
            .unwrap_err();
        assert!(matches!(err, CodeweaveError::NotFound { .. }));
    }

    #[test]
    fn test_invalid_relationship_is_rejected() {
        let class = node("A", NodeStereotype::Class);
        let property = node("P", NodeStereotype::Property);
        let other = node("B", NodeStereotype::Class);
        let model = model_with(&[&class, &property, &other]);

        let err = model
            .get_or_add_relationship(
                class.id(),
                property.id(),
                RelationshipStereotype::Inheritance,
                None,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            CodeweaveError::InvalidRelationship {
                stereotype: RelationshipStereotype::Inheritance,
                source_kind: NodeStereotype::Class,
                target_kind: NodeStereotype::Property,
            }
        ));

        let (_, model) = relate(&model, &class, &other, RelationshipStereotype::Inheritance);
        assert_eq!(model.relationship_count(), 1);
    }

    #[test]
    fn test_relationship_requires_endpoints() {
        let a = node("A", NodeStereotype::Class);
        let b = node("B", NodeStereotype::Class);
        let model = model_with(&[&a]);

        let rel = ModelRelationship::new(&a, &b, RelationshipStereotype::Association, None).unwrap();
        let err = model.add_relationship(rel).unwrap_err();
        assert!(matches!(err, CodeweaveError::NotFound { .. }));
    }

    #[derive(Debug)]
    struct InterfacesOnly;

    impl RelationshipFeatures for InterfacesOnly {
        fn valid_pairs(
            &self,
            _stereotype: RelationshipStereotype,
        ) -> Vec<(NodeStereotype, NodeStereotype)> {
            vec![(NodeStereotype::Interface, NodeStereotype::Interface)]
        }

        fn partition_key(&self, stereotype: RelationshipStereotype) -> crate::features::PartitionKey {
            DefaultRelationshipFeatures.partition_key(stereotype)
        }
    }

    #[test]
    fn test_features_reject_pairs_outside_their_table() {
        let a = node("A", NodeStereotype::Class);
        let b = node("B", NodeStereotype::Class);
        let i = node("I", NodeStereotype::Interface);
        let j = node("J", NodeStereotype::Interface);
        let model = model_with(&[&a, &b, &i, &j]);

        let err = model
            .get_or_add_relationship_with(
                a.id(),
                b.id(),
                RelationshipStereotype::Inheritance,
                None,
                &InterfacesOnly,
            )
            .unwrap_err();
        assert!(matches!(err, CodeweaveError::InvalidRelationship { .. }));

        let (_, update) = model
            .get_or_add_relationship_with(
                i.id(),
                j.id(),
                RelationshipStereotype::Inheritance,
                None,
                &InterfacesOnly,
            )
            .unwrap();
        assert_eq!(update.model.relationship_count(), 1);
    }

    #[test]
    fn test_get_or_add_relationship_is_idempotent() {
        let a = node("A", NodeStereotype::Class);
        let b = node("B", NodeStereotype::Class);
        let model = model_with(&[&a, &b]);

        let (first, model) = relate(&model, &a, &b, RelationshipStereotype::Association);
        let (second, update) = model
            .get_or_add_relationship(a.id(), b.id(), RelationshipStereotype::Association, None)
            .unwrap();

        assert_eq!(first, second);
        assert!(update.is_empty());

        let rel = model.try_get_relationship(first).unwrap().as_ref().clone();
        assert!(model.add_relationship(rel).unwrap().is_empty());
    }

    #[test]
    fn test_remove_node_cascades() {
        let a = node("A", NodeStereotype::Class);
        let b = node("B", NodeStereotype::Class);
        let c = node("C", NodeStereotype::Class);
        let model = model_with(&[&a, &b, &c]);
        let (ab, model) = relate(&model, &a, &b, RelationshipStereotype::Association);
        let (bc, model) = relate(&model, &b, &c, RelationshipStereotype::Association);
        let (ac, model) = relate(&model, &a, &c, RelationshipStereotype::Association);

        let update = model.remove_node(b.id()).unwrap();

        let removed: Vec<RelationshipId> = update
            .events
            .iter()
            .filter_map(|event| match event {
                ModelEvent::RelationshipRemoved(rel) => Some(rel.id()),
                _ => None,
            })
            .collect();
        assert_eq!(removed, vec![bc, ab]);
        assert!(matches!(update.events.last(), Some(ModelEvent::NodeRemoved(n)) if n.id() == b.id()));
        assert!(update.model.try_get_relationship(ac).is_some());
        assert!(update.model.try_get_node_by_payload(b.payload()).is_none());
        assert_eq!(update.model.relationships_of(a.id()).len(), 1);
    }

    #[test]
    fn test_remove_missing_node_fails() {
        let err = Model::new().remove_node(NodeId::new()).unwrap_err();
        assert!(matches!(err, CodeweaveError::NotFound { .. }));
    }

    #[test]
    fn test_remove_relationship() {
        let a = node("A", NodeStereotype::Class);
        let b = node("B", NodeStereotype::Interface);
        let model = model_with(&[&a, &b]);
        let (id, model) = relate(&model, &a, &b, RelationshipStereotype::Implementation);

        let update = model.remove_relationship(id).unwrap();
        assert_eq!(update.model.relationship_count(), 0);
        assert!(update.model.remove_relationship(id).is_err());
    }

    #[test]
    fn test_related_nodes_direct_and_recursive() {
        let a = node("A", NodeStereotype::Class);
        let b = node("B", NodeStereotype::Class);
        let c = node("C", NodeStereotype::Class);
        let d = node("D", NodeStereotype::Class);
        let model = model_with(&[&a, &b, &c, &d]);
        let (_, model) = relate(&model, &a, &b, RelationshipStereotype::Inheritance);
        let (_, model) = relate(&model, &b, &c, RelationshipStereotype::Inheritance);
        let (_, model) = relate(&model, &a, &d, RelationshipStereotype::Association);

        let base = DirectedRelationshipType::outgoing(RelationshipStereotype::Inheritance);
        assert_eq!(names(&model.get_related_nodes(a.id(), base, false)), vec!["B"]);
        assert_eq!(names(&model.get_related_nodes(a.id(), base, true)), vec!["B", "C"]);

        let derived = DirectedRelationshipType::incoming(RelationshipStereotype::Inheritance);
        assert_eq!(names(&model.get_related_nodes(c.id(), derived, true)), vec!["B", "A"]);
    }

    #[test]
    fn test_related_nodes_on_cycle() {
        let a = node("A", NodeStereotype::Class);
        let b = node("B", NodeStereotype::Class);
        let c = node("C", NodeStereotype::Class);
        let model = model_with(&[&a, &b, &c]);
        let (_, model) = relate(&model, &a, &b, RelationshipStereotype::Association);
        let (_, model) = relate(&model, &b, &c, RelationshipStereotype::Association);
        let (_, model) = relate(&model, &c, &a, RelationshipStereotype::Association);

        let uses = DirectedRelationshipType::outgoing(RelationshipStereotype::Association);
        assert_eq!(names(&model.get_related_nodes(a.id(), uses, true)), vec!["B", "C"]);
    }

    #[test]
    fn test_clear() {
        let a = node("A", NodeStereotype::Class);
        let b = node("B", NodeStereotype::Class);
        let model = model_with(&[&a, &b]);
        let (_, model) = relate(&model, &a, &b, RelationshipStereotype::Association);

        let update = model.clear();
        assert_eq!(update.events.len(), 3);
        assert!(matches!(update.events[0], ModelEvent::RelationshipRemoved(_)));
        assert_eq!(update.model.node_count(), 0);
        assert!(update.model.clear().is_empty());
    }
}
