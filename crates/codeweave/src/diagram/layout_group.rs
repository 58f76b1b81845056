//! Nested layout groups.
//!
//! A [`LayoutGroup`] holds the diagram nodes that share one relative
//! coordinate space, together with the connectors between them:
//!
//! - Top-level group: nodes placed directly on the canvas (owner = None)
//! - Nested group: nodes placed inside a container node (owner = Some(container_id))
//!
//! Every container that has at least one child owns exactly one nested group.
//! Groups form a tree mirroring the containment of diagram nodes; updates
//! copy only the path from the top-level group down to the changed group.

use std::sync::Arc;

use codeweave_core::identifier::{NodeId, RelationshipId};

use super::{DiagramConnector, DiagramNode};
use crate::{
    error::CodeweaveError,
    structure::{Graph, OrderedMap},
};

/// Nodes and connectors sharing one relative coordinate space.
#[derive(Debug, Clone, Default)]
pub struct LayoutGroup {
    owner: Option<NodeId>,
    graph: Graph<DiagramNode, DiagramConnector>,
    children: OrderedMap<NodeId, LayoutGroup>,
}

/// What a node removal took out of the group tree.
#[derive(Debug, Default)]
pub(crate) struct RemovedSubtree {
    pub(crate) nodes: Vec<Arc<DiagramNode>>,
    pub(crate) connectors: Vec<Arc<DiagramConnector>>,
}

impl LayoutGroup {
    /// Creates an empty group owned by `owner`.
    pub fn new(owner: Option<NodeId>) -> Self {
        Self {
            owner,
            graph: Graph::new(),
            children: OrderedMap::default(),
        }
    }

    /// Returns the container owning this group, or `None` for the top-level group.
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    /// Returns the nodes placed directly in this group.
    pub fn nodes(&self) -> impl Iterator<Item = &Arc<DiagramNode>> {
        self.graph.vertices()
    }

    /// Returns the connectors between nodes of this group.
    pub fn connectors(&self) -> impl Iterator<Item = &Arc<DiagramConnector>> {
        self.graph.edges()
    }

    pub fn node_count(&self) -> usize {
        self.graph.vertex_count()
    }

    /// Returns the nested group owned by the given container of this group.
    pub fn child_group(&self, owner: NodeId) -> Option<&LayoutGroup> {
        self.children.get(&owner)
    }

    /// Returns the nested groups owned by containers of this group.
    pub fn child_groups(&self) -> impl Iterator<Item = &LayoutGroup> {
        self.children.values()
    }

    /// Finds the group owned by `owner` anywhere in this subtree.
    pub fn find_group(&self, owner: Option<NodeId>) -> Option<&LayoutGroup> {
        if self.owner == owner {
            return Some(self);
        }
        self.children
            .values()
            .find_map(|child| child.find_group(owner))
    }

    /// Finds the group holding node `id` anywhere in this subtree.
    pub fn find_group_of(&self, id: NodeId) -> Option<&LayoutGroup> {
        if self.graph.contains_vertex(id) {
            return Some(self);
        }
        self.children
            .values()
            .find_map(|child| child.find_group_of(id))
    }

    pub fn find_node(&self, id: NodeId) -> Option<&Arc<DiagramNode>> {
        self.find_group_of(id)
            .and_then(|group| group.graph.vertex(id))
    }

    pub fn find_connector(&self, id: RelationshipId) -> Option<&Arc<DiagramConnector>> {
        self.graph.edge(id).or_else(|| {
            self.children
                .values()
                .find_map(|child| child.find_connector(id))
        })
    }

    /// Collects all nodes of this subtree, every container before its children.
    pub(crate) fn collect_nodes(&self, out: &mut Vec<Arc<DiagramNode>>) {
        for node in self.graph.vertices() {
            out.push(Arc::clone(node));
            if let Some(child) = self.children.get(&node.id()) {
                child.collect_nodes(out);
            }
        }
    }

    /// Collects all connectors of this subtree.
    pub(crate) fn collect_connectors(&self, out: &mut Vec<Arc<DiagramConnector>>) {
        out.extend(self.graph.edges().cloned());
        for child in self.children.values() {
            child.collect_connectors(out);
        }
    }

    /// Inserts a node into the group owned by its parent.
    ///
    /// The parent's nested group is created on first use.
    ///
    /// # Errors
    ///
    /// Returns [`CodeweaveError::NotFound`] if the parent is not on the diagram.
    pub(crate) fn insert_node(&mut self, node: DiagramNode) -> Result<(), CodeweaveError> {
        let Some(parent) = node.parent() else {
            self.graph = self.graph.add_vertex(node)?;
            return Ok(());
        };

        let holds_parent = |group: &LayoutGroup| group.graph.contains_vertex(parent);
        let apply = |group: &mut LayoutGroup| -> Result<(), CodeweaveError> {
            let nested = group
                .children
                .get_or_insert_with(parent, || LayoutGroup::new(Some(parent)));
            nested.graph = nested.graph.add_vertex(node)?;
            Ok(())
        };
        self.update_where(&holds_parent, apply)
            .unwrap_or_else(|| Err(CodeweaveError::diagram_node_not_found(parent)))
    }

    /// Replaces the node with the same id wherever it lives.
    pub(crate) fn replace_node(&mut self, node: DiagramNode) -> Result<(), CodeweaveError> {
        let id = node.id();
        let holds_node = |group: &LayoutGroup| group.graph.contains_vertex(id);
        let apply = |group: &mut LayoutGroup| -> Result<(), CodeweaveError> {
            group.graph = group.graph.replace_vertex(node)?;
            Ok(())
        };
        self.update_where(&holds_node, apply)
            .unwrap_or_else(|| Err(CodeweaveError::diagram_node_not_found(id)))
    }

    /// Removes a node, its nested group and everything in it.
    ///
    /// Returns `None` if the node is not in this subtree.
    pub(crate) fn remove_node(&mut self, id: NodeId) -> Option<RemovedSubtree> {
        let holds_node = |group: &LayoutGroup| group.graph.contains_vertex(id);
        self.update_where(&holds_node, |group| {
            let (graph, incident) = group.graph.remove_vertex(id).ok()?;
            let node = group.graph.vertex(id).cloned()?;
            group.graph = graph;

            let mut removed = RemovedSubtree {
                nodes: vec![node],
                connectors: incident,
            };
            if let Some(nested) = group.children.remove(&id) {
                nested.collect_connectors(&mut removed.connectors);
                nested.collect_nodes(&mut removed.nodes);
            }
            Some(removed)
        })
        .flatten()
    }

    /// Adds a connector to the group holding both of its endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`CodeweaveError::NotFound`] if an endpoint is not on the
    /// diagram, or [`CodeweaveError::CrossLayoutGroup`] if the endpoints live
    /// in different groups.
    pub(crate) fn insert_connector(
        &mut self,
        connector: DiagramConnector,
    ) -> Result<(), CodeweaveError> {
        let source = connector.source();
        let target = connector.target();
        let source_group = self
            .find_group_of(source)
            .ok_or_else(|| CodeweaveError::diagram_node_not_found(source))?
            .owner();
        let target_group = self
            .find_group_of(target)
            .ok_or_else(|| CodeweaveError::diagram_node_not_found(target))?
            .owner();
        if source_group != target_group {
            return Err(CodeweaveError::CrossLayoutGroup {
                connector: connector.id(),
                source_group,
                target_group,
            });
        }

        let holds_source = |group: &LayoutGroup| group.graph.contains_vertex(source);
        let apply = |group: &mut LayoutGroup| -> Result<(), CodeweaveError> {
            group.graph = group.graph.add_edge(connector)?;
            Ok(())
        };
        self.update_where(&holds_source, apply)
            .unwrap_or_else(|| Err(CodeweaveError::diagram_node_not_found(source)))
    }

    /// Replaces the connector with the same id wherever it lives.
    pub(crate) fn replace_connector(
        &mut self,
        connector: DiagramConnector,
    ) -> Result<(), CodeweaveError> {
        let id = connector.id();
        let holds_connector = |group: &LayoutGroup| group.graph.contains_edge(id);
        let apply = |group: &mut LayoutGroup| -> Result<(), CodeweaveError> {
            group.graph = group.graph.replace_edge(connector)?;
            Ok(())
        };
        self.update_where(&holds_connector, apply)
            .unwrap_or_else(|| Err(CodeweaveError::diagram_connector_not_found(id)))
    }

    /// Removes a connector. Returns `None` if it is not in this subtree.
    pub(crate) fn remove_connector(&mut self, id: RelationshipId) -> Option<Arc<DiagramConnector>> {
        let holds_connector = |group: &LayoutGroup| group.graph.contains_edge(id);
        self.update_where(&holds_connector, |group| {
            let (graph, removed) = group.graph.remove_edge(id).ok()?;
            group.graph = graph;
            Some(removed)
        })
        .flatten()
    }

    fn subtree_any<P>(&self, holds: &P) -> bool
    where
        P: Fn(&LayoutGroup) -> bool,
    {
        holds(self) || self.children.values().any(|child| child.subtree_any(holds))
    }

    /// Applies `f` to the first group in this subtree satisfying `holds`,
    /// copying only the groups on the path to it.
    fn update_where<P, F, R>(&mut self, holds: &P, f: F) -> Option<R>
    where
        P: Fn(&LayoutGroup) -> bool,
        F: FnOnce(&mut LayoutGroup) -> R,
    {
        if holds(self) {
            return Some(f(self));
        }

        let key = self
            .children
            .iter()
            .find(|(_, child)| child.subtree_any(holds))
            .map(|(key, _)| *key)?;
        self.children
            .get_mut(&key)?
            .update_where(holds, f)
    }
}
