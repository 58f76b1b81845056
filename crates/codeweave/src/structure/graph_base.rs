//! Low-level persistent graph data structure.
//!
//! This module provides the directed multigraph shared by the model and the
//! diagram layers. Every operation is pure: mutators return a new graph and
//! leave the receiver untouched.
//!
//! # Architecture
//!
//! The module provides:
//! - [`GraphVertex`] and [`GraphEdge`]: how vertex and edge values expose their identities
//! - [`Graph`]: the vertex/edge storage with incoming and outgoing adjacency
//! - [`GraphError`]: invariant violations reported by the mutators
//!
//! Storage is persistent. The vertex and edge maps and the adjacency indices
//! are `imbl` tries shared between a graph and every graph derived from it;
//! a mutation copies only the trie nodes on the path to the touched entry,
//! never a whole map. Vertex and edge values are themselves `Arc`-shared.
//!
//! Parallel edges and self-loops are allowed. An edge never references a
//! vertex absent from the vertex set.

use std::{
    collections::{HashSet, VecDeque},
    fmt,
    sync::Arc,
};

use imbl::{HashMap, Vector};
use thiserror::Error;

use codeweave_core::{
    identifier::{NodeId, RelationshipId},
    stereotype::EdgeDirection,
};

use super::OrderedMap;

/// A value stored as a graph vertex.
pub trait GraphVertex: fmt::Debug {
    fn id(&self) -> NodeId;
}

/// A value stored as a directed graph edge.
pub trait GraphEdge: fmt::Debug {
    fn id(&self) -> RelationshipId;
    fn source(&self) -> NodeId;
    fn target(&self) -> NodeId;
}

/// Invariant violations reported by [`Graph`] mutators.
///
/// The graph never decides whether a violation is harmless; higher layers
/// turn some of these into no-ops and others into user-facing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("vertex `{0}` already exists")]
    DuplicateVertex(NodeId),

    #[error("vertex `{0}` does not exist")]
    VertexNotFound(NodeId),

    #[error("edge `{0}` already exists")]
    DuplicateEdge(RelationshipId),

    #[error("edge `{0}` does not exist")]
    EdgeNotFound(RelationshipId),

    #[error("edge `{edge}` references missing vertex `{vertex}`")]
    MissingEndpoint {
        edge: RelationshipId,
        vertex: NodeId,
    },
}

type Adjacency = HashMap<NodeId, Vector<RelationshipId>>;

/// Persistent directed multigraph.
///
/// Vertices and edges iterate in insertion order.
///
/// Type parameters:
/// - `V`: Vertex value type
/// - `E`: Edge value type
pub struct Graph<V, E> {
    vertices: OrderedMap<NodeId, Arc<V>>,
    edges: OrderedMap<RelationshipId, Arc<E>>,
    outgoing: Adjacency,
    incoming: Adjacency,
}

impl<V, E> Clone for Graph<V, E> {
    fn clone(&self) -> Self {
        Self {
            vertices: self.vertices.clone(),
            edges: self.edges.clone(),
            outgoing: self.outgoing.clone(),
            incoming: self.incoming.clone(),
        }
    }
}

impl<V, E> Default for Graph<V, E> {
    fn default() -> Self {
        Self {
            vertices: OrderedMap::default(),
            edges: OrderedMap::default(),
            outgoing: Adjacency::default(),
            incoming: Adjacency::default(),
        }
    }
}

impl<V: fmt::Debug, E: fmt::Debug> fmt::Debug for Graph<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("vertices", &self.vertices.values().collect::<Vec<_>>())
            .field("edges", &self.edges.values().collect::<Vec<_>>())
            .finish()
    }
}

impl<V, E> Graph<V, E>
where
    V: GraphVertex,
    E: GraphEdge,
{
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the vertex with the given ID, if it exists.
    pub fn vertex(&self, id: NodeId) -> Option<&Arc<V>> {
        self.vertices.get(&id)
    }

    /// Returns the edge with the given ID, if it exists.
    pub fn edge(&self, id: RelationshipId) -> Option<&Arc<E>> {
        self.edges.get(&id)
    }

    /// Returns an iterator over all vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &Arc<V>> {
        self.vertices.values()
    }

    /// Returns an iterator over all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Arc<E>> {
        self.edges.values()
    }

    /// Returns the total number of vertices in the graph.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the total number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Checks if a vertex with the given ID exists in the graph.
    pub fn contains_vertex(&self, id: NodeId) -> bool {
        self.vertices.contains_key(&id)
    }

    /// Checks if an edge with the given ID exists in the graph.
    pub fn contains_edge(&self, id: RelationshipId) -> bool {
        self.edges.contains_key(&id)
    }

    /// Returns an iterator over the edges leaving the given vertex.
    ///
    /// Returns an empty iterator if the vertex has no outgoing edges or does
    /// not exist.
    pub fn out_edges(&self, id: NodeId) -> impl Iterator<Item = &Arc<E>> {
        self.adjacent(&self.outgoing, id)
    }

    /// Returns an iterator over the edges entering the given vertex.
    pub fn in_edges(&self, id: NodeId) -> impl Iterator<Item = &Arc<E>> {
        self.adjacent(&self.incoming, id)
    }

    /// Returns every edge incident to the given vertex, each exactly once.
    ///
    /// Outgoing edges come first; self-loops are reported once.
    pub fn all_edges(&self, id: NodeId) -> Vec<&Arc<E>> {
        let mut edges: Vec<&Arc<E>> = self.out_edges(id).collect();
        edges.extend(self.in_edges(id).filter(|edge| edge.source() != id));
        edges
    }

    /// Returns the edges incident to `id` in the given direction.
    pub fn directed_edges(
        &self,
        id: NodeId,
        direction: EdgeDirection,
    ) -> Box<dyn Iterator<Item = &Arc<E>> + '_> {
        match direction {
            EdgeDirection::Outgoing => Box::new(self.out_edges(id)),
            EdgeDirection::Incoming => Box::new(self.in_edges(id)),
        }
    }

    /// Returns the vertices reachable from `start` by following edges that
    /// pass `filter` in the given direction.
    ///
    /// The walk is breadth-first and guarded by a visited set, so cycles are
    /// safe. Results are in discovery order and never contain `start` itself.
    pub fn reachable<F>(&self, start: NodeId, direction: EdgeDirection, filter: F) -> Vec<NodeId>
    where
        F: Fn(&E) -> bool,
    {
        let mut visited = HashSet::from([start]);
        let mut discovered = Vec::new();
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            for edge in self.directed_edges(current, direction) {
                if !filter(edge.as_ref()) {
                    continue;
                }
                let next = match direction {
                    EdgeDirection::Outgoing => edge.target(),
                    EdgeDirection::Incoming => edge.source(),
                };
                if visited.insert(next) {
                    discovered.push(next);
                    queue.push_back(next);
                }
            }
        }

        discovered
    }

    /// Returns true if `to` can be reached from `from` along outgoing edges
    /// that pass `filter`.
    ///
    /// A present vertex always reaches itself.
    pub fn has_path<F>(&self, from: NodeId, to: NodeId, filter: F) -> bool
    where
        F: Fn(&E) -> bool,
    {
        if !self.contains_vertex(from) || !self.contains_vertex(to) {
            return false;
        }
        from == to
            || self
                .reachable(from, EdgeDirection::Outgoing, filter)
                .contains(&to)
    }

    /// Returns a graph with the vertex added.
    ///
    /// # Errors
    /// Returns [`GraphError::DuplicateVertex`] if a vertex with the same ID exists.
    pub fn add_vertex(&self, vertex: V) -> Result<Self, GraphError> {
        let id = vertex.id();
        if self.contains_vertex(id) {
            return Err(GraphError::DuplicateVertex(id));
        }

        let mut next = self.clone();
        next.vertices.insert(id, Arc::new(vertex));
        Ok(next)
    }

    /// Returns a graph with the vertex of the same ID replaced, keeping its
    /// position and its incident edges.
    ///
    /// # Errors
    /// Returns [`GraphError::VertexNotFound`] if no vertex with that ID exists.
    pub fn replace_vertex(&self, vertex: V) -> Result<Self, GraphError> {
        let id = vertex.id();
        if !self.contains_vertex(id) {
            return Err(GraphError::VertexNotFound(id));
        }

        let mut next = self.clone();
        next.vertices.insert(id, Arc::new(vertex));
        Ok(next)
    }

    /// Returns a graph without the vertex and without every edge incident to
    /// it, together with the removed edges.
    ///
    /// # Errors
    /// Returns [`GraphError::VertexNotFound`] if no vertex with that ID exists.
    pub fn remove_vertex(&self, id: NodeId) -> Result<(Self, Vec<Arc<E>>), GraphError> {
        if !self.contains_vertex(id) {
            return Err(GraphError::VertexNotFound(id));
        }

        let incident: Vec<Arc<E>> = self.all_edges(id).into_iter().cloned().collect();
        let mut next = self.clone();
        for edge in &incident {
            next.unlink_edge(edge.as_ref());
        }
        next.vertices.remove(&id);
        next.outgoing.remove(&id);
        next.incoming.remove(&id);

        Ok((next, incident))
    }

    /// Returns a graph with the edge added.
    ///
    /// # Errors
    /// Returns [`GraphError::DuplicateEdge`] if an edge with the same ID exists,
    /// or [`GraphError::MissingEndpoint`] if either endpoint is absent.
    pub fn add_edge(&self, edge: E) -> Result<Self, GraphError> {
        let id = edge.id();
        if self.contains_edge(id) {
            return Err(GraphError::DuplicateEdge(id));
        }
        self.check_endpoints(&edge)?;

        let mut next = self.clone();
        next.link_edge(edge);
        Ok(next)
    }

    /// Returns a graph without the edge, together with the removed edge.
    ///
    /// # Errors
    /// Returns [`GraphError::EdgeNotFound`] if no edge with that ID exists.
    pub fn remove_edge(&self, id: RelationshipId) -> Result<(Self, Arc<E>), GraphError> {
        let Some(edge) = self.edge(id).cloned() else {
            return Err(GraphError::EdgeNotFound(id));
        };

        let mut next = self.clone();
        next.unlink_edge(edge.as_ref());
        Ok((next, edge))
    }

    /// Returns a graph with the edge of the same ID replaced.
    ///
    /// The adjacency indices are rebuilt for the edge if its endpoints changed.
    ///
    /// # Errors
    /// Returns [`GraphError::EdgeNotFound`] if no edge with that ID exists, or
    /// [`GraphError::MissingEndpoint`] if a new endpoint is absent.
    pub fn replace_edge(&self, edge: E) -> Result<Self, GraphError> {
        let id = edge.id();
        let Some(current) = self.edge(id) else {
            return Err(GraphError::EdgeNotFound(id));
        };
        self.check_endpoints(&edge)?;

        let mut next = self.clone();
        if current.source() == edge.source() && current.target() == edge.target() {
            next.edges.insert(id, Arc::new(edge));
        } else {
            next.unlink_edge(current.as_ref());
            next.link_edge(edge);
        }
        Ok(next)
    }

    fn adjacent<'a>(
        &'a self,
        adjacency: &'a Adjacency,
        id: NodeId,
    ) -> impl Iterator<Item = &'a Arc<E>> + 'a {
        adjacency
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|edge_id| self.edges.get(edge_id))
    }

    fn check_endpoints(&self, edge: &E) -> Result<(), GraphError> {
        for vertex in [edge.source(), edge.target()] {
            if !self.contains_vertex(vertex) {
                return Err(GraphError::MissingEndpoint {
                    edge: edge.id(),
                    vertex,
                });
            }
        }
        Ok(())
    }

    fn link_edge(&mut self, edge: E) {
        let id = edge.id();
        self.outgoing
            .entry(edge.source())
            .or_insert_with(Vector::new)
            .push_back(id);
        self.incoming
            .entry(edge.target())
            .or_insert_with(Vector::new)
            .push_back(id);
        self.edges.insert(id, Arc::new(edge));
    }

    fn unlink_edge(&mut self, edge: &E) {
        let id = edge.id();
        self.edges.remove(&id);
        if let Some(ids) = self.outgoing.get_mut(&edge.source()) {
            ids.retain(|other| *other != id);
        }
        if let Some(ids) = self.incoming.get_mut(&edge.target()) {
            ids.retain(|other| *other != id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test vertex with a simple numeric value
    #[derive(Debug, Clone, PartialEq)]
    struct TestNode {
        id: NodeId,
        value: u32,
    }

    impl TestNode {
        fn new(value: u32) -> Self {
            Self {
                id: NodeId::new(),
                value,
            }
        }
    }

    impl GraphVertex for TestNode {
        fn id(&self) -> NodeId {
            self.id
        }
    }

    /// Test edge with a weight attribute
    #[derive(Debug, Clone, PartialEq)]
    struct TestEdge {
        id: RelationshipId,
        source: NodeId,
        target: NodeId,
        weight: i32,
    }

    impl TestEdge {
        fn new(source: &TestNode, target: &TestNode, weight: i32) -> Self {
            Self {
                id: RelationshipId::new(),
                source: source.id,
                target: target.id,
                weight,
            }
        }
    }

    impl GraphEdge for TestEdge {
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

    type TestGraph = Graph<TestNode, TestEdge>;

    fn graph_with(nodes: &[&TestNode]) -> TestGraph {
        nodes.iter().fold(TestGraph::new(), |graph, node| {
            graph.add_vertex((*node).clone()).unwrap()
        })
    }

    fn ids(edges: impl IntoIterator<Item = impl AsRef<TestEdge>>) -> Vec<RelationshipId> {
        edges.into_iter().map(|edge| edge.as_ref().id).collect()
    }

    #[test]
    fn test_graph_new() {
        let graph = TestGraph::new();

        assert_eq!(graph.vertex_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.vertices().count(), 0);
        assert_eq!(graph.edges().count(), 0);
    }

    #[test]
    fn test_add_vertex() {
        let node1 = TestNode::new(10);
        let node2 = TestNode::new(20);
        let graph = graph_with(&[&node1, &node2]);

        assert_eq!(graph.vertex_count(), 2);
        assert!(graph.contains_vertex(node1.id));
        assert_eq!(graph.vertex(node2.id).map(|v| v.value), Some(20));
    }

    #[test]
    fn test_add_vertex_is_pure() {
        let node = TestNode::new(1);
        let empty = TestGraph::new();
        let graph = empty.add_vertex(node.clone()).unwrap();

        assert_eq!(empty.vertex_count(), 0);
        assert_eq!(graph.vertex_count(), 1);
    }

    #[test]
    fn test_add_duplicate_vertex() {
        let node = TestNode::new(1);
        let graph = graph_with(&[&node]);

        assert_eq!(
            graph.add_vertex(node.clone()).unwrap_err(),
            GraphError::DuplicateVertex(node.id)
        );
    }

    #[test]
    fn test_vertex_returns_none_for_missing() {
        let graph = TestGraph::new();
        assert!(graph.vertex(NodeId::new()).is_none());
    }

    #[test]
    fn test_replace_vertex_keeps_edges_and_order() {
        let node1 = TestNode::new(1);
        let node2 = TestNode::new(2);
        let graph = graph_with(&[&node1, &node2]);
        let edge = TestEdge::new(&node1, &node2, 7);
        let graph = graph.add_edge(edge.clone()).unwrap();

        let updated = TestNode {
            id: node1.id,
            value: 100,
        };
        let replaced = graph.replace_vertex(updated).unwrap();

        assert_eq!(replaced.vertex(node1.id).map(|v| v.value), Some(100));
        assert_eq!(graph.vertex(node1.id).map(|v| v.value), Some(1));
        assert_eq!(ids(replaced.out_edges(node1.id)), vec![edge.id]);
        let order: Vec<u32> = replaced.vertices().map(|v| v.value).collect();
        assert_eq!(order, vec![100, 2]);

        let stranger = TestNode::new(3);
        assert_eq!(
            graph.replace_vertex(stranger.clone()).unwrap_err(),
            GraphError::VertexNotFound(stranger.id)
        );
    }

    #[test]
    fn test_versions_share_untouched_storage() {
        let nodes: Vec<TestNode> = (0..64).map(TestNode::new).collect();
        let graph = nodes
            .iter()
            .fold(TestGraph::new(), |graph, node| graph.add_vertex(node.clone()).unwrap());

        let edge = TestEdge::new(&nodes[0], &nodes[1], 1);
        let linked = graph.add_edge(edge.clone()).unwrap();
        assert!(linked.vertices.ptr_eq(&graph.vertices));
        assert!(!linked.edges.ptr_eq(&graph.edges));

        let replaced = linked
            .replace_vertex(TestNode {
                id: nodes[5].id,
                value: 500,
            })
            .unwrap();
        assert!(replaced.edges.ptr_eq(&linked.edges));
        assert!(Arc::ptr_eq(
            replaced.vertex(nodes[6].id).unwrap(),
            graph.vertex(nodes[6].id).unwrap()
        ));

        // Every version stays readable after later ones were derived from it.
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(linked.vertex(nodes[5].id).map(|v| v.value), Some(5));
        assert_eq!(replaced.vertex(nodes[5].id).map(|v| v.value), Some(500));
        let order: Vec<u32> = replaced.vertices().map(|v| v.value).take(7).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 500, 6]);
    }

    #[test]
    fn test_add_edge() {
        let node1 = TestNode::new(10);
        let node2 = TestNode::new(20);
        let graph = graph_with(&[&node1, &node2]);
        let edge = TestEdge::new(&node1, &node2, 5);

        let graph = graph.add_edge(edge.clone()).unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge(edge.id).map(|e| e.weight), Some(5));
        assert_eq!(ids(graph.out_edges(node1.id)), vec![edge.id]);
        assert_eq!(ids(graph.in_edges(node2.id)), vec![edge.id]);
        assert_eq!(graph.out_edges(node2.id).count(), 0);
    }

    #[test]
    fn test_add_edge_missing_endpoint() {
        let node1 = TestNode::new(10);
        let stranger = TestNode::new(20);
        let graph = graph_with(&[&node1]);
        let edge = TestEdge::new(&node1, &stranger, 5);

        assert_eq!(
            graph.add_edge(edge.clone()).unwrap_err(),
            GraphError::MissingEndpoint {
                edge: edge.id,
                vertex: stranger.id,
            }
        );
    }

    #[test]
    fn test_add_duplicate_edge() {
        let node1 = TestNode::new(10);
        let node2 = TestNode::new(20);
        let edge = TestEdge::new(&node1, &node2, 5);
        let graph = graph_with(&[&node1, &node2]).add_edge(edge.clone()).unwrap();

        assert_eq!(
            graph.add_edge(edge.clone()).unwrap_err(),
            GraphError::DuplicateEdge(edge.id)
        );
    }

    #[test]
    fn test_parallel_edges_and_self_loops() {
        let node1 = TestNode::new(1);
        let node2 = TestNode::new(2);
        let first = TestEdge::new(&node1, &node2, 1);
        let second = TestEdge::new(&node1, &node2, 2);
        let self_loop = TestEdge::new(&node1, &node1, 3);

        let graph = graph_with(&[&node1, &node2])
            .add_edge(first.clone())
            .and_then(|g| g.add_edge(second.clone()))
            .and_then(|g| g.add_edge(self_loop.clone()))
            .unwrap();

        assert_eq!(graph.edge_count(), 3);
        assert_eq!(
            ids(graph.out_edges(node1.id)),
            vec![first.id, second.id, self_loop.id]
        );
        assert_eq!(
            ids(graph.all_edges(node1.id)),
            vec![first.id, second.id, self_loop.id]
        );
    }

    #[test]
    fn test_remove_vertex_removes_incident_edges() {
        let node1 = TestNode::new(1);
        let node2 = TestNode::new(2);
        let node3 = TestNode::new(3);
        let e12 = TestEdge::new(&node1, &node2, 1);
        let e23 = TestEdge::new(&node2, &node3, 2);
        let e31 = TestEdge::new(&node3, &node1, 3);

        let graph = graph_with(&[&node1, &node2, &node3])
            .add_edge(e12.clone())
            .and_then(|g| g.add_edge(e23.clone()))
            .and_then(|g| g.add_edge(e31.clone()))
            .unwrap();

        let (removed, incident) = graph.remove_vertex(node2.id).unwrap();

        assert_eq!(ids(&incident), vec![e23.id, e12.id]);
        assert!(!removed.contains_vertex(node2.id));
        assert_eq!(removed.edge_count(), 1);
        assert_eq!(ids(removed.out_edges(node1.id)), Vec::<RelationshipId>::new());
        assert_eq!(ids(removed.in_edges(node1.id)), vec![e31.id]);
        // The original graph is untouched.
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.contains_vertex(node2.id));
    }

    #[test]
    fn test_remove_missing_vertex() {
        let graph = TestGraph::new();
        let id = NodeId::new();
        assert_eq!(
            graph.remove_vertex(id).unwrap_err(),
            GraphError::VertexNotFound(id)
        );
    }

    #[test]
    fn test_remove_edge() {
        let node1 = TestNode::new(1);
        let node2 = TestNode::new(2);
        let edge = TestEdge::new(&node1, &node2, 1);
        let graph = graph_with(&[&node1, &node2]).add_edge(edge.clone()).unwrap();

        let (removed, old) = graph.remove_edge(edge.id).unwrap();

        assert_eq!(old.weight, 1);
        assert_eq!(removed.edge_count(), 0);
        assert_eq!(removed.out_edges(node1.id).count(), 0);
        assert_eq!(removed.in_edges(node2.id).count(), 0);
        assert_eq!(
            removed.remove_edge(edge.id).unwrap_err(),
            GraphError::EdgeNotFound(edge.id)
        );
    }

    #[test]
    fn test_replace_edge_with_new_endpoints() {
        let node1 = TestNode::new(1);
        let node2 = TestNode::new(2);
        let node3 = TestNode::new(3);
        let edge = TestEdge::new(&node1, &node2, 1);
        let graph = graph_with(&[&node1, &node2, &node3])
            .add_edge(edge.clone())
            .unwrap();

        let rerouted = TestEdge {
            target: node3.id,
            weight: 9,
            ..edge.clone()
        };
        let graph = graph.replace_edge(rerouted).unwrap();

        assert_eq!(graph.edge(edge.id).map(|e| e.weight), Some(9));
        assert_eq!(graph.in_edges(node2.id).count(), 0);
        assert_eq!(ids(graph.in_edges(node3.id)), vec![edge.id]);
    }

    #[test]
    fn test_reachable_in_discovery_order() {
        let a = TestNode::new(1);
        let b = TestNode::new(2);
        let c = TestNode::new(3);
        let d = TestNode::new(4);
        let graph = graph_with(&[&a, &b, &c, &d])
            .add_edge(TestEdge::new(&a, &b, 1))
            .and_then(|g| g.add_edge(TestEdge::new(&a, &c, 1)))
            .and_then(|g| g.add_edge(TestEdge::new(&b, &d, 1)))
            .and_then(|g| g.add_edge(TestEdge::new(&d, &a, 1)))
            .unwrap();

        let outgoing = graph.reachable(a.id, EdgeDirection::Outgoing, |_| true);
        assert_eq!(outgoing, vec![b.id, c.id, d.id]);

        let incoming = graph.reachable(a.id, EdgeDirection::Incoming, |_| true);
        assert_eq!(incoming, vec![d.id, b.id]);
    }

    #[test]
    fn test_reachable_respects_filter() {
        let a = TestNode::new(1);
        let b = TestNode::new(2);
        let c = TestNode::new(3);
        let graph = graph_with(&[&a, &b, &c])
            .add_edge(TestEdge::new(&a, &b, 1))
            .and_then(|g| g.add_edge(TestEdge::new(&b, &c, -1)))
            .unwrap();

        let heavy = graph.reachable(a.id, EdgeDirection::Outgoing, |e| e.weight > 0);
        assert_eq!(heavy, vec![b.id]);
        assert!(graph.has_path(a.id, c.id, |_| true));
        assert!(!graph.has_path(a.id, c.id, |e| e.weight > 0));
        assert!(!graph.has_path(c.id, a.id, |_| true));
        assert!(graph.has_path(c.id, c.id, |_| true));
        assert!(!graph.has_path(a.id, NodeId::new(), |_| true));
    }
}
