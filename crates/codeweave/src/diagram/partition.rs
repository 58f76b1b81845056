//! Reachability indices, one per transitivity partition.

use std::collections::HashMap;

use log::trace;
use petgraph::{
    algo::has_path_connecting,
    graph::{DiGraph, EdgeReference, NodeIndex},
    visit::EdgeFiltered,
};

use codeweave_core::identifier::{NodeId, RelationshipId};

use super::DiagramConnector;
use crate::features::{PartitionKey, RelationshipFeatures};

/// Connectors of one partition as a petgraph digraph.
#[derive(Debug, Default)]
struct PartitionGraph {
    graph: DiGraph<NodeId, RelationshipId>,
    indices: HashMap<NodeId, NodeIndex>,
}

impl PartitionGraph {
    fn index_of(&mut self, id: NodeId) -> NodeIndex {
        let graph = &mut self.graph;
        *self.indices.entry(id).or_insert_with(|| graph.add_node(id))
    }

    fn endpoints(&self, source: NodeId, target: NodeId) -> Option<(NodeIndex, NodeIndex)> {
        Some((*self.indices.get(&source)?, *self.indices.get(&target)?))
    }
}

/// Reachability over the diagram's connectors, grouped by partition key.
#[derive(Debug, Default)]
pub(crate) struct PartitionIndex {
    partitions: HashMap<PartitionKey, PartitionGraph>,
}

impl PartitionIndex {
    pub(crate) fn build<'a>(
        connectors: impl IntoIterator<Item = &'a DiagramConnector>,
        features: &dyn RelationshipFeatures,
    ) -> Self {
        let mut partitions: HashMap<PartitionKey, PartitionGraph> = HashMap::new();
        for connector in connectors {
            let key = features.partition_key(connector.stereotype());
            let partition = partitions.entry(key).or_default();
            let source = partition.index_of(connector.source());
            let target = partition.index_of(connector.target());
            partition.graph.add_edge(source, target, connector.id());
        }

        trace!(partitions = partitions.len(); "Built partition index");
        Self { partitions }
    }

    /// Returns true if `target` is reachable from `source` within the partition.
    ///
    /// A node always reaches itself.
    pub(crate) fn path_exists(&self, key: PartitionKey, source: NodeId, target: NodeId) -> bool {
        if source == target {
            return true;
        }
        let Some(partition) = self.partitions.get(&key) else {
            return false;
        };
        let Some((from, to)) = partition.endpoints(source, target) else {
            return false;
        };
        has_path_connecting(&partition.graph, from, to, None)
    }

    /// Returns true if the connector's endpoints stay connected within the
    /// partition once the connector itself is ignored.
    ///
    /// Self-loops are never redundant.
    pub(crate) fn is_redundant(&self, key: PartitionKey, connector: &DiagramConnector) -> bool {
        if connector.source() == connector.target() {
            return false;
        }
        let Some(partition) = self.partitions.get(&key) else {
            return false;
        };
        let Some((from, to)) = partition.endpoints(connector.source(), connector.target()) else {
            return false;
        };

        let connector_id = connector.id();
        let without_connector = EdgeFiltered::from_fn(
            &partition.graph,
            |edge: EdgeReference<'_, RelationshipId>| *edge.weight() != connector_id,
        );
        has_path_connecting(&without_connector, from, to, None)
    }
}
