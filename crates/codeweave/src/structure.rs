//! Graph structures shared by the model and diagram layers.

mod graph_base;
mod ordered_map;

pub use graph_base::{Graph, GraphEdge, GraphError, GraphVertex};
pub(crate) use ordered_map::OrderedMap;
