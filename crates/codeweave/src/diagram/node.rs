use std::sync::Arc;

use chrono::{DateTime, Utc};

use codeweave_core::{
    geometry::{Bounds, Point, Size},
    identifier::NodeId,
};

use crate::{model::ModelNode, structure::GraphVertex};

/// A model node placed on the diagram.
///
/// The node is laid out relative to the children area of its parent (or to
/// the canvas for top-level nodes). Its outer size stacks the payload area
/// on top of the children area:
///
/// ```text
/// ┌───────────────────────┐ ◄── top_left
/// │        payload        │
/// ├───────────────────────┤
/// │     children area     │
/// └───────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramNode {
    model_node: Arc<ModelNode>,
    parent: Option<NodeId>,
    top_left: Option<Point>,
    payload_size: Size,
    children_area_size: Size,
    absolute_rect: Option<Bounds>,
    added_at: DateTime<Utc>,
}

impl DiagramNode {
    /// Creates an unplaced node showing `model_node` inside `parent`.
    pub fn new(model_node: Arc<ModelNode>, parent: Option<NodeId>, payload_size: Size) -> Self {
        Self {
            model_node,
            parent,
            top_left: None,
            payload_size,
            children_area_size: Size::default(),
            absolute_rect: None,
            added_at: Utc::now(),
        }
    }

    /// Returns the id of the shown model node.
    pub fn id(&self) -> NodeId {
        self.model_node.id()
    }

    pub fn model_node(&self) -> &Arc<ModelNode> {
        &self.model_node
    }

    /// Returns the container this node is nested in, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the top-left corner relative to the containing layout group,
    /// or `None` before the node was placed.
    pub fn top_left(&self) -> Option<Point> {
        self.top_left
    }

    pub fn payload_size(&self) -> Size {
        self.payload_size
    }

    pub fn children_area_size(&self) -> Size {
        self.children_area_size
    }

    /// Returns the outer size: payload stacked over the children area.
    pub fn size(&self) -> Size {
        self.payload_size.merge_vertical(self.children_area_size)
    }

    /// Returns the rect relative to the containing layout group.
    pub fn rect(&self) -> Option<Bounds> {
        self.top_left.map(|top_left| top_left.to_bounds(self.size()))
    }

    /// Returns the rect in canvas coordinates, once the node and all of its
    /// ancestors are placed.
    pub fn absolute_rect(&self) -> Option<Bounds> {
        self.absolute_rect
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    pub fn with_model_node(&self, model_node: Arc<ModelNode>) -> Self {
        Self {
            model_node,
            ..self.clone()
        }
    }

    pub fn with_top_left(&self, top_left: Option<Point>) -> Self {
        Self {
            top_left,
            ..self.clone()
        }
    }

    pub fn with_payload_size(&self, payload_size: Size) -> Self {
        Self {
            payload_size,
            ..self.clone()
        }
    }

    pub fn with_children_area_size(&self, children_area_size: Size) -> Self {
        Self {
            children_area_size,
            ..self.clone()
        }
    }

    pub fn with_absolute_rect(&self, absolute_rect: Option<Bounds>) -> Self {
        Self {
            absolute_rect,
            ..self.clone()
        }
    }
}

impl GraphVertex for DiagramNode {
    fn id(&self) -> NodeId {
        self.model_node.id()
    }
}
