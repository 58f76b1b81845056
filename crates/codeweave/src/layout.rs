//! Relative layouts and their composition into canvas coordinates.
//!
//! Positions are computed by an external auto-layout step, one
//! [`GroupLayout`] per layout group. Every box is positioned relative to the
//! children area of its container (or to the canvas for the top-level
//! group). The [`LayoutUnifier`] composes these nested relative layouts into
//! absolute rects and routes.

mod unifier;

pub use unifier::{LayoutUnifier, UnifiedLayout};

use indexmap::IndexMap;

use codeweave_core::{
    geometry::{Point, Size},
    identifier::{NodeId, RelationshipId},
};

/// Relative positions of the boxes and lines of one layout group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupLayout {
    boxes: IndexMap<NodeId, BoxLayout>,
    lines: IndexMap<RelationshipId, Vec<Point>>,
}

impl GroupLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a box; a later placement of the same node wins.
    pub fn insert_box(&mut self, id: NodeId, layout: BoxLayout) {
        self.boxes.insert(id, layout);
    }

    /// Sets the route of a line, relative to this group's origin.
    pub fn insert_line(&mut self, id: RelationshipId, points: Vec<Point>) {
        self.lines.insert(id, points);
    }

    pub fn boxes(&self) -> impl Iterator<Item = (NodeId, &BoxLayout)> {
        self.boxes.iter().map(|(id, layout)| (*id, layout))
    }

    pub fn lines(&self) -> impl Iterator<Item = (RelationshipId, &[Point])> {
        self.lines.iter().map(|(id, points)| (*id, points.as_slice()))
    }

    pub fn box_layout(&self, id: NodeId) -> Option<&BoxLayout> {
        self.boxes.get(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty() && self.lines.is_empty()
    }
}

/// One placed box and, for containers, the layout of its children.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxLayout {
    top_left: Point,
    payload_size: Size,
    children: Option<GroupLayout>,
}

impl BoxLayout {
    pub fn new(top_left: Point, payload_size: Size) -> Self {
        Self {
            top_left,
            payload_size,
            children: None,
        }
    }

    pub fn with_children(self, children: GroupLayout) -> Self {
        Self {
            children: Some(children),
            ..self
        }
    }

    /// Returns the top-left corner relative to the containing group.
    pub fn top_left(&self) -> Point {
        self.top_left
    }

    pub fn payload_size(&self) -> Size {
        self.payload_size
    }

    pub fn children(&self) -> Option<&GroupLayout> {
        self.children.as_ref()
    }
}
