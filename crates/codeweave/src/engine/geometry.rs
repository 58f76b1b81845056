//! Derived geometry: children-area sizes and absolute rects.
//!
//! A node's children area encloses its placed children; its absolute rect
//! composes its relative top-left with the absolute origin of the containing
//! children area. Changing one node can only affect its ancestors' areas
//! (bottom-up) and its own subtree's absolute rects (top-down).

use log::trace;

use codeweave_core::{
    geometry::{Point, Size},
    identifier::NodeId,
};

use crate::{
    diagram::{Diagram, DiagramEvent, DiagramNode},
    error::CodeweaveError,
    layout::LayoutUnifier,
};

/// Writes `new` in place of `old` and reports each changed derived value.
pub(super) fn replace_node(
    diagram: &mut Diagram,
    old: &DiagramNode,
    new: DiagramNode,
    events: &mut Vec<DiagramEvent>,
) -> Result<(), CodeweaveError> {
    let id = new.id();
    if old.rect() != new.rect() {
        events.push(DiagramEvent::NodeRectChanged {
            id,
            old: old.rect(),
            new: new.rect(),
        });
    }
    if old.children_area_size() != new.children_area_size() {
        events.push(DiagramEvent::NodeChildrenAreaChanged {
            id,
            old: old.children_area_size(),
            new: new.children_area_size(),
        });
    }
    if old.absolute_rect() != new.absolute_rect() {
        events.push(DiagramEvent::NodeAbsoluteRectChanged {
            id,
            old: old.absolute_rect(),
            new: new.absolute_rect(),
        });
    }
    if old != &new {
        *diagram = diagram.replace_node(new)?;
    }
    Ok(())
}

/// Recomputes derived geometry after `changed` (placed inside `parent`)
/// moved, resized, appeared or vanished.
///
/// Walks up while the parent's children area keeps changing, then refreshes
/// absolute rects below the topmost node that changed.
pub(super) fn propagate(
    diagram: &mut Diagram,
    unifier: &LayoutUnifier,
    changed: Option<NodeId>,
    parent: Option<NodeId>,
    events: &mut Vec<DiagramEvent>,
) -> Result<(), CodeweaveError> {
    let mut topmost = changed;
    let mut current = parent;
    while let Some(container_id) = current {
        let Some(container) = diagram.try_get_node(container_id).cloned() else {
            break;
        };
        let area = children_area(diagram, unifier, container_id);
        if area == container.children_area_size() {
            break;
        }

        trace!(node_id:? = container_id, width = area.width(), height = area.height(); "Children area changed");
        replace_node(
            diagram,
            &container,
            container.with_children_area_size(area),
            events,
        )?;
        topmost = Some(container_id);
        current = container.parent();
    }

    match topmost {
        Some(id) => refresh_absolute(diagram, unifier, id, events),
        None => Ok(()),
    }
}

/// Recomputes every children area (innermost first), then every absolute rect.
pub(super) fn refresh_all(
    diagram: &mut Diagram,
    unifier: &LayoutUnifier,
    events: &mut Vec<DiagramEvent>,
) -> Result<(), CodeweaveError> {
    for node in diagram.nodes().into_iter().rev() {
        let area = children_area(diagram, unifier, node.id());
        if area != node.children_area_size() {
            replace_node(diagram, &node, node.with_children_area_size(area), events)?;
        }
    }

    for node in diagram.get_child_nodes(None) {
        refresh_subtree(diagram, unifier, node.id(), Some(Point::default()), events)?;
    }
    Ok(())
}

fn children_area(diagram: &Diagram, unifier: &LayoutUnifier, id: NodeId) -> Size {
    unifier.children_area_size(
        diagram
            .get_child_nodes(Some(id))
            .iter()
            .filter_map(|child| child.rect()),
    )
}

/// Refreshes the absolute rects of `id` and its subtree.
fn refresh_absolute(
    diagram: &mut Diagram,
    unifier: &LayoutUnifier,
    id: NodeId,
    events: &mut Vec<DiagramEvent>,
) -> Result<(), CodeweaveError> {
    let Some(node) = diagram.try_get_node(id) else {
        return Ok(());
    };
    let origin = match node.parent() {
        None => Some(Point::default()),
        Some(parent_id) => diagram.try_get_node(parent_id).and_then(|parent| {
            parent
                .absolute_rect()
                .map(|rect| unifier.child_origin(rect.min_point(), parent.payload_size()))
        }),
    };
    refresh_subtree(diagram, unifier, id, origin, events)
}

/// Places `id` at `origin` (the absolute origin of its containing area) and
/// recurses into its children. An unplaced node hides its whole subtree.
fn refresh_subtree(
    diagram: &mut Diagram,
    unifier: &LayoutUnifier,
    id: NodeId,
    origin: Option<Point>,
    events: &mut Vec<DiagramEvent>,
) -> Result<(), CodeweaveError> {
    let Some(node) = diagram.try_get_node(id).cloned() else {
        return Ok(());
    };
    let absolute_rect = origin
        .zip(node.top_left())
        .map(|(origin, top_left)| origin.add_point(top_left).to_bounds(node.size()));
    replace_node(diagram, &node, node.with_absolute_rect(absolute_rect), events)?;

    let child_origin =
        absolute_rect.map(|rect| unifier.child_origin(rect.min_point(), node.payload_size()));
    for child in diagram.get_child_nodes(Some(id)) {
        refresh_subtree(diagram, unifier, child.id(), child_origin, events)?;
    }
    Ok(())
}
