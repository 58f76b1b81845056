//! A minimal layout step placing every group's nodes side by side.
//!
//! Positions are relative to each group, as [`GroupLayout`] expects; the
//! engine composes them into canvas coordinates. Lines run straight between
//! the centres of their endpoint boxes.

use std::collections::HashMap;

use codeweave::{
    diagram::{Diagram, LayoutGroup},
    geometry::{Bounds, Point},
    identifier::NodeId,
    layout::{BoxLayout, GroupLayout, LayoutUnifier},
};

/// Horizontal gap between neighbouring boxes.
pub const DEFAULT_SPACING: f32 = 40.0;

/// Lays out every group of `diagram` as a single row.
pub fn row_layout(diagram: &Diagram, unifier: &LayoutUnifier, spacing: f32) -> GroupLayout {
    layout_group(diagram.root(), unifier, spacing).0
}

/// Returns the group's layout and the rects of its boxes, including their
/// children areas.
fn layout_group(
    group: &LayoutGroup,
    unifier: &LayoutUnifier,
    spacing: f32,
) -> (GroupLayout, Vec<Bounds>) {
    let mut layout = GroupLayout::new();
    let mut rects = HashMap::new();
    let mut x = 0.0;

    for node in group.nodes() {
        let top_left = Point::new(x, 0.0);
        let mut box_layout = BoxLayout::new(top_left, node.payload_size());
        let mut size = node.payload_size();

        if let Some(children) = group.child_group(node.id()) {
            let (child_layout, child_rects) = layout_group(children, unifier, spacing);
            size = size.merge_vertical(unifier.children_area_size(child_rects));
            box_layout = box_layout.with_children(child_layout);
        }

        let rect = top_left.to_bounds(size);
        x = rect.max_x() + spacing;
        rects.insert(node.id(), rect);
        layout.insert_box(node.id(), box_layout);
    }

    for connector in group.connectors() {
        let (Some(source), Some(target)) = (rects.get(&connector.source()), rects.get(&connector.target()))
        else {
            continue;
        };
        layout.insert_line(connector.id(), vec![centre(source), centre(target)]);
    }

    let ordered = group
        .nodes()
        .filter_map(|node| rects.get(&node.id()).copied())
        .collect();
    (layout, ordered)
}

fn centre(rect: &Bounds) -> Point {
    Point::new(
        rect.min_x() + rect.width() / 2.0,
        rect.min_y() + rect.height() / 2.0,
    )
}

/// Returns the ids of nodes in the layout, containers before their children.
pub fn placed_nodes(layout: &GroupLayout) -> Vec<NodeId> {
    let mut ids = Vec::new();
    collect(layout, &mut ids);
    ids
}

fn collect(layout: &GroupLayout, out: &mut Vec<NodeId>) {
    for (id, box_layout) in layout.boxes() {
        out.push(id);
        if let Some(children) = box_layout.children() {
            collect(children, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use codeweave::{
        config::AppConfig,
        diagram::DiagramNode,
        features::DefaultRelationshipFeatures,
        geometry::{Insets, Size},
        identifier::{EntityRef, Name},
        model::{Model, ModelNode},
        stereotype::{NodeStereotype, Origin},
    };

    use super::*;

    fn class(name: &str) -> ModelNode {
        ModelNode::new(
            Name::new(name),
            NodeStereotype::Class,
            Origin::Source,
            EntityRef::from(name),
        )
    }

    #[test]
    fn test_nested_group_widens_its_container() {
        let size = AppConfig::default().layout().default_payload_size();
        let (outer, a, b) = (class("Outer"), class("A"), class("B"));
        let (outer_id, a_id, b_id) = (outer.id(), a.id(), b.id());

        let mut model = Model::new();
        for node in [outer, a, b] {
            model = model.add_node(node).model;
        }
        let mut diagram = Diagram::new(model.clone(), Arc::new(DefaultRelationshipFeatures));
        for (id, parent) in [(outer_id, None), (a_id, Some(outer_id)), (b_id, Some(outer_id))] {
            let node = Arc::clone(model.try_get_node(id).unwrap());
            diagram = diagram
                .add_node(DiagramNode::new(node, parent, size))
                .unwrap()
                .diagram;
        }

        let unifier = LayoutUnifier::new(Insets::uniform(10.0));
        let layout = row_layout(&diagram, &unifier, DEFAULT_SPACING);

        assert_eq!(placed_nodes(&layout), vec![outer_id, a_id, b_id]);
        let children = layout.box_layout(outer_id).unwrap().children().unwrap();
        let second = children.box_layout(b_id).unwrap();
        assert_eq!(second.top_left(), Point::new(size.width() + DEFAULT_SPACING, 0.0));

        let unified = unifier.unify(&layout);
        let expected_width = 2.0 * size.width() + DEFAULT_SPACING + 20.0;
        assert_eq!(unified.rects[&outer_id].to_size(), Size::new(expected_width, 2.0 * size.height() + 20.0));
    }
}
