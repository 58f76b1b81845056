use indexmap::IndexMap;
use log::trace;

use codeweave_core::{
    geometry::{Bounds, Insets, Point, Size},
    identifier::{NodeId, RelationshipId},
};

use super::GroupLayout;
use crate::config::LayoutConfig;

/// Absolute rects and routes produced by [`LayoutUnifier::unify`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnifiedLayout {
    pub rects: IndexMap<NodeId, Bounds>,
    pub routes: IndexMap<RelationshipId, Vec<Point>>,
}

/// Composes nested relative layouts into canvas coordinates.
///
/// A container's children area starts right below its payload, inset by the
/// padding:
///
/// ```text
/// child_origin = container_top_left + (0, payload.height) + (padding.left, padding.top)
/// ```
///
/// The children area spans from that origin to the farthest child corner,
/// plus padding on every side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutUnifier {
    padding: Insets,
}

impl LayoutUnifier {
    pub fn new(padding: Insets) -> Self {
        Self { padding }
    }

    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new(config.child_area_insets())
    }

    pub fn padding(&self) -> Insets {
        self.padding
    }

    /// Returns the canvas origin of a container's children area.
    pub fn child_origin(&self, absolute_top_left: Point, payload_size: Size) -> Point {
        absolute_top_left
            .add_point(Point::new(0.0, payload_size.height()))
            .add_point(self.padding.top_left())
    }

    /// Returns the children-area size enclosing the given child rects, which
    /// are relative to the children area. Zero when there are no children.
    pub fn children_area_size(&self, child_rects: impl IntoIterator<Item = Bounds>) -> Size {
        let Some(extent) = child_rects
            .into_iter()
            .map(|rect| Size::new(rect.max_x().max(0.0), rect.max_y().max(0.0)))
            .reduce(Size::max)
        else {
            return Size::default();
        };
        extent.add_padding(self.padding)
    }

    /// Resolves every box and line of `layout` to canvas coordinates.
    pub fn unify(&self, layout: &GroupLayout) -> UnifiedLayout {
        let mut unified = UnifiedLayout::default();
        self.unify_group(layout, Point::default(), &mut unified);
        trace!(
            rects = unified.rects.len(),
            routes = unified.routes.len();
            "Unified layout"
        );
        unified
    }

    /// Places one group at `origin` and returns its boxes' rects relative to
    /// the group.
    fn unify_group(&self, group: &GroupLayout, origin: Point, out: &mut UnifiedLayout) -> Vec<Bounds> {
        let mut relative_rects = Vec::new();
        for (id, layout) in group.boxes() {
            let absolute_top_left = origin.add_point(layout.top_left());
            // Reserve the slot so containers precede their children.
            out.rects.insert(id, Bounds::default());

            let child_rects = layout
                .children()
                .map(|children| {
                    let child_origin = self.child_origin(absolute_top_left, layout.payload_size());
                    self.unify_group(children, child_origin, out)
                })
                .unwrap_or_default();
            let size = layout
                .payload_size()
                .merge_vertical(self.children_area_size(child_rects));

            out.rects.insert(id, absolute_top_left.to_bounds(size));
            relative_rects.push(layout.top_left().to_bounds(size));
        }

        for (id, points) in group.lines() {
            let route = points.iter().map(|point| point.add_point(origin)).collect();
            out.routes.insert(id, route);
        }
        relative_rects
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;
    use crate::layout::BoxLayout;

    #[test]
    fn test_child_is_offset_by_payload_and_padding() {
        let root = NodeId::new();
        let child = NodeId::new();

        let mut children = GroupLayout::new();
        children.insert_box(child, BoxLayout::new(Point::new(5.0, 5.0), Size::new(20.0, 10.0)));
        let mut layout = GroupLayout::new();
        layout.insert_box(
            root,
            BoxLayout::new(Point::new(10.0, 10.0), Size::new(100.0, 30.0)).with_children(children),
        );

        let unified = LayoutUnifier::new(Insets::uniform(2.0)).unify(&layout);

        let child_rect = unified.rects[&child];
        assert!(approx_eq!(f32, child_rect.min_x(), 17.0));
        assert!(approx_eq!(f32, child_rect.min_y(), 47.0));

        // Children area: (5 + 20, 5 + 10) plus 2 on every side.
        let root_rect = unified.rects[&root];
        assert!(approx_eq!(f32, root_rect.width(), 100.0));
        assert!(approx_eq!(f32, root_rect.height(), 30.0 + 19.0));
        assert_eq!(
            unified.rects.keys().copied().collect::<Vec<_>>(),
            vec![root, child]
        );
    }

    #[test]
    fn test_wide_children_widen_the_container() {
        let root = NodeId::new();
        let child = NodeId::new();

        let mut children = GroupLayout::new();
        children.insert_box(child, BoxLayout::new(Point::new(50.0, 0.0), Size::new(100.0, 10.0)));
        let mut layout = GroupLayout::new();
        layout.insert_box(
            root,
            BoxLayout::new(Point::default(), Size::new(40.0, 10.0)).with_children(children),
        );

        let unified = LayoutUnifier::new(Insets::uniform(5.0)).unify(&layout);
        assert!(approx_eq!(f32, unified.rects[&root].width(), 160.0));
    }

    #[test]
    fn test_routes_are_translated_to_the_group_origin() {
        let root = NodeId::new();
        let line = RelationshipId::new();

        let mut children = GroupLayout::new();
        children.insert_line(line, vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
        let mut layout = GroupLayout::new();
        layout.insert_box(
            root,
            BoxLayout::new(Point::new(10.0, 10.0), Size::new(50.0, 20.0)).with_children(children),
        );

        let unified = LayoutUnifier::new(Insets::uniform(1.0)).unify(&layout);
        assert_eq!(
            unified.routes[&line],
            vec![Point::new(11.0, 31.0), Point::new(21.0, 31.0)]
        );
    }

    #[test]
    fn test_empty_children_area() {
        let unifier = LayoutUnifier::new(Insets::uniform(10.0));
        assert_eq!(unifier.children_area_size(Vec::new()), Size::default());
        assert_eq!(
            unifier.children_area_size(vec![Point::new(-5.0, -5.0).to_bounds(Size::new(2.0, 2.0))]),
            Size::new(20.0, 20.0)
        );
    }
}
