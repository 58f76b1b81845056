//! Geometric primitives for diagram layout and coordinate composition.
//!
//! This module provides the geometric types used to place diagram nodes in
//! their layout groups and to compose nested relative coordinates into one
//! canvas-absolute space.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate, either relative to a layout group or absolute
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//! - [`Insets`] - Padding values for four sides
//!
//! # Coordinate System
//!
//! Codeweave uses a screen-like coordinate system:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward
//!
//! A node nested inside a container is positioned relative to the top-left
//! corner of the container's children area, which sits below the container's
//! payload area and inside its padding.

/// A 2D point in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use codeweave_core::geometry::Point;
/// let origin = Point::new(10.0, 20.0);
/// let offset = Point::new(5.0, 5.0);
///
/// let moved = origin.add_point(offset);
/// assert_eq!(moved.x(), 15.0);
/// assert_eq!(moved.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Returns the bounds of the given size whose top-left corner is this point.
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_top_left(self, size)
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns a new Size with the maximum width and height between this size and another
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Returns a new Size with the given insets added to width and height
    pub fn add_padding(self, insets: Insets) -> Self {
        Self {
            width: self.width + insets.horizontal_sum(),
            height: self.height + insets.vertical_sum(),
        }
    }

    /// Returns true if both width and height are zero
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Stacks `other` below this size: heights add up, the wider width wins.
    ///
    /// This is how a container's payload area and children area combine into
    /// the container's outer size.
    ///
    /// # Examples
    ///
    /// ```
    /// # use codeweave_core::geometry::Size;
    /// let payload = Size::new(120.0, 40.0);
    /// let children = Size::new(200.0, 80.0);
    ///
    /// let outer = payload.merge_vertical(children);
    /// assert_eq!(outer.width(), 200.0);
    /// assert_eq!(outer.height(), 120.0);
    /// ```
    pub fn merge_vertical(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height + other.height,
        }
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Returns the bottom-right corner as a Point
    pub fn max_point(self) -> Point {
        Point {
            x: self.max_x,
            y: self.max_y,
        }
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Merges two bounds to create a larger bounds that contains both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use codeweave_core::geometry::{Bounds, Point, Size};
    /// let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 30.0));
    /// let b = Bounds::new_from_top_left(Point::new(10.0, 40.0), Size::new(120.0, 80.0));
    ///
    /// let combined = a.merge(&b);
    /// assert_eq!(combined.min_x(), 0.0);
    /// assert_eq!(combined.width(), 130.0);
    /// assert_eq!(combined.height(), 120.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Returns the union of all given bounds, or `None` for an empty input.
    pub fn union_all(bounds: impl IntoIterator<Item = Bounds>) -> Option<Self> {
        bounds
            .into_iter()
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    /// Moves the bounds by the specified offset.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Moves the bounds in the opposite direction of the specified offset
    pub fn inverse_translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x - offset.x,
            min_y: self.min_y - offset.y,
            max_x: self.max_x - offset.x,
            max_y: self.max_y - offset.y,
        }
    }

    /// Returns true if the point lies inside the bounds or on its border
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }
}

/// Represents spacing around an element with potentially different values
/// for each side
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// Creates new insets with specified values for each side
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates uniform insets with the same value for all sides
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Returns the top inset value
    pub fn top(self) -> f32 {
        self.top
    }

    /// Returns the right inset value
    pub fn right(self) -> f32 {
        self.right
    }

    /// Returns the bottom inset value
    pub fn bottom(self) -> f32 {
        self.bottom
    }

    /// Returns the left inset value
    pub fn left(self) -> f32 {
        self.left
    }

    /// Returns the top-left offset the insets introduce
    pub fn top_left(self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Returns the sum of left and right insets
    pub fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    /// Returns the sum of top and bottom insets
    pub fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_default_is_zero() {
        let point = Point::default();
        assert_eq!(point.x(), 0.0);
        assert_eq!(point.y(), 0.0);
        assert!(point.is_zero());
        assert!(!Point::new(1.0, 0.0).is_zero());
    }

    #[test]
    fn test_point_add_and_sub() {
        let p1 = Point::new(5.0, 8.0);
        let p2 = Point::new(2.0, 3.0);

        assert_eq!(p1.add_point(p2), Point::new(7.0, 11.0));
        assert_eq!(p1.sub_point(p2), Point::new(3.0, 5.0));
    }

    #[test]
    fn test_point_to_bounds_uses_top_left() {
        let bounds = Point::new(10.0, 20.0).to_bounds(Size::new(6.0, 8.0));

        assert_eq!(bounds.min_x(), 10.0);
        assert_eq!(bounds.min_y(), 20.0);
        assert_eq!(bounds.max_x(), 16.0);
        assert_eq!(bounds.max_y(), 28.0);
    }

    #[test]
    fn test_size_add_padding() {
        let size = Size::new(100.0, 50.0);
        let padded = size.add_padding(Insets::new(1.0, 2.0, 3.0, 4.0));

        assert_eq!(padded.width(), 106.0);
        assert_eq!(padded.height(), 54.0);
    }

    #[test]
    fn test_size_merge_vertical() {
        let payload = Size::new(50.0, 20.0);
        let area = Size::new(30.0, 70.0);

        let merged = payload.merge_vertical(area);
        assert_eq!(merged.width(), 50.0);
        assert_eq!(merged.height(), 90.0);

        let empty_area = payload.merge_vertical(Size::default());
        assert_eq!(empty_area, payload);
    }

    #[test]
    fn test_bounds_new_from_top_left() {
        let top_left = Point::new(10.0, 20.0);
        let bounds = Bounds::new_from_top_left(top_left, Size::new(30.0, 40.0));

        assert_eq!(bounds.max_x(), 40.0);
        assert_eq!(bounds.max_y(), 60.0);
        assert_eq!(bounds.width(), 30.0);
        assert_eq!(bounds.height(), 40.0);
        assert_eq!(bounds.min_point(), top_left);
        assert_eq!(bounds.max_point(), Point::new(40.0, 60.0));
        assert_eq!(bounds.to_size(), Size::new(30.0, 40.0));
    }

    #[test]
    fn test_bounds_union_all() {
        assert_eq!(Bounds::union_all(Vec::new()), None);

        let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let b = Bounds::new_from_top_left(Point::new(20.0, 5.0), Size::new(10.0, 30.0));
        let c = Bounds::new_from_top_left(Point::new(-5.0, 2.0), Size::new(1.0, 1.0));

        let union = Bounds::union_all([a, b, c]).expect("non-empty union");
        assert_eq!(union.min_x(), -5.0);
        assert_eq!(union.min_y(), 0.0);
        assert_eq!(union.max_x(), 30.0);
        assert_eq!(union.max_y(), 35.0);
    }

    #[test]
    fn test_bounds_translate() {
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 20.0), Size::new(50.0, 30.0));
        let moved = bounds.translate(Point::new(100.0, 50.0));

        assert_eq!(moved.min_x(), 110.0);
        assert_eq!(moved.min_y(), 70.0);
        assert_eq!(moved.to_size(), bounds.to_size());
        assert_eq!(moved.inverse_translate(Point::new(100.0, 50.0)), bounds);
    }

    #[test]
    fn test_bounds_contains_point() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));

        assert!(bounds.contains_point(Point::new(5.0, 5.0)));
        assert!(bounds.contains_point(Point::new(10.0, 0.0)));
        assert!(!bounds.contains_point(Point::new(10.5, 5.0)));
    }

    #[test]
    fn test_insets_accessors() {
        let insets = Insets::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(insets.top(), 1.0);
        assert_eq!(insets.right(), 2.0);
        assert_eq!(insets.bottom(), 3.0);
        assert_eq!(insets.left(), 4.0);
        assert_eq!(insets.top_left(), Point::new(4.0, 1.0));
        assert_eq!(insets.horizontal_sum(), 6.0);
        assert_eq!(insets.vertical_sum(), 4.0);

        let uniform = Insets::uniform(2.0);
        assert_eq!(uniform.top_left(), Point::new(2.0, 2.0));
    }
}
