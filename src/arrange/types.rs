//! Core types for the arrange engine

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable unique identifier of a node in the host document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Kind of a node in the layer tree
///
/// Fill and filter nodes have no intrinsic geometry. Overlay nodes (masks)
/// only ever move together with the node that owns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    #[default]
    Regular,
    Group,
    /// Clone layer whose position is an offset from its source's position
    Reference,
    Fill,
    Filter,
    OverlayTransparency,
    OverlayFilter,
    OverlayColorize,
    OverlayTransform,
    OverlaySelection,
}

impl NodeKind {
    /// Node kinds without intrinsic geometry
    pub fn is_boundless(self) -> bool {
        match self {
            NodeKind::Fill | NodeKind::Filter => true,
            NodeKind::Regular
            | NodeKind::Group
            | NodeKind::Reference
            | NodeKind::OverlayTransparency
            | NodeKind::OverlayFilter
            | NodeKind::OverlayColorize
            | NodeKind::OverlayTransform
            | NodeKind::OverlaySelection => false,
        }
    }

    /// Masks attached to another node
    pub fn is_overlay(self) -> bool {
        match self {
            NodeKind::OverlayTransparency
            | NodeKind::OverlayFilter
            | NodeKind::OverlayColorize
            | NodeKind::OverlayTransform
            | NodeKind::OverlaySelection => true,
            NodeKind::Regular
            | NodeKind::Group
            | NodeKind::Reference
            | NodeKind::Fill
            | NodeKind::Filter => false,
        }
    }

    pub fn is_reference(self) -> bool {
        matches!(self, NodeKind::Reference)
    }

    pub fn is_group(self) -> bool {
        matches!(self, NodeKind::Group)
    }

    /// Whether nodes of this kind take part in bounds computations
    pub fn has_geometry(self) -> bool {
        !self.is_boundless() && !self.is_overlay()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Regular => "regular",
            NodeKind::Group => "group",
            NodeKind::Reference => "reference",
            NodeKind::Fill => "fill",
            NodeKind::Filter => "filter",
            NodeKind::OverlayTransparency => "overlay-transparency",
            NodeKind::OverlayFilter => "overlay-filter",
            NodeKind::OverlayColorize => "overlay-colorize",
            NodeKind::OverlayTransform => "overlay-transform",
            NodeKind::OverlaySelection => "overlay-selection",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point (or translation) in canvas space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::new(0, 0)
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Coordinate on the given axis
    pub fn on(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Replace the coordinate on the given axis
    pub fn with(self, axis: Axis, value: i32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(value, self.y),
            Axis::Vertical => Self::new(self.x, value),
        }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned rectangle in canvas space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized rectangle at the origin
    pub fn zero() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Top-left corner
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Leading edge (left or top) on the given axis
    pub fn leading(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Trailing edge (right or bottom) on the given axis
    pub fn trailing(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.right(),
            Axis::Vertical => self.bottom(),
        }
    }

    /// Width or height, depending on the axis
    pub fn size(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Same rectangle shifted by an offset
    pub fn translate(&self, offset: Point) -> Rect {
        Rect::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) {}x{}",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Direction along which nodes are distributed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The perpendicular axis
    pub fn cross(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Round to the nearest integer, ties to even.
///
/// Every spacing and centering division in the engine goes through here so
/// that results stay consistent between alignment and distribution.
pub fn round_even(value: f64) -> i32 {
    value.round_ties_even() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        assert!(NodeKind::Fill.is_boundless());
        assert!(NodeKind::Filter.is_boundless());
        assert!(!NodeKind::Reference.is_boundless());
        assert!(NodeKind::OverlaySelection.is_overlay());
        assert!(!NodeKind::Group.is_overlay());
        assert!(NodeKind::Regular.has_geometry());
        assert!(!NodeKind::OverlayTransform.has_geometry());
        assert!(!NodeKind::Fill.has_geometry());
    }

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10, 20, 100, 50);
        assert_eq!(r.right(), 110);
        assert_eq!(r.bottom(), 70);
        assert_eq!(r.leading(Axis::Vertical), 20);
        assert_eq!(r.trailing(Axis::Horizontal), 110);
        assert_eq!(r.size(Axis::Vertical), 50);
    }

    #[test]
    fn test_rect_union() {
        let a = Rect::new(0, 0, 50, 50);
        let b = Rect::new(100, -20, 50, 50);
        assert_eq!(a.union(&b), Rect::new(0, -20, 150, 70));
    }

    #[test]
    fn test_point_axis_access() {
        let p = Point::new(3, 7);
        assert_eq!(p.on(Axis::Horizontal), 3);
        assert_eq!(p.with(Axis::Vertical, 9), Point::new(3, 9));
        assert_eq!(p - Point::new(1, 1), Point::new(2, 6));
    }

    #[test]
    fn test_round_even_ties() {
        assert_eq!(round_even(2.5), 2);
        assert_eq!(round_even(3.5), 4);
        assert_eq!(round_even(-2.5), -2);
        assert_eq!(round_even(2.4), 2);
        assert_eq!(round_even(2.6), 3);
    }

    #[test]
    fn test_kind_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            kind: NodeKind,
        }
        let w: Wrapper = toml::from_str(r#"kind = "overlay-transparency""#).unwrap();
        assert_eq!(w.kind, NodeKind::OverlayTransparency);
        assert_eq!(NodeKind::OverlayColorize.as_str(), "overlay-colorize");
    }
}
