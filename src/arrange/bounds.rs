//! Bounds correction for reference nodes and bounds aggregation for subtrees
//!
//! Hosts report the bounds of a reference node as if the node still covered
//! its source as well: the reported rectangle is too large by the absolute
//! value of the node's offset, and its origin is only right when the offset
//! is negative. [`correct`] turns such a report into the rectangle the node
//! actually covers. [`aggregate`] folds corrected member bounds into the
//! rectangle enclosing a whole subtree.

use tracing::warn;

use super::error::ArrangeError;
use super::snapshot::Snapshot;
use super::types::{NodeId, NodeKind, Point, Rect};

/// Bounds exactly as the host reported them, before any correction
///
/// Only [`correct`] turns these into a usable [`Rect`], and it consumes the
/// value, so a rectangle can never be corrected twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportedBounds(Rect);

impl ReportedBounds {
    /// Wrap a rectangle freshly read from the host
    pub fn new(rect: Rect) -> Self {
        Self(rect)
    }
}

/// Correct host-reported bounds into canvas-space bounds.
///
/// Non-reference kinds pass through unchanged. For references the size is
/// shrunk by `|position|` on each axis and the origin is shifted by the
/// position on axes where it is positive.
///
/// ```
/// use layer_arrange::arrange::bounds::{correct, ReportedBounds};
/// use layer_arrange::{NodeKind, Point, Rect};
///
/// let reported = ReportedBounds::new(Rect::new(0, 0, 50, 20));
/// let fixed = correct(NodeKind::Reference, reported, Point::new(30, 0));
/// assert_eq!(fixed, Rect::new(30, 0, 20, 20));
/// ```
///
/// The result is a plain [`Rect`], which cannot be corrected again:
///
/// ```compile_fail
/// use layer_arrange::arrange::bounds::{correct, ReportedBounds};
/// use layer_arrange::{NodeKind, Point, Rect};
///
/// let p = Point::new(30, 0);
/// let once = correct(NodeKind::Reference, ReportedBounds::new(Rect::new(0, 0, 50, 20)), p);
/// let twice = correct(NodeKind::Reference, once, p);
/// ```
pub fn correct(kind: NodeKind, bounds: ReportedBounds, position: Point) -> Rect {
    let b = bounds.0;
    if !kind.is_reference() {
        return b;
    }

    let x = if position.x > 0 { position.x + b.x } else { b.x };
    let y = if position.y > 0 { position.y + b.y } else { b.y };

    Rect::new(
        x,
        y,
        b.width - position.x.abs(),
        b.height - position.y.abs(),
    )
}

/// Running min/max over member rectangles
#[derive(Debug, Clone, Copy)]
struct Extent {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl Extent {
    fn of(rect: Rect) -> Self {
        Self {
            min_x: rect.x,
            min_y: rect.y,
            max_x: rect.right(),
            max_y: rect.bottom(),
        }
    }

    fn include(self, rect: Rect) -> Self {
        Self {
            min_x: self.min_x.min(rect.x),
            min_y: self.min_y.min(rect.y),
            max_x: self.max_x.max(rect.right()),
            max_y: self.max_y.max(rect.bottom()),
        }
    }

    fn rect(self) -> Rect {
        Rect::new(
            self.min_x,
            self.min_y,
            self.max_x - self.min_x,
            self.max_y - self.min_y,
        )
    }
}

/// Union of the corrected bounds of a flattened list of members.
///
/// Overlays and boundless kinds are skipped, and so are nested group nodes,
/// whose own members are expected in the list. Returns `None` when nothing
/// contributes.
pub fn aggregate<'a, I>(snapshot: &Snapshot, members: I) -> Option<Rect>
where
    I: IntoIterator<Item = &'a NodeId>,
{
    let mut extent: Option<Extent> = None;

    for id in members {
        let Some(node) = snapshot.node(id) else {
            continue;
        };
        if !node.kind.has_geometry() || node.kind.is_group() {
            continue;
        }
        let Some(reported) = node.bounds else {
            continue;
        };

        let b = correct(node.kind, reported, node.position);
        extent = Some(match extent {
            Some(e) => e.include(b),
            None => Extent::of(b),
        });
    }

    extent.map(Extent::rect)
}

/// Enclosing rectangle of every descendant of a node
pub fn group_bounds(snapshot: &Snapshot, id: &NodeId) -> Result<Rect, ArrangeError> {
    let node = snapshot.get(id)?;
    aggregate(snapshot, &node.descendants).ok_or_else(|| ArrangeError::empty_group(id))
}

/// Corrected geometry of a single node.
///
/// `Ok(None)` for kinds without intrinsic geometry; groups go through
/// [`group_bounds`] and fail with [`ArrangeError::EmptyGroup`] when empty.
pub fn geometry(snapshot: &Snapshot, id: &NodeId) -> Result<Option<Rect>, ArrangeError> {
    let node = snapshot.get(id)?;
    match node.kind {
        NodeKind::Group => group_bounds(snapshot, id).map(Some),
        NodeKind::Regular | NodeKind::Reference => Ok(node
            .bounds
            .map(|reported| correct(node.kind, reported, node.position))),
        NodeKind::Fill
        | NodeKind::Filter
        | NodeKind::OverlayTransparency
        | NodeKind::OverlayFilter
        | NodeKind::OverlayColorize
        | NodeKind::OverlayTransform
        | NodeKind::OverlaySelection => Ok(None),
    }
}

/// Like [`geometry`], but an empty group simply has no geometry.
pub fn try_geometry(snapshot: &Snapshot, id: &NodeId) -> Result<Option<Rect>, ArrangeError> {
    match geometry(snapshot, id) {
        Err(ArrangeError::EmptyGroup { id }) => {
            warn!(node = %id, "group has no members with geometry, leaving it in place");
            Ok(None)
        }
        other => other,
    }
}

/// Union of the geometry of a list of top-level nodes (e.g. a selection)
pub fn selection_bounds(snapshot: &Snapshot, ids: &[NodeId]) -> Result<Option<Rect>, ArrangeError> {
    let mut extent: Option<Extent> = None;
    for id in ids {
        if let Some(b) = try_geometry(snapshot, id)? {
            extent = Some(match extent {
                Some(e) => e.include(b),
                None => Extent::of(b),
            });
        }
    }
    Ok(extent.map(Extent::rect))
}
