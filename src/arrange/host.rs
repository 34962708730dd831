//! Interface to the document that owns the layer tree

use super::error::HostError;
use super::types::{NodeId, NodeKind, Point, Rect};

/// The host document/session the engine reads from and writes to.
///
/// Queries are only issued while capturing a [`Snapshot`](super::Snapshot);
/// after that the engine only calls [`set_position`](Host::set_position)
/// and the redraw barrier. Calls are never interleaved with another
/// operation: callers must serialize invocations.
pub trait Host {
    /// Kind of the node, `None` if the id is unknown
    fn node_kind(&self, id: &NodeId) -> Option<NodeKind>;

    fn is_locked(&self, id: &NodeId) -> bool;

    fn is_visible(&self, id: &NodeId) -> bool;

    /// Offset of the node in canvas space (relative to the source for references)
    fn position(&self, id: &NodeId) -> Option<Point>;

    /// Bounds as reported by the host. For reference nodes these are known to
    /// be wrong and must go through [`correct`](super::bounds::correct).
    fn bounds(&self, id: &NodeId) -> Option<Rect>;

    fn parent(&self, id: &NodeId) -> Option<NodeId>;

    /// All descendants of the node, flattened in document order
    fn descendants(&self, id: &NodeId) -> Vec<NodeId>;

    /// Source of a reference node
    fn source(&self, id: &NodeId) -> Option<NodeId>;

    fn set_position(&mut self, id: &NodeId, position: Point) -> Result<(), HostError>;

    fn canvas_bounds(&self) -> Rect;

    fn active_node(&self) -> Option<NodeId>;

    /// Current selection, in the order the host reports it
    fn selection(&self) -> Vec<NodeId>;

    fn request_redraw(&mut self);

    /// Block until the redraw requested last has settled
    fn wait_until_settled(&mut self);
}
