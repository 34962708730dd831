//! Selection filtering and axis ordering

use tracing::trace;

use super::bounds;
use super::error::ArrangeError;
use super::snapshot::{NodeSnapshot, Snapshot};
use super::types::{Axis, NodeId, NodeKind, Rect};

/// Whether a selected node may be placed on its own.
///
/// Overlays, boundless kinds, locked and hidden nodes stay put, and so does
/// anything below another selected node: the ancestor's cascade moves it.
pub fn is_movable(snapshot: &Snapshot, node: &NodeSnapshot) -> bool {
    !node.kind.is_overlay()
        && !node.kind.is_boundless()
        && !node.locked
        && node.visible
        && !snapshot.has_selected_ancestor(&node.id)
}

/// A selected node's geometry along one axis
#[derive(Debug, Clone, PartialEq)]
pub struct AxisEntry {
    pub id: NodeId,
    /// Index of the node in the selection
    pub index: usize,
    pub kind: NodeKind,
    /// Width or height of the corrected bounds
    pub size: i32,
    /// Node position on the axis
    pub position: i32,
    /// Node position on the other axis, which distribution leaves alone
    pub alt_position: i32,
    /// Leading edge of the corrected bounds on the axis (the sort key)
    pub leading: i32,
    pub bounds: Rect,
}

impl AxisEntry {
    pub fn trailing(&self) -> i32 {
        self.leading + self.size
    }

    /// Distance from the node position to its leading bounds edge
    pub fn offset(&self) -> i32 {
        self.leading - self.position
    }
}

/// Movable selected nodes with geometry, ordered by their leading edge.
///
/// Nodes sharing a leading edge keep their selection order.
pub fn sort(snapshot: &Snapshot, axis: Axis) -> Result<Vec<AxisEntry>, ArrangeError> {
    let mut entries = Vec::new();

    for (index, id) in snapshot.selection().iter().enumerate() {
        let node = snapshot.get(id)?;
        if !is_movable(snapshot, node) {
            continue;
        }
        let Some(b) = bounds::try_geometry(snapshot, id)? else {
            continue;
        };

        entries.push(AxisEntry {
            id: id.clone(),
            index,
            kind: node.kind,
            size: b.size(axis),
            position: node.position.on(axis),
            alt_position: node.position.on(axis.cross()),
            leading: b.leading(axis),
            bounds: b,
        });
    }

    entries.sort_by_key(|e| e.leading);
    trace!(?axis, count = entries.len(), "sorted selection");
    Ok(entries)
}
