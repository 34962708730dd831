//! Read-only capture of the host geometry for one operation
//!
//! The host's live geometry queries are not guaranteed to stay consistent
//! while nodes are being moved, so every read an operation needs happens
//! here, up front. Planning functions only ever see a [`Snapshot`]; the
//! mutable host is only handed to the placement step.

use std::collections::{HashMap, HashSet};

use super::bounds::ReportedBounds;
use super::error::ArrangeError;
use super::host::Host;
use super::types::{NodeId, NodeKind, Point, Rect};

/// Frozen properties of one node
#[derive(Debug, Clone)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub kind: NodeKind,
    pub locked: bool,
    pub visible: bool,
    pub position: Point,
    /// Host-reported bounds, `None` when the host reports none
    pub bounds: Option<ReportedBounds>,
    pub parent: Option<NodeId>,
    /// Flattened descendants in document order
    pub descendants: Vec<NodeId>,
    /// Source node, for references
    pub source: Option<NodeId>,
}

/// Geometry of every node an operation can touch, captured before any move
#[derive(Debug, Clone)]
pub struct Snapshot {
    nodes: HashMap<NodeId, NodeSnapshot>,
    selection: Vec<NodeId>,
    selected: HashSet<NodeId>,
    active: Option<NodeId>,
    canvas: Rect,
}

impl Snapshot {
    /// Capture the selection, the active node, their descendants and every
    /// source chain reachable from them.
    pub fn capture<H: Host + ?Sized>(host: &H) -> Result<Self, ArrangeError> {
        // Repeated ids count once, at their first position
        let mut seen = HashSet::new();
        let selection: Vec<NodeId> = host
            .selection()
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();
        let active = host.active_node();

        let mut nodes = HashMap::new();
        let mut pending: Vec<NodeId> = selection.iter().rev().cloned().collect();
        pending.extend(active.iter().cloned());

        while let Some(id) = pending.pop() {
            if nodes.contains_key(&id) {
                continue;
            }
            let node = capture_node(host, &id)?;
            pending.extend(node.descendants.iter().cloned());
            pending.extend(node.source.iter().cloned());
            nodes.insert(id, node);
        }

        let selected = selection.iter().cloned().collect();
        Ok(Self {
            nodes,
            selection,
            selected,
            active,
            canvas: host.canvas_bounds(),
        })
    }

    /// Look up a captured node
    pub fn node(&self, id: &NodeId) -> Option<&NodeSnapshot> {
        self.nodes.get(id)
    }

    /// Look up a captured node, failing for ids outside the snapshot
    pub fn get(&self, id: &NodeId) -> Result<&NodeSnapshot, ArrangeError> {
        self.nodes.get(id).ok_or_else(|| ArrangeError::unknown(id))
    }

    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    pub fn is_selected(&self, id: &NodeId) -> bool {
        self.selected.contains(id)
    }

    pub fn active(&self) -> Option<&NodeId> {
        self.active.as_ref()
    }

    pub fn canvas(&self) -> Rect {
        self.canvas
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` sits anywhere below `ancestor` in the tree
    pub fn is_descendant_of(&self, id: &NodeId, ancestor: &NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Whether any ancestor of `id` is part of the selection
    pub fn has_selected_ancestor(&self, id: &NodeId) -> bool {
        self.ancestors(id).any(|a| self.is_selected(a))
    }

    /// Walk parent links through captured nodes.
    ///
    /// Every descendant of a selected node is captured, so stopping at the
    /// first uncaptured parent never misses a selected ancestor.
    fn ancestors<'a>(&'a self, id: &NodeId) -> impl Iterator<Item = &'a NodeId> + 'a {
        let mut current = self.nodes.get(id).and_then(|n| n.parent.as_ref());
        std::iter::from_fn(move || {
            let parent = current?;
            current = self.nodes.get(parent).and_then(|n| n.parent.as_ref());
            Some(parent)
        })
    }
}

fn capture_node<H: Host + ?Sized>(host: &H, id: &NodeId) -> Result<NodeSnapshot, ArrangeError> {
    let kind = host.node_kind(id).ok_or_else(|| ArrangeError::unknown(id))?;
    let position = host.position(id).ok_or_else(|| ArrangeError::unknown(id))?;

    let source = if kind.is_reference() {
        Some(
            host.source(id)
                .ok_or_else(|| ArrangeError::MissingSource { id: id.clone() })?,
        )
    } else {
        None
    };

    Ok(NodeSnapshot {
        id: id.clone(),
        kind,
        locked: host.is_locked(id),
        visible: host.is_visible(id),
        position,
        bounds: host.bounds(id).map(ReportedBounds::new),
        parent: host.parent(id),
        descendants: host.descendants(id),
        source,
    })
}
