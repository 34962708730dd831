//! In-memory layer tree implementing [`Host`]

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::trace;

use super::file::{CanvasEntry, NodeEntry, SceneFile};
use crate::arrange::{Host, HostError, NodeId, NodeKind, Point, Rect};
use crate::error::SceneError;

/// One layer of a [`Document`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneNode {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Offset applied to `extent`, or to the source's geometry for references
    pub position: Point,
    /// Pixel extent before `position` is applied
    pub extent: Option<Rect>,
    pub parent: Option<NodeId>,
    pub source: Option<NodeId>,
    pub locked: bool,
    pub visible: bool,
}

impl SceneNode {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: NodeId::new(id),
            kind,
            position: Point::zero(),
            extent: None,
            parent: None,
            source: None,
            locked: false,
            visible: true,
        }
    }

    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn with_extent(mut self, extent: Rect) -> Self {
        self.extent = Some(extent);
        self
    }

    pub fn in_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(NodeId::new(parent));
        self
    }

    pub fn cloning(mut self, source: impl Into<String>) -> Self {
        self.source = Some(NodeId::new(source));
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// A layered document held in memory.
///
/// Geometry is derived on demand: regular layers and overlays cover their
/// extent offset by their position, groups cover their members, references
/// cover their source offset by their position, and fill and filter layers
/// cover the canvas. Reported bounds of a reference node stretch over both
/// its source and itself, the way paint hosts report them.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<SceneNode>,
    index: HashMap<NodeId, usize>,
    children: HashMap<NodeId, Vec<NodeId>>,
    canvas: Rect,
    selection: Vec<NodeId>,
    active: Option<NodeId>,
    redraws: usize,
    settles: usize,
}

impl Document {
    /// An empty document with a canvas of the given size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            children: HashMap::new(),
            canvas: Rect::new(0, 0, width, height),
            selection: Vec::new(),
            active: None,
            redraws: 0,
            settles: 0,
        }
    }

    /// Load a scene from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load a scene from a TOML string
    ///
    /// Parents and sources may be declared after the nodes that use them.
    pub fn from_toml_str(content: &str) -> Result<Self, SceneError> {
        let file: SceneFile = toml::from_str(content)?;
        let mut doc = Document::new(file.canvas.width, file.canvas.height);

        for entry in file.nodes {
            doc.push(SceneNode {
                id: entry.id,
                kind: entry.kind,
                position: entry.position,
                extent: entry.extent,
                parent: entry.parent,
                source: entry.source,
                locked: entry.locked,
                visible: entry.visible,
            })?;
        }
        for node in &doc.nodes {
            doc.check_links(node)?;
        }
        doc.check_parent_cycles()?;
        doc.select(file.selection)?;
        doc.set_active(file.active)?;
        Ok(doc)
    }

    /// Serialize the scene back to TOML
    pub fn to_toml_string(&self) -> Result<String, SceneError> {
        let file = SceneFile {
            selection: self.selection.clone(),
            active: self.active.clone(),
            canvas: CanvasEntry {
                width: self.canvas.width,
                height: self.canvas.height,
            },
            nodes: self
                .nodes
                .iter()
                .map(|n| NodeEntry {
                    id: n.id.clone(),
                    kind: n.kind,
                    parent: n.parent.clone(),
                    source: n.source.clone(),
                    locked: n.locked,
                    visible: n.visible,
                    position: n.position,
                    extent: n.extent,
                })
                .collect(),
        };
        Ok(toml::to_string(&file)?)
    }

    /// Add a node; its parent and source must already exist
    pub fn insert(&mut self, node: SceneNode) -> Result<(), SceneError> {
        self.check_links(&node)?;
        self.push(node)
    }

    fn push(&mut self, node: SceneNode) -> Result<(), SceneError> {
        if self.index.contains_key(&node.id) {
            return Err(SceneError::DuplicateId { id: node.id });
        }
        if let Some(parent) = &node.parent {
            self.children
                .entry(parent.clone())
                .or_default()
                .push(node.id.clone());
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    fn check_links(&self, node: &SceneNode) -> Result<(), SceneError> {
        if let Some(parent) = &node.parent {
            if !self.index.contains_key(parent) {
                return Err(SceneError::UnknownParent {
                    id: node.id.clone(),
                    parent: parent.clone(),
                });
            }
        }
        if node.kind.is_reference() {
            let Some(source) = &node.source else {
                return Err(SceneError::MissingSource {
                    id: node.id.clone(),
                });
            };
            if !self.index.contains_key(source) {
                return Err(SceneError::UnknownSource {
                    id: node.id.clone(),
                    missing: source.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_parent_cycles(&self) -> Result<(), SceneError> {
        for node in &self.nodes {
            let mut seen = HashSet::new();
            let mut current = node.parent.as_ref();
            while let Some(parent) = current {
                if parent == &node.id || !seen.insert(parent) {
                    return Err(SceneError::ParentCycle {
                        id: node.id.clone(),
                    });
                }
                current = self.node(parent).and_then(|p| p.parent.as_ref());
            }
        }
        Ok(())
    }

    /// Replace the selection
    pub fn select<I>(&mut self, ids: I) -> Result<(), SceneError>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let ids: Vec<NodeId> = ids.into_iter().collect();
        if let Some(id) = ids.iter().find(|id| !self.index.contains_key(*id)) {
            return Err(SceneError::UnknownSelection { id: id.clone() });
        }
        self.selection = ids;
        Ok(())
    }

    pub fn set_active(&mut self, id: Option<NodeId>) -> Result<(), SceneError> {
        if let Some(id) = &id {
            if !self.index.contains_key(id) {
                return Err(SceneError::UnknownSelection { id: id.clone() });
            }
        }
        self.active = id;
        Ok(())
    }

    pub fn node(&self, id: &NodeId) -> Option<&SceneNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// Number of redraws requested so far
    pub fn redraws(&self) -> usize {
        self.redraws
    }

    /// Number of completed settle barriers
    pub fn settles(&self) -> usize {
        self.settles
    }

    /// Rectangle the node actually covers on the canvas
    pub fn rendered_bounds(&self, id: &NodeId) -> Option<Rect> {
        self.rendered(id, &mut Vec::new())
    }

    fn rendered(&self, id: &NodeId, visiting: &mut Vec<NodeId>) -> Option<Rect> {
        // Cyclic source chains render nothing
        if visiting.contains(id) {
            return None;
        }
        let node = self.node(id)?;

        visiting.push(id.clone());
        let rect = match node.kind {
            NodeKind::Fill | NodeKind::Filter => Some(self.canvas),
            NodeKind::Group => self.union_of_members(id, |m| self.rendered(m, visiting)),
            NodeKind::Reference => node
                .source
                .as_ref()
                .and_then(|s| self.rendered(s, visiting))
                .map(|r| r.translate(node.position)),
            NodeKind::Regular
            | NodeKind::OverlayTransparency
            | NodeKind::OverlayFilter
            | NodeKind::OverlayColorize
            | NodeKind::OverlayTransform
            | NodeKind::OverlaySelection => node.extent.map(|e| e.translate(node.position)),
        };
        visiting.pop();
        rect
    }

    fn reported(&self, id: &NodeId, visiting: &mut Vec<NodeId>) -> Option<Rect> {
        if visiting.contains(id) {
            return None;
        }
        let node = self.node(id)?;

        visiting.push(id.clone());
        let rect = match node.kind {
            NodeKind::Reference => {
                let own = self.rendered(id, &mut Vec::new());
                let source = node
                    .source
                    .as_ref()
                    .and_then(|s| self.rendered(s, &mut Vec::new()));
                match (own, source) {
                    (Some(own), Some(source)) => Some(own.union(&source)),
                    _ => None,
                }
            }
            NodeKind::Group => self.union_of_members(id, |m| self.reported(m, visiting)),
            _ => self.rendered(id, &mut Vec::new()),
        };
        visiting.pop();
        rect
    }

    /// Union over direct members that contribute geometry to a group
    fn union_of_members<F>(&self, id: &NodeId, mut member: F) -> Option<Rect>
    where
        F: FnMut(&NodeId) -> Option<Rect>,
    {
        self.children
            .get(id)
            .into_iter()
            .flatten()
            .filter(|c| {
                self.node(c)
                    .is_some_and(|n| !n.kind.is_overlay() && !n.kind.is_boundless())
            })
            .filter_map(|c| member(c))
            .reduce(|acc, r| acc.union(&r))
    }

    fn collect_descendants(&self, id: &NodeId, out: &mut Vec<NodeId>) {
        for child in self.children.get(id).into_iter().flatten() {
            out.push(child.clone());
            self.collect_descendants(child, out);
        }
    }
}

impl Host for Document {
    fn node_kind(&self, id: &NodeId) -> Option<NodeKind> {
        self.node(id).map(|n| n.kind)
    }

    fn is_locked(&self, id: &NodeId) -> bool {
        self.node(id).is_some_and(|n| n.locked)
    }

    fn is_visible(&self, id: &NodeId) -> bool {
        self.node(id).is_some_and(|n| n.visible)
    }

    fn position(&self, id: &NodeId) -> Option<Point> {
        self.node(id).map(|n| n.position)
    }

    fn bounds(&self, id: &NodeId) -> Option<Rect> {
        self.reported(id, &mut Vec::new())
    }

    fn parent(&self, id: &NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent.clone())
    }

    fn descendants(&self, id: &NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out);
        out
    }

    fn source(&self, id: &NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.source.clone())
    }

    fn set_position(&mut self, id: &NodeId, position: Point) -> Result<(), HostError> {
        let i = *self
            .index
            .get(id)
            .ok_or_else(|| HostError::UnknownNode { id: id.clone() })?;
        let node = &mut self.nodes[i];
        if node.locked {
            return Err(HostError::Locked { id: id.clone() });
        }
        trace!(node = %id, from = %node.position, to = %position, "set position");
        node.position = position;
        Ok(())
    }

    fn canvas_bounds(&self) -> Rect {
        self.canvas
    }

    fn active_node(&self) -> Option<NodeId> {
        self.active.clone()
    }

    fn selection(&self) -> Vec<NodeId> {
        self.selection.clone()
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    fn wait_until_settled(&mut self) {
        self.settles += 1;
    }
}
