//! On-disk TOML shape of a scene

use serde::{Deserialize, Serialize};

use crate::arrange::{NodeId, NodeKind, Point, Rect};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct SceneFile {
    #[serde(default)]
    pub selection: Vec<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<NodeId>,
    pub canvas: CanvasEntry,
    #[serde(default, rename = "node")]
    pub nodes: Vec<NodeEntry>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct CanvasEntry {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct NodeEntry {
    pub id: NodeId,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<NodeId>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub locked: bool,
    #[serde(default = "visible_default", skip_serializing_if = "is_true")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Point::is_zero")]
    pub position: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<Rect>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_true(value: &bool) -> bool {
    *value
}

fn visible_default() -> bool {
    true
}
