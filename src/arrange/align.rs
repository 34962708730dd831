//! Alignment of selected nodes to an anchor rectangle

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::bounds;
use super::config::AnchorMode;
use super::error::{ArrangeError, ParseModeError};
use super::placement::Plan;
use super::snapshot::Snapshot;
use super::sorter::is_movable;
use super::types::{round_even, NodeId, Point, Rect};
use super::SkipReason;

/// Edge or center the selection is aligned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlignMode {
    Left,
    Right,
    Top,
    Bottom,
    /// Center horizontally
    HCenter,
    /// Center vertically
    VCenter,
}

impl AlignMode {
    pub const ALL: [AlignMode; 6] = [
        AlignMode::Left,
        AlignMode::Right,
        AlignMode::Top,
        AlignMode::Bottom,
        AlignMode::HCenter,
        AlignMode::VCenter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AlignMode::Left => "left",
            AlignMode::Right => "right",
            AlignMode::Top => "top",
            AlignMode::Bottom => "bottom",
            AlignMode::HCenter => "h_center",
            AlignMode::VCenter => "v_center",
        }
    }
}

impl fmt::Display for AlignMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlignMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlignMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ParseModeError {
                what: "alignment mode",
                value: s.to_string(),
                expected: "left, right, top, bottom, h_center, v_center",
            })
    }
}

/// Rectangle alignment targets are computed against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub rect: Rect,
    /// Node serving as the anchor, which therefore stays in place
    pub excluded: Option<NodeId>,
}

/// Position that puts a node's bounds edge (or center) on the anchor's.
///
/// `bounds` must be the node's corrected geometry. The offset between the
/// node position and its bounds origin is preserved, and the coordinate on
/// the axis that does not take part is left unchanged.
pub fn target_position(mode: AlignMode, anchor: Rect, bounds: Rect, position: Point) -> Point {
    let offset = bounds.origin() - position;

    match mode {
        AlignMode::Left => Point::new(anchor.x - offset.x, position.y),
        AlignMode::Right => Point::new(
            anchor.x - offset.x + (anchor.width - bounds.width),
            position.y,
        ),
        AlignMode::Top => Point::new(position.x, anchor.y - offset.y),
        AlignMode::Bottom => Point::new(position.x, anchor.bottom() - bounds.height - offset.y),
        AlignMode::HCenter => Point::new(
            anchor.x + round_even(f64::from(anchor.width - bounds.width) / 2.0) - offset.x,
            position.y,
        ),
        AlignMode::VCenter => Point::new(
            position.x,
            anchor.y + round_even(f64::from(anchor.height - bounds.height) / 2.0) - offset.y,
        ),
    }
}

/// Resolve the anchor rectangle for the captured selection.
///
/// A boundless active node (fill, filter) has nothing to align against, so
/// the canvas is used instead whatever the requested mode.
pub fn resolve_anchor(
    snapshot: &Snapshot,
    anchor: AnchorMode,
) -> Result<Result<Anchor, SkipReason>, ArrangeError> {
    let active = snapshot.active().map(|id| snapshot.get(id)).transpose()?;
    let canvas = Anchor {
        rect: snapshot.canvas(),
        excluded: None,
    };

    let resolved = match anchor {
        _ if active.is_some_and(|n| n.kind.is_boundless()) => canvas,
        AnchorMode::Canvas => canvas,
        AnchorMode::Active => {
            let Some(active) = active else {
                return Ok(Err(SkipReason::NoActiveNode));
            };
            let Some(rect) = bounds::try_geometry(snapshot, &active.id)? else {
                return Ok(Err(SkipReason::EmptyAnchor));
            };
            // References and groups stay in the moving set so their
            // bookkeeping runs; their computed target is their own position.
            let excluded = if active.kind.is_reference() || active.kind.is_group() {
                None
            } else {
                Some(active.id.clone())
            };
            Anchor { rect, excluded }
        }
        AnchorMode::Selection => match bounds::selection_bounds(snapshot, snapshot.selection())? {
            Some(rect) => Anchor {
                rect,
                excluded: None,
            },
            None => return Ok(Err(SkipReason::EmptyAnchor)),
        },
    };

    Ok(Ok(resolved))
}

/// Compute alignment targets for every movable selected node.
pub fn plan(
    snapshot: &Snapshot,
    mode: AlignMode,
    anchor: AnchorMode,
) -> Result<Result<Plan, SkipReason>, ArrangeError> {
    let mut candidates = Vec::new();
    for id in snapshot.selection() {
        let node = snapshot.get(id)?;
        if !is_movable(snapshot, node) {
            continue;
        }
        if let Some(b) = bounds::try_geometry(snapshot, id)? {
            candidates.push((id, b, node.position));
        }
    }

    let required = if anchor == AnchorMode::Canvas { 1 } else { 2 };
    if candidates.len() < required {
        return Ok(Err(SkipReason::TooFewNodes {
            required,
            found: candidates.len(),
        }));
    }

    let resolved = match resolve_anchor(snapshot, anchor)? {
        Ok(resolved) => resolved,
        Err(reason) => return Ok(Err(reason)),
    };
    debug!(%mode, %anchor, rect = %resolved.rect, "resolved alignment anchor");

    let active = match anchor {
        AnchorMode::Active => snapshot.active(),
        AnchorMode::Selection | AnchorMode::Canvas => None,
    };

    let mut plan = Plan::new();
    for (id, b, position) in candidates {
        if resolved.excluded.as_ref() == Some(id) {
            continue;
        }
        // Members of the anchor node move (or not) with it
        if active.is_some_and(|a| snapshot.is_descendant_of(id, a)) {
            continue;
        }
        plan.push(id.clone(), target_position(mode, resolved.rect, b, position));
    }

    if plan.is_empty() {
        return Ok(Err(SkipReason::NothingToMove));
    }
    Ok(Ok(plan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Document;

    const ANCHOR: Rect = Rect {
        x: 100,
        y: 50,
        width: 200,
        height: 100,
    };

    #[test]
    fn test_target_left_preserves_bounds_offset() {
        // bounds start 10px right of the position
        let b = Rect::new(20, 30, 40, 20);
        let p = Point::new(10, 5);
        assert_eq!(
            target_position(AlignMode::Left, ANCHOR, b, p),
            Point::new(90, 5)
        );
    }

    #[test]
    fn test_target_each_mode() {
        let b = Rect::new(0, 0, 40, 20);
        let p = Point::new(0, 0);
        assert_eq!(target_position(AlignMode::Right, ANCHOR, b, p), Point::new(260, 0));
        assert_eq!(target_position(AlignMode::Top, ANCHOR, b, p), Point::new(0, 50));
        assert_eq!(target_position(AlignMode::Bottom, ANCHOR, b, p), Point::new(0, 130));
        assert_eq!(target_position(AlignMode::HCenter, ANCHOR, b, p), Point::new(180, 0));
        assert_eq!(target_position(AlignMode::VCenter, ANCHOR, b, p), Point::new(0, 90));
    }

    #[test]
    fn test_target_center_rounds_half_to_even() {
        // (200 - 41) / 2 = 79.5 -> 80, (100 - 23) / 2 = 38.5 -> 38
        let b = Rect::new(0, 0, 41, 23);
        let p = Point::new(0, 0);
        assert_eq!(target_position(AlignMode::HCenter, ANCHOR, b, p).x, 180);
        assert_eq!(target_position(AlignMode::VCenter, ANCHOR, b, p).y, 88);
    }

    #[test]
    fn test_target_is_fixed_point_on_own_bounds() {
        let b = Rect::new(13, 27, 41, 23);
        let p = Point::new(3, 7);
        for mode in AlignMode::ALL {
            assert_eq!(target_position(mode, b, b, p), p, "mode {mode}");
        }
    }

    #[test]
    fn test_mode_names_round_trip() {
        for mode in AlignMode::ALL {
            assert_eq!(mode.as_str().parse::<AlignMode>(), Ok(mode));
        }
        assert!("middle".parse::<AlignMode>().is_err());
    }

    const SCENE: &str = r#"
selection = ["a", "b", "fill"]
active = "b"

[canvas]
width = 1000
height = 800

[[node]]
id = "a"
extent = { x = 10, y = 10, width = 20, height = 20 }

[[node]]
id = "b"
extent = { x = 300, y = 40, width = 50, height = 50 }

[[node]]
id = "fill"
kind = "fill"
"#;

    #[test]
    fn test_active_anchor_excludes_active_node() {
        let doc = Document::from_toml_str(SCENE).unwrap();
        let snapshot = Snapshot::capture(&doc).unwrap();

        let anchor = resolve_anchor(&snapshot, AnchorMode::Active).unwrap().unwrap();
        assert_eq!(anchor.rect, Rect::new(300, 40, 50, 50));
        assert_eq!(anchor.excluded, Some(NodeId::new("b")));

        let plan = plan(&snapshot, AlignMode::Left, AnchorMode::Active)
            .unwrap()
            .unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.target_of(&"a".into()), Some(Point::new(290, 0)));
    }

    #[test]
    fn test_selection_anchor() {
        let doc = Document::from_toml_str(SCENE).unwrap();
        let snapshot = Snapshot::capture(&doc).unwrap();

        let anchor = resolve_anchor(&snapshot, AnchorMode::Selection).unwrap().unwrap();
        assert_eq!(anchor.rect, Rect::new(10, 10, 340, 80));
    }

    #[test]
    fn test_boundless_active_falls_back_to_canvas() {
        let source = SCENE.replace(r#"active = "b""#, r#"active = "fill""#);
        let doc = Document::from_toml_str(&source).unwrap();
        let snapshot = Snapshot::capture(&doc).unwrap();

        let anchor = resolve_anchor(&snapshot, AnchorMode::Active).unwrap().unwrap();
        assert_eq!(anchor.rect, Rect::new(0, 0, 1000, 800));
        assert_eq!(anchor.excluded, None);
    }

    #[test]
    fn test_too_few_nodes() {
        let source = SCENE.replace(r#"selection = ["a", "b", "fill"]"#, r#"selection = ["a", "fill"]"#);
        let doc = Document::from_toml_str(&source).unwrap();
        let snapshot = Snapshot::capture(&doc).unwrap();

        let skipped = plan(&snapshot, AlignMode::Top, AnchorMode::Selection)
            .unwrap()
            .unwrap_err();
        assert_eq!(skipped, SkipReason::TooFewNodes { required: 2, found: 1 });

        let canvas = plan(&snapshot, AlignMode::Top, AnchorMode::Canvas).unwrap();
        assert!(canvas.is_ok());
    }

    #[test]
    fn test_missing_active_node() {
        let source = SCENE.replace("active = \"b\"\n", "");
        let doc = Document::from_toml_str(&source).unwrap();
        let snapshot = Snapshot::capture(&doc).unwrap();

        let skipped = plan(&snapshot, AlignMode::Left, AnchorMode::Active)
            .unwrap()
            .unwrap_err();
        assert_eq!(skipped, SkipReason::NoActiveNode);
    }
}
