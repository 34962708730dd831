//! Integration tests for alignment

use layer_arrange::{
    align, AlignMode, AnchorMode, ArrangeConfig, Document, Host, NodeId, Outcome, Point, Rect,
    SkipReason,
};
use pretty_assertions::assert_eq;

fn load(source: &str) -> Document {
    Document::from_toml_str(source).expect("Should load scene")
}

fn rendered(doc: &Document, id: &str) -> Rect {
    doc.rendered_bounds(&NodeId::new(id))
        .expect("Node should have geometry")
}

fn position(doc: &Document, id: &str) -> Point {
    doc.position(&NodeId::new(id)).expect("Node should exist")
}

const ROW: &str = r#"
selection = ["a", "b", "c"]
active = "b"

[canvas]
width = 300
height = 200

[[node]]
id = "a"
extent = { x = 10, y = 10, width = 20, height = 20 }

[[node]]
id = "b"
extent = { x = 40, y = 50, width = 30, height = 30 }

[[node]]
id = "c"
extent = { x = 100, y = 5, width = 10, height = 40 }
"#;

#[test]
fn test_align_left_to_selection() {
    let mut doc = load(ROW);
    let outcome = align(&mut doc, AlignMode::Left, &ArrangeConfig::default()).expect("Should align");

    assert_eq!(outcome, Outcome::Applied { moved: 2 });
    for id in ["a", "b", "c"] {
        assert_eq!(rendered(&doc, id).x, 10, "node {id}");
    }
    // the other axis is untouched
    assert_eq!(position(&doc, "b"), Point::new(-30, 0));
    assert_eq!(position(&doc, "c"), Point::new(-90, 0));
}

#[test]
fn test_align_is_idempotent() {
    let mut doc = load(ROW);
    let config = ArrangeConfig::default();
    for mode in [AlignMode::Bottom, AlignMode::HCenter] {
        align(&mut doc, mode, &config).expect("Should align");
        let before: Vec<Point> = ["a", "b", "c"].iter().map(|id| position(&doc, id)).collect();

        let again = align(&mut doc, mode, &config).expect("Should align");

        let after: Vec<Point> = ["a", "b", "c"].iter().map(|id| position(&doc, id)).collect();
        assert_eq!(again, Outcome::Applied { moved: 0 });
        assert_eq!(after, before);
    }
}

#[test]
fn test_align_right_to_canvas() {
    let mut doc = load(ROW);
    let config = ArrangeConfig::new().with_anchor(AnchorMode::Canvas);
    align(&mut doc, AlignMode::Right, &config).expect("Should align");

    for id in ["a", "b", "c"] {
        assert_eq!(rendered(&doc, id).right(), 300, "node {id}");
    }
}

#[test]
fn test_align_center_to_active_node() {
    let mut doc = load(ROW);
    let config = ArrangeConfig::new().with_anchor(AnchorMode::Active);
    let outcome = align(&mut doc, AlignMode::HCenter, &config).expect("Should align");

    assert_eq!(outcome, Outcome::Applied { moved: 2 });
    assert_eq!(rendered(&doc, "b"), Rect::new(40, 50, 30, 30));
    assert_eq!(rendered(&doc, "a").x, 45);
    assert_eq!(rendered(&doc, "c").x, 50);
}

#[test]
fn test_align_vertical_modes() {
    let mut doc = load(ROW);
    align(&mut doc, AlignMode::Top, &ArrangeConfig::default()).expect("Should align");
    for id in ["a", "b", "c"] {
        assert_eq!(rendered(&doc, id).y, 5, "node {id}");
    }

    align(&mut doc, AlignMode::VCenter, &ArrangeConfig::default()).expect("Should align");
    // selection spans 5..45 after aligning to the top, center 25
    assert_eq!(rendered(&doc, "a").y, 15);
    assert_eq!(rendered(&doc, "b").y, 10);
    assert_eq!(rendered(&doc, "c").y, 5);
}

#[test]
fn test_locked_and_hidden_nodes_stay() {
    let source = r#"
selection = ["a", "b", "locked", "hidden"]

[canvas]
width = 300
height = 200

[[node]]
id = "a"
extent = { x = 10, y = 0, width = 10, height = 10 }

[[node]]
id = "b"
extent = { x = 50, y = 0, width = 10, height = 10 }

[[node]]
id = "locked"
locked = true
extent = { x = 0, y = 0, width = 10, height = 10 }

[[node]]
id = "hidden"
visible = false
extent = { x = 200, y = 0, width = 10, height = 10 }
"#;
    let mut doc = load(source);
    align(&mut doc, AlignMode::Right, &ArrangeConfig::default()).expect("Should align");

    // they still count towards the selection bounds
    assert_eq!(rendered(&doc, "a").right(), 210);
    assert_eq!(rendered(&doc, "b").right(), 210);
    assert_eq!(rendered(&doc, "locked"), Rect::new(0, 0, 10, 10));
    assert_eq!(rendered(&doc, "hidden"), Rect::new(200, 0, 10, 10));
}

#[test]
fn test_group_moves_as_one() {
    let source = r#"
selection = ["g", "m1"]

[canvas]
width = 300
height = 200

[[node]]
id = "g"
kind = "group"

[[node]]
id = "m1"
parent = "g"
extent = { x = 0, y = 0, width = 10, height = 10 }

[[node]]
id = "m1_mask"
kind = "overlay-transparency"
parent = "m1"
visible = false
extent = { x = 0, y = 0, width = 10, height = 10 }

[[node]]
id = "m2"
parent = "g"
extent = { x = 20, y = 20, width = 10, height = 10 }
"#;
    let mut doc = load(source);
    let config = ArrangeConfig::new().with_anchor(AnchorMode::Canvas);
    align(&mut doc, AlignMode::Bottom, &config).expect("Should align");

    assert_eq!(rendered(&doc, "g"), Rect::new(0, 170, 30, 30));
    // m1 is selected but moves only once, with its group
    assert_eq!(rendered(&doc, "m1"), Rect::new(0, 170, 10, 10));
    assert_eq!(rendered(&doc, "m1_mask"), Rect::new(0, 170, 10, 10));
    assert_eq!(rendered(&doc, "m2"), Rect::new(20, 190, 10, 10));
}

#[test]
fn test_reference_aligns_by_rendered_bounds() {
    let source = r#"
selection = ["clone", "x"]

[canvas]
width = 300
height = 200

[[node]]
id = "src"
extent = { x = 0, y = 0, width = 20, height = 20 }

[[node]]
id = "clone"
kind = "reference"
source = "src"
position = { x = 100, y = 0 }

[[node]]
id = "x"
extent = { x = 50, y = 50, width = 20, height = 20 }
"#;
    let mut doc = load(source);
    align(&mut doc, AlignMode::Left, &ArrangeConfig::default()).expect("Should align");

    assert_eq!(rendered(&doc, "clone"), Rect::new(50, 0, 20, 20));
    assert_eq!(rendered(&doc, "src"), Rect::new(0, 0, 20, 20));
    assert_eq!(rendered(&doc, "x"), Rect::new(50, 50, 20, 20));
}

#[test]
fn test_single_node_is_a_no_op() {
    let source = r#"
selection = ["a"]

[canvas]
width = 300
height = 200

[[node]]
id = "a"
extent = { x = 10, y = 10, width = 20, height = 20 }
"#;
    let mut doc = load(source);
    let outcome = align(&mut doc, AlignMode::Left, &ArrangeConfig::default()).expect("Should align");

    assert_eq!(
        outcome,
        Outcome::Skipped(SkipReason::TooFewNodes {
            required: 2,
            found: 1
        })
    );
    assert_eq!(doc.redraws(), 0);

    // a single node can still go to the canvas
    let config = ArrangeConfig::new().with_anchor(AnchorMode::Canvas);
    let outcome = align(&mut doc, AlignMode::Right, &config).expect("Should align");
    assert_eq!(outcome, Outcome::Applied { moved: 1 });
    assert_eq!(rendered(&doc, "a").right(), 300);
    assert_eq!(doc.redraws(), 1);
}

#[test]
fn test_boundless_active_node_uses_canvas() {
    let source = r#"
selection = ["a", "b", "bg"]
active = "bg"

[canvas]
width = 300
height = 200

[[node]]
id = "bg"
kind = "fill"

[[node]]
id = "a"
extent = { x = 10, y = 10, width = 20, height = 20 }

[[node]]
id = "b"
extent = { x = 40, y = 50, width = 30, height = 30 }
"#;
    let mut doc = load(source);
    let config = ArrangeConfig::new().with_anchor(AnchorMode::Active);
    align(&mut doc, AlignMode::Bottom, &config).expect("Should align");

    assert_eq!(rendered(&doc, "a").bottom(), 200);
    assert_eq!(rendered(&doc, "b").bottom(), 200);
    assert_eq!(rendered(&doc, "bg"), Rect::new(0, 0, 300, 200));
}
