//! Layer Arrange - alignment and distribution for layered documents
//!
//! This library repositions the selected layers of a document: it aligns
//! them to an edge or center of an anchor, or distributes them along an
//! axis. Reference (clone) layers, whose position is relative to another
//! layer, stay visually anchored while their sources move underneath them.
//!
//! The engine talks to the document through the [`Host`] trait; the
//! in-memory [`Document`] is a ready-made host loaded from TOML.
//!
//! # Example
//!
//! ```rust
//! use layer_arrange::{align, AlignMode, ArrangeConfig, Document, Host, Outcome};
//!
//! let mut doc = Document::from_toml_str(r#"
//! selection = ["a", "b"]
//!
//! [canvas]
//! width = 200
//! height = 100
//!
//! [[node]]
//! id = "a"
//! extent = { x = 10, y = 0, width = 20, height = 20 }
//!
//! [[node]]
//! id = "b"
//! extent = { x = 50, y = 40, width = 20, height = 20 }
//! "#).unwrap();
//!
//! let outcome = align(&mut doc, AlignMode::Left, &ArrangeConfig::default()).unwrap();
//! assert_eq!(outcome, Outcome::Applied { moved: 1 });
//! assert_eq!(doc.rendered_bounds(&"b".into()).unwrap().x, 10);
//! assert_eq!(doc.position(&"a".into()).unwrap().x, 0);
//! ```

pub mod arrange;
pub mod error;
pub mod scene;
pub mod settings;

pub use arrange::{
    align, distribute, AlignMode, AnchorMode, ArrangeConfig, ArrangeError, Axis, DistributeMode,
    Host, HostError, NodeId, NodeKind, Outcome, Point, Rect, SkipReason,
};
pub use error::SceneError;
pub use scene::{Document, SceneNode};
pub use settings::{Settings, SettingsError};
