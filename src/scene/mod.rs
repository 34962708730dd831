//! In-memory scenes loaded from TOML
//!
//! A [`Document`] is a self-contained [`Host`](crate::arrange::Host) used by
//! the command line tool and by tests.

mod document;
mod file;

pub use document::{Document, SceneNode};
