//! Layer repositioning engine
//!
//! Both entry points follow the same flow: capture a [`Snapshot`] of the
//! host, plan target positions over it, resolve reference dependencies, and
//! place everything in two phases before waiting for the host to settle.

pub mod align;
pub mod bounds;
pub mod clones;
pub mod config;
pub mod distribute;
pub mod error;
pub mod host;
pub mod placement;
pub mod snapshot;
pub mod sorter;
pub mod types;

pub use align::AlignMode;
pub use config::{AnchorMode, ArrangeConfig};
pub use distribute::{DistributeMode, SpacingModel};
pub use error::{ArrangeError, HostError, ParseModeError};
pub use host::Host;
pub use placement::Plan;
pub use snapshot::Snapshot;
pub use types::*;

use std::fmt;

use tracing::debug;

/// Why an operation declined to touch the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Fewer movable nodes than the operation needs
    TooFewNodes { required: usize, found: usize },
    /// Anchoring to the active node without one
    NoActiveNode,
    /// The anchor has no geometry
    EmptyAnchor,
    /// Every movable node is the anchor or part of it
    NothingToMove,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooFewNodes { required, found } => {
                write!(f, "needs {required} movable nodes, found {found}")
            }
            SkipReason::NoActiveNode => f.write_str("no active node"),
            SkipReason::EmptyAnchor => f.write_str("anchor has no geometry"),
            SkipReason::NothingToMove => f.write_str("nothing to move"),
        }
    }
}

/// Result of an operation that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Targets were applied; `moved` nodes ended at a new position
    Applied { moved: usize },
    /// Preconditions were not met and the host was left untouched
    Skipped(SkipReason),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Applied { moved } => write!(f, "moved {moved} nodes"),
            Outcome::Skipped(reason) => write!(f, "skipped: {reason}"),
        }
    }
}

/// Align the host's selection to the anchor chosen in `config`.
pub fn align<H: Host + ?Sized>(
    host: &mut H,
    mode: AlignMode,
    config: &ArrangeConfig,
) -> Result<Outcome, ArrangeError> {
    let snapshot = Snapshot::capture(host)?;
    debug!(%mode, anchor = %config.anchor, nodes = snapshot.len(), "align");

    let plan = align::plan(&snapshot, mode, config.anchor)?;
    apply(host, &snapshot, plan)
}

/// Distribute the host's selection along the axis `mode` implies.
pub fn distribute<H: Host + ?Sized>(
    host: &mut H,
    mode: DistributeMode,
    config: &ArrangeConfig,
) -> Result<Outcome, ArrangeError> {
    let snapshot = Snapshot::capture(host)?;
    debug!(%mode, spacing = ?config.spacing, reverse = config.reverse, nodes = snapshot.len(), "distribute");

    let plan = distribute::plan(&snapshot, mode, config.spacing, config.reverse)?;
    apply(host, &snapshot, plan)
}

fn apply<H: Host + ?Sized>(
    host: &mut H,
    snapshot: &Snapshot,
    plan: Result<Plan, SkipReason>,
) -> Result<Outcome, ArrangeError> {
    let plan = match plan {
        Ok(plan) => plan,
        Err(reason) => {
            debug!(%reason, "skipped");
            return Ok(Outcome::Skipped(reason));
        }
    };

    let table = clones::resolve(snapshot)?;
    let moved = placement::execute(host, snapshot, &table, &plan)?;

    host.request_redraw();
    host.wait_until_settled();
    debug!(moved, targets = plan.len(), "applied");
    Ok(Outcome::Applied { moved })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Document;

    const SCENE: &str = r#"
selection = ["a", "b"]

[canvas]
width = 200
height = 100

[[node]]
id = "a"
extent = { x = 0, y = 0, width = 10, height = 10 }

[[node]]
id = "b"
extent = { x = 50, y = 30, width = 10, height = 10 }
"#;

    #[test]
    fn test_align_requests_redraw() {
        let mut doc = Document::from_toml_str(SCENE).unwrap();
        let outcome = align(&mut doc, AlignMode::Top, &ArrangeConfig::default()).unwrap();

        assert_eq!(outcome, Outcome::Applied { moved: 1 });
        assert_eq!(doc.redraws(), 1);
        assert_eq!(doc.settles(), 1);
    }

    #[test]
    fn test_skip_leaves_host_untouched() {
        let mut doc = Document::from_toml_str(SCENE).unwrap();
        let outcome = distribute(&mut doc, DistributeMode::Left, &ArrangeConfig::default()).unwrap();

        assert_eq!(
            outcome,
            Outcome::Skipped(SkipReason::TooFewNodes { required: 3, found: 2 })
        );
        assert!(!outcome.is_applied());
        assert_eq!(doc.redraws(), 0);
        assert_eq!(doc.settles(), 0);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Applied { moved: 2 }.to_string(), "moved 2 nodes");
        assert_eq!(
            Outcome::Skipped(SkipReason::NoActiveNode).to_string(),
            "skipped: no active node"
        );
    }
}
