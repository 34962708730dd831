//! Error types for the arrange engine

use thiserror::Error;

use super::types::NodeId;

/// Errors reported by a host when it is asked to mutate the document
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostError {
    /// The host has no node with this id
    #[error("no node with id '{id}'")]
    UnknownNode { id: NodeId },

    /// The node is locked for editing
    #[error("node '{id}' is locked")]
    Locked { id: NodeId },
}

/// Errors that abort an alignment or distribution
///
/// Unmet preconditions are not errors; they surface as
/// [`Outcome::Skipped`](super::Outcome::Skipped).
#[derive(Debug, Error)]
pub enum ArrangeError {
    /// A node id reached through the selection or a source chain is unknown to the host
    #[error("unknown node '{id}'")]
    UnknownNode { id: NodeId },

    /// A reference node without a source
    #[error("reference node '{id}' has no source")]
    MissingSource { id: NodeId },

    /// A reference node that (transitively) references itself
    #[error("cyclic reference chain: {}", format_cycle(cycle))]
    CyclicReference { cycle: Vec<NodeId> },

    /// A subtree without any member that has geometry
    #[error("group '{id}' has no members with geometry")]
    EmptyGroup { id: NodeId },

    /// The host rejected a move
    #[error("host error: {0}")]
    Host(#[from] HostError),
}

/// An unrecognised mode name
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {what} '{value}' (expected one of: {expected})")]
pub struct ParseModeError {
    pub what: &'static str,
    pub value: String,
    pub expected: &'static str,
}

fn format_cycle(cycle: &[NodeId]) -> String {
    cycle
        .iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl ArrangeError {
    /// Create an unknown node error
    pub fn unknown(id: &NodeId) -> Self {
        Self::UnknownNode { id: id.clone() }
    }

    /// Create a cyclic reference error
    pub fn cyclic(cycle: Vec<NodeId>) -> Self {
        Self::CyclicReference { cycle }
    }

    /// Create an empty group error
    pub fn empty_group(id: &NodeId) -> Self {
        Self::EmptyGroup { id: id.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cyclic_reference_display() {
        let err = ArrangeError::cyclic(vec!["a".into(), "b".into(), "a".into()]);
        assert!(err.to_string().contains("a -> b -> a"));
    }

    #[test]
    fn test_unknown_node_display() {
        let err = ArrangeError::unknown(&NodeId::new("ghost"));
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_parse_mode_error_display() {
        let err = ParseModeError {
            what: "alignment mode",
            value: "middle".to_string(),
            expected: "left, right",
        };
        assert_eq!(
            err.to_string(),
            "unknown alignment mode 'middle' (expected one of: left, right)"
        );
    }

    #[test]
    fn test_host_error_conversion() {
        let err: ArrangeError = HostError::Locked { id: "bg".into() }.into();
        assert!(matches!(err, ArrangeError::Host(HostError::Locked { .. })));
        assert!(err.to_string().contains("locked"));
    }
}
