//! Error types for loading and validating scenes

use thiserror::Error;

use crate::arrange::NodeId;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scene TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to write scene TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("duplicate node id '{id}'")]
    DuplicateId { id: NodeId },

    #[error("node '{id}' has unknown parent '{parent}'")]
    UnknownParent { id: NodeId, parent: NodeId },

    #[error("node '{id}' is its own ancestor")]
    ParentCycle { id: NodeId },

    #[error("reference node '{id}' points at unknown node '{missing}'")]
    UnknownSource { id: NodeId, missing: NodeId },

    #[error("reference node '{id}' has no source")]
    MissingSource { id: NodeId },

    #[error("selection names unknown node '{id}'")]
    UnknownSelection { id: NodeId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_parent_display() {
        let err = SceneError::UnknownParent {
            id: "a".into(),
            parent: "nowhere".into(),
        };
        assert_eq!(err.to_string(), "node 'a' has unknown parent 'nowhere'");
    }

    #[test]
    fn test_parse_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("= nope").unwrap_err();
        let err: SceneError = toml_err.into();
        assert!(err.to_string().starts_with("failed to parse scene TOML"));
    }
}
