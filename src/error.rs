//! Error types for the command terminal.
//!
//! Only setup and registry mutation can fail. The interaction surface
//! (activation, hit testing, impulses) reports misses through return values
//! and never errors.

use terminal_types::NodeId;
use thiserror::Error;

/// Main error type for the command terminal
#[derive(Error, Debug)]
pub enum TerminalError {
    #[error("Store error: {0}")]
    Store(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Invalid search template '{template}': {source}")]
    SearchTemplate {
        template: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Input config error: {0}")]
    Input(#[from] terminal_input::InputError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Node registry invariant violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Node id '{0}' already exists")]
    DuplicateId(NodeId),

    #[error("Node '{0}' has an empty url")]
    EmptyUrl(NodeId),

    #[error("Node label must not be empty")]
    EmptyLabel,

    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),
}

pub type Result<T> = std::result::Result<T, TerminalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_error_display() {
        let err = RegistryError::DuplicateId(NodeId::new("strategist"));
        assert!(err.to_string().contains("strategist"));

        let err: TerminalError = RegistryError::EmptyLabel.into();
        assert!(err.to_string().starts_with("Registry error"));
    }
}
