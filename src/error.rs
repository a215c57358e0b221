//! Typed errors for the data-access layer.

use thiserror::Error;

/// Design-time misuse of the registry. These are fatal: they mean the
/// application wired its entity types incorrectly, not that a request failed.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no adapter registered for entity type '{entity}'")]
    UnregisteredEntity { entity: &'static str },
    #[error("adapter for entity type '{entity}' already registered")]
    DuplicateRegistration { entity: &'static str },
}

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("cannot convert id {value} to {target}")]
    Conversion { value: String, target: &'static str },
    #[error("backend: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

impl AdapterError {
    /// Wrap a transport/storage error raised by an adapter implementation.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        AdapterError::Backend(Box::new(err))
    }

    /// Conversion failure naming the rejected value and the target key type.
    pub fn conversion(value: impl std::fmt::Display, target: &'static str) -> Self {
        AdapterError::Conversion {
            value: value.to_string(),
            target,
        }
    }
}
