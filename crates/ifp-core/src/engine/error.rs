use thiserror::Error;

use super::config::ConfigError;
use crate::core::groups::registry::RegistryError;
use crate::core::properties::PropertiesLoadError;
use crate::core::providers::{DetectionError, ProviderError};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Atom group registry error: {source}")]
    Registry {
        #[from]
        source: RegistryError,
    },

    #[error("Collaborator failed: {source}")]
    Provider {
        #[from]
        source: ProviderError,
    },

    #[error("Interaction detection failed: {source}")]
    Detection {
        #[from]
        source: DetectionError,
    },

    #[error("Failed to load default properties: {source}")]
    Properties {
        #[from]
        source: PropertiesLoadError,
    },

    #[error("No compound of the structure is marked as a target")]
    NoTarget,

    #[error("Internal logic error: {0}")]
    Internal(String),
}
