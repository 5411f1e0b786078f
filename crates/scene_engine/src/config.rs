//! Scene configuration
//!
//! Serializable settings for the scene graph and traversal, loadable from
//! TOML with validated defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file could not be parsed
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A parsed value is out of range
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Settings consumed by [`crate::scene::SceneGraph::with_config`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Whether visit() runs frustum tests; disabling queues everything
    pub culling_enabled: bool,

    /// Camera mask assigned to newly created nodes
    pub default_camera_mask: u32,

    /// Node arena capacity to preallocate
    pub node_capacity: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            culling_enabled: true,
            default_camera_mask: 1,
            node_capacity: 256,
        }
    }
}

impl SceneConfig {
    /// Parse a configuration from a TOML string
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed TOML, [`ConfigError::Invalid`]
    /// on out-of-range values.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] when the file cannot be read, plus everything
    /// [`SceneConfig::from_toml_str`] raises.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] when a value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_camera_mask == 0 {
            return Err(ConfigError::Invalid(
                "default_camera_mask must have at least one bit set".to_owned(),
            ));
        }
        Ok(())
    }
}
