//! Configuration manager for loading, saving, and managing editor configuration

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use super::EditorConfig;

/// Shared configuration manager type
pub type SharedConfig = Arc<RwLock<ConfigManager>>;

/// Configuration error types
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

/// Configuration manager handles loading, saving, and accessing editor configuration
#[derive(Debug)]
pub struct ConfigManager {
    config: EditorConfig,
    config_path: PathBuf,
    dirty: bool,
}

impl ConfigManager {
    /// Create a new configuration manager, loading from disk if available
    pub fn new() -> Self {
        Self::with_path(Self::default_config_path())
    }

    /// Create a configuration manager backed by a specific file
    pub fn with_path(config_path: PathBuf) -> Self {
        let config = Self::load_from_path(&config_path).unwrap_or_else(|| {
            tracing::info!("No config file found, using defaults");
            EditorConfig::new()
        });

        Self {
            config,
            config_path,
            dirty: false,
        }
    }

    /// Get the OS-standard configuration file path
    fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fieldmap")
            .join("config.ron")
    }

    /// Load configuration from a file path
    fn load_from_path(path: &Path) -> Option<EditorConfig> {
        let content = std::fs::read_to_string(path).ok()?;
        match ron::from_str::<EditorConfig>(&content) {
            Ok(config) => {
                if config.version != EditorConfig::CURRENT_VERSION {
                    tracing::warn!(
                        "Config version {} differs from {}",
                        config.version,
                        EditorConfig::CURRENT_VERSION
                    );
                }
                tracing::info!("Loaded config from {:?}", path);
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file: {}", e);
                None
            }
        }
    }

    /// Get a reference to the current configuration
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Get a mutable reference to the configuration (marks as dirty)
    pub fn config_mut(&mut self) -> &mut EditorConfig {
        self.dirty = true;
        &mut self.config
    }

    /// Check if the configuration has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Save the configuration to disk
    pub fn save(&mut self) -> Result<(), ConfigError> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let content = ron::ser::to_string_pretty(&self.config, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::write(&self.config_path, &content).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::info!("Saved config to {:?}", self.config_path);
        self.dirty = false;
        Ok(())
    }

    /// Reset configuration to defaults
    pub fn reset_to_defaults(&mut self) {
        self.config = EditorConfig::new();
        self.dirty = true;
    }

    /// Get the config file path (for display purposes)
    pub fn config_file_path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a new shared configuration manager
pub fn create_shared_config() -> SharedConfig {
    Arc::new(RwLock::new(ConfigManager::new()))
}
