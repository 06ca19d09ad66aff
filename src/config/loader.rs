use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::system::FileSystemInterface;

use super::types::Config;

/// Configuration loader that uses dependency injection for file system operations
pub struct ConfigLoader<F: FileSystemInterface> {
    file_system: F,
    config_path: PathBuf,
}

impl<F: FileSystemInterface> ConfigLoader<F> {
    pub fn new(file_system: F, config_path: PathBuf) -> Self {
        Self {
            file_system,
            config_path,
        }
    }

    /// Load configuration from the configured path, creating a default one
    /// when the file does not exist yet
    pub fn load_config(&self) -> Result<Config> {
        debug!("Loading configuration from: {}", self.config_path.display());

        if !self.file_system.config_file_exists(&self.config_path) {
            info!("Configuration file not found, creating default configuration");
            return self.create_default_config();
        }

        let config_content = self
            .file_system
            .read_config_file(&self.config_path)
            .with_context(|| {
                format!(
                    "Failed to read configuration file: {}",
                    self.config_path.display()
                )
            })?;

        let config: Config = toml::from_str(&config_content).with_context(|| {
            format!(
                "Failed to parse configuration file: {}",
                self.config_path.display()
            )
        })?;

        config.validate().with_context(|| {
            format!(
                "Invalid configuration file: {}",
                self.config_path.display()
            )
        })?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    pub fn save_config(&self, config: &Config) -> Result<()> {
        debug!("Saving configuration to: {}", self.config_path.display());

        if let Some(parent) = self.config_path.parent() {
            self.file_system
                .create_config_dir(parent)
                .with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
        }

        let config_content =
            toml::to_string_pretty(config).context("Failed to serialize configuration")?;

        self.file_system
            .write_config_file(&self.config_path, &config_content)
            .with_context(|| {
                format!(
                    "Failed to write configuration file: {}",
                    self.config_path.display()
                )
            })?;

        info!("Configuration saved to: {}", self.config_path.display());
        Ok(())
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    fn create_default_config(&self) -> Result<Config> {
        let config = Config::default();

        // Saving the defaults is best effort; an unwritable location still
        // yields a usable configuration.
        if let Err(e) = self.save_config(&config) {
            warn!(
                "Could not save default config to {}: {:#}. Using default config.",
                self.config_path.display(),
                e
            );
            return Ok(config);
        }

        info!(
            "Created default configuration file: {}",
            self.config_path.display()
        );
        Ok(config)
    }
}

impl ConfigLoader<crate::system::StandardFileSystem> {
    pub fn new_production(config_path: PathBuf) -> Self {
        Self::new(crate::system::StandardFileSystem, config_path)
    }

    /// Create a production config loader with the default path
    pub fn new_with_default_path() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Ok(Self::new_production(config_path))
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(config_dir.join("volume-bridge/config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::MockFileSystem;

    #[test]
    fn test_load_nonexistent_config_creates_default() {
        let mock_fs = MockFileSystem::new();
        let config_path = PathBuf::from("/test/config.toml");
        let loader = ConfigLoader::new(mock_fs.clone(), config_path.clone());

        let config = loader.load_config().unwrap();

        assert_eq!(config.volume.default_step, 0.15);
        assert_eq!(config.devices.len(), 2);

        let write_calls = mock_fs.get_write_calls();
        assert_eq!(write_calls.len(), 1);
        assert_eq!(write_calls[0].0, config_path);
        assert_eq!(
            mock_fs.get_directory_creation_calls(),
            vec![PathBuf::from("/test")]
        );
    }

    #[test]
    fn test_unwritable_location_still_yields_defaults() {
        let mock_fs = MockFileSystem::new();
        mock_fs.set_create_dir_failure(true);
        let loader = ConfigLoader::new(mock_fs.clone(), PathBuf::from("/ro/config.toml"));

        let config = loader.load_config().unwrap();

        assert_eq!(config.general.log_level, "info");
        assert!(mock_fs.get_write_calls().is_empty());
    }

    #[test]
    fn test_load_existing_config() {
        let mock_fs = MockFileSystem::new();
        let config_path = PathBuf::from("/test/config.toml");

        let config_content = r#"
[general]
log_level = "debug"

[logging]
json_format = true

[volume]
default_step = 0.1
unmute_on_set = false

[[devices]]
id = "dev1"
name = "Speakers"
"#;
        mock_fs.add_file(&config_path, config_content.to_string());

        let loader = ConfigLoader::new(mock_fs.clone(), config_path.clone());
        let config = loader.load_config().unwrap();

        assert_eq!(config.general.log_level, "debug");
        assert!(config.logging.json_format);
        assert!(!config.logging.file_output);
        assert_eq!(config.volume.default_step, 0.1);
        assert!(!config.volume.unmute_on_set);
        assert_eq!(config.devices.len(), 1);
        assert_eq!(config.devices[0].name, "Speakers");
        assert_eq!(mock_fs.get_read_calls(), vec![config_path]);
        assert!(mock_fs.get_write_calls().is_empty());
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let mock_fs = MockFileSystem::new();
        let config_path = PathBuf::from("/test/config.toml");
        mock_fs.add_file(&config_path, "[volume]\ndefault_step = 3.0\n".to_string());

        let loader = ConfigLoader::new(mock_fs, config_path);
        let error = loader.load_config().unwrap_err();
        assert!(format!("{:#}", error).contains("default_step"));
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let mock_fs = MockFileSystem::new();
        let config_path = PathBuf::from("/test/config.toml");
        mock_fs.add_file(&config_path, "[volume\n".to_string());

        let loader = ConfigLoader::new(mock_fs, config_path);
        assert!(loader.load_config().is_err());
    }
}
