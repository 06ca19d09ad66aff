use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use crate::audio::volume::{DEFAULT_VOLUME_STEP, is_valid_step};
use crate::audio::OutputDevice;
use crate::audio::device::is_reserved_property_key;

use super::loader::ConfigLoader;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub logging: LoggingSettings,

    #[serde(default)]
    pub volume: VolumeConfig,

    /// Output endpoints exposed by the virtual sound output
    #[serde(default)]
    pub devices: Vec<DeviceSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default)]
    pub file_output: bool,
    #[serde(default)]
    pub json_format: bool,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeConfig {
    /// Step used by raiseVolume/lowerVolume when the call carries none
    #[serde(default = "default_step")]
    pub default_step: f32,
    /// Clear mute before applying a new level in setVolume
    #[serde(default = "default_unmute_on_set")]
    pub unmute_on_set: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSpec {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Value>,
}

fn default_step() -> f32 {
    DEFAULT_VOLUME_STEP
}

fn default_unmute_on_set() -> bool {
    true
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            default_step: default_step(),
            unmute_on_set: default_unmute_on_set(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            logging: LoggingSettings::default(),
            volume: VolumeConfig::default(),
            devices: vec![
                DeviceSpec {
                    id: "virtual-speakers".to_string(),
                    name: "Virtual Speakers".to_string(),
                    properties: BTreeMap::new(),
                },
                DeviceSpec {
                    id: "virtual-headphones".to_string(),
                    name: "Virtual Headphones".to_string(),
                    properties: BTreeMap::new(),
                },
            ],
        }
    }
}

impl Config {
    /// Load from `config_path`, or the default location when `None`
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let loader = match config_path {
            Some(path) => ConfigLoader::new_production(PathBuf::from(path)),
            None => ConfigLoader::new_with_default_path()?,
        };
        loader.load_config()
    }

    pub fn validate(&self) -> Result<()> {
        if !is_valid_step(self.volume.default_step) {
            bail!(
                "volume.default_step must be in (0, 1], got {}",
                self.volume.default_step
            );
        }

        let mut seen = HashSet::new();
        for device in &self.devices {
            if device.id.trim().is_empty() {
                bail!("Device '{}' has an empty id", device.name);
            }
            if !seen.insert(device.id.as_str()) {
                bail!("Duplicate device id: {}", device.id);
            }
            let reserved = device
                .properties
                .keys()
                .find(|key| is_reserved_property_key(key.as_str()));
            if let Some(key) = reserved {
                bail!("Device '{}' uses reserved property key '{}'", device.id, key);
            }
        }
        Ok(())
    }
}

impl DeviceSpec {
    pub fn to_device(&self) -> OutputDevice {
        OutputDevice {
            id: self.id.clone(),
            name: self.name.clone(),
            properties: self.properties.clone(),
        }
    }
}
