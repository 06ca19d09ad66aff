use anyhow::{Context, Result};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// Keys owned by the device itself; a property may never shadow them.
pub const RESERVED_PROPERTY_KEYS: [&str; 2] = ["id", "name"];

pub fn is_reserved_property_key(key: &str) -> bool {
    RESERVED_PROPERTY_KEYS.contains(&key)
}

/// Snapshot of one audio output endpoint as reported by the audio subsystem.
///
/// Anything beyond `id` and `name` (sample rate, channel count, transport...)
/// is carried in `properties` untouched. Properties named `id` or `name` are
/// never serialized.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputDevice {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub properties: BTreeMap<String, Value>,
}

impl OutputDevice {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Reserved keys (`id`, `name`) are ignored.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if is_reserved_property_key(&key) {
            warn!("Ignoring reserved property '{}' on output device {}", key, self.id);
            return self;
        }
        self.properties.insert(key, value.into());
        self
    }

    /// Canonical transport form: compact JSON, `id` and `name` first, then
    /// properties in key order.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self)
            .with_context(|| format!("Failed to serialize output device {}", self.id))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse output device")
    }
}

impl Serialize for OutputDevice {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("name", &self.name)?;
        for (key, value) in &self.properties {
            if !is_reserved_property_key(key) {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl fmt::Display for OutputDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.id)
    }
}

/// Serializes a device list the same way single devices are serialized.
pub fn device_list_to_json_string(devices: &[OutputDevice]) -> Result<String> {
    serde_json::to_string(devices).context("Failed to serialize output device list")
}
