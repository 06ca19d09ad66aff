//! Test utility builders for output devices and recording sinks
//!
//! Individual helpers may not be used by every test binary, so dead code
//! warnings are suppressed.

#![allow(dead_code)]

use serde_json::Value;
use std::sync::{Arc, Mutex};
use volume_bridge::OutputDevice;

/// Builder for creating test OutputDevice instances
pub struct OutputDeviceBuilder {
    id: String,
    name: String,
    properties: Vec<(String, Value)>,
}

impl OutputDeviceBuilder {
    pub fn new() -> Self {
        Self {
            id: "test_device_1".to_string(),
            name: "Test Device".to_string(),
            properties: Vec::new(),
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.properties
            .push(("sampleRate".to_string(), Value::from(sample_rate)));
        self
    }

    pub fn channels(mut self, channels: u32) -> Self {
        self.properties
            .push(("channels".to_string(), Value::from(channels)));
        self
    }

    pub fn build(self) -> OutputDevice {
        self.properties
            .into_iter()
            .fold(OutputDevice::new(self.id, self.name), |device, (key, value)| {
                device.with_property(key, value)
            })
    }
}

impl Default for OutputDeviceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn speakers() -> OutputDevice {
    OutputDeviceBuilder::new().id("dev1").name("Speakers").build()
}

pub fn headphones() -> OutputDevice {
    OutputDeviceBuilder::new().id("dev2").name("Headphones").build()
}

/// Sink that records every event it receives
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closure form to hand to `start`/`on_listen`
    pub fn sink(&self) -> Box<dyn Fn(String) + Send + Sync> {
        let events = Arc::clone(&self.events);
        Box::new(move |event: String| events.lock().unwrap().push(event))
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

/// Sink that records every volume level it receives
#[derive(Clone, Default)]
pub struct VolumeRecorder {
    levels: Arc<Mutex<Vec<f32>>>,
}

impl VolumeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sink(&self) -> Box<dyn Fn(f32) + Send + Sync> {
        let levels = Arc::clone(&self.levels);
        Box::new(move |volume: f32| levels.lock().unwrap().push(volume))
    }

    pub fn levels(&self) -> Vec<f32> {
        self.levels.lock().unwrap().clone()
    }
}
