use anyhow::{Result, anyhow, bail};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::audio::OutputDevice;
use crate::config::Config;
use crate::system::traits::{
    DeviceChangeCallback, FileSystemInterface, SoundOutputInterface, VolumeChangeCallback,
};

const INITIAL_VOLUME: f32 = 0.5;

struct MixerState {
    devices: Vec<OutputDevice>,
    default_id: Option<String>,
    volume: f32,
    muted: bool,
}

/// Software-only output: a mixer state kept in memory with one listener slot
/// per event kind.
///
/// Stands in for a native backend when the bridge runs standalone.
pub struct VirtualSoundOutput {
    state: Mutex<MixerState>,
    listener: Mutex<Option<Arc<DeviceChangeCallback>>>,
    volume_listener: Mutex<Option<Arc<VolumeChangeCallback>>>,
    // Held while a listener callback runs so deliveries never overlap.
    delivery: Mutex<()>,
}

impl VirtualSoundOutput {
    /// The first device becomes the initial default output.
    pub fn new(devices: Vec<OutputDevice>) -> Self {
        let default_id = devices.first().map(|d| d.id.clone());
        Self {
            state: Mutex::new(MixerState {
                devices,
                default_id,
                volume: INITIAL_VOLUME,
                muted: false,
            }),
            listener: Mutex::new(None),
            volume_listener: Mutex::new(None),
            delivery: Mutex::new(()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let devices: Vec<OutputDevice> = config.devices.iter().map(|d| d.to_device()).collect();
        info!("Created virtual sound output with {} devices", devices.len());
        Self::new(devices)
    }

    fn notify_default_changed(&self, device: OutputDevice) {
        let callback = self.listener.lock().clone();
        if let Some(callback) = callback {
            let _delivery = self.delivery.lock();
            debug!("Delivering default output change: {}", device);
            callback(device);
        }
    }

    fn notify_volume_changed(&self, volume: f32) {
        let callback = self.volume_listener.lock().clone();
        if let Some(callback) = callback {
            let _delivery = self.delivery.lock();
            debug!("Delivering volume change: {:.2}", volume);
            callback(volume);
        }
    }
}

impl SoundOutputInterface for VirtualSoundOutput {
    fn get_volume(&self) -> Result<f32> {
        Ok(self.state.lock().volume)
    }

    fn set_volume(&self, volume: f32) -> Result<()> {
        let volume = volume.clamp(0.0, 1.0);
        let changed = {
            let mut state = self.state.lock();
            let changed = state.volume != volume;
            state.volume = volume;
            changed
        };

        if changed {
            self.notify_volume_changed(volume);
        }
        Ok(())
    }

    fn get_mute(&self) -> Result<bool> {
        Ok(self.state.lock().muted)
    }

    // A mute toggle reports the unchanged volume level, as mixer control
    // notifications do.
    fn set_mute(&self, muted: bool) -> Result<()> {
        let changed = {
            let mut state = self.state.lock();
            let changed = state.muted != muted;
            state.muted = muted;
            changed.then_some(state.volume)
        };

        if let Some(volume) = changed {
            self.notify_volume_changed(volume);
        }
        Ok(())
    }

    fn retrieve_default_output_device(&self) -> Result<OutputDevice> {
        let state = self.state.lock();
        state
            .default_id
            .as_ref()
            .and_then(|id| state.devices.iter().find(|d| &d.id == id))
            .cloned()
            .ok_or_else(|| anyhow!("No default output device"))
    }

    fn set_default_output_device(&self, device_id: &str) -> Result<()> {
        let changed = {
            let mut state = self.state.lock();
            let device = state
                .devices
                .iter()
                .find(|d| d.id == device_id)
                .cloned()
                .ok_or_else(|| anyhow!("Unknown output device: {}", device_id))?;

            if state.default_id.as_deref() == Some(device_id) {
                None
            } else {
                state.default_id = Some(device.id.clone());
                Some(device)
            }
        };

        if let Some(device) = changed {
            info!("Default output device changed to {}", device);
            self.notify_default_changed(device);
        }
        Ok(())
    }

    fn retrieve_output_devices(&self) -> Result<Vec<OutputDevice>> {
        Ok(self.state.lock().devices.clone())
    }

    fn add_default_output_device_listener(&self, callback: DeviceChangeCallback) -> Result<()> {
        let mut listener = self.listener.lock();
        if listener.is_some() {
            bail!("Default output device listener already registered");
        }
        *listener = Some(Arc::new(callback));
        Ok(())
    }

    fn remove_default_output_device_listener(&self) -> Result<()> {
        self.listener.lock().take();
        Ok(())
    }

    fn add_volume_listener(&self, callback: VolumeChangeCallback) -> Result<()> {
        let mut listener = self.volume_listener.lock();
        if listener.is_some() {
            bail!("Volume listener already registered");
        }
        *listener = Some(Arc::new(callback));
        Ok(())
    }

    fn remove_volume_listener(&self) -> Result<()> {
        self.volume_listener.lock().take();
        Ok(())
    }
}

/// Production implementation of FileSystemInterface using std::fs
pub struct StandardFileSystem;

impl FileSystemInterface for StandardFileSystem {
    fn read_config_file(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| anyhow!("Failed to read config file: {}", e))
    }

    fn write_config_file(&self, path: &Path, content: &str) -> Result<()> {
        std::fs::write(path, content).map_err(|e| anyhow!("Failed to write config file: {}", e))
    }

    fn config_file_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_config_dir(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .map_err(|e| anyhow!("Failed to create config directory: {}", e))
    }
}

impl Default for StandardFileSystem {
    fn default() -> Self {
        Self
    }
}
