use anyhow::Result;
use std::path::Path;

use crate::audio::OutputDevice;

/// Callback fired by the audio subsystem with the new default output device.
pub type DeviceChangeCallback = Box<dyn Fn(OutputDevice) + Send + Sync>;

/// Callback fired by the audio subsystem with the current output volume
/// whenever the mixer's volume or mute control changes.
pub type VolumeChangeCallback = Box<dyn Fn(f32) + Send + Sync>;

/// Trait for the native audio subsystem the bridge delegates to.
///
/// Implementations own all OS interaction. Listener callbacks may be invoked
/// on any thread, but never concurrently for the same registration.
pub trait SoundOutputInterface: Send + Sync {
    /// Current output volume as a scalar in `[0, 1]`
    fn get_volume(&self) -> Result<f32>;

    fn set_volume(&self, volume: f32) -> Result<()>;

    fn get_mute(&self) -> Result<bool>;

    fn set_mute(&self, muted: bool) -> Result<()>;

    /// Fails when no default output device exists
    fn retrieve_default_output_device(&self) -> Result<OutputDevice>;

    fn set_default_output_device(&self, device_id: &str) -> Result<()>;

    fn retrieve_output_devices(&self) -> Result<Vec<OutputDevice>>;

    /// Register the single default-output-device change listener
    fn add_default_output_device_listener(&self, callback: DeviceChangeCallback) -> Result<()>;

    /// Drop the listener registered by `add_default_output_device_listener`
    fn remove_default_output_device_listener(&self) -> Result<()>;

    /// Register the single volume change listener
    fn add_volume_listener(&self, callback: VolumeChangeCallback) -> Result<()>;

    fn remove_volume_listener(&self) -> Result<()>;
}

/// Trait for file system operations - abstracts std::fs for testability
pub trait FileSystemInterface {
    fn read_config_file(&self, path: &Path) -> Result<String>;

    fn write_config_file(&self, path: &Path, content: &str) -> Result<()>;

    fn config_file_exists(&self, path: &Path) -> bool;

    fn create_config_dir(&self, path: &Path) -> Result<()>;
}
