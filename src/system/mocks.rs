use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::audio::OutputDevice;
use crate::system::traits::{
    DeviceChangeCallback, FileSystemInterface, SoundOutputInterface, VolumeChangeCallback,
};

/// Operations of [`SoundOutputInterface`] that can be forced to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    GetVolume,
    SetVolume,
    GetMute,
    SetMute,
    RetrieveDefaultOutputDevice,
    SetDefaultOutputDevice,
    RetrieveOutputDevices,
    AddListener,
    RemoveListener,
    AddVolumeListener,
    RemoveVolumeListener,
}

/// Mock audio subsystem for testing - controllable state, failure injection
/// and call recording
#[derive(Clone)]
pub struct MockSoundOutput {
    pub volume: Arc<Mutex<f32>>,
    pub muted: Arc<Mutex<bool>>,
    pub devices: Arc<Mutex<Vec<OutputDevice>>>,
    pub default_output: Arc<Mutex<Option<OutputDevice>>>,
    pub listener: Arc<Mutex<Option<Arc<DeviceChangeCallback>>>>,
    pub volume_listener: Arc<Mutex<Option<Arc<VolumeChangeCallback>>>>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub failing: Arc<Mutex<HashSet<MockOperation>>>,
    pub change_during_registration: Arc<Mutex<Option<OutputDevice>>>,
    pub volume_change_during_registration: Arc<Mutex<Option<f32>>>,
}

impl MockSoundOutput {
    pub fn new() -> Self {
        Self {
            volume: Arc::new(Mutex::new(0.5)),
            muted: Arc::new(Mutex::new(false)),
            devices: Arc::new(Mutex::new(Vec::new())),
            default_output: Arc::new(Mutex::new(None)),
            listener: Arc::new(Mutex::new(None)),
            volume_listener: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(Mutex::new(HashSet::new())),
            change_during_registration: Arc::new(Mutex::new(None)),
            volume_change_during_registration: Arc::new(Mutex::new(None)),
        }
    }

    /// Mock with the given devices, the first one being the default output
    pub fn with_devices(devices: Vec<OutputDevice>) -> Self {
        let mock = Self::new();
        *mock.default_output.lock().unwrap() = devices.first().cloned();
        *mock.devices.lock().unwrap() = devices;
        mock
    }

    pub fn set_mock_volume(&self, volume: f32) {
        *self.volume.lock().unwrap() = volume;
    }

    pub fn set_mock_muted(&self, muted: bool) {
        *self.muted.lock().unwrap() = muted;
    }

    pub fn set_mock_default_output(&self, device: Option<OutputDevice>) {
        *self.default_output.lock().unwrap() = device;
    }

    /// Change the default output and fire the registered listener, if any
    pub fn simulate_default_output_change(&self, device: OutputDevice) {
        *self.default_output.lock().unwrap() = Some(device.clone());
        let listener = self.listener.lock().unwrap().clone();
        if let Some(callback) = listener {
            callback(device);
        }
    }

    /// Fire `device` through the listener from inside the registration call,
    /// as a platform would when a change races with `add_*_listener`
    pub fn set_change_during_registration(&self, device: OutputDevice) {
        *self.change_during_registration.lock().unwrap() = Some(device);
    }

    /// Change the volume and fire the registered volume listener, if any
    pub fn simulate_volume_change(&self, volume: f32) {
        *self.volume.lock().unwrap() = volume;
        let listener = self.volume_listener.lock().unwrap().clone();
        if let Some(callback) = listener {
            callback(volume);
        }
    }

    /// Volume counterpart of [`MockSoundOutput::set_change_during_registration`]
    pub fn set_volume_change_during_registration(&self, volume: f32) {
        *self.volume_change_during_registration.lock().unwrap() = Some(volume);
    }

    pub fn set_failure(&self, operation: MockOperation, should_fail: bool) {
        let mut failing = self.failing.lock().unwrap();
        if should_fail {
            failing.insert(operation);
        } else {
            failing.remove(&operation);
        }
    }

    pub fn has_listener(&self) -> bool {
        self.listener.lock().unwrap().is_some()
    }

    pub fn has_volume_listener(&self) -> bool {
        self.volume_listener.lock().unwrap().is_some()
    }

    /// Names of every subsystem operation invoked so far, in order
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: String, operation: MockOperation) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(&operation) {
            return Err(anyhow::anyhow!("Mock {:?} failure", operation));
        }
        Ok(())
    }
}

impl SoundOutputInterface for MockSoundOutput {
    fn get_volume(&self) -> Result<f32> {
        self.record("get_volume".to_string(), MockOperation::GetVolume)?;
        Ok(*self.volume.lock().unwrap())
    }

    fn set_volume(&self, volume: f32) -> Result<()> {
        self.record(format!("set_volume({volume})"), MockOperation::SetVolume)?;
        *self.volume.lock().unwrap() = volume;
        Ok(())
    }

    fn get_mute(&self) -> Result<bool> {
        self.record("get_mute".to_string(), MockOperation::GetMute)?;
        Ok(*self.muted.lock().unwrap())
    }

    fn set_mute(&self, muted: bool) -> Result<()> {
        self.record(format!("set_mute({muted})"), MockOperation::SetMute)?;
        *self.muted.lock().unwrap() = muted;
        Ok(())
    }

    fn retrieve_default_output_device(&self) -> Result<OutputDevice> {
        self.record(
            "retrieve_default_output_device".to_string(),
            MockOperation::RetrieveDefaultOutputDevice,
        )?;
        self.default_output
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow::anyhow!("No default output device"))
    }

    fn set_default_output_device(&self, device_id: &str) -> Result<()> {
        self.record(
            format!("set_default_output_device({device_id})"),
            MockOperation::SetDefaultOutputDevice,
        )?;
        let device = self
            .devices
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == device_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Unknown output device: {}", device_id))?;
        *self.default_output.lock().unwrap() = Some(device);
        Ok(())
    }

    fn retrieve_output_devices(&self) -> Result<Vec<OutputDevice>> {
        self.record(
            "retrieve_output_devices".to_string(),
            MockOperation::RetrieveOutputDevices,
        )?;
        Ok(self.devices.lock().unwrap().clone())
    }

    fn add_default_output_device_listener(&self, callback: DeviceChangeCallback) -> Result<()> {
        self.record(
            "add_default_output_device_listener".to_string(),
            MockOperation::AddListener,
        )?;
        let callback = Arc::new(callback);
        *self.listener.lock().unwrap() = Some(Arc::clone(&callback));

        if let Some(device) = self.change_during_registration.lock().unwrap().take() {
            *self.default_output.lock().unwrap() = Some(device.clone());
            callback(device);
        }
        Ok(())
    }

    fn remove_default_output_device_listener(&self) -> Result<()> {
        self.record(
            "remove_default_output_device_listener".to_string(),
            MockOperation::RemoveListener,
        )?;
        *self.listener.lock().unwrap() = None;
        Ok(())
    }

    fn add_volume_listener(&self, callback: VolumeChangeCallback) -> Result<()> {
        self.record(
            "add_volume_listener".to_string(),
            MockOperation::AddVolumeListener,
        )?;
        let callback = Arc::new(callback);
        *self.volume_listener.lock().unwrap() = Some(Arc::clone(&callback));

        if let Some(volume) = self.volume_change_during_registration.lock().unwrap().take() {
            *self.volume.lock().unwrap() = volume;
            callback(volume);
        }
        Ok(())
    }

    fn remove_volume_listener(&self) -> Result<()> {
        self.record(
            "remove_volume_listener".to_string(),
            MockOperation::RemoveVolumeListener,
        )?;
        *self.volume_listener.lock().unwrap() = None;
        Ok(())
    }
}

impl Default for MockSoundOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// Mock file system for testing - provides controllable file operations
#[derive(Clone)]
pub struct MockFileSystem {
    pub files: Arc<Mutex<HashMap<PathBuf, String>>>,
    pub read_calls: Arc<Mutex<Vec<PathBuf>>>,
    pub write_calls: Arc<Mutex<Vec<(PathBuf, String)>>>,
    pub directory_creation_calls: Arc<Mutex<Vec<PathBuf>>>,
    pub should_fail_write: Arc<Mutex<bool>>,
    pub should_fail_create_dir: Arc<Mutex<bool>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            read_calls: Arc::new(Mutex::new(Vec::new())),
            write_calls: Arc::new(Mutex::new(Vec::new())),
            directory_creation_calls: Arc::new(Mutex::new(Vec::new())),
            should_fail_write: Arc::new(Mutex::new(false)),
            should_fail_create_dir: Arc::new(Mutex::new(false)),
        }
    }

    /// Add a file to the mock file system
    pub fn add_file<P: AsRef<Path>>(&self, path: P, content: String) {
        self.files
            .lock()
            .unwrap()
            .insert(path.as_ref().to_path_buf(), content);
    }

    pub fn get_read_calls(&self) -> Vec<PathBuf> {
        self.read_calls.lock().unwrap().clone()
    }

    pub fn get_write_calls(&self) -> Vec<(PathBuf, String)> {
        self.write_calls.lock().unwrap().clone()
    }

    pub fn get_directory_creation_calls(&self) -> Vec<PathBuf> {
        self.directory_creation_calls.lock().unwrap().clone()
    }

    pub fn set_write_failure(&self, should_fail: bool) {
        *self.should_fail_write.lock().unwrap() = should_fail;
    }

    pub fn set_create_dir_failure(&self, should_fail: bool) {
        *self.should_fail_create_dir.lock().unwrap() = should_fail;
    }
}

impl FileSystemInterface for MockFileSystem {
    fn read_config_file(&self, path: &Path) -> Result<String> {
        self.read_calls.lock().unwrap().push(path.to_path_buf());

        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("File not found: {}", path.display()))
    }

    fn write_config_file(&self, path: &Path, content: &str) -> Result<()> {
        self.write_calls
            .lock()
            .unwrap()
            .push((path.to_path_buf(), content.to_string()));

        if *self.should_fail_write.lock().unwrap() {
            return Err(anyhow::anyhow!("Mock write failure"));
        }

        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn config_file_exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn create_config_dir(&self, path: &Path) -> Result<()> {
        self.directory_creation_calls
            .lock()
            .unwrap()
            .push(path.to_path_buf());

        if *self.should_fail_create_dir.lock().unwrap() {
            return Err(anyhow::anyhow!("Mock create directory failure"));
        }

        Ok(())
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}
