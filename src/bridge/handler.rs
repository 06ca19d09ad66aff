use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::audio::{device_list_to_json_string, volume};
use crate::bridge::constants::MethodName;
use crate::bridge::request::MethodCall;
use crate::config::VolumeConfig;
use crate::error::{BridgeError, MethodError};
use crate::system::SoundOutputInterface;

/// Dispatches named method calls to the injected audio subsystem.
pub struct MethodHandler<S: SoundOutputInterface> {
    sound_output: Arc<S>,
    settings: VolumeConfig,
}

impl<S: SoundOutputInterface> MethodHandler<S> {
    pub fn new(sound_output: Arc<S>, settings: VolumeConfig) -> Self {
        Self {
            sound_output,
            settings,
        }
    }

    /// Handle one host call and produce either its result value or the wire
    /// error the host should see.
    pub fn handle(&self, method: &str, args: &Value) -> Result<Value, MethodError> {
        debug!("Handling method call: {}", method);

        let result = MethodCall::parse(method, args).and_then(|call| self.dispatch(call));
        result.map_err(|e| {
            warn!("Method call {} failed: {}", method, e);
            MethodError::from(e)
        })
    }

    pub fn dispatch(&self, call: MethodCall) -> Result<Value, BridgeError> {
        let method = call.method();
        let fail = |e: anyhow::Error| BridgeError::subsystem(method, e);

        match call {
            MethodCall::GetVolume => {
                let volume = self.sound_output.get_volume().map_err(fail)?;
                Ok(Value::from(volume as f64))
            }
            MethodCall::SetVolume {
                volume,
                show_system_ui,
            } => {
                log_system_ui(method, show_system_ui);
                if self.settings.unmute_on_set {
                    self.sound_output.set_mute(false).map_err(fail)?;
                }
                self.sound_output.set_volume(volume).map_err(fail)?;
                info!("Volume set to {:.2}", volume);
                Ok(Value::Null)
            }
            MethodCall::RaiseVolume {
                step,
                show_system_ui,
            } => {
                log_system_ui(method, show_system_ui);
                let step = step.unwrap_or(self.settings.default_step);
                let current = self.sound_output.get_volume().map_err(fail)?;
                let target = volume::raised(current, step);
                self.sound_output.set_volume(target).map_err(fail)?;
                debug!("Volume raised from {:.2} to {:.2}", current, target);
                Ok(Value::Null)
            }
            MethodCall::LowerVolume {
                step,
                show_system_ui,
            } => {
                log_system_ui(method, show_system_ui);
                let step = step.unwrap_or(self.settings.default_step);
                let current = self.sound_output.get_volume().map_err(fail)?;
                let target = volume::lowered(current, step);
                self.sound_output.set_volume(target).map_err(fail)?;
                debug!("Volume lowered from {:.2} to {:.2}", current, target);
                Ok(Value::Null)
            }
            MethodCall::GetMute => {
                let muted = self.sound_output.get_mute().map_err(fail)?;
                Ok(Value::Bool(muted))
            }
            MethodCall::SetMute {
                is_muted,
                show_system_ui,
            } => {
                log_system_ui(method, show_system_ui);
                self.sound_output.set_mute(is_muted).map_err(fail)?;
                info!("Mute set to {}", is_muted);
                Ok(Value::Null)
            }
            MethodCall::ToggleMute { show_system_ui } => {
                log_system_ui(method, show_system_ui);
                let muted = self.sound_output.get_mute().map_err(fail)?;
                self.sound_output.set_mute(!muted).map_err(fail)?;
                info!("Mute toggled to {}", !muted);
                Ok(Value::Null)
            }
            MethodCall::GetDefaultOutputDevice => {
                let device = self
                    .sound_output
                    .retrieve_default_output_device()
                    .map_err(fail)?;
                let json = device.to_json_string().map_err(fail)?;
                Ok(Value::String(json))
            }
            MethodCall::SetDefaultOutputDevice { device_id } => {
                self.sound_output
                    .set_default_output_device(&device_id)
                    .map_err(fail)?;
                info!("Default output device set to {}", device_id);
                Ok(Value::Null)
            }
            MethodCall::GetOutputDeviceList => {
                let devices = self.sound_output.retrieve_output_devices().map_err(fail)?;
                let json = device_list_to_json_string(&devices).map_err(fail)?;
                Ok(Value::String(json))
            }
        }
    }
}

fn log_system_ui(method: MethodName, show_system_ui: bool) {
    if show_system_ui {
        debug!("{} requested the system volume UI; no UI is driven here", method);
    }
}
