//! Typed decoding of the loosely-typed argument maps a host sends.
//!
//! Every call is validated here, before anything reaches the audio subsystem.

use serde_json::{Map, Value};

use crate::audio::volume::{is_valid_step, is_valid_volume};
use crate::bridge::constants::{MethodArg, MethodName};
use crate::error::BridgeError;

#[derive(Debug, Clone, PartialEq)]
pub enum MethodCall {
    GetVolume,
    SetVolume { volume: f32, show_system_ui: bool },
    RaiseVolume { step: Option<f32>, show_system_ui: bool },
    LowerVolume { step: Option<f32>, show_system_ui: bool },
    GetMute,
    SetMute { is_muted: bool, show_system_ui: bool },
    ToggleMute { show_system_ui: bool },
    GetDefaultOutputDevice,
    SetDefaultOutputDevice { device_id: String },
    GetOutputDeviceList,
}

impl MethodCall {
    pub fn parse(method: &str, args: &Value) -> Result<Self, BridgeError> {
        let method: MethodName = method.parse().map_err(BridgeError::NotImplemented)?;
        let args = Arguments::new(args)?;

        let call = match method {
            MethodName::GetVolume => MethodCall::GetVolume,
            MethodName::SetVolume => {
                let volume = args.required_f32(MethodArg::VOLUME)?;
                if !is_valid_volume(volume) {
                    return Err(BridgeError::InvalidArgument(format!(
                        "'{}' must be within [0, 1], got {}",
                        MethodArg::VOLUME,
                        volume
                    )));
                }
                MethodCall::SetVolume {
                    volume,
                    show_system_ui: args.show_system_ui()?,
                }
            }
            MethodName::RaiseVolume => MethodCall::RaiseVolume {
                step: args.step()?,
                show_system_ui: args.show_system_ui()?,
            },
            MethodName::LowerVolume => MethodCall::LowerVolume {
                step: args.step()?,
                show_system_ui: args.show_system_ui()?,
            },
            MethodName::GetMute => MethodCall::GetMute,
            MethodName::SetMute => MethodCall::SetMute {
                is_muted: args.required_bool(MethodArg::IS_MUTED)?,
                show_system_ui: args.show_system_ui()?,
            },
            MethodName::ToggleMute => MethodCall::ToggleMute {
                show_system_ui: args.show_system_ui()?,
            },
            MethodName::GetDefaultOutputDevice => MethodCall::GetDefaultOutputDevice,
            MethodName::SetDefaultOutputDevice => {
                let device_id = args.required_str(MethodArg::DEVICE_ID)?;
                if device_id.is_empty() {
                    return Err(BridgeError::InvalidArgument(format!(
                        "'{}' must not be empty",
                        MethodArg::DEVICE_ID
                    )));
                }
                MethodCall::SetDefaultOutputDevice {
                    device_id: device_id.to_string(),
                }
            }
            MethodName::GetOutputDeviceList => MethodCall::GetOutputDeviceList,
        };
        Ok(call)
    }

    pub fn method(&self) -> MethodName {
        match self {
            MethodCall::GetVolume => MethodName::GetVolume,
            MethodCall::SetVolume { .. } => MethodName::SetVolume,
            MethodCall::RaiseVolume { .. } => MethodName::RaiseVolume,
            MethodCall::LowerVolume { .. } => MethodName::LowerVolume,
            MethodCall::GetMute => MethodName::GetMute,
            MethodCall::SetMute { .. } => MethodName::SetMute,
            MethodCall::ToggleMute { .. } => MethodName::ToggleMute,
            MethodCall::GetDefaultOutputDevice => MethodName::GetDefaultOutputDevice,
            MethodCall::SetDefaultOutputDevice { .. } => MethodName::SetDefaultOutputDevice,
            MethodCall::GetOutputDeviceList => MethodName::GetOutputDeviceList,
        }
    }
}

/// Arguments of a `listen` request on the default output device stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenRequest {
    pub emit_on_start: bool,
}

impl ListenRequest {
    pub fn parse(args: &Value) -> Result<Self, BridgeError> {
        let args = Arguments::new(args)?;
        Ok(Self {
            emit_on_start: args.required_bool(MethodArg::EMIT_ON_START)?,
        })
    }
}

struct Arguments<'a> {
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Arguments<'a> {
    /// `null` stands for "no arguments"; anything else must be an object.
    fn new(args: &'a Value) -> Result<Self, BridgeError> {
        match args {
            Value::Null => Ok(Self { map: None }),
            Value::Object(map) => Ok(Self { map: Some(map) }),
            other => Err(BridgeError::InvalidArgument(format!(
                "arguments must be a map, got {}",
                type_name(other)
            ))),
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map
            .and_then(|map| map.get(key))
            .filter(|value| !value.is_null())
    }

    fn missing(key: &str) -> BridgeError {
        BridgeError::InvalidArgument(format!("missing required argument '{key}'"))
    }

    fn wrong_type(key: &str, expected: &str, value: &Value) -> BridgeError {
        BridgeError::InvalidArgument(format!(
            "argument '{key}' must be a {expected}, got {}",
            type_name(value)
        ))
    }

    fn optional_f32(&self, key: &str) -> Result<Option<f32>, BridgeError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_f64()
                .map(|number| Some(number as f32))
                .ok_or_else(|| Self::wrong_type(key, "number", value)),
        }
    }

    fn required_f32(&self, key: &str) -> Result<f32, BridgeError> {
        self.optional_f32(key)?.ok_or_else(|| Self::missing(key))
    }

    fn optional_bool(&self, key: &str) -> Result<Option<bool>, BridgeError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_bool()
                .map(Some)
                .ok_or_else(|| Self::wrong_type(key, "bool", value)),
        }
    }

    fn required_bool(&self, key: &str) -> Result<bool, BridgeError> {
        self.optional_bool(key)?.ok_or_else(|| Self::missing(key))
    }

    fn required_str(&self, key: &str) -> Result<&'a str, BridgeError> {
        let value = self.get(key).ok_or_else(|| Self::missing(key))?;
        value
            .as_str()
            .ok_or_else(|| Self::wrong_type(key, "string", value))
    }

    fn show_system_ui(&self) -> Result<bool, BridgeError> {
        Ok(self.optional_bool(MethodArg::SHOW_SYSTEM_UI)?.unwrap_or(false))
    }

    fn step(&self) -> Result<Option<f32>, BridgeError> {
        let step = self.optional_f32(MethodArg::STEP)?;
        match step {
            Some(step) if !is_valid_step(step) => Err(BridgeError::InvalidArgument(format!(
                "'{}' must be within (0, 1], got {}",
                MethodArg::STEP,
                step
            ))),
            _ => Ok(step),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}
