use std::fmt;
use std::str::FromStr;

/// Every method the host can invoke on the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodName {
    GetVolume,
    SetVolume,
    RaiseVolume,
    LowerVolume,
    GetMute,
    SetMute,
    ToggleMute,
    GetDefaultOutputDevice,
    SetDefaultOutputDevice,
    GetOutputDeviceList,
}

impl MethodName {
    pub const ALL: [MethodName; 10] = [
        MethodName::GetVolume,
        MethodName::SetVolume,
        MethodName::RaiseVolume,
        MethodName::LowerVolume,
        MethodName::GetMute,
        MethodName::SetMute,
        MethodName::ToggleMute,
        MethodName::GetDefaultOutputDevice,
        MethodName::SetDefaultOutputDevice,
        MethodName::GetOutputDeviceList,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MethodName::GetVolume => "getVolume",
            MethodName::SetVolume => "setVolume",
            MethodName::RaiseVolume => "raiseVolume",
            MethodName::LowerVolume => "lowerVolume",
            MethodName::GetMute => "getMute",
            MethodName::SetMute => "setMute",
            MethodName::ToggleMute => "toggleMute",
            MethodName::GetDefaultOutputDevice => "getDefaultOutputDevice",
            MethodName::SetDefaultOutputDevice => "setDefaultOutputDevice",
            MethodName::GetOutputDeviceList => "getOutputDeviceList",
        }
    }
}

impl fmt::Display for MethodName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MethodName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MethodName::ALL
            .iter()
            .copied()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Argument keys carried in a method call or listen request.
pub struct MethodArg;

impl MethodArg {
    pub const VOLUME: &'static str = "volume";
    pub const STEP: &'static str = "step";
    pub const SHOW_SYSTEM_UI: &'static str = "showSystemUI";
    pub const EMIT_ON_START: &'static str = "emitOnStart";
    pub const IS_MUTED: &'static str = "isMuted";
    pub const DEVICE_ID: &'static str = "deviceId";
}

pub struct ErrorCode;

impl ErrorCode {
    pub const GET_VOLUME: &'static str = "1000";
    pub const SET_VOLUME: &'static str = "1001";
    pub const RAISE_VOLUME: &'static str = "1002";
    pub const LOWER_VOLUME: &'static str = "1003";
    pub const REGISTER_VOLUME_LISTENER: &'static str = "1004";
    pub const GET_MUTE: &'static str = "1005";
    pub const SET_MUTE: &'static str = "1006";
    pub const TOGGLE_MUTE: &'static str = "1007";
    pub const GET_DEFAULT_OUTPUT_DEVICE: &'static str = "1012";
    pub const SET_DEFAULT_OUTPUT_DEVICE: &'static str = "1013";
    pub const GET_OUTPUT_DEVICE_LIST: &'static str = "1014";
    pub const INVALID_ARGUMENT: &'static str = "1100";
    pub const NOT_IMPLEMENTED: &'static str = "notImplemented";

    pub fn for_method(method: MethodName) -> &'static str {
        match method {
            MethodName::GetVolume => Self::GET_VOLUME,
            MethodName::SetVolume => Self::SET_VOLUME,
            MethodName::RaiseVolume => Self::RAISE_VOLUME,
            MethodName::LowerVolume => Self::LOWER_VOLUME,
            MethodName::GetMute => Self::GET_MUTE,
            MethodName::SetMute => Self::SET_MUTE,
            MethodName::ToggleMute => Self::TOGGLE_MUTE,
            MethodName::GetDefaultOutputDevice => Self::GET_DEFAULT_OUTPUT_DEVICE,
            MethodName::SetDefaultOutputDevice => Self::SET_DEFAULT_OUTPUT_DEVICE,
            MethodName::GetOutputDeviceList => Self::GET_OUTPUT_DEVICE_LIST,
        }
    }
}

pub struct ErrorMessage;

impl ErrorMessage {
    pub const GET_VOLUME: &'static str = "Failed to get volume";
    pub const SET_VOLUME: &'static str = "Failed to set volume";
    pub const RAISE_VOLUME: &'static str = "Failed to raise volume";
    pub const LOWER_VOLUME: &'static str = "Failed to lower volume";
    pub const REGISTER_VOLUME_LISTENER: &'static str = "Failed to register volume listener";
    pub const GET_MUTE: &'static str = "Failed to get mute";
    pub const SET_MUTE: &'static str = "Failed to set mute";
    pub const TOGGLE_MUTE: &'static str = "Failed to toggle mute";
    pub const GET_DEFAULT_OUTPUT_DEVICE: &'static str = "Failed to get default output device";
    pub const SET_DEFAULT_OUTPUT_DEVICE: &'static str = "Failed to set default output device";
    pub const GET_OUTPUT_DEVICE_LIST: &'static str = "Failed to get output device list";
    pub const INVALID_ARGUMENT: &'static str = "Invalid argument";
    pub const NOT_IMPLEMENTED: &'static str = "Method not implemented";

    pub fn for_method(method: MethodName) -> &'static str {
        match method {
            MethodName::GetVolume => Self::GET_VOLUME,
            MethodName::SetVolume => Self::SET_VOLUME,
            MethodName::RaiseVolume => Self::RAISE_VOLUME,
            MethodName::LowerVolume => Self::LOWER_VOLUME,
            MethodName::GetMute => Self::GET_MUTE,
            MethodName::SetMute => Self::SET_MUTE,
            MethodName::ToggleMute => Self::TOGGLE_MUTE,
            MethodName::GetDefaultOutputDevice => Self::GET_DEFAULT_OUTPUT_DEVICE,
            MethodName::SetDefaultOutputDevice => Self::SET_DEFAULT_OUTPUT_DEVICE,
            MethodName::GetOutputDeviceList => Self::GET_OUTPUT_DEVICE_LIST,
        }
    }
}
