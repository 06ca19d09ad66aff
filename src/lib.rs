pub mod audio;
pub mod bridge;
pub mod config;
pub mod error;
pub mod logging;
pub mod service;
pub mod system;

pub use audio::OutputDevice;
pub use bridge::{
    DefaultOutputDeviceStream, MethodHandler, MethodName, OutputDeviceNotifier, VolumeNotifier,
    VolumeStream,
};
pub use config::{Config, ConfigLoader};
pub use error::{BridgeError, MethodError};
pub use service::StdioService;
pub use system::*;
