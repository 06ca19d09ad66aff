pub mod constants;
mod gate;
pub mod handler;
pub mod notifier;
pub mod request;
pub mod stream;
pub mod volume_notifier;

pub use constants::{ErrorCode, ErrorMessage, MethodArg, MethodName};
pub use handler::MethodHandler;
pub use notifier::{EventSink, OutputDeviceNotifier};
pub use request::{ListenRequest, MethodCall};
pub use stream::{DefaultOutputDeviceStream, VolumeStream};
pub use volume_notifier::{VolumeNotifier, VolumeSink};
