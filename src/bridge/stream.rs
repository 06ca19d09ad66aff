use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use crate::bridge::notifier::OutputDeviceNotifier;
use crate::bridge::request::ListenRequest;
use crate::bridge::volume_notifier::VolumeNotifier;
use crate::error::{BridgeError, MethodError};
use crate::system::SoundOutputInterface;

/// Host-facing handler of the default output device event channel.
pub struct DefaultOutputDeviceStream<S: SoundOutputInterface> {
    notifier: OutputDeviceNotifier<S>,
}

impl<S: SoundOutputInterface> DefaultOutputDeviceStream<S> {
    pub fn new(sound_output: Arc<S>) -> Self {
        Self {
            notifier: OutputDeviceNotifier::new(sound_output),
        }
    }

    pub fn on_listen<F>(&mut self, args: &Value, sink: F) -> Result<(), MethodError>
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        let result = ListenRequest::parse(args)
            .and_then(|request| self.notifier.start(request.emit_on_start, sink));

        result.map_err(|e: BridgeError| {
            warn!("Failed to start default output device stream: {}", e);
            MethodError::from(e)
        })
    }

    pub fn on_cancel(&mut self) {
        self.notifier.stop();
    }

    pub fn is_listening(&self) -> bool {
        self.notifier.is_listening()
    }
}

/// Host-facing handler of the volume event channel.
pub struct VolumeStream<S: SoundOutputInterface> {
    notifier: VolumeNotifier<S>,
}

impl<S: SoundOutputInterface> VolumeStream<S> {
    pub fn new(sound_output: Arc<S>) -> Self {
        Self {
            notifier: VolumeNotifier::new(sound_output),
        }
    }

    pub fn on_listen<F>(&mut self, args: &Value, sink: F) -> Result<(), MethodError>
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        let result = ListenRequest::parse(args)
            .and_then(|request| self.notifier.start(request.emit_on_start, sink));

        result.map_err(|e: BridgeError| {
            warn!("Failed to start volume stream: {}", e);
            MethodError::from(e)
        })
    }

    pub fn on_cancel(&mut self) {
        self.notifier.stop();
    }

    pub fn is_listening(&self) -> bool {
        self.notifier.is_listening()
    }
}
