//! Push feed of output volume changes.
//!
//! Mirrors [`OutputDeviceNotifier`](crate::bridge::OutputDeviceNotifier): one
//! listener registration at most, the same delivery gate, and with
//! `emit_on_start` the current volume goes out before any change.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::bridge::gate::DeliveryGate;
use crate::error::BridgeError;
use crate::system::SoundOutputInterface;

/// Receives volume levels in `[0, 1]`.
pub type VolumeSink = Arc<dyn Fn(f32) + Send + Sync>;

pub struct VolumeNotifier<S: SoundOutputInterface> {
    sound_output: Arc<S>,
    subscription: Option<Arc<DeliveryGate<f32>>>,
}

impl<S: SoundOutputInterface> VolumeNotifier<S> {
    pub fn new(sound_output: Arc<S>) -> Self {
        Self {
            sound_output,
            subscription: None,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.subscription.is_some()
    }

    /// Subscribe `sink` to volume changes. Same failure and re-entrancy rules
    /// as the output device notifier.
    pub fn start<F>(&mut self, emit_on_start: bool, sink: F) -> Result<(), BridgeError>
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        if self.subscription.is_some() {
            return Err(BridgeError::AlreadyListening);
        }

        let sink: VolumeSink = Arc::new(sink);
        let gate = Arc::new(DeliveryGate::new(sink));
        let listener_gate = Arc::clone(&gate);

        self.sound_output
            .add_volume_listener(Box::new(move |volume: f32| listener_gate.deliver(volume)))
            .map_err(|e| BridgeError::ListenerRegistration(format!("{e:#}")))?;

        let initial = if emit_on_start {
            match self.sound_output.get_volume() {
                Ok(volume) => Some(volume),
                Err(e) => {
                    gate.close();
                    self.unregister();
                    return Err(BridgeError::ListenerRegistration(format!("{e:#}")));
                }
            }
        } else {
            None
        };

        gate.open(initial);
        self.subscription = Some(gate);
        info!("Volume listener registered (emit_on_start: {})", emit_on_start);
        Ok(())
    }

    pub fn stop(&mut self) {
        let Some(gate) = self.subscription.take() else {
            debug!("Volume listener not registered, nothing to stop");
            return;
        };

        gate.close();
        self.unregister();
        info!("Volume listener removed");
    }

    fn unregister(&self) {
        if let Err(e) = self.sound_output.remove_volume_listener() {
            warn!("Failed to remove volume listener: {:#}", e);
        }
    }
}

impl<S: SoundOutputInterface> Drop for VolumeNotifier<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
