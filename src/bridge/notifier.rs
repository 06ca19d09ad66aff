//! Push feed of default output device changes.
//!
//! The notifier owns at most one listener registration with the audio
//! subsystem. Every change is serialized with
//! [`OutputDevice::to_json_string`](crate::audio::OutputDevice::to_json_string)
//! and handed to the caller's sink. With `emit_on_start`, the current device
//! goes out first through the same path.
//!
//! Ordering: the listener is registered before the initial device is fetched,
//! behind a gate that buffers callbacks until the initial event has been
//! delivered. A change racing with `start` is therefore neither lost nor
//! delivered ahead of the initial event.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::audio::OutputDevice;
use crate::bridge::gate::DeliveryGate;
use crate::error::BridgeError;
use crate::system::SoundOutputInterface;

/// Receives serialized devices. May be called from the audio subsystem's
/// notification thread.
pub type EventSink = Arc<dyn Fn(String) + Send + Sync>;

pub struct OutputDeviceNotifier<S: SoundOutputInterface> {
    sound_output: Arc<S>,
    subscription: Option<Arc<DeliveryGate<String>>>,
}

impl<S: SoundOutputInterface> OutputDeviceNotifier<S> {
    pub fn new(sound_output: Arc<S>) -> Self {
        Self {
            sound_output,
            subscription: None,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.subscription.is_some()
    }

    /// Subscribe `sink` to default output device changes.
    ///
    /// A second `start` while subscribed is rejected with
    /// [`BridgeError::AlreadyListening`] and leaves the live subscription
    /// untouched. Any failure leaves the notifier idle with no listener
    /// registered.
    pub fn start<F>(&mut self, emit_on_start: bool, sink: F) -> Result<(), BridgeError>
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        if self.subscription.is_some() {
            return Err(BridgeError::AlreadyListening);
        }

        let sink: EventSink = Arc::new(sink);
        let gate = Arc::new(DeliveryGate::new(sink));
        let listener_gate = Arc::clone(&gate);

        self.sound_output
            .add_default_output_device_listener(Box::new(move |device: OutputDevice| {
                match device.to_json_string() {
                    Ok(json) => listener_gate.deliver(json),
                    Err(e) => error!("Dropping default output device change: {:#}", e),
                }
            }))
            .map_err(|e| BridgeError::ListenerRegistration(format!("{e:#}")))?;

        let initial = if emit_on_start {
            let current = self
                .sound_output
                .retrieve_default_output_device()
                .and_then(|device| device.to_json_string());

            match current {
                Ok(json) => Some(json),
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
        info!(
            "Default output device listener registered (emit_on_start: {})",
            emit_on_start
        );
        Ok(())
    }

    /// Unsubscribe. Safe to call when idle; unregistration failures are
    /// logged and otherwise ignored.
    pub fn stop(&mut self) {
        let Some(gate) = self.subscription.take() else {
            debug!("Default output device listener not registered, nothing to stop");
            return;
        };

        gate.close();
        self.unregister();
        info!("Default output device listener removed");
    }

    fn unregister(&self) {
        if let Err(e) = self.sound_output.remove_default_output_device_listener() {
            warn!("Failed to remove default output device listener: {:#}", e);
        }
    }
}

impl<S: SoundOutputInterface> Drop for OutputDeviceNotifier<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
