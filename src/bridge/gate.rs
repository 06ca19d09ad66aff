//! Ordering gate between a subsystem listener and the host's sink.
//!
//! Callbacks arriving before the gate opens are buffered. Opening delivers the
//! optional initial event, flushes the buffer in arrival order and then lets
//! callbacks through directly. Once closed, everything is dropped.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

pub(crate) type Sink<T> = Arc<dyn Fn(T) + Send + Sync>;

enum Delivery<T> {
    Buffering(Vec<T>),
    Live,
    Closed,
}

pub(crate) struct DeliveryGate<T> {
    delivery: Mutex<Delivery<T>>,
    sink: Sink<T>,
}

impl<T> DeliveryGate<T> {
    pub(crate) fn new(sink: Sink<T>) -> Self {
        Self {
            delivery: Mutex::new(Delivery::Buffering(Vec::new())),
            sink,
        }
    }

    // The lock is held across the sink call so flushes and live deliveries
    // cannot interleave.
    pub(crate) fn deliver(&self, event: T) {
        let mut delivery = self.delivery.lock();
        match &mut *delivery {
            Delivery::Buffering(pending) => pending.push(event),
            Delivery::Live => (self.sink)(event),
            Delivery::Closed => debug!("Dropping event delivered after stop"),
        }
    }

    pub(crate) fn open(&self, initial: Option<T>) {
        let mut delivery = self.delivery.lock();
        if let Some(event) = initial {
            (self.sink)(event);
        }
        if let Delivery::Buffering(pending) = std::mem::replace(&mut *delivery, Delivery::Live) {
            if !pending.is_empty() {
                debug!("Flushing {} buffered events", pending.len());
            }
            for event in pending {
                (self.sink)(event);
            }
        }
    }

    pub(crate) fn close(&self) {
        *self.delivery.lock() = Delivery::Closed;
    }
}
