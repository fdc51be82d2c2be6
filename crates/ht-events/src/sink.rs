//! Event sinks: where the engine's event stream goes.

use std::sync::Mutex;

use tokio::sync::mpsc;

use crate::Event;

/// Abstract outbound channel for engine events.
///
/// Implementations must be cheap and non-blocking: `emit` is called from
/// movement tasks and from under the dispatcher lock.  A sink that needs to
/// do slow work should hand the event off to its own task (as
/// [`ChannelSink`] does) rather than stall the caller.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

/// A sink that discards every event.  Useful for benchmarks and for engines
/// whose callers only consume command-API snapshots.
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: Event) {}
}

/// Forwards events into an unbounded tokio channel, typically drained by a
/// websocket writer task.
///
/// If the receiver has been dropped the event is discarded with a warning;
/// sink delivery failure never propagates to the dispatcher.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Event>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<Event>) -> Self {
        Self { tx }
    }

    /// Create a sink together with its receiving half.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: Event) {
        if self.tx.send(event).is_err() {
            tracing::warn!("event sink receiver dropped; event discarded");
        }
    }
}

/// Buffers every event in memory.  Intended for tests asserting on the
/// emitted stream.
#[derive(Default)]
pub struct CollectSink {
    events: Mutex<Vec<Event>>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything emitted so far.
    pub fn snapshot(&self) -> Vec<Event> {
        self.events.lock().expect("collect sink poisoned").clone()
    }

    /// Drain the buffer.
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock().expect("collect sink poisoned"))
    }
}

impl EventSink for CollectSink {
    fn emit(&self, event: Event) {
        self.events.lock().expect("collect sink poisoned").push(event);
    }
}
