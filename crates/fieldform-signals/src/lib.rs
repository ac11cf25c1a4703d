//! # fieldform-signals
//!
//! A small typed signal dispatcher. The form controller publishes its
//! success/failure notifications through a [`Signal`], and any presentation
//! layer (a toast queue, a log sink, a test) connects a receiver to it
//! without the controller knowing who is listening.
//!
//! ## Usage
//!
//! ```
//! use fieldform_signals::Signal;
//! use std::sync::Arc;
//!
//! let saved: Signal<String> = Signal::new();
//!
//! saved.connect("toast", Arc::new(|msg: &String| {
//!     println!("toast: {msg}");
//! }));
//!
//! let delivered = saved.send(&"Form saved".to_string());
//! assert_eq!(delivered, 1);
//! ```

use std::sync::{Arc, Mutex, RwLock};

/// The type signature for a signal receiver callback.
///
/// Receivers must be `Send + Sync` so that signals can be dispatched from
/// any thread or task.
pub type SignalReceiver<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A signal that can be connected to and dispatched.
///
/// Each signal carries a payload type `T`. Receivers are called in the order
/// they were connected.
pub struct Signal<T: 'static> {
    receivers: RwLock<Vec<(String, SignalReceiver<T>)>>,
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("receivers", &self.receiver_count())
            .finish()
    }
}

impl<T: 'static> Signal<T> {
    /// Creates a new signal with no connected receivers.
    pub fn new() -> Self {
        Self {
            receivers: RwLock::new(Vec::new()),
        }
    }

    /// Connects a receiver to this signal.
    ///
    /// The `receiver_id` is used to identify the receiver for later disconnection.
    /// If a receiver with the same ID is already connected, it is replaced.
    pub fn connect(&self, receiver_id: impl Into<String>, callback: SignalReceiver<T>) {
        let id = receiver_id.into();
        let mut receivers = self.receivers.write().expect("signal lock poisoned");

        if let Some(entry) = receivers.iter_mut().find(|(rid, _)| *rid == id) {
            entry.1 = callback;
        } else {
            receivers.push((id, callback));
        }
    }

    /// Disconnects the receiver with the given ID.
    ///
    /// Returns `true` if a receiver was found and removed.
    pub fn disconnect(&self, receiver_id: &str) -> bool {
        let mut receivers = self.receivers.write().expect("signal lock poisoned");
        let len_before = receivers.len();
        receivers.retain(|(id, _)| id != receiver_id);
        receivers.len() < len_before
    }

    /// Sends the signal to all connected receivers.
    ///
    /// Receivers are called in connection order. Returns how many receivers
    /// were called.
    pub fn send(&self, payload: &T) -> usize {
        // Clone the list so receivers may connect/disconnect re-entrantly.
        let receivers: Vec<SignalReceiver<T>> = self
            .receivers
            .read()
            .expect("signal lock poisoned")
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        if receivers.is_empty() {
            tracing::debug!("signal sent with no receivers connected");
        }

        for callback in &receivers {
            callback(payload);
        }
        receivers.len()
    }

    /// Returns the number of connected receivers.
    pub fn receiver_count(&self) -> usize {
        self.receivers.read().expect("signal lock poisoned").len()
    }
}

/// A receiver that keeps every payload it sees.
///
/// Useful as the backing queue of a toast area that drains on each render,
/// and in tests.
///
/// ```
/// use fieldform_signals::{Recorder, Signal};
///
/// let signal: Signal<u32> = Signal::new();
/// let recorder = Recorder::attach(&signal, "recorder");
/// signal.send(&7);
/// assert_eq!(recorder.drain(), vec![7]);
/// assert!(recorder.is_empty());
/// ```
#[derive(Debug)]
pub struct Recorder<T> {
    seen: Arc<Mutex<Vec<T>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            seen: Arc::clone(&self.seen),
        }
    }
}

impl<T: Clone + Send + 'static> Recorder<T> {
    /// Connects a new recorder to `signal` under `receiver_id`.
    pub fn attach(signal: &Signal<T>, receiver_id: impl Into<String>) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        signal.connect(
            receiver_id,
            Arc::new(move |payload: &T| {
                sink.lock().expect("recorder lock poisoned").push(payload.clone());
            }),
        );
        Self { seen }
    }

    /// Returns a copy of everything recorded so far.
    pub fn snapshot(&self) -> Vec<T> {
        self.seen.lock().expect("recorder lock poisoned").clone()
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&self) -> Vec<T> {
        std::mem::take(&mut *self.seen.lock().expect("recorder lock poisoned"))
    }

    /// Returns the number of recorded payloads.
    pub fn len(&self) -> usize {
        self.seen.lock().expect("recorder lock poisoned").len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_signal_connect_and_send() {
        let signal: Signal<String> = Signal::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();

        signal.connect(
            "counter",
            Arc::new(move |_: &String| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert_eq!(signal.send(&"saved".to_string()), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_signal_receivers_called_in_order() {
        let signal: Signal<()> = Signal::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let order = order.clone();
            signal.connect(
                name,
                Arc::new(move |(): &()| order.lock().unwrap().push(name)),
            );
        }

        signal.send(&());
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_signal_connect_same_id_replaces() {
        let signal: Signal<()> = Signal::new();
        signal.connect("toast", Arc::new(|(): &()| {}));
        signal.connect("toast", Arc::new(|(): &()| {}));
        assert_eq!(signal.receiver_count(), 1);
    }

    #[test]
    fn test_signal_disconnect() {
        let signal: Signal<()> = Signal::new();
        signal.connect("toast", Arc::new(|(): &()| {}));
        assert!(signal.disconnect("toast"));
        assert!(!signal.disconnect("toast"));
        assert_eq!(signal.receiver_count(), 0);
    }

    #[test]
    fn test_empty_signal_send() {
        let signal: Signal<()> = Signal::new();
        assert_eq!(signal.send(&()), 0);
    }

    #[test]
    fn test_reentrant_disconnect_does_not_deadlock() {
        let signal: Arc<Signal<()>> = Arc::new(Signal::new());
        let inner = Arc::clone(&signal);
        signal.connect(
            "once",
            Arc::new(move |(): &()| {
                inner.disconnect("once");
            }),
        );
        assert_eq!(signal.send(&()), 1);
        assert_eq!(signal.receiver_count(), 0);
    }

    #[test]
    fn test_recorder_snapshot_and_drain() {
        let signal: Signal<&'static str> = Signal::new();
        let recorder = Recorder::attach(&signal, "recorder");
        signal.send(&"one");
        signal.send(&"two");
        assert_eq!(recorder.snapshot(), vec!["one", "two"]);
        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.drain(), vec!["one", "two"]);
        assert!(recorder.is_empty());
    }
}
