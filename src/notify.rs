use crate::constants::SUBSCRIBER_FAILED_EVENT;
use crate::errors::{ClientError, ErrorKind};
use crate::Value;
use log::warn;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

/// The flag values changed by an override operation, keyed by flag key.
pub type FlagDelta = HashMap<String, Value>;

/// Error type a subscriber may return.
pub type SubscriberError = Box<dyn std::error::Error + Send + Sync>;

/// Callback invoked with every [`FlagDelta`].
pub type Subscriber = Box<dyn Fn(&FlagDelta) -> Result<(), SubscriberError> + Send + Sync>;

/// Ordered, append-only list of change subscribers.
#[derive(Default)]
pub struct Subscribers {
    list: RwLock<Vec<Arc<Subscriber>>>,
}

impl Subscribers {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `subscriber` to the end of the list.
    pub fn subscribe(&self, subscriber: Subscriber) {
        let mut list = self.list.write().unwrap_or_else(|e| e.into_inner());
        list.push(Arc::new(subscriber));
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.list.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Returns `true` when nobody subscribed yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers `delta` to every subscriber in registration order.
    ///
    /// A subscriber that fails (returns an error or panics) doesn't stop the delivery
    /// to the rest. When at least one failed, the returned error lists every failure.
    ///
    /// Subscribers added while a delta is being delivered receive the next one.
    pub fn publish(&self, delta: &FlagDelta) -> Result<(), ClientError> {
        let list = self.list.read().unwrap_or_else(|e| e.into_inner()).clone();
        let mut failures = Vec::<String>::new();
        for (index, subscriber) in list.iter().enumerate() {
            let outcome = match catch_unwind(AssertUnwindSafe(|| subscriber(delta))) {
                Ok(Ok(())) => continue,
                Ok(Err(err)) => err.to_string(),
                Err(panic) => panic_message(panic.as_ref()),
            };
            warn!(event_id = SUBSCRIBER_FAILED_EVENT; "Override subscriber #{index} failed: {outcome}");
            failures.push(format!("#{index}: {outcome}"));
        }
        if failures.is_empty() {
            return Ok(());
        }
        Err(ClientError::new(
            ErrorKind::SubscriberFailure,
            format!(
                "{} of {} override subscribers failed: [{}].",
                failures.len(),
                list.len(),
                failures.join(", ")
            ),
        ))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        return format!("panicked: {msg}");
    }
    if let Some(msg) = payload.downcast_ref::<String>() {
        return format!("panicked: {msg}");
    }
    "panicked".to_owned()
}
