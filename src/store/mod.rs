use crate::errors::{ClientError, ErrorKind};
use crate::notify::{FlagDelta, Subscriber, Subscribers};
use crate::store::snapshot::{from_snapshot, to_snapshot};
use crate::{FlagSource, OverrideStorage, Value};
use log::debug;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};

pub mod snapshot;

/// Locally forced flag values, mirrored to an [`OverrideStorage`] slot.
///
/// Every mutation writes the whole map to storage and then notifies the
/// subscribers. The map and its persisted copy are updated under one lock, which
/// is released before subscribers run, so subscribers are free to read the store.
pub struct OverrideStore {
    overrides: Mutex<HashMap<String, Value>>,
    upstream: Arc<dyn FlagSource>,
    storage: Arc<dyn OverrideStorage>,
    storage_key: String,
    subscribers: Subscribers,
}

impl OverrideStore {
    /// Creates a store and loads the overrides persisted under `storage_key`.
    ///
    /// A missing or unreadable snapshot results in an empty store.
    pub fn hydrate(
        upstream: Arc<dyn FlagSource>,
        storage: Arc<dyn OverrideStorage>,
        storage_key: &str,
    ) -> Self {
        let overrides = storage
            .read(storage_key)
            .map(|snapshot| from_snapshot(snapshot.as_str()))
            .unwrap_or_default();
        debug!("Loaded {} flag override(s) from '{storage_key}'.", overrides.len());
        Self {
            overrides: Mutex::new(overrides),
            upstream,
            storage,
            storage_key: storage_key.to_owned(),
            subscribers: Subscribers::new(),
        }
    }

    /// Forces `key` to `value` and notifies subscribers with `{key: value}`.
    ///
    /// # Errors
    ///
    /// Fails when `value` is a NaN or infinite float, which the snapshot can't hold
    /// (nothing changes then), when the snapshot can't be persisted (subscribers are
    /// not notified then, the in-memory override stays applied) or when a subscriber
    /// fails.
    pub fn set(&self, key: &str, value: Value) -> Result<(), ClientError> {
        if let Value::Float(f) = value {
            if !f.is_finite() {
                return Err(log_client_err!(
                    error,
                    ClientError::new(
                        ErrorKind::InvalidOverrideValue,
                        format!("Flag '{key}' can't be overridden with the non-finite number '{f}'."),
                    )
                ));
            }
        }
        {
            let mut overrides = self.lock();
            overrides.insert(key.to_owned(), value.clone());
            self.persist(&overrides)?;
        }
        debug!("Flag '{key}' overridden with '{value}'.");
        self.subscribers
            .publish(&FlagDelta::from([(key.to_owned(), value)]))
    }

    /// Removes the override of `key` and notifies subscribers with the value the
    /// upstream source reports for `key` right now.
    ///
    /// The notification is sent even when `key` wasn't overridden.
    pub fn unset(&self, key: &str) -> Result<(), ClientError> {
        {
            let mut overrides = self.lock();
            overrides.remove(key);
            self.persist(&overrides)?;
        }
        debug!("Override of flag '{key}' removed.");
        let value = self.upstream.get_value(key, Value::Bool(false));
        self.subscribers
            .publish(&FlagDelta::from([(key.to_owned(), value)]))
    }

    /// Removes every override and notifies subscribers with all upstream values.
    pub fn unset_all(&self) -> Result<(), ClientError> {
        {
            let mut overrides = self.lock();
            overrides.clear();
            self.persist(&overrides)?;
        }
        debug!("All flag overrides removed.");
        self.subscribers.publish(&self.upstream.get_all_values())
    }

    /// Returns `upstream` with every overridden key replaced by its override.
    pub fn merge(&self, upstream: &HashMap<String, Value>) -> HashMap<String, Value> {
        let mut merged = upstream.clone();
        merged.extend(
            self.lock()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        merged
    }

    /// The upstream source's current values with the overrides applied.
    pub fn merged_values(&self) -> HashMap<String, Value> {
        self.merge(&self.upstream.get_all_values())
    }

    /// Returns `true` when `key` has an override.
    pub fn is_overridden(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// The override of `key`, if any.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    /// A copy of the current overrides.
    pub fn overrides(&self) -> HashMap<String, Value> {
        self.lock().clone()
    }

    /// Appends a subscriber notified after every change. Subscribers can't be removed.
    pub fn subscribe(&self, subscriber: Subscriber) {
        self.subscribers.subscribe(subscriber);
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Value>> {
        self.overrides.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn persist(&self, overrides: &HashMap<String, Value>) -> Result<(), ClientError> {
        let snapshot = to_snapshot(overrides)?;
        self.storage
            .write(&self.storage_key, snapshot.as_str())
            .map_err(|err| {
                log_client_err!(
                    error,
                    ClientError::new(
                        ErrorKind::StorageWriteFailure,
                        format!(
                            "Failed to persist flag overrides to '{}' ({err}).",
                            self.storage_key
                        ),
                    )
                )
            })
    }
}

impl Debug for OverrideStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideStore")
            .field("storage_key", &self.storage_key)
            .field("overrides", &*self.lock())
            .finish_non_exhaustive()
    }
}
