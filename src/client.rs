use crate::builder::{ClientBuilder, InspectorOptions, Options};
use crate::errors::{ClientError, ErrorKind};
use crate::notify::Subscriber;
use crate::store::OverrideStore;
use crate::value::ValuePrimitive;
use crate::{FlagSource, Inspector, OverrideStorage, ReadySignal, Value};
use log::debug;
use std::any::type_name;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

struct DevTools {
    store: Arc<OverrideStore>,
    storage: Arc<dyn OverrideStorage>,
    changes: Arc<AtomicU64>,
    inspector: InspectorOptions,
}

/// Wraps an upstream [`FlagSource`] and, in development mode, lets flags be forced locally.
///
/// The client implements [`FlagSource`] itself: an overridden flag is answered from
/// the overrides without asking the upstream source, everything else is delegated
/// unchanged. Outside development mode there are no overrides, no persistence and no
/// [`Inspector`]; the override operations are no-ops.
///
/// # Examples
///
/// ```rust
/// use flag_inspector::{Client, FlagSource, MapFlagSource, Value};
///
/// let client = Client::builder(MapFlagSource::from([("dark_mode", Value::Bool(false))]))
///     .dev_mode(true)
///     .build()
///     .unwrap();
///
/// client.set("dark_mode", Value::Bool(true)).unwrap();
/// assert!(client.get_bool_value("dark_mode", false));
/// ```
pub struct Client<S: FlagSource + 'static> {
    upstream: Arc<S>,
    dev: Option<DevTools>,
}

impl<S: FlagSource + 'static> Client<S> {
    pub(crate) fn with_options(upstream: S, options: Options) -> Self {
        let upstream = Arc::new(upstream);
        let dev = if options.dev_mode {
            let store = OverrideStore::hydrate(
                Arc::clone(&upstream) as Arc<dyn FlagSource>,
                Arc::clone(&options.storage),
                options.overrides_key.as_str(),
            );
            let changes = Arc::new(AtomicU64::new(0));
            let counter = Arc::clone(&changes);
            store.subscribe(Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }));
            debug!("Development mode is on, flag overrides are enabled.");
            Some(DevTools {
                store: Arc::new(store),
                storage: options.storage,
                changes,
                inspector: options.inspector,
            })
        } else {
            None
        };
        Self { upstream, dev }
    }

    /// Creates a new [`ClientBuilder`] used to build a [`Client`] around `upstream`.
    pub fn builder(upstream: S) -> ClientBuilder<S> {
        ClientBuilder::new(upstream)
    }

    /// Creates a new [`Client`] with default options.
    ///
    /// Development mode is taken from the `FLAG_INSPECTOR_DEV_MODE` environment variable.
    pub fn new(upstream: S) -> Result<Self, ClientError> {
        ClientBuilder::new(upstream).build()
    }

    /// Returns `true` when overrides and the inspector are available.
    pub fn is_dev_mode(&self) -> bool {
        self.dev.is_some()
    }

    /// The wrapped upstream source.
    pub fn upstream(&self) -> &S {
        &self.upstream
    }

    /// The override store, present only in development mode.
    pub fn store(&self) -> Option<&Arc<OverrideStore>> {
        self.dev.as_ref().map(|dev| &dev.store)
    }

    /// Forces the flag identified by `key` to `value`.
    ///
    /// No-op outside development mode.
    ///
    /// # Errors
    ///
    /// This method fails when the overrides can't be persisted or a subscriber fails.
    /// In the latter case every other subscriber was still notified.
    pub fn set(&self, key: &str, value: Value) -> Result<(), ClientError> {
        match &self.dev {
            Some(dev) => dev.store.set(key, value),
            None => Ok(()),
        }
    }

    /// Removes the override of `key`; subscribers receive the current upstream value.
    ///
    /// No-op outside development mode.
    pub fn unset(&self, key: &str) -> Result<(), ClientError> {
        match &self.dev {
            Some(dev) => dev.store.unset(key),
            None => Ok(()),
        }
    }

    /// Removes every override; subscribers receive every upstream value.
    ///
    /// No-op outside development mode.
    pub fn unset_all(&self) -> Result<(), ClientError> {
        match &self.dev {
            Some(dev) => dev.store.unset_all(),
            None => Ok(()),
        }
    }

    /// Returns `upstream` with the active overrides applied.
    pub fn merge(&self, upstream: &HashMap<String, Value>) -> HashMap<String, Value> {
        match &self.dev {
            Some(dev) => dev.store.merge(upstream),
            None => upstream.clone(),
        }
    }

    /// Returns `true` when `key` has an override. Always `false` outside development mode.
    pub fn is_overridden(&self, key: &str) -> bool {
        self.dev
            .as_ref()
            .is_some_and(|dev| dev.store.is_overridden(key))
    }

    /// Registers a callback invoked with the changed flag values after every override
    /// change. Outside development mode nothing changes, so the callback is dropped.
    pub fn subscribe(&self, subscriber: Subscriber) {
        if let Some(dev) = &self.dev {
            dev.store.subscribe(subscriber);
        }
    }

    /// Creates an [`Inspector`] overlay bound to this client's overrides.
    ///
    /// Inspectors share one change subscription, so creating one per overlay opening
    /// is cheap. Returns [`None`] outside development mode.
    pub fn inspector(&self) -> Option<Inspector> {
        self.dev.as_ref().map(|dev| {
            Inspector::new(
                Arc::clone(&dev.store),
                Arc::clone(&dev.storage),
                Arc::clone(&dev.changes),
                dev.inspector.clone(),
            )
        })
    }

    /// Asynchronously waits for the upstream source to become ready, for a maximum
    /// duration specified in `wait_timeout`.
    ///
    /// Once the source is ready every further call returns immediately.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use flag_inspector::{Client, MapFlagSource, Value};
    ///
    /// #[tokio::main(flavor = "current_thread")]
    /// async fn main() {
    ///     let client = Client::new(MapFlagSource::from([("flag", Value::Bool(true))])).unwrap();
    ///     let client = client.wait_for_ready(Duration::from_secs(5)).await.unwrap();
    ///
    ///     assert!(client.get_bool_value("flag", false));
    /// }
    /// ```
    pub async fn wait_for_ready(&self, wait_timeout: Duration) -> Result<&Self, ClientError> {
        match timeout(wait_timeout, self.upstream.ready().wait()).await {
            Ok(()) => Ok(self),
            Err(_) => Err(log_client_err!(
                warn,
                ClientError::new(
                    ErrorKind::ClientInitTimedOut,
                    format!(
                        "Flag source was not ready after {}ms.",
                        wait_timeout.as_millis()
                    ),
                )
            )),
        }
    }

    /// Evaluates a bool feature flag identified by the given `key`.
    ///
    /// Returns `default` if the flag doesn't exist or is not a bool.
    pub fn get_bool_value(&self, key: &str, default: bool) -> bool {
        self.typed_value(key, default)
    }

    /// Evaluates a whole number flag identified by the given `key`.
    pub fn get_int_value(&self, key: &str, default: i64) -> i64 {
        self.typed_value(key, default)
    }

    /// Evaluates a decimal number flag identified by the given `key`.
    pub fn get_float_value(&self, key: &str, default: f64) -> f64 {
        self.typed_value(key, default)
    }

    /// Evaluates a text flag identified by the given `key`.
    pub fn get_str_value(&self, key: &str, default: String) -> String {
        self.typed_value(key, default)
    }

    fn typed_value<T: ValuePrimitive + Clone>(&self, key: &str, default: T) -> T {
        let value = FlagSource::get_value(self, key, default.clone().into());
        match T::from_value(&value) {
            Some(val) => val,
            None => {
                log_client_err!(
                    error,
                    ClientError::new(
                        ErrorKind::SettingValueTypeMismatch,
                        format!(
                            "The type of a flag must match the requested type. Flag '{key}' has a '{}' value but the requested type was '{}'.",
                            value.type_name(),
                            type_name::<T>()
                        ),
                    )
                );
                default
            }
        }
    }
}

impl<S: FlagSource + 'static> FlagSource for Client<S> {
    fn ready(&self) -> ReadySignal {
        self.upstream.ready()
    }

    fn get_value(&self, key: &str, default: Value) -> Value {
        if let Some(forced) = self.dev.as_ref().and_then(|dev| dev.store.get(key)) {
            return forced;
        }
        self.upstream.get_value(key, default)
    }

    fn get_all_values(&self) -> HashMap<String, Value> {
        self.merge(&self.upstream.get_all_values())
    }
}
