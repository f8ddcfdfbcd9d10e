use crate::constants::{
    DEFAULT_DOUBLE_TAP_WINDOW, DEFAULT_FILTER_KEY, DEFAULT_OVERRIDES_KEY, DEV_MODE_ENV_VAR,
};
use crate::errors::{ClientError, ErrorKind};
use crate::inspector::gesture::Key;
use crate::{Client, FlagSource, MemoryStorage, OverrideStorage};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Debug)]
pub(crate) struct InspectorOptions {
    pub(crate) filter_key: String,
    pub(crate) toggle_key: Key,
    pub(crate) cancel_key: Key,
    pub(crate) double_tap_window: Duration,
}

pub(crate) struct Options {
    pub(crate) dev_mode: bool,
    pub(crate) storage: Arc<dyn OverrideStorage>,
    pub(crate) overrides_key: String,
    pub(crate) inspector: InspectorOptions,
}

/// Builder to create a [`Client`] around an upstream [`FlagSource`].
///
/// Development mode defaults to the value of the `FLAG_INSPECTOR_DEV_MODE`
/// environment variable (`1`, `true`, `yes` or `on` turn it on).
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use flag_inspector::{Client, MapFlagSource, MemoryStorage, Value};
///
/// let client = Client::builder(MapFlagSource::from([("dark_mode", Value::Bool(false))]))
///     .dev_mode(true)
///     .storage(Box::new(MemoryStorage::new()))
///     .double_tap_window(Duration::from_millis(300))
///     .build()
///     .unwrap();
/// ```
pub struct ClientBuilder<S> {
    upstream: S,
    dev_mode: bool,
    storage: Option<Arc<dyn OverrideStorage>>,
    overrides_key: String,
    filter_key: String,
    toggle_key: Key,
    cancel_key: Key,
    double_tap_window: Duration,
}

impl<S: FlagSource + 'static> ClientBuilder<S> {
    pub(crate) fn new(upstream: S) -> Self {
        Self {
            upstream,
            dev_mode: dev_mode_from_env(),
            storage: None,
            overrides_key: DEFAULT_OVERRIDES_KEY.to_owned(),
            filter_key: DEFAULT_FILTER_KEY.to_owned(),
            toggle_key: Key::Control,
            cancel_key: Key::Escape,
            double_tap_window: DEFAULT_DOUBLE_TAP_WINDOW,
        }
    }

    /// Turns development mode on or off, regardless of the environment.
    ///
    /// Outside development mode the [`Client`] is a plain pass-through wrapper.
    pub fn dev_mode(mut self, enabled: bool) -> Self {
        self.dev_mode = enabled;
        self
    }

    /// Sets the [`OverrideStorage`] used to persist overrides and the inspector's filter.
    /// Default is a fresh [`MemoryStorage`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use flag_inspector::{Client, MapFlagSource, OverrideStorage, StorageError};
    ///
    /// let builder = Client::builder(MapFlagSource::new(HashMap::new()))
    ///     .storage(Box::new(CustomStorage {}));
    ///
    /// struct CustomStorage {}
    ///
    /// impl OverrideStorage for CustomStorage {
    ///     fn read(&self, key: &str) -> Option<String> {
    ///         // read the slot
    ///         None
    ///     }
    ///
    ///     fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
    ///         // write the slot
    ///         Ok(())
    ///     }
    /// }
    /// ```
    pub fn storage(mut self, storage: Box<dyn OverrideStorage>) -> Self {
        self.storage = Some(Arc::from(storage));
        self
    }

    /// Sets the storage slot holding the persisted overrides.
    /// Default value is `flag-overrides`.
    pub fn overrides_key(mut self, key: &str) -> Self {
        self.overrides_key = key.to_owned();
        self
    }

    /// Sets the storage slot holding the inspector's filter text.
    /// Default value is `flag-inspector-filter`.
    pub fn filter_key(mut self, key: &str) -> Self {
        self.filter_key = key.to_owned();
        self
    }

    /// Sets the key that opens the inspector when pressed twice.
    /// Default value is [`Key::Control`].
    pub fn toggle_key(mut self, key: Key) -> Self {
        self.toggle_key = key;
        self
    }

    /// Sets the key that closes the inspector.
    /// Default value is [`Key::Escape`].
    pub fn cancel_key(mut self, key: Key) -> Self {
        self.cancel_key = key;
        self
    }

    /// Sets the longest gap between the two presses of the toggle key.
    /// Default value is `200` milliseconds.
    pub fn double_tap_window(mut self, window: Duration) -> Self {
        self.double_tap_window = window;
        self
    }

    /// Creates a [`Client`] from the configuration made on the builder.
    ///
    /// # Errors
    ///
    /// This method fails if a storage slot key is empty or both slots use the same key.
    pub fn build(self) -> Result<Client<S>, ClientError> {
        if self.overrides_key.is_empty() || self.filter_key.is_empty() {
            return Err(ClientError::new(
                ErrorKind::InvalidStorageKey,
                "Storage slot keys cannot be empty".to_owned(),
            ));
        }
        if self.overrides_key == self.filter_key {
            return Err(ClientError::new(
                ErrorKind::InvalidStorageKey,
                format!(
                    "The overrides and the filter slots cannot share the key '{}'.",
                    self.overrides_key
                ),
            ));
        }
        let (upstream, options) = self.build_options();
        Ok(Client::with_options(upstream, options))
    }

    pub(crate) fn build_options(self) -> (S, Options) {
        let options = Options {
            dev_mode: self.dev_mode,
            storage: self
                .storage
                .unwrap_or_else(|| Arc::new(MemoryStorage::new())),
            overrides_key: self.overrides_key,
            inspector: InspectorOptions {
                filter_key: self.filter_key,
                toggle_key: self.toggle_key,
                cancel_key: self.cancel_key,
                double_tap_window: self.double_tap_window,
            },
        };
        (self.upstream, options)
    }
}

fn dev_mode_from_env() -> bool {
    is_truthy(std::env::var(DEV_MODE_ENV_VAR).ok().as_deref())
}

pub(crate) fn is_truthy(value: Option<&str>) -> bool {
    match value {
        Some(val) => matches!(
            val.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        None => false,
    }
}
