use crate::builder::InspectorOptions;
use crate::errors::{ClientError, ErrorKind};
use crate::inspector::gesture::{DoubleTap, Key};
use crate::inspector::view::{build_rows, render, FlagRow};
use crate::store::OverrideStore;
use crate::{OverrideStorage, Value};
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

pub mod gesture;
pub mod view;

/// Visibility of the [`Inspector`] overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayState {
    /// The overlay is hidden. This is the initial state.
    Closed,
    /// The overlay lists the flags.
    Open,
}

/// Modal overlay listing the bool flags with their effective values, where each
/// flag can be forced on or off and overrides can be reset.
///
/// The inspector is headless: it turns key and click events into state changes and
/// override operations, and exposes the list as [`FlagRow`]s or as plain text.
/// It follows the client's override change counter and rebuilds its list on the
/// next [`Inspector::refresh`] while open, whoever made the change.
///
/// # Examples
///
/// ```rust
/// use std::time::{Duration, Instant};
/// use flag_inspector::{Client, Key, MapFlagSource, Value};
///
/// let client = Client::builder(MapFlagSource::from([("dark_mode", Value::Bool(false))]))
///     .dev_mode(true)
///     .build()
///     .unwrap();
/// let mut inspector = client.inspector().unwrap();
///
/// let now = Instant::now();
/// inspector.handle_key(Key::Control, now);
/// inspector.handle_key(Key::Control, now + Duration::from_millis(100));
/// assert!(inspector.is_open());
///
/// inspector.toggle("dark_mode").unwrap();
/// assert_eq!(inspector.rows()[0].status(), "On, Forced");
/// ```
pub struct Inspector {
    store: Arc<OverrideStore>,
    storage: Arc<dyn OverrideStorage>,
    options: InspectorOptions,
    state: OverlayState,
    double_tap: DoubleTap,
    filter: String,
    rows: Vec<FlagRow>,
    changes: Arc<AtomicU64>,
    seen: u64,
    stale: bool,
}

impl Inspector {
    pub(crate) fn new(
        store: Arc<OverrideStore>,
        storage: Arc<dyn OverrideStorage>,
        changes: Arc<AtomicU64>,
        options: InspectorOptions,
    ) -> Self {
        let seen = changes.load(Ordering::SeqCst);
        let filter = storage
            .read(options.filter_key.as_str())
            .unwrap_or_default();
        Self {
            store,
            storage,
            double_tap: DoubleTap::new(options.toggle_key, options.double_tap_window),
            options,
            state: OverlayState::Closed,
            filter,
            rows: Vec::new(),
            changes,
            seen,
            stale: true,
        }
    }

    /// The current visibility of the overlay.
    pub fn state(&self) -> OverlayState {
        self.state
    }

    /// Returns `true` while the overlay is open.
    pub fn is_open(&self) -> bool {
        self.state == OverlayState::Open
    }

    /// Feeds a key press that happened at `at`. Returns `true` when the overlay
    /// opened or closed because of it.
    ///
    /// While closed, a double tap of the toggle key opens the overlay. While open,
    /// the cancel key closes it.
    pub fn handle_key(&mut self, key: Key, at: Instant) -> bool {
        match self.state {
            OverlayState::Closed => {
                if self.double_tap.press(key, at) {
                    self.open();
                    return true;
                }
                false
            }
            OverlayState::Open => {
                if key == self.options.cancel_key {
                    self.close();
                    return true;
                }
                false
            }
        }
    }

    /// Handles a click outside the overlay's list. Returns `true` when it closed the overlay.
    pub fn click_outside(&mut self) -> bool {
        if self.is_open() {
            self.close();
            return true;
        }
        false
    }

    /// Opens the overlay and rebuilds the list.
    pub fn open(&mut self) {
        self.state = OverlayState::Open;
        self.stale = true;
        self.refresh();
        debug!("Flag inspector opened.");
    }

    /// Closes the overlay.
    pub fn close(&mut self) {
        self.state = OverlayState::Closed;
        self.double_tap.reset();
        debug!("Flag inspector closed.");
    }

    /// Rebuilds the list from the merged flag set if it's open and overrides changed
    /// since the last rebuild. Returns `true` when the list was rebuilt.
    pub fn refresh(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        let current = self.changes.load(Ordering::SeqCst);
        if !self.stale && current == self.seen {
            return false;
        }
        self.seen = current;
        self.stale = false;
        let merged = self.store.merged_values();
        self.rows = build_rows(&merged, &self.store, self.filter.as_str());
        true
    }

    /// The listed flags, as of the last rebuild.
    pub fn rows(&self) -> &[FlagRow] {
        &self.rows
    }

    /// The current filter text.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Restricts the list to flags whose key contains `filter`, and remembers the
    /// filter in storage for the next session.
    pub fn set_filter(&mut self, filter: &str) -> Result<(), ClientError> {
        self.filter = filter.to_owned();
        self.stale = true;
        self.refresh();
        self.storage
            .write(self.options.filter_key.as_str(), filter)
            .map_err(|err| {
                log_client_err!(
                    error,
                    ClientError::new(
                        ErrorKind::StorageWriteFailure,
                        format!("Failed to persist the inspector filter ({err})."),
                    )
                )
            })
    }

    /// Flips the effective value of a bool flag by forcing the opposite value.
    ///
    /// Flags that don't exist or aren't bool are left alone.
    pub fn toggle(&mut self, key: &str) -> Result<(), ClientError> {
        let current = self.store.merged_values().get(key).and_then(Value::as_bool);
        let result = match current {
            Some(enabled) => self.store.set(key, Value::Bool(!enabled)),
            None => Ok(()),
        };
        self.refresh();
        result
    }

    /// Removes the override of `key`.
    pub fn reset(&mut self, key: &str) -> Result<(), ClientError> {
        let result = self.store.unset(key);
        self.refresh();
        result
    }

    /// Removes every override and rebuilds the whole list.
    pub fn reset_all(&mut self) -> Result<(), ClientError> {
        let result = self.store.unset_all();
        self.stale = true;
        self.refresh();
        result
    }

    /// Renders the overlay as text, or returns [`None`] while it's closed.
    pub fn render(&mut self) -> Option<String> {
        if !self.is_open() {
            return None;
        }
        self.refresh();
        Some(render(&self.rows, self.filter.as_str()))
    }
}
