use crate::source::FlagSource;
use crate::{ReadySignal, Value};
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::Arc;

/// Flag source that serves values from an in-memory map.
///
/// Updates replace the whole snapshot, so readers never observe a half-applied change.
///
/// # Examples
///
/// ```rust
/// use flag_inspector::{FlagSource, MapFlagSource, Value};
///
/// let source = MapFlagSource::from([("dark_mode", Value::Bool(true))]);
/// assert_eq!(source.get_value("dark_mode", Value::Bool(false)), Value::Bool(true));
/// ```
pub struct MapFlagSource {
    values: ArcSwap<HashMap<String, Value>>,
    ready: ReadySignal,
}

impl MapFlagSource {
    /// Creates a [`MapFlagSource`] that is ready right away.
    pub fn new(values: HashMap<String, Value>) -> Self {
        Self {
            values: ArcSwap::from_pointee(values),
            ready: ReadySignal::resolved(),
        }
    }

    /// Creates a [`MapFlagSource`] that stays unready until [`MapFlagSource::mark_ready`] is called.
    pub fn pending(values: HashMap<String, Value>) -> Self {
        Self {
            values: ArcSwap::from_pointee(values),
            ready: ReadySignal::pending(),
        }
    }

    /// Resolves the readiness signal of the source.
    pub fn mark_ready(&self) {
        self.ready.resolve();
    }

    /// Sets the upstream value of a single flag.
    pub fn update(&self, key: &str, value: Value) {
        self.values.rcu(|current| {
            let mut next = HashMap::clone(current);
            next.insert(key.to_owned(), value.clone());
            next
        });
    }

    /// Replaces every upstream value.
    pub fn replace(&self, values: HashMap<String, Value>) {
        self.values.store(Arc::new(values));
    }
}

impl FlagSource for MapFlagSource {
    fn ready(&self) -> ReadySignal {
        self.ready.clone()
    }

    fn get_value(&self, key: &str, default: Value) -> Value {
        self.values.load().get(key).cloned().unwrap_or(default)
    }

    fn get_all_values(&self) -> HashMap<String, Value> {
        HashMap::clone(&self.values.load())
    }
}

impl From<HashMap<String, Value>> for MapFlagSource {
    fn from(value: HashMap<String, Value>) -> Self {
        Self::new(value)
    }
}

impl From<HashMap<&str, Value>> for MapFlagSource {
    fn from(value: HashMap<&str, Value>) -> Self {
        Self::new(
            value
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v))
                .collect(),
        )
    }
}

impl<const N: usize> From<[(&str, Value); N]> for MapFlagSource {
    /// # Examples
    ///
    /// ```rust
    /// use flag_inspector::{MapFlagSource, Value};
    ///
    /// let source: MapFlagSource = [("flag", Value::Bool(true))].into();
    /// ```
    fn from(arr: [(&str, Value); N]) -> Self {
        Self::new(HashMap::from_iter(
            arr.into_iter().map(|(k, v)| (k.to_owned(), v)),
        ))
    }
}
