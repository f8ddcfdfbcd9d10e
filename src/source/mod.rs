use crate::{ReadySignal, Value};
use std::collections::HashMap;

pub mod file;
pub mod map;

/// The evaluation contract of the wrapped feature flag client.
///
/// Implementations evaluate flags from their own local state, so evaluation is
/// synchronous. The only asynchronous part is [`FlagSource::ready`].
pub trait FlagSource: Sync + Send {
    /// Gets the readiness signal of the source.
    fn ready(&self) -> ReadySignal;

    /// Evaluates the flag identified by `key`. Returns `default` when the flag doesn't exist.
    fn get_value(&self, key: &str, default: Value) -> Value;

    /// Evaluates all flags known by the source.
    fn get_all_values(&self) -> HashMap<String, Value>;
}

impl<S: FlagSource + ?Sized> FlagSource for std::sync::Arc<S> {
    fn ready(&self) -> ReadySignal {
        (**self).ready()
    }

    fn get_value(&self, key: &str, default: Value) -> Value {
        (**self).get_value(key, default)
    }

    fn get_all_values(&self) -> HashMap<String, Value> {
        (**self).get_all_values()
    }
}
