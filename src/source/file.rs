use crate::source::FlagSource;
use crate::{ReadySignal, Value};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;

/// Represents upstream flag values in a simple JSON map format.
///
/// ```json
/// {
///   "flags": {
///     "dark_mode": true,
///     "theme": "blue",
///     "max_items": 10
///   }
/// }
/// ```
#[derive(Deserialize)]
pub struct SimplifiedFlags {
    /// The flag JSON map.
    pub flags: HashMap<String, serde_json::Value>,
}

/// Flag source that reads its values from a JSON file once, at construction.
pub struct FileFlagSource {
    values: HashMap<String, Value>,
    ready: ReadySignal,
}

impl FileFlagSource {
    /// Creates a new [`FileFlagSource`].
    ///
    /// # Errors
    ///
    /// This method fails in the following cases:
    /// - The given file doesn't exist or can't be read.
    /// - The given file's content is not deserializable to [`SimplifiedFlags`].
    /// - A flag's value is not a JSON scalar.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use flag_inspector::FileFlagSource;
    ///
    /// let source = FileFlagSource::new("path/to/flags.json").unwrap();
    /// ```
    pub fn new(file_path: &str) -> Result<Self, String> {
        let content = fs::read_to_string(file_path).map_err(|err| err.to_string())?;
        Self::from_json(content.as_str())
    }

    pub(crate) fn from_json(content: &str) -> Result<Self, String> {
        let simple =
            serde_json::from_str::<SimplifiedFlags>(content).map_err(|err| err.to_string())?;
        let mut values = HashMap::with_capacity(simple.flags.len());
        for (k, v) in simple.flags.iter() {
            match Value::from_json_val(v) {
                Some(val) => values.insert(k.clone(), val),
                None => return Err(format!("Value of flag '{k}' is invalid.")),
            };
        }
        Ok(Self {
            values,
            ready: ReadySignal::resolved(),
        })
    }
}

impl FlagSource for FileFlagSource {
    fn ready(&self) -> ReadySignal {
        self.ready.clone()
    }

    fn get_value(&self, key: &str, default: Value) -> Value {
        self.values.get(key).cloned().unwrap_or(default)
    }

    fn get_all_values(&self) -> HashMap<String, Value> {
        self.values.clone()
    }
}
