use crate::constants::SNAPSHOT_UNREADABLE_EVENT;
use crate::errors::{ClientError, ErrorKind};
use crate::Value;
use log::warn;
use std::collections::{BTreeMap, HashMap};

/// Serializes the override map into its persisted form, a flat JSON object.
///
/// Keys are written in sorted order so equal maps always produce equal snapshots.
pub fn to_snapshot(overrides: &HashMap<String, Value>) -> Result<String, ClientError> {
    let ordered = overrides.iter().collect::<BTreeMap<&String, &Value>>();
    serde_json::to_string(&ordered).map_err(|err| {
        ClientError::new(
            ErrorKind::SnapshotSerializationFailure,
            format!("Failed to serialize flag overrides ({err})."),
        )
    })
}

/// Parses a persisted snapshot. Anything unreadable is treated as no overrides.
///
/// Entries holding a non-scalar JSON value are skipped, the rest are kept.
pub fn from_snapshot(snapshot: &str) -> HashMap<String, Value> {
    let parsed = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(snapshot);
    match parsed {
        Ok(object) => object
            .iter()
            .filter_map(|(k, v)| match Value::from_json_val(v) {
                Some(val) => Some((k.clone(), val)),
                None => {
                    warn!(event_id = SNAPSHOT_UNREADABLE_EVENT; "Ignoring persisted override '{k}' with a non-scalar value.");
                    None
                }
            })
            .collect(),
        Err(err) => {
            warn!(event_id = SNAPSHOT_UNREADABLE_EVENT; "Persisted flag overrides are unreadable, starting without overrides ({err}).");
            HashMap::new()
        }
    }
}
