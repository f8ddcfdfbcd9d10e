use std::time::Duration;

/// Version of this crate.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default storage slot of the persisted overrides.
pub const DEFAULT_OVERRIDES_KEY: &str = "flag-overrides";
/// Default storage slot of the inspector's filter text.
pub const DEFAULT_FILTER_KEY: &str = "flag-inspector-filter";
/// Environment variable that turns development mode on.
pub const DEV_MODE_ENV_VAR: &str = "FLAG_INSPECTOR_DEV_MODE";
pub const DEFAULT_DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(200);

pub const SNAPSHOT_UNREADABLE_EVENT: u16 = 3100;
pub const SUBSCRIBER_FAILED_EVENT: u16 = 3101;
