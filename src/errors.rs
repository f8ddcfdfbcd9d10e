use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error kind that represents failures reported by the [`crate::Client`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ErrorKind {
    /// The evaluation failed because of a type mismatch between the evaluated flag value and the specified default value.
    SettingValueTypeMismatch = 2002,
    /// The override snapshot could not be serialized.
    SnapshotSerializationFailure = 3104,
    /// One or more subscribers failed while an override change was published.
    SubscriberFailure = 3101,
    /// The override snapshot could not be written to the configured [`crate::OverrideStorage`].
    StorageWriteFailure = 3102,
    /// A storage slot key was empty.
    InvalidStorageKey = 3103,
    /// An override value can't be persisted faithfully (a NaN or infinite float).
    InvalidOverrideValue = 3105,
    /// The wrapped flag source did not become ready in time.
    ClientInitTimedOut = 4200,
}

impl ErrorKind {
    pub(crate) fn as_u16(&self) -> u16 {
        *self as u16
    }
}

/// Error struct that holds the [`ErrorKind`] and message of the reported failure.
#[derive(Debug, PartialEq)]
pub struct ClientError {
    /// Error kind that represents failures reported by the [`crate::Client`].
    pub kind: ErrorKind,
    /// The text representation of the failure.
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: ErrorKind, message: String) -> Self {
        Self { message, kind }
    }
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message.as_str())
    }
}

impl Error for ClientError {}
