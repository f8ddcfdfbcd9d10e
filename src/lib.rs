//! Local feature flag overrides for development builds.
//!
//! [`Client`] wraps any [`FlagSource`]. In development mode, flags can be forced to a
//! local value that is persisted through an [`OverrideStorage`], change notifications
//! are delivered to subscribers, and an [`Inspector`] overlay lists the bool flags so
//! they can be toggled and reset. Outside development mode the client only delegates.

#![warn(missing_docs)]

#[macro_use]
mod macros;
mod builder;
mod client;
mod constants;
mod errors;
mod inspector;
mod notify;
mod ready;
mod source;
mod storage;
mod store;
mod utils;
mod value;

pub use builder::ClientBuilder;
pub use client::Client;
pub use constants::{DEFAULT_FILTER_KEY, DEFAULT_OVERRIDES_KEY, DEV_MODE_ENV_VAR, PKG_VERSION};
pub use errors::{ClientError, ErrorKind};
pub use inspector::{
    gesture::{DoubleTap, Key},
    view::FlagRow,
    Inspector, OverlayState,
};
pub use notify::{FlagDelta, Subscriber, SubscriberError, Subscribers};
pub use ready::ReadySignal;
pub use source::{
    file::{FileFlagSource, SimplifiedFlags},
    map::MapFlagSource,
    FlagSource,
};
pub use storage::{file::FileStorage, MemoryStorage, OverrideStorage, StorageError};
pub use store::OverrideStore;
pub use value::{Value, ValuePrimitive};
