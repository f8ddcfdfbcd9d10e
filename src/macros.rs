macro_rules! from_val_to_enum {
    ($ob:ident $to:ident $($t:ty)*) => ($(
        impl From<$t> for $ob {
            fn from(value: $t) -> Self {
                Self::$to(value)
            }
        }
    )*)
}

macro_rules! from_val_to_enum_into {
    ($ob:ident $to:ident $($t:ty)*) => ($(
        impl From<$t> for $ob {
            fn from(value: $t) -> Self {
                Self::$to(value.into())
            }
        }
    )*)
}

// Logs a `ClientError` with its kind as the `event_id` and hands it back.
macro_rules! log_client_err {
    ($lvl:ident, $err:expr) => {{
        let err = $err;
        log::$lvl!(event_id = err.kind.as_u16(); "{}", err);
        err
    }};
}
