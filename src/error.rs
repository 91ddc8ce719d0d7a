use std::time::Duration;
use thiserror::Error;

/// Errors raised by the controller session and its transport.
///
/// Connect-phase variants are retried by [`Session::connect`](crate::controller::session::Session::connect);
/// everything else is handed straight back to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("connection timed out after {0:?}")]
    ConnectionTimeout(Duration),

    #[error("invalid handshake response: {0}")]
    HandshakeInvalid(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("not connected to server")]
    NotConnected,

    #[error("command timed out after {0:?}")]
    CommandTimeout(Duration),

    #[error("command error: {0}")]
    CommandError(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("device identifier (mac) is required")]
    InvalidDeviceId,
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Creates an anyhow error prefixed with the current file and line number
#[macro_export]
macro_rules! file_error {
    ($($arg:tt)*) => {
        $crate::prelude::anyhow!(
            "[{}:{}] {}",
            std::path::Path::new(file!())
                .file_name()
                .map(|f| f.to_string_lossy())
                .unwrap_or_default(),
            line!(),
            format!($($arg)*)
        )
    };
}

/// Same as `file_error!`, but appends a source error
#[macro_export]
macro_rules! file_error_with_source {
    ($source:expr, $($arg:tt)*) => {
        $crate::prelude::anyhow!(
            "[{}:{}] {}: {}",
            std::path::Path::new(file!())
                .file_name()
                .map(|f| f.to_string_lossy())
                .unwrap_or_default(),
            line!(),
            format!($($arg)*),
            $source
        )
    };
}
