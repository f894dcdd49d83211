//! errors.rs - Custom error types for the logscrub-core library.
//!
//! Every fallible operation below the invocation adapters returns a [`ScrubError`].
//! The adapters never let one escape: they log it and fold it into the terminal
//! result of the active protocol.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// Boxed source error carried by store failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// This enum represents all possible error types in the `logscrub-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScrubError {
    /// Corrupt gzip stream, non UTF-8 payload or a line that is not valid JSON.
    #[error("Failed to decode record batch{}: {message}", line_suffix(.line))]
    Decode {
        line: Option<usize>,
        message: String,
    },

    /// Any failure of an `ObjectStore` primitive.
    #[error("Object store {op} failed for s3://{bucket}/{key}: {source}")]
    Store {
        op: &'static str,
        bucket: String,
        key: String,
        #[source]
        source: BoxError,
    },

    #[error("Unrecognized invocation event: neither 'Records' nor 'tasks'/'invocationSchemaVersion' present")]
    UnrecognizedEvent,

    /// The event shape was recognized but its payload is unusable.
    #[error("Invalid invocation event: {0}")]
    Event(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to encode record batch: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("An unexpected I/O error occurred: {0}")]
    Io(#[from] std::io::Error),
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" at line {l}")).unwrap_or_default()
}

impl ScrubError {
    /// Stable kind name, reported as `errorType` in structured failure logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ScrubError::Decode { .. } => "DecodeError",
            ScrubError::Store { .. } => "IOError",
            ScrubError::UnrecognizedEvent => "UnrecognizedEventError",
            ScrubError::Event(_) => "EventError",
            ScrubError::Config(_) => "ConfigError",
            ScrubError::Encode(_) => "EncodeError",
            ScrubError::Io(_) => "IOError",
        }
    }

    pub(crate) fn decode(line: Option<usize>, message: impl Into<String>) -> Self {
        ScrubError::Decode {
            line,
            message: message.into(),
        }
    }

    pub fn store(
        op: &'static str,
        bucket: &str,
        key: &str,
        source: impl Into<BoxError>,
    ) -> Self {
        ScrubError::Store {
            op,
            bucket: bucket.to_string(),
            key: key.to_string(),
            source: source.into(),
        }
    }
}
