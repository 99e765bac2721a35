//! Error types for the protocol layer.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while encoding or decoding protocol messages.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Failed to serialize a request.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// Failed to parse a response body.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// A value was not valid base64.
    #[error("invalid base64 value: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = serde_json::from_slice::<u32>(b"nope").unwrap_err();
        let err = ProtocolError::Decode(err);
        assert!(err.to_string().starts_with("failed to decode response"));
    }
}
