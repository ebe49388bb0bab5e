//! Error taxonomy for the HAP client
//!
//! Key-material problems are fatal at construction. Transport failures
//! propagate unchanged. Non-2xx statuses are never errors here; the one
//! exception is a 200 whose body is not valid JSON, which is a protocol
//! violation by the server.

/// Errors produced by the HAP signing and dispatch layer.
#[derive(Debug)]
pub enum HapError {
    /// Decoded private key was not exactly 32 bytes
    InvalidKeyLength { got: usize },
    /// Private key string was not valid url-safe base64, or the decoded
    /// scalar was rejected by the P-256 curve
    InvalidKeyEncoding(String),
    /// Network-level failure (connect, DNS, timeout) from the HTTP stack
    Transport(reqwest::Error),
    /// A 200 response whose body could not be parsed as JSON
    MalformedResponse { status: u16, detail: String },
    /// Serialization failure that should not occur in practice
    Internal(String),
}

impl std::fmt::Display for HapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HapError::InvalidKeyLength { got } => {
                write!(f, "Expected 32 bytes for P-256 private key, got {}", got)
            }
            HapError::InvalidKeyEncoding(detail) => {
                write!(f, "Invalid private key encoding: {}", detail)
            }
            HapError::Transport(e) => write!(f, "Transport error: {}", e),
            HapError::MalformedResponse { status, detail } => {
                write!(f, "Malformed response (status {}): {}", status, detail)
            }
            HapError::Internal(detail) => write!(f, "Internal error: {}", detail),
        }
    }
}

impl std::error::Error for HapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HapError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HapError {
    fn from(e: reqwest::Error) -> Self {
        HapError::Transport(e)
    }
}
