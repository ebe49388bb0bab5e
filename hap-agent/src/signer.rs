//! HAP request signing: canonical signing string + proof headers
//!
//! Signs outgoing HTTP requests so the HAP verifier can check the
//! caller's agent identity. The signing string covers method, path with
//! query, a unix-seconds timestamp, and a SHA-256 body hash:
//!
//! ```text
//! GET\n/api/flights/search?origin=SFO&destination=NRT&date=2025-01-01\n1700000000\n<body sha256 hex>
//! ```
//!
//! The path-with-query line must be byte-identical to what goes on the
//! wire; `HapClient` builds the query string once and reuses it for both.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::HapError;
use crate::keys::HapSigningKey;

/// Signature scheme tag prefixed to the `HAP-Signature` header value
pub const SIGNATURE_SCHEME: &str = "v0";

/// Fixed `Sec-Client-Class` value identifying automated callers
pub const CLIENT_CLASS: &str = "agent";

pub const HEADER_CLIENT_CLASS: &str = "Sec-Client-Class";
pub const HEADER_AGENT_ID: &str = "HAP-Agent-Id";
pub const HEADER_TIMESTAMP: &str = "X-HAP-Timestamp";
pub const HEADER_SIGNATURE: &str = "HAP-Signature";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

/// Headers plus the exact body bytes produced for one signed request.
///
/// The body here is authoritative: the transport must send these bytes
/// (for mutating methods) or the body hash in the signature will not
/// match what the server recomputes.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    /// Header name/value pairs in emission order
    pub headers: Vec<(&'static str, String)>,
    /// Canonical body bytes (empty when no body was supplied)
    pub body: Vec<u8>,
}

/// Signs outgoing requests for one agent identity.
pub struct RequestSigner {
    agent_id: String,
    key: HapSigningKey,
}

impl RequestSigner {
    pub fn new(agent_id: &str, key: HapSigningKey) -> Self {
        Self {
            agent_id: agent_id.to_string(),
            key,
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Public half of the signing key, for verification by callers/tests.
    pub fn verifying_key(&self) -> p256::ecdsa::VerifyingKey {
        self.key.verifying_key()
    }

    /// Sign an outgoing request and return the headers and body to send.
    ///
    /// * `method`          — HTTP method, e.g. `"GET"`, `"POST"`
    /// * `path_with_query` — path plus query string exactly as it will be
    ///   sent, e.g. `"/api/flights/search?origin=SFO"`
    /// * `body`            — JSON body for mutating methods, or `None`
    ///
    /// The timestamp is taken here, immediately before signing, so slow
    /// work in the caller cannot push it outside the server's skew window.
    pub fn sign_request(
        &self,
        method: &str,
        path_with_query: &str,
        body: Option<&Value>,
    ) -> Result<SignedRequest, HapError> {
        let body_bytes = match body {
            Some(value) => canonical_json_bytes(value)?,
            None => Vec::new(),
        };

        let timestamp = Utc::now().timestamp().to_string();
        let signing_string = build_signing_string(method, path_with_query, &timestamp, &body_bytes);

        let sig_b64 = URL_SAFE_NO_PAD.encode(self.key.sign(signing_string.as_bytes()));

        log::debug!(
            "[Hap] Signed {} {} as {} (ts {})",
            method.to_uppercase(),
            path_with_query,
            self.agent_id,
            timestamp
        );

        let headers = vec![
            (HEADER_CLIENT_CLASS, CLIENT_CLASS.to_string()),
            (HEADER_AGENT_ID, self.agent_id.clone()),
            (HEADER_TIMESTAMP, timestamp),
            (HEADER_SIGNATURE, format!("{}:{}", SIGNATURE_SCHEME, sig_b64)),
            (HEADER_CONTENT_TYPE, "application/json".to_string()),
        ];

        Ok(SignedRequest {
            headers,
            body: body_bytes,
        })
    }
}

/// Build the four-line signing string. No trailing newline.
pub fn build_signing_string(
    method: &str,
    path_with_query: &str,
    timestamp: &str,
    body_bytes: &[u8],
) -> String {
    let body_hash = hex::encode(Sha256::digest(body_bytes));
    format!(
        "{}\n{}\n{}\n{}",
        method.to_uppercase(),
        path_with_query,
        timestamp,
        body_hash
    )
}

/// Serialize a JSON body in canonical form: object keys sorted at every
/// depth, minimal `,`/`:` separators, UTF-8.
///
/// serde_json's default `Map` is already a `BTreeMap`, but that flips to
/// insertion order if any crate in the build enables `preserve_order`,
/// so the sort is done explicitly rather than inherited from the map.
pub fn canonical_json_bytes(value: &Value) -> Result<Vec<u8>, HapError> {
    let sorted = sort_keys(value);
    serde_json::to_vec(&sorted)
        .map_err(|e| HapError::Internal(format!("Failed to serialize request body: {}", e)))
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by_key(|(k, _)| k.as_str());
            // Inserting in sorted order keeps the result canonical even
            // when the underlying map preserves insertion order
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}
