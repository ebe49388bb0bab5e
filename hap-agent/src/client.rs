//! Signed HTTP dispatch against the HAP API
//!
//! `HapClient` owns the agent identity, signs every outgoing request,
//! and returns the response as data. It never errs on a non-2xx status;
//! classifying 200 vs 402 vs anything else is the caller's job
//! (see `agent.rs`). Only transport-level failures become errors.

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::config::AgentConfig;
use crate::error::HapError;
use crate::keys::HapSigningKey;
use crate::signer::RequestSigner;

/// Normalized response envelope: status, headers, raw body, and the
/// parsed body when (and only when) the raw bytes are valid JSON.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    pub json: Option<Value>,
}

impl ApiResponse {
    /// Assemble an envelope from raw parts, attempting the JSON parse.
    /// A body that is not JSON leaves `json` as `None`; that is data,
    /// not an error, at this layer.
    pub fn from_parts(status: u16, headers: HeaderMap, body: Vec<u8>) -> Self {
        let json = serde_json::from_slice(&body).ok();
        Self {
            status,
            headers,
            body,
            json,
        }
    }

    /// Body as text, for logging and error details.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP client that signs every request with the agent's HAP identity.
pub struct HapClient {
    api_base: String,
    signer: RequestSigner,
    http: reqwest::Client,
}

impl HapClient {
    /// Build a client from injected configuration. Fails only on bad key
    /// material; no network traffic happens here.
    pub fn new(config: &AgentConfig) -> Result<Self, HapError> {
        let key = HapSigningKey::from_base64url(&config.private_key_b64)?;
        let signer = RequestSigner::new(&config.agent_id, key);

        log::info!("[Hap] Initialized client for agent {}", config.agent_id);

        Ok(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            signer,
            http: crate::http::shared_client().clone(),
        })
    }

    pub fn agent_id(&self) -> &str {
        self.signer.agent_id()
    }

    /// Send a signed request and return the response unconditionally.
    ///
    /// The query string is built once, in the order the pairs are given,
    /// and that exact string is both signed and sent; any divergence
    /// between the two would break verification server-side.
    ///
    /// The body is attached only for mutating methods (POST/PUT/PATCH).
    /// GET/DELETE requests still sign the canonical body hash (of the
    /// empty body when `json_body` is `None`) but send none.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        json_body: Option<&Value>,
    ) -> Result<ApiResponse, HapError> {
        let path_with_query = join_query(path, query);
        let signed = self
            .signer
            .sign_request(method.as_str(), &path_with_query, json_body)?;

        let url = format!("{}{}", self.api_base, path_with_query);
        log::debug!("[Hap] {} {}", method, url);

        let mut req = self.http.request(method.clone(), &url);
        for (name, value) in &signed.headers {
            req = req.header(*name, value);
        }
        if method == Method::POST || method == Method::PUT || method == Method::PATCH {
            req = req.body(signed.body);
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?.to_vec();

        log::debug!("[Hap] {} {} -> {}", self.signer.agent_id(), path_with_query, status);

        Ok(ApiResponse::from_parts(status, headers, body))
    }
}

/// Append a form-urlencoded query string to a path. Pair order is
/// preserved as given; this is the canonical ordering the signature
/// covers, so callers must not re-sort between signing and sending.
pub fn join_query(path: &str, query: &[(&str, &str)]) -> String {
    if query.is_empty() {
        return path.to_string();
    }
    let qs = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query)
        .finish();
    format!("{}?{}", path, qs)
}
