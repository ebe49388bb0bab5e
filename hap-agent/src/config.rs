//! Agent configuration
//!
//! Supplied once at client construction by the embedding application.
//! The crate never reads environment variables or files itself; credential
//! sources (env, keystores, profile tables) are the caller's concern.

/// Configuration for one HAP agent identity.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// API origin, e.g. `https://api.example.com` (no trailing slash needed)
    pub api_base: String,
    /// Agent identifier issued by the API, e.g. `agent_...`
    pub agent_id: String,
    /// Raw P-256 private key scalar, url-safe base64 (padding optional)
    pub private_key_b64: String,
}

impl AgentConfig {
    pub fn new(api_base: &str, agent_id: &str, private_key_b64: &str) -> Self {
        Self {
            api_base: api_base.to_string(),
            agent_id: agent_id.to_string(),
            private_key_b64: private_key_b64.to_string(),
        }
    }
}
