//! HAP agent client: signed, billing-aware access to pay-per-call APIs
//!
//! The protocol flow:
//! 1. Canonicalize the request into a four-line signing string
//!    (method, path with query, unix timestamp, SHA-256 body hash)
//! 2. Sign it with the agent's P-256 key (ES256)
//! 3. Attach the HAP identity/signature headers and dispatch
//! 4. Classify the response: success, 402 payment-required with a
//!    checkout reference, or an unexpected status carried as data
//!
//! Configuration is injected via [`AgentConfig`]; the crate reads no
//! environment or files and installs no logger.

pub mod agent;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod keys;
pub mod signer;

pub use agent::{CallOutcome, TravelAgent, WalletRecord};
pub use client::{ApiResponse, HapClient};
pub use config::AgentConfig;
pub use error::HapError;
pub use keys::HapSigningKey;
pub use signer::{RequestSigner, SignedRequest};
