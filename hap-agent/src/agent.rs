//! Billing-aware agent behaviors on top of the signed client
//!
//! Wraps `HapClient` for the pay-per-call flight API:
//! - look up this agent's prepaid wallet via `/api/billing/agents`
//! - search flights and classify 200 vs 402 vs anything else
//!
//! A 402 is not an error here. It is actionable output carrying the
//! checkout reference a human must complete; the agent stops and never
//! retries on its own.

use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;

use crate::client::{ApiResponse, HapClient};
use crate::error::HapError;

/// Billing listing endpoint returning all wallet rows
pub const BILLING_AGENTS_PATH: &str = "/api/billing/agents";

/// Billed flight-search endpoint
pub const FLIGHT_SEARCH_PATH: &str = "/api/flights/search";

/// One agent's prepaid wallet row from the billing listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRecord {
    /// Empty when the server omitted `agentId`; never matches a real id
    #[serde(default)]
    pub agent_id: String,
    #[serde(default)]
    pub credits: u64,
}

#[derive(Debug, Deserialize)]
struct WalletListing {
    #[serde(default)]
    wallets: Vec<WalletRecord>,
}

/// Classified result of one billed API call.
#[derive(Debug)]
pub enum CallOutcome {
    /// 200 with a JSON payload
    Success(Value),
    /// 402: the call was valid but needs a completed payment first.
    /// `checkout_url` is absent when the server omitted it.
    PaymentRequired {
        checkout_url: Option<String>,
        body: Option<Value>,
    },
    /// Any other status, carried as data for the caller to interpret
    UnexpectedStatus {
        status: u16,
        body: Option<Value>,
        raw: Vec<u8>,
    },
}

impl CallOutcome {
    /// Classify a response envelope.
    ///
    /// A 200 whose body is not JSON is the one fatal case: the server
    /// broke the protocol, so the call cannot produce a usable result.
    pub fn from_response(resp: ApiResponse) -> Result<Self, HapError> {
        let ApiResponse {
            status, body, json, ..
        } = resp;

        match status {
            200 => match json {
                Some(payload) => Ok(CallOutcome::Success(payload)),
                None => Err(HapError::MalformedResponse {
                    status,
                    detail: format!(
                        "200 response is not JSON: {}",
                        String::from_utf8_lossy(&body)
                    ),
                }),
            },
            402 => {
                let checkout_url = json
                    .as_ref()
                    .and_then(|v| v.get("checkoutUrl"))
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string());
                log::info!(
                    "[Hap] Payment required, checkout url: {}",
                    checkout_url.as_deref().unwrap_or("<none>")
                );
                Ok(CallOutcome::PaymentRequired {
                    checkout_url,
                    body: json,
                })
            }
            status => Ok(CallOutcome::UnexpectedStatus {
                status,
                body: json,
                raw: body,
            }),
        }
    }
}

/// Select this agent's wallet row from a billing listing body.
fn select_wallet(body: &Value, agent_id: &str) -> Option<WalletRecord> {
    let listing: WalletListing = serde_json::from_value(body.clone()).ok()?;
    listing.wallets.into_iter().find(|w| w.agent_id == agent_id)
}

/// Agent wrapper around `HapClient` for the billed flight API.
pub struct TravelAgent {
    client: HapClient,
}

impl TravelAgent {
    pub fn new(client: HapClient) -> Self {
        Self { client }
    }

    pub fn agent_id(&self) -> &str {
        self.client.agent_id()
    }

    /// Fetch this agent's wallet row, if the billing listing has one.
    ///
    /// A non-200 listing is logged and treated as "no wallet"; only
    /// transport failures propagate.
    pub async fn wallet_snapshot(&self) -> Result<Option<WalletRecord>, HapError> {
        let resp = self
            .client
            .request(Method::GET, BILLING_AGENTS_PATH, &[], None)
            .await?;

        if resp.status != 200 {
            log::warn!(
                "[Hap] Failed to fetch billing snapshot: {} {}",
                resp.status,
                resp.text()
            );
            return Ok(None);
        }

        Ok(resp
            .json
            .as_ref()
            .and_then(|body| select_wallet(body, self.client.agent_id())))
    }

    /// Remaining prepaid credits; 0 when no wallet row exists.
    pub async fn current_credits(&self) -> Result<u64, HapError> {
        Ok(self
            .wallet_snapshot()
            .await?
            .map(|w| w.credits)
            .unwrap_or(0))
    }

    /// Send one signed call to a billed endpoint and classify the result.
    pub async fn invoke(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<CallOutcome, HapError> {
        let resp = self.client.request(method, path, query, body).await?;
        CallOutcome::from_response(resp)
    }

    /// Search flights as this agent.
    ///
    /// On `PaymentRequired` the caller should surface the checkout url
    /// to a human and stop; re-running after payment is their decision.
    pub async fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        date: &str,
    ) -> Result<CallOutcome, HapError> {
        log::info!(
            "[Hap] Searching flights {} -> {} on {} as agent {}",
            origin,
            destination,
            date,
            self.client.agent_id()
        );

        let query = [
            ("origin", origin),
            ("destination", destination),
            ("date", date),
        ];
        self.invoke(Method::GET, FLIGHT_SEARCH_PATH, &query, None)
            .await
    }
}
