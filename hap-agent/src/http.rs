use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

/// Global shared HTTP client for all HAP requests in the process.
///
/// One connection pool is enough: every request carries its own signed
/// headers, so nothing identity-specific lives on the client itself.
/// `Client::clone()` is just an `Arc` increment.
///
/// The 30s timeout covers the whole call and surfaces as a transport
/// error; callers that need a different deadline can override it
/// per-request via `.timeout()`.
static SHARED_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .pool_max_idle_per_host(5)
        .pool_idle_timeout(Duration::from_secs(90))
        .timeout(Duration::from_secs(30))
        .build()
        .expect("Failed to create shared HTTP client")
});

/// Returns a reference to the global shared HTTP client.
pub fn shared_client() -> &'static Client {
    &SHARED_CLIENT
}
