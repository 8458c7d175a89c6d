// crates/mailtriage-server/src/http.rs
// Shared HTTP client for the completion API

use std::time::Duration;

/// Hard upper bound on a classification call
pub const CLASSIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Connect timeout (always below the request timeout)
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Create the shared HTTP client.
///
/// The request timeout bounds the whole exchange including the body read,
/// so a stalled upstream can never hold a request open past it.
pub fn create_shared_client(request_timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(request_timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(request_timeout))
        .pool_max_idle_per_host(10)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
