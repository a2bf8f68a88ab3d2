//! Core HTTP operations with rate limiting
//!
//! Requests are paced with a token-bucket limiter and made exactly once:
//! a failed request is reported to the caller, never retried.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{clock::DefaultClock, state::InMemoryState, Jitter, Quota, RateLimiter};
use reqwest::Client;
use url::Url;

use crate::errors::{TransportError, TransportResult};

type DirectRateLimiter = RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>;

/// HTTP operations handler
#[derive(Debug)]
pub struct HttpHandler {
    client: Client,
    rate_limiter: DirectRateLimiter,
}

impl HttpHandler {
    /// Creates a new HttpHandler with the given client and rate limit
    ///
    /// # Errors
    ///
    /// Returns `TransportError::ClientSetup` if `rate_limit_rps` is zero
    pub fn new(client: Client, rate_limit_rps: u32) -> TransportResult<Self> {
        let rate_limiter = Self::build_rate_limiter(rate_limit_rps)?;
        Ok(Self {
            client,
            rate_limiter,
        })
    }

    fn build_rate_limiter(rate_limit_rps: u32) -> TransportResult<DirectRateLimiter> {
        let rps = NonZeroU32::new(rate_limit_rps).ok_or_else(|| TransportError::ClientSetup {
            reason: "Rate limit must be non-zero".to_string(),
        })?;
        Ok(RateLimiter::direct(Quota::per_second(rps)))
    }

    /// Sends a GET request and checks the status code
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Http` if the request fails and
    /// `TransportError::ServerError` on a non-success status
    pub async fn get_response(&self, url: &Url) -> TransportResult<reqwest::Response> {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
            .await;

        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!("GET {} returned HTTP {}", url, status.as_u16());
            return Err(TransportError::ServerError {
                status: status.as_u16(),
            });
        }

        tracing::debug!("Fetched response: {}", url);
        Ok(response)
    }

    /// Fetches the body of a page as text
    pub async fn get_page(&self, url: &Url) -> TransportResult<String> {
        let response = self.get_response(url).await?;
        let text = response.text().await?;
        tracing::debug!("Fetched page: {} ({} bytes)", url, text.len());
        Ok(text)
    }
}
