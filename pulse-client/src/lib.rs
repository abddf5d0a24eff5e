//! Pulse Fetch Client
//!
//! Performs one HTTP GET per target and normalizes whatever happens into a
//! `FetchOutcome`. Transport errors never escape this crate.
//!
//! # Example
//!
//! ```no_run
//! use pulse_client::{Fetcher, HttpFetcher};
//! use pulse_core::domain::target::Target;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), reqwest::Error> {
//!     let fetcher = HttpFetcher::new(Some(Duration::from_secs(30)))?;
//!     let target = Target::parse("https://example.com").unwrap();
//!
//!     let outcome = fetcher.fetch(&target).await;
//!     println!("{:?}", outcome.result);
//!     Ok(())
//! }
//! ```

pub mod error;

pub use error::FetchError;

use async_trait::async_trait;
use pulse_core::domain::outcome::FetchOutcome;
use pulse_core::domain::target::Target;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Performs a single fetch against a target
///
/// Implementations must always resolve to an outcome; failures are
/// reported through `FetchResult::Failure`, never by panicking or erroring.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, target: &Target) -> FetchOutcome;
}

/// reqwest-backed fetcher
///
/// No retries. Redirects follow reqwest's default policy.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with an optional per-request timeout
    ///
    /// `None` leaves reqwest's default, which never times out.
    pub fn new(timeout: Option<Duration>) -> reqwest::Result<Self> {
        let mut builder =
            Client::builder().user_agent(concat!("pulse/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Create a fetcher around a preconfigured reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Issues the GET and returns the status code and reason phrase
    async fn request(&self, target: &Target) -> Result<(u16, String), FetchError> {
        let url = reqwest::Url::parse(&target.url)
            .map_err(|e| FetchError::RequestSetup(format!("invalid URL '{}': {}", target.url, e)))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_transport)?
            .error_for_status()
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        Ok((status.as_u16(), error::status_text(status)))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, target: &Target) -> FetchOutcome {
        debug!("Fetching {}", target);

        match self.request(target).await {
            Ok((status_code, status_text)) => {
                FetchOutcome::success(target.clone(), status_code, status_text)
            }
            Err(e) => {
                debug!("Fetch of {} failed: {}", target, e);
                FetchOutcome::failure(target.clone(), e.kind(), e.detail())
            }
        }
    }
}
