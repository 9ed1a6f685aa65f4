//! Quotes API client.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::commands::CommandEntry;

/// Errors that can occur while fetching a quote.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Quotes API returned status {0}")]
    Status(u16),

    #[error("Quotes API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected quotes response body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("No string bid for {lookup_key} in quotes response")]
    MissingBid { lookup_key: String },
}

impl QuoteError {
    /// True when the API answered but the response had an unexpected shape.
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(self, Self::InvalidBody(_) | Self::MissingBid { .. })
    }
}

/// A source of current bid prices.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetches the raw bid string for the entry's currency pair.
    async fn fetch_bid(&self, entry: &CommandEntry) -> Result<String, QuoteError>;
}

/// Client for `economia.awesomeapi.com.br`.
#[derive(Debug, Clone)]
pub struct AwesomeApiClient {
    client: Client,
    base_url: String,
}

impl AwesomeApiClient {
    /// Creates a client against the given base URL (e.g. `.../json/last`).
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// URL of the latest quote for a pair.
    #[must_use]
    pub fn quote_url(&self, pair_id: &str) -> String {
        format!("{}/{pair_id}", self.base_url)
    }
}

#[async_trait]
impl QuoteSource for AwesomeApiClient {
    async fn fetch_bid(&self, entry: &CommandEntry) -> Result<String, QuoteError> {
        let url = self.quote_url(&entry.pair_id);
        debug!("Fetching quote from {}", url);

        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(QuoteError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        extract_bid(&body, &entry.lookup_key)
    }
}

/// Extracts `body[lookup_key]["bid"]` from a quotes response.
///
/// The response is `{"USDBRL": {"bid": "5.48", ...}}`; inner values other
/// than strings are tolerated as long as `bid` itself is a string.
pub fn extract_bid(body: &str, lookup_key: &str) -> Result<String, QuoteError> {
    let mut quotes: HashMap<String, HashMap<String, serde_json::Value>> =
        serde_json::from_str(body)?;

    quotes
        .remove(lookup_key)
        .and_then(|mut fields| fields.remove("bid"))
        .and_then(|bid| match bid {
            serde_json::Value::String(s) => Some(s),
            _ => None,
        })
        .ok_or_else(|| QuoteError::MissingBid {
            lookup_key: lookup_key.to_owned(),
        })
}
