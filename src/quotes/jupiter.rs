//! Jupiter swap-quote aggregator integration.
//!
//! Endpoint: `GET {base}/v6/quote`
//! Every request is ExactIn, direct-routes-only and restricted to a single
//! venue via the `dexes` filter. The response carries a `data` array whose
//! first element is the best route.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::QuoteSource;
use crate::types::{ArbError, Quote, QuoteRequest};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const SOURCE_NAME: &str = "jupiter";
const QUOTE_PATH: &str = "/v6/quote";
const SWAP_MODE: &str = "ExactIn";

// ---------------------------------------------------------------------------
// API response types (Jupiter JSON → Rust)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(default)]
    data: Option<Vec<JupiterRoute>>,
}

/// One route. Only the amounts are read; everything else is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JupiterRoute {
    #[serde(default, deserialize_with = "amount_opt")]
    in_amount: Option<u64>,
    #[serde(default, deserialize_with = "amount_opt")]
    out_amount: Option<u64>,
}

/// Amounts arrive as decimal strings or plain integers.
fn amount_opt<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| de::Error::custom(format!("invalid amount {s:?}: {e}"))),
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Jupiter quote client. The inner `reqwest::Client` pools connections and
/// is shared by every concurrent fetch in a cycle.
pub struct JupiterClient {
    http: Client,
    base_url: String,
}

impl JupiterClient {
    /// `base_url` without the `/v6/quote` suffix, e.g. `https://quote-api.jup.ag`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("DEXARB/0.1.0 (quote-scanner)")
            .build()
            .context("Failed to build HTTP client for Jupiter")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Query string sent for a request, in wire order.
    fn query_params(request: &QuoteRequest) -> [(&'static str, String); 6] {
        [
            ("inputMint", request.input_mint.clone()),
            ("outputMint", request.output_mint.clone()),
            ("amount", request.amount.to_string()),
            ("swapMode", SWAP_MODE.to_string()),
            ("onlyDirectRoutes", "true".to_string()),
            ("dexes", request.venue.as_str().to_string()),
        ]
    }

    /// Pick the first route out of a response body.
    fn parse_quote(request: &QuoteRequest, body: &str) -> Result<Option<Quote>> {
        let parsed: QuoteResponse =
            serde_json::from_str(body).context("Failed to parse Jupiter quote response")?;

        let route = parsed.data.unwrap_or_default().into_iter().next();
        Ok(route.map(|r| Quote {
            input_mint: request.input_mint.clone(),
            output_mint: request.output_mint.clone(),
            venue: request.venue,
            in_amount: r.in_amount,
            out_amount: r.out_amount,
        }))
    }
}

// ---------------------------------------------------------------------------
// QuoteSource trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl QuoteSource for JupiterClient {
    async fn get_quote(&self, request: &QuoteRequest) -> Result<Option<Quote>> {
        let url = format!("{}{QUOTE_PATH}", self.base_url);

        debug!(
            venue = %request.venue,
            input = %request.input_mint,
            output = %request.output_mint,
            amount = request.amount,
            "Fetching Jupiter quote"
        );

        let resp = self
            .http
            .get(&url)
            .query(&Self::query_params(request))
            .send()
            .await
            .map_err(|e| ArbError::Quote {
                venue: request.venue,
                message: format!("request failed: {e}"),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ArbError::Quote {
                venue: request.venue,
                message: format!("HTTP {status}: {body}"),
            }
            .into());
        }

        let body = resp
            .text()
            .await
            .context("Failed to read Jupiter quote response")?;

        Self::parse_quote(request, &body)
    }

    fn name(&self) -> &str {
        SOURCE_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
