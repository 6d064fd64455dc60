//! Quote sources.
//!
//! Defines the `QuoteSource` trait and provides the HTTP implementation
//! against the Jupiter swap-quote aggregator.

pub mod jupiter;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{Quote, QuoteRequest};

/// Abstraction over a swap-quoting aggregator.
///
/// `Ok(None)` means the venue has no route for the request. `Err` covers
/// transport failures, non-success statuses and unparsable bodies.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch the single best direct route for the request's venue.
    async fn get_quote(&self, request: &QuoteRequest) -> Result<Option<Quote>>;

    /// Source name for logging.
    fn name(&self) -> &str;
}
