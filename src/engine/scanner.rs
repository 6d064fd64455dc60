//! Cross-venue scan engine.
//!
//! Fetches a buy-direction and a sell-direction quote from every configured
//! venue concurrently, waits for all of them, then evaluates every ordered
//! (buy venue, sell venue) pair off the diagonal.

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::evaluator::RouteEvaluator;
use crate::config::ScanConfig;
use crate::quotes::QuoteSource;
use crate::types::{Quote, QuoteRequest, RouteCheckResult, Venue};

/// Both legs quoted on one venue for the current cycle.
#[derive(Debug, Clone, Default)]
pub struct VenueQuotes {
    /// quote asset → base asset
    pub buy: Option<Quote>,
    /// base asset → quote asset
    pub sell: Option<Quote>,
}

pub struct ScanEngine {
    source: Arc<dyn QuoteSource>,
    config: ScanConfig,
}

impl ScanEngine {
    pub fn new(source: Arc<dyn QuoteSource>, config: ScanConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Run one full fetch-and-evaluate pass.
    ///
    /// Issues exactly `2 × V` quote requests and returns `V × (V − 1)`
    /// results ordered buy-venue-major, sell-venue-minor, in configured
    /// venue order. Quote failures never escape; they become `NoRoute`.
    pub async fn scan_once(&self) -> Vec<RouteCheckResult> {
        let book = self.fetch_book().await;
        let results = evaluate_pairs(&self.config, &book);

        info!(
            source = self.source.name(),
            venues = self.config.venues.len(),
            quoted_buy = book.iter().filter(|q| q.buy.is_some()).count(),
            quoted_sell = book.iter().filter(|q| q.sell.is_some()).count(),
            routes = results.len(),
            "Scan pass complete"
        );

        results
    }

    /// Quote both legs on every venue. Index `i` matches `config.venues[i]`.
    pub async fn fetch_book(&self) -> Vec<VenueQuotes> {
        let cfg = &self.config;

        let per_venue = cfg.venues.iter().map(|&venue| async move {
            let buy = QuoteRequest::buy(&cfg.pair, cfg.trade_amount, venue);
            let sell = QuoteRequest::sell(&cfg.pair, cfg.trade_amount, venue);
            let (buy, sell) = tokio::join!(self.fetch(&buy), self.fetch(&sell));
            VenueQuotes { buy, sell }
        });

        join_all(per_venue).await
    }

    /// One quote, with every failure downgraded to "absent".
    async fn fetch(&self, request: &QuoteRequest) -> Option<Quote> {
        match self.source.get_quote(request).await {
            Ok(Some(quote)) => Some(quote),
            Ok(None) => {
                debug!(
                    venue = %request.venue,
                    input = %request.input_mint,
                    output = %request.output_mint,
                    "No route"
                );
                None
            }
            Err(e) => {
                warn!(
                    venue = %request.venue,
                    input = %request.input_mint,
                    output = %request.output_mint,
                    error = %e,
                    "Quote fetch failed, treating as no route"
                );
                None
            }
        }
    }
}

/// Evaluate every ordered venue pair against a fetched book.
///
/// `book[i]` must hold the quotes for `config.venues[i]`.
pub fn evaluate_pairs(config: &ScanConfig, book: &[VenueQuotes]) -> Vec<RouteCheckResult> {
    debug_assert_eq!(config.venues.len(), book.len());

    let evaluator = RouteEvaluator::new(
        &config.pair.label,
        config.trade_amount,
        config.profit_threshold,
    );

    let venues: Vec<(Venue, &VenueQuotes)> =
        config.venues.iter().copied().zip(book.iter()).collect();
    let n = venues.len();
    let mut results = Vec::with_capacity(n * n.saturating_sub(1));

    for (i, (buy_venue, buy_quotes)) in venues.iter().enumerate() {
        for (j, (sell_venue, sell_quotes)) in venues.iter().enumerate() {
            if i == j {
                continue;
            }
            results.push(evaluator.evaluate(
                *buy_venue,
                *sell_venue,
                buy_quotes.buy.as_ref(),
                sell_quotes.sell.as_ref(),
            ));
        }
    }

    results
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
