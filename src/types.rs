//! Shared types for the DEXARB scanner.
//!
//! These types form the data model used across all modules. Quotes and
//! route results live for a single scan cycle and are never persisted.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Venue
// ---------------------------------------------------------------------------

/// A decentralized-exchange liquidity source reachable through the
/// aggregator. The name is passed verbatim as the `dexes` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Venue {
    Raydium,
    Lifinity,
    Orca,
    Meteora,
    Jupiter,
}

impl Venue {
    /// Every known venue, in the default scan order.
    pub const ALL: [Venue; 5] = [
        Venue::Raydium,
        Venue::Lifinity,
        Venue::Orca,
        Venue::Meteora,
        Venue::Jupiter,
    ];

    /// Name as understood by the aggregator's `dexes` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Venue::Raydium => "Raydium",
            Venue::Lifinity => "Lifinity",
            Venue::Orca => "Orca",
            Venue::Meteora => "Meteora",
            Venue::Jupiter => "Jupiter",
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Venue {
    type Err = ArbError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Venue::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ArbError::Config(format!("unknown venue: {wanted:?}")))
    }
}

// ---------------------------------------------------------------------------
// Asset pair
// ---------------------------------------------------------------------------

/// The single pair being watched. `base` is the traded asset (e.g. SOL),
/// `quote` is the asset it is priced in (e.g. USDC).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPair {
    pub label: String,
    pub base_mint: String,
    pub quote_mint: String,
}

// ---------------------------------------------------------------------------
// Quotes
// ---------------------------------------------------------------------------

/// Parameters of one quote request to a single venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub input_mint: String,
    pub output_mint: String,
    /// Smallest indivisible unit of the input asset.
    pub amount: u64,
    pub venue: Venue,
}

impl QuoteRequest {
    /// Buy leg: spend the quote asset to receive the base asset.
    pub fn buy(pair: &AssetPair, amount: u64, venue: Venue) -> Self {
        Self {
            input_mint: pair.quote_mint.clone(),
            output_mint: pair.base_mint.clone(),
            amount,
            venue,
        }
    }

    /// Sell leg: spend the base asset to receive the quote asset.
    pub fn sell(pair: &AssetPair, amount: u64, venue: Venue) -> Self {
        Self {
            input_mint: pair.base_mint.clone(),
            output_mint: pair.quote_mint.clone(),
            amount,
            venue,
        }
    }
}

/// Best route returned by the aggregator for one venue.
///
/// Amount fields are optional because the aggregator may omit them;
/// the evaluator supplies fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub input_mint: String,
    pub output_mint: String,
    pub venue: Venue,
    pub in_amount: Option<u64>,
    pub out_amount: Option<u64>,
}

// ---------------------------------------------------------------------------
// Route evaluation
// ---------------------------------------------------------------------------

/// Classification of one (buy venue, sell venue) evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteReason {
    /// One or both legs had no quote.
    NoRoute,
    /// Profit did not clear `input × threshold`.
    BelowThreshold,
    Executable,
}

impl RouteReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteReason::NoRoute => "no-route",
            RouteReason::BelowThreshold => "below-threshold",
            RouteReason::Executable => "executable",
        }
    }
}

impl fmt::Display for RouteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating one ordered venue pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteCheckResult {
    pub pair: String,
    pub buy_venue: Venue,
    pub sell_venue: Venue,
    pub expected_input: u64,
    pub expected_output: u64,
    /// `expected_output - expected_input`; negative when the round trip loses.
    pub profit: i128,
    pub reason: RouteReason,
}

impl RouteCheckResult {
    pub fn is_executable(&self) -> bool {
        self.reason == RouteReason::Executable
    }
}

impl fmt::Display for RouteCheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] buy {} -> sell {} | in: {} | out: {} | profit: {} | {}",
            self.pair,
            self.buy_venue,
            self.sell_venue,
            self.expected_input,
            self.expected_output,
            self.profit,
            self.reason,
        )
    }
}

// ---------------------------------------------------------------------------
// Cycle report
// ---------------------------------------------------------------------------

/// Everything produced by one scan cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// 1-based cycle counter.
    pub cycle: u64,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub results: Vec<RouteCheckResult>,
}

impl CycleReport {
    /// Number of results with the given classification.
    pub fn count(&self, reason: RouteReason) -> usize {
        self.results.iter().filter(|r| r.reason == reason).count()
    }

    /// Highest-profit executable result, if any. Ties keep the earliest.
    pub fn best_executable(&self) -> Option<&RouteCheckResult> {
        self.results
            .iter()
            .filter(|r| r.is_executable())
            .fold(None, |best: Option<&RouteCheckResult>, r| match best {
                Some(b) if b.profit >= r.profit => Some(b),
                _ => Some(r),
            })
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for DEXARB.
#[derive(Debug, thiserror::Error)]
pub enum ArbError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Quote error ({venue}): {message}")]
    Quote { venue: Venue, message: String },

    #[error("Transaction decode error: {0}")]
    Decode(String),

    #[error("Transaction signing error: {0}")]
    Signing(String),

    #[error("Transaction submission error: {0}")]
    Submission(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
