//! Configuration loading from defaults, an optional TOML file, and the
//! process environment.
//!
//! The resulting `AppConfig` is built once at startup and passed
//! explicitly into the engine. Nothing downstream reads the environment.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::types::{ArbError, AssetPair, Venue};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_JUPITER_URL: &str = "https://quote-api.jup.ag";
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Wrapped SOL.
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";
/// USDC on Solana.
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qWVCN4zpwoS9E8oqecGbp6Dt1v";

const DEFAULT_PAIR_LABEL: &str = "SOL/USDC";
const DEFAULT_PROFIT_THRESHOLD: Decimal = dec!(0.0005); // 0.05%
const DEFAULT_SLIPPAGE_LIMIT: Decimal = dec!(0.005);
const DEFAULT_TRADE_AMOUNT: u64 = 100_000_000;
const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Env var naming the optional TOML file.
pub const CONFIG_PATH_ENV: &str = "DEXARB_CONFIG";

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub jupiter_url: String,
    /// RPC URLs from paid providers embed an API key.
    pub rpc_url: SecretString,
    pub keypair_path: Option<PathBuf>,
    pub http_timeout: Duration,
    pub scan: ScanConfig,
}

/// Everything the scan engine and loop need. Read-only after startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    pub pair: AssetPair,
    pub trade_amount: u64,
    pub profit_threshold: Decimal,
    /// Reserved. Parsed and validated but not consulted by evaluation.
    pub slippage_limit: Decimal,
    pub poll_interval: Duration,
    /// Ordered, no duplicates.
    pub venues: Vec<Venue>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            pair: AssetPair {
                label: DEFAULT_PAIR_LABEL.to_string(),
                base_mint: SOL_MINT.to_string(),
                quote_mint: USDC_MINT.to_string(),
            },
            trade_amount: DEFAULT_TRADE_AMOUNT,
            profit_threshold: DEFAULT_PROFIT_THRESHOLD,
            slippage_limit: DEFAULT_SLIPPAGE_LIMIT,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            venues: Venue::ALL.to_vec(),
        }
    }
}

impl ScanConfig {
    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ArbError> {
        if self.trade_amount == 0 {
            return Err(ArbError::Config("trade amount must be greater than zero".into()));
        }
        if self.profit_threshold.is_sign_negative() {
            return Err(ArbError::Config(format!(
                "profit threshold must not be negative: {}",
                self.profit_threshold
            )));
        }
        if self.slippage_limit.is_sign_negative() {
            return Err(ArbError::Config(format!(
                "slippage limit must not be negative: {}",
                self.slippage_limit
            )));
        }
        if self.poll_interval.is_zero() {
            return Err(ArbError::Config("poll interval must be greater than zero".into()));
        }
        if self.venues.is_empty() {
            return Err(ArbError::Config("venue list is empty".into()));
        }
        let mut seen = HashSet::new();
        for venue in &self.venues {
            if !seen.insert(venue) {
                return Err(ArbError::Config(format!("duplicate venue: {venue}")));
            }
        }
        if self.pair.base_mint == self.pair.quote_mint {
            return Err(ArbError::Config("base and quote mint are identical".into()));
        }
        Ok(())
    }
}

/// On-disk overrides. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    jupiter_url: Option<String>,
    rpc_url: Option<String>,
    keypair_path: Option<PathBuf>,
    http_timeout_secs: Option<u64>,
    pair_label: Option<String>,
    base_mint: Option<String>,
    quote_mint: Option<String>,
    trade_amount: Option<u64>,
    profit_threshold: Option<Decimal>,
    slippage_limit: Option<Decimal>,
    poll_interval_ms: Option<u64>,
    venues: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Load from the real process environment, honouring `DEXARB_CONFIG`.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Layering: defaults, then the TOML
    /// file named by `DEXARB_CONFIG` (if any), then individual variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match lookup(CONFIG_PATH_ENV) {
            Some(path) => Self::read_file(&path)?,
            None => FileConfig::default(),
        };

        let defaults = ScanConfig::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let venues = match get("VENUES") {
            Some(raw) => parse_venues(raw.split(','))?,
            None => match file.venues {
                Some(names) => parse_venues(names.iter().map(String::as_str))?,
                None => defaults.venues,
            },
        };

        let scan = ScanConfig {
            pair: AssetPair {
                label: get("PAIR_LABEL")
                    .or(file.pair_label)
                    .unwrap_or(defaults.pair.label),
                base_mint: get("BASE_MINT")
                    .or(file.base_mint)
                    .unwrap_or(defaults.pair.base_mint),
                quote_mint: get("QUOTE_MINT")
                    .or(file.quote_mint)
                    .unwrap_or(defaults.pair.quote_mint),
            },
            trade_amount: parse_var(get("TRADE_AMOUNT"), "TRADE_AMOUNT")?
                .or(file.trade_amount)
                .unwrap_or(defaults.trade_amount),
            profit_threshold: parse_var(get("PROFIT_THRESHOLD"), "PROFIT_THRESHOLD")?
                .or(file.profit_threshold)
                .unwrap_or(defaults.profit_threshold),
            slippage_limit: parse_var(get("SLIPPAGE_LIMIT"), "SLIPPAGE_LIMIT")?
                .or(file.slippage_limit)
                .unwrap_or(defaults.slippage_limit),
            poll_interval: parse_var::<u64>(get("POLL_INTERVAL_MS"), "POLL_INTERVAL_MS")?
                .or(file.poll_interval_ms)
                .map(Duration::from_millis)
                .unwrap_or(defaults.poll_interval),
            venues,
        };
        scan.validate()?;

        let http_timeout_secs = parse_var(get("HTTP_TIMEOUT_SECS"), "HTTP_TIMEOUT_SECS")?
            .or(file.http_timeout_secs)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
        if http_timeout_secs == 0 {
            return Err(ArbError::Config("HTTP_TIMEOUT_SECS must be greater than zero".into()).into());
        }

        Ok(Self {
            jupiter_url: get("JUPITER_API_URL")
                .or(file.jupiter_url)
                .unwrap_or_else(|| DEFAULT_JUPITER_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            rpc_url: SecretString::new(
                get("SOLANA_RPC_URL")
                    .or(file.rpc_url)
                    .unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
            ),
            keypair_path: get("KEYPAIR_PATH").map(PathBuf::from).or(file.keypair_path),
            http_timeout: Duration::from_secs(http_timeout_secs),
            scan,
        })
    }

    fn read_file(path: &str) -> Result<FileConfig> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: FileConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }
}

fn parse_var<T>(raw: Option<String>, key: &str) -> Result<Option<T>, ArbError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(|v| {
        v.trim()
            .parse::<T>()
            .map_err(|e| ArbError::Config(format!("{key}={v:?}: {e}")))
    })
    .transpose()
}

fn parse_venues<'a, I>(names: I) -> Result<Vec<Venue>, ArbError>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter(|n| !n.trim().is_empty())
        .map(str::parse)
        .collect()
}
