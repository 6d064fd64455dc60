//! Route evaluation.
//!
//! Maps a (buy quote, sell quote) pair onto a classified `RouteCheckResult`.
//! Pure: no I/O, no clock.

use rust_decimal::Decimal;
use tracing::trace;

use crate::types::{Quote, RouteCheckResult, RouteReason, Venue};

/// Fixed inputs shared by every evaluation in a cycle.
#[derive(Debug, Clone, Copy)]
pub struct RouteEvaluator<'a> {
    pair_label: &'a str,
    trade_size: u64,
    profit_threshold: Decimal,
}

impl<'a> RouteEvaluator<'a> {
    pub fn new(pair_label: &'a str, trade_size: u64, profit_threshold: Decimal) -> Self {
        Self {
            pair_label,
            trade_size,
            profit_threshold,
        }
    }

    /// Classify buying on `buy_venue` and selling on `sell_venue`.
    ///
    /// A missing leg yields `NoRoute` with zero output and profit. Otherwise
    /// `profit = sell.out - buy.in` and the route is `Executable` only when
    /// profit strictly exceeds `input × threshold`.
    pub fn evaluate(
        &self,
        buy_venue: Venue,
        sell_venue: Venue,
        buy: Option<&Quote>,
        sell: Option<&Quote>,
    ) -> RouteCheckResult {
        let (buy, sell) = match (buy, sell) {
            (Some(b), Some(s)) => (b, s),
            _ => {
                return RouteCheckResult {
                    pair: self.pair_label.to_string(),
                    buy_venue,
                    sell_venue,
                    expected_input: self.trade_size,
                    expected_output: 0,
                    profit: 0,
                    reason: RouteReason::NoRoute,
                }
            }
        };

        let input = buy.in_amount.unwrap_or(self.trade_size);
        let output = sell.out_amount.unwrap_or(0);
        let profit = i128::from(output) - i128::from(input);

        // Overflowing the bar means it cannot be cleared.
        let min_profit = Decimal::from(input).checked_mul(self.profit_threshold);
        let reason = match min_profit {
            Some(min) if Decimal::from(profit) > min => RouteReason::Executable,
            _ => RouteReason::BelowThreshold,
        };

        trace!(
            buy = %buy_venue,
            sell = %sell_venue,
            input,
            output,
            profit = %profit,
            min_profit = ?min_profit,
            reason = %reason,
            "Route evaluated"
        );

        RouteCheckResult {
            pair: self.pair_label.to_string(),
            buy_venue,
            sell_venue,
            expected_input: input,
            expected_output: output,
            profit,
            reason,
        }
    }
}
