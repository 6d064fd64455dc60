//! Scan cycles over HTTP.

use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

use dexarb::config::ScanConfig;
use dexarb::engine::scan_loop::ScanLoop;
use dexarb::engine::scanner::ScanEngine;
use dexarb::quotes::jupiter::JupiterClient;
use dexarb::quotes::QuoteSource;
use dexarb::types::{
    ArbError, AssetPair, CycleReport, QuoteRequest, RouteCheckResult, RouteReason, Venue,
};

use crate::fake_aggregator::{FakeAggregator, Reply};

const BASE: &str = "So11111111111111111111111111111111111111112";
const QUOTE: &str = "EPjFWdd5AufqSSqeM2qWVCN4zpwoS9E8oqecGbp6Dt1v";

fn scan_config(venues: Vec<Venue>) -> ScanConfig {
    ScanConfig {
        pair: AssetPair {
            label: "SOL/USDC".into(),
            base_mint: BASE.into(),
            quote_mint: QUOTE.into(),
        },
        trade_amount: 1_000_000,
        profit_threshold: dec!(0.0005),
        slippage_limit: dec!(0.005),
        poll_interval: Duration::from_millis(10),
        venues,
    }
}

fn engine(base_url: &str, venues: Vec<Venue>) -> ScanEngine {
    let client = JupiterClient::new(base_url, Duration::from_secs(5)).unwrap();
    ScanEngine::new(Arc::new(client), scan_config(venues))
}

fn find(results: &[RouteCheckResult], buy: Venue, sell: Venue) -> &RouteCheckResult {
    results
        .iter()
        .find(|r| r.buy_venue == buy && r.sell_venue == sell)
        .unwrap()
}

#[tokio::test]
async fn test_full_scan_over_http() {
    let fake = FakeAggregator::new()
        .reply("Raydium", QUOTE, Reply::Route { in_amount: 1_000_000, out_amount: 6_000_000 })
        .reply("Orca", BASE, Reply::Route { in_amount: 1_000_000, out_amount: 1_000_600 })
        .reply("Meteora", BASE, Reply::Route { in_amount: 1_000_000, out_amount: 1_000_400 })
        .reply("Orca", QUOTE, Reply::Status(500));
    let url = fake.spawn().await;

    let results = engine(&url, vec![Venue::Raydium, Venue::Orca, Venue::Meteora])
        .scan_once()
        .await;

    assert_eq!(results.len(), 6);

    let ro = find(&results, Venue::Raydium, Venue::Orca);
    assert_eq!((ro.profit, ro.reason), (600, RouteReason::Executable));

    let rm = find(&results, Venue::Raydium, Venue::Meteora);
    assert_eq!((rm.profit, rm.reason), (400, RouteReason::BelowThreshold));

    // Orca's buy leg failed with 500, Meteora's returned no routes.
    assert_eq!(find(&results, Venue::Orca, Venue::Meteora).reason, RouteReason::NoRoute);
    assert_eq!(find(&results, Venue::Meteora, Venue::Orca).reason, RouteReason::NoRoute);
    // Raydium has no sell route.
    assert_eq!(find(&results, Venue::Orca, Venue::Raydium).reason, RouteReason::NoRoute);
}

#[tokio::test]
async fn test_request_parameters() {
    let fake = FakeAggregator::new();
    let url = fake.spawn().await;

    engine(&url, vec![Venue::Lifinity, Venue::Orca]).scan_once().await;

    let hits = fake.hits();
    assert_eq!(hits.len(), 4);
    for hit in &hits {
        assert_eq!(hit["amount"], "1000000");
        assert_eq!(hit["swapMode"], "ExactIn");
        assert_eq!(hit["onlyDirectRoutes"], "true");
        assert!(hit["dexes"] == "Lifinity" || hit["dexes"] == "Orca");
        let pair = (hit["inputMint"].as_str(), hit["outputMint"].as_str());
        assert!(pair == (QUOTE, BASE) || pair == (BASE, QUOTE));
    }
}

#[tokio::test]
async fn test_missing_sell_leg_is_no_route() {
    let fake = FakeAggregator::new()
        .reply("Raydium", QUOTE, Reply::Route { in_amount: 100, out_amount: 1 })
        .reply("Orca", QUOTE, Reply::Route { in_amount: 100, out_amount: 1 });
    let url = fake.spawn().await;

    let results = engine(&url, vec![Venue::Raydium, Venue::Orca]).scan_once().await;

    let r = find(&results, Venue::Raydium, Venue::Orca);
    assert_eq!(r.reason, RouteReason::NoRoute);
    assert_eq!((r.profit, r.expected_output, r.expected_input), (0, 0, 1_000_000));
}

#[tokio::test]
async fn test_error_status_is_quote_error() {
    let fake = FakeAggregator::new().reply("Orca", QUOTE, Reply::Status(503));
    let url = fake.spawn().await;
    let client = JupiterClient::new(&url, Duration::from_secs(5)).unwrap();

    let request = QuoteRequest {
        input_mint: QUOTE.into(),
        output_mint: BASE.into(),
        amount: 1_000_000,
        venue: Venue::Orca,
    };
    let err = client.get_quote(&request).await.unwrap_err();

    match err.downcast_ref::<ArbError>() {
        Some(ArbError::Quote { venue, message }) => {
            assert_eq!(*venue, Venue::Orca);
            assert!(message.contains("503"));
        }
        other => panic!("expected a quote error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_aggregator_degrades_to_no_route() {
    // Grab a free port, then close it.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let results = engine(&format!("http://{addr}"), Venue::ALL.to_vec())
        .scan_once()
        .await;

    assert_eq!(results.len(), 20);
    assert!(results.iter().all(|r| r.reason == RouteReason::NoRoute));
}

#[tokio::test]
async fn test_loop_reports_each_cycle_until_shutdown() {
    let fake = FakeAggregator::new()
        .reply("Orca", QUOTE, Reply::Route { in_amount: 1_000_000, out_amount: 6_000_000 })
        .reply("Raydium", BASE, Reply::Route { in_amount: 1_000_000, out_amount: 1_002_000 });
    let url = fake.spawn().await;

    let scan_loop = ScanLoop::new(engine(&url, vec![Venue::Orca, Venue::Raydium]));

    let (tx, rx) = oneshot::channel::<()>();
    let mut tx = Some(tx);
    let mut reports: Vec<CycleReport> = Vec::new();
    let mut reporter = |report: &CycleReport| {
        reports.push(report.clone());
        if reports.len() == 2 {
            if let Some(tx) = tx.take() {
                let _ = tx.send(());
            }
        }
    };

    let completed = tokio::time::timeout(
        Duration::from_secs(10),
        scan_loop.run(&mut reporter, async {
            let _ = rx.await;
        }),
    )
    .await
    .unwrap();

    assert_eq!(completed, 2);
    assert_eq!(reports.len(), 2);
    assert_eq!(fake.hits().len(), 2 * 4);

    for (i, report) in reports.iter().enumerate() {
        assert_eq!(report.cycle, i as u64 + 1);
        let best = report.best_executable().unwrap();
        assert_eq!((best.buy_venue, best.sell_venue), (Venue::Orca, Venue::Raydium));
        assert_eq!(best.profit, 2_000);
    }
    assert_eq!(reports[0].results, reports[1].results);
}
