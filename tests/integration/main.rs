//! End-to-end tests: real HTTP quote client against an in-process fake
//! aggregator, driven through the scan engine and scan loop.

mod fake_aggregator;
mod scan_cycle;
