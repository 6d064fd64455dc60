//! Ledger RPC submission.
//!
//! `LedgerClient` is the seam between the execution gateway and the chain.
//! The production implementation wraps the Solana nonblocking RPC client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::VersionedTransaction;
use tracing::debug;

/// Submits fully signed transactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Send a signed transaction; returns its signature once the node accepts it.
    async fn send_transaction(&self, transaction: &VersionedTransaction) -> Result<Signature>;
}

/// `LedgerClient` over a Solana JSON-RPC endpoint.
pub struct SolanaLedger {
    rpc: RpcClient,
}

impl SolanaLedger {
    pub fn new(rpc_url: &SecretString) -> Self {
        let rpc = RpcClient::new_with_commitment(
            rpc_url.expose_secret().clone(),
            CommitmentConfig::confirmed(),
        );
        Self { rpc }
    }
}

#[async_trait]
impl LedgerClient for SolanaLedger {
    async fn send_transaction(&self, transaction: &VersionedTransaction) -> Result<Signature> {
        debug!(
            signatures = transaction.signatures.len(),
            "Submitting transaction to RPC"
        );
        self.rpc
            .send_transaction(transaction)
            .await
            .context("RPC node rejected transaction")
    }
}
