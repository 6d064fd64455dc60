//! Trade execution gateway.
//!
//! Takes an encoded unsigned swap transaction, signs it with the configured
//! key and submits it through the ledger client. Route selection happens
//! elsewhere; the gateway only runs when a caller decides a route is worth
//! executing.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::VersionedTransaction;
use std::sync::Arc;
use tracing::{info, warn};

use crate::ledger::LedgerClient;
use crate::types::ArbError;

// ---------------------------------------------------------------------------
// Execution result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Accepted by the RPC node.
    Submitted(Signature),
    /// No signing key or no ledger client; nothing was sent.
    NotConfigured,
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

pub struct ExecutionGateway {
    keypair: Option<Keypair>,
    ledger: Option<Arc<dyn LedgerClient>>,
}

impl ExecutionGateway {
    pub fn new(keypair: Option<Keypair>, ledger: Option<Arc<dyn LedgerClient>>) -> Self {
        Self { keypair, ledger }
    }

    pub fn is_configured(&self) -> bool {
        self.keypair.is_some() && self.ledger.is_some()
    }

    pub fn signer(&self) -> Option<Pubkey> {
        self.keypair.as_ref().map(|k| k.pubkey())
    }

    /// Sign and submit a base64-encoded, bincode-serialized transaction.
    ///
    /// Returns `NotConfigured` without touching the network when either the
    /// key or the ledger client is missing. Decode, signing and submission
    /// failures are returned to the caller.
    pub async fn execute_swap(&self, encoded_tx: &str) -> Result<ExecutionOutcome, ArbError> {
        let (Some(keypair), Some(ledger)) = (&self.keypair, &self.ledger) else {
            warn!("Wallet or RPC client not configured; cannot execute trade");
            return Ok(ExecutionOutcome::NotConfigured);
        };

        let unsigned = decode_transaction(encoded_tx)?;
        let signed = VersionedTransaction::try_new(unsigned.message, &[keypair])
            .map_err(|e| ArbError::Signing(e.to_string()))?;

        let signature = ledger
            .send_transaction(&signed)
            .await
            .map_err(|e| ArbError::Submission(format!("{e:#}")))?;

        info!(%signature, signer = %keypair.pubkey(), "Swap submitted");
        Ok(ExecutionOutcome::Submitted(signature))
    }
}

fn decode_transaction(encoded_tx: &str) -> Result<VersionedTransaction, ArbError> {
    let bytes = STANDARD
        .decode(encoded_tx.trim())
        .map_err(|e| ArbError::Decode(format!("invalid base64: {e}")))?;
    bincode::deserialize(&bytes)
        .map_err(|e| ArbError::Decode(format!("invalid transaction bytes: {e}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
