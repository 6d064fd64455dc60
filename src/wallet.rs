//! Signing-key loading.
//!
//! The key file is the standard Solana CLI format: a JSON array of the 64
//! secret-key bytes.

use solana_sdk::signature::{Keypair, Signer};
use std::path::Path;
use tracing::{info, warn};

use crate::types::ArbError;

/// Load the signing key, if one is configured.
///
/// No path or a missing file yields `Ok(None)` and the scanner runs in
/// detection-only mode. A file that exists but cannot be parsed is an error.
pub fn load_keypair(path: Option<&Path>) -> Result<Option<Keypair>, ArbError> {
    let Some(path) = path else {
        info!("No KEYPAIR_PATH set, execution disabled");
        return Ok(None);
    };

    if !path.exists() {
        warn!(path = %path.display(), "Keypair file not found, execution disabled");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path)
        .map_err(|e| ArbError::Wallet(format!("failed to read {}: {e}", path.display())))?;

    let keypair = parse_keypair(&json)
        .map_err(|e| ArbError::Wallet(format!("{}: {e}", path.display())))?;

    info!(pubkey = %keypair.pubkey(), "Signing key loaded");
    Ok(Some(keypair))
}

fn parse_keypair(json: &str) -> Result<Keypair, String> {
    let bytes: Vec<u8> =
        serde_json::from_str(json).map_err(|e| format!("expected JSON byte array: {e}"))?;
    Keypair::from_bytes(&bytes).map_err(|e| format!("invalid secret key: {e}"))
}
