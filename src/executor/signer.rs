//! Wallet loading
//!
//! ⚠️  SECURITY WARNING:
//! - Never log or expose private keys
//! - Use environment variables, not hardcoded keys

use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use eyre::{eyre, Result};
use std::str::FromStr;
use tracing::info;

/// Parse a hex private key (with or without 0x) and bind it to `chain_id`
pub fn load_signer(key: &str, chain_id: u64) -> Result<PrivateKeySigner> {
    let key = key.trim().trim_start_matches("0x");

    let signer = PrivateKeySigner::from_str(key)
        .map_err(|e| eyre!("Failed to parse WALLET_PRIVATE_KEY ({}): {}", redact_key(key), e))?
        .with_chain_id(Some(chain_id));

    info!("✓ Wallet loaded: {:?}", signer.address());
    Ok(signer)
}

/// First and last four hex characters only
pub fn redact_key(key: &str) -> String {
    let chars: Vec<char> = key.trim_start_matches("0x").chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}
