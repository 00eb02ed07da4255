//! Token precision and unit conversion
//!
//! Amounts cross the CLI boundary as decimal strings and travel on-chain as
//! base-unit integers. Precision is read from the token on every call.

use alloy_primitives::utils::{format_units, parse_units};
use alloy_primitives::{Address, U256};
use tracing::debug;

use crate::chain::{read, ChainClient};
use crate::contracts::IERC20;
use crate::error::{PilotError, Result};

/// Query `decimals()` on the token
pub async fn resolve_decimals<C: ChainClient>(client: &C, token: Address) -> Result<u8> {
    let decimals = read(client, token, IERC20::decimalsCall {}).await?;
    debug!("{:?} has {} decimals", token, decimals);
    Ok(decimals)
}

/// "1.5" with 6 decimals -> 1_500_000
///
/// Fractional digits beyond `decimals` are truncated.
pub fn to_base_units(amount: &str, decimals: u8) -> Result<U256> {
    let trimmed = amount.trim();
    let invalid = |reason: &str| PilotError::InvalidAmount {
        amount: amount.to_string(),
        decimals,
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("empty amount"));
    }
    if trimmed.starts_with('-') {
        return Err(invalid("negative amounts are not accepted"));
    }

    parse_units(trimmed, decimals)
        .map(|parsed| parsed.get_absolute())
        .map_err(|e| invalid(&e.to_string()))
}

/// 1_500_000 with 6 decimals -> "1.500000"
pub fn to_human_units(amount: U256, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }
    format_units(amount, decimals).unwrap_or_else(|_| amount.to_string())
}

/// Native currency always has 18 decimals
pub fn format_ether(amount: U256) -> String {
    to_human_units(amount, 18)
}
