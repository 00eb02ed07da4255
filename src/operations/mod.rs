//! Router operations: swap, add liquidity, remove liquidity
//!
//! Each operation normalizes its decimal inputs, approves the router through
//! the gas-estimated executor, asks the router for a quote, bounds the
//! result, submits, and reports what the receipt says.

mod liquidity;
mod swap;

use alloy_primitives::{Address, TxHash, U256};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::chain::{read, ChainClient};
use crate::context::PilotContext;
use crate::contracts::{IERC20, IMuteRouter};
use crate::error::{PilotError, Result};
use crate::executor::{ConfirmedTx, GasEstimatedExecutor, PendingTx};
use crate::units::format_ether;

// ============================================
// CONSTANTS
// ============================================

/// Transactions revert if not mined within this window
pub const DEADLINE_SECS: i64 = 600;

/// minOut = out - out / SLIPPAGE_DIVISOR (10% tolerance)
pub const SLIPPAGE_DIVISOR: u64 = 10;

// ============================================
// PARAMETER MATH
// ============================================

/// `now + 600`, whole epoch seconds
pub fn deadline_from(now_secs: i64) -> U256 {
    U256::from(now_secs.max(0) as u64) + U256::from(DEADLINE_SECS as u64)
}

pub fn deadline() -> U256 {
    deadline_from(Utc::now().timestamp())
}

/// Worst acceptable output for a quoted `expected`, floor division
pub fn min_out(expected: U256) -> U256 {
    expected - expected / U256::from(SLIPPAGE_DIVISOR)
}

/// tokenB amount at the quoted rate: `quote[1] * amount_in_a / quote[0]`
pub fn proportional_amount(quote: &[U256], amount_in_a: U256) -> Result<U256> {
    let [quoted_in, quoted_out] = quote_pair(quote)?;
    if quoted_in.is_zero() {
        return Err(PilotError::MalformedQuote("quoted input amount is zero".to_string()));
    }
    quoted_out
        .checked_mul(amount_in_a)
        .map(|product| product / quoted_in)
        .ok_or_else(|| PilotError::MalformedQuote("proportional amount overflows".to_string()))
}

/// Never remove more than the pool holds
pub fn clamp_removal(requested: U256, maximum: U256) -> U256 {
    requested.min(maximum)
}

fn quote_pair(quote: &[U256]) -> Result<[U256; 2]> {
    match quote {
        [first, .., last] => Ok([*first, *last]),
        _ => Err(PilotError::MalformedQuote(format!(
            "expected at least 2 amounts, got {}",
            quote.len()
        ))),
    }
}

// ============================================
// REPORTS
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Swap,
    AddLiquidity,
    RemoveLiquidity,
}

impl OperationKind {
    /// Prefix used when the operation fails
    pub fn error_prefix(&self) -> &'static str {
        match self {
            OperationKind::Swap => "Error swapping tokens",
            OperationKind::AddLiquidity => "Error adding liquidity",
            OperationKind::RemoveLiquidity => "Error removing liquidity",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Swap => write!(f, "Swap"),
            OperationKind::AddLiquidity => write!(f, "Add Liquidity"),
            OperationKind::RemoveLiquidity => write!(f, "Remove Liquidity"),
        }
    }
}

/// What a successful operation did on-chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationReport {
    pub kind: OperationKind,
    pub tx_hash: TxHash,
    /// Native value carried by the transaction, in wei
    pub value: U256,
    /// gas used × effective gas price, in wei
    pub gas_fee: U256,
    /// Pool-share tokens burned, human-readable (remove liquidity only)
    pub removed_liquidity: Option<String>,
}

impl OperationReport {
    fn from_confirmed(kind: OperationKind, tx: &ConfirmedTx) -> Self {
        Self {
            kind,
            tx_hash: tx.hash,
            value: tx.value,
            gas_fee: tx.gas_fee(),
            removed_liquidity: None,
        }
    }

    pub fn log(&self) {
        info!("{} Transaction Value: {}", self.kind, format_ether(self.value));
        info!("{} Gas Fee: {}", self.kind, format_ether(self.gas_fee));
        if let Some(removed) = &self.removed_liquidity {
            info!("Removed Liquidity Amount: {}", removed);
        }
    }
}

// ============================================
// ORCHESTRATOR
// ============================================

/// Runs operations against one context
pub struct Orchestrator<'a, C> {
    ctx: &'a PilotContext<C>,
    executor: GasEstimatedExecutor<'a, C>,
}

impl<'a, C: ChainClient> Orchestrator<'a, C> {
    pub fn new(ctx: &'a PilotContext<C>) -> Self {
        Self {
            ctx,
            executor: GasEstimatedExecutor::new(&ctx.chain),
        }
    }

    /// Submit `approve(router, amount)` on `token`
    async fn submit_approval(&self, token: Address, amount: U256) -> Result<PendingTx> {
        self.ctx.book.require_token(token)?;
        self.executor
            .submit(
                token,
                IERC20::approveCall {
                    spender: self.ctx.router.router,
                    amount,
                },
            )
            .await
    }

    /// Router quote for a direct `token_in -> token_out` hop
    async fn quote(&self, amount_in: U256, token_in: Address, token_out: Address) -> Result<Vec<U256>> {
        let amounts = read(
            &self.ctx.chain,
            self.ctx.router.router,
            IMuteRouter::getAmountsOutCall {
                amountIn: amount_in,
                path: vec![token_in, token_out],
            },
        )
        .await?;

        quote_pair(&amounts)?;
        Ok(amounts)
    }
}

#[cfg(test)]
pub(crate) mod fixtures;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_out_is_ninety_percent_floor() {
        assert_eq!(min_out(U256::from(1000)), U256::from(900));
        assert_eq!(min_out(U256::from(15)), U256::from(14)); // 15 - 1
        assert_eq!(min_out(U256::from(9)), U256::from(9)); // 9 / 10 == 0
        assert_eq!(min_out(U256::ZERO), U256::ZERO);

        for out in [1u64, 7, 99, 101, 123_456_789, u64::MAX] {
            let out = U256::from(out);
            assert_eq!(min_out(out), out - out / U256::from(10));
        }
    }

    #[test]
    fn test_deadline_is_ten_minutes_out() {
        let now = 1_700_000_000i64;
        let fixed = deadline_from(now);
        assert_eq!(fixed, U256::from(1_700_000_600u64));
        assert!(fixed > U256::from(now as u64));

        let live = deadline();
        let now = Utc::now().timestamp() as u64;
        assert!(live > U256::from(now));
        assert!(live <= U256::from(now + 600));
    }

    #[test]
    fn test_proportional_amount() {
        let quote = [U256::from(100_000_000u64), U256::from(50_000_000u64)];
        assert_eq!(
            proportional_amount(&quote, U256::from(100_000_000u64)).unwrap(),
            U256::from(50_000_000u64)
        );
        assert_eq!(
            proportional_amount(&quote, U256::from(10_000_000u64)).unwrap(),
            U256::from(5_000_000u64)
        );
    }

    #[test]
    fn test_proportional_amount_rejects_bad_quotes() {
        assert!(proportional_amount(&[U256::ZERO, U256::from(5)], U256::from(1)).is_err());
        assert!(proportional_amount(&[U256::from(5)], U256::from(1)).is_err());
        assert!(proportional_amount(&[U256::from(1), U256::MAX], U256::from(2)).is_err());
    }

    #[test]
    fn test_clamp_never_exceeds_maximum() {
        let cases = [(1000u64, 500u64), (500, 1000), (0, 0), (42, 42), (u64::MAX, 1)];
        for (requested, maximum) in cases {
            let clamped = clamp_removal(U256::from(requested), U256::from(maximum));
            assert!(clamped <= U256::from(maximum));
            assert!(clamped <= U256::from(requested));
        }
        assert_eq!(clamp_removal(U256::from(1000), U256::from(500)), U256::from(500));
    }
}
