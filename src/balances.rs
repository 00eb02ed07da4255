//! Balance reporting for the operating wallet
//!
//! Read-only. `log_balances` never fails: a report that cannot be produced is
//! logged and skipped so it cannot abort the operations around it.

use alloy_primitives::U256;
use serde::Serialize;
use tracing::{error, info};

use crate::chain::{read, ChainClient};
use crate::context::PilotContext;
use crate::contracts::IERC20;
use crate::error::Result;
use crate::units::{format_ether, resolve_decimals, to_human_units};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceLine {
    pub symbol: String,
    pub raw: U256,
    pub decimals: u8,
    pub formatted: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceSnapshot {
    pub native: BalanceLine,
    pub tokens: Vec<BalanceLine>,
}

/// Native balance plus every tracked ERC-20
pub async fn snapshot<C: ChainClient>(ctx: &PilotContext<C>) -> Result<BalanceSnapshot> {
    let wallet = ctx.wallet();

    let native_raw = ctx.chain.native_balance(wallet).await?;
    let native = BalanceLine {
        symbol: "ETH".to_string(),
        raw: native_raw,
        decimals: 18,
        formatted: format_ether(native_raw),
    };

    let mut tokens = Vec::new();
    for entry in ctx.book.tracked_tokens() {
        let decimals = resolve_decimals(&ctx.chain, entry.address).await?;
        let raw = read(&ctx.chain, entry.address, IERC20::balanceOfCall { account: wallet }).await?;
        tokens.push(BalanceLine {
            symbol: entry.symbol.to_string(),
            raw,
            decimals,
            formatted: to_human_units(raw, decimals),
        });
    }

    Ok(BalanceSnapshot { native, tokens })
}

/// Log every balance; failures are logged, not returned
pub async fn log_balances<C: ChainClient>(ctx: &PilotContext<C>) -> Option<BalanceSnapshot> {
    match snapshot(ctx).await {
        Ok(snapshot) => {
            info!("{} Balance: {}", snapshot.native.symbol, snapshot.native.formatted);
            for line in &snapshot.tokens {
                info!("{} Balance: {}", line.symbol, line.formatted);
            }
            info!("--------------------");
            Some(snapshot)
        }
        Err(e) => {
            error!("Error logging balances: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::mock::MockChain;
    use crate::config::Config;
    use alloy_primitives::{address, Address};

    const WALLET: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    fn context(chain: MockChain) -> PilotContext<MockChain> {
        let config = Config::default();
        let addresses = config.contract_addresses().unwrap();
        PilotContext::new(chain, &addresses, &config)
    }

    #[test]
    fn test_snapshot_formats_each_token() {
        let addresses = Config::default().contract_addresses().unwrap();
        let mut chain = MockChain::new(WALLET);
        chain.native = U256::from(2_000_000_000_000_000_000u128);

        for (token, decimals, balance) in [
            (addresses.weth, 18u8, U256::from(500_000_000_000_000_000u128)),
            (addresses.usdc, 6, U256::from(12_340_000u64)),
            (addresses.mute, 18, U256::ZERO),
            (addresses.wmlp_pool, 18, U256::from(1u64)),
        ] {
            chain.on_call(token, IERC20::decimalsCall {}, &decimals);
            chain.on_call(token, IERC20::balanceOfCall { account: WALLET }, &balance);
        }

        let ctx = context(chain);
        let snapshot = tokio_test::block_on(snapshot(&ctx)).unwrap();

        assert!(snapshot.native.formatted.starts_with("2."));
        let usdc = snapshot.tokens.iter().find(|l| l.symbol == "USDC").unwrap();
        assert_eq!(usdc.formatted, "12.340000");
        assert_eq!(snapshot.tokens.len(), 4);
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_contained() {
        let ctx = context(MockChain::unreachable(WALLET));

        assert!(snapshot(&ctx).await.is_err());
        // Logged and swallowed
        assert!(log_balances(&ctx).await.is_none());
    }
}
