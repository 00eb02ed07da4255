use alloy_primitives::{Address, U256};
use futures::future::try_join;
use tracing::{info, warn};

use super::{
    clamp_removal, deadline, min_out, proportional_amount, OperationKind, OperationReport, Orchestrator,
};
use crate::chain::{read, ChainClient};
use crate::contracts::{IMuteRouter, IERC20};
use crate::error::Result;
use crate::pool::locate_pool;
use crate::units::{resolve_decimals, to_base_units, to_human_units};

impl<C: ChainClient> Orchestrator<'_, C> {
    /// Approve two tokens for the router.
    ///
    /// Submitted one after the other so nonces stay ordered, confirmed together.
    async fn approve_pair(&self, first: (Address, U256), second: (Address, U256)) -> Result<()> {
        let first = self.submit_approval(first.0, first.1).await?;
        let second = self.submit_approval(second.0, second.1).await?;

        try_join(self.executor.confirm(&first), self.executor.confirm(&second)).await?;
        Ok(())
    }

    /// Add liquidity to the `token_a`/`token_b` pool.
    ///
    /// tokenB's deposit follows the router quote for `amount_a`; `amount_b`
    /// only sets tokenB's approval.
    pub async fn add_liquidity(
        &self,
        amount_a: &str,
        amount_b: &str,
        token_a: Address,
        token_b: Address,
    ) -> Result<OperationReport> {
        let book = &self.ctx.book;
        info!(
            "➕ Add liquidity {} {} / {} {}",
            amount_a,
            book.label(&token_a),
            amount_b,
            book.label(&token_b)
        );

        let decimals_a = resolve_decimals(&self.ctx.chain, token_a).await?;
        let decimals_b = resolve_decimals(&self.ctx.chain, token_b).await?;
        let amount_in_a = to_base_units(amount_a, decimals_a)?;
        let approved_b = to_base_units(amount_b, decimals_b)?;

        self.approve_pair((token_a, amount_in_a), (token_b, approved_b)).await?;

        let amounts = self.quote(amount_in_a, token_a, token_b).await?;
        let amount_out_b = proportional_amount(&amounts, amount_in_a)?;
        if amount_out_b > approved_b {
            warn!(
                "Quoted {} {} exceeds the approved {}; the router may revert",
                to_human_units(amount_out_b, decimals_b),
                book.label(&token_b),
                to_human_units(approved_b, decimals_b)
            );
        }

        let added = self
            .executor
            .execute(
                self.ctx.router.router,
                IMuteRouter::addLiquidityCall {
                    tokenA: token_a,
                    tokenB: token_b,
                    amountADesired: amount_in_a,
                    amountBDesired: amount_out_b,
                    amountAMin: min_out(amount_in_a),
                    amountBMin: min_out(amount_out_b),
                    to: self.ctx.wallet(),
                    deadline: deadline(),
                    feeType: U256::from(self.ctx.router.fee_type),
                    stable: self.ctx.router.stable,
                },
            )
            .await?;

        let report = OperationReport::from_confirmed(OperationKind::AddLiquidity, &added);
        report.log();
        Ok(report)
    }

    /// Burn up to `amount_a` pool-share tokens of the `token_a`/`token_b` pool.
    ///
    /// The request is clamped to the share balance held at the pool address.
    pub async fn remove_liquidity(
        &self,
        amount_a: &str,
        token_a: Address,
        token_b: Address,
        min_amount_a: &str,
        min_amount_b: &str,
    ) -> Result<OperationReport> {
        let book = &self.ctx.book;
        let wallet = self.ctx.wallet();
        info!(
            "➖ Remove liquidity {} from {}/{}",
            amount_a,
            book.label(&token_a),
            book.label(&token_b)
        );

        let decimals_a = resolve_decimals(&self.ctx.chain, token_a).await?;
        let decimals_b = resolve_decimals(&self.ctx.chain, token_b).await?;
        let requested = to_base_units(amount_a, decimals_a)?;
        let amount_a_min = to_base_units(min_amount_a, decimals_a)?;
        let amount_b_min = to_base_units(min_amount_b, decimals_b)?;

        let share = book.pool_share_for(token_a, token_b)?;
        let share_decimals = resolve_decimals(&self.ctx.chain, share).await?;
        let pool = locate_pool(
            &self.ctx.chain,
            self.ctx.router.factory,
            token_a,
            token_b,
            self.ctx.router.stable,
        )
        .await?;

        let maximum = read(&self.ctx.chain, share, IERC20::balanceOfCall { account: pool.address }).await?;
        let before = read(&self.ctx.chain, share, IERC20::balanceOfCall { account: wallet }).await?;

        let liquidity = clamp_removal(requested, maximum);
        if liquidity < requested {
            warn!(
                "Requested {} exceeds pool maximum {}, removing {}",
                requested, maximum, liquidity
            );
        }
        info!("   Pool {:?} ({:?}), removing {}", pool.address, pool.source, liquidity);

        self.approve_pair((token_a, liquidity), (token_b, U256::ZERO)).await?;

        let removed = self
            .executor
            .execute(
                self.ctx.router.router,
                IMuteRouter::removeLiquidityCall {
                    tokenA: token_a,
                    tokenB: token_b,
                    liquidity,
                    amountAMin: amount_a_min,
                    amountBMin: amount_b_min,
                    to: wallet,
                    deadline: deadline(),
                    stable: self.ctx.router.stable,
                },
            )
            .await?;

        let after = read(&self.ctx.chain, share, IERC20::balanceOfCall { account: wallet }).await?;

        let mut report = OperationReport::from_confirmed(OperationKind::RemoveLiquidity, &removed);
        report.removed_liquidity = Some(to_human_units(before.saturating_sub(after), share_decimals));
        report.log();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::contracts::IMuteFactory;
    use crate::error::{ErrorKind, PilotError};
    use crate::pool::derive_pool_address;
    use alloy_primitives::address;

    #[tokio::test]
    async fn test_add_liquidity_follows_quote() {
        let a = addresses();
        let chain = chain_with_decimals();
        chain.on_call(
            a.router,
            IMuteRouter::getAmountsOutCall { amountIn: U256::from(100_000_000u64), path: vec![a.usdc, a.weth] },
            &vec![U256::from(100_000_000u64), U256::from(50_000_000u64)],
        );
        let ctx = context(chain);

        let report = Orchestrator::new(&ctx)
            .add_liquidity("100", "1", a.usdc, a.weth)
            .await
            .unwrap();

        let approvals = ctx.chain.sent_calls::<IERC20::approveCall>();
        assert_eq!(approvals.len(), 2);
        assert_eq!(approvals[0].0, a.usdc);
        assert_eq!(approvals[0].1.amount, U256::from(100_000_000u64));
        assert_eq!(approvals[1].0, a.weth);
        assert_eq!(approvals[1].1.amount, units(1, 18));

        let adds = ctx.chain.sent_calls::<IMuteRouter::addLiquidityCall>();
        assert_eq!(adds.len(), 1);
        let (to, add) = &adds[0];
        assert_eq!(*to, a.router);
        assert_eq!(add.tokenA, a.usdc);
        assert_eq!(add.tokenB, a.weth);
        assert_eq!(add.amountADesired, U256::from(100_000_000u64));
        assert_eq!(add.amountBDesired, U256::from(50_000_000u64));
        assert_eq!(add.amountAMin, U256::from(90_000_000u64));
        assert_eq!(add.amountBMin, U256::from(45_000_000u64));
        assert_eq!(add.to, WALLET);
        assert_eq!(add.feeType, U256::ZERO);
        assert!(add.stable);

        // Both approvals precede the deposit
        assert_eq!(ctx.chain.sent().len(), 3);
        assert_eq!(report.kind, OperationKind::AddLiquidity);
        assert_eq!(report.gas_fee, expected_fee(&ctx));
        assert_eq!(report.removed_liquidity, None);
    }

    #[tokio::test]
    async fn test_add_liquidity_stops_on_failed_approval() {
        let a = addresses();
        let mut chain = chain_with_decimals();
        chain.failed_receipts = true;
        let ctx = context(chain);

        let err = Orchestrator::new(&ctx)
            .add_liquidity("0.1", "100", a.weth, a.usdc)
            .await
            .unwrap_err();

        assert!(matches!(err, PilotError::FailedReceipt { .. }));
        assert_eq!(err.kind(), ErrorKind::Contract);
        assert!(ctx.chain.sent_calls::<IMuteRouter::addLiquidityCall>().is_empty());
    }

    #[tokio::test]
    async fn test_add_liquidity_rejects_empty_quote() {
        let a = addresses();
        let chain = chain_with_decimals();
        chain.on_call(
            a.router,
            IMuteRouter::getAmountsOutCall { amountIn: units(1, 18), path: vec![a.weth, a.usdc] },
            &vec![units(1, 18)],
        );
        let ctx = context(chain);

        let err = Orchestrator::new(&ctx)
            .add_liquidity("1", "100", a.weth, a.usdc)
            .await
            .unwrap_err();
        assert!(matches!(err, PilotError::MalformedQuote(_)));
    }

    /// WETH/USDC removal with the derived pool holding `maximum` shares and
    /// the wallet going from `before` to `after`
    fn removal_chain(maximum: u64, before: u64, after: u64) -> crate::chain::mock::MockChain {
        let a = addresses();
        let chain = chain_with_decimals();
        let pool = derive_pool_address(a.weth, a.usdc);
        chain.on_call(a.wmlp_pool, IERC20::balanceOfCall { account: pool }, &U256::from(maximum));
        chain.on_call(a.wmlp_pool, IERC20::balanceOfCall { account: WALLET }, &U256::from(before));
        chain.on_call(a.wmlp_pool, IERC20::balanceOfCall { account: WALLET }, &U256::from(after));
        chain
    }

    #[tokio::test]
    async fn test_remove_liquidity_clamps_to_pool_maximum() {
        let a = addresses();
        let ctx = context(removal_chain(500, 1000, 700));

        // 1000 wei of WETH precision
        let report = Orchestrator::new(&ctx)
            .remove_liquidity("0.000000000000001", a.weth, a.usdc, "0.01", "10")
            .await
            .unwrap();

        let removes = ctx.chain.sent_calls::<IMuteRouter::removeLiquidityCall>();
        assert_eq!(removes.len(), 1);
        let (to, remove) = &removes[0];
        assert_eq!(*to, a.router);
        assert_eq!(remove.liquidity, U256::from(500));
        assert_eq!(remove.amountAMin, U256::from(10_000_000_000_000_000u64));
        // USDC precision, not WETH's
        assert_eq!(remove.amountBMin, U256::from(10_000_000u64));
        assert_eq!(remove.to, WALLET);
        assert!(remove.stable);

        let approvals = ctx.chain.sent_calls::<IERC20::approveCall>();
        assert_eq!(approvals.len(), 2);
        assert_eq!((approvals[0].0, approvals[0].1.amount), (a.weth, U256::from(500)));
        assert_eq!((approvals[1].0, approvals[1].1.amount), (a.usdc, U256::ZERO));

        assert_eq!(report.kind, OperationKind::RemoveLiquidity);
        assert_eq!(report.removed_liquidity, Some(to_human_units(U256::from(300), 18)));
    }

    #[tokio::test]
    async fn test_remove_liquidity_within_maximum_is_untouched() {
        let a = addresses();
        let ctx = context(removal_chain(u64::MAX, 5000, 4000));

        Orchestrator::new(&ctx)
            .remove_liquidity("0.000000000000001", a.weth, a.usdc, "0", "0")
            .await
            .unwrap();

        let removes = ctx.chain.sent_calls::<IMuteRouter::removeLiquidityCall>();
        assert_eq!(removes[0].1.liquidity, U256::from(1000));
        assert_eq!(removes[0].1.amountBMin, U256::ZERO);
    }

    #[tokio::test]
    async fn test_remove_liquidity_balance_growth_reports_zero() {
        let a = addresses();
        let ctx = context(removal_chain(500, 100, 150));

        let report = Orchestrator::new(&ctx)
            .remove_liquidity("0.000000000000001", a.weth, a.usdc, "0", "0")
            .await
            .unwrap();
        assert_eq!(report.removed_liquidity, Some(to_human_units(U256::ZERO, 18)));
    }

    #[tokio::test]
    async fn test_remove_liquidity_reads_factory_pair() {
        let a = addresses();
        let factory = address!("40be1cBa6C5B47cDF9da7f963B6F761F4C60627D");
        let pair = address!("2222222222222222222222222222222222222222");

        let chain = chain_with_decimals();
        chain.on_call(
            factory,
            IMuteFactory::getPairCall { tokenA: a.weth, tokenB: a.usdc, stable: true },
            &pair,
        );
        chain.on_call(a.wmlp_pool, IERC20::balanceOfCall { account: pair }, &U256::from(42));
        chain.on_call(a.wmlp_pool, IERC20::balanceOfCall { account: WALLET }, &U256::from(100));
        let mut ctx = context(chain);
        ctx.router.factory = Some(factory);

        Orchestrator::new(&ctx)
            .remove_liquidity("1", a.weth, a.usdc, "0", "0")
            .await
            .unwrap();

        let removes = ctx.chain.sent_calls::<IMuteRouter::removeLiquidityCall>();
        assert_eq!(removes[0].1.liquidity, U256::from(42));
    }

    #[tokio::test]
    async fn test_remove_liquidity_without_pool_share_is_input_error() {
        let a = addresses();
        let ctx = context(chain_with_decimals());

        let err = Orchestrator::new(&ctx)
            .remove_liquidity("1", a.weth, a.mute, "0", "0")
            .await
            .unwrap_err();

        assert!(matches!(err, PilotError::UnknownPool(..)));
        assert_eq!(err.kind(), ErrorKind::Input);
        assert!(ctx.chain.sent().is_empty());
    }
}
