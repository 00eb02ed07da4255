use alloy_primitives::Address;
use tracing::info;

use super::{deadline, min_out, quote_pair, OperationKind, OperationReport, Orchestrator};
use crate::chain::ChainClient;
use crate::contracts::IMuteRouter;
use crate::error::Result;
use crate::units::{resolve_decimals, to_base_units, to_human_units};

impl<C: ChainClient> Orchestrator<'_, C> {
    /// Swap `amount` of `token_in` for `token_out` with 10% slippage tolerance.
    ///
    /// The approval is confirmed before the swap is submitted.
    pub async fn swap(&self, amount: &str, token_in: Address, token_out: Address) -> Result<OperationReport> {
        let book = &self.ctx.book;
        info!("🔁 Swap {} {} -> {}", amount, book.label(&token_in), book.label(&token_out));

        let decimals_in = resolve_decimals(&self.ctx.chain, token_in).await?;
        let decimals_out = resolve_decimals(&self.ctx.chain, token_out).await?;
        let amount_in = to_base_units(amount, decimals_in)?;

        let approval = self.submit_approval(token_in, amount_in).await?;
        self.executor.confirm(&approval).await?;

        let amounts = self.quote(amount_in, token_in, token_out).await?;
        let [_, expected_out] = quote_pair(&amounts)?;
        let amount_out_min = min_out(expected_out);
        info!(
            "   Quote: {} {} (min {})",
            to_human_units(expected_out, decimals_out),
            book.label(&token_out),
            to_human_units(amount_out_min, decimals_out)
        );

        let path = vec![token_in, token_out];
        let stable = vec![self.ctx.router.stable; path.len()];
        let swap = self
            .executor
            .execute(
                self.ctx.router.router,
                IMuteRouter::swapExactTokensForTokensCall {
                    amountIn: amount_in,
                    amountOutMin: amount_out_min,
                    path,
                    to: self.ctx.wallet(),
                    deadline: deadline(),
                    stable,
                },
            )
            .await?;

        let report = OperationReport::from_confirmed(OperationKind::Swap, &swap);
        report.log();
        Ok(report)
    }
}
