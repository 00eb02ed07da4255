//! Transaction execution
//!
//! Every state-changing call goes through `GasEstimatedExecutor`:
//! estimate gas for the exact call, then submit with that estimate as the
//! gas limit. Confirmation is a separate step so independent submissions can
//! be awaited together.
//!
//! ⚠️  WARNING: This module moves real funds!

mod signer;

pub use signer::load_signer;

use alloy_primitives::{Address, TxHash, U256};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use tracing::{debug, info};

use crate::chain::ChainClient;
use crate::error::{PilotError, Result};

/// A broadcast transaction that has not been confirmed yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTx {
    pub hash: TxHash,
    pub method: &'static str,
    pub to: Address,
    pub gas_limit: u64,
    pub value: U256,
}

/// A mined, successful transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedTx {
    pub hash: TxHash,
    pub method: &'static str,
    pub value: U256,
    pub gas_used: u64,
    pub effective_gas_price: u128,
}

impl ConfirmedTx {
    /// gas used × effective gas price, in wei
    pub fn gas_fee(&self) -> U256 {
        U256::from(self.gas_used) * U256::from(self.effective_gas_price)
    }
}

/// Estimate-then-submit wrapper around a `ChainClient`
pub struct GasEstimatedExecutor<'a, C> {
    client: &'a C,
}

impl<'a, C: ChainClient> GasEstimatedExecutor<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Estimate gas for `call` on `to`, then broadcast it with that limit.
    ///
    /// State can move between estimate and inclusion, so the transaction may
    /// still revert. Nothing is retried.
    pub async fn submit<T: SolCall>(&self, to: Address, call: T) -> Result<PendingTx> {
        let request = TransactionRequest::default()
            .from(self.client.wallet())
            .to(to)
            .value(U256::ZERO)
            .input(call.abi_encode().into());

        let gas_limit = self.client.estimate_gas(request.clone()).await?;
        debug!("{} on {:?}: estimated {} gas", T::SIGNATURE, to, gas_limit);

        let hash = self.client.send(request.gas_limit(gas_limit)).await?;
        info!("📤 {} submitted: {:?} (gas limit {})", method_name::<T>(), hash, gas_limit);

        Ok(PendingTx {
            hash,
            method: T::SIGNATURE,
            to,
            gas_limit,
            value: U256::ZERO,
        })
    }

    /// Wait for the receipt; a mined-but-failed transaction is an error
    pub async fn confirm(&self, pending: &PendingTx) -> Result<ConfirmedTx> {
        let outcome = self.client.confirm(pending.hash).await?;

        if !outcome.status {
            return Err(PilotError::FailedReceipt {
                method: pending.method,
                hash: outcome.hash,
            });
        }

        debug!(
            "{:?} confirmed: {} gas at {} wei",
            outcome.hash, outcome.gas_used, outcome.effective_gas_price
        );

        Ok(ConfirmedTx {
            hash: outcome.hash,
            method: pending.method,
            value: pending.value,
            gas_used: outcome.gas_used,
            effective_gas_price: outcome.effective_gas_price,
        })
    }

    /// `submit` followed by `confirm`
    pub async fn execute<T: SolCall>(&self, to: Address, call: T) -> Result<ConfirmedTx> {
        let pending = self.submit(to, call).await?;
        self.confirm(&pending).await
    }
}

/// "approve(address,uint256)" -> "approve"
fn method_name<T: SolCall>() -> &'static str {
    T::SIGNATURE.split('(').next().unwrap_or(T::SIGNATURE)
}
