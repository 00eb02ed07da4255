//! Chain access
//!
//! `ChainClient` is the only seam between the router pipeline and a node.
//! `AlloyChain` backs it with an HTTP provider and a local signer; tests use
//! the in-memory `mock::MockChain`.

use alloy_network::EthereumWallet;
use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_provider::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::SolCall;
use eyre::Result as EyreResult;
use tracing::{debug, info};

use crate::error::{PilotError, Result};

/// What a mined transaction left behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutcome {
    pub hash: TxHash,
    pub status: bool,
    pub gas_used: u64,
    pub effective_gas_price: u128,
}

/// Node operations the pipeline depends on, all executed as `wallet()`
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    /// Address every state-changing call is signed by
    fn wallet(&self) -> Address;

    async fn call(&self, tx: TransactionRequest) -> Result<Bytes>;

    async fn estimate_gas(&self, tx: TransactionRequest) -> Result<u64>;

    /// Sign and broadcast; returns once the node accepted the transaction
    async fn send(&self, tx: TransactionRequest) -> Result<TxHash>;

    /// Wait until the transaction is mined
    async fn confirm(&self, hash: TxHash) -> Result<TxOutcome>;

    async fn native_balance(&self, owner: Address) -> Result<U256>;
}

/// Encode `call`, run it as an `eth_call` against `to` and decode the result
pub async fn read<C, T>(client: &C, to: Address, call: T) -> Result<T::Return>
where
    C: ChainClient,
    T: SolCall,
{
    let tx = TransactionRequest::default()
        .from(client.wallet())
        .to(to)
        .input(call.abi_encode().into());

    let output = client.call(tx).await?;

    T::abi_decode_returns(&output).map_err(|e| PilotError::Decode {
        method: T::SIGNATURE,
        reason: e.to_string(),
    })
}

// ============================================
// ALLOY-BACKED CLIENT
// ============================================

/// HTTP provider with the wallet filler attached
pub struct AlloyChain {
    provider: DynProvider,
    wallet: Address,
}

impl AlloyChain {
    /// Connect to `rpc_url`; nonce, chain id and fees are filled by the provider
    pub fn connect(rpc_url: &str, signer: PrivateKeySigner) -> EyreResult<Self> {
        let wallet = signer.address();

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(rpc_url.parse()?)
            .erased();

        info!("Connected provider for wallet {:?}", wallet);

        Ok(Self { provider, wallet })
    }
}

impl ChainClient for AlloyChain {
    fn wallet(&self) -> Address {
        self.wallet
    }

    async fn call(&self, tx: TransactionRequest) -> Result<Bytes> {
        self.provider
            .call(tx)
            .await
            .map_err(|e| PilotError::from_transport("eth_call", e))
    }

    async fn estimate_gas(&self, tx: TransactionRequest) -> Result<u64> {
        self.provider
            .estimate_gas(tx)
            .await
            .map_err(|e| PilotError::from_transport("eth_estimateGas", e))
    }

    async fn send(&self, tx: TransactionRequest) -> Result<TxHash> {
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| PilotError::from_transport("eth_sendTransaction", e))?;

        debug!("Broadcast transaction {:?}", pending.tx_hash());
        Ok(*pending.tx_hash())
    }

    async fn confirm(&self, hash: TxHash) -> Result<TxOutcome> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), hash)
            .get_receipt()
            .await
            .map_err(|e| PilotError::Rpc {
                context: "receipt",
                message: e.to_string(),
            })?;

        Ok(TxOutcome {
            hash: receipt.transaction_hash,
            status: receipt.status(),
            gas_used: receipt.gas_used,
            effective_gas_price: receipt.effective_gas_price,
        })
    }

    async fn native_balance(&self, owner: Address) -> Result<U256> {
        self.provider
            .get_balance(owner)
            .await
            .map_err(|e| PilotError::from_transport("eth_getBalance", e))
    }
}

// ============================================
// IN-MEMORY CLIENT FOR TESTS
// ============================================
