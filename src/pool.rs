//! Pool address resolution
//!
//! The factory's `getPair` is authoritative. Without a factory (or when it
//! knows no such pair) the address is derived locally from the token pair.

use alloy_primitives::{keccak256, Address};
use serde::Serialize;
use tracing::{debug, warn};

use crate::chain::{read, ChainClient};
use crate::contracts::{IMuteFactory, IMuteRouter};
use crate::error::Result;

/// Where a pool address came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PoolSource {
    Factory,
    Derived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPool {
    pub address: Address,
    pub source: PoolSource,
}

/// keccak256 of the two lowercase hex addresses, sorted and concatenated;
/// the first 20 bytes of the digest. Order of the arguments is irrelevant.
pub fn derive_pool_address(token_a: Address, token_b: Address) -> Address {
    let mut pair = [canonical_hex(&token_a), canonical_hex(&token_b)];
    pair.sort();

    let digest = keccak256(format!("{}{}", pair[0], pair[1]));
    Address::from_slice(&digest[..20])
}

fn canonical_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// The factory the router was deployed against
pub async fn router_factory<C: ChainClient>(client: &C, router: Address) -> Result<Address> {
    read(client, router, IMuteRouter::factoryCall {}).await
}

/// Factory lookup with local derivation as fallback
pub async fn locate_pool<C: ChainClient>(
    client: &C,
    factory: Option<Address>,
    token_a: Address,
    token_b: Address,
    stable: bool,
) -> Result<ResolvedPool> {
    if let Some(factory) = factory {
        let pair = read(
            client,
            factory,
            IMuteFactory::getPairCall {
                tokenA: token_a,
                tokenB: token_b,
                stable,
            },
        )
        .await?;

        if pair != Address::ZERO {
            debug!("Factory pair for {:?}/{:?}: {:?}", token_a, token_b, pair);
            return Ok(ResolvedPool {
                address: pair,
                source: PoolSource::Factory,
            });
        }

        warn!(
            "Factory {:?} has no pair for {:?}/{:?} (stable={}), deriving locally",
            factory, token_a, token_b, stable
        );
    }

    Ok(ResolvedPool {
        address: derive_pool_address(token_a, token_b),
        source: PoolSource::Derived,
    })
}
