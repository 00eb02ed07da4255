//! Everything an operation needs, built once at startup and borrowed

use alloy_primitives::Address;

use crate::chain::ChainClient;
use crate::config::{Config, ContractAddresses};
use crate::tokens::AddressBook;

/// Router-level settings forwarded into calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterSettings {
    pub router: Address,
    pub factory: Option<Address>,
    pub stable: bool,
    pub fee_type: u64,
}

pub struct PilotContext<C> {
    pub chain: C,
    pub book: AddressBook,
    pub router: RouterSettings,
}

impl<C: ChainClient> PilotContext<C> {
    pub fn new(chain: C, addresses: &ContractAddresses, config: &Config) -> Self {
        Self {
            chain,
            book: AddressBook::new(addresses),
            router: RouterSettings {
                router: addresses.router,
                factory: addresses.factory,
                stable: config.stable_pool,
                fee_type: config.fee_type,
            },
        }
    }

    pub fn wallet(&self) -> Address {
        self.chain.wallet()
    }
}
