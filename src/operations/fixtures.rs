//! Shared setup for operation tests

use alloy_primitives::{address, Address, U256};

use crate::chain::mock::MockChain;
use crate::config::{Config, ContractAddresses};
use crate::context::PilotContext;
use crate::contracts::IERC20;

pub const WALLET: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

pub fn addresses() -> ContractAddresses {
    Config::default().contract_addresses().unwrap()
}

/// Mock node where every configured token answers `decimals()`
pub fn chain_with_decimals() -> MockChain {
    let a = addresses();
    let chain = MockChain::new(WALLET);
    for (token, decimals) in [(a.weth, 18u8), (a.usdc, 6), (a.mute, 18), (a.wmlp_pool, 18)] {
        chain.on_call(token, IERC20::decimalsCall {}, &decimals);
    }
    chain
}

pub fn context(chain: MockChain) -> PilotContext<MockChain> {
    let config = Config::default();
    PilotContext::new(chain, &addresses(), &config)
}

/// Fee the mock charges for any one transaction
pub fn expected_fee(ctx: &PilotContext<MockChain>) -> U256 {
    U256::from(ctx.chain.gas_used) * U256::from(ctx.chain.gas_price)
}

pub fn units(whole: u64, decimals: u8) -> U256 {
    U256::from(whole) * U256::from(10u64).pow(U256::from(decimals))
}
