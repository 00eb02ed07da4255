//! Address book: the fixed set of contracts the pilot talks to
//!
//! Built once from configuration and read-only afterwards.

use alloy_primitives::Address;
use std::collections::HashMap;
use std::str::FromStr;

use crate::config::ContractAddresses;
use crate::error::{PilotError, Result};

/// What a known address is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractRole {
    Router,
    Factory,
    Token,
    /// Liquidity share token of a pair
    PoolShare { token_a: Address, token_b: Address },
}

/// One address book entry
#[derive(Debug, Clone)]
pub struct ContractEntry {
    pub symbol: &'static str,
    pub address: Address,
    pub role: ContractRole,
}

impl ContractEntry {
    pub fn is_erc20(&self) -> bool {
        matches!(self.role, ContractRole::Token | ContractRole::PoolShare { .. })
    }
}

#[derive(Debug, Clone)]
pub struct AddressBook {
    entries: HashMap<Address, ContractEntry>,
    /// Insertion order, used for balance reports
    order: Vec<Address>,
}

impl AddressBook {
    pub fn new(addresses: &ContractAddresses) -> Self {
        let mut book = Self {
            entries: HashMap::new(),
            order: Vec::new(),
        };

        book.insert("ROUTER", addresses.router, ContractRole::Router);
        if let Some(factory) = addresses.factory {
            book.insert("FACTORY", factory, ContractRole::Factory);
        }
        book.insert("WETH", addresses.weth, ContractRole::Token);
        book.insert("USDC", addresses.usdc, ContractRole::Token);
        book.insert("MUTE", addresses.mute, ContractRole::Token);
        book.insert(
            "wMLP",
            addresses.wmlp_pool,
            ContractRole::PoolShare {
                token_a: addresses.weth,
                token_b: addresses.usdc,
            },
        );

        book
    }

    fn insert(&mut self, symbol: &'static str, address: Address, role: ContractRole) {
        if self.entries.insert(address, ContractEntry { symbol, address, role }).is_none() {
            self.order.push(address);
        }
    }

    /// An ERC-20 (token or pool share) known to the book
    pub fn require_token(&self, address: Address) -> Result<&ContractEntry> {
        self.entries
            .get(&address)
            .filter(|entry| entry.is_erc20())
            .ok_or(PilotError::UnknownContract(address))
    }

    /// Pool-share token of an unordered pair
    pub fn pool_share_for(&self, token_a: Address, token_b: Address) -> Result<Address> {
        self.order
            .iter()
            .filter_map(|addr| self.entries.get(addr))
            .find_map(|entry| match entry.role {
                ContractRole::PoolShare { token_a: a, token_b: b }
                    if (a == token_a && b == token_b) || (a == token_b && b == token_a) =>
                {
                    Some(entry.address)
                }
                _ => None,
            })
            .ok_or(PilotError::UnknownPool(token_a, token_b))
    }

    /// Accepts a symbol ("weth", case-insensitive) or a hex address
    pub fn resolve(&self, symbol_or_address: &str) -> Option<Address> {
        let wanted = symbol_or_address.trim();
        if let Ok(address) = Address::from_str(wanted) {
            return Some(address);
        }
        self.entries
            .values()
            .find(|entry| entry.symbol.eq_ignore_ascii_case(wanted))
            .map(|entry| entry.address)
    }

    /// ERC-20s in configuration order
    pub fn tracked_tokens(&self) -> Vec<&ContractEntry> {
        self.order
            .iter()
            .filter_map(|addr| self.entries.get(addr))
            .filter(|entry| entry.is_erc20())
            .collect()
    }

    /// Symbol if known, shortened address otherwise
    pub fn label(&self, address: &Address) -> String {
        if let Some(entry) = self.entries.get(address) {
            entry.symbol.to_string()
        } else {
            format!("0x{}...", &format!("{:?}", address)[2..8])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn book() -> (AddressBook, ContractAddresses) {
        let addresses = Config::default().contract_addresses().unwrap();
        (AddressBook::new(&addresses), addresses)
    }

    #[test]
    fn test_tracked_tokens_in_order() {
        let (book, _) = book();
        let symbols: Vec<_> = book.tracked_tokens().iter().map(|t| t.symbol).collect();
        assert_eq!(symbols, vec!["WETH", "USDC", "MUTE", "wMLP"]);
    }

    #[test]
    fn test_resolve_symbols_and_addresses() {
        let (book, addresses) = book();
        assert_eq!(book.resolve("weth"), Some(addresses.weth));
        assert_eq!(book.resolve("MUTE"), Some(addresses.mute));
        assert_eq!(
            book.resolve("0x3355df6D4c9C3035724Fd0e3914dE96A5a83aaf4"),
            Some(addresses.usdc)
        );
        assert_eq!(book.resolve("DOGE"), None);
    }

    #[test]
    fn test_router_is_not_a_token() {
        let (book, addresses) = book();
        assert!(book.require_token(addresses.weth).is_ok());
        assert!(matches!(
            book.require_token(addresses.router),
            Err(PilotError::UnknownContract(_))
        ));
    }

    #[test]
    fn test_pool_share_lookup_is_unordered() {
        let (book, addresses) = book();
        assert_eq!(book.pool_share_for(addresses.weth, addresses.usdc).unwrap(), addresses.wmlp_pool);
        assert_eq!(book.pool_share_for(addresses.usdc, addresses.weth).unwrap(), addresses.wmlp_pool);
        assert!(book.pool_share_for(addresses.weth, addresses.mute).is_err());
    }

    #[test]
    fn test_label() {
        let (book, addresses) = book();
        assert_eq!(book.label(&addresses.usdc), "USDC");
        assert!(book.label(&Address::ZERO).starts_with("0x000000"));
    }
}
