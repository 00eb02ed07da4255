//! Configuration for Router Pilot
//!
//! Everything comes from the environment (or a `.env` file); a TOML file can
//! be used instead. The signing key is never serialized or printed.

use alloy_primitives::Address;
use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

// ============================================
// DEFAULTS (zkSync Era mainnet, Mute)
// ============================================

const DEFAULT_RPC_URL: &str = "https://mainnet.era.zksync.io";
const DEFAULT_CHAIN_ID: u64 = 324;
const DEFAULT_ROUTER: &str = "0x8B791913eB07C32779a16750e3868aA8495F5964";
const DEFAULT_WETH: &str = "0x5AEa5775959fBC2557Cc8789bC1bf90A239D9a91";
const DEFAULT_MUTE: &str = "0x0e97C7a0F8B2C9885C8ac9fC6136e829CbC21d42";
const DEFAULT_USDC: &str = "0x3355df6D4c9C3035724Fd0e3914dE96A5a83aaf4";
const DEFAULT_WMLP_POOL: &str = "0xb85feb6aF3412d690DFDA280b73EaED73a2315bC";

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // ========== Network Settings ==========
    /// JSON-RPC endpoint of the chain the router lives on
    pub rpc_url: String,

    /// Expected chain id (324 = zkSync Era)
    pub chain_id: u64,

    // ========== Wallet ==========
    /// Hex private key of the operating wallet (KEEP SECRET!)
    #[serde(skip_serializing, default)]
    pub wallet_private_key: Option<String>,

    // ========== Contracts ==========
    pub router_address: String,

    /// Pair registry; when unset pool addresses are derived locally
    pub factory_address: Option<String>,

    pub weth_address: String,
    pub usdc_address: String,
    pub mute_address: String,

    /// wMLP pool-share token (WETH/USDC pair)
    pub wmlp_pool_address: String,

    // ========== Router Settings ==========
    /// Route through stable pools
    pub stable_pool: bool,

    /// Fee tier forwarded to addLiquidity
    pub fee_type: u64,
}

/// Parsed contract addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractAddresses {
    pub router: Address,
    pub factory: Option<Address>,
    pub weth: Address,
    pub usdc: Address,
    pub mute: Address,
    pub wmlp_pool: Address,
}

impl Config {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            rpc_url: env::var("RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string()),
            chain_id: env::var("CHAIN_ID")
                .unwrap_or_else(|_| DEFAULT_CHAIN_ID.to_string())
                .parse()
                .unwrap_or(DEFAULT_CHAIN_ID),

            wallet_private_key: env::var("WALLET_PRIVATE_KEY").ok(),

            router_address: env::var("ROUTER_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_ROUTER.to_string()),
            factory_address: env::var("FACTORY_ADDRESS").ok().filter(|s| !s.is_empty()),
            weth_address: env::var("WETH_ADDRESS").unwrap_or_else(|_| DEFAULT_WETH.to_string()),
            usdc_address: env::var("USDC_ADDRESS").unwrap_or_else(|_| DEFAULT_USDC.to_string()),
            mute_address: env::var("MUTE_ADDRESS").unwrap_or_else(|_| DEFAULT_MUTE.to_string()),
            wmlp_pool_address: env::var("WMLP_POOL_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_WMLP_POOL.to_string()),

            stable_pool: env::var("STABLE_POOL")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            fee_type: env::var("FEE_TYPE")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .unwrap_or(0),
        })
    }

    /// Load configuration from a TOML file; the key still comes from the environment
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        dotenvy::dotenv().ok();

        let content = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        if config.wallet_private_key.is_none() {
            config.wallet_private_key = env::var("WALLET_PRIVATE_KEY").ok();
        }
        Ok(config)
    }

    /// Save configuration to a TOML file (without the key)
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Parse every configured contract address
    pub fn contract_addresses(&self) -> Result<ContractAddresses> {
        Ok(ContractAddresses {
            router: parse_address("ROUTER_ADDRESS", &self.router_address)?,
            factory: self
                .factory_address
                .as_deref()
                .map(|s| parse_address("FACTORY_ADDRESS", s))
                .transpose()?,
            weth: parse_address("WETH_ADDRESS", &self.weth_address)?,
            usdc: parse_address("USDC_ADDRESS", &self.usdc_address)?,
            mute: parse_address("MUTE_ADDRESS", &self.mute_address)?,
            wmlp_pool: parse_address("WMLP_POOL_ADDRESS", &self.wmlp_pool_address)?,
        })
    }

    /// Validate configuration before touching the chain
    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.is_empty() || self.rpc_url.contains("YOUR_API_KEY") {
            return Err(eyre!("Invalid RPC_URL - please set a reachable JSON-RPC endpoint"));
        }

        match self.wallet_private_key.as_deref() {
            None | Some("") => return Err(eyre!("WALLET_PRIVATE_KEY is required")),
            Some(key) if key.trim_start_matches("0x").len() != 64 => {
                return Err(eyre!("WALLET_PRIVATE_KEY must be 64 hex characters"));
            }
            Some(_) => {}
        }

        self.contract_addresses()?;

        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("╔════════════════════════════════════════════════════════════╗");
        println!("║              ROUTER PILOT - CONFIGURATION                  ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ Chain ID:          {:^40} ║", self.chain_id);
        println!("║ Wallet Key:        {:^40} ║",
            if self.wallet_private_key.is_some() { "✓ Configured" } else { "✗ Not Set" }
        );
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ CONTRACTS                                                  ║");
        println!("║ • Router:  {:<47} ║", self.router_address);
        println!("║ • Factory: {:<47} ║",
            self.factory_address.as_deref().unwrap_or("(derive pool addresses)")
        );
        println!("║ • WETH:    {:<47} ║", self.weth_address);
        println!("║ • USDC:    {:<47} ║", self.usdc_address);
        println!("║ • MUTE:    {:<47} ║", self.mute_address);
        println!("║ • wMLP:    {:<47} ║", self.wmlp_pool_address);
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ ROUTER                                                     ║");
        println!("║ • Stable Pools:    {:^40} ║", self.stable_pool);
        println!("║ • Fee Type:        {:^40} ║", self.fee_type);
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            wallet_private_key: None,
            router_address: DEFAULT_ROUTER.to_string(),
            factory_address: None,
            weth_address: DEFAULT_WETH.to_string(),
            usdc_address: DEFAULT_USDC.to_string(),
            mute_address: DEFAULT_MUTE.to_string(),
            wmlp_pool_address: DEFAULT_WMLP_POOL.to_string(),
            stable_pool: true,
            fee_type: 0,
        }
    }
}

fn parse_address(name: &str, value: &str) -> Result<Address> {
    Address::from_str(value.trim()).map_err(|e| eyre!("{} is not a valid address ({}): {}", name, value, e))
}

// ============================================
// TESTS
// ============================================
