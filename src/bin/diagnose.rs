//! Diagnostic tool - Check configuration and connectivity before a run
//!
//! Run with: cargo run --bin diagnose

use alloy_primitives::Address;
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use std::env;
use std::str::FromStr;

const DEFAULT_RPC_URL: &str = "https://mainnet.era.zksync.io";
const DEFAULT_CHAIN_ID: u64 = 324;

const CONTRACTS: [(&str, &str); 6] = [
    ("ROUTER_ADDRESS", "0x8B791913eB07C32779a16750e3868aA8495F5964"),
    ("FACTORY_ADDRESS", ""),
    ("WETH_ADDRESS", "0x5AEa5775959fBC2557Cc8789bC1bf90A239D9a91"),
    ("USDC_ADDRESS", "0x3355df6D4c9C3035724Fd0e3914dE96A5a83aaf4"),
    ("MUTE_ADDRESS", "0x0e97C7a0F8B2C9885C8ac9fC6136e829CbC21d42"),
    ("WMLP_POOL_ADDRESS", "0xb85feb6aF3412d690DFDA280b73EaED73a2315bC"),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    println!();
    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║               ROUTER PILOT DIAGNOSTIC CHECK                ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();

    let mut issues: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    // ==========================================
    // CHECK 1: RPC connection
    // ==========================================
    println!("📡 CHECKING RPC CONNECTION...");

    let rpc_url = env::var("RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string());
    let expected_chain: u64 = env::var("CHAIN_ID")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_CHAIN_ID);

    let rpc_display = if rpc_url.len() > 50 {
        format!("{}...{}", &rpc_url[..30], &rpc_url[rpc_url.len() - 15..])
    } else {
        rpc_url.clone()
    };
    println!("   RPC_URL: {}", rpc_display);

    let provider = match connect(&rpc_url) {
        Ok(provider) => Some(provider),
        Err(e) => {
            issues.push(e.clone());
            println!("   ❌ {}", e);
            None
        }
    };

    if let Some(provider) = &provider {
        match provider.get_block_number().await {
            Ok(block) => println!("   ✅ RPC connected, current block: {}", block),
            Err(e) => {
                issues.push(format!("RPC connection failed: {}", e));
                println!("   ❌ RPC connection failed: {}", e);
            }
        }

        match provider.get_chain_id().await {
            Ok(id) if id == expected_chain => println!("   ✅ Chain id: {}", id),
            Ok(id) => {
                issues.push(format!("Chain id {} does not match CHAIN_ID {}", id, expected_chain));
                println!("   ❌ Chain id: {} (expected {})", id, expected_chain);
            }
            Err(e) => {
                warnings.push(format!("Could not read chain id: {}", e));
                println!("   ⚠️  Chain id: unavailable");
            }
        }
    }
    println!();

    // ==========================================
    // CHECK 2: Wallet
    // ==========================================
    println!("🔐 CHECKING WALLET...");

    let wallet_key = env::var("WALLET_PRIVATE_KEY").unwrap_or_default();
    if wallet_key.is_empty() {
        issues.push("WALLET_PRIVATE_KEY not set".to_string());
        println!("   ❌ WALLET_PRIVATE_KEY: Not configured");
    } else {
        let key = wallet_key.trim().trim_start_matches("0x");
        if key.len() != 64 {
            issues.push("WALLET_PRIVATE_KEY invalid format".to_string());
            println!("   ❌ WALLET_PRIVATE_KEY: Invalid format (should be 64 hex chars)");
        } else {
            match alloy_signer_local::PrivateKeySigner::from_str(key) {
                Ok(signer) => {
                    println!("   ✅ Wallet: {:?}", signer.address());
                    if let Some(provider) = &provider {
                        match provider.get_balance(signer.address()).await {
                            Ok(balance) => println!(
                                "   ✅ ETH balance: {}",
                                alloy_primitives::utils::format_ether(balance)
                            ),
                            Err(e) => warnings.push(format!("Could not read wallet balance: {}", e)),
                        }
                    }
                }
                Err(e) => {
                    issues.push(format!("WALLET_PRIVATE_KEY parse error: {}", e));
                    println!("   ❌ WALLET_PRIVATE_KEY: Parse error - {}", e);
                }
            }
        }
    }
    println!();

    // ==========================================
    // CHECK 3: Contracts
    // ==========================================
    println!("📜 CHECKING CONTRACTS...");

    for (key, default) in CONTRACTS {
        let value = env::var(key).unwrap_or_else(|_| default.to_string());
        let marker = if env::var(key).is_err() { "(default)" } else { "(from .env)" };

        if value.is_empty() {
            println!("   ℹ️  {}: Not set (the router's factory() will be used)", key);
            continue;
        }

        let addr = match Address::from_str(value.trim()) {
            Ok(addr) => addr,
            Err(_) => {
                issues.push(format!("{} invalid format", key));
                println!("   ❌ {}: Invalid address format", key);
                continue;
            }
        };

        match &provider {
            Some(provider) => match provider.get_code_at(addr).await {
                Ok(code) if !code.is_empty() => {
                    println!("   ✅ {}: {:?} {} (code exists)", key, addr, marker)
                }
                Ok(_) => {
                    issues.push(format!("{} has no code", key));
                    println!("   ❌ {}: {:?} (NO CODE - wrong network?)", key, addr);
                }
                Err(e) => {
                    warnings.push(format!("Could not verify {}: {}", key, e));
                    println!("   ⚠️  {}: {:?} (verification failed)", key, addr);
                }
            },
            None => println!("   ⚠️  {}: {:?} (cannot verify without RPC)", key, addr),
        }
    }
    println!();

    // ==========================================
    // CHECK 4: Router settings
    // ==========================================
    println!("🎮 CHECKING ROUTER SETTINGS...");

    match env::var("STABLE_POOL").unwrap_or_else(|_| "true".to_string()).parse::<bool>() {
        Ok(stable) => println!("   STABLE_POOL: {}", stable),
        Err(_) => {
            warnings.push("STABLE_POOL is not a bool, true will be used".to_string());
            println!("   ⚠️  STABLE_POOL: not a bool");
        }
    }
    match env::var("FEE_TYPE").unwrap_or_else(|_| "0".to_string()).parse::<u64>() {
        Ok(fee_type) => println!("   FEE_TYPE: {}", fee_type),
        Err(_) => {
            warnings.push("FEE_TYPE is not an integer, 0 will be used".to_string());
            println!("   ⚠️  FEE_TYPE: not an integer");
        }
    }
    println!();

    // ==========================================
    // SUMMARY
    // ==========================================
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    if issues.is_empty() && warnings.is_empty() {
        println!("✅ ALL CHECKS PASSED!");
    } else if issues.is_empty() {
        println!("⚠️  READY WITH WARNINGS ({} warnings)", warnings.len());
        println!();
        for w in &warnings {
            println!("   • {}", w);
        }
    } else {
        println!("❌ NOT READY ({} issues, {} warnings)", issues.len(), warnings.len());
        println!();
        println!("   MUST FIX:");
        for i in &issues {
            println!("   • {}", i);
        }
        if !warnings.is_empty() {
            println!();
            println!("   WARNINGS:");
            for w in &warnings {
                println!("   • {}", w);
            }
        }
    }

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    if !issues.is_empty() {
        std::process::exit(1);
    }
}

fn connect(url: &str) -> Result<DynProvider, String> {
    let url = url.parse().map_err(|e| format!("Invalid RPC_URL: {}", e))?;
    Ok(ProviderBuilder::new().connect_http(url).erased())
}
