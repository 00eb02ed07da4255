//! Router Pilot - swap and manage liquidity on the Mute router
//!
//! Run with: cargo run -- demo
//!
//! Every requested operation runs in order. A failure is logged with its
//! operation's prefix and the run continues; the exit code is non-zero if
//! anything failed.

use alloy_primitives::Address;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use console::style;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod balances;
mod chain;
mod config;
mod context;
mod contracts;
mod error;
mod executor;
mod operations;
mod pool;
mod tokens;
mod units;

use balances::{log_balances, BalanceSnapshot};
use chain::{AlloyChain, ChainClient};
use config::{Config, ContractAddresses};
use context::PilotContext;
use error::ErrorKind;
use executor::load_signer;
use operations::{OperationKind, OperationReport, Orchestrator};
use pool::router_factory;
use tokens::AddressBook;

#[derive(Parser)]
#[command(name = "router-pilot", version, about = "Swap and manage liquidity through the Mute router")]
struct Cli {
    /// Read configuration from a TOML file instead of the environment
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Write the loaded configuration (without the key) to a TOML file
    #[arg(long, global = true)]
    save_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Native and token balances of the wallet
    Balances,
    /// Swap an exact input amount
    Swap {
        amount: String,
        token_in: String,
        token_out: String,
    },
    /// Deposit into a pool at the router's quoted rate
    AddLiquidity {
        amount_a: String,
        amount_b: String,
        token_a: String,
        token_b: String,
    },
    /// Burn pool-share tokens
    RemoveLiquidity {
        amount: String,
        token_a: String,
        token_b: String,
        #[arg(long, default_value = "0")]
        min_a: String,
        #[arg(long, default_value = "0")]
        min_b: String,
    },
    /// Balances, swap, add, remove, balances (the default)
    Demo,
}

/// One unit of work with token arguments already resolved
enum Step {
    Balances,
    Swap {
        amount: String,
        token_in: Address,
        token_out: Address,
    },
    AddLiquidity {
        amount_a: String,
        amount_b: String,
        token_a: Address,
        token_b: Address,
    },
    RemoveLiquidity {
        amount: String,
        token_a: Address,
        token_b: Address,
        min_a: String,
        min_b: String,
    },
}

#[derive(Debug, Serialize)]
struct OperationOutcome {
    kind: OperationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<OperationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
}

#[derive(Debug, Default, Serialize)]
struct RunSummary {
    operations: Vec<OperationOutcome>,
    balances: Vec<BalanceSnapshot>,
}

impl RunSummary {
    fn failures(&self) -> usize {
        self.operations.iter().filter(|op| op.error.is_some()).count()
    }
}

fn print_banner() {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!("{}", style(" 🧭 ROUTER PILOT - Mute Router Automation").cyan().bold());
    println!("{}", style("    Swap | Add Liquidity | Remove Liquidity").cyan());
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!();
}

fn resolve_token(book: &AddressBook, arg: &str) -> Result<Address> {
    book.resolve(arg)
        .ok_or_else(|| eyre!("Unknown token '{}': use a configured symbol or a 0x address", arg))
}

fn plan(command: Command, book: &AddressBook) -> Result<Vec<Step>> {
    let steps = match command {
        Command::Balances => vec![Step::Balances],
        Command::Swap { amount, token_in, token_out } => vec![Step::Swap {
            amount,
            token_in: resolve_token(book, &token_in)?,
            token_out: resolve_token(book, &token_out)?,
        }],
        Command::AddLiquidity { amount_a, amount_b, token_a, token_b } => vec![Step::AddLiquidity {
            amount_a,
            amount_b,
            token_a: resolve_token(book, &token_a)?,
            token_b: resolve_token(book, &token_b)?,
        }],
        Command::RemoveLiquidity { amount, token_a, token_b, min_a, min_b } => {
            vec![Step::RemoveLiquidity {
                amount,
                token_a: resolve_token(book, &token_a)?,
                token_b: resolve_token(book, &token_b)?,
                min_a,
                min_b,
            }]
        }
        Command::Demo => {
            let weth = resolve_token(book, "WETH")?;
            let usdc = resolve_token(book, "USDC")?;
            let mute = resolve_token(book, "MUTE")?;
            vec![
                Step::Balances,
                Step::Swap {
                    amount: "1".to_string(),
                    token_in: weth,
                    token_out: mute,
                },
                Step::AddLiquidity {
                    amount_a: "0.1".to_string(),
                    amount_b: "100".to_string(),
                    token_a: weth,
                    token_b: usdc,
                },
                Step::RemoveLiquidity {
                    amount: "0.1".to_string(),
                    token_a: weth,
                    token_b: usdc,
                    min_a: "0.01".to_string(),
                    min_b: "10".to_string(),
                },
                Step::Balances,
            ]
        }
    };
    Ok(steps)
}

async fn run<C: ChainClient>(ctx: &PilotContext<C>, steps: Vec<Step>) -> RunSummary {
    let orchestrator = Orchestrator::new(ctx);
    let mut summary = RunSummary::default();

    for step in steps {
        let (kind, result) = match step {
            Step::Balances => {
                if let Some(snapshot) = log_balances(ctx).await {
                    summary.balances.push(snapshot);
                }
                continue;
            }
            Step::Swap { amount, token_in, token_out } => {
                (OperationKind::Swap, orchestrator.swap(&amount, token_in, token_out).await)
            }
            Step::AddLiquidity { amount_a, amount_b, token_a, token_b } => (
                OperationKind::AddLiquidity,
                orchestrator.add_liquidity(&amount_a, &amount_b, token_a, token_b).await,
            ),
            Step::RemoveLiquidity { amount, token_a, token_b, min_a, min_b } => (
                OperationKind::RemoveLiquidity,
                orchestrator
                    .remove_liquidity(&amount, token_a, token_b, &min_a, &min_b)
                    .await,
            ),
        };

        let outcome = match result {
            Ok(report) => OperationOutcome {
                kind,
                report: Some(report),
                error: None,
                error_kind: None,
            },
            Err(e) => {
                error!("{}: {}", kind.error_prefix(), e);
                OperationOutcome {
                    kind,
                    report: None,
                    error: Some(e.to_string()),
                    error_kind: Some(e.kind()),
                }
            }
        };
        summary.operations.push(outcome);
    }

    summary
}

fn print_summary(summary: &RunSummary) {
    let failures = summary.failures();
    let color = if failures == 0 { console::Color::Green } else { console::Color::Red };

    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").fg(color)
    );
    println!("{}", style(" ✅ RUN COMPLETE").fg(color).bold());
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").fg(color)
    );
    println!();
    println!("Summary:");
    for op in &summary.operations {
        match (&op.report, &op.error) {
            (Some(report), _) => println!(
                "  {} {}: {:?}",
                style("✓").green(),
                op.kind,
                report.tx_hash
            ),
            (None, Some(err)) => println!("  {} {}: {}", style("✗").red(), op.kind, err),
            (None, None) => {}
        }
    }
    println!("  • Operations: {} ({} failed)", summary.operations.len(), failures);
    println!("  • Balance reports: {}", summary.balances.len());
    println!();
}

fn render_json(summary: &RunSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Ask the router for its factory when FACTORY_ADDRESS is unset
async fn fill_factory<C: ChainClient>(chain: &C, addresses: &mut ContractAddresses) {
    if addresses.factory.is_some() {
        return;
    }
    match router_factory(chain, addresses.router).await {
        Ok(factory) if factory != Address::ZERO => {
            info!("Using router factory {:?}", factory);
            addresses.factory = Some(factory);
        }
        Ok(_) => warn!("Router reports no factory, pool addresses will be derived"),
        Err(e) => warn!("Could not read router factory ({}), pool addresses will be derived", e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // stdout carries the report only
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("router_pilot=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    if !cli.json {
        print_banner();
    }

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        error!("Please check your .env file");
        return Err(e);
    }

    if !cli.json {
        config.print_summary();
        println!();
    }

    if let Some(path) = &cli.save_config {
        config.save_to_file(path)?;
        info!("Configuration saved to {}", path.display());
    }

    let mut addresses = config.contract_addresses()?;
    let key = config
        .wallet_private_key
        .as_deref()
        .ok_or_else(|| eyre!("WALLET_PRIVATE_KEY not set"))?;
    let signer = load_signer(key, config.chain_id)?;
    let chain = AlloyChain::connect(&config.rpc_url, signer)?;
    fill_factory(&chain, &mut addresses).await;
    let ctx = PilotContext::new(chain, &addresses, &config);

    let steps = plan(cli.command.unwrap_or(Command::Demo), &ctx.book)?;
    info!("Running {} step(s)", steps.len());

    let summary = run(&ctx, steps).await;

    if cli.json {
        println!("{}", render_json(&summary)?);
    } else {
        print_summary(&summary);
    }

    match summary.failures() {
        0 => Ok(()),
        n => Err(eyre!("{} of {} operations failed", n, summary.operations.len())),
    }
}
