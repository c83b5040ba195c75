//! dust-cli — Command-line interface to the Dust reward ledger.
//!
//! Operates directly on a local RocksDB ledger: minting positions,
//! injecting deposits, realizing rewards, and inspecting solvency.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

use dust_core::constants::UNIT;
use dust_core::types::{AccountId, Amount, PositionId};
use dust_store::{LedgerService, StoreConfig};

/// Dust ledger command-line interface.
#[derive(Parser)]
#[command(name = "dust-cli")]
#[command(version, about = "Position-weighted reward accrual ledger.")]
struct Cli {
    /// Root directory for ledger data (default: platform data dir + /dust).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level filter (e.g. "info", "debug", "dust_store=trace").
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mint a new position.
    Mint(MintArgs),
    /// Inject external value into the reward pool.
    Deposit(DepositArgs),
    /// Realize 25% of a position's pending reward, redistribute the rest.
    SoftWithdraw(ClaimArgs),
    /// Realize 75% and permanently deactivate the position.
    HardWithdraw(ClaimArgs),
    /// Reinvest: keep 25% claimable, redistribute 75%, grow weight.
    Redistribute(ClaimArgs),
    /// Record an ownership transfer from the external token layer.
    Transfer(TransferArgs),
    /// Show one position with its pending reward.
    Info(IdArgs),
    /// Show the pending reward for one position.
    Pending(IdArgs),
    /// Check whether a position is the last one standing.
    Victory(IdArgs),
    /// Aggregate solvency diagnostics.
    Health,
    /// List all positions.
    List,
}

#[derive(Args)]
struct MintArgs {
    /// Owner account (64 hex chars).
    #[arg(short, long)]
    owner: String,

    /// Initial weight in [1, 100].
    #[arg(short, long)]
    weight: u32,
}

#[derive(Args)]
struct DepositArgs {
    /// Amount in motes (1 DUST = 100000000 motes).
    #[arg(short, long)]
    amount: Amount,
}

#[derive(Args)]
struct ClaimArgs {
    /// Position id.
    #[arg(short, long)]
    id: u64,

    /// Calling account (64 hex chars); must own the position.
    #[arg(short, long)]
    caller: String,
}

#[derive(Args)]
struct TransferArgs {
    /// Position id.
    #[arg(short, long)]
    id: u64,

    /// New owner account (64 hex chars).
    #[arg(short, long)]
    new_owner: String,
}

#[derive(Args)]
struct IdArgs {
    /// Position id.
    #[arg(short, long)]
    id: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log);

    let mut config = StoreConfig {
        log_level: cli.log.clone(),
        ..StoreConfig::default()
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let mut service = LedgerService::open(&config)
        .with_context(|| format!("failed to open ledger at {}", config.db_path().display()))?;

    match cli.command {
        Commands::Mint(args) => {
            let owner = parse_account(&args.owner)?;
            let out = service.mint(owner, args.weight)?;
            println!(
                "minted position {} with weight {} for {}",
                out.id,
                out.weight,
                format_dust(out.payment)
            );
        }
        Commands::Deposit(args) => {
            service.deposit_external(args.amount)?;
            println!(
                "deposited {}, pool balance {}",
                format_dust(args.amount),
                format_dust(service.state().pool_balance())
            );
        }
        Commands::SoftWithdraw(args) => {
            let caller = parse_account(&args.caller)?;
            let out = service.soft_withdraw(caller, PositionId(args.id))?;
            println!(
                "paid out {}, redistributed {}, new weight {}",
                format_dust(out.payout),
                format_dust(out.redistributed),
                out.new_weight
            );
        }
        Commands::HardWithdraw(args) => {
            let caller = parse_account(&args.caller)?;
            let out = service.hard_withdraw(caller, PositionId(args.id))?;
            println!(
                "paid out {}, redistributed {}; position deactivated",
                format_dust(out.payout),
                format_dust(out.redistributed)
            );
        }
        Commands::Redistribute(args) => {
            let caller = parse_account(&args.caller)?;
            let out = service.redistribute(caller, PositionId(args.id))?;
            println!(
                "kept {}, redistributed {}, new weight {}",
                format_dust(out.kept),
                format_dust(out.redistributed),
                out.new_weight
            );
        }
        Commands::Transfer(args) => {
            let new_owner = parse_account(&args.new_owner)?;
            service.set_owner(PositionId(args.id), new_owner)?;
            println!("position #{} now owned by {new_owner}", args.id);
        }
        Commands::Info(args) => {
            let info = service.position_info(PositionId(args.id))?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Commands::Pending(args) => {
            let pending = service.pending_reward(PositionId(args.id))?;
            println!("{}", format_dust(pending));
        }
        Commands::Victory(args) => {
            if service.can_claim_victory(PositionId(args.id)) {
                println!("position #{} is the last active position", args.id);
            } else {
                println!("position #{} cannot claim victory", args.id);
            }
        }
        Commands::Health => {
            let health = service.contract_health()?;
            println!("{}", serde_json::to_string_pretty(&health)?);
        }
        Commands::List => {
            for pos in service.state().positions() {
                let status = if pos.is_active() { "active" } else { "inactive" };
                println!(
                    "{}  owner {}  weight {}  claimed {}  {}",
                    pos.id,
                    pos.owner,
                    pos.weight,
                    format_dust(pos.claimed),
                    status
                );
            }
        }
    }

    Ok(())
}

fn init_logging(level_str: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_level(true))
        .init();
}

/// Parse a 64-character hex string into an account id.
fn parse_account(input: &str) -> Result<AccountId> {
    let bytes = hex::decode(input.trim()).context("account must be hex")?;
    let arr: [u8; 32] = match bytes.try_into() {
        Ok(arr) => arr,
        Err(_) => bail!("account must be exactly 32 bytes (64 hex chars)"),
    };
    Ok(AccountId::from_bytes(arr))
}

/// Format motes as a decimal DUST amount.
fn format_dust(motes: Amount) -> String {
    format!("{}.{:08} DUST", motes / UNIT, motes % UNIT)
}
