//! ember-cli — Operator command line for the Ember ledger.
//!
//! Awards credits, tunes per-account decay rates, and inspects balances and
//! profiles against a local ledger database. Mutations print the audit
//! events they produced.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use ember_core::constants::BPS_SCALE;
use ember_core::types::{AccountId, CreditClass, LedgerEvent};
use ember_service::{LedgerConfig, LedgerService};

/// Ember operator command-line interface.
#[derive(Parser)]
#[command(name = "ember-cli")]
#[command(version, about = "Energy credits that fade unless renewed.")]
struct Cli {
    /// Root directory for ledger data (default: platform data dir).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Administrator identity: 64 hex characters or a label.
    #[arg(long, global = true, default_value = "ember-admin")]
    admin: String,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Layer the command-line overrides over the default configuration.
    fn build_config(&self) -> LedgerConfig {
        let mut config = LedgerConfig::default();
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Mint credits into an account.
    Award(AwardArgs),
    /// Set an account's per-day retention rate.
    SetRate(SetRateArgs),
    /// Show effective and raw balances.
    Balance(BalanceArgs),
    /// Show an account's decay profile.
    Profile(ProfileArgs),
    /// Metadata base URI subcommands.
    Metadata {
        #[command(subcommand)]
        action: MetadataAction,
    },
    /// Hand the administrator role to another account.
    TransferAdmin(TransferAdminArgs),
    /// List the credit classes and their indexes.
    Classes,
}

#[derive(Subcommand)]
enum MetadataAction {
    /// Show the stored base URI.
    Get,
    /// Set the base URI.
    Set(MetadataSetArgs),
}

#[derive(Args)]
struct AwardArgs {
    /// Recipient account: 64 hex characters or a label.
    #[arg(short, long)]
    account: String,

    /// Credit class: name (efficiency, compliance, innovation) or index.
    #[arg(short, long)]
    class: String,

    /// Amount of credits to mint.
    #[arg(long)]
    amount: u64,

    /// Caller identity (defaults to the configured admin).
    #[arg(long)]
    caller: Option<String>,
}

#[derive(Args)]
struct SetRateArgs {
    /// Account: 64 hex characters or a label.
    #[arg(short, long)]
    account: String,

    /// Retention rate in basis points per day (0..=10000).
    #[arg(short, long)]
    rate_bps: u64,

    /// Caller identity (defaults to the configured admin).
    #[arg(long)]
    caller: Option<String>,
}

#[derive(Args)]
struct BalanceArgs {
    /// Account: 64 hex characters or a label.
    #[arg(short, long)]
    account: String,

    /// Restrict to one class (name or index). All classes if omitted.
    #[arg(short, long)]
    class: Option<String>,

    /// Emit machine-readable JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ProfileArgs {
    /// Account: 64 hex characters or a label.
    #[arg(short, long)]
    account: String,
}

#[derive(Args)]
struct MetadataSetArgs {
    /// The base URI credits resolve their metadata against.
    uri: String,

    /// Caller identity (defaults to the configured admin).
    #[arg(long)]
    caller: Option<String>,
}

#[derive(Args)]
struct TransferAdminArgs {
    /// New administrator: 64 hex characters or a label.
    #[arg(short, long)]
    to: String,

    /// Caller identity (defaults to the configured admin).
    #[arg(long)]
    caller: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.build_config();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    let admin = parse_account(&cli.admin)?;

    match cli.command {
        Commands::Award(args) => award(&config, admin, args),
        Commands::SetRate(args) => set_rate(&config, admin, args),
        Commands::Balance(args) => balance(&config, admin, args),
        Commands::Profile(args) => profile(&config, admin, args),
        Commands::Metadata { action } => match action {
            MetadataAction::Get => metadata_get(&config, admin),
            MetadataAction::Set(args) => metadata_set(&config, admin, args),
        },
        Commands::TransferAdmin(args) => transfer_admin(&config, admin, args),
        Commands::Classes => classes(),
    }
}

/// Mint credits into an account.
fn award(config: &LedgerConfig, admin: AccountId, args: AwardArgs) -> Result<()> {
    let service = open_service(config, admin)?;
    let account = parse_account(&args.account)?;
    let class_index = parse_class(&args.class)?;
    let caller = resolve_caller(args.caller.as_deref(), admin)?;

    service
        .award(&caller, account, class_index, args.amount)
        .context("award refused")?;

    println!("\n=== CREDITS AWARDED ===");
    println!("Account: {account}");
    println!("Class: {}", CreditClass::from_index(class_index)?);
    println!("Amount: {}", args.amount);
    print_events(&service.drain_events());
    Ok(())
}

/// Set an account's retention rate.
fn set_rate(config: &LedgerConfig, admin: AccountId, args: SetRateArgs) -> Result<()> {
    let service = open_service(config, admin)?;
    let account = parse_account(&args.account)?;
    let caller = resolve_caller(args.caller.as_deref(), admin)?;

    service
        .set_decay_rate(&caller, account, args.rate_bps)
        .context("rate change refused")?;

    println!("\n=== DECAY RATE UPDATED ===");
    println!("Account: {account}");
    println!("Rate: {}", render_rate(args.rate_bps));
    print_events(&service.drain_events());
    Ok(())
}

/// Query and display balances.
fn balance(config: &LedgerConfig, admin: AccountId, args: BalanceArgs) -> Result<()> {
    let service = open_service(config, admin)?;
    let account = parse_account(&args.account)?;

    let classes: Vec<CreditClass> = match &args.class {
        Some(spec) => vec![CreditClass::from_index(parse_class(spec)?)?],
        None => CreditClass::ALL.to_vec(),
    };

    let mut rows = Vec::new();
    for class in &classes {
        let raw = service.raw_balance(&account, class.index())?;
        let effective = service.effective_balance(&account, class.index())?;
        rows.push((*class, raw, effective));
    }

    if args.json {
        let balances: Vec<serde_json::Value> = rows
            .iter()
            .map(|(class, raw, effective)| {
                serde_json::json!({
                    "class": class.label(),
                    "index": class.index(),
                    "raw": raw,
                    "effective": effective,
                    "decayed": raw.saturating_sub(*effective),
                })
            })
            .collect();
        let value = serde_json::json!({
            "account": account.to_string(),
            "balances": balances,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("\n=== ACCOUNT BALANCE ===");
    println!("Account: {account}");
    println!();
    for (class, raw, effective) in &rows {
        let decayed = raw.saturating_sub(*effective);
        println!(
            "{:<12} effective {:>20}  raw {:>20}  decayed {:>20}",
            class.label(),
            effective,
            raw,
            decayed
        );
    }
    Ok(())
}

/// Display an account's decay profile.
fn profile(config: &LedgerConfig, admin: AccountId, args: ProfileArgs) -> Result<()> {
    let service = open_service(config, admin)?;
    let account = parse_account(&args.account)?;

    println!("\n=== DECAY PROFILE ===");
    println!("Account: {account}");
    match service.decay_profile(&account)? {
        Some(profile) => {
            println!("Rate: {}", render_rate(profile.rate_bps));
            println!("Last update: {}", render_timestamp(profile.last_update));
            let now = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs();
            println!("Whole days since update: {}", profile.days_elapsed(now));
        }
        None => println!("No profile: account has never been awarded or configured."),
    }
    Ok(())
}

/// Show the stored base URI.
fn metadata_get(config: &LedgerConfig, admin: AccountId) -> Result<()> {
    let service = open_service(config, admin)?;
    match service.base_metadata()? {
        Some(uri) => println!("{uri}"),
        None => println!("(unset)"),
    }
    Ok(())
}

/// Set the base URI.
fn metadata_set(config: &LedgerConfig, admin: AccountId, args: MetadataSetArgs) -> Result<()> {
    let service = open_service(config, admin)?;
    let caller = resolve_caller(args.caller.as_deref(), admin)?;

    service
        .set_base_metadata(&caller, &args.uri)
        .context("metadata update refused")?;

    println!("Base metadata set to: {}", args.uri);
    Ok(())
}

/// Hand the administrator role to another account.
fn transfer_admin(config: &LedgerConfig, admin: AccountId, args: TransferAdminArgs) -> Result<()> {
    let service = open_service(config, admin)?;
    let next = parse_account(&args.to)?;
    let caller = resolve_caller(args.caller.as_deref(), admin)?;

    service
        .transfer_admin(&caller, next)
        .context("admin transfer refused")?;

    println!("\n=== ADMINISTRATOR TRANSFERRED ===");
    println!("New admin: {next}");
    println!("Note: the admin role is instance configuration; pass --admin accordingly next run.");
    print_events(&service.drain_events());
    Ok(())
}

/// List the credit classes.
fn classes() -> Result<()> {
    println!("Credit classes:");
    for class in CreditClass::ALL {
        println!("  {} = {}", class.index(), class.label());
    }
    Ok(())
}

/// Open the ledger service over the configured data directory.
fn open_service(config: &LedgerConfig, admin: AccountId) -> Result<LedgerService> {
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("failed to create {}", config.data_dir.display()))?;
    LedgerService::open(config, admin).context("failed to open ledger")
}

/// Print the audit events a mutation produced.
fn print_events(events: &[LedgerEvent]) {
    if events.is_empty() {
        return;
    }
    println!();
    println!("Events:");
    for event in events {
        match event {
            LedgerEvent::Awarded {
                account,
                class,
                amount,
            } => println!("  awarded {amount} {class} to {account}"),
            LedgerEvent::DecayRateUpdated { account, rate_bps } => {
                println!("  decay rate for {account} set to {rate_bps} bps")
            }
            LedgerEvent::CreditsExpired {
                account,
                class,
                amount,
            } => println!("  expired {amount} {class} from {account}"),
            LedgerEvent::BaseMetadataUpdated { uri } => {
                println!("  base metadata set to {uri}")
            }
            LedgerEvent::AdminTransferred { previous, next } => {
                println!("  admin transferred from {previous} to {next}")
            }
        }
    }
}

/// Parse an account spec: 64 hex characters, or any other non-empty string
/// treated as a label and hashed to an id.
fn parse_account(spec: &str) -> Result<AccountId> {
    let trimmed = spec.trim();
    if trimmed.len() == 64 && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        let bytes = hex::decode(trimmed).context("invalid hex account id")?;
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|_| anyhow::anyhow!("account id must be exactly 32 bytes"))?;
        Ok(AccountId::from_bytes(array))
    } else if trimmed.is_empty() {
        bail!("account must be 64 hex characters or a non-empty label");
    } else {
        Ok(AccountId::from_label(trimmed))
    }
}

/// Parse a class spec: a class name or a bare index.
///
/// Unknown names fail here; numeric indexes are passed through so the
/// service can report out-of-range values itself.
fn parse_class(spec: &str) -> Result<u8> {
    let lowered = spec.trim().to_lowercase();
    for class in CreditClass::ALL {
        if lowered == class.label() {
            return Ok(class.index());
        }
    }
    lowered
        .parse::<u8>()
        .map_err(|_| anyhow::anyhow!("unknown class {spec:?} (try `ember-cli classes`)"))
}

/// Resolve the caller identity, defaulting to the configured admin.
fn resolve_caller(spec: Option<&str>, admin: AccountId) -> Result<AccountId> {
    match spec {
        Some(s) => parse_account(s),
        None => Ok(admin),
    }
}

/// Render a rate in basis points with its retention percentage.
fn render_rate(rate_bps: u64) -> String {
    format!(
        "{rate_bps} bps/day ({:.2}% retained per day)",
        rate_bps as f64 / BPS_SCALE as f64 * 100.0
    )
}

/// Render a Unix timestamp as UTC, falling back to the raw seconds.
fn render_timestamp(secs: u64) -> String {
    match chrono::DateTime::from_timestamp(secs as i64, 0) {
        Some(dt) => format!("{} (unix {secs})", dt.format("%Y-%m-%d %H:%M:%S UTC")),
        None => format!("unix {secs}"),
    }
}
