//! Tredgate CLI - Command-line interface for Tredgate
//!
//! Provides commands for:
//! - Creating loan applications and listing them
//! - Approving, rejecting and auto-deciding applications
//! - Viewing the audit trail
//! - Computing monthly payments
//! - Inspecting configuration

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tredgate_core::config::Config;

mod commands;
mod context;
mod output;

use commands::{
    audit::AuditCommand,
    config::ConfigCommand,
    create::CreateCommand,
    decide::{ApproveCommand, DecideCommand, RejectCommand},
    delete::DeleteCommand,
    list::ListCommand,
    payment::PaymentCommand,
    show::ShowCommand,
    summary::SummaryCommand,
};
use context::{load_config, resolve_config_path};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "tredgate", version, about = "Loan application tracking with an audit trail")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Submit a new loan application
    Create(CreateCommand),
    /// List loan applications
    List(ListCommand),
    /// Show one application with its audit trail
    Show(ShowCommand),
    /// Approve an application
    Approve(ApproveCommand),
    /// Reject an application
    Reject(RejectCommand),
    /// Apply the auto-decision rule to an application
    Decide(DecideCommand),
    /// Delete an application (its audit trail is kept)
    Delete(DeleteCommand),
    /// Show counts and totals over all applications
    Summary(SummaryCommand),
    /// View audit log entries
    Audit(AuditCommand),
    /// Compute a monthly payment without creating an application
    Payment(PaymentCommand),
    /// View and validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Default filter when `RUST_LOG` is not set
fn default_filter(verbose: u8, quiet: bool, configured: &str) -> String {
    if quiet {
        return "error".to_string();
    }
    match verbose {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = resolve_config_path(cli.config.as_deref());
    // `config validate` reports a broken file itself instead of failing here
    let config = match cli.command {
        Commands::Config(_) => Config::load_or_default(&config_path),
        _ => load_config(&config_path, cli.config.is_some())?,
    };

    // Setup tracing
    let filter = default_filter(cli.verbose, cli.quiet, &config.logging.level);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    match cli.command {
        Commands::Create(cmd) => cmd.execute(&config, format).await,
        Commands::List(cmd) => cmd.execute(&config, format).await,
        Commands::Show(cmd) => cmd.execute(&config, format).await,
        Commands::Approve(cmd) => cmd.execute(&config, format).await,
        Commands::Reject(cmd) => cmd.execute(&config, format).await,
        Commands::Decide(cmd) => cmd.execute(&config, format).await,
        Commands::Delete(cmd) => cmd.execute(&config, format).await,
        Commands::Summary(cmd) => cmd.execute(&config, format).await,
        Commands::Audit(cmd) => cmd.execute(&config, format).await,
        Commands::Payment(cmd) => cmd.execute(&config, format).await,
        Commands::Config(cmd) => cmd.execute(&config_path, format).await,
    }
}
