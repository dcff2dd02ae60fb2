use alloy::primitives::Address;
use clap::{Args, Parser, Subcommand};
use console::style;
use epochval_aggregator::EpochValuation;
use epochval_common::{AggregateReport, EpochTime};
use epochval_utils::{
    config::Config, disk_storage::DiskStorageInterface, shutdown::cancel_on_ctrl_c,
};
use inquire::Text;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Total and average ETH held by an NFT collection's owners at a point in time
#[derive(Parser, Debug)]
#[command(name = "epochval", bin_name = "epochval", version)]
#[command(subcommand_required = false, arg_required_else_help = false)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    #[command(flatten)]
    pub run: RunArgs,

    /// Debug logging for epochval's own crates
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect or update ~/.epochval/config.toml
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective file config (keys masked)
    Show,

    /// Save API keys to the config file
    SetKey {
        #[arg(long)]
        alchemy: Option<String>,
        #[arg(long)]
        etherscan: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Unix timestamp in seconds; prompted for when omitted
    pub timestamp: Option<EpochTime>,

    /// Print the full report, per-address details included, as JSON
    #[arg(long)]
    pub json: bool,

    /// Look up the failed addresses once more before reporting
    #[arg(long)]
    pub retry_failed: bool,

    /// NFT contract whose owners are valued
    #[arg(long)]
    pub collection: Option<Address>,

    /// Addresses looked up concurrently per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Pause between batches, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Per-lookup timeout, in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// JSON-RPC endpoint for balance lookups (defaults to Alchemy)
    #[arg(long, env = "EPOCHVAL_RPC_URL")]
    pub rpc_url: Option<String>,

    #[arg(long, env = "ALCHEMY_API_KEY", hide_env_values = true)]
    pub alchemy_api_key: Option<String>,

    #[arg(long, env = "ETHERSCAN_API_KEY", hide_env_values = true)]
    pub etherscan_api_key: Option<String>,
}

impl RunArgs {
    /// Flags and environment win over the config file.
    pub fn apply(&self, config: &mut Config) {
        if let Some(collection) = self.collection {
            config.collection = collection;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.inter_batch_delay_ms = delay_ms;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.fetch_timeout_ms = timeout_ms;
        }
        if self.rpc_url.is_some() {
            config.rpc_url = self.rpc_url.clone();
        }
        if self.alchemy_api_key.is_some() {
            config.alchemy_api_key = self.alchemy_api_key.clone();
        }
        if self.etherscan_api_key.is_some() {
            config.etherscan_api_key = self.etherscan_api_key.clone();
        }
    }
}

impl Cli {
    pub async fn handle(self) -> Result<()> {
        match self.cmd {
            Some(Commands::Config { action }) => handle_config(action),
            None => run(self.run).await,
        }
    }
}

fn handle_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", Config::path()?.display());
            println!("{:#?}", Config::load()?);
        }
        ConfigAction::SetKey { alchemy, etherscan } => {
            if alchemy.is_none() && etherscan.is_none() {
                return Err(Error::NoKeysGiven);
            }
            Config::set_api_keys(alchemy, etherscan)?;
            println!("Saved to {}", Config::path()?.display());
        }
    }
    Ok(())
}

async fn run(args: RunArgs) -> Result<()> {
    let mut config = Config::load()?;
    args.apply(&mut config);

    // fail on missing keys before asking for input
    let valuation = EpochValuation::from_config(&config)?;

    let epoch = match args.timestamp {
        Some(epoch) => epoch,
        None => prompt_epoch()?,
    };

    eprintln!("Calculating ETH values for epoch time {epoch}...");

    let shutdown_signal = CancellationToken::new();
    let ctrl_c = cancel_on_ctrl_c(shutdown_signal.clone());

    let mut report = valuation.value_at_epoch(epoch, &shutdown_signal).await?;
    if args.retry_failed && !report.is_partial() {
        report = valuation.retry_failed(report, &shutdown_signal).await?;
    }

    shutdown_signal.cancel();
    let _ = ctrl_c.await;

    print_report(&report, args.json)
}

fn prompt_epoch() -> Result<EpochTime> {
    loop {
        let input = Text::new("Enter epoch time:").prompt()?;
        match input.parse::<EpochTime>() {
            Ok(epoch) => return Ok(epoch),
            Err(_) => eprintln!(
                "{} Invalid epoch time. Please enter a valid positive number.",
                style("error:").red()
            ),
        }
    }
}

fn print_report(report: &AggregateReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("\n{report}");
    if report.failed_count() > 0 {
        println!(
            "{} {} lookups failed, rerun with --retry-failed or --json for details",
            style("warning:").yellow(),
            report.failed_count()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_run_flags() {
        let cli = Cli::try_parse_from([
            "epochval",
            "1630000000",
            "--batch-size",
            "50",
            "--delay-ms",
            "250",
            "--json",
        ])
        .unwrap();

        assert!(cli.cmd.is_none());
        assert_eq!(cli.run.timestamp.unwrap().seconds(), 1630000000);
        assert!(cli.run.json);

        let mut config = Config::default();
        cli.run.apply(&mut config);
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.inter_batch_delay_ms, 250);
        assert_eq!(config.fetch_timeout_ms, Config::default().fetch_timeout_ms);
    }

    #[test]
    fn test_rejects_invalid_timestamp() {
        assert!(Cli::try_parse_from(["epochval", "0"]).is_err());
        assert!(Cli::try_parse_from(["epochval", "yesterday"]).is_err());
    }

    #[test]
    fn test_config_subcommand() {
        let cli =
            Cli::try_parse_from(["epochval", "config", "set-key", "--alchemy", "abc"]).unwrap();
        match cli.cmd {
            Some(Commands::Config {
                action: ConfigAction::SetKey { alchemy, etherscan },
            }) => {
                assert_eq!(alchemy.as_deref(), Some("abc"));
                assert!(etherscan.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
