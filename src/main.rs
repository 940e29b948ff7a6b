use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use ratewatch::cli::setup::setup;
use ratewatch::cli::watch::WatchOptions;
use ratewatch::core::Currency;
use ratewatch::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct BaseArgs {
    /// Base currency symbol, e.g. EUR
    #[arg(short, long)]
    base: Option<Currency>,

    /// Amount of the base currency to convert
    #[arg(short, long, allow_hyphen_values = true)]
    amount: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show live rates, refreshed on every poll
    Watch {
        #[command(flatten)]
        base: BaseArgs,

        /// Delay between fetches in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Exit after this many updates
        #[arg(long)]
        updates: Option<usize>,

        /// Do not read commands from stdin
        #[arg(long)]
        no_input: bool,
    },
    /// Convert an amount once and exit
    Convert {
        #[command(flatten)]
        base: BaseArgs,
    },
    /// List known currencies
    Currencies,
}

impl From<Commands> for ratewatch::AppCommand {
    fn from(cmd: Commands) -> ratewatch::AppCommand {
        match cmd {
            Commands::Watch {
                base,
                interval_ms,
                updates,
                no_input,
            } => ratewatch::AppCommand::Watch(WatchOptions {
                base: base.base,
                amount: base.amount,
                interval_ms,
                updates,
                interactive: !no_input,
            }),
            Commands::Convert { base } => ratewatch::AppCommand::Convert {
                base: base.base,
                amount: base.amount,
            },
            Commands::Currencies => ratewatch::AppCommand::Currencies,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => ratewatch::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
