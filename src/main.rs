use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use divisa::core::history::MAX_WINDOW_DAYS;
use divisa::core::log::init_logging;

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
struct PairArgs {
    /// Base currency code, e.g. USD
    #[arg(short, long)]
    base: Option<String>,

    /// Quote currency code, e.g. EUR
    #[arg(short, long)]
    quote: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Interactive two-way converter
    Convert {
        #[command(flatten)]
        pair: PairArgs,
    },
    /// Print the current rate, optionally converting an amount
    Rate {
        #[command(flatten)]
        pair: PairArgs,
        /// Amount in the base currency
        #[arg(short, long)]
        amount: Option<String>,
    },
    /// Show daily rates for a trailing window
    History {
        #[command(flatten)]
        pair: PairArgs,
        /// Days of history, defaults to the configured window
        #[arg(
            short,
            long,
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_WINDOW_DAYS))
        )]
        days: Option<u32>,
    },
    /// List supported currencies
    Currencies,
}

impl From<Commands> for divisa::AppCommand {
    fn from(cmd: Commands) -> divisa::AppCommand {
        match cmd {
            Commands::Convert { pair } => divisa::AppCommand::Convert {
                base: pair.base,
                quote: pair.quote,
            },
            Commands::Rate { pair, amount } => divisa::AppCommand::Rate {
                base: pair.base,
                quote: pair.quote,
                amount,
            },
            Commands::History { pair, days } => divisa::AppCommand::History {
                base: pair.base,
                quote: pair.quote,
                days,
            },
            Commands::Currencies => divisa::AppCommand::Currencies,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => divisa::cli::setup::setup(),
        Some(cmd) => divisa::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
