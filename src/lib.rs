pub mod cli;
pub mod core;
pub mod providers;

use crate::core::CurrencyCatalog;
use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        base: Option<String>,
        quote: Option<String>,
    },
    Rate {
        base: Option<String>,
        quote: Option<String>,
        amount: Option<String>,
    },
    History {
        base: Option<String>,
        quote: Option<String>,
        days: Option<u32>,
    },
    Currencies,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Divisa starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let catalog = CurrencyCatalog::builtin();

    match command {
        AppCommand::Convert { base, quote } => {
            cli::convert::run(&config, &catalog, base.as_deref(), quote.as_deref()).await
        }
        AppCommand::Rate {
            base,
            quote,
            amount,
        } => {
            cli::rate::run(
                &config,
                &catalog,
                base.as_deref(),
                quote.as_deref(),
                amount.as_deref(),
            )
            .await
        }
        AppCommand::History { base, quote, days } => {
            cli::history::run(&config, &catalog, base.as_deref(), quote.as_deref(), days).await
        }
        AppCommand::Currencies => {
            cli::currencies::run(&catalog);
            Ok(())
        }
    }
}
