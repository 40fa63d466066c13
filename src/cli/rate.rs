use super::chart::HiddenChart;
use super::convert::status_block;
use super::{session_on, ui};
use crate::core::config::AppConfig;
use crate::core::CurrencyCatalog;
use anyhow::{Result, anyhow};
use tracing::info;

/// Fetches the current rate once, optionally converts `amount` from the base
/// currency, and prints the result.
pub async fn run(
    config: &AppConfig,
    catalog: &CurrencyCatalog,
    base: Option<&str>,
    quote: Option<&str>,
    amount: Option<&str>,
) -> Result<()> {
    let pair = config.initial_pair(catalog, base, quote)?;
    let (mut session, mut events) = session_on(config, pair.clone(), HiddenChart)?;

    let pb = ui::new_spinner(&format!("Fetching {pair}"));
    session.start();
    session.settle(&mut events).await;
    pb.finish_and_clear();

    let controller = session.controller();
    let Some(rate) = controller.state().rate() else {
        return Err(anyhow!(
            "{}",
            controller
                .notice()
                .map_or_else(|| format!("No rate available for {pair}"), str::to_string)
        ));
    };
    info!(%pair, rate, "Fetched rate");

    if let Some(amount) = amount {
        session.edit_base_amount(amount);
    }
    println!("{}", status_block(session.controller(), catalog)?);
    Ok(())
}
