//! Interactive conversion session

use super::{TerminalSession, currencies, terminal_session, ui};
use crate::core::config::AppConfig;
use crate::core::{ChartRenderer, CodeChange, ConversionController, CurrencyCatalog, Resolution};
use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  base CODE     change the base currency
  quote CODE    change the quote currency
  b AMOUNT      edit the base amount
  q AMOUNT      edit the quote amount
  show          print the current conversion
  list          list known currencies
  help          show this help
  quit          leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Base(String),
    Quote(String),
    BaseAmount(String),
    QuoteAmount(String),
    Show,
    List,
    Help,
    Quit,
    Unknown(String),
}

/// Parses one input line. Amount text is kept exactly as typed after the
/// first space. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim_start();
    if line.trim_end().is_empty() {
        return None;
    }
    let (word, rest) = line.split_once(' ').unwrap_or((line.trim_end(), ""));

    let command = match word.to_ascii_lowercase().as_str() {
        "base" => Command::Base(rest.trim().to_string()),
        "quote" => Command::Quote(rest.trim().to_string()),
        "b" => Command::BaseAmount(rest.to_string()),
        "q" => Command::QuoteAmount(rest.to_string()),
        "show" => Command::Show,
        "list" => Command::List,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(word.to_string()),
    };
    Some(command)
}

/// Headline rate, both amounts with their symbols, and any pending/failed state.
pub fn status_block<C: ChartRenderer>(
    controller: &ConversionController<C>,
    catalog: &CurrencyCatalog,
) -> Result<String> {
    let state = controller.state();
    let base = catalog.info(state.base_code())?;
    let quote = catalog.info(state.quote_code())?;

    let rate = state
        .rate()
        .map_or_else(|| "?".to_string(), |rate| rate.to_string());
    let mut lines = vec![ui::style_text(
        &format!("1 {} = {} {}", base.name, rate, quote.name),
        ui::StyleType::Title,
    )];
    lines.push(format!(
        "{} {} {} = {} {} {}",
        base.symbol,
        ui::style_text(state.base_amount(), ui::StyleType::Value),
        state.base_code(),
        quote.symbol,
        ui::style_text(state.quote_amount(), ui::StyleType::Value),
        state.quote_code(),
    ));
    if state.loading() {
        lines.push(ui::style_text("Loading rate...", ui::StyleType::Subtle));
    }
    if let Some(notice) = controller.notice() {
        lines.push(ui::style_text(notice, ui::StyleType::Error));
    }
    Ok(lines.join("\n"))
}

fn print_code_change(session: &TerminalSession, catalog: &CurrencyCatalog, change: CodeChange) -> Result<()> {
    match change {
        CodeChange::Issued => println!("{}", status_block(session.controller(), catalog)?),
        CodeChange::Busy => println!(
            "{}",
            ui::style_text(
                "Still loading the current rate, try again in a moment.",
                ui::StyleType::Subtle
            )
        ),
    }
    Ok(())
}

/// Applies one command. Returns `false` when the session should end.
fn handle(session: &mut TerminalSession, catalog: &CurrencyCatalog, command: Command) -> Result<bool> {
    match command {
        Command::Base(raw) => match catalog.code(&raw) {
            Ok(code) => {
                let change = session.set_base_code(code);
                print_code_change(session, catalog, change)?;
            }
            Err(e) => println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error)),
        },
        Command::Quote(raw) => match catalog.code(&raw) {
            Ok(code) => {
                let change = session.set_quote_code(code);
                print_code_change(session, catalog, change)?;
            }
            Err(e) => println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error)),
        },
        Command::BaseAmount(raw) => {
            session.edit_base_amount(&raw);
            println!("{}", status_block(session.controller(), catalog)?);
        }
        Command::QuoteAmount(raw) => {
            session.edit_quote_amount(&raw);
            println!("{}", status_block(session.controller(), catalog)?);
        }
        Command::Show => println!("{}", status_block(session.controller(), catalog)?),
        Command::List => println!("{}", currencies::catalog_table(catalog)),
        Command::Help => println!("{HELP}"),
        Command::Quit => return Ok(false),
        Command::Unknown(word) => {
            println!("Unknown command '{word}'. Type `help` for the list of commands.")
        }
    }
    Ok(true)
}

pub async fn run(
    config: &AppConfig,
    catalog: &CurrencyCatalog,
    base: Option<&str>,
    quote: Option<&str>,
) -> Result<()> {
    let pair = config.initial_pair(catalog, base, quote)?;
    let (mut session, mut events) = terminal_session(config, pair)?;

    println!(
        "{}\n\n{HELP}\n",
        ui::style_text("Divisa Currency Converter", ui::StyleType::Title)
    );
    session.start();
    println!("{}", status_block(session.controller(), catalog)?);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };
                let Some(command) = parse_command(&line) else {
                    continue;
                };
                if !handle(&mut session, catalog, command)? {
                    break;
                }
            }
            Some(event) = events.recv() => {
                if session.apply(event) != Resolution::Stale {
                    println!("{}", status_block(session.controller(), catalog)?);
                }
            }
        }
    }

    Ok(())
}
