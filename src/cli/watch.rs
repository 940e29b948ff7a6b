use super::table::{RateTable, heading};
use super::ui::{self, StyleType};
use crate::core::amount::parse_amount;
use crate::core::{Currency, RateEntry, RatesProvider, RatesUpdate, RatesViewModel};
use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, info, warn};

/// Flags of the `watch` subcommand. Unset values come from the config.
#[derive(Debug, Clone, Default)]
pub struct WatchOptions {
    pub base: Option<Currency>,
    pub amount: Option<String>,
    pub interval_ms: Option<u64>,
    /// Stop after this many updates.
    pub updates: Option<usize>,
    /// Read commands from stdin.
    pub interactive: bool,
}

/// A line typed while watching.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Quit,
    ClearAmount,
    Amount(Decimal),
    /// Zero-based row position.
    SelectRow(usize),
    SelectCurrency(Currency),
}

pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    match line {
        "q" | "quit" => return Ok(Command::Quit),
        "-" => return Ok(Command::ClearAmount),
        _ => {}
    }

    if let Some(row) = line.strip_prefix('#') {
        let row: usize = row
            .trim()
            .parse()
            .with_context(|| format!("Invalid row number: {row}"))?;
        if row == 0 {
            bail!("Rows are numbered from 1");
        }
        return Ok(Command::SelectRow(row - 1));
    }

    if line.chars().any(|c| c.is_ascii_alphabetic()) {
        return Ok(Command::SelectCurrency(line.parse()?));
    }

    Ok(match parse_amount(line)? {
        Some(amount) => Command::Amount(amount),
        None => Command::ClearAmount,
    })
}

pub async fn run(
    provider: Arc<dyn RatesProvider>,
    base: RateEntry,
    interval: Duration,
    options: &WatchOptions,
) -> Result<()> {
    info!(base = %base.currency, ?interval, "Watching rates");

    let mut view_model = RatesViewModel::new(provider, interval, base);
    let mut table = RateTable::default();
    let mut lines = options
        .interactive
        .then(|| BufReader::new(tokio::io::stdin()).lines());
    let mut received = 0;

    if options.interactive {
        println!(
            "{}",
            ui::style_text(
                "Type an amount, a currency symbol, #N to pick a row, - to clear or q to quit",
                StyleType::Subtle
            )
        );
    }

    let spinner = ui::new_spinner("Fetching rates...");
    view_model.start();

    loop {
        tokio::select! {
            update = view_model.next_update() => {
                let Some(update) = update else {
                    spinner.finish_and_clear();
                    bail!("Rate polling stopped unexpectedly");
                };
                spinner.finish_and_clear();
                print_update(&mut table, view_model.base(), update);

                received += 1;
                if options.updates.is_some_and(|limit| received >= limit) {
                    debug!(received, "Update limit reached");
                    break;
                }
            }
            line = next_line(&mut lines) => {
                match line {
                    Ok(Some(line)) => {
                        if !handle_line(&mut view_model, &line) {
                            break;
                        }
                    }
                    Ok(None) => {
                        debug!("Input closed");
                        lines = None;
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read input");
                        lines = None;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("Interrupted");
                break;
            }
        }
    }

    spinner.finish_and_clear();
    view_model.stop();
    Ok(())
}

async fn next_line(lines: &mut Option<Lines<BufReader<Stdin>>>) -> std::io::Result<Option<String>> {
    match lines {
        Some(lines) => lines.next_line().await,
        None => std::future::pending().await,
    }
}

/// Applies one input line. Returns `false` when the user quits.
fn handle_line(view_model: &mut RatesViewModel, line: &str) -> bool {
    let command = match parse_command(line) {
        Ok(command) => command,
        Err(e) => {
            println!("{}", ui::style_text(&format!("{e:#}"), StyleType::Error));
            return true;
        }
    };
    debug!(?command, "Input command");

    match command {
        Command::Quit => return false,
        Command::ClearAmount => view_model.set_multiplier(None),
        Command::Amount(amount) => view_model.set_multiplier(Some(amount)),
        Command::SelectRow(position) => {
            if !view_model.select(position) {
                println!(
                    "{}",
                    ui::style_text(&format!("No row #{} to select", position + 1), StyleType::Error)
                );
            }
        }
        Command::SelectCurrency(currency) => {
            if currency != view_model.base().currency && !view_model.select_currency(&currency) {
                println!(
                    "{}",
                    ui::style_text(&format!("{currency} is not in the list"), StyleType::Error)
                );
            }
        }
    }
    true
}

fn print_update(table: &mut RateTable, base: &RateEntry, update: RatesUpdate) {
    match update {
        RatesUpdate::Rates {
            rates,
            changes,
            as_of,
        } => {
            table.update(&rates, &changes);
            ui::print_separator();
            println!("{}", heading(base, as_of));
            println!("{}", table.render());
        }
        RatesUpdate::Failure => {
            let message = if table.is_empty() {
                "Failed to fetch rates, retrying".to_string()
            } else {
                "Failed to fetch rates, showing last known values".to_string()
            };
            println!("{}", ui::style_text(&message, StyleType::Error));
        }
    }
}
