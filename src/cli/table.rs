//! Rows shown by the terminal front end, kept in sync through diff scripts.

use super::ui::{self, StyleType};
use crate::core::{ChangePayload, ListChange, RateEntry};
use chrono::NaiveDate;
use comfy_table::{Attribute, Cell};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Title line for a table of rates against `base`, plus the amount line
/// when an amount is set.
pub fn heading(base: &RateEntry, as_of: NaiveDate) -> String {
    let mut heading = format!(
        "{} {}",
        ui::style_text(&format!("Rates for {}", base.currency), StyleType::Title),
        ui::style_text(&format!("as of {as_of}"), StyleType::Subtle)
    );
    if let Some(multiplier) = base.multiplier {
        heading.push_str(&format!(
            "\n{} {}",
            ui::style_text("Amount:", StyleType::Label),
            ui::style_text(
                &format!("{} {}", ui::format_amount(multiplier), base.currency),
                StyleType::Value
            )
        ));
    }
    heading
}

#[derive(Debug, Clone, PartialEq)]
struct RateRow {
    symbol: String,
    name: &'static str,
    flag: Option<&'static str>,
    rate: Decimal,
    amount: Option<Decimal>,
}

impl RateRow {
    fn bind(entry: &RateEntry) -> Self {
        RateRow {
            symbol: entry.symbol().to_string(),
            name: entry.currency.name(),
            flag: entry.currency.flag(),
            rate: entry.rate,
            amount: entry.amount(),
        }
    }

    fn rebind(&mut self, rate: Decimal, multiplier: Option<Decimal>) {
        self.rate = rate;
        self.amount = multiplier.and_then(|m| rate.checked_mul(m));
    }
}

#[derive(Debug, Default)]
pub struct RateTable {
    rows: Vec<RateRow>,
}

impl RateTable {
    pub fn symbols(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.symbol.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Brings the rows in line with `rates`. The first list is loaded as a
    /// whole; later ones replay `changes`.
    pub fn update(&mut self, rates: &[RateEntry], changes: &[ListChange]) {
        if self.rows.is_empty() {
            self.rows = rates.iter().map(RateRow::bind).collect();
            return;
        }

        for change in changes {
            match change {
                ListChange::Removed { position } if *position < self.rows.len() => {
                    self.rows.remove(*position);
                }
                ListChange::Inserted { position, entry } if *position <= self.rows.len() => {
                    self.rows.insert(*position, RateRow::bind(entry));
                }
                ListChange::Moved { from, to }
                    if *from < self.rows.len() && *to < self.rows.len() =>
                {
                    let row = self.rows.remove(*from);
                    self.rows.insert(*to, row);
                }
                ListChange::Changed { position, payload } if *position < self.rows.len() => {
                    match payload {
                        ChangePayload::Rate { rate, multiplier } => {
                            self.rows[*position].rebind(*rate, *multiplier);
                        }
                        ChangePayload::Skip => {
                            if let Some(entry) = rates.get(*position) {
                                self.rows[*position] = RateRow::bind(entry);
                            }
                        }
                    }
                }
                other => warn!(change = ?other, "Change out of range"),
            }
        }

        if self.symbols() != rates.iter().map(RateEntry::symbol).collect::<Vec<_>>() {
            warn!("Rows out of sync, reloading");
            self.rows = rates.iter().map(RateRow::bind).collect();
        } else {
            debug!(changes = changes.len(), "Applied list changes");
        }
    }

    /// Renders the rows; the base row (position 0) is highlighted.
    pub fn render(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("#"),
            ui::header_cell(""),
            ui::header_cell("Currency"),
            ui::header_cell("Name"),
            ui::header_cell("Rate"),
            ui::header_cell("Amount"),
        ]);

        for (position, row) in self.rows.iter().enumerate() {
            let mut symbol = Cell::new(&row.symbol);
            if position == 0 {
                symbol = symbol.add_attribute(Attribute::Bold);
            }
            table.add_row(vec![
                Cell::new(position + 1),
                Cell::new(row.flag.unwrap_or("")),
                symbol,
                Cell::new(row.name),
                ui::rate_cell(row.rate),
                ui::format_optional_cell(row.amount, ui::format_amount),
            ]);
        }

        table.to_string()
    }
}
