use super::ui::{self, StyleType};
use crate::core::Currency;
use comfy_table::Cell;

pub fn run() {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Currency"),
        ui::header_cell("Name"),
    ]);

    let mut count = 0;
    for currency in Currency::known() {
        table.add_row(vec![
            Cell::new(currency.flag().unwrap_or("")),
            Cell::new(currency.symbol()),
            Cell::new(currency.name()),
        ]);
        count += 1;
    }

    println!(
        "{}",
        ui::style_text(&format!("{count} known currencies"), StyleType::Title)
    );
    println!("{table}");
}
