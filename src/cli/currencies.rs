use crate::cli::ui::{StyleType, format_optional_cell, header_cell, new_styled_table, style_text};
use crate::core::currency::DisplayCurrency;
use crate::core::rates::{RateProvider, RateTable};
use anyhow::Result;
use comfy_table::{Cell, Table};
use tracing::warn;

/// Builds the table of form currencies, with their USD rate when known.
pub fn currency_table(rates: Option<&RateTable>) -> Table {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Currency"),
        header_cell("Per 1 USD"),
    ]);

    for currency in DisplayCurrency::ALL {
        let rate = rates.and_then(|r| r.rate(currency.code()));
        table.add_row(vec![
            Cell::new(currency.code()),
            Cell::new(currency.name()),
            format_optional_cell(rate, |v| format!("{v:.4}")),
        ]);
    }
    table
}

pub async fn run(provider: &dyn RateProvider) -> Result<()> {
    let rates = match provider.fetch_rates().await {
        Ok(rates) => Some(rates),
        Err(e) => {
            warn!(error = %e, "Could not fetch rates, listing currencies only");
            None
        }
    };

    println!("{}", style_text("Supported currencies", StyleType::Title));
    println!("{}", currency_table(rates.as_ref()));
    if rates.is_none() {
        println!(
            "{}",
            style_text("Rates unavailable; try again later.", StyleType::Subtle)
        );
    }
    Ok(())
}
