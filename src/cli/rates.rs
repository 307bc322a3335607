use super::ui;
use crate::core::{PricingContext, RateTable};
use comfy_table::Cell;

impl RateTable {
    /// Renders the table with one row per currency, showing what one unit
    /// of the base buys.
    pub fn display_as_table(&self, ctx: &PricingContext) -> String {
        let base = self.base();
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell("Rate"),
            ui::header_cell(&format!("100 {base}")),
        ]);

        for (code, rate) in self.iter() {
            table.add_row(vec![
                Cell::new(code.as_str()),
                ui::amount_cell(format!("{rate:.6}")),
                ui::amount_cell(ctx.format(rate * 100.0, code)),
            ]);
        }

        let mut output = format!(
            "Rates for: {}\n\n",
            ui::style_text(base.as_str(), ui::StyleType::Title)
        );
        output.push_str(&table.to_string());

        let updated = self.updated_at.map_or_else(
            || ui::style_text("fallback table, no rates available", ui::StyleType::Warning),
            |t| ui::style_text(&t.to_rfc2822(), ui::StyleType::Subtle),
        );
        output.push_str(&format!("\n\nLast updated: {updated}"));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CurrencyCode;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    #[test]
    fn test_rates_table_output() {
        let base: CurrencyCode = "INR".parse().unwrap();
        let raw = HashMap::from([("USD".to_string(), 0.012), ("JPY".to_string(), 1.78)]);
        let mut rates = RateTable::from_raw(base, &raw);
        rates.updated_at = Utc.timestamp_opt(1704067200, 0).single();
        let ctx = PricingContext::new(rates.clone());

        let output = rates.display_as_table(&ctx);
        assert!(output.contains("100 INR"));
        assert!(output.contains("0.012000"));
        assert!(output.contains("$1.20"));
        assert!(output.contains("¥178"));
        assert!(output.contains("₹100"));
        assert!(output.contains("1 Jan 2024"));
    }

    #[test]
    fn test_fallback_table_output() {
        let rates = RateTable::fallback("USD".parse().unwrap());
        let ctx = PricingContext::new(rates.clone());
        let output = rates.display_as_table(&ctx);
        assert!(output.contains("$100.00"));
        assert!(output.contains("fallback table"));
    }
}
