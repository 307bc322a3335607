use super::ui;
use crate::core::{CurrencyCode, PricingContext};

/// Outcome of pricing one amount for one visitor.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub amount: f64,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub converted: f64,
    pub display: String,
    pub country: Option<String>,
    pub is_domestic: bool,
    pub markup_factor: f64,
}

impl Conversion {
    pub fn new(
        ctx: &PricingContext,
        amount: f64,
        from: &CurrencyCode,
        to: &CurrencyCode,
        country: Option<String>,
    ) -> Self {
        Self {
            amount,
            from: from.clone(),
            to: to.clone(),
            converted: ctx.price(amount, from, to),
            display: ctx.display(amount, from, to),
            country,
            is_domestic: ctx.is_domestic,
            markup_factor: ctx.markup_factor,
        }
    }

    pub fn display_as_text(&self) -> String {
        let buyer = match (&self.country, self.is_domestic) {
            (Some(country), true) => format!("{country} (domestic)"),
            (Some(country), false) => {
                format!("{country} (international, markup x{:.2})", self.markup_factor)
            }
            (None, _) => "unknown (treated as domestic)".to_string(),
        };

        let mut output = format!(
            "{}\n\n",
            ui::style_text(
                &format!("{} {} -> {}", self.amount, self.from, self.to),
                ui::StyleType::Title
            )
        );
        output.push_str(&format!(
            "{}  {}\n",
            ui::style_text("Price:    ", ui::StyleType::Label),
            ui::style_text(&self.display, ui::StyleType::Value)
        ));
        output.push_str(&format!(
            "{}  {:.4}\n",
            ui::style_text("Converted:", ui::StyleType::Label),
            self.converted
        ));
        output.push_str(&format!(
            "{}  {}",
            ui::style_text("Buyer:    ", ui::StyleType::Label),
            ui::style_text(&buyer, ui::StyleType::Subtle)
        ));
        output
    }
}
