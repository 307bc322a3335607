use super::ui;
use crate::core::CurrencyCode;
use crate::core::detect::DetectedCurrencies;
use crate::core::format::currency_option_label;
use comfy_table::Cell;

/// Currencies found on a page plus what we would suggest to the visitor.
#[derive(Debug, Clone)]
pub struct DetectionReport {
    pub detected: DetectedCurrencies,
    pub country: Option<String>,
    pub suggestion: Option<CurrencyCode>,
}

impl DetectionReport {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell("Label"),
            ui::header_cell("Role"),
        ]);

        for code in &self.detected.enabled {
            let mut roles = Vec::new();
            if *code == self.detected.base {
                roles.push("base");
            }
            if *code == self.detected.current {
                roles.push("current");
            }
            if self.suggestion.as_ref() == Some(code) {
                roles.push("suggested");
            }
            table.add_row(vec![
                Cell::new(code.as_str()),
                Cell::new(currency_option_label(code)),
                Cell::new(roles.join(", ")),
            ]);
        }

        let mut output = format!(
            "{}\n\n",
            ui::style_text("Enabled currencies", ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\n{} {}  {} {}",
            ui::style_text("Base:", ui::StyleType::Label),
            self.detected.base,
            ui::style_text("Current:", ui::StyleType::Label),
            self.detected.current
        ));

        let country = self.country.as_deref().unwrap_or("unknown");
        output.push_str(&format!(
            "\n{} {}",
            ui::style_text("Visitor country:", ui::StyleType::Label),
            country
        ));

        if let Some(suggestion) = &self.suggestion {
            output.push_str(&format!(
                "\n{}",
                ui::style_text(
                    &format!(
                        "Suggest switching to {suggestion} (stay in {} otherwise)",
                        self.detected.base
                    ),
                    ui::StyleType::Value
                )
            ));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CurrencyCode {
        s.parse().unwrap()
    }

    #[test]
    fn test_detection_report_output() {
        let report = DetectionReport {
            detected: DetectedCurrencies {
                enabled: vec![code("INR"), code("USD")],
                current: code("INR"),
                base: code("INR"),
            },
            country: Some("US".to_string()),
            suggestion: Some(code("USD")),
        };

        let output = report.display_as_table();
        assert!(output.contains("🇮🇳 INR - Indian Rupee"));
        assert!(output.contains("base, current"));
        assert!(output.contains("suggested"));
        assert!(output.contains("Suggest switching to USD (stay in INR otherwise)"));
    }

    #[test]
    fn test_no_suggestion_without_country() {
        let report = DetectionReport {
            detected: DetectedCurrencies {
                enabled: vec![code("EUR")],
                current: code("EUR"),
                base: code("USD"),
            },
            country: None,
            suggestion: None,
        };

        let output = report.display_as_table();
        assert!(output.contains("unknown"));
        assert!(!output.contains("Suggest"));
    }
}
