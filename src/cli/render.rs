use super::ui;
use crate::core::CurrencyCode;
use crate::core::detect::StorefrontSnapshot;
use crate::core::render::RenderedPrice;
use comfy_table::Cell;

/// Shows each updated price element next to its current text.
pub fn display_rendered(
    page: &StorefrontSnapshot,
    target: &CurrencyCode,
    rendered: &[RenderedPrice],
) -> String {
    let mut output = format!(
        "Prices in: {}\n\n",
        ui::style_text(target.as_str(), ui::StyleType::Title)
    );

    if rendered.is_empty() {
        output.push_str(&ui::style_text(
            "No price elements need updating",
            ui::StyleType::Subtle,
        ));
        return output;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Page text"),
        ui::header_cell("Display"),
    ]);
    for price in rendered {
        let original = page
            .price_elements
            .get(price.index)
            .map_or("", |e| e.text.as_str());
        table.add_row(vec![
            Cell::new(price.index),
            Cell::new(original),
            ui::amount_cell(price.text.clone()),
        ]);
    }
    output.push_str(&table.to_string());
    output
}
