//! Display text for the price elements of a storefront page

use serde::Serialize;

use super::currency::CurrencyCode;
use super::detect::{PriceElement, StorefrontSnapshot, extract_price_from_text};
use super::pricing::PricingContext;

/// New text for the price element at `index`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPrice {
    pub index: usize,
    pub text: String,
}

fn parse_amount(value: Option<&str>) -> Option<f64> {
    value.and_then(|v| v.trim().parse::<f64>().ok())
}

fn original_price(element: &PriceElement) -> f64 {
    parse_amount(element.original_price.as_deref())
        .or_else(|| parse_amount(element.price.as_deref()))
        .unwrap_or_else(|| extract_price_from_text(&element.text))
}

fn render_element(
    element: &PriceElement,
    base: &CurrencyCode,
    ctx: &PricingContext,
    target: &CurrencyCode,
) -> Option<String> {
    let source = element
        .original_currency
        .as_deref()
        .and_then(|c| c.parse::<CurrencyCode>().ok())
        .unwrap_or_else(|| base.clone());
    // Same currency needs no update unless the visitor pays the markup
    if source == *target && !ctx.applies_markup() {
        return None;
    }

    let price = original_price(element);
    let min = parse_amount(element.price_min.as_deref()).unwrap_or(price);
    let max = parse_amount(element.price_max.as_deref()).unwrap_or(price);

    if min != max {
        Some(format!("From {}", ctx.display(min, &source, target)))
    } else {
        Some(ctx.display(price, &source, target))
    }
}

/// Renders every price element whose displayed price changes: the source
/// currency differs from `target`, or the visitor pays the regional markup.
/// Elements without an original currency are assumed to be in `base`.
pub fn render_price_elements(
    page: &StorefrontSnapshot,
    base: &CurrencyCode,
    ctx: &PricingContext,
    target: &CurrencyCode,
) -> Vec<RenderedPrice> {
    page.price_elements
        .iter()
        .enumerate()
        .filter_map(|(index, element)| {
            render_element(element, base, ctx, target).map(|text| RenderedPrice { index, text })
        })
        .collect()
}
