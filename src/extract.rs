use scraper::{Html, Selector};

use crate::formats::{Availability, TITLE_NOT_FOUND};

/// Plausible retail range for this product. Dollar amounts in page chrome
/// (shipping thresholds, promotions) fall outside it. Tuned to one product
/// page; a heuristic guard, not a correctness guarantee.
pub const PRICE_RANGE: (f64, f64) = (10.0, 50.0);

/// Tried in order when no in-range amount appears in the page text.
const FALLBACK_PRICE_SELECTORS: &[&str] = &[
    "[data-testid='product-price']",
    "span[class*='price']",
    ".price",
];

#[derive(Debug, Clone)]
pub struct Extracted {
    pub title: String,
    pub price: Option<f64>,
    pub availability: Availability,
}

/// Parses fetched markup into title, price, and availability. A missing
/// price is an extraction failure; availability is only checked once a
/// price was found.
pub fn extract(html: &str) -> Extracted {
    let document = Html::parse_document(html);
    let text = page_text(&document);

    let title = first_heading(&document).unwrap_or_else(|| TITLE_NOT_FOUND.to_owned());

    let price = select_price(&scan_dollar_amounts(&text), PRICE_RANGE)
        .or_else(|| fallback_selector_price(&document));

    let availability = match price {
        Some(_) => availability_of(&document, &text),
        None => Availability::Unknown,
    };

    Extracted {
        title,
        price,
        availability,
    }
}

/// All `$<digits>[.<digits>]` amounts in `text`, in document order.
pub fn scan_dollar_amounts(text: &str) -> Vec<f64> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }

        let start = i + 1;
        let mut end = start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end == start {
            i = start;
            continue;
        }
        if end < bytes.len() && bytes[end] == b'.' {
            let mut frac = end + 1;
            while frac < bytes.len() && bytes[frac].is_ascii_digit() {
                frac += 1;
            }
            end = frac;
        }

        if let Ok(value) = text[start..end].parse::<f64>() {
            out.push(value);
        }
        i = end;
    }

    out
}

/// First candidate within the inclusive range wins.
pub fn select_price(candidates: &[f64], range: (f64, f64)) -> Option<f64> {
    let (low, high) = range;
    candidates.iter().copied().find(|price| (low..=high).contains(price))
}

fn page_text(document: &Html) -> String {
    document.root_element().text().collect::<Vec<_>>().join(" ")
}

fn first_heading(document: &Html) -> Option<String> {
    let selector = Selector::parse("h1").ok()?;
    let heading = document.select(&selector).next()?;
    let title = heading.text().collect::<String>().trim().to_owned();
    (!title.is_empty()).then_some(title)
}

fn fallback_selector_price(document: &Html) -> Option<f64> {
    for raw in FALLBACK_PRICE_SELECTORS {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };
        let Some(element) = document.select(&selector).next() else {
            continue;
        };
        let text = element.text().collect::<Vec<_>>().join(" ");
        if let Some(value) = first_numeric_token(&text) {
            return Some(value);
        }
    }
    None
}

/// First `<digits>[.<digits>]` token in `text`, ignoring currency signs.
fn first_numeric_token(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }

        let start = i;
        let mut end = i;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end < bytes.len() && bytes[end] == b'.' {
            let mut frac = end + 1;
            while frac < bytes.len() && bytes[frac].is_ascii_digit() {
                frac += 1;
            }
            end = frac;
        }

        if let Ok(value) = text[start..end].parse::<f64>() {
            return Some(value);
        }
        i = end;
    }

    None
}

fn availability_of(document: &Html, text: &str) -> Availability {
    if text.to_lowercase().contains("add to cart") {
        return Availability::Available;
    }

    let Ok(selector) = Selector::parse("button") else {
        return Availability::Unavailable;
    };
    for button in document.select(&selector) {
        let label = button.text().collect::<String>();
        if label.to_lowercase().contains("add to cart") {
            return Availability::Available;
        }
    }

    Availability::Unavailable
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_finds_amounts_in_document_order() {
        let amounts = scan_dollar_amounts("Shipping over $35 free! Cod 2lb $18.99 add to cart");
        assert_eq!(amounts, vec![35.0, 18.99]);
    }

    #[test]
    fn scan_handles_bare_dollar_signs_and_trailing_dots() {
        assert_eq!(scan_dollar_amounts("pay in $ or $$"), Vec::<f64>::new());
        assert_eq!(scan_dollar_amounts("was $20."), vec![20.0]);
    }

    #[test]
    fn select_price_takes_first_in_range() {
        let candidates = [35.0, 18.99, 12.50];
        assert_eq!(select_price(&candidates, PRICE_RANGE), Some(18.99));
    }

    #[test]
    fn select_price_range_bounds_are_inclusive() {
        assert_eq!(select_price(&[10.0], PRICE_RANGE), Some(10.0));
        assert_eq!(select_price(&[50.0], PRICE_RANGE), Some(50.0));
        assert_eq!(select_price(&[9.99, 50.01], PRICE_RANGE), None);
    }

    #[test]
    fn extract_prefers_first_in_range_text_amount() {
        let html = r#"<html><body>
            <h1>Wild Alaskan Cod</h1>
            <p>Shipping over $35 free!</p>
            <p>Cod 2lb $18.99</p>
            <button>Add to cart</button>
        </body></html>"#;

        let extracted = extract(html);
        assert_eq!(extracted.title, "Wild Alaskan Cod");
        assert_eq!(extracted.price, Some(18.99));
        assert_eq!(extracted.availability, Availability::Available);
    }

    #[test]
    fn extract_falls_back_to_price_selectors() {
        let html = r#"<html><body>
            <h1>Bulk Pack</h1>
            <p>Free shipping over $75</p>
            <span data-testid="product-price">$59.99</span>
        </body></html>"#;

        let extracted = extract(html);
        assert_eq!(extracted.price, Some(59.99));
    }

    #[test]
    fn extract_without_any_price_fails_and_leaves_availability_unknown() {
        let html = r#"<html><body>
            <h1>Sold Out Item</h1>
            <p>Currently unavailable. Add to cart later.</p>
        </body></html>"#;

        let extracted = extract(html);
        assert_eq!(extracted.price, None);
        assert_eq!(extracted.availability, Availability::Unknown);
    }

    #[test]
    fn extract_without_heading_uses_sentinel_title() {
        let extracted = extract("<html><body><p>$19.99</p></body></html>");
        assert_eq!(extracted.title, TITLE_NOT_FOUND);
        assert_eq!(extracted.price, Some(19.99));
    }

    #[test]
    fn availability_is_case_insensitive() {
        let html = r#"<html><body><h1>Item</h1><p>$19.99</p><p>ADD TO CART</p></body></html>"#;
        assert_eq!(extract(html).availability, Availability::Available);
    }

    #[test]
    fn availability_matches_button_element() {
        let html = r#"<html><body><h1>Item</h1><p>$19.99</p>
            <button><span>Add</span> <span>to Cart</span></button>
        </body></html>"#;
        assert_eq!(extract(html).availability, Availability::Available);
    }

    #[test]
    fn missing_cart_affordance_means_unavailable() {
        let html = r#"<html><body><h1>Item</h1><p>$19.99</p><p>Out of stock</p></body></html>"#;
        assert_eq!(extract(html).availability, Availability::Unavailable);
    }
}
