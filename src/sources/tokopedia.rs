use serde_json::Value;

use super::{digits_only, parse_scaled_count, value_as_f64, SourceAdapter};
use crate::constants::TOKOPEDIA_SOURCE;
use crate::error::{PipelineError, Result};
use crate::types::RawListing;

/// Tokopedia search results carry sold counts inside `labelGroups`
/// ("10 rb+ terjual") and the pre-discount price as a formatted money
/// string ("Rp100.000").
pub struct TokopediaAdapter;

const SOLD_LABEL_POSITION: &str = "ri_product_credibility";

impl SourceAdapter for TokopediaAdapter {
    fn source_tag(&self) -> &'static str {
        TOKOPEDIA_SOURCE
    }

    fn parse_item(&self, item: &Value) -> Result<RawListing> {
        let name = item
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PipelineError::MissingField("name".to_string()))?
            .to_string();

        let url = item
            .get("url")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PipelineError::MissingField("url".to_string()))?
            .to_string();

        let image = item
            .get("mediaURL")
            .and_then(|m| m.get("image"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let rating = value_as_f64(item.get("rating")).unwrap_or(0.0);

        let sold_quantity = sold_from_label_groups(item);

        let price = item.get("price");
        let price_current = price
            .and_then(|p| p.get("number"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0);

        let price_original = price
            .and_then(|p| p.get("original"))
            .and_then(Value::as_str)
            .and_then(digits_only)
            .unwrap_or(price_current);

        let discount = price
            .and_then(|p| p.get("discountPercentage"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0);

        Ok(RawListing {
            source: TOKOPEDIA_SOURCE.to_string(),
            name,
            url,
            image,
            rating,
            sold_quantity,
            price_current,
            price_original,
            discount,
            content_hash: String::new(),
        })
    }
}

/// Find the credibility label ("6 terjual", "100+ terjual", "10 rb+ terjual")
/// and parse it into a count.
fn sold_from_label_groups(item: &Value) -> u64 {
    let groups = match item.get("labelGroups").and_then(Value::as_array) {
        Some(groups) => groups,
        None => return 0,
    };

    for label in groups {
        let position = label.get("position").and_then(Value::as_str);
        if position != Some(SOLD_LABEL_POSITION) {
            continue;
        }
        let title = label.get("title").and_then(Value::as_str).unwrap_or("");
        if !title.to_lowercase().contains("terjual") {
            continue;
        }

        let cleaned = title
            .to_lowercase()
            .replace("terjual", "")
            .replace('+', "")
            .replace(',', ".");
        return parse_scaled_count(&cleaned);
    }

    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_item_with_abbreviated_sold_label() {
        let item = json!({
            "name": "Scarlett Body Lotion",
            "url": "https://www.tokopedia.com/shop/scarlett-body-lotion",
            "mediaURL": { "image": "https://images.tokopedia.net/img/1.jpg" },
            "rating": "4.9",
            "labelGroups": [
                { "position": "promo", "title": "Diskon" },
                { "position": "ri_product_credibility", "title": "10 rb+ terjual" }
            ],
            "price": {
                "number": 45000,
                "original": "Rp90.000",
                "discountPercentage": 50
            }
        });

        let listing = TokopediaAdapter.parse_item(&item).unwrap();
        assert_eq!(listing.sold_quantity, 10_000);
        assert_eq!(listing.rating, 4.9);
        assert_eq!(listing.price_current, 45000.0);
        assert_eq!(listing.price_original, 90000.0);
        assert_eq!(listing.discount, 50.0);
    }

    #[test]
    fn missing_sold_label_defaults_to_zero() {
        let item = json!({
            "name": "Toner",
            "url": "https://www.tokopedia.com/shop/toner",
            "price": { "number": 30000 }
        });
        let listing = TokopediaAdapter.parse_item(&item).unwrap();
        assert_eq!(listing.sold_quantity, 0);
        assert_eq!(listing.price_original, 30000.0);
    }
}
