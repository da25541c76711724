use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::{digits_only, parse_scaled_count, value_as_f64, SourceAdapter};
use crate::constants::LAZADA_SOURCE;
use crate::error::{PipelineError, Result};
use crate::types::RawListing;

/// Lazada items use protocol-relative URLs, "42.2K Terjual" sold strings and
/// "61% Off" discount strings.
pub struct LazadaAdapter;

static SOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)([\d.]+\s*[km]?)\s*terjual").unwrap());

impl SourceAdapter for LazadaAdapter {
    fn source_tag(&self) -> &'static str {
        LAZADA_SOURCE
    }

    fn parse_item(&self, item: &Value) -> Result<RawListing> {
        let name = item
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PipelineError::MissingField("name".to_string()))?
            .to_string();

        let url_raw = item
            .get("itemUrl")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PipelineError::MissingField("itemUrl".to_string()))?;
        let url = if let Some(rest) = url_raw.strip_prefix("//") {
            format!("https://{}", rest)
        } else {
            url_raw.to_string()
        };

        let image = item
            .get("image")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let rating = value_as_f64(item.get("ratingScore")).unwrap_or(0.0);

        let sold_quantity = item
            .get("itemSoldCntShow")
            .and_then(Value::as_str)
            .and_then(|s| SOLD_RE.captures(s))
            .map(|caps| parse_scaled_count(&caps[1]))
            .unwrap_or(0);

        let price_current = value_as_f64(item.get("price")).unwrap_or(0.0);
        let price_original = value_as_f64(item.get("originalPrice"))
            .filter(|p| *p > 0.0)
            .unwrap_or(price_current);

        // "61% Off" style strings
        let discount = item
            .get("discount")
            .and_then(Value::as_str)
            .and_then(digits_only)
            .unwrap_or(0.0);

        Ok(RawListing {
            source: LAZADA_SOURCE.to_string(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_item_with_scaled_sold_count() {
        let item = json!({
            "name": "Somethinc Niacinamide Serum",
            "itemUrl": "//www.lazada.co.id/products/somethinc-serum.html",
            "image": "https://img.lazcdn.com/1.jpg",
            "ratingScore": "4.85",
            "itemSoldCntShow": "42.2K Terjual",
            "price": "89000",
            "originalPrice": "178000",
            "discount": "50% Off"
        });

        let listing = LazadaAdapter.parse_item(&item).unwrap();
        assert_eq!(
            listing.url,
            "https://www.lazada.co.id/products/somethinc-serum.html"
        );
        assert_eq!(listing.sold_quantity, 42_200);
        assert_eq!(listing.rating, 4.85);
        assert_eq!(listing.price_current, 89000.0);
        assert_eq!(listing.price_original, 178000.0);
        assert_eq!(listing.discount, 50.0);
    }

    #[test]
    fn plain_sold_count_without_suffix() {
        let item = json!({
            "name": "Toner",
            "itemUrl": "https://www.lazada.co.id/products/toner.html",
            "itemSoldCntShow": "312 Terjual",
            "price": 30000
        });
        let listing = LazadaAdapter.parse_item(&item).unwrap();
        assert_eq!(listing.sold_quantity, 312);
        assert_eq!(listing.price_original, 30000.0);
        assert_eq!(listing.discount, 0.0);
    }
}
