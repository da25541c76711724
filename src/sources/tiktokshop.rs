use serde_json::Value;

use super::{digits_only, parse_scaled_count, value_as_f64, SourceAdapter};
use crate::constants::TIKTOKSHOP_SOURCE;
use crate::error::{PipelineError, Result};
use crate::types::RawListing;

/// TikTok Shop captures come from DOM scraping, so most fields arrive as
/// display strings: "Rp89.000", "64%", "2.2M sold".
pub struct TiktokShopAdapter;

impl SourceAdapter for TiktokShopAdapter {
    fn source_tag(&self) -> &'static str {
        TIKTOKSHOP_SOURCE
    }

    fn parse_item(&self, item: &Value) -> Result<RawListing> {
        let name = item
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty() && *s != "N/A")
            .ok_or_else(|| PipelineError::MissingField("name".to_string()))?
            .to_string();

        let url = item
            .get("url")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty() && *s != "N/A")
            .ok_or_else(|| PipelineError::MissingField("url".to_string()))?
            .to_string();

        let image = item
            .get("image")
            .and_then(Value::as_str)
            .filter(|s| *s != "N/A")
            .unwrap_or_default()
            .to_string();

        let rating = value_as_f64(item.get("rating")).unwrap_or(0.0);

        let sold_quantity = item
            .get("sold_quantity")
            .map(display_count)
            .unwrap_or(0);

        let price_current = price_field(item.get("price_current"));
        let parsed_original = price_field(item.get("price_original"));
        let price_original = if parsed_original > 0.0 {
            parsed_original
        } else {
            price_current
        };

        let discount = item
            .get("discount")
            .and_then(Value::as_str)
            .filter(|d| *d != "N/A")
            .and_then(digits_only)
            .unwrap_or(0.0);

        Ok(RawListing {
            source: TIKTOKSHOP_SOURCE.to_string(),
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

/// "2.2M sold", "10K terjual", "1,234 sold" and bare numbers.
fn display_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => {
            let cleaned = s
                .to_lowercase()
                .replace("sold", "")
                .replace("terjual", "")
                .replace('+', "")
                .replace(',', "")
                .replace(' ', "");
            parse_scaled_count(&cleaned)
        }
        _ => 0,
    }
}

/// Display prices like "Rp89.000"; numbers pass through.
fn price_field(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) if *s != "N/A" => digits_only(s).unwrap_or(0.0),
        _ => 0.0,
    }
}
