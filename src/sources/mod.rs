//! Per-storefront adapters that turn raw scraper captures into clean
//! [`RawListing`] rows. Each marketplace encodes prices, sold counts and
//! discounts differently; everything downstream of this module sees one
//! uniform schema.

pub mod lazada;
pub mod shopee;
pub mod tiktokshop;
pub mod tokopedia;

use serde_json::Value;
use tracing::warn;

use crate::constants::{LAZADA_SOURCE, SHOPEE_SOURCE, TIKTOKSHOP_SOURCE, TOKOPEDIA_SOURCE};
use crate::error::Result;
use crate::types::RawListing;

/// Transforms one captured item into a clean listing row.
pub trait SourceAdapter: Send + Sync {
    /// Tag recorded on every listing this adapter produces
    fn source_tag(&self) -> &'static str;

    /// Parse a single raw item. Errors mark the item as unparseable;
    /// they never abort the surrounding batch.
    fn parse_item(&self, item: &Value) -> Result<RawListing>;
}

/// Factory keyed by source tag.
pub fn create_adapter(source: &str) -> Option<Box<dyn SourceAdapter>> {
    match source {
        SHOPEE_SOURCE => Some(Box::new(shopee::ShopeeAdapter)),
        TOKOPEDIA_SOURCE => Some(Box::new(tokopedia::TokopediaAdapter)),
        LAZADA_SOURCE => Some(Box::new(lazada::LazadaAdapter)),
        TIKTOKSHOP_SOURCE => Some(Box::new(tiktokshop::TiktokShopAdapter)),
        _ => None,
    }
}

/// The item list of a capture file: either a bare JSON array or an object
/// with an `items` array.
pub fn capture_items(capture: &Value) -> Option<&Vec<Value>> {
    capture
        .as_array()
        .or_else(|| capture.get("items").and_then(Value::as_array))
}

/// Run every item of a capture through the adapter. Returns the clean rows
/// and the number of items that could not be parsed.
pub fn transform_capture(adapter: &dyn SourceAdapter, capture: &Value) -> (Vec<RawListing>, usize) {
    let items = match capture_items(capture) {
        Some(items) => items,
        None => {
            warn!(source = adapter.source_tag(), "Capture has no item array");
            return (Vec::new(), 0);
        }
    };

    let mut listings = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for item in items {
        match adapter.parse_item(item) {
            Ok(listing) => listings.push(listing),
            Err(e) => {
                skipped += 1;
                warn!(source = adapter.source_tag(), error = %e, "Skipping unparseable item");
            }
        }
    }

    (listings, skipped)
}

/// Strip everything but digits and parse. Handles formatted money and
/// percentage strings like "Rp100.000", "61% Off" or "-78%".
pub(crate) fn digits_only(raw: &str) -> Option<f64> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

/// Parse an abbreviated quantity that has already been stripped of filler
/// words: "42.2k", "2.2m", "10rb", "1.5jt", "1234". Unknown input yields 0.
pub(crate) fn parse_scaled_count(cleaned: &str) -> u64 {
    let s = cleaned.trim().to_lowercase();

    let (number_part, multiplier) = if let Some(stripped) = s.strip_suffix("jt") {
        (stripped.trim().to_string(), 1_000_000.0)
    } else if let Some(stripped) = s.strip_suffix("rb") {
        (stripped.trim().to_string(), 1_000.0)
    } else if let Some(stripped) = s.strip_suffix('m') {
        (stripped.trim().to_string(), 1_000_000.0)
    } else if let Some(stripped) = s.strip_suffix('k') {
        (stripped.trim().to_string(), 1_000.0)
    } else {
        (s, 1.0)
    };

    let numeric: String = number_part
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    numeric
        .parse::<f64>()
        .map(|v| (v * multiplier) as u64)
        .unwrap_or(0)
}

/// Accept either a JSON number or a numeric string.
pub(crate) fn value_as_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
