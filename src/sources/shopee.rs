use serde_json::Value;

use super::{digits_only, SourceAdapter};
use crate::constants::SHOPEE_SOURCE;
use crate::error::{PipelineError, Result};
use crate::types::RawListing;

/// Shopee search-API items arrive wrapped in an `item_basic` envelope with
/// prices multiplied by 100 000 and images referenced by CDN file id.
pub struct ShopeeAdapter;

const PRICE_SCALE: f64 = 100_000.0;
const IMAGE_CDN: &str = "https://down-id.img.susercontent.com/file";

impl SourceAdapter for ShopeeAdapter {
    fn source_tag(&self) -> &'static str {
        SHOPEE_SOURCE
    }

    fn parse_item(&self, item: &Value) -> Result<RawListing> {
        let basic = item.get("item_basic").unwrap_or(item);

        let name = basic
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PipelineError::MissingField("name".to_string()))?
            .to_string();

        let shopid = basic.get("shopid").and_then(Value::as_i64);
        let itemid = basic.get("itemid").and_then(Value::as_i64);
        let url = match (shopid, itemid) {
            (Some(shop), Some(item)) => {
                format!("https://shopee.co.id/product/{}/{}", shop, item)
            }
            _ => return Err(PipelineError::MissingField("shopid/itemid".to_string())),
        };

        let image = basic
            .get("image")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(|id| format!("{}/{}", IMAGE_CDN, id))
            .unwrap_or_default();

        let rating = basic
            .get("item_rating")
            .and_then(|r| r.get("rating_star"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0);

        let sold_quantity = basic
            .get("historical_sold")
            .and_then(Value::as_u64)
            .unwrap_or(0);

        let price_current = basic
            .get("price")
            .and_then(Value::as_f64)
            .map(|p| (p / PRICE_SCALE).floor())
            .unwrap_or(0.0);

        let price_original = basic
            .get("price_before_discount")
            .and_then(Value::as_f64)
            .filter(|p| *p > 0.0)
            .map(|p| (p / PRICE_SCALE).floor())
            .unwrap_or(price_current);

        // Discounts arrive as strings like "-78%"
        let discount = basic
            .get("discount")
            .and_then(Value::as_str)
            .filter(|d| d.contains('%'))
            .and_then(digits_only)
            .unwrap_or(0.0);

        Ok(RawListing {
            source: SHOPEE_SOURCE.to_string(),
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
