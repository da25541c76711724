/// Label assigned when a classifier cannot resolve a brand or category.
pub const UNKNOWN_LABEL: &str = "unknown";

// Source tags for the supported storefronts
pub const SHOPEE_SOURCE: &str = "shopee";
pub const TOKOPEDIA_SOURCE: &str = "tokopedia";
pub const LAZADA_SOURCE: &str = "lazada";
pub const TIKTOKSHOP_SOURCE: &str = "tiktokshop";
