use sha2::{Digest, Sha256};
use tracing::debug;
use url::Url;

use crate::config::IdentityConfig;

/// Canonicalize a listing URL for identity hashing.
///
/// Tracking query keys from the denylist are removed; the reassembled URL
/// then drops the query and fragment entirely, so non-tracking parameters are
/// discarded as well (a deliberate simplification: marketplace product paths
/// identify the listing on their own). Unparseable URLs participate in
/// identity verbatim rather than failing the record.
pub fn canonicalize_url(raw: &str, config: &IdentityConfig) -> String {
    let mut parsed = match Url::parse(raw.trim()) {
        Ok(url) => url,
        Err(_) => return raw.trim().to_string(),
    };

    if parsed.query().is_some() {
        let tracking = parsed
            .query_pairs()
            .filter(|(key, _)| config.tracking_keys.iter().any(|t| t == key.as_ref()))
            .count();
        let total = parsed.query_pairs().count();
        debug!(
            tracking_params = tracking,
            other_params = total - tracking,
            "Stripping query from listing URL"
        );
    }

    parsed.set_query(None);
    parsed.set_fragment(None);
    parsed.to_string()
}

/// Stable content identity: SHA-256 over name ++ canonical URL.
///
/// Two captures of the same listing at different times or prices always
/// yield the same hash.
pub fn content_hash(name: &str, canonical_url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update(canonical_url.as_bytes());
    hex::encode(hasher.finalize())
}

/// Identity of one raw row: canonicalize, then hash.
pub fn listing_identity(name: &str, url: &str, config: &IdentityConfig) -> String {
    content_hash(name, &canonicalize_url(url, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracking_suffix_does_not_change_identity() {
        let config = IdentityConfig::default();
        let base = listing_identity(
            "Scarlett Body Lotion",
            "https://shopee.co.id/p/123",
            &config,
        );
        let tracked = listing_identity(
            "Scarlett Body Lotion",
            "https://shopee.co.id/p/123?spm=abc&tm=123",
            &config,
        );
        assert_eq!(base, tracked);
    }

    #[test]
    fn non_tracking_query_is_also_discarded() {
        let config = IdentityConfig::default();
        let plain = canonicalize_url("https://shopee.co.id/p/123", &config);
        let with_query = canonicalize_url("https://shopee.co.id/p/123?variant=30ml", &config);
        assert_eq!(plain, with_query);
    }

    #[test]
    fn fragment_is_discarded() {
        let config = IdentityConfig::default();
        assert_eq!(
            canonicalize_url("https://shopee.co.id/p/123#reviews", &config),
            "https://shopee.co.id/p/123"
        );
    }

    #[test]
    fn different_names_or_paths_yield_different_hashes() {
        let config = IdentityConfig::default();
        let a = listing_identity("Serum A", "https://shopee.co.id/p/1", &config);
        let b = listing_identity("Serum B", "https://shopee.co.id/p/1", &config);
        let c = listing_identity("Serum A", "https://shopee.co.id/p/2", &config);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn unparseable_url_participates_verbatim() {
        let config = IdentityConfig::default();
        assert_eq!(canonicalize_url("not a url", &config), "not a url");
        // Still hashable and stable
        let a = listing_identity("Serum", "not a url", &config);
        let b = listing_identity("Serum", "not a url", &config);
        assert_eq!(a, b);
    }

    #[test]
    fn hash_is_fixed_length_hex() {
        let config = IdentityConfig::default();
        let hash = listing_identity("Serum", "https://shopee.co.id/p/1", &config);
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
