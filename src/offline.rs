//! Offline asset cache
//!
//! The service worker pre-caches a fixed list of static files on install,
//! deletes caches from older versions on activation and answers fetches
//! cache-first. `CACHE_NAME` must change whenever `ASSETS` does.

use std::future::Future;

/// Every cache this app has ever created starts with this
pub const CACHE_PREFIX: &str = "daily-habits-cache";

/// Current cache; bump the suffix when editing `ASSETS`
pub const CACHE_NAME: &str = "daily-habits-cache-v3";

/// Files needed to start the app with no network
pub const ASSETS: [&str; 8] = [
    "./",
    "./index.html",
    "./style.css",
    "./daily-habits.js",
    "./daily-habits_bg.wasm",
    "./manifest.webmanifest",
    "./icon-192.png",
    "./icon-512.png",
];

/// Caches to delete on activation: our older versions. Caches owned by
/// anything else on the same origin are left alone.
pub fn stale_caches(existing: &[String]) -> Vec<&str> {
    existing
        .iter()
        .map(String::as_str)
        .filter(|key| key.starts_with(CACHE_PREFIX) && *key != CACHE_NAME)
        .collect()
}

/// Serve `cached` when present, otherwise go to the network
pub async fn cache_first<T, E, F, Fut>(cached: Option<T>, fetch: F) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    match cached {
        Some(hit) => Ok(hit),
        None => fetch().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_asset_list_is_pinned_to_cache_version() {
        // Changing the asset list means bumping CACHE_NAME and this test
        assert_eq!(CACHE_NAME, "daily-habits-cache-v3");
        assert_eq!(
            ASSETS,
            [
                "./",
                "./index.html",
                "./style.css",
                "./daily-habits.js",
                "./daily-habits_bg.wasm",
                "./manifest.webmanifest",
                "./icon-192.png",
                "./icon-512.png",
            ]
        );
        assert!(CACHE_NAME.starts_with(CACHE_PREFIX));
    }

    #[test]
    fn test_stale_caches() {
        let existing = vec![
            "daily-habits-cache-v1".to_string(),
            CACHE_NAME.to_string(),
            "daily-habits-cache-v2".to_string(),
        ];
        assert_eq!(
            stale_caches(&existing),
            vec!["daily-habits-cache-v1", "daily-habits-cache-v2"]
        );
        assert!(stale_caches(&[CACHE_NAME.to_string()]).is_empty());
        assert!(stale_caches(&[]).is_empty());
    }

    #[test]
    fn test_stale_caches_spares_other_apps() {
        let existing = vec![
            "workbox-precache-v2".to_string(),
            "daily-habits-cache-v2".to_string(),
            "images".to_string(),
        ];
        assert_eq!(stale_caches(&existing), vec!["daily-habits-cache-v2"]);
    }

    #[test]
    fn test_cache_first_prefers_cached() {
        let mut fetched = false;
        let hit: Result<&str, ()> = block_on(cache_first(Some("cached"), || {
            fetched = true;
            async { Ok("network") }
        }));
        assert_eq!(hit, Ok("cached"));
        assert!(!fetched);
    }

    #[test]
    fn test_cache_first_falls_back_to_network() {
        let miss: Result<&str, ()> = block_on(cache_first(None, || async { Ok("network") }));
        assert_eq!(miss, Ok("network"));

        let offline: Result<&str, &str> = block_on(cache_first(None, || async { Err("offline") }));
        assert_eq!(offline, Err("offline"));
    }
}
