// In-process cache for hot read paths (the active-offers listing). Writers
// call `invalidate` after every offer mutation, the same signal the client
// app used to revalidate its offer cache.
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

struct CachedEntry {
    value: String,
    stored_at: Instant,
}

lazy_static::lazy_static! {
    static ref CACHE: RwLock<HashMap<String, CachedEntry>> = RwLock::new(HashMap::new());
}

pub const OFFERS_CACHE_KEY: &str = "offers:active";

pub fn get_cached(key: &str, ttl: Duration) -> Option<String> {
    let cache = CACHE.read().ok()?;
    let entry = cache.get(key)?;
    if entry.stored_at.elapsed() >= ttl {
        return None;
    }
    Some(entry.value.clone())
}

pub fn set_cache(key: String, value: String) {
    if let Ok(mut cache) = CACHE.write() {
        cache.insert(
            key,
            CachedEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }
}

pub fn invalidate(key: &str) {
    if let Ok(mut cache) = CACHE.write() {
        cache.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidate_removes_entry() {
        set_cache("test:a".into(), "payload".into());
        assert_eq!(
            get_cached("test:a", Duration::from_secs(60)),
            Some("payload".to_string())
        );
        invalidate("test:a");
        assert_eq!(get_cached("test:a", Duration::from_secs(60)), None);
    }

    #[test]
    fn expired_entry_is_a_miss() {
        set_cache("test:b".into(), "payload".into());
        assert_eq!(get_cached("test:b", Duration::from_secs(0)), None);
    }
}
