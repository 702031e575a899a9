//! Query-result cache / 查询结果缓存
//!
//! `get` returns `None` for absent and for expired keys but never deletes;
//! `sweep`, run after every `put`, is the only eviction path. Staleness stays
//! a pure function of the stored timestamp and the caller's clock. / get 不做
//! 删除，过期条目只由 put 之后的 sweep 清理；新鲜与否只取决于存储时间戳和调用方时钟。

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;

use super::schema::{Category, GroupedResults};

#[derive(Debug, Clone)]
struct CacheEntry {
    results: GroupedResults,
    built_at: DateTime<Utc>,
}

pub struct QueryCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Compose the cache key / 生成缓存键
    ///
    /// Categories are sorted here so two calls differing only in category
    /// order share one entry. The query must already be normalized by the
    /// caller.
    pub fn compose_key(normalized_query: &str, categories: &[Category], limit: usize) -> String {
        let mut names: Vec<&str> = categories.iter().map(Category::as_str).collect();
        names.sort_unstable();
        format!("{}|{}|{}", normalized_query, names.join(","), limit)
    }

    pub fn get(&self, key: &str, now: DateTime<Utc>) -> Option<GroupedResults> {
        let entries = self.entries.lock();
        let entry = entries.get(key)?;
        if now.signed_duration_since(entry.built_at) < self.ttl {
            Some(entry.results.clone())
        } else {
            // 过期条目留给 sweep 清理
            None
        }
    }

    pub fn put(&self, key: String, results: GroupedResults, now: DateTime<Utc>) {
        let mut entries = self.entries.lock();
        entries.insert(
            key,
            CacheEntry {
                results,
                built_at: now,
            },
        );
        Self::sweep_locked(&mut entries, self.ttl, now);
    }

    /// Remove every expired entry / 清理所有过期条目
    pub fn sweep(&self, now: DateTime<Utc>) {
        let mut entries = self.entries.lock();
        Self::sweep_locked(&mut entries, self.ttl, now);
    }

    fn sweep_locked(entries: &mut HashMap<String, CacheEntry>, ttl: Duration, now: DateTime<Utc>) {
        let before = entries.len();
        entries.retain(|_, entry| now.signed_duration_since(entry.built_at) < ttl);
        let evicted = before - entries.len();
        if evicted > 0 {
            tracing::debug!("Query cache swept {} expired entries", evicted);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> GroupedResults {
        GroupedResults::empty(&[Category::Matters])
    }

    #[test]
    fn test_key_sorts_categories() {
        let a = QueryCache::compose_key("oak", &[Category::Matters, Category::Clients], 20);
        let b = QueryCache::compose_key("oak", &[Category::Clients, Category::Matters], 20);
        assert_eq!(a, b);
        assert_eq!(a, "oak|clients,matters|20");
    }

    #[test]
    fn test_key_varies_by_limit() {
        let a = QueryCache::compose_key("oak", &[Category::Matters], 20);
        let b = QueryCache::compose_key("oak", &[Category::Matters], 10);
        assert_ne!(a, b);
    }

    #[test]
    fn test_ttl_boundary() {
        let t0 = Utc::now();
        let cache = QueryCache::new(Duration::minutes(5));
        cache.put("k".to_string(), results(), t0);

        // 4:59 后仍然命中，5:01 后失效
        assert!(cache.get("k", t0 + Duration::seconds(299)).is_some());
        assert!(cache.get("k", t0 + Duration::seconds(301)).is_none());
    }

    #[test]
    fn test_get_does_not_evict() {
        let t0 = Utc::now();
        let cache = QueryCache::new(Duration::minutes(5));
        cache.put("k".to_string(), results(), t0);

        assert!(cache.get("k", t0 + Duration::minutes(10)).is_none());
        // The expired entry is still stored until a sweep runs
        assert_eq!(cache.len(), 1);

        cache.sweep(t0 + Duration::minutes(10));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_put_sweeps_expired_entries() {
        let t0 = Utc::now();
        let cache = QueryCache::new(Duration::minutes(5));
        cache.put("old".to_string(), results(), t0);
        cache.put("new".to_string(), results(), t0 + Duration::minutes(10));

        // put at t0+10min 时顺带清掉了 t0 的过期条目
        assert_eq!(cache.len(), 1);
        assert!(cache.get("new", t0 + Duration::minutes(10)).is_some());
    }
}
