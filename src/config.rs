//! Search engine configuration / 搜索引擎配置
//!
//! Every timing window and cap the engine uses lives here instead of being
//! hard-coded at the call sites, so tests can construct a service with tight
//! windows and control time deterministically. / 所有时间窗口和上限集中在这里，
//! 便于测试注入，而不是散落在调用点的硬编码常量。

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Search configuration / 搜索配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Query-result cache TTL in seconds / 查询结果缓存有效期（秒）
    pub cache_ttl_secs: i64,
    /// Maximum index age before a search triggers a rebuild / 索引最大允许年龄（秒）
    pub staleness_window_secs: i64,
    /// Maximum number of persisted history entries / 搜索历史最大条数
    pub history_cap: usize,
    /// Default per-call result limit / 每次搜索的默认结果上限
    pub default_limit: usize,
    /// Maximum number of search suggestions / 搜索建议最大条数
    pub suggestion_cap: usize,
    /// Suggestions served from history alone for short queries / 短查询时仅从历史返回的建议条数
    pub history_suggestion_cap: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 300,
            staleness_window_secs: 30,
            history_cap: 10,
            default_limit: 20,
            suggestion_cap: 8,
            history_suggestion_cap: 5,
        }
    }
}

impl SearchConfig {
    /// Cache TTL as a duration / 缓存有效期
    pub fn cache_ttl(&self) -> Duration {
        Duration::seconds(self.cache_ttl_secs)
    }

    /// Staleness window as a duration / 索引过期窗口
    pub fn staleness_window(&self) -> Duration {
        Duration::seconds(self.staleness_window_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.cache_ttl(), Duration::minutes(5));
        assert_eq!(config.staleness_window(), Duration::seconds(30));
        assert_eq!(config.history_cap, 10);
        assert_eq!(config.default_limit, 20);
    }

    #[test]
    fn test_roundtrip_json() {
        let config = SearchConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.cache_ttl_secs, config.cache_ttl_secs);
        assert_eq!(parsed.suggestion_cap, config.suggestion_cap);
    }
}
