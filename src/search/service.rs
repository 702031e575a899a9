//! Search service - the public entry point / 搜索服务
//!
//! Sequences one search call: trivial-query short circuit → cache lookup →
//! staleness check with single-flight rebuild → score/rank/trim → cache store
//! → history record. The index snapshot is replaced atomically; readers never
//! observe a half-built index. / 单次搜索的状态机：短查询直通 → 缓存 → 过期检查与
//! 单飞重建 → 打分排序截断 → 写缓存 → 记历史。索引快照原子替换。

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::source::{EntitySource, HistoryStore};

use super::cache::QueryCache;
use super::clock::Clock;
use super::history::HistoryTracker;
use super::index::IndexBuilder;
use super::schema::{
    Category, GroupedResults, IndexEntry, SearchIndex, SearchOptions, SearchResultItem,
};
use super::{scorer, tokenizer};

/// Queries shorter than this skip index and cache entirely / 短于此长度的查询跳过索引与缓存
const MIN_QUERY_LEN: usize = 2;

/// Engine statistics / 引擎统计信息
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStats {
    pub index_entries: usize,
    pub index_built_at: Option<DateTime<Utc>>,
    pub cached_queries: usize,
    pub history_entries: usize,
}

pub struct SearchService {
    source: Arc<dyn EntitySource>,
    clock: Arc<dyn Clock>,
    config: SearchConfig,
    cache: QueryCache,
    history: HistoryTracker,
    index: tokio::sync::RwLock<Option<Arc<SearchIndex>>>,
    /// Serializes rebuilds so overlapping stale searches issue one fetch / 串行化重建，保证只发一次拉取
    rebuild_lock: tokio::sync::Mutex<()>,
}

impl SearchService {
    pub fn new(
        source: Arc<dyn EntitySource>,
        store: Box<dyn HistoryStore>,
        clock: Arc<dyn Clock>,
        config: SearchConfig,
    ) -> Self {
        let cache = QueryCache::new(config.cache_ttl());
        let history = HistoryTracker::new(store, config.history_cap);
        Self {
            source,
            clock,
            config,
            cache,
            history,
            index: tokio::sync::RwLock::new(None),
            rebuild_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Options pre-filled from the service configuration / 按服务配置填充的默认选项
    pub fn default_options(&self) -> SearchOptions {
        SearchOptions::default().with_limit(self.config.default_limit)
    }

    /// Force an initial index build; safe to call repeatedly / 初始化（幂等）
    pub async fn initialize(&self) {
        let _guard = self.rebuild_lock.lock().await;
        if self.snapshot().await.is_none() {
            self.rebuild_index().await;
        }
    }

    /// Grouped search across the requested categories / 跨类别分组搜索
    pub async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
        cancel: &CancellationToken,
    ) -> Result<GroupedResults, SearchError> {
        if query.trim().chars().count() < MIN_QUERY_LEN {
            // 短查询：不重建、不写缓存、不记历史
            return Ok(self.recent_results(options).await);
        }

        let normalized = tokenizer::normalize_query(query);
        let key = QueryCache::compose_key(&normalized, &options.categories, options.limit);

        if let Some(hit) = self.cache.get(&key, self.clock.now()) {
            tracing::debug!("Search cache hit: {}", normalized);
            // 缓存命中仍记历史：记录的是用户搜索这个动作，不是计算本身
            self.history.record(&normalized);
            return Ok(hit);
        }

        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        let index = self.fresh_index(cancel).await?;
        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }

        let words = tokenizer::query_words(&normalized);
        let now = self.clock.now();
        let category_count = options.categories.len().max(1);
        let per_category = (options.limit + category_count - 1) / category_count;

        let mut results = GroupedResults::empty(&options.categories);
        for &category in &options.categories {
            let mut scored: Vec<(i32, &IndexEntry)> = index
                .category(category)
                .iter()
                .filter_map(|entry| {
                    let score = scorer::score(entry, &normalized, &words, now);
                    (score > 0).then_some((score, entry))
                })
                .collect();
            scored.sort_by(|a, b| {
                b.0.cmp(&a.0)
                    .then_with(|| b.1.priority.cmp(&a.1.priority))
                    .then_with(|| b.1.updated_at.cmp(&a.1.updated_at))
            });
            scored.truncate(per_category);

            let items: Vec<SearchResultItem> = scored
                .into_iter()
                .map(|(score, entry)| Self::result_item(entry, score, &normalized, &words))
                .collect();
            results.total += items.len();
            results.groups.insert(category, items);
        }

        self.cache.put(key, results.clone(), now);
        self.history.record(&normalized);
        Ok(results)
    }

    /// Search suggestions / 搜索建议
    ///
    /// Under two characters: the most recent history entries. Otherwise index
    /// title matches first, then history entries containing the query,
    /// deduplicated and capped. Never triggers a rebuild.
    pub async fn search_suggestions(&self, query: &str) -> Vec<String> {
        let normalized = tokenizer::normalize_query(query);
        if normalized.chars().count() < MIN_QUERY_LEN {
            return self
                .history
                .list()
                .into_iter()
                .take(self.config.history_suggestion_cap)
                .collect();
        }

        let mut suggestions: Vec<String> = Vec::new();
        if let Some(index) = self.snapshot().await {
            for category in Category::defaults() {
                for entry in index.category(category) {
                    if entry.title.to_lowercase().contains(&normalized)
                        && !suggestions.contains(&entry.title)
                    {
                        suggestions.push(entry.title.clone());
                    }
                }
            }
        }
        for past in self.history.list() {
            if past.contains(&normalized) && !suggestions.contains(&past) {
                suggestions.push(past);
            }
        }
        suggestions.truncate(self.config.suggestion_cap);
        suggestions
    }

    /// Most-recent-first search history / 最近优先的搜索历史
    pub fn search_history(&self) -> Vec<String> {
        self.history.list()
    }

    pub async fn stats(&self) -> ServiceStats {
        let snapshot = self.snapshot().await;
        ServiceStats {
            index_entries: snapshot.as_ref().map(|i| i.total_entries()).unwrap_or(0),
            index_built_at: snapshot.map(|i| i.built_at),
            cached_queries: self.cache.len(),
            history_entries: self.history.len(),
        }
    }

    async fn snapshot(&self) -> Option<Arc<SearchIndex>> {
        self.index.read().await.clone()
    }

    fn is_stale(&self, index: &SearchIndex) -> bool {
        self.clock.now().signed_duration_since(index.built_at) > self.config.staleness_window()
    }

    /// Return a fresh snapshot, rebuilding single-flight when stale / 获取新鲜快照（过期时单飞重建）
    async fn fresh_index(&self, cancel: &CancellationToken) -> Result<Arc<SearchIndex>, SearchError> {
        if let Some(index) = self.snapshot().await {
            if !self.is_stale(&index) {
                return Ok(index);
            }
        }

        let _guard = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SearchError::Cancelled),
            guard = self.rebuild_lock.lock() => guard,
        };
        // 拿到锁后复查：并发的搜索可能已经重建完成
        if let Some(index) = self.snapshot().await {
            if !self.is_stale(&index) {
                return Ok(index);
            }
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(SearchError::Cancelled),
            snapshot = self.rebuild_index() => Ok(snapshot),
        }
    }

    /// Rebuild wholesale and swap in atomically / 整体重建并原子替换
    async fn rebuild_index(&self) -> Arc<SearchIndex> {
        let now = self.clock.now();
        let snapshot = match IndexBuilder::build(self.source.as_ref(), now).await {
            Ok(index) => {
                tracing::info!("Search index rebuilt with {} entries", index.total_entries());
                index
            }
            Err(e) => {
                // 源不可用时退化为空索引；空索引是有效状态，不是错误
                tracing::warn!("Entity source failed, serving empty index: {}", e);
                SearchIndex::empty(now)
            }
        };
        let snapshot = Arc::new(snapshot);
        *self.index.write().await = Some(snapshot.clone());
        snapshot
    }

    /// Recency slices for trivial queries / 短查询返回的最近条目
    async fn recent_results(&self, options: &SearchOptions) -> GroupedResults {
        let mut results = GroupedResults::empty(&options.categories);
        if !options.include_recent {
            return results;
        }
        let Some(index) = self.snapshot().await else {
            return results;
        };
        for &category in &options.categories {
            let slice = category.recent_slice();
            if slice == 0 {
                continue;
            }
            let mut entries: Vec<&IndexEntry> = index.category(category).iter().collect();
            entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            let items: Vec<SearchResultItem> = entries
                .into_iter()
                .take(slice)
                .map(|entry| SearchResultItem {
                    id: entry.id.clone(),
                    title: entry.title.clone(),
                    subtitle: entry.subtitle.clone(),
                    category: entry.category,
                    payload: entry.payload.clone(),
                    highlight: String::new(),
                    relevance_score: 0,
                })
                .collect();
            results.total += items.len();
            results.groups.insert(category, items);
        }
        results
    }

    fn result_item(
        entry: &IndexEntry,
        score: i32,
        normalized_query: &str,
        query_words: &[String],
    ) -> SearchResultItem {
        SearchResultItem {
            id: entry.id.clone(),
            title: entry.title.clone(),
            subtitle: entry.subtitle.clone(),
            category: entry.category,
            payload: entry.payload.clone(),
            highlight: tokenizer::extract_highlight(&entry.title, normalized_query, query_words),
            relevance_score: score,
        }
    }
}
