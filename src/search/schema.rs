//! Search index schema definitions / 搜索索引的 Schema 定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Entity category searched independently / 独立搜索的实体类别
///
/// `Messages` is reserved and always yields an empty group. / Messages 为预留类别，恒为空。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Matters,
    Clients,
    Documents,
    Tasks,
    Messages,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Matters => "matters",
            Category::Clients => "clients",
            Category::Documents => "documents",
            Category::Tasks => "tasks",
            Category::Messages => "messages",
        }
    }

    /// Searchable categories in their default request order / 默认请求顺序的可搜索类别
    pub fn defaults() -> Vec<Category> {
        vec![
            Category::Matters,
            Category::Clients,
            Category::Documents,
            Category::Tasks,
        ]
    }

    /// Recent-slice size served for trivial queries / 短查询时返回的最近条目数
    pub(crate) fn recent_slice(&self) -> usize {
        match self {
            Category::Matters => 3,
            Category::Clients => 2,
            Category::Documents => 2,
            Category::Tasks => 2,
            Category::Messages => 0,
        }
    }
}

/// One searchable unit / 一条可搜索记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Stable identifier within its category / 类别内唯一标识
    pub id: String,
    /// Primary display string / 主显示文本
    pub title: String,
    /// Secondary display string (context, e.g. parent matter title) / 次要显示文本
    pub subtitle: String,
    pub category: Category,
    /// Opaque snapshot of the original entity, never mutated by the engine / 原始实体快照，引擎不改写
    pub payload: serde_json::Value,
    /// Lower-cased concatenation of all matchable fields, built once / 所有可匹配字段的小写拼接
    pub search_text: String,
    /// Baseline importance computed at build time, not at query time / 构建时算好的基础优先级
    pub priority: i32,
    pub updated_at: DateTime<Utc>,
}

impl IndexEntry {
    /// Compose a child id unique across matters / 生成跨案件唯一的子条目 id
    pub fn generate_id(matter_id: &str, child_id: &str) -> String {
        format!("{}:{}", matter_id, child_id)
    }
}

/// Full index snapshot, rebuilt wholesale / 完整索引快照（整体重建）
#[derive(Debug, Clone)]
pub struct SearchIndex {
    pub entries: HashMap<Category, Vec<IndexEntry>>,
    pub built_at: DateTime<Utc>,
}

impl SearchIndex {
    /// Empty snapshot; a valid state, not an error / 空快照（有效状态，非错误）
    pub fn empty(built_at: DateTime<Utc>) -> Self {
        let mut entries = HashMap::new();
        for category in Category::defaults() {
            entries.insert(category, Vec::new());
        }
        Self { entries, built_at }
    }

    pub fn category(&self, category: Category) -> &[IndexEntry] {
        self.entries
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn total_entries(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

/// Per-call search options / 单次搜索选项
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Total result limit, split evenly across requested categories / 总结果上限（按类别均分）
    pub limit: usize,
    pub categories: Vec<Category>,
    /// Serve recency slices for trivial queries / 短查询时是否返回最近条目
    pub include_recent: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 20,
            categories: Category::defaults(),
            include_recent: true,
        }
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn include_recent(mut self, enabled: bool) -> Self {
        self.include_recent = enabled;
        self
    }
}

/// One ranked result / 一条排序后的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub category: Category,
    pub payload: serde_json::Value,
    /// Matched title fragment in original casing, or the first query word / 命中的标题片段
    pub highlight: String,
    pub relevance_score: i32,
}

/// Results grouped per category / 按类别分组的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedResults {
    pub groups: HashMap<Category, Vec<SearchResultItem>>,
    pub total: usize,
}

impl GroupedResults {
    /// All-empty groups for the requested categories / 为请求的类别生成空分组
    pub fn empty(categories: &[Category]) -> Self {
        let mut groups = HashMap::new();
        for &category in categories {
            groups.insert(category, Vec::new());
        }
        Self { groups, total: 0 }
    }

    pub fn group(&self, category: Category) -> &[SearchResultItem] {
        self.groups
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
