//! Search module - client-side global search engine / 搜索模块
//!
//! Architecture principles / 架构原则：
//! - The index is rebuilt wholesale from the entity source and swapped in as
//!   one snapshot, never patched field-by-field / 索引整体重建、原子替换，不做增量修补
//! - Scoring is a pure function over one entry and one query / 打分是纯函数
//! - Cache and history are shared mutable state behind their own locks / 缓存与历史各自持锁
//! - Call direction: service → builder/scorer/cache/history (unidirectional)
//!   / 调用方向单向，回调中不得重入服务
//!
//! Matching features / 匹配特性：
//! - Exact, prefix and substring title matching plus per-word containment
//! - Priority and recency boosts only apply to entries that already matched

pub mod cache;
pub mod clock;
pub mod history;
pub mod index;
pub mod schema;
pub mod scorer;
pub mod service;
pub mod tokenizer;

pub use cache::QueryCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use history::HistoryTracker;
pub use index::IndexBuilder;
pub use schema::{
    Category, GroupedResults, IndexEntry, SearchIndex, SearchOptions, SearchResultItem,
};
pub use service::{SearchService, ServiceStats};
