//! Search history - bounded, deduplicated, most-recent-first / 搜索历史
//!
//! Every mutation persists synchronously through the injected store so history
//! survives a crash between the mutation and the next flush. Persistence
//! failures are logged and swallowed; history is never worth failing a search
//! over. / 每次变更同步持久化；持久化失败只记日志，不影响搜索。

use parking_lot::Mutex;

use crate::source::HistoryStore;

/// Queries shorter than this are not recorded / 短于此长度的查询不记录
const MIN_QUERY_LEN: usize = 2;

pub struct HistoryTracker {
    cap: usize,
    store: Box<dyn HistoryStore>,
    entries: Mutex<Vec<String>>,
}

impl HistoryTracker {
    /// Load persisted history on construction / 构造时加载已持久化的历史
    pub fn new(store: Box<dyn HistoryStore>, cap: usize) -> Self {
        let mut entries = store.read().unwrap_or_else(|e| {
            tracing::warn!("Failed to load search history: {}", e);
            Vec::new()
        });
        entries.truncate(cap);
        Self {
            cap,
            store,
            entries: Mutex::new(entries),
        }
    }

    /// Record a query at the front / 将查询记录到最前
    ///
    /// Trims; ignores queries under two characters; removes any prior exact
    /// occurrence before re-inserting; truncates to the cap.
    pub fn record(&self, query: &str) {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return;
        }
        let mut entries = self.entries.lock();
        entries.retain(|existing| existing != query);
        entries.insert(0, query.to_string());
        entries.truncate(self.cap);

        if let Err(e) = self.store.write(&entries) {
            tracing::warn!("Failed to persist search history: {}", e);
        }
    }

    /// Most-recent-first history list / 最近优先的历史列表
    pub fn list(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
