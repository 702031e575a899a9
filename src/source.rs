//! External collaborator interfaces / 外部协作者接口
//!
//! The engine owns no data: matters come from an `EntitySource` adapter and
//! search history persists through a `HistoryStore`. Both are injected at
//! construction so tests substitute fakes. / 引擎本身不持有数据：案件来自
//! EntitySource 适配器，搜索历史通过 HistoryStore 持久化，均在构造时注入。

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::path::PathBuf;

use crate::models::Matter;

/// Upstream entity adapter / 上游实体适配器
///
/// The sole data dependency of the index builder. Failure of `fetch_matters`
/// must never propagate to search callers; the service degrades to an empty
/// index instead.
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// Fetch the full matter collection / 拉取全部案件
    async fn fetch_matters(&self) -> Result<Vec<Matter>>;
}

/// Persisted key-value store for search history / 搜索历史持久化存储
///
/// Scoped per device/session. Writes are synchronous so history survives a
/// crash between a mutation and the next explicit flush.
pub trait HistoryStore: Send + Sync {
    fn read(&self) -> Result<Vec<String>>;
    fn write(&self, entries: &[String]) -> Result<()>;
}

/// In-memory history store (ephemeral sessions, tests) / 内存历史存储
#[derive(Default)]
pub struct MemoryHistoryStore {
    entries: RwLock<Vec<String>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn read(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().clone())
    }

    fn write(&self, entries: &[String]) -> Result<()> {
        *self.entries.write() = entries.to_vec();
        Ok(())
    }
}

/// JSON-file backed history store / JSON 文件历史存储
///
/// Stores the history list as a JSON array of strings, created on first write.
/// / 历史列表以 JSON 字符串数组保存，首次写入时创建文件。
pub struct JsonFileHistoryStore {
    path: PathBuf,
}

impl JsonFileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HistoryStore for JsonFileHistoryStore {
    fn read(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let entries: Vec<String> = serde_json::from_str(&content)?;
        Ok(entries)
    }

    fn write(&self, entries: &[String]) -> Result<()> {
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
