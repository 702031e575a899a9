//! Error taxonomy / 错误类型
//!
//! Build failures are recovered internally (the service substitutes an empty
//! index), so `search` callers only ever see `SearchError::Cancelled`.
//! / 构建失败在内部降级为空索引，search 调用方只会看到取消错误。

use thiserror::Error;

/// Index build failure / 索引构建失败
#[derive(Debug, Error)]
pub enum BuildError {
    /// Entity source unreachable or returned malformed data / 实体源不可用或数据异常
    #[error("entity source unavailable: {0}")]
    Source(anyhow::Error),
}

/// Errors surfaced by the search service / 搜索服务对外暴露的错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Caller cancelled the search; distinct from "no results" / 调用方取消了搜索
    #[error("search cancelled by caller")]
    Cancelled,
}
