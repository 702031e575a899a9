//! Domain models delivered by the entity source / 实体数据模型
//!
//! The matter is the only top-level entity; clients, documents and tasks are
//! embedded in it and derived into their own index categories at build time.
//! / 案件是唯一的顶层实体，客户、文档、任务内嵌其中，索引构建时派生为独立类别。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Matter lifecycle status / 案件状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatterStatus {
    Pending,
    InProgress,
    Active,
    OnHold,
    Completed,
    Cancelled,
}

impl MatterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatterStatus::Pending => "pending",
            MatterStatus::InProgress => "in_progress",
            MatterStatus::Active => "active",
            MatterStatus::OnHold => "on_hold",
            MatterStatus::Completed => "completed",
            MatterStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the matter is being actively worked / 是否处于进行中状态
    pub fn is_active(&self) -> bool {
        matches!(self, MatterStatus::InProgress | MatterStatus::Active)
    }
}

/// Client referenced by a matter / 案件关联的客户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ClientRef {
    /// Identity tuple used to deduplicate clients across matters / 用于跨案件去重的客户身份元组
    pub fn identity(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.name.trim().to_lowercase(),
            self.id_number.as_deref().unwrap_or(""),
            self.email.as_deref().unwrap_or("").to_lowercase(),
            self.phone.as_deref().unwrap_or(""),
        )
    }
}

/// Document attached to a matter / 案件附带的文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatterDocument {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    /// Document's own timestamp; falls back to the matter's when absent / 文档自身时间戳
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Staff assignment on a matter / 案件的人员指派
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffAssignment {
    pub staff_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub high_priority: bool,
}

/// Matter record as delivered by the entity source / 实体源返回的案件记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matter {
    pub id: String,
    /// Display title, usually the property address / 展示标题（通常为物业地址）
    pub title: String,
    pub client: ClientRef,
    pub status: MatterStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matter_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default)]
    pub urgent: bool,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub documents: Vec<MatterDocument>,
    #[serde(default)]
    pub staff: Vec<StaffAssignment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_identity_ignores_case_and_whitespace() {
        let a = ClientRef {
            name: "  Jane Dlamini ".to_string(),
            id_number: Some("8001015009087".to_string()),
            email: Some("Jane@Example.com".to_string()),
            phone: None,
        };
        let b = ClientRef {
            name: "jane dlamini".to_string(),
            id_number: Some("8001015009087".to_string()),
            email: Some("jane@example.com".to_string()),
            phone: None,
        };
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn test_status_is_active() {
        assert!(MatterStatus::InProgress.is_active());
        assert!(MatterStatus::Active.is_active());
        assert!(!MatterStatus::Pending.is_active());
        assert!(!MatterStatus::Completed.is_active());
    }
}
