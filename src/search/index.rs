//! Index builder - wholesale snapshot construction / 索引构建器
//!
//! The index is always rebuilt in full from the entity source and swapped in
//! as one snapshot; entries are never patched in place. Given deterministic
//! source order the insertion order is deterministic, so two builds over
//! unchanged data are element-wise equal. / 索引总是从实体源整体重建；
//! 源顺序确定时插入顺序也确定，同样的数据两次构建结果逐项相等。

use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet};

use crate::error::BuildError;
use crate::models::{Matter, MatterDocument, StaffAssignment};
use crate::source::EntitySource;

use super::schema::{Category, IndexEntry, SearchIndex};

/// Baseline priority for derived categories / 派生类别的基础优先级
const CLIENT_PRIORITY: i32 = 2;
const DOCUMENT_PRIORITY: i32 = 1;
const TASK_PRIORITY_HIGH: i32 = 3;
const TASK_PRIORITY_NORMAL: i32 = 1;

pub struct IndexBuilder;

impl IndexBuilder {
    /// Build a full snapshot from the entity source / 从实体源构建完整快照
    ///
    /// Source failure comes back as `BuildError`; the service is the one that
    /// degrades it to an empty snapshot so search callers never see it.
    pub async fn build(
        source: &dyn EntitySource,
        now: DateTime<Utc>,
    ) -> Result<SearchIndex, BuildError> {
        let matters = source.fetch_matters().await.map_err(BuildError::Source)?;
        Ok(Self::build_from_matters(&matters, now))
    }

    /// Build from an already fetched matter list (pure, test-friendly)
    /// / 从已拉取的案件列表构建（纯函数，便于测试）
    pub fn build_from_matters(matters: &[Matter], now: DateTime<Utc>) -> SearchIndex {
        let mut matter_entries = Vec::with_capacity(matters.len());
        let mut client_entries = Vec::new();
        let mut document_entries = Vec::new();
        let mut task_entries = Vec::new();
        let mut seen_clients: HashSet<String> = HashSet::new();

        for matter in matters {
            matter_entries.push(Self::matter_entry(matter, now));

            if seen_clients.insert(matter.client.identity()) {
                client_entries.push(Self::client_entry(matter));
            }

            for document in &matter.documents {
                document_entries.push(Self::document_entry(matter, document));
            }

            for assignment in &matter.staff {
                task_entries.push(Self::task_entry(matter, assignment));
            }
        }

        tracing::debug!(
            "Index snapshot built: {} matters, {} clients, {} documents, {} tasks",
            matter_entries.len(),
            client_entries.len(),
            document_entries.len(),
            task_entries.len()
        );

        let mut entries: HashMap<Category, Vec<IndexEntry>> = HashMap::new();
        entries.insert(Category::Matters, matter_entries);
        entries.insert(Category::Clients, client_entries);
        entries.insert(Category::Documents, document_entries);
        entries.insert(Category::Tasks, task_entries);
        SearchIndex { entries, built_at: now }
    }

    fn matter_entry(matter: &Matter, now: DateTime<Utc>) -> IndexEntry {
        let search_text = [
            matter.title.as_str(),
            matter.client.name.as_str(),
            matter.status.as_str(),
            matter.matter_type.as_deref().unwrap_or(""),
            matter.assignee.as_deref().unwrap_or(""),
        ]
        .join(" ")
        .to_lowercase();

        IndexEntry {
            id: matter.id.clone(),
            title: matter.title.clone(),
            subtitle: matter.client.name.clone(),
            category: Category::Matters,
            payload: serde_json::to_value(matter).unwrap_or_default(),
            search_text,
            priority: Self::matter_priority(matter, now),
            updated_at: matter.updated_at,
        }
    }

    /// Matter priority: 1 + 2·urgent + recency bonus + 1 if actively worked
    /// / 案件优先级：1 + 2·紧急 + 新近度加成 + 进行中加1
    fn matter_priority(matter: &Matter, now: DateTime<Utc>) -> i32 {
        let mut priority = 1;
        if matter.urgent {
            priority += 2;
        }
        let age = now.signed_duration_since(matter.updated_at);
        if age < Duration::days(1) {
            priority += 2;
        } else if age < Duration::days(7) {
            priority += 1;
        }
        if matter.status.is_active() {
            priority += 1;
        }
        priority
    }

    fn client_entry(matter: &Matter) -> IndexEntry {
        let client = &matter.client;
        let search_text = [
            client.name.as_str(),
            client.id_number.as_deref().unwrap_or(""),
            client.email.as_deref().unwrap_or(""),
            client.phone.as_deref().unwrap_or(""),
        ]
        .join(" ")
        .to_lowercase();

        IndexEntry {
            // Id 与去重用同一把身份键，保证同类别内不重复
            id: client.identity(),
            title: client.name.clone(),
            // 客户条目的副标题指向其来源案件
            subtitle: matter.title.clone(),
            category: Category::Clients,
            payload: serde_json::to_value(client).unwrap_or_default(),
            search_text,
            priority: CLIENT_PRIORITY,
            updated_at: matter.updated_at,
        }
    }

    fn document_entry(matter: &Matter, document: &MatterDocument) -> IndexEntry {
        let search_text = [
            document.name.as_str(),
            document.doc_type.as_deref().unwrap_or(""),
            matter.title.as_str(),
        ]
        .join(" ")
        .to_lowercase();

        IndexEntry {
            id: IndexEntry::generate_id(&matter.id, &document.id),
            title: document.name.clone(),
            subtitle: matter.title.clone(),
            category: Category::Documents,
            payload: serde_json::to_value(document).unwrap_or_default(),
            search_text,
            priority: DOCUMENT_PRIORITY,
            updated_at: document.updated_at.unwrap_or(matter.updated_at),
        }
    }

    fn task_entry(matter: &Matter, assignment: &StaffAssignment) -> IndexEntry {
        let title = match assignment.role.as_deref() {
            Some(role) => format!("{} ({})", assignment.staff_name, role),
            None => assignment.staff_name.clone(),
        };
        let search_text = [
            assignment.staff_name.as_str(),
            assignment.role.as_deref().unwrap_or(""),
            matter.title.as_str(),
        ]
        .join(" ")
        .to_lowercase();

        IndexEntry {
            id: IndexEntry::generate_id(&matter.id, &assignment.staff_name),
            title,
            subtitle: matter.title.clone(),
            category: Category::Tasks,
            payload: serde_json::to_value(assignment).unwrap_or_default(),
            search_text,
            priority: if assignment.high_priority {
                TASK_PRIORITY_HIGH
            } else {
                TASK_PRIORITY_NORMAL
            },
            updated_at: matter.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClientRef, MatterStatus};

    fn client(name: &str) -> ClientRef {
        ClientRef {
            name: name.to_string(),
            id_number: None,
            email: None,
            phone: None,
        }
    }

    fn matter(id: &str, title: &str, client_name: &str, updated_at: DateTime<Utc>) -> Matter {
        Matter {
            id: id.to_string(),
            title: title.to_string(),
            client: client(client_name),
            status: MatterStatus::Pending,
            matter_type: None,
            assignee: None,
            urgent: false,
            updated_at,
            documents: Vec::new(),
            staff: Vec::new(),
        }
    }

    #[test]
    fn test_build_derives_all_categories() {
        let now = Utc::now();
        let mut m = matter("m1", "12 Oak Avenue, Sandton", "Jane Dlamini", now);
        m.documents.push(MatterDocument {
            id: "d1".to_string(),
            name: "Offer to Purchase.pdf".to_string(),
            doc_type: Some("contract".to_string()),
            updated_at: None,
        });
        m.staff.push(StaffAssignment {
            staff_name: "Sipho Nkosi".to_string(),
            role: Some("conveyancer".to_string()),
            high_priority: true,
        });

        let index = IndexBuilder::build_from_matters(&[m], now);
        assert_eq!(index.category(Category::Matters).len(), 1);
        assert_eq!(index.category(Category::Clients).len(), 1);
        assert_eq!(index.category(Category::Documents).len(), 1);
        assert_eq!(index.category(Category::Tasks).len(), 1);

        let doc = &index.category(Category::Documents)[0];
        assert_eq!(doc.id, "m1:d1");
        assert_eq!(doc.subtitle, "12 Oak Avenue, Sandton");
        assert_eq!(doc.priority, DOCUMENT_PRIORITY);

        let task = &index.category(Category::Tasks)[0];
        assert_eq!(task.title, "Sipho Nkosi (conveyancer)");
        assert_eq!(task.priority, TASK_PRIORITY_HIGH);
    }

    #[test]
    fn test_clients_deduplicated_across_matters() {
        let now = Utc::now();
        let matters = vec![
            matter("m1", "12 Oak Avenue, Sandton", "Jane Dlamini", now),
            matter("m2", "7 Pine Road, Rosebank", "Jane Dlamini", now),
            matter("m3", "3 Vine Street, Parkhurst", "Peter Botha", now),
        ];
        let index = IndexBuilder::build_from_matters(&matters, now);
        assert_eq!(index.category(Category::Clients).len(), 2);
        // 副标题指向客户首次出现的案件
        assert_eq!(
            index.category(Category::Clients)[0].subtitle,
            "12 Oak Avenue, Sandton"
        );
    }

    #[test]
    fn test_distinct_clients_sharing_id_number_get_distinct_ids() {
        let now = Utc::now();
        let mut first = matter("m1", "12 Oak Avenue, Sandton", "Jane Dlamini", now);
        first.client.id_number = Some("8001015009087".to_string());
        first.client.email = Some("jane@example.com".to_string());
        let mut second = matter("m2", "7 Pine Road, Rosebank", "Jane Dlamini", now);
        second.client.id_number = Some("8001015009087".to_string());
        second.client.email = Some("j.dlamini@example.com".to_string());

        let index = IndexBuilder::build_from_matters(&[first, second], now);
        let clients = index.category(Category::Clients);
        assert_eq!(clients.len(), 2);
        assert_ne!(clients[0].id, clients[1].id);
    }

    #[test]
    fn test_matter_priority_components() {
        let now = Utc::now();

        // Baseline: stale, not urgent, not active
        let mut m = matter("m1", "t", "c", now - Duration::days(30));
        assert_eq!(IndexBuilder::matter_priority(&m, now), 1);

        // Updated today adds 2
        m.updated_at = now - Duration::hours(2);
        assert_eq!(IndexBuilder::matter_priority(&m, now), 3);

        // Updated this week adds 1
        m.updated_at = now - Duration::days(3);
        assert_eq!(IndexBuilder::matter_priority(&m, now), 2);

        // Urgent adds 2, active status adds 1
        m.urgent = true;
        m.status = MatterStatus::InProgress;
        m.updated_at = now - Duration::hours(2);
        assert_eq!(IndexBuilder::matter_priority(&m, now), 6);
    }

    #[test]
    fn test_build_is_idempotent() {
        let now = Utc::now();
        let matters = vec![
            matter("m1", "12 Oak Avenue, Sandton", "Jane Dlamini", now - Duration::hours(1)),
            matter("m2", "7 Pine Road, Rosebank", "Peter Botha", now - Duration::days(2)),
        ];
        let first = IndexBuilder::build_from_matters(&matters, now);
        let second = IndexBuilder::build_from_matters(&matters, now);
        assert_eq!(first.entries, second.entries);
    }

    #[test]
    fn test_search_text_is_lowercased() {
        let now = Utc::now();
        let m = matter("m1", "12 Oak Avenue, SANDTON", "Jane DLAMINI", now);
        let index = IndexBuilder::build_from_matters(&[m], now);
        let entry = &index.category(Category::Matters)[0];
        assert!(entry.search_text.contains("sandton"));
        assert!(entry.search_text.contains("jane dlamini"));
        assert_eq!(entry.search_text, entry.search_text.to_lowercase());
    }
}
