//! In-memory knowledge record store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::knowledge::{KnowledgeEntry, KnowledgeRecordStore, RetrievalFilter};
use crate::domain::DomainError;

#[derive(Debug, Default)]
pub struct InMemoryKnowledgeRecordStore {
    entries: RwLock<HashMap<String, KnowledgeEntry>>,
}

impl InMemoryKnowledgeRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

fn sorted_by_creation(mut entries: Vec<KnowledgeEntry>) -> Vec<KnowledgeEntry> {
    entries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    entries
}

#[async_trait]
impl KnowledgeRecordStore for InMemoryKnowledgeRecordStore {
    fn backend_name(&self) -> &'static str {
        "in_memory"
    }

    async fn insert(&self, entry: KnowledgeEntry) -> Result<KnowledgeEntry, DomainError> {
        self.entries
            .write()
            .await
            .insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    async fn insert_many(&self, new_entries: Vec<KnowledgeEntry>) -> Result<usize, DomainError> {
        let count = new_entries.len();
        let mut entries = self.entries.write().await;
        for entry in new_entries {
            entries.insert(entry.id.clone(), entry);
        }
        Ok(count)
    }

    async fn get(&self, id: &str) -> Result<Option<KnowledgeEntry>, DomainError> {
        Ok(self.entries.read().await.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        Ok(self.entries.write().await.remove(id).is_some())
    }

    async fn list_children(&self, parent_id: &str) -> Result<Vec<KnowledgeEntry>, DomainError> {
        let entries = self.entries.read().await;
        let children = entries
            .values()
            .filter(|e| e.parent_id.as_deref() == Some(parent_id))
            .cloned()
            .collect();
        Ok(sorted_by_creation(children))
    }

    async fn find(&self, filter: &RetrievalFilter) -> Result<Vec<KnowledgeEntry>, DomainError> {
        let entries = self.entries.read().await;
        let matching = entries
            .values()
            .filter(|e| filter.matches_entry(e))
            .cloned()
            .collect();
        Ok(sorted_by_creation(matching))
    }

    async fn delete_by_source(&self, source_id: &str) -> Result<usize, DomainError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| e.scope.source_id.as_deref() != Some(source_id));
        Ok(before - entries.len())
    }
}
