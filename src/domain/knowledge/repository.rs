//! Knowledge record store trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::entry::KnowledgeEntry;
use super::filter::RetrievalFilter;
use crate::domain::DomainError;

/// Canonical storage for knowledge entries
///
/// The vector store indexes embeddings; this store holds the records themselves and
/// serves the brute-force scan when indexed search is unavailable.
#[async_trait]
pub trait KnowledgeRecordStore: Send + Sync + Debug {
    fn backend_name(&self) -> &'static str;

    /// Insert or replace an entry
    async fn insert(&self, entry: KnowledgeEntry) -> Result<KnowledgeEntry, DomainError>;

    async fn insert_many(&self, entries: Vec<KnowledgeEntry>) -> Result<usize, DomainError>;

    async fn get(&self, id: &str) -> Result<Option<KnowledgeEntry>, DomainError>;

    /// Delete a single entry; returns whether it existed
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;

    async fn list_children(&self, parent_id: &str) -> Result<Vec<KnowledgeEntry>, DomainError>;

    /// All entries matching the scalar filter
    async fn find(&self, filter: &RetrievalFilter) -> Result<Vec<KnowledgeEntry>, DomainError>;

    /// Delete every entry whose scope source id equals `source_id`
    async fn delete_by_source(&self, source_id: &str) -> Result<usize, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::RwLock;

    /// Mock record store with failure injection
    #[derive(Debug, Default)]
    pub struct MockKnowledgeRecordStore {
        entries: RwLock<Vec<KnowledgeEntry>>,
        should_fail: AtomicBool,
        find_count: AtomicUsize,
    }

    impl MockKnowledgeRecordStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entries(self, entries: Vec<KnowledgeEntry>) -> Self {
            *self.entries.try_write().unwrap() = entries;
            self
        }

        pub fn with_failure(self) -> Self {
            self.should_fail.store(true, Ordering::SeqCst);
            self
        }

        pub fn find_count(&self) -> usize {
            self.find_count.load(Ordering::SeqCst)
        }

        fn check_should_fail(&self) -> Result<(), DomainError> {
            if self.should_fail.load(Ordering::SeqCst) {
                return Err(DomainError::storage("Mock record store configured to fail"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl KnowledgeRecordStore for MockKnowledgeRecordStore {
        fn backend_name(&self) -> &'static str {
            "mock"
        }

        async fn insert(&self, entry: KnowledgeEntry) -> Result<KnowledgeEntry, DomainError> {
            self.check_should_fail()?;
            let mut entries = self.entries.write().await;
            entries.retain(|e| e.id != entry.id);
            entries.push(entry.clone());
            Ok(entry)
        }

        async fn insert_many(&self, new_entries: Vec<KnowledgeEntry>) -> Result<usize, DomainError> {
            let count = new_entries.len();
            for entry in new_entries {
                self.insert(entry).await?;
            }
            Ok(count)
        }

        async fn get(&self, id: &str) -> Result<Option<KnowledgeEntry>, DomainError> {
            self.check_should_fail()?;
            Ok(self.entries.read().await.iter().find(|e| e.id == id).cloned())
        }

        async fn delete(&self, id: &str) -> Result<bool, DomainError> {
            self.check_should_fail()?;
            let mut entries = self.entries.write().await;
            let before = entries.len();
            entries.retain(|e| e.id != id);
            Ok(entries.len() < before)
        }

        async fn list_children(&self, parent_id: &str) -> Result<Vec<KnowledgeEntry>, DomainError> {
            self.check_should_fail()?;
            Ok(self
                .entries
                .read()
                .await
                .iter()
                .filter(|e| e.parent_id.as_deref() == Some(parent_id))
                .cloned()
                .collect())
        }

        async fn find(&self, filter: &RetrievalFilter) -> Result<Vec<KnowledgeEntry>, DomainError> {
            self.find_count.fetch_add(1, Ordering::SeqCst);
            self.check_should_fail()?;
            Ok(self
                .entries
                .read()
                .await
                .iter()
                .filter(|e| filter.matches_entry(e))
                .cloned()
                .collect())
        }

        async fn delete_by_source(&self, source_id: &str) -> Result<usize, DomainError> {
            self.check_should_fail()?;
            let mut entries = self.entries.write().await;
            let before = entries.len();
            entries.retain(|e| e.scope.source_id.as_deref() != Some(source_id));
            Ok(before - entries.len())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::domain::knowledge::EntryType;

        #[tokio::test]
        async fn test_mock_store_failure() {
            let store = MockKnowledgeRecordStore::new().with_failure();
            let result = store.find(&RetrievalFilter::new()).await;

            assert!(matches!(result, Err(DomainError::Storage { .. })));
            assert_eq!(store.find_count(), 1);
        }

        #[tokio::test]
        async fn test_mock_store_find_applies_filter() {
            let store = MockKnowledgeRecordStore::new().with_entries(vec![
                KnowledgeEntry::new(EntryType::Synonym, "a", "a").with_owner("alice"),
                KnowledgeEntry::new(EntryType::Synonym, "b", "b").with_owner("bob"),
            ]);

            let found = store
                .find(&RetrievalFilter::new().with_owner("alice"))
                .await
                .unwrap();

            assert_eq!(found.len(), 1);
            assert_eq!(found[0].title, "a");
        }
    }
}
