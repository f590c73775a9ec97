//! Connection registry - explicit get-or-create cache of pooled handles

use std::collections::HashMap;
use std::future::Future;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tokio::sync::RwLock;

use crate::domain::DomainError;

/// Map of connection key to a shared, cloneable handle
///
/// Handles are created on first request and live as long as the registry.
#[derive(Debug)]
pub struct ConnectionRegistry<T> {
    handles: RwLock<HashMap<String, T>>,
}

impl<T> Default for ConnectionRegistry<T> {
    fn default() -> Self {
        Self {
            handles: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: Clone + Send + Sync> ConnectionRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<T> {
        self.handles.read().await.get(key).cloned()
    }

    /// Return the handle for `key`, creating it with `create` if absent
    ///
    /// Concurrent callers for the same key observe a single creation.
    pub async fn get_or_try_create<F, Fut>(&self, key: &str, create: F) -> Result<T, DomainError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        if let Some(handle) = self.get(key).await {
            return Ok(handle);
        }

        let mut handles = self.handles.write().await;
        if let Some(handle) = handles.get(key) {
            return Ok(handle.clone());
        }

        let handle = create().await?;
        handles.insert(key.to_string(), handle.clone());
        tracing::debug!(key = %key, "Registered connection handle");
        Ok(handle)
    }

    pub async fn remove(&self, key: &str) -> Option<T> {
        self.handles.write().await.remove(key)
    }

    pub async fn len(&self) -> usize {
        self.handles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.handles.read().await.is_empty()
    }
}

/// One lazily-connected Postgres pool per database URL
#[derive(Debug)]
pub struct PgPoolRegistry {
    pools: ConnectionRegistry<PgPool>,
    max_connections: u32,
}

impl PgPoolRegistry {
    pub fn new(max_connections: u32) -> Self {
        Self {
            pools: ConnectionRegistry::new(),
            max_connections,
        }
    }

    /// Pool for `database_url`; no connection is opened until first use
    pub async fn pool(&self, database_url: &str) -> Result<PgPool, DomainError> {
        let max_connections = self.max_connections;
        self.pools
            .get_or_try_create(database_url, || async move {
                PgPoolOptions::new()
                    .max_connections(max_connections)
                    .connect_lazy(database_url)
                    .map_err(|e| {
                        DomainError::configuration(format!("Invalid database URL: {}", e))
                    })
            })
            .await
    }

    pub async fn pool_count(&self) -> usize {
        self.pools.len().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_or_create_creates_once() {
        let registry: ConnectionRegistry<String> = ConnectionRegistry::new();
        let created = AtomicUsize::new(0);

        for _ in 0..3 {
            let handle = registry
                .get_or_try_create("db-1", || async {
                    created.fetch_add(1, Ordering::SeqCst);
                    Ok("handle-1".to_string())
                })
                .await
                .unwrap();
            assert_eq!(handle, "handle-1");
        }

        assert_eq!(created.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_failed_creation_is_not_cached() {
        let registry: ConnectionRegistry<String> = ConnectionRegistry::new();

        let result = registry
            .get_or_try_create("db-1", || async {
                Err(DomainError::configuration("unreachable"))
            })
            .await;
        assert!(result.is_err());
        assert!(registry.is_empty().await);

        let handle = registry
            .get_or_try_create("db-1", || async { Ok("ok".to_string()) })
            .await
            .unwrap();
        assert_eq!(handle, "ok");
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_handle() {
        let registry: Arc<ConnectionRegistry<usize>> = Arc::new(ConnectionRegistry::new());
        let created = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                let created = created.clone();
                tokio::spawn(async move {
                    registry
                        .get_or_try_create("shared", || async move {
                            Ok(created.fetch_add(1, Ordering::SeqCst))
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), 0);
        }
        assert_eq!(created.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let registry: ConnectionRegistry<u8> = ConnectionRegistry::new();
        registry.get_or_try_create("k", || async { Ok(1) }).await.unwrap();

        assert_eq!(registry.remove("k").await, Some(1));
        assert_eq!(registry.get("k").await, None);
    }

    #[tokio::test]
    async fn test_pg_pool_registry_reuses_pool_per_url() {
        let registry = PgPoolRegistry::new(2);

        registry.pool("postgres://localhost/kb").await.unwrap();
        registry.pool("postgres://localhost/kb").await.unwrap();
        registry.pool("postgres://localhost/other").await.unwrap();

        assert_eq!(registry.pool_count().await, 2);
    }

    #[tokio::test]
    async fn test_pg_pool_registry_rejects_bad_url() {
        let registry = PgPoolRegistry::new(2);

        let result = registry.pool("not a url").await;

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
