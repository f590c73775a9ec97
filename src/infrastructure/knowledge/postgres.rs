//! PostgreSQL knowledge record store
//!
//! Entries are stored whole as JSONB; the columns used for filtering are
//! projected alongside so scans never deserialize non-matching rows.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::knowledge::{KnowledgeEntry, KnowledgeRecordStore, RetrievalFilter};
use crate::domain::DomainError;
use crate::infrastructure::vector_store::validate_table_name;

#[derive(Debug, Clone)]
pub struct PostgresKnowledgeRecordStore {
    pool: PgPool,
    table_name: String,
}

/// WHERE clause for a filter; placeholders start at `$1`
fn build_find_sql(table: &str, filter: &RetrievalFilter) -> String {
    let mut conditions = Vec::new();
    let mut param = 1;

    if filter.owner_id.is_some() {
        conditions.push(format!("(owner_id = ${} OR owner_id IS NULL)", param));
        param += 1;
    }
    if filter.scope_id.is_some() {
        conditions.push(format!("scope_id = ${}", param));
        param += 1;
    }
    if !filter.types.is_empty() {
        conditions.push(format!("entry_type = ANY(${})", param));
        param += 1;
    }
    if filter.source_id.is_some() {
        conditions.push(format!("source_id = ${}", param));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    format!(
        "SELECT data FROM {}{} ORDER BY created_at, id",
        table, where_clause
    )
}

fn row_to_entry(row: &PgRow) -> Result<KnowledgeEntry, DomainError> {
    let data: serde_json::Value = row
        .try_get("data")
        .map_err(|e| DomainError::storage(format!("Failed to read entry: {}", e)))?;

    serde_json::from_value(data)
        .map_err(|e| DomainError::storage(format!("Failed to deserialize entry: {}", e)))
}

impl PostgresKnowledgeRecordStore {
    pub fn new(pool: PgPool, table_name: impl Into<String>) -> Result<Self, DomainError> {
        let table_name = table_name.into();
        validate_table_name(&table_name)?;
        Ok(Self { pool, table_name })
    }

    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id VARCHAR(255) PRIMARY KEY,
                entry_type VARCHAR(50) NOT NULL,
                owner_id VARCHAR(255),
                parent_id VARCHAR(255),
                scope_id VARCHAR(255),
                source_id VARCHAR(255),
                data JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            self.table_name
        );

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create table: {}", e)))?;

        for column in ["parent_id", "source_id", "owner_id"] {
            let index = format!(
                "CREATE INDEX IF NOT EXISTS idx_{}_{} ON {} ({})",
                self.table_name, column, self.table_name, column
            );
            sqlx::query(&index).execute(&self.pool).await.map_err(|e| {
                DomainError::storage(format!("Failed to create {} index: {}", column, e))
            })?;
        }

        Ok(())
    }

    async fn upsert(&self, entry: &KnowledgeEntry) -> Result<(), DomainError> {
        let query = format!(
            r#"
            INSERT INTO {} (id, entry_type, owner_id, parent_id, scope_id, source_id, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                entry_type = EXCLUDED.entry_type,
                owner_id = EXCLUDED.owner_id,
                parent_id = EXCLUDED.parent_id,
                scope_id = EXCLUDED.scope_id,
                source_id = EXCLUDED.source_id,
                data = EXCLUDED.data,
                updated_at = EXCLUDED.updated_at
            "#,
            self.table_name
        );

        let data = serde_json::to_value(entry)
            .map_err(|e| DomainError::storage(format!("Failed to serialize entry: {}", e)))?;

        sqlx::query(&query)
            .bind(&entry.id)
            .bind(entry.entry_type.as_str())
            .bind(&entry.owner_id)
            .bind(&entry.parent_id)
            .bind(&entry.scope.scope_id)
            .bind(&entry.scope.source_id)
            .bind(&data)
            .bind(entry.created_at)
            .bind(entry.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to save entry {}: {}", entry.id, e)))?;

        Ok(())
    }
}

#[async_trait]
impl KnowledgeRecordStore for PostgresKnowledgeRecordStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, entry: KnowledgeEntry) -> Result<KnowledgeEntry, DomainError> {
        self.upsert(&entry).await?;
        Ok(entry)
    }

    async fn insert_many(&self, entries: Vec<KnowledgeEntry>) -> Result<usize, DomainError> {
        for entry in &entries {
            self.upsert(entry).await?;
        }
        Ok(entries.len())
    }

    async fn get(&self, id: &str) -> Result<Option<KnowledgeEntry>, DomainError> {
        let query = format!("SELECT data FROM {} WHERE id = $1", self.table_name);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get entry: {}", e)))?;

        row.as_ref().map(row_to_entry).transpose()
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let query = format!("DELETE FROM {} WHERE id = $1", self.table_name);

        let result = sqlx::query(&query)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete entry: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_children(&self, parent_id: &str) -> Result<Vec<KnowledgeEntry>, DomainError> {
        let query = format!(
            "SELECT data FROM {} WHERE parent_id = $1 ORDER BY created_at, id",
            self.table_name
        );

        let rows = sqlx::query(&query)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list children: {}", e)))?;

        rows.iter().map(row_to_entry).collect()
    }

    async fn find(&self, filter: &RetrievalFilter) -> Result<Vec<KnowledgeEntry>, DomainError> {
        let sql = build_find_sql(&self.table_name, filter);
        let types: Vec<String> = filter.types.iter().map(|t| t.as_str().to_string()).collect();

        let mut statement = sqlx::query(&sql);
        if let Some(owner_id) = &filter.owner_id {
            statement = statement.bind(owner_id);
        }
        if let Some(scope_id) = &filter.scope_id {
            statement = statement.bind(scope_id);
        }
        if !types.is_empty() {
            statement = statement.bind(&types);
        }
        if let Some(source_id) = &filter.source_id {
            statement = statement.bind(source_id);
        }

        let rows = statement
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to scan entries: {}", e)))?;

        rows.iter().map(row_to_entry).collect()
    }

    async fn delete_by_source(&self, source_id: &str) -> Result<usize, DomainError> {
        let query = format!("DELETE FROM {} WHERE source_id = $1", self.table_name);

        let result = sqlx::query(&query)
            .bind(source_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete source: {}", e)))?;

        Ok(result.rows_affected() as usize)
    }
}
