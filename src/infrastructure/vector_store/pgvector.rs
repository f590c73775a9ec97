//! pgvector-backed vector store

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::domain::knowledge::{EntryType, RetrievalFilter};
use crate::domain::retrieval::RetrievalResult;
use crate::domain::vector::{VectorRecord, VectorStore};
use crate::domain::DomainError;

static TABLE_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").unwrap());

/// Validate a table name before it is interpolated into SQL
pub fn validate_table_name(name: &str) -> Result<(), DomainError> {
    if TABLE_NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(DomainError::configuration(format!(
            "Invalid table name '{}'",
            name
        )))
    }
}

/// Render an embedding as a pgvector literal, e.g. `[0.1,0.2]`
pub fn embedding_to_pgvector(embedding: &[f32]) -> String {
    let values: Vec<String> = embedding.iter().map(|v| v.to_string()).collect();
    format!("[{}]", values.join(","))
}

/// Build the similarity query; placeholders follow the order in which
/// `PgvectorVectorStore::search` binds filter values
fn build_search_sql(table: &str, filter: &RetrievalFilter) -> String {
    let mut conditions = Vec::new();
    let mut param = 2;

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
        param += 1;
    }
    conditions.push(format!("1 - (embedding <=> $1::vector) >= ${}", param));
    param += 1;

    format!(
        r#"
        SELECT
            id, source_id, owner_id, scope_id, entry_type, title, chunk_index,
            content, metadata, created_at,
            1 - (embedding <=> $1::vector) AS score
        FROM {}
        WHERE {}
        ORDER BY embedding <=> $1::vector
        LIMIT ${}
        "#,
        table,
        conditions.join(" AND "),
        param
    )
}

/// Vector store on PostgreSQL with the pgvector extension
///
/// Similarity is `1 - cosine distance` as computed by the `<=>` operator.
#[derive(Debug, Clone)]
pub struct PgvectorVectorStore {
    pool: PgPool,
    table_name: String,
    dimensions: usize,
}

impl PgvectorVectorStore {
    pub fn new(
        pool: PgPool,
        table_name: impl Into<String>,
        dimensions: usize,
    ) -> Result<Self, DomainError> {
        let table_name = table_name.into();
        validate_table_name(&table_name)?;

        Ok(Self {
            pool,
            table_name,
            dimensions,
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Create the extension, table and indexes if missing
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::vector_store(format!("Failed to create vector extension: {}", e))
            })?;

        let table = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id VARCHAR(255) PRIMARY KEY,
                source_id VARCHAR(255) NOT NULL,
                owner_id VARCHAR(255),
                scope_id VARCHAR(255),
                entry_type VARCHAR(50) NOT NULL,
                title TEXT NOT NULL DEFAULT '',
                chunk_index INTEGER NOT NULL,
                content TEXT NOT NULL,
                embedding vector({}) NOT NULL,
                metadata JSONB NOT NULL DEFAULT '{{}}',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            self.table_name, self.dimensions
        );

        sqlx::query(&table)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::vector_store(format!("Failed to create table: {}", e)))?;

        for column in ["source_id", "owner_id", "scope_id"] {
            let index = format!(
                "CREATE INDEX IF NOT EXISTS idx_{}_{} ON {} ({})",
                self.table_name, column, self.table_name, column
            );
            sqlx::query(&index).execute(&self.pool).await.map_err(|e| {
                DomainError::vector_store(format!("Failed to create {} index: {}", column, e))
            })?;
        }

        let vector_index = format!(
            "CREATE INDEX IF NOT EXISTS idx_{}_embedding ON {} USING hnsw (embedding vector_cosine_ops)",
            self.table_name, self.table_name
        );

        // Older pgvector releases lack hnsw; searches still work without the index
        if let Err(e) = sqlx::query(&vector_index).execute(&self.pool).await {
            tracing::warn!(table = %self.table_name, error = %e, "Vector index not created");
        }

        Ok(())
    }

    async fn insert_one(&self, record: &VectorRecord) -> Result<(), DomainError> {
        let query = format!(
            r#"
            INSERT INTO {} (
                id, source_id, owner_id, scope_id, entry_type, title,
                chunk_index, content, embedding, metadata, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9::vector, $10, $11)
            "#,
            self.table_name
        );

        let metadata = serde_json::to_value(&record.metadata).unwrap_or_default();

        sqlx::query(&query)
            .bind(&record.id)
            .bind(&record.source_id)
            .bind(&record.owner_id)
            .bind(&record.scope_id)
            .bind(record.entry_type.as_str())
            .bind(&record.title)
            .bind(record.chunk_index as i32)
            .bind(&record.content)
            .bind(embedding_to_pgvector(&record.embedding))
            .bind(&metadata)
            .bind(record.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::vector_store(format!("Failed to insert record {}: {}", record.id, e))
            })?;

        Ok(())
    }

    fn row_to_result(row: &PgRow) -> Result<RetrievalResult, DomainError> {
        let column_err =
            |e: sqlx::Error| DomainError::vector_store(format!("Failed to read row: {}", e));

        let entry_type: String = row.try_get("entry_type").map_err(column_err)?;
        let chunk_index: i32 = row.try_get("chunk_index").map_err(column_err)?;
        let metadata: serde_json::Value = row.try_get("metadata").map_err(column_err)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(column_err)?;
        let score: f64 = row.try_get("score").map_err(column_err)?;

        let metadata: HashMap<String, serde_json::Value> =
            serde_json::from_value(metadata).unwrap_or_default();

        let record = VectorRecord {
            id: row.try_get("id").map_err(column_err)?,
            source_id: row.try_get("source_id").map_err(column_err)?,
            owner_id: row.try_get("owner_id").map_err(column_err)?,
            scope_id: row.try_get("scope_id").map_err(column_err)?,
            entry_type: EntryType::from_str(&entry_type)?,
            title: row.try_get("title").map_err(column_err)?,
            chunk_index: chunk_index.max(0) as usize,
            content: row.try_get("content").map_err(column_err)?,
            embedding: Vec::new(),
            metadata,
            created_at,
        };

        Ok(RetrievalResult::from_record(&record, score as f32))
    }
}

#[async_trait]
impl VectorStore for PgvectorVectorStore {
    fn backend_name(&self) -> &'static str {
        "pgvector"
    }

    async fn insert_batch(&self, records: Vec<VectorRecord>) -> Result<usize, DomainError> {
        if let Some(bad) = records.iter().find(|r| r.dimensions() != self.dimensions) {
            return Err(DomainError::dimension_mismatch(self.dimensions, bad.dimensions()));
        }

        // Rows within a batch are independent writes
        try_join_all(records.iter().map(|record| self.insert_one(record))).await?;

        tracing::debug!(
            table = %self.table_name,
            count = records.len(),
            "Inserted vector batch"
        );

        Ok(records.len())
    }

    async fn delete_by_source(&self, source_id: &str) -> Result<usize, DomainError> {
        let query = format!("DELETE FROM {} WHERE source_id = $1", self.table_name);

        let result = sqlx::query(&query)
            .bind(source_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::vector_store(format!(
                    "Failed to delete source {}: {}",
                    source_id, e
                ))
            })?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_by_ids(&self, ids: &[String]) -> Result<usize, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let query = format!("DELETE FROM {} WHERE id = ANY($1)", self.table_name);

        let result = sqlx::query(&query)
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::vector_store(format!("Failed to delete records: {}", e)))?;

        Ok(result.rows_affected() as usize)
    }

    async fn search(
        &self,
        query: &[f32],
        filter: &RetrievalFilter,
        top_k: usize,
        min_score: f32,
    ) -> Result<Vec<RetrievalResult>, DomainError> {
        if query.len() != self.dimensions {
            return Err(DomainError::dimension_mismatch(self.dimensions, query.len()));
        }

        let sql = build_search_sql(&self.table_name, filter);
        let types: Vec<String> = filter.types.iter().map(|t| t.as_str().to_string()).collect();

        let mut statement = sqlx::query(&sql).bind(embedding_to_pgvector(query));
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
        statement = statement.bind(min_score as f64).bind(top_k as i64);

        let rows = statement.fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!(table = %self.table_name, error = %e, "Vector search failed");
            DomainError::vector_store(format!("Search failed: {}", e))
        })?;

        let results = rows
            .iter()
            .map(Self::row_to_result)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            table = %self.table_name,
            results = results.len(),
            top_k,
            min_score,
            "Vector search completed"
        );

        Ok(results)
    }

    async fn count_by_source(&self, source_id: &str) -> Result<usize, DomainError> {
        let query = format!(
            "SELECT COUNT(*) AS count FROM {} WHERE source_id = $1",
            self.table_name
        );

        let row = sqlx::query(&query)
            .bind(source_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::vector_store(format!("Failed to count records: {}", e)))?;

        let count: i64 = row
            .try_get("count")
            .map_err(|e| DomainError::vector_store(format!("Failed to read count: {}", e)))?;

        Ok(count.max(0) as usize)
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        Ok(sqlx::query("SELECT 1").execute(&self.pool).await.is_ok())
    }
}
