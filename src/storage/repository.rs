use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{Document, DocumentId, DocumentKind};

use super::MIGRATION_001_DOCUMENTS;

/// Repository for persisting and querying registered documents.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    /// Creates the database file if it doesn't exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_DOCUMENTS)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Document operations
    // ========================

    /// Save a new document to the database.
    pub async fn save_document(&self, document: &Document) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (id, title, kind, extension, file_path, size_kb, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(document.id.to_string())
        .bind(&document.title)
        .bind(document.kind.as_str())
        .bind(&document.extension)
        .bind(&document.file_path)
        .bind(document.size_kb)
        .bind(document.created_at.to_rfc3339())
        .bind(document.updated_at.map(|dt| dt.to_rfc3339()))
        .execute(&self.pool)
        .await
        .context("Failed to save document")?;
        Ok(())
    }

    /// Get a document by ID.
    pub async fn get_document(&self, id: DocumentId) -> Result<Option<Document>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, kind, extension, file_path, size_kb, created_at, updated_at
            FROM documents
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch document")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_document(&row)?)),
            None => Ok(None),
        }
    }

    /// List all documents, newest first.
    pub async fn list_documents(&self) -> Result<Vec<Document>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, kind, extension, file_path, size_kb, created_at, updated_at
            FROM documents
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list documents")?;

        rows.iter().map(Self::row_to_document).collect()
    }

    /// Delete a document by ID.
    pub async fn delete_document(&self, id: DocumentId) -> Result<()> {
        sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete document")?;
        Ok(())
    }

    fn row_to_document(row: &sqlx::sqlite::SqliteRow) -> Result<Document> {
        let id_str: String = row.get("id");
        let kind_str: String = row.get("kind");
        let created_at_str: String = row.get("created_at");
        let updated_at_str: Option<String> = row.get("updated_at");

        Ok(Document {
            id: Uuid::parse_str(&id_str).context("Invalid document ID")?,
            title: row.get("title"),
            kind: DocumentKind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid document kind: {}", kind_str))?,
            extension: row.get("extension"),
            file_path: row.get("file_path"),
            size_kb: row.get("size_kb"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
            updated_at: updated_at_str
                .map(|s| DateTime::parse_from_rfc3339(&s))
                .transpose()
                .context("Invalid updated_at timestamp")?
                .map(|dt| dt.with_timezone(&Utc)),
        })
    }
}
