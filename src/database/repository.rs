/*!
 * Repository layer for database operations.
 *
 * This module provides a high-level API for all database operations,
 * abstracting away the SQL details and providing type-safe access.
 */

use anyhow::Result;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};

use super::connection::DatabaseConnection;
use super::models::{normalize_path, SubtitleRecord};

const SELECT_COLUMNS: &str = "SELECT id, subtitle_id, url, target_lang, source_lang, format, \
                              file_path, file_size, created_at, updated_at FROM subtitles";

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Fingerprint of a translation request: hex SHA-256 of `url|target|format`
    pub fn fingerprint(url: &str, target_lang: &str, format: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("{}|{}|{}", url, target_lang, format).as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn parse_row(row: &rusqlite::Row) -> rusqlite::Result<SubtitleRecord> {
        Ok(SubtitleRecord {
            id: row.get(0)?,
            subtitle_id: row.get(1)?,
            url: row.get(2)?,
            target_lang: row.get(3)?,
            source_lang: row.get(4)?,
            format: row.get(5)?,
            file_path: row.get(6)?,
            file_size: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    /// Get a record by ID (synchronous version for use within transactions)
    fn get_by_id_sync(conn: &Connection, id: i64) -> Result<Option<SubtitleRecord>> {
        let record = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                [id],
                Self::parse_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Insert a record and return it with its assigned ID
    pub async fn create(&self, record: &SubtitleRecord) -> Result<SubtitleRecord> {
        let mut record = record.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO subtitles (
                        subtitle_id, url, target_lang, source_lang, format,
                        file_path, file_size, created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    "#,
                    params![
                        record.subtitle_id,
                        record.url,
                        record.target_lang,
                        record.source_lang,
                        record.format,
                        record.file_path,
                        record.file_size,
                        record.created_at,
                        record.updated_at,
                    ],
                )?;
                record.id = conn.last_insert_rowid();
                debug!("Stored subtitle {} as #{}", record.subtitle_id, record.id);
                Ok(record)
            })
            .await
    }

    /// Get a record by its fingerprint
    pub async fn get_by_subtitle_id(&self, subtitle_id: &str) -> Result<Option<SubtitleRecord>> {
        let subtitle_id = subtitle_id.to_string();

        self.db
            .execute_async(move |conn| {
                let record = conn
                    .query_row(
                        &format!("{} WHERE subtitle_id = ?1", SELECT_COLUMNS),
                        [&subtitle_id],
                        Self::parse_row,
                    )
                    .optional()?;
                Ok(record)
            })
            .await
    }

    /// Get a record by row ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<SubtitleRecord>> {
        self.db
            .execute_async(move |conn| Self::get_by_id_sync(conn, id))
            .await
    }

    /// List records newest first, with an optional target-language filter.
    ///
    /// `page` is 1-based. Returns the page and the total number of matching rows.
    pub async fn list(
        &self,
        page: u32,
        limit: u32,
        target_lang: Option<&str>,
    ) -> Result<(Vec<SubtitleRecord>, i64)> {
        let target_lang = target_lang.map(str::to_string);
        let limit = i64::from(limit.max(1));
        let offset = i64::from(page.max(1) - 1) * limit;

        self.db
            .execute_async(move |conn| {
                let (records, total) = if let Some(target) = target_lang {
                    let total: i64 = conn.query_row(
                        "SELECT COUNT(*) FROM subtitles WHERE target_lang = ?1",
                        [&target],
                        |row| row.get(0),
                    )?;
                    let mut stmt = conn.prepare(&format!(
                        "{} WHERE target_lang = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3",
                        SELECT_COLUMNS
                    ))?;
                    let records: Vec<SubtitleRecord> = stmt
                        .query_map(params![target, limit, offset], Self::parse_row)?
                        .filter_map(|r| r.ok())
                        .collect();
                    (records, total)
                } else {
                    let total: i64 =
                        conn.query_row("SELECT COUNT(*) FROM subtitles", [], |row| row.get(0))?;
                    let mut stmt = conn.prepare(&format!(
                        "{} ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
                        SELECT_COLUMNS
                    ))?;
                    let records: Vec<SubtitleRecord> = stmt
                        .query_map(params![limit, offset], Self::parse_row)?
                        .filter_map(|r| r.ok())
                        .collect();
                    (records, total)
                };

                Ok((records, total))
            })
            .await
    }

    /// Record a content change: new size and update time
    pub async fn update_content(&self, id: i64, file_size: i64) -> Result<Option<SubtitleRecord>> {
        self.db
            .execute_async(move |conn| {
                let now = chrono::Utc::now().to_rfc3339();
                let updated = conn.execute(
                    "UPDATE subtitles SET file_size = ?1, updated_at = ?2 WHERE id = ?3",
                    params![file_size, now, id],
                )?;
                if updated == 0 {
                    return Ok(None);
                }
                Self::get_by_id_sync(conn, id)
            })
            .await
    }

    /// Rewrite the stored file path in its normalized form
    pub async fn update_file_path(&self, id: i64, file_path: &str) -> Result<()> {
        let file_path = normalize_path(file_path);

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    "UPDATE subtitles SET file_path = ?1 WHERE id = ?2",
                    params![file_path, id],
                )?;
                Ok(())
            })
            .await
    }

    /// Delete a record; returns whether a row was removed
    pub async fn delete(&self, id: i64) -> Result<bool> {
        self.db
            .execute_async(move |conn| {
                let deleted = conn.execute("DELETE FROM subtitles WHERE id = ?1", [id])?;
                Ok(deleted > 0)
            })
            .await
    }
}
