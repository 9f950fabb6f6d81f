/*!
 * Database entity models and DTOs.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use serde::{Deserialize, Serialize};

/// Stored translation artifact (maps to `subtitles` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleRecord {
    /// Row identifier, assigned on insert
    pub id: i64,
    /// Fingerprint of (url, target language, format)
    pub subtitle_id: String,
    /// Source URL or local path of the original file
    pub url: String,
    /// Target language code
    pub target_lang: String,
    /// Source language code or `auto`
    pub source_lang: String,
    /// Input caption format
    pub format: String,
    /// Content file location, forward slashes only
    pub file_path: String,
    /// Content size in bytes
    pub file_size: i64,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

impl SubtitleRecord {
    /// Create a new record; `id` stays 0 until inserted
    pub fn new(
        subtitle_id: String,
        url: String,
        target_lang: String,
        source_lang: String,
        format: String,
        file_path: String,
        file_size: i64,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: 0,
            subtitle_id,
            url,
            target_lang,
            source_lang,
            format,
            file_path: normalize_path(&file_path),
            file_size,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// A stored record together with its content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleWithContent {
    #[serde(flatten)]
    pub record: SubtitleRecord,
    pub content: String,
}

/// Use forward slashes regardless of platform
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}
