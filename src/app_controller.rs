use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::app_config::Config;
use crate::captions::markup::remove_font_tags;
use crate::captions::CaptionFormat;
use crate::database::models::normalize_path;
use crate::database::{
    ContentStore, DatabaseConnection, Repository, SubtitleRecord, SubtitleWithContent,
};
use crate::errors::AppError;
use crate::fetch::SubtitleFetcher;
use crate::file_utils::FileManager;
use crate::language_utils::{validate_source_language, validate_target_language};
use crate::translation::TranslationService;

// @module: Application controller for subtitle translation

/// Largest page size accepted by `list_subtitles`
pub const MAX_PAGE_SIZE: i64 = 100;

/// One page of stored subtitles
#[derive(Debug, Clone, Serialize)]
pub struct SubtitlePage {
    pub items: Vec<SubtitleRecord>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// Result of a folder run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderSummary {
    pub translated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Translation pipeline
    translator: TranslationService,

    // @field: Remote downloads
    fetcher: SubtitleFetcher,

    // @field: Stored translation metadata
    repository: Repository,

    // @field: Stored translation content
    store: ContentStore,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let translator =
            TranslationService::new(&config).context("Failed to create translation backend")?;
        let fetcher = SubtitleFetcher::new(&config.fetch).context("Failed to create fetcher")?;

        let db = DatabaseConnection::new(config.storage.resolve_database_path()?)?;
        let store = ContentStore::new(config.storage.resolve_storage_dir()?)?;

        Ok(Self::with_parts(
            config,
            translator,
            fetcher,
            Repository::new(db),
            store,
        ))
    }

    // @method: Assemble a controller from ready-made parts
    pub fn with_parts(
        config: Config,
        translator: TranslationService,
        fetcher: SubtitleFetcher,
        repository: Repository,
        store: ContentStore,
    ) -> Self {
        Self {
            config,
            translator,
            fetcher,
            repository,
            store,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // @returns: Requested target language or the configured one, validated
    fn target_or_default<'a>(&'a self, target_language: Option<&'a str>) -> Result<&'a str> {
        let target = target_language
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(self.config.target_language.as_str());
        validate_target_language(target)?;
        Ok(target)
    }

    // @returns: Requested source language or the configured one, validated
    fn source_or_default<'a>(&'a self, source_language: Option<&'a str>) -> Result<&'a str> {
        let source = source_language
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(self.config.source_language.as_str());
        validate_source_language(source)?;
        Ok(source)
    }

    /// Translate a remote subtitle, reusing a stored translation when one exists
    pub async fn translate_subtitle(
        &self,
        url: &str,
        format: CaptionFormat,
        target_language: Option<&str>,
        source_language: Option<&str>,
        referer: Option<&str>,
    ) -> Result<SubtitleWithContent> {
        let target = self.target_or_default(target_language)?;
        let source = self.source_or_default(source_language)?;
        let subtitle_id = Repository::fingerprint(url, target, format.as_str());

        if let Some(record) = self.repository.get_by_subtitle_id(&subtitle_id).await? {
            info!("Using stored translation #{} for {}", record.id, url);
            return self.load_stored(record).await;
        }

        let start_time = Instant::now();
        info!("Translating {} ({}) to {}", url, format, target);

        let raw = self.fetcher.fetch_text(url, referer).await?;
        let translated = self
            .translator
            .translate_document(&raw, format, target, source)
            .await?;
        let content = remove_font_tags(&translated);

        let (path, size) = self.store.save(&subtitle_id, &content).await?;
        let record = SubtitleRecord::new(
            subtitle_id.clone(),
            url.to_string(),
            target.to_string(),
            source.to_string(),
            format.as_str().to_string(),
            path.to_string_lossy().to_string(),
            size,
        );

        let record = match self.repository.create(&record).await {
            Ok(record) => record,
            Err(e) => {
                // Lost a race against an identical request
                match self.repository.get_by_subtitle_id(&subtitle_id).await? {
                    Some(existing) => existing,
                    None => return Err(e),
                }
            }
        };

        info!(
            "Stored translation #{} ({} bytes) in {:.2?}",
            record.id,
            record.file_size,
            start_time.elapsed()
        );

        Ok(SubtitleWithContent { record, content })
    }

    /// Load stored content, scrubbing font tags and path separators left by older runs
    async fn load_stored(&self, mut record: SubtitleRecord) -> Result<SubtitleWithContent> {
        let content = self.store.load(&record.file_path).await?;
        let cleaned = remove_font_tags(&content);

        if cleaned != content {
            debug!("Removing font tags from stored translation #{}", record.id);
            let size = self.store.overwrite(&record.file_path, &cleaned).await?;
            if let Some(updated) = self.repository.update_content(record.id, size).await? {
                record = updated;
            }
        }

        let normalized = normalize_path(&record.file_path);
        if normalized != record.file_path {
            self.repository.update_file_path(record.id, &normalized).await?;
            record.file_path = normalized;
        }

        Ok(SubtitleWithContent {
            record,
            content: cleaned,
        })
    }

    /// Translate free texts; blank entries come back unchanged
    pub async fn translate_texts(
        &self,
        texts: &[String],
        target_language: Option<&str>,
        source_language: Option<&str>,
    ) -> Result<Vec<String>> {
        let target = self.target_or_default(target_language)?;
        let source = self.source_or_default(source_language)?;

        Ok(self.translator.translate_texts(texts, target, source).await?)
    }

    /// List stored subtitles, newest first
    pub async fn list_subtitles(
        &self,
        page: i64,
        limit: i64,
        target_language: Option<&str>,
    ) -> Result<SubtitlePage> {
        let page = page.max(1);
        let limit = limit.clamp(1, MAX_PAGE_SIZE);

        let (items, total) = self
            .repository
            .list(page as u32, limit as u32, target_language)
            .await?;

        Ok(SubtitlePage {
            items,
            page,
            limit,
            total,
            total_pages: (total + limit - 1) / limit,
        })
    }

    async fn require(&self, id: i64) -> Result<SubtitleRecord> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("#{}", id)).into())
    }

    /// Get a stored subtitle with its content
    pub async fn get_subtitle(&self, id: i64) -> Result<SubtitleWithContent> {
        let record = self.require(id).await?;
        self.load_stored(record).await
    }

    /// Replace the content of a stored subtitle; font tags are dropped before saving
    pub async fn update_subtitle(&self, id: i64, content: &str) -> Result<SubtitleWithContent> {
        let record = self.require(id).await?;
        let content = remove_font_tags(content);
        let size = self.store.overwrite(&record.file_path, &content).await?;
        let record = self
            .repository
            .update_content(id, size)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("#{}", id)))?;

        info!("Updated stored translation #{} ({} bytes)", id, size);
        Ok(SubtitleWithContent { record, content })
    }

    /// Delete a stored subtitle, both its row and its file
    pub async fn delete_subtitle(&self, id: i64) -> Result<()> {
        let record = self.require(id).await?;
        self.store.remove(&record.file_path).await?;
        self.repository.delete(id).await?;
        info!("Deleted stored translation #{}", id);
        Ok(())
    }

    /// Translate a local caption file into `<stem>.<target>.vtt`.
    ///
    /// Returns `None` when the output exists and `force_overwrite` is off.
    pub async fn translate_file(
        &self,
        input_file: &Path,
        format: Option<CaptionFormat>,
        target_language: Option<&str>,
        source_language: Option<&str>,
        output_path: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<Option<PathBuf>> {
        let target = self.target_or_default(target_language)?;
        let source = self.source_or_default(source_language)?;

        let format = match format {
            Some(format) => format,
            None => CaptionFormat::from_path(input_file)
                .ok_or_else(|| anyhow!("Cannot tell the caption format of {:?}", input_file))?,
        };

        let output_path = output_path.unwrap_or_else(|| {
            let output_dir = input_file.parent().unwrap_or(Path::new("."));
            FileManager::generate_output_path(input_file, output_dir, target, "vtt")
        });

        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping {:?}, translation already exists (use -f to force overwrite)",
                input_file
            );
            return Ok(None);
        }

        let raw = FileManager::read_to_string(input_file)?;
        let translated = self
            .translator
            .translate_document(&raw, format, target, source)
            .await?;
        FileManager::write_to_file(&output_path, &remove_font_tags(&translated))?;

        info!("Wrote {:?}", output_path);
        Ok(Some(output_path))
    }

    /// Translate every caption file under a directory
    pub async fn translate_folder(
        &self,
        input_dir: &Path,
        target_language: Option<&str>,
        source_language: Option<&str>,
        force_overwrite: bool,
    ) -> Result<FolderSummary> {
        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let target = self.target_or_default(target_language)?;
        let source = self.source_or_default(source_language)?;
        let output_suffix = format!(".{}", target);

        // Previous outputs look like `<stem>.<target>.vtt`; never translate them again
        let files: Vec<PathBuf> = FileManager::find_caption_files(input_dir)?
            .into_iter()
            .filter(|path| {
                !path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().ends_with(&output_suffix))
                    .unwrap_or(false)
            })
            .collect();

        if files.is_empty() {
            return Err(anyhow!("No caption files found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(files.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(style.progress_chars("=> "));

        let mut summary = FolderSummary::default();
        for file in &files {
            let file_name = file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(file_name.clone());

            match self
                .translate_file(file, None, Some(target), Some(source), None, force_overwrite)
                .await
            {
                Ok(Some(_)) => summary.translated += 1,
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    summary.failed += 1;
                }
            }
            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("done");
        info!(
            "Folder processing completed: {} translated, {} skipped, {} errors",
            summary.translated, summary.skipped, summary.failed
        );

        Ok(summary)
    }
}
