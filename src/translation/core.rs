/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct, which turns a
 * list of texts or a whole caption document into its translation using the
 * batch translator.
 */

use log::info;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::captions::{CaptionDocument, CaptionFormat};
use crate::errors::{ProviderError, TranslationError};
use crate::providers::google::GoogleTranslate;
use crate::providers::Provider;

use super::batch::{BatchTranslator, ChunkLimits, IndexedText};
use super::informal::InformalStyle;

/// Translation service for texts and caption documents
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Chunking dispatcher over the styled backend
    batch: BatchTranslator,
}

impl TranslationService {
    /// Create a service talking to the configured backend
    pub fn new(config: &Config) -> Result<Self, ProviderError> {
        let provider = GoogleTranslate::new(&config.backend)?;
        Ok(Self::with_provider(
            Arc::new(provider),
            ChunkLimits::from(&config.batching),
        ))
    }

    /// Create a service over any backend; results for the informal locale
    /// are rewritten on the way out of the backend.
    pub fn with_provider(provider: Arc<dyn Provider>, limits: ChunkLimits) -> Self {
        let styled: Arc<dyn Provider> = Arc::new(InformalStyle::new(provider));
        Self {
            batch: BatchTranslator::new(styled, limits),
        }
    }

    /// Test the connection to the backend
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        self.batch.provider().test_connection().await
    }

    /// Translate a list of texts.
    ///
    /// The result has the same length as `texts`. Blank texts are never sent
    /// and come back unchanged, as do texts whose translation failed.
    pub async fn translate_texts(
        &self,
        texts: &[String],
        target_language: &str,
        source_language: &str,
    ) -> Result<Vec<String>, TranslationError> {
        let translations = self
            .translate_positions(texts, target_language, source_language)
            .await?;

        Ok(texts
            .iter()
            .enumerate()
            .map(|(i, text)| translations.get(&i).cloned().unwrap_or_else(|| text.clone()))
            .collect())
    }

    /// Parse, translate and reassemble a caption document as WebVTT
    pub async fn translate_document(
        &self,
        raw: &str,
        format: CaptionFormat,
        target_language: &str,
        source_language: &str,
    ) -> Result<String, TranslationError> {
        let document = CaptionDocument::parse(raw, format);
        let texts = document.texts();
        info!(
            "Translating {} {} caption line(s) to {}",
            texts.len(),
            format,
            target_language
        );

        let translations = self
            .translate_positions(&texts, target_language, source_language)
            .await?;

        Ok(document.render(&translations))
    }

    /// Translate the non-blank texts, keyed by position.
    ///
    /// Fails only when something was submitted and nothing came back.
    async fn translate_positions(
        &self,
        texts: &[String],
        target_language: &str,
        source_language: &str,
    ) -> Result<BTreeMap<usize, String>, TranslationError> {
        let items: Vec<IndexedText> = texts
            .iter()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(i, text)| IndexedText::new(i, text.clone()))
            .collect();

        if items.is_empty() {
            return Ok(BTreeMap::new());
        }

        let attempted = items.len();
        let start_time = Instant::now();
        let translations = self
            .batch
            .translate(items, target_language, source_language)
            .await;

        info!(
            "Translated {}/{} line(s) in {:.2?}",
            translations.len(),
            attempted,
            start_time.elapsed()
        );

        if translations.is_empty() {
            return Err(TranslationError::NothingTranslated { attempted });
        }

        Ok(translations)
    }
}
