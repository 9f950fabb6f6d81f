/*!
 * Batch translation processing.
 *
 * Texts are grouped into chunks, and every chunk is sent to the backend as a
 * single multiplexed request: the texts joined by a random separator token.
 * When a multiplexed request fails, or its answer cannot be split back into
 * the right number of parts, the chunk is halved and retried. A lone text
 * that still fails is translated on its own, split into segments if it is
 * too long for one request.
 */

use futures::future::{join_all, BoxFuture, FutureExt};
use log::{debug, error, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::app_config::BatchConfig;
use crate::captions::markup::collapse_horizontal_whitespace;
use crate::errors::{ProviderError, TranslationError};
use crate::providers::Provider;

/// Fixed text on both sides of the random part of a separator token
pub const SEPARATOR_TAG: &str = "SUBSEP";

static SEPARATOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"SUBSEP[0-9A-F]{16}SUBSEP").unwrap());

/// Whether the text contains a separator token
pub fn is_multiplexed(text: &str) -> bool {
    SEPARATOR_REGEX.is_match(text)
}

/// Remove every separator token from a text
pub fn strip_separators(text: &str) -> String {
    SEPARATOR_REGEX.replace_all(text, "").into_owned()
}

/// A text tagged with its position in the caller's list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedText {
    pub index: usize,
    pub text: String,
}

impl IndexedText {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Size limits for chunks and single requests, in items and code points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLimits {
    pub max_items: usize,
    pub max_chars: usize,
    pub max_single_text_chars: usize,
}

impl Default for ChunkLimits {
    fn default() -> Self {
        Self {
            max_items: 80,
            max_chars: 1800,
            max_single_text_chars: 1400,
        }
    }
}

impl From<&BatchConfig> for ChunkLimits {
    fn from(config: &BatchConfig) -> Self {
        Self {
            max_items: config.chunk_size,
            max_chars: config.max_chunk_chars,
            max_single_text_chars: config.max_single_text_chars,
        }
    }
}

/// Opaque token joining the texts of one multiplexed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparatorToken(String);

impl SeparatorToken {
    /// Fresh token with 64 random bits
    pub fn generate() -> Self {
        Self(format!(
            "{}{:016X}{}",
            SEPARATOR_TAG,
            rand::random::<u64>(),
            SEPARATOR_TAG
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join texts with the token surrounded by single spaces
    pub fn join<S: AsRef<str>>(&self, texts: &[S]) -> String {
        let separator = format!(" {} ", self.0);
        texts
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(&separator)
    }

    /// Split a backend answer on the token
    pub fn split<'a>(&self, answer: &'a str) -> Vec<&'a str> {
        answer.split(self.0.as_str()).collect()
    }
}

/// Group texts into chunks, greedily and in order.
///
/// The current chunk is flushed before an item would push it past
/// `max_items` items or `max_chars` code points. A chunk is never empty,
/// and an item bigger than `max_chars` gets a chunk of its own.
pub fn build_chunks(items: Vec<IndexedText>, limits: &ChunkLimits) -> Vec<Vec<IndexedText>> {
    let mut chunks = Vec::new();
    let mut current: Vec<IndexedText> = Vec::with_capacity(limits.max_items);
    let mut current_chars = 0;

    for item in items {
        let item_chars = item.char_count();

        let should_flush = !current.is_empty()
            && (current.len() >= limits.max_items || current_chars + item_chars > limits.max_chars);
        if should_flush {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }

        current_chars += item_chars;
        current.push(item);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Split a long text into segments of at most `max_len` code points.
///
/// Each cut goes after the last whitespace found in the back half of the
/// window, or right at the window end when there is none. Segments are
/// trimmed and empty ones dropped.
pub fn split_text_by_length(text: &str, max_len: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if max_len == 0 || chars.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut segments = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = start + max_len;
        if end >= chars.len() {
            push_segment(&mut segments, &chars[start..]);
            break;
        }

        let mut split_at = end;
        let mut i = end;
        while i > start + max_len / 2 {
            if chars[i - 1].is_whitespace() {
                split_at = i;
                break;
            }
            i -= 1;
        }

        push_segment(&mut segments, &chars[start..split_at]);
        start = split_at;
    }

    if segments.is_empty() {
        vec![text.to_string()]
    } else {
        segments
    }
}

fn push_segment(segments: &mut Vec<String>, chars: &[char]) {
    let segment: String = chars.iter().collect();
    let segment = segment.trim();
    if !segment.is_empty() {
        segments.push(segment.to_string());
    }
}

/// Outcome of multiplexed dispatch for one unit of work
#[derive(Debug, Default)]
struct Dispatch {
    /// Positions translated by a multiplexed request
    translated: Vec<(usize, String)>,
    /// Lone texts whose multiplexed request failed
    pending: Vec<IndexedText>,
}

impl Dispatch {
    fn merge(&mut self, other: Dispatch) {
        self.translated.extend(other.translated);
        self.pending.extend(other.pending);
    }
}

/// Batch translator for chunked, concurrent translation with fallback
#[derive(Debug, Clone)]
pub struct BatchTranslator {
    /// Backend used for every request
    provider: Arc<dyn Provider>,

    /// Chunk and request size limits
    limits: ChunkLimits,
}

impl BatchTranslator {
    /// Create a new batch translator
    pub fn new(provider: Arc<dyn Provider>, limits: ChunkLimits) -> Self {
        Self { provider, limits }
    }

    pub fn limits(&self) -> &ChunkLimits {
        &self.limits
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Translate non-blank texts, one spawned task per chunk.
    ///
    /// Returns translations keyed by `IndexedText::index`. Positions that
    /// could not be translated are absent.
    pub async fn translate(
        &self,
        items: Vec<IndexedText>,
        target_language: &str,
        source_language: &str,
    ) -> BTreeMap<usize, String> {
        let chunks = build_chunks(items, &self.limits);
        debug!("Dispatching {} chunk(s)", chunks.len());

        let handles: Vec<_> = chunks
            .into_iter()
            .map(|chunk| {
                let translator = self.clone();
                let target_language = target_language.to_string();
                let source_language = source_language.to_string();
                tokio::spawn(async move {
                    translator
                        .process_chunk(chunk, &target_language, &source_language)
                        .await
                })
            })
            .collect();

        let mut results = BTreeMap::new();
        for (chunk_index, joined) in join_all(handles).await.into_iter().enumerate() {
            match joined {
                Ok(pairs) => results.extend(pairs),
                Err(e) => error!("Chunk {} task failed: {}", chunk_index + 1, e),
            }
        }

        results
    }

    /// Translate one chunk: multiplexed first, halving on failure, then
    /// every remaining lone text concurrently on its own.
    pub async fn process_chunk(
        &self,
        chunk: Vec<IndexedText>,
        target_language: &str,
        source_language: &str,
    ) -> Vec<(usize, String)> {
        let Dispatch {
            mut translated,
            pending,
        } = self
            .dispatch_multiplexed(chunk, target_language, source_language)
            .await;

        if !pending.is_empty() {
            warn!("Translating {} line(s) individually", pending.len());
            let singles = join_all(
                pending
                    .iter()
                    .map(|item| self.translate_single(item, target_language, source_language)),
            )
            .await;
            translated.extend(singles.into_iter().flatten());
        }

        translated
    }

    fn dispatch_multiplexed<'a>(
        &'a self,
        chunk: Vec<IndexedText>,
        target_language: &'a str,
        source_language: &'a str,
    ) -> BoxFuture<'a, Dispatch> {
        async move {
            match self
                .try_multiplexed(&chunk, target_language, source_language)
                .await
            {
                Ok(translated) => Dispatch {
                    translated,
                    pending: Vec::new(),
                },
                Err(e) if chunk.len() > 1 => {
                    warn!(
                        "Batch translation failed for chunk of {} items: {}",
                        chunk.len(),
                        e
                    );
                    let mut left = chunk;
                    let right = left.split_off(left.len() / 2);

                    let mut dispatch = self
                        .dispatch_multiplexed(left, target_language, source_language)
                        .await;
                    dispatch.merge(
                        self.dispatch_multiplexed(right, target_language, source_language)
                            .await,
                    );
                    dispatch
                }
                Err(e) => {
                    debug!("Batch translation failed for a single line: {}", e);
                    Dispatch {
                        translated: Vec::new(),
                        pending: chunk,
                    }
                }
            }
        }
        .boxed()
    }

    async fn try_multiplexed(
        &self,
        chunk: &[IndexedText],
        target_language: &str,
        source_language: &str,
    ) -> Result<Vec<(usize, String)>, TranslationError> {
        let token = SeparatorToken::generate();
        let texts: Vec<&str> = chunk.iter().map(|item| item.text.as_str()).collect();
        let joined = token.join(&texts);

        let answer = self
            .provider
            .translate(&joined, target_language, source_language)
            .await?;

        let parts = token.split(&answer);
        if parts.len() != chunk.len() {
            debug!(
                "Batch split mismatch (got {} parts for {} lines)",
                parts.len(),
                chunk.len()
            );
            return Err(TranslationError::SplitMismatch {
                expected: chunk.len(),
                actual: parts.len(),
            });
        }

        Ok(chunk
            .iter()
            .zip(parts)
            .map(|(item, part)| {
                (
                    item.index,
                    collapse_horizontal_whitespace(part).trim().to_string(),
                )
            })
            .collect())
    }

    async fn translate_single(
        &self,
        item: &IndexedText,
        target_language: &str,
        source_language: &str,
    ) -> Option<(usize, String)> {
        match self
            .translate_long_text(&item.text, target_language, source_language)
            .await
        {
            Ok(translated) => Some((item.index, translated.trim().to_string())),
            Err(e) => {
                warn!("Individual translation failed for line {}: {}", item.index, e);
                None
            }
        }
    }

    /// Translate one text, in sequential segments when it is too long
    pub async fn translate_long_text(
        &self,
        text: &str,
        target_language: &str,
        source_language: &str,
    ) -> Result<String, ProviderError> {
        if text.chars().count() <= self.limits.max_single_text_chars {
            return self
                .provider
                .translate(text, target_language, source_language)
                .await;
        }

        let segments = split_text_by_length(text, self.limits.max_single_text_chars);
        let mut translated = Vec::with_capacity(segments.len());
        for segment in &segments {
            translated.push(
                self.provider
                    .translate(segment, target_language, source_language)
                    .await?,
            );
        }

        Ok(translated.join(" "))
    }
}
