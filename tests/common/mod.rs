/*!
 * Common test utilities for the subtrans test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use subtrans::app_config::{Config, FetchConfig};
use subtrans::app_controller::Controller;
use subtrans::database::{ContentStore, Repository};
use subtrans::fetch::SubtitleFetcher;
use subtrans::providers::mock::MockProvider;
use subtrans::translation::{ChunkLimits, TranslationService};

// Local HTTP stub used instead of real network endpoints
pub mod stub_server;

/// Route log output through env_logger once per test binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A small WebVTT document with a numbered cue, markup and a note
pub const SAMPLE_VTT: &str = "WEBVTT\n\n1\n00:00:01.000 --> 00:00:03.000\n<i>Good morning</i>\n\n12\n00:04.000 --> 00:06,500\nSee you\nlater\n\nNOTE end\n";

/// A small SRT document with comma timestamps
pub const SAMPLE_SRT: &str = "1\r\n00:00:01,000 --> 00:00:04,000\r\nThis is a test subtitle.\r\n\r\n2\r\n00:00:05,000 --> 00:00:09,000\r\n<font color=\"#ffff00\">It contains multiple entries.</font>\r\n";

/// A small ASS document with one dialogue record
pub const SAMPLE_ASS: &str = "[Script Info]\nTitle: test\n\n[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\nDialogue: 0,0:00:01.00,0:00:03.00,Default,,0,0,0,,Hello\\Nworld\n";

/// Translation service over a mock backend with default limits
pub fn mock_service(provider: MockProvider) -> TranslationService {
    TranslationService::with_provider(Arc::new(provider), ChunkLimits::default())
}

/// Translation service over a mock backend with custom limits
pub fn mock_service_with_limits(provider: MockProvider, limits: ChunkLimits) -> TranslationService {
    TranslationService::with_provider(Arc::new(provider), limits)
}

/// Controller over a mock backend, an in-memory database and a temporary content store
pub fn mock_controller(provider: MockProvider, storage_dir: &Path) -> Result<Controller> {
    let config = Config::default();
    let fetcher = SubtitleFetcher::new(&FetchConfig::default())?;

    Ok(Controller::with_parts(
        config,
        mock_service(provider),
        fetcher,
        Repository::new_in_memory()?,
        ContentStore::new(storage_dir)?,
    ))
}
