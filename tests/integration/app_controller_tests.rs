/*!
 * Controller tests: stored translations, caching and local files
 */

use anyhow::Result;

use subtrans::app_controller::FolderSummary;
use subtrans::captions::CaptionFormat;
use subtrans::errors::AppError;
use subtrans::providers::mock::MockProvider;
use crate::common::stub_server::StubServer;
use crate::common::{self, SAMPLE_ASS, SAMPLE_VTT};

fn is_not_found(error: &anyhow::Error) -> bool {
    matches!(error.downcast_ref::<AppError>(), Some(AppError::NotFound(_)))
}

#[tokio::test]
async fn test_translateSubtitle_shouldStoreAndThenReuse() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let server = StubServer::start(200, SAMPLE_VTT).await;
    let provider = MockProvider::working();
    let controller = common::mock_controller(provider.clone(), temp_dir.path())?;
    let url = server.url("/ep1.vtt");

    let first = controller
        .translate_subtitle(&url, CaptionFormat::Vtt, Some("en"), None, None)
        .await?;
    assert!(first.record.id > 0);
    assert_eq!(first.record.target_lang, "en");
    assert_eq!(first.record.source_lang, "auto");
    assert_eq!(first.record.format, "vtt");
    assert_eq!(first.record.file_size, first.content.len() as i64);
    assert!(first.content.contains("<i>GOOD MORNING</i>"));
    assert!(std::path::Path::new(&first.record.file_path).exists());

    let second = controller
        .translate_subtitle(&url, CaptionFormat::Vtt, Some("en"), None, None)
        .await?;
    assert_eq!(second.record.id, first.record.id);
    assert_eq!(second.content, first.content);
    assert_eq!(server.requests().len(), 1);
    assert_eq!(provider.request_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_translateSubtitle_withOtherTarget_shouldStoreSeparately() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let server = StubServer::start(200, SAMPLE_VTT).await;
    let controller = common::mock_controller(MockProvider::working(), temp_dir.path())?;
    let url = server.url("/ep1.vtt");

    let english = controller
        .translate_subtitle(&url, CaptionFormat::Vtt, Some("en"), None, None)
        .await?;
    let default_target = controller
        .translate_subtitle(&url, CaptionFormat::Vtt, None, None, None)
        .await?;

    assert_ne!(english.record.subtitle_id, default_target.record.subtitle_id);
    assert_eq!(default_target.record.target_lang, "id");
    Ok(())
}

#[tokio::test]
async fn test_translateSubtitle_withFontTagsInStoredFile_shouldCleanThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let server = StubServer::start(200, SAMPLE_VTT).await;
    let controller = common::mock_controller(MockProvider::working(), temp_dir.path())?;
    let url = server.url("/ep1.vtt");

    let stored = controller
        .translate_subtitle(&url, CaptionFormat::Vtt, Some("en"), None, None)
        .await?;
    let dirty = stored
        .content
        .replace("GOOD MORNING", "<font color=\"#fff\">GOOD MORNING</font>");
    std::fs::write(&stored.record.file_path, &dirty)?;

    let reused = controller
        .translate_subtitle(&url, CaptionFormat::Vtt, Some("en"), None, None)
        .await?;
    assert_eq!(reused.content, stored.content);
    assert_eq!(reused.record.file_size, stored.content.len() as i64);

    let on_disk = controller.get_subtitle(stored.record.id).await?;
    assert!(!on_disk.content.contains("<font"));
    Ok(())
}

#[tokio::test]
async fn test_translateSubtitle_withFetchFailure_shouldNotStoreAnything() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let server = StubServer::start(404, "missing").await;
    let controller = common::mock_controller(MockProvider::working(), temp_dir.path())?;

    let result = controller
        .translate_subtitle(&server.url("/gone.vtt"), CaptionFormat::Vtt, None, None, None)
        .await;
    assert!(result.is_err());

    let page = controller.list_subtitles(1, 20, None).await?;
    assert_eq!(page.total, 0);
    Ok(())
}

#[tokio::test]
async fn test_updateSubtitle_withFontTags_shouldNeverReadThemBack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let server = StubServer::start(200, SAMPLE_VTT).await;
    let controller = common::mock_controller(MockProvider::working(), temp_dir.path())?;

    let stored = controller
        .translate_subtitle(&server.url("/ep1.vtt"), CaptionFormat::Vtt, Some("en"), None, None)
        .await?;
    let id = stored.record.id;

    let updated = controller
        .update_subtitle(id, "WEBVTT\n\n<font color=\"red\">hi</font>\n")
        .await?;
    assert_eq!(updated.content, "WEBVTT\n\nhi\n");
    assert_eq!(updated.record.file_size, 11);

    let read_back = controller.get_subtitle(id).await?;
    assert_eq!(read_back.content, "WEBVTT\n\nhi\n");
    assert_eq!(std::fs::read_to_string(&stored.record.file_path)?, "WEBVTT\n\nhi\n");
    Ok(())
}

#[tokio::test]
async fn test_getSubtitle_withFontTagsOnDisk_shouldCleanAndPersist() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let server = StubServer::start(200, SAMPLE_VTT).await;
    let controller = common::mock_controller(MockProvider::working(), temp_dir.path())?;

    let stored = controller
        .translate_subtitle(&server.url("/ep1.vtt"), CaptionFormat::Vtt, Some("en"), None, None)
        .await?;
    std::fs::write(&stored.record.file_path, "WEBVTT\n\n<font face=\"Arial\">hi</font>\n")?;

    let read_back = controller.get_subtitle(stored.record.id).await?;
    assert_eq!(read_back.content, "WEBVTT\n\nhi\n");
    assert_eq!(read_back.record.file_size, 11);
    assert_eq!(std::fs::read_to_string(&stored.record.file_path)?, "WEBVTT\n\nhi\n");
    Ok(())
}

#[tokio::test]
async fn test_translate_withUnknownLanguageOverride_shouldFailBeforeFetching() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let server = StubServer::start(200, SAMPLE_VTT).await;
    let provider = MockProvider::working();
    let controller = common::mock_controller(provider.clone(), temp_dir.path())?;

    assert!(controller
        .translate_subtitle(&server.url("/ep1.vtt"), CaptionFormat::Vtt, Some("xx"), None, None)
        .await
        .is_err());
    assert!(controller
        .translate_subtitle(&server.url("/ep1.vtt"), CaptionFormat::Vtt, Some("auto"), None, None)
        .await
        .is_err());
    assert!(controller
        .translate_texts(&["hi".to_string()], Some("en"), Some("xyz"))
        .await
        .is_err());
    assert!(controller
        .translate_folder(temp_dir.path(), Some("xx"), None, false)
        .await
        .is_err());

    assert!(server.requests().is_empty());
    assert_eq!(provider.request_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_listSubtitles_shouldPaginateNewestFirst() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let server = StubServer::start(200, SAMPLE_VTT).await;
    let controller = common::mock_controller(MockProvider::working(), temp_dir.path())?;

    for name in ["a", "b", "c"] {
        controller
            .translate_subtitle(&server.url(&format!("/{}.vtt", name)), CaptionFormat::Vtt, Some("en"), None, None)
            .await?;
    }

    let page = controller.list_subtitles(1, 2, None).await?;
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 3);
    assert_eq!(page.total_pages, 2);
    assert!(page.items[0].url.ends_with("/c.vtt"));

    let last = controller.list_subtitles(2, 2, None).await?;
    assert_eq!(last.items.len(), 1);
    assert!(last.items[0].url.ends_with("/a.vtt"));

    let clamped = controller.list_subtitles(0, 0, None).await?;
    assert_eq!(clamped.page, 1);
    assert_eq!(clamped.limit, 1);
    assert_eq!(clamped.total_pages, 3);

    let clamped = controller.list_subtitles(1, 500, None).await?;
    assert_eq!(clamped.limit, 100);
    assert_eq!(clamped.total_pages, 1);

    let filtered = controller.list_subtitles(1, 20, Some("fr")).await?;
    assert_eq!(filtered.total, 0);
    assert_eq!(filtered.total_pages, 0);
    Ok(())
}

#[tokio::test]
async fn test_getUpdateDelete_shouldManageStoredSubtitle() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let server = StubServer::start(200, SAMPLE_VTT).await;
    let controller = common::mock_controller(MockProvider::working(), temp_dir.path())?;

    let stored = controller
        .translate_subtitle(&server.url("/ep1.vtt"), CaptionFormat::Vtt, Some("en"), None, None)
        .await?;
    let id = stored.record.id;

    let updated = controller.update_subtitle(id, "WEBVTT\n\nedited\n").await?;
    assert_eq!(updated.record.file_size, 15);
    assert_eq!(controller.get_subtitle(id).await?.content, "WEBVTT\n\nedited\n");

    controller.delete_subtitle(id).await?;
    assert!(!std::path::Path::new(&stored.record.file_path).exists());

    let missing = controller.get_subtitle(id).await.unwrap_err();
    assert!(is_not_found(&missing));
    let missing = controller.delete_subtitle(id).await.unwrap_err();
    assert!(is_not_found(&missing));
    let missing = controller.update_subtitle(id, "x").await.unwrap_err();
    assert!(is_not_found(&missing));
    Ok(())
}

#[tokio::test]
async fn test_translateTexts_shouldUseConfiguredDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let provider = MockProvider::working();
    let controller = common::mock_controller(provider.clone(), temp_dir.path())?;

    let translated = controller
        .translate_texts(&["hi".to_string(), String::new()], None, Some(""))
        .await?;

    assert_eq!(translated, vec!["HI", ""]);
    let requests = provider.requests();
    assert_eq!(requests[0].target_language, "id");
    assert_eq!(requests[0].source_language, "auto");
    Ok(())
}

#[tokio::test]
async fn test_translateFile_shouldWriteNextToInputAndRespectForce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "show.ass", SAMPLE_ASS)?;
    let controller = common::mock_controller(MockProvider::working(), &temp_dir.path().join("store"))?;

    let output = controller
        .translate_file(&input, None, Some("en"), None, None, false)
        .await?
        .expect("translation should be written");
    assert_eq!(output, temp_dir.path().join("show.en.vtt"));
    assert_eq!(
        std::fs::read_to_string(&output)?,
        "WEBVTT\n\n1\n00:00:01.000 --> 00:00:03.000\nHELLO WORLD\n\n"
    );

    let skipped = controller
        .translate_file(&input, None, Some("en"), None, None, false)
        .await?;
    assert!(skipped.is_none());

    let forced = controller
        .translate_file(&input, None, Some("en"), None, None, true)
        .await?;
    assert_eq!(forced, Some(output));
    Ok(())
}

#[tokio::test]
async fn test_translateFile_withUnknownExtension_shouldNeedExplicitFormat() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "captions.txt", SAMPLE_VTT)?;
    let controller = common::mock_controller(MockProvider::working(), &temp_dir.path().join("store"))?;

    assert!(controller
        .translate_file(&input, None, Some("en"), None, None, false)
        .await
        .is_err());

    let output = temp_dir.path().join("out/captions.vtt");
    let written = controller
        .translate_file(&input, Some(CaptionFormat::Vtt), Some("en"), None, Some(output.clone()), false)
        .await?;
    assert_eq!(written, Some(output.clone()));
    assert!(std::fs::read_to_string(&output)?.contains("<i>GOOD MORNING</i>"));
    Ok(())
}

#[tokio::test]
async fn test_translateFolder_shouldSkipOwnOutputsOnRerun() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("input");
    common::create_test_file(&input_dir, "a.vtt", SAMPLE_VTT)?;
    common::create_test_file(&input_dir, "season/b.ass", SAMPLE_ASS)?;
    common::create_test_file(&input_dir, "readme.txt", "not a caption")?;
    let controller = common::mock_controller(MockProvider::working(), &temp_dir.path().join("store"))?;

    let summary = controller.translate_folder(&input_dir, None, None, false).await?;
    assert_eq!(
        summary,
        FolderSummary {
            translated: 2,
            skipped: 0,
            failed: 0
        }
    );
    assert!(input_dir.join("a.id.vtt").exists());
    assert!(input_dir.join("season/b.id.vtt").exists());

    let rerun = controller.translate_folder(&input_dir, None, None, false).await?;
    assert_eq!(rerun.skipped, 2);
    assert_eq!(rerun.translated, 0);
    Ok(())
}

#[tokio::test]
async fn test_translateFolder_withFailingBackend_shouldCountFailures() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "a.vtt", SAMPLE_VTT)?;
    let controller = common::mock_controller(MockProvider::failing(), &temp_dir.path().join("store"))?;

    let summary = controller.translate_folder(temp_dir.path(), Some("en"), None, false).await?;
    assert_eq!(summary.failed, 1);
    assert!(!temp_dir.path().join("a.en.vtt").exists());
    Ok(())
}

#[tokio::test]
async fn test_translateFolder_withoutCaptions_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "notes.md", "")?;
    let controller = common::mock_controller(MockProvider::working(), &temp_dir.path().join("store"))?;

    assert!(controller.translate_folder(temp_dir.path(), None, None, false).await.is_err());
    assert!(controller
        .translate_folder(&temp_dir.path().join("missing"), None, None, false)
        .await
        .is_err());
    Ok(())
}
