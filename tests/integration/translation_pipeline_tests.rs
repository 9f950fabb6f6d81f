/*!
 * End-to-end tests of document and text translation over mock backends
 */

use subtrans::captions::CaptionFormat;
use subtrans::errors::TranslationError;
use subtrans::providers::mock::{MockProvider, MockRequest};
use subtrans::translation::ChunkLimits;
use crate::common::{self, SAMPLE_ASS, SAMPLE_VTT};

#[tokio::test]
async fn test_translateTexts_withBlanks_shouldKeepLengthAndBlanks() {
    common::init_logging();
    let provider = MockProvider::working();
    let service = common::mock_service(provider.clone());

    let texts = vec![
        "Hello".to_string(),
        String::new(),
        "   ".to_string(),
        "World".to_string(),
    ];
    let translated = service.translate_texts(&texts, "en", "auto").await.unwrap();

    assert_eq!(translated, vec!["HELLO", "", "   ", "WORLD"]);
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn test_translateTexts_withOnlyBlanks_shouldNotCallBackend() {
    let provider = MockProvider::failing();
    let service = common::mock_service(provider.clone());

    let texts = vec![String::new(), " \n".to_string()];
    let translated = service.translate_texts(&texts, "en", "auto").await.unwrap();

    assert_eq!(translated, texts);
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_translateTexts_withFailingBackend_shouldReportNothingTranslated() {
    let service = common::mock_service(MockProvider::failing());

    let texts = vec!["a".to_string(), "b".to_string()];
    let result = service.translate_texts(&texts, "en", "auto").await;

    assert!(matches!(
        result,
        Err(TranslationError::NothingTranslated { attempted: 2 })
    ));
}

#[tokio::test]
async fn test_translateTexts_withEmptyBackend_shouldReportNothingTranslated() {
    let service = common::mock_service(MockProvider::empty());

    let result = service.translate_texts(&["a".to_string()], "en", "auto").await;

    assert!(matches!(
        result,
        Err(TranslationError::NothingTranslated { attempted: 1 })
    ));
}

#[tokio::test]
async fn test_translateDocument_withVtt_shouldPreserveStructure() {
    let service = common::mock_service(MockProvider::working());

    let out = service
        .translate_document(SAMPLE_VTT, CaptionFormat::Vtt, "en", "auto")
        .await
        .unwrap();

    assert_eq!(
        out,
        "WEBVTT\n\n1\n00:00:01.000 --> 00:00:03.000\n<i>GOOD MORNING</i>\n\n12\n00:00:04.000 --> 00:00:06.500\nSEE YOU\nLATER\n\nNOTE end\n"
    );
}

#[tokio::test]
async fn test_translateDocument_withAss_shouldEmitSingleLineWebVtt() {
    let service = common::mock_service(MockProvider::working());

    let out = service
        .translate_document(SAMPLE_ASS, CaptionFormat::Ass, "en", "auto")
        .await
        .unwrap();

    assert_eq!(out, "WEBVTT\n\n1\n00:00:01.000 --> 00:00:03.000\nHELLO WORLD\n\n");
}

#[tokio::test]
async fn test_translateDocument_withRejectedBatches_shouldTranslateEveryLine() {
    let provider = MockProvider::rejecting_batches();
    let service = common::mock_service(provider.clone());

    let out = service
        .translate_document(SAMPLE_VTT, CaptionFormat::Vtt, "en", "auto")
        .await
        .unwrap();

    assert!(out.contains("<i>GOOD MORNING</i>"));
    assert!(out.contains("\nSEE YOU\nLATER\n"));
    assert!(provider.requests().iter().any(|r| r.is_multiplexed()));
}

#[tokio::test]
async fn test_translateDocument_withDroppedSeparators_shouldTranslateEveryLine() {
    let service = common::mock_service(MockProvider::dropping_separators());

    let out = service
        .translate_document(SAMPLE_VTT, CaptionFormat::Vtt, "en", "auto")
        .await
        .unwrap();

    assert!(out.contains("<i>GOOD MORNING</i>"));
    assert!(out.contains("\nSEE YOU\nLATER\n"));
}

#[tokio::test]
async fn test_translateDocument_withFontTagsInAnswer_shouldStripThem() {
    fn with_fonts(request: &MockRequest) -> String {
        format!("<font color=\"#ff0000\">{}</font>", request.text)
    }
    let service = common::mock_service(MockProvider::working().with_custom_response(with_fonts));

    let out = service
        .translate_document(SAMPLE_VTT, CaptionFormat::Vtt, "en", "auto")
        .await
        .unwrap();

    assert!(!out.to_lowercase().contains("font"));
    assert!(out.contains("<i>Good morning</i>"));
}

#[tokio::test]
async fn test_translateDocument_toIndonesian_shouldUseInformalRegister() {
    fn formal(request: &MockRequest) -> String {
        request
            .text
            .replace("I don't know", "saya tidak tahu")
            .replace("Thank you", "Terima kasih")
    }
    let service = common::mock_service(MockProvider::working().with_custom_response(formal));
    let raw = "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nI don't know\n\n00:00:03.000 --> 00:00:04.000\nThank you\n";

    let out = service
        .translate_document(raw, CaptionFormat::Vtt, "id", "en")
        .await
        .unwrap();

    assert!(out.contains("\naku nggak tau\n"));
    assert!(out.contains("\nMakasih\n"));
}

#[tokio::test]
async fn test_translateDocument_withManyLines_shouldRespectChunkLimits() {
    let provider = MockProvider::working();
    let limits = ChunkLimits {
        max_items: 80,
        ..ChunkLimits::default()
    };
    let service = common::mock_service_with_limits(provider.clone(), limits);

    let mut raw = String::from("WEBVTT\n\n");
    for i in 0..200 {
        raw.push_str(&format!(
            "00:00:{:02}.000 --> 00:00:{:02}.500\nline number {}\n\n",
            i % 60,
            i % 60,
            i
        ));
    }

    let out = service
        .translate_document(&raw, CaptionFormat::Vtt, "en", "auto")
        .await
        .unwrap();

    assert_eq!(provider.request_count(), 3);
    assert!(out.contains("\nLINE NUMBER 0\n"));
    assert!(out.contains("\nLINE NUMBER 199\n"));
    assert!(!out.contains("line number"));
}

#[tokio::test]
async fn test_translateDocument_withoutText_shouldNotCallBackend() {
    let provider = MockProvider::failing();
    let service = common::mock_service(provider.clone());

    let out = service
        .translate_document("WEBVTT\n\n", CaptionFormat::Vtt, "en", "auto")
        .await
        .unwrap();

    assert_eq!(out, "WEBVTT\n\n");
    assert_eq!(provider.request_count(), 0);
}
