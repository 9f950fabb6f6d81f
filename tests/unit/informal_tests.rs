/*!
 * Tests for the informal Indonesian rewrite
 */

use std::sync::Arc;

use subtrans::providers::mock::{MockProvider, MockRequest};
use subtrans::providers::Provider;
use subtrans::translation::informal::{apply_for_locale, INFORMAL_LOCALE};
use subtrans::translation::{formalize_to_informal, InformalStyle};

#[test]
fn test_formalizeToInformal_withSentence_shouldRewriteEveryRule() {
    assert_eq!(
        formalize_to_informal("terima kasih, saya akan membantu Anda"),
        "makasih, aku mau bantu kamu"
    );
}

#[test]
fn test_formalizeToInformal_withPrefixedWord_shouldNotMatchInside() {
    // `silakan` must not fire inside `dipersilakan`
    assert_eq!(formalize_to_informal("dipersilakan masuk"), "silakan masuk");
    assert_eq!(formalize_to_informal("Andai saja"), "Andai saja");
}

#[test]
fn test_formalizeToInformal_withDroppedWord_shouldNotLeaveLeadingSpace() {
    assert_eq!(formalize_to_informal("apakah sudah makan?"), "udah makan?");
}

#[test]
fn test_formalizeToInformal_withInformalText_shouldLeaveItAlone() {
    let informal = "aku nggak tau kamu bilang apa";
    assert_eq!(formalize_to_informal(informal), informal);
}

#[test]
fn test_formalizeToInformal_withEmptyText_shouldReturnEmpty() {
    assert_eq!(formalize_to_informal(""), "");
}

#[test]
fn test_formalizeToInformal_isCaseSensitive() {
    assert_eq!(formalize_to_informal("SAYA TIDAK"), "SAYA TIDAK");
}

#[test]
fn test_applyForLocale_shouldOnlyRewriteInformalLocale() {
    assert_eq!(INFORMAL_LOCALE, "id");
    assert_eq!(apply_for_locale("id", "tidak".to_string()), "nggak");
    assert_eq!(apply_for_locale("ms", "tidak".to_string()), "tidak");
}

#[tokio::test]
async fn test_informalStyle_shouldWrapBackendResults() {
    fn formal(_: &MockRequest) -> String {
        "Saya tidak mengerti".to_string()
    }
    let inner = MockProvider::working().with_custom_response(formal);
    let styled = InformalStyle::new(Arc::new(inner));

    assert_eq!(styled.translate("x", "id", "en").await.unwrap(), "Aku nggak ngerti");
    assert_eq!(styled.translate("x", "en", "id").await.unwrap(), "Saya tidak mengerti");
    assert_eq!(styled.name(), "mock");
}

#[tokio::test]
async fn test_informalStyle_shouldPassErrorsThrough() {
    let styled = InformalStyle::new(Arc::new(MockProvider::failing()));
    assert!(styled.translate("x", "id", "en").await.is_err());
}

#[test]
fn test_informalStyle_testConnection_shouldDelegateToBackend() {
    let styled = InformalStyle::new(Arc::new(MockProvider::working()));
    tokio_test::assert_ok!(tokio_test::block_on(styled.test_connection()));

    let styled = InformalStyle::new(Arc::new(MockProvider::failing()));
    tokio_test::assert_err!(tokio_test::block_on(styled.test_connection()));
}
