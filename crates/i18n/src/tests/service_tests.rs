use super::*;

use std::sync::Mutex;

use serde_json::json;

use crate::loader::StaticLoader;

fn service() -> TranslationService {
    let loader = StaticLoader::new()
        .with(
            LangCode::En,
            json!({
                "common": { "save": "Save", "cancel": "Cancel" },
                "greeting": "Hello {{name}}",
                "only_en": "English only"
            }),
        )
        .with(
            LangCode::Vi,
            json!({
                "common": { "save": "Lưu", "cancel": "Hủy" },
                "greeting": "Xin chào {{name}}"
            }),
        );
    TranslationService::new(Arc::new(loader))
}

#[tokio::test]
async fn init_uses_detected_language_with_english_fallback() {
    let translations = service();

    let lang = translations.init_language(Some("vi_VN.UTF-8")).await.expect("init");

    assert_eq!(lang, LangCode::Vi);
    assert_eq!(translations.default_language(), LangCode::En);
    assert_eq!(translations.instant("common.save"), "Lưu");
    assert_eq!(translations.instant("only_en"), "English only");
}

#[tokio::test]
async fn init_without_usable_detection_stays_on_default() {
    let translations = service();

    let lang = translations.init_language(Some("ja-JP")).await.expect("init");

    assert_eq!(lang, LangCode::En);
    assert_eq!(translations.instant("common.cancel"), "Cancel");
}

#[tokio::test]
async fn missing_key_renders_as_the_key() {
    let translations = service();
    translations.init_language(None).await.expect("init");

    assert_eq!(translations.instant("nope.missing"), "nope.missing");
}

#[tokio::test]
async fn change_language_notifies_observers() {
    let translations = service();
    translations.init_language(None).await.expect("init");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _subscription = translations
        .current_language()
        .subscribe(move |lang: &LangCode| sink.lock().expect("seen").push(*lang));

    translations.change_language(LangCode::Vi).await.expect("change");

    assert_eq!(*seen.lock().expect("seen"), vec![LangCode::En, LangCode::Vi]);
    assert_eq!(translations.instant("common.cancel"), "Hủy");
}

#[tokio::test]
async fn interpolates_params() {
    let translations = service();
    translations.init_language(Some("vi")).await.expect("init");

    assert_eq!(
        translations.instant_with("greeting", &[("name", "Lan")]),
        "Xin chào Lan"
    );
}

#[tokio::test]
async fn safe_translate_handles_empty_single_and_many_keys() {
    let translations = service();
    translations.init_language(Some("en")).await.expect("init");

    assert_eq!(translations.safe_translate::<&str>(&[]), "");
    assert_eq!(translations.safe_translate(&[""]), "");
    assert_eq!(translations.safe_translate(&["common.save"]), "Save");
    assert_eq!(
        translations.safe_translate(&["common.save", "common.cancel"]),
        "Save Cancel"
    );
}
