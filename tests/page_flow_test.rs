//! サイト全体の流れ（診断 → 結果表示 → 言語切替）に関するテスト

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]
#![allow(missing_docs)]

use std::fs;
use std::path::Path;

use googletest::prelude::*;
use serde_json::json;
use soul_grimoire::Page;
use soul_grimoire::config::{
    ConfigManager,
    SITE_CONFIG_FILE,
};
use soul_grimoire::page::{
    LoadOutcome,
    RenderOutcome,
    SubmitOutcome,
};
use soul_grimoire::platform::PreferenceStore;
use soul_grimoire::platform::fs::{
    FilePreferenceStore,
    FsFetcher,
};
use soul_grimoire::platform::memory::MemoryHost;
use tempfile::TempDir;

fn write_locale(root: &Path, lang: &str, title: &str, archetype: &str) {
    let locale = json!({
        "ui": {
            "site_title": title,
            "diagnosis_alert": format!("{lang}: answer everything"),
        },
        "results": {
            "water-moon-cup-night": {
                "core_type": archetype,
                "element": "Water",
                "keyword": "Intuition",
                "symbol_name": "Chalice",
                "overview": "Still waters run deep.",
                "chapter1": "I",
                "chapter2": "II",
                "chapter3": "III",
                "chapter4": "IV"
            }
        }
    });
    fs::create_dir_all(root.join("locales")).unwrap();
    fs::write(root.join(format!("locales/{lang}.json")), locale.to_string()).unwrap();
}

fn create_site() -> TempDir {
    let site = TempDir::new().unwrap();
    write_locale(site.path(), "en", "Soul Grimoire", "The Oracle");
    write_locale(site.path(), "ja", "魂の魔導書", "神託者");
    site
}

fn open_page(site: &Path, host: MemoryHost) -> Page<FsFetcher, FilePreferenceStore, MemoryHost> {
    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(Some(site.to_path_buf())).unwrap();
    Page::new(
        config_manager.get_settings().clone(),
        FsFetcher::new(site),
        FilePreferenceStore::open(site.join("state.json")).unwrap(),
        host,
    )
}

#[tokio::test]
async fn quiz_submission_leads_to_rendered_result() {
    let site = create_site();

    let mut index = MemoryHost::index_page().with_browser_language("ja-JP");
    for (name, answer) in [("q1", "water"), ("q2", "moon"), ("q3", "cup"), ("q4", "night")] {
        index.set_answer(name, answer);
    }
    let quiz = open_page(site.path(), index);
    let report = quiz.initialize().await;
    assert_that!(report.language, eq("ja"));

    let SubmitOutcome::Navigated(url) = quiz.submit_quiz_form().await else {
        panic!("expected navigation");
    };
    assert_that!(url, eq("result.html?id=water-moon-cup-night&lang=ja"));

    let query = url.split_once('?').unwrap().1;
    let result = open_page(site.path(), MemoryHost::result_page().with_query(query));
    let report = result.initialize().await;

    assert_eq!(report.result, Some(RenderOutcome::Rendered("water-moon-cup-night".to_string())));
    let host = result.host().await;
    assert_that!(host.title(), eq("魂の魔導書"));
    assert_that!(host.content_of("archetype"), some(eq("神託者")));
    assert_that!(host.content_of("archetype-details"), some(eq("Water : Intuition")));
    assert_that!(host.attribute_of("symbol-image", "alt"), some(eq("Chalice")));
}

#[tokio::test]
async fn stored_preference_survives_between_pages() {
    let site = create_site();

    let first = open_page(site.path(), MemoryHost::index_page());
    first.change_language("ja").await;
    drop(first);

    let second = open_page(site.path(), MemoryHost::index_page().with_browser_language("en-US"));
    let report = second.initialize().await;

    assert_that!(report.language, eq("ja"));
    assert_that!(second.preferences().await.get("lang"), some(eq("ja")));
}

#[tokio::test]
async fn switching_to_missing_language_keeps_page_intact() {
    let site = create_site();
    let page = open_page(
        site.path(),
        MemoryHost::result_page().with_query("?id=water-moon-cup-night&lang=en"),
    );
    page.initialize().await;

    let switch = page.change_language("de").await;

    assert!(matches!(switch.load, LoadOutcome::Failed(_)));
    let host = page.host().await;
    assert_that!(host.title(), eq("Soul Grimoire"));
    assert_that!(host.content_of("archetype"), some(eq("The Oracle")));
}

#[tokio::test]
async fn unknown_result_id_is_reported_inline() {
    let site = create_site();
    let page =
        open_page(site.path(), MemoryHost::result_page().with_query("?id=fire-sun-sword-dawn"));

    let report = page.initialize().await;

    assert_eq!(report.result, Some(RenderOutcome::UnknownId("fire-sun-sword-dawn".to_string())));
    assert_that!(
        page.host().await.content_of("result-content"),
        some(contains_substring("fire-sun-sword-dawn"))
    );
}

#[tokio::test]
async fn site_settings_redirect_locales_dir() {
    let site = TempDir::new().unwrap();
    fs::write(site.path().join(SITE_CONFIG_FILE), r#"{"localesDir": "i18n"}"#).unwrap();
    write_locale(site.path(), "en", "Grimoire", "The Oracle");
    fs::rename(site.path().join("locales"), site.path().join("i18n")).unwrap();

    let page = open_page(site.path(), MemoryHost::index_page());
    let report = page.initialize().await;

    assert!(report.load.is_applied());
    assert_that!(page.host().await.title(), eq("Grimoire"));
}
