//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

use serde_json::json;

use crate::config::SiteSettings;
use crate::page::Page;
use crate::platform::memory::{
    MemoryFetcher,
    MemoryHost,
    MemoryPreferenceStore,
};

/// インメモリ実装で組み立てたページ
pub(crate) type TestPage = Page<MemoryFetcher, MemoryPreferenceStore, MemoryHost>;

/// テスト用の結果レコード（JSON）を作成する
///
/// 言語ごとに区別できるよう、表示テキストに言語コードを含めます。
pub(crate) fn sample_record_json(lang: &str) -> String {
    json!({
        "core_type": format!("The Alchemist ({lang})"),
        "element": "Fire",
        "keyword": "Transmutation",
        "symbol_name": format!("Ouroboros ({lang})"),
        "overview": format!("<p>Overview</p> ({lang})"),
        "chapter1": format!("Chapter one ({lang})"),
        "chapter2": format!("Chapter two ({lang})"),
        "chapter3": format!("Chapter three ({lang})"),
        "chapter4": format!("Chapter four ({lang})"),
    })
    .to_string()
}

/// テスト用のロケールファイル（JSON）を作成する
///
/// 結果は `fire-sun-sword-dawn` の 1 件のみ。
pub(crate) fn sample_locale_json(lang: &str) -> String {
    let record: serde_json::Value = serde_json::from_str(&sample_record_json(lang))
        .unwrap_or_else(|_| serde_json::Value::Null);
    json!({
        "ui": {
            "site_title": format!("Soul Grimoire ({lang})"),
            "diagnosis_title": format!("Diagnosis ({lang})"),
            "diagnosis_alert": format!("Please answer all questions ({lang})"),
            "q1_text": format!("<em>Q1</em> ({lang})"),
            "result_title": format!("Your Grimoire ({lang})"),
            "empty_text": "",
        },
        "results": {
            "fire-sun-sword-dawn": record,
        },
    })
    .to_string()
}

/// `locales/<lang>.json` を返すフェッチャーを作成する
pub(crate) fn locale_fetcher(languages: &[&str]) -> MemoryFetcher {
    languages.iter().fold(MemoryFetcher::new(), |fetcher, lang| {
        fetcher.with_file(format!("locales/{lang}.json"), sample_locale_json(lang))
    })
}

/// デフォルト設定でテスト用のページを作成する
pub(crate) fn create_page(
    fetcher: MemoryFetcher,
    preferences: MemoryPreferenceStore,
    host: MemoryHost,
) -> TestPage {
    Page::new(SiteSettings::default(), fetcher, preferences, host)
}
