//! Page initialization and language switching

use super::result::RESULT_CONTAINER_ID;
use super::{
    LoadOutcome,
    Page,
    RenderOutcome,
};
use crate::config::SiteSettings;
use crate::platform::query::QueryParams;
use crate::platform::{
    PageHost,
    PreferenceStore,
    ResourceFetcher,
};

/// What [`Page::initialize`] did.
#[derive(Debug)]
pub struct InitReport {
    /// Language chosen for the first load
    pub language: String,
    pub load: LoadOutcome,
    pub quiz_form_attached: bool,
    /// `None` when the page has no result container
    pub result: Option<RenderOutcome>,
    pub particles_started: bool,
}

/// What [`Page::change_language`] did.
#[derive(Debug)]
pub struct SwitchReport {
    pub load: LoadOutcome,
    /// `None` when the page has no result container
    pub result: Option<RenderOutcome>,
}

/// 初期表示の言語を決定する
///
/// 優先順位: URL の `lang` パラメータ > 保存済みの言語設定 > ブラウザの言語 > デフォルト言語
///
/// ブラウザの言語は主タグ（`ja-JP` なら `ja`）が `browser_language` と完全一致した場合のみ採用します。
#[must_use]
pub fn resolve_initial_language(
    url_lang: Option<&str>,
    stored_lang: Option<&str>,
    browser_lang: Option<&str>,
    settings: &SiteSettings,
) -> String {
    if let Some(lang) = url_lang.filter(|lang| !lang.is_empty()) {
        return lang.to_string();
    }
    if let Some(lang) = stored_lang.filter(|lang| !lang.is_empty()) {
        return lang.to_string();
    }

    let primary_subtag = browser_lang.and_then(|lang| lang.split('-').next());
    if primary_subtag == Some(settings.browser_language.as_str()) {
        settings.browser_language.clone()
    } else {
        settings.default_language.clone()
    }
}

impl<F, S, H> Page<F, S, H>
where
    F: ResourceFetcher,
    S: PreferenceStore,
    H: PageHost,
{
    /// ページ読み込み時の初期化
    ///
    /// 言語を決定して読み込んだ後、ページにある要素に応じてフォームの接続・結果の描画・
    /// パーティクルの開始を行います。
    pub async fn initialize(&self) -> InitReport {
        let (search, browser_lang) = {
            let host = self.host.lock().await;
            (host.location_search(), host.browser_language())
        };
        let params = QueryParams::parse(&search);
        let stored_lang = self.stored_language().await;

        let language = resolve_initial_language(
            params.get("lang"),
            stored_lang.as_deref(),
            browser_lang.as_deref(),
            &self.settings,
        );
        tracing::debug!("Initial language resolved to {language:?}");

        let load = self.load_and_apply_language(&language).await;
        let quiz_form_attached = self.attach_quiz_form().await;
        let result = self.rerender_result().await;
        let particles_started = self.init_particles().await;

        InitReport { language, load, quiz_form_attached, result, particles_started }
    }

    /// 言語を切り替える
    ///
    /// 言語ファイルを読み込み直し、結果ページであれば結果も描画し直します。
    pub async fn change_language(&self, lang: &str) -> SwitchReport {
        let load = self.load_and_apply_language(lang).await;
        let result = self.rerender_result().await;
        SwitchReport { load, result }
    }

    /// Renders the result only on pages with a result container.
    async fn rerender_result(&self) -> Option<RenderOutcome> {
        if self.has_element(RESULT_CONTAINER_ID).await {
            Some(self.display_result().await)
        } else {
            None
        }
    }
}
