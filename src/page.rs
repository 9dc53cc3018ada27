//! Quiz site page logic
//!
//! ロケールの読み込み、診断フォーム、結果表示、言語切替をまとめたページ本体。

mod form;
mod init;
mod loader;
mod particles;
mod result;
mod state;

use tokio::sync::{
    Mutex,
    MutexGuard,
};

pub use form::{
    FORM_FIELDS,
    QUIZ_FORM_ID,
    QuizAnswers,
    SubmitOutcome,
};
pub use init::{
    InitReport,
    SwitchReport,
    resolve_initial_language,
};
pub use loader::{
    LoadError,
    LoadOutcome,
};
pub use particles::{
    Density,
    Interactivity,
    InteractivityEvents,
    OpacityAnimation,
    PARTICLES_HOST_ID,
    ParticleColor,
    ParticleMovement,
    ParticleNumber,
    ParticleOpacity,
    ParticleShape,
    ParticleSize,
    Particles,
    ParticlesConfig,
    Toggle,
};
pub use result::{
    RESULT_CONTAINER_ID,
    RESULT_FIELD_IDS,
    RenderOutcome,
};
pub use state::{
    PageState,
    RequestTicket,
};

use crate::config::SiteSettings;
use crate::platform::{
    PageHost,
    PreferenceStore,
    ResourceFetcher,
};

/// One loaded page together with the platform it runs on.
///
/// # ロック順序
///
/// 複数のロックを同時に取得する場合は、以下の順序を厳守してください：
/// 1. `state.dataset`
/// 2. `host`
/// 3. `preferences`
pub struct Page<F, S, H> {
    /// サイト設定
    settings: SiteSettings,
    /// ロケールファイルの取得
    fetcher: F,
    /// 言語設定の保存先
    preferences: Mutex<S>,
    /// ドキュメント
    host: Mutex<H>,
    /// 読み込み済みデータとリクエスト番号
    state: PageState,
}

impl<F, S, H> Page<F, S, H>
where
    F: ResourceFetcher,
    S: PreferenceStore,
    H: PageHost,
{
    /// 新しい `Page` を作成
    pub fn new(settings: SiteSettings, fetcher: F, preferences: S, host: H) -> Self {
        Self {
            settings,
            fetcher,
            preferences: Mutex::new(preferences),
            host: Mutex::new(host),
            state: PageState::new(),
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &SiteSettings {
        &self.settings
    }

    #[must_use]
    pub const fn state(&self) -> &PageState {
        &self.state
    }

    /// ドキュメントのロックを取得
    pub async fn host(&self) -> MutexGuard<'_, H> {
        self.host.lock().await
    }

    /// 言語設定ストアのロックを取得
    pub async fn preferences(&self) -> MutexGuard<'_, S> {
        self.preferences.lock().await
    }

    /// Stored language preference, if any non-empty value was saved.
    async fn stored_language(&self) -> Option<String> {
        self.preferences
            .lock()
            .await
            .get(&self.settings.preference_key)
            .filter(|lang| !lang.is_empty())
    }

    /// Whether the page has an element with `id`.
    async fn has_element(&self, id: &str) -> bool {
        self.host.lock().await.element_by_id(id).is_some()
    }
}

impl<F, S, H> std::fmt::Debug for Page<F, S, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("settings", &self.settings)
            .field("fetcher", &"<ResourceFetcher>")
            .field("preferences", &"<PreferenceStore>")
            .field("host", &"<PageHost>")
            .field("state", &self.state)
            .finish()
    }
}
