//! Localization loader

use thiserror::Error;

use super::Page;
use super::state::RequestTicket;
use crate::locale::{
    LocaleDataset,
    LocaleError,
};
use crate::platform::{
    FetchError,
    PageHost,
    PreferenceStore,
    ResourceFetcher,
};

/// Why a language load left the page untouched
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Language file for \"{language}\" not found (status {status})")]
    NotFound { language: String, status: u16 },

    #[error("Failed to fetch language file for \"{language}\": {source}")]
    Fetch { language: String, source: FetchError },

    #[error("Language file for \"{language}\" is malformed: {source}")]
    Malformed { language: String, source: LocaleError },
}

/// Result of one [`Page::load_and_apply_language`] call.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The dataset was replaced and the document refreshed.
    Applied,
    /// A later request was issued while this one was in flight; its data was discarded.
    Superseded,
    /// Nothing changed; the error has already been logged.
    Failed(LoadError),
}

impl LoadOutcome {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

impl<F, S, H> Page<F, S, H>
where
    F: ResourceFetcher,
    S: PreferenceStore,
    H: PageHost,
{
    /// 言語ファイルを読み込み、ページに適用する
    ///
    /// 言語設定は取得より先に保存されるため、読み込みに失敗しても設定は残ります。
    /// 失敗はログに記録され、読み込み済みのデータと表示は変更されません。
    pub async fn load_and_apply_language(&self, lang: &str) -> LoadOutcome {
        let ticket = self.state.begin_request();
        tracing::debug!("Loading language {lang:?} (request {})", ticket.0);

        self.persist_language(lang).await;

        let dataset = match self.fetch_dataset(lang).await {
            Ok(dataset) => dataset,
            Err(error) => {
                tracing::error!("{error}");
                return LoadOutcome::Failed(error);
            }
        };

        self.apply_dataset(ticket, lang, dataset).await
    }

    async fn persist_language(&self, lang: &str) {
        let mut preferences = self.preferences.lock().await;
        if let Err(error) = preferences.set(&self.settings.preference_key, lang) {
            tracing::warn!("Failed to store language preference {lang:?}: {error}");
        }
    }

    /// `<locales_dir>/<lang>.json`
    fn locale_path(&self, lang: &str) -> String {
        format!("{}/{lang}.json", self.settings.locales_dir.trim_end_matches('/'))
    }

    async fn fetch_dataset(&self, lang: &str) -> Result<LocaleDataset, LoadError> {
        let response = self
            .fetcher
            .fetch(&self.locale_path(lang))
            .await
            .map_err(|source| LoadError::Fetch { language: lang.to_string(), source })?;

        if !response.is_success() {
            return Err(LoadError::NotFound {
                language: lang.to_string(),
                status: response.status,
            });
        }

        LocaleDataset::from_json(&response.body)
            .map_err(|source| LoadError::Malformed { language: lang.to_string(), source })
    }

    /// Replaces the dataset and refreshes the document, unless `ticket` is stale.
    async fn apply_dataset(
        &self,
        ticket: RequestTicket,
        lang: &str,
        dataset: LocaleDataset,
    ) -> LoadOutcome {
        let mut current = self.state.dataset().await;
        if !self.state.is_latest(ticket) {
            tracing::debug!("Discarding {lang:?} (request {}): superseded", ticket.0);
            return LoadOutcome::Superseded;
        }

        {
            let mut host = self.host.lock().await;
            refresh_document(&mut *host, &dataset, lang, &self.settings.default_title);
        }
        *current = Some(dataset);

        tracing::debug!("Applied language {lang:?} (request {})", ticket.0);
        LoadOutcome::Applied
    }
}

/// Writes UI text into every tagged element and updates the title and `lang` attribute.
fn refresh_document<H: PageHost>(
    host: &mut H,
    dataset: &LocaleDataset,
    lang: &str,
    default_title: &str,
) {
    for (node, key) in host.text_key_elements() {
        if let Some(text) = dataset.ui_text(&key) {
            host.set_inner_html(node, text);
        }
    }

    host.set_title(dataset.site_title().unwrap_or(default_title));
    host.set_document_language(lang);
}
