//! Quiz form handler

use super::Page;
use crate::platform::query::build_url;
use crate::platform::{
    PageHost,
    PreferenceStore,
    ResourceFetcher,
};

/// Element id of the quiz form.
pub const QUIZ_FORM_ID: &str = "diagnosis-form";

/// Named answer fields of the quiz form, in key order.
pub const FORM_FIELDS: [&str; 4] = ["q1", "q2", "q3", "q4"];

/// The four answers read from the quiz form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizAnswers(pub [Option<String>; 4]);

impl QuizAnswers {
    /// Answers where every field was filled in.
    #[must_use]
    pub fn complete(answers: [&str; 4]) -> Self {
        Self(answers.map(|answer| Some(answer.to_string())))
    }

    /// Joins the four answers with `separator`, in field order.
    ///
    /// Returns `None` if any answer is missing or empty.
    #[must_use]
    pub fn composite_key(&self, separator: &str) -> Option<String> {
        let mut parts = Vec::with_capacity(FORM_FIELDS.len());
        for answer in &self.0 {
            parts.push(answer.as_deref().filter(|value| !value.is_empty())?);
        }
        Some(parts.join(separator))
    }
}

/// What a quiz submission did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The page has no attached quiz form.
    NotAttached,
    /// The browser was sent to the result page at this URL.
    Navigated(String),
    /// An answer was missing; this alert was shown.
    Alerted(String),
}

impl<F, S, H> Page<F, S, H>
where
    F: ResourceFetcher,
    S: PreferenceStore,
    H: PageHost,
{
    /// 診断フォームがあれば送信処理を接続する
    pub async fn attach_quiz_form(&self) -> bool {
        if !self.has_element(QUIZ_FORM_ID).await {
            return false;
        }
        self.state.mark_form_attached();
        tracing::debug!("Quiz form attached");
        true
    }

    /// 診断フォームの送信を処理する
    ///
    /// 4 問すべてに回答があれば結果ページへ遷移し、なければアラートを表示します。
    pub async fn submit_quiz_form(&self) -> SubmitOutcome {
        if !self.state.is_form_attached() {
            return SubmitOutcome::NotAttached;
        }

        let answers = {
            let host = self.host.lock().await;
            let Some(form) = host.element_by_id(QUIZ_FORM_ID) else {
                return SubmitOutcome::NotAttached;
            };
            QuizAnswers(FORM_FIELDS.map(|name| host.form_field(form, name)))
        };

        let Some(result_id) = answers.composite_key(&self.settings.key_separator) else {
            let message = self.alert_message().await;
            tracing::debug!("Quiz submitted with missing answers");
            self.host.lock().await.alert(&message);
            return SubmitOutcome::Alerted(message);
        };

        let lang = self
            .stored_language()
            .await
            .unwrap_or_else(|| self.settings.default_language.clone());
        let url = build_url(&self.settings.result_page, &[("id", &result_id), ("lang", &lang)]);

        tracing::debug!("Quiz submitted, navigating to {url}");
        self.host.lock().await.navigate(&url);
        SubmitOutcome::Navigated(url)
    }

    /// Localized incomplete-quiz alert, or the configured default.
    async fn alert_message(&self) -> String {
        self.state
            .dataset()
            .await
            .as_ref()
            .and_then(|dataset| dataset.diagnosis_alert())
            .map_or_else(|| self.settings.default_alert.clone(), ToString::to_string)
    }
}
