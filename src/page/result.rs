//! Result renderer

use std::borrow::Cow;

use super::Page;
use crate::locale::ResultRecord;
use crate::platform::query::QueryParams;
use crate::platform::{
    PageHost,
    PreferenceStore,
    ResourceFetcher,
};

/// Element id of the result container.
pub const RESULT_CONTAINER_ID: &str = "result-content";

/// Display elements inside the result container.
pub const RESULT_FIELD_IDS: [&str; 9] = [
    "archetype",
    "archetype-details",
    "symbol-image",
    "symbol-name",
    "overview",
    "chapter1-text",
    "chapter2-text",
    "chapter3-text",
    "chapter4-text",
];

/// Markup written when the URL carries no result id.
const MISSING_ID_HTML: &str = "<h1>Error</h1><p>Result ID not found.</p>";

/// What [`Page::display_result`] rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// No locale has been loaded yet.
    NoDataset,
    /// The page has no result container.
    NoContainer,
    /// The URL has no `id` parameter.
    MissingId,
    /// `id` is not in the loaded result table.
    UnknownId(String),
    /// The record for this id was rendered.
    Rendered(String),
}

impl<F, S, H> Page<F, S, H>
where
    F: ResourceFetcher,
    S: PreferenceStore,
    H: PageHost,
{
    /// 結果ページを描画する
    ///
    /// URL の `id` パラメータで結果を引き、各表示要素に書き込みます。
    pub async fn display_result(&self) -> RenderOutcome {
        let guard = self.state.dataset().await;
        let Some(dataset) = guard.as_ref() else {
            tracing::debug!("Skipping result rendering: no locale loaded yet");
            return RenderOutcome::NoDataset;
        };

        let mut host = self.host.lock().await;
        let Some(container) = host.element_by_id(RESULT_CONTAINER_ID) else {
            return RenderOutcome::NoContainer;
        };

        let params = QueryParams::parse(&host.location_search());
        let Some(result_id) = params.get_non_empty("id") else {
            host.set_inner_html(container, MISSING_ID_HTML);
            return RenderOutcome::MissingId;
        };

        match dataset.result(result_id) {
            Some(record) => {
                write_record(&mut *host, record, &self.settings.placeholder_image);
                tracing::debug!("Rendered result {result_id:?}");
                RenderOutcome::Rendered(result_id.to_string())
            }
            None => {
                tracing::debug!("Result {result_id:?} not found in the loaded locale");
                host.set_inner_html(container, &not_found_html(result_id));
                RenderOutcome::UnknownId(result_id.to_string())
            }
        }
    }
}

/// Markup written when `result_id` is not in the result table.
fn not_found_html(result_id: &str) -> String {
    let escaped: Cow<'_, str> = quick_xml::escape::escape(result_id);
    format!(
        "<h1>Result Not Found</h1><p>The result for ID \"{escaped}\" could not be found in the language file.</p>"
    )
}

fn write_record<H: PageHost>(host: &mut H, record: &ResultRecord, placeholder_image: &str) {
    let details = record.details_line();
    let [chapter1, chapter2, chapter3, chapter4] = record.chapters();
    let texts = [
        ("archetype", record.core_type.as_str()),
        ("archetype-details", details.as_str()),
        ("symbol-name", record.symbol_name.as_str()),
        ("overview", record.overview.as_str()),
        ("chapter1-text", chapter1),
        ("chapter2-text", chapter2),
        ("chapter3-text", chapter3),
        ("chapter4-text", chapter4),
    ];
    for (id, text) in texts {
        if let Some(node) = host.element_by_id(id) {
            host.set_text_content(node, text);
        }
    }

    if let Some(image) = host.element_by_id("symbol-image") {
        host.set_attribute(image, "src", placeholder_image);
        host.set_attribute(image, "alt", &record.symbol_name);
    }
}
