//! In-memory platform adapters
//!
//! テストとコマンドラインホストで使う、ブラウザを模したインメモリ実装。

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;

use super::{
    FetchError,
    FetchResponse,
    NodeId,
    PageHost,
    PreferenceStore,
    ResourceFetcher,
    StoreError,
};
use crate::page::{
    FORM_FIELDS,
    PARTICLES_HOST_ID,
    ParticlesConfig,
    QUIZ_FORM_ID,
    RESULT_CONTAINER_ID,
    RESULT_FIELD_IDS,
};

/// Serves canned responses, optionally after a delay.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    /// path -> response
    responses: HashMap<String, FetchResponse>,
    /// path -> artificial latency
    delays: HashMap<String, Duration>,
    /// paths whose fetch fails without a response
    failures: HashMap<String, String>,
}

impl MemoryFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` with status 200 at `path`.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses.insert(path.into(), FetchResponse::ok(body));
        self
    }

    #[must_use]
    pub fn with_status(mut self, path: impl Into<String>, status: u16) -> Self {
        self.responses.insert(path.into(), FetchResponse { status, body: String::new() });
        self
    }

    /// Makes `path` fail as a network error would.
    #[must_use]
    pub fn with_failure(mut self, path: impl Into<String>, reason: impl Into<String>) -> Self {
        self.failures.insert(path.into(), reason.into());
        self
    }

    #[must_use]
    pub fn with_delay(mut self, path: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(path.into(), delay);
        self
    }
}

impl ResourceFetcher for MemoryFetcher {
    async fn fetch(&self, path: &str) -> Result<FetchResponse, FetchError> {
        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(reason) = self.failures.get(path) {
            return Err(FetchError::Unavailable(reason.clone()));
        }
        Ok(self.responses.get(path).cloned().unwrap_or_else(FetchResponse::not_found))
    }
}

/// `localStorage` stand-in.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: HashMap<String, String>,
}

impl MemoryPreferenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One element of a [`MemoryHost`] document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryElement {
    pub id: Option<String>,
    /// Value of the text-key attribute
    pub text_key: Option<String>,
    pub content: String,
    /// Whether `content` was last written as markup
    pub content_is_markup: bool,
    pub attributes: HashMap<String, String>,
    /// Named form field values, for form elements
    pub fields: HashMap<String, String>,
}

/// Flat, tree-less document model with a recorded window.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    elements: Vec<MemoryElement>,
    location_search: String,
    browser_language: Option<String>,
    title: String,
    document_language: Option<String>,
    navigations: Vec<String>,
    alerts: Vec<String>,
    particles_library: bool,
    /// `(host id, serialized config)` once the particle effect started
    particles: Option<(String, Value)>,
}

impl MemoryHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The quiz page: title and question labels, the quiz form and the particle host.
    #[must_use]
    pub fn index_page() -> Self {
        let mut host = Self::new().with_particles_library();
        for key in ["site_title", "diagnosis_title", "q1_text", "q2_text", "q3_text", "q4_text"] {
            host.add_text_key(key);
        }
        host.add_element(QUIZ_FORM_ID);
        host.add_element(PARTICLES_HOST_ID);
        host
    }

    /// The result page: a result container with every display field.
    #[must_use]
    pub fn result_page() -> Self {
        let mut host = Self::new().with_particles_library();
        for key in ["site_title", "result_title", "back_to_top"] {
            host.add_text_key(key);
        }
        host.add_element(RESULT_CONTAINER_ID);
        for id in RESULT_FIELD_IDS {
            host.add_element(id);
        }
        host.add_element(PARTICLES_HOST_ID);
        host
    }

    #[must_use]
    pub fn with_query(mut self, search: impl Into<String>) -> Self {
        self.location_search = search.into();
        self
    }

    #[must_use]
    pub fn with_browser_language(mut self, lang: impl Into<String>) -> Self {
        self.browser_language = Some(lang.into());
        self
    }

    #[must_use]
    pub const fn with_particles_library(mut self) -> Self {
        self.particles_library = true;
        self
    }

    #[must_use]
    pub const fn without_particles_library(mut self) -> Self {
        self.particles_library = false;
        self
    }

    pub fn add_element(&mut self, id: impl Into<String>) -> NodeId {
        self.push(MemoryElement { id: Some(id.into()), ..MemoryElement::default() })
    }

    pub fn add_text_key(&mut self, key: impl Into<String>) -> NodeId {
        self.push(MemoryElement { text_key: Some(key.into()), ..MemoryElement::default() })
    }

    /// Sets one of the quiz answers (`q1`..`q4`) on the quiz form, if present.
    pub fn set_answer(&mut self, name: &str, value: &str) {
        debug_assert!(FORM_FIELDS.contains(&name), "unknown quiz field {name}");
        if let Some(form) = self.find_mut(QUIZ_FORM_ID) {
            form.fields.insert(name.to_string(), value.to_string());
        }
    }

    fn push(&mut self, element: MemoryElement) -> NodeId {
        self.elements.push(element);
        NodeId(self.elements.len() - 1)
    }

    fn find(&self, id: &str) -> Option<&MemoryElement> {
        self.elements.iter().find(|element| element.id.as_deref() == Some(id))
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut MemoryElement> {
        self.elements.iter_mut().find(|element| element.id.as_deref() == Some(id))
    }

    #[must_use]
    pub fn element(&self, node: NodeId) -> Option<&MemoryElement> {
        self.elements.get(node.0)
    }

    /// Content of the element with `id`.
    #[must_use]
    pub fn content_of(&self, id: &str) -> Option<&str> {
        self.find(id).map(|element| element.content.as_str())
    }

    #[must_use]
    pub fn attribute_of(&self, id: &str, name: &str) -> Option<&str> {
        self.find(id).and_then(|element| element.attributes.get(name)).map(String::as_str)
    }

    /// Contents of every element tagged with `key`.
    #[must_use]
    pub fn contents_for_key(&self, key: &str) -> Vec<&str> {
        self.elements
            .iter()
            .filter(|element| element.text_key.as_deref() == Some(key))
            .map(|element| element.content.as_str())
            .collect()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn document_language(&self) -> Option<&str> {
        self.document_language.as_deref()
    }

    #[must_use]
    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    #[must_use]
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    #[must_use]
    pub fn particles(&self) -> Option<&(String, Value)> {
        self.particles.as_ref()
    }

    fn write(&mut self, node: NodeId, content: &str, markup: bool) {
        if let Some(element) = self.elements.get_mut(node.0) {
            element.content = content.to_string();
            element.content_is_markup = markup;
        }
    }
}

impl PageHost for MemoryHost {
    fn location_search(&self) -> String {
        self.location_search.clone()
    }

    fn browser_language(&self) -> Option<String> {
        self.browser_language.clone()
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements.iter().position(|element| element.id.as_deref() == Some(id)).map(NodeId)
    }

    fn text_key_elements(&self) -> Vec<(NodeId, String)> {
        self.elements
            .iter()
            .enumerate()
            .filter_map(|(index, element)| {
                element.text_key.as_ref().map(|key| (NodeId(index), key.clone()))
            })
            .collect()
    }

    fn set_inner_html(&mut self, node: NodeId, html: &str) {
        self.write(node, html, true);
    }

    fn set_text_content(&mut self, node: NodeId, text: &str) {
        self.write(node, text, false);
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.elements.get_mut(node.0) {
            element.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_document_language(&mut self, lang: &str) {
        self.document_language = Some(lang.to_string());
    }

    fn form_field(&self, form: NodeId, name: &str) -> Option<String> {
        self.elements.get(form.0).and_then(|element| element.fields.get(name)).cloned()
    }

    fn navigate(&mut self, url: &str) {
        self.navigations.push(url.to_string());
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn particles_available(&self) -> bool {
        self.particles_library
    }

    fn init_particles(&mut self, host_id: &str, config: &ParticlesConfig) {
        match serde_json::to_value(config) {
            Ok(value) => self.particles = Some((host_id.to_string(), value)),
            Err(error) => tracing::warn!("Failed to serialize particle config: {error}"),
        }
    }
}
