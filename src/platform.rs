//! Platform adapters
//!
//! ページのロジックが触る外部環境（ネットワーク、ローカルストレージ、ドキュメント）を
//! 3 つのトレイトに切り出し、実ブラウザなしでテストできるようにします。

pub mod fs;
pub mod memory;
pub mod query;

use std::future::Future;

use thiserror::Error;

use crate::page::ParticlesConfig;

/// Response of a static-file fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP-style status code
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    /// 200 OK with `body`
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self { status: 200, body: body.into() }
    }

    #[must_use]
    pub const fn not_found() -> Self {
        Self { status: 404, body: String::new() }
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Fetch failures that never produced a response.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Refusing to fetch '{0}': path escapes the site root")]
    InvalidPath(String),
    #[error("Resource unavailable: {0}")]
    Unavailable(String),
}

/// Preference persistence failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to write preferences: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Retrieves static resources by site-relative path.
pub trait ResourceFetcher: Send + Sync {
    /// Fetches `path`. A missing resource is a response with a non-success
    /// status, not an error.
    fn fetch(&self, path: &str) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send;
}

/// Browser-local key/value storage.
pub trait PreferenceStore: Send {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    /// When the value cannot be persisted.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Handle to an element owned by a [`PageHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// The document environment a page runs inside.
pub trait PageHost: Send {
    /// Query part of the current location, with or without the leading `?`.
    fn location_search(&self) -> String;

    /// Preferred language reported by the user agent (e.g. `ja-JP`).
    fn browser_language(&self) -> Option<String>;

    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Every element carrying a text-key attribute, with its key.
    fn text_key_elements(&self) -> Vec<(NodeId, String)>;

    /// Replaces the element's content with `html`, parsed as markup.
    fn set_inner_html(&mut self, node: NodeId, html: &str);

    /// Replaces the element's content with literal text.
    fn set_text_content(&mut self, node: NodeId, text: &str);

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn set_title(&mut self, title: &str);

    /// Sets the `lang` attribute of the document element.
    fn set_document_language(&mut self, lang: &str);

    /// Current value of the named field inside `form`.
    fn form_field(&self, form: NodeId, name: &str) -> Option<String>;

    fn navigate(&mut self, url: &str);

    /// Shows a blocking alert.
    fn alert(&mut self, message: &str);

    /// Whether the particle animation library is loaded.
    fn particles_available(&self) -> bool;

    fn init_particles(&mut self, host_id: &str, config: &ParticlesConfig);
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(200, true)]
    #[case(204, true)]
    #[case(304, false)]
    #[case(404, false)]
    #[case(500, false)]
    fn fetch_response_success_range(#[case] status: u16, #[case] expected: bool) {
        let response = FetchResponse { status, body: String::new() };

        assert_eq!(response.is_success(), expected);
    }
}
