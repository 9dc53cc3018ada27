//! Filesystem-backed platform adapters

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{
    Component,
    Path,
    PathBuf,
};

use super::{
    FetchError,
    FetchResponse,
    PreferenceStore,
    ResourceFetcher,
    StoreError,
};

/// Serves files below a site root, answering 404 for missing files.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves `path` below the root, rejecting anything that could leave it.
    fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let relative = Path::new(path);
        if relative.components().any(|component| !matches!(component, Component::Normal(_))) {
            return Err(FetchError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl ResourceFetcher for FsFetcher {
    async fn fetch(&self, path: &str) -> Result<FetchResponse, FetchError> {
        let full_path = self.resolve(path)?;
        tracing::debug!("Reading resource: {:?}", full_path);

        match tokio::fs::read_to_string(&full_path).await {
            Ok(body) => Ok(FetchResponse::ok(body)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(FetchResponse::not_found()),
            Err(error) => Err(error.into()),
        }
    }
}

/// Preferences persisted as a JSON object in a single file.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
    /// 書き込み済みの値（ファイルと同期）
    values: BTreeMap<String, String>,
}

impl FilePreferenceStore {
    /// Opens the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(error) if error.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => return Err(error.into()),
        };
        tracing::debug!("Opened preference store {:?} with {} entries", path, values.len());
        Ok(Self { path, values })
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }
}

/// Language codes with a `<code>.json` file in `locales_dir`, sorted.
///
/// # Errors
/// ディレクトリの読み込みエラー
pub fn list_languages(locales_dir: &Path) -> std::io::Result<Vec<String>> {
    let mut languages = Vec::new();
    for entry in std::fs::read_dir(locales_dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json")
            && let Some(stem) = path.file_stem()
        {
            languages.push(stem.to_string_lossy().into_owned());
        }
    }
    languages.sort();
    Ok(languages)
}
