//! 設定管理を行うモジュール

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    SiteSettings,
};

/// サイトルートに置く設定ファイル名
pub const SITE_CONFIG_FILE: &str = ".soul-grimoire.json";

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: SiteSettings,

    /// サイトのルートパス
    site_root: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: SiteSettings::default(), site_root: None }
    }

    /// 設定を読み込む
    ///
    /// サイトルートに `.soul-grimoire.json` があればその内容を、なければデフォルト値を使います。
    /// 検証に失敗した場合は現在の設定を変更しません。
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, site_root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for site root: {:?}", site_root);

        let settings = match &site_root {
            Some(root) => read_site_config(root)?.unwrap_or_default(),
            None => SiteSettings::default(),
        };

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        self.site_root = site_root;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &SiteSettings {
        &self.current_settings
    }

    /// ロケールディレクトリのパス（サイトルート未設定時は相対パス）
    #[must_use]
    pub fn locales_path(&self) -> PathBuf {
        self.site_root.as_ref().map_or_else(
            || PathBuf::from(&self.current_settings.locales_dir),
            |root| root.join(&self.current_settings.locales_dir),
        )
    }
}

/// `<site_root>/.soul-grimoire.json` を読む（ファイルがなければ `None`）
fn read_site_config(site_root: &Path) -> Result<Option<SiteSettings>, ConfigError> {
    let config_path = site_root.join(SITE_CONFIG_FILE);
    if !config_path.exists() {
        tracing::debug!("No site config at {:?}, using defaults", config_path);
        return Ok(None);
    }

    let content = std::fs::read_to_string(&config_path)?;
    let settings: SiteSettings = serde_json::from_str(&content)?;
    tracing::debug!("Loaded site config from {:?}", config_path);
    Ok(Some(settings))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::config::ValidationError;

    /// 設定ファイルを置いたサイトルートを作成
    fn site_with_config(content: &str) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(SITE_CONFIG_FILE), content).unwrap();
        temp_dir
    }

    /// new: デフォルト値で作成される
    #[rstest]
    fn test_new_creates_default_settings() {
        let manager = ConfigManager::new();

        assert_eq!(manager.get_settings().key_separator, "-");
        assert_eq!(manager.locales_path(), PathBuf::from("locales"));
    }

    /// load_settings: site_root が None の場合
    #[rstest]
    fn test_load_settings_without_site_root() {
        let mut manager = ConfigManager::new();

        let result = manager.load_settings(None);

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().locales_dir, "locales");
    }

    /// load_settings: 設定ファイルがないサイトはデフォルト値
    #[rstest]
    fn test_load_settings_site_without_config_file() {
        let temp_dir = TempDir::new().unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().default_title, "Soul Grimoire");
        assert_eq!(manager.locales_path(), temp_dir.path().join("locales"));
    }

    /// load_settings: 一部だけ指定した設定ファイルは残りをデフォルト値で補う
    #[rstest]
    fn test_load_settings_with_partial_config_file() {
        let site = site_with_config(r#"{"localesDir": "i18n", "defaultLanguage": "ja"}"#);

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(site.path().to_path_buf()));

        assert!(result.is_ok());
        let settings = manager.get_settings();
        assert_eq!(settings.locales_dir, "i18n");
        assert_eq!(settings.default_language, "ja");
        assert_eq!(settings.preference_key, "lang");
        assert_eq!(manager.locales_path(), site.path().join("i18n"));
    }

    /// load_settings: JSON として読めない設定ファイル
    #[rstest]
    fn test_load_settings_invalid_json() {
        let site = site_with_config("{ localesDir: i18n }");

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(site.path().to_path_buf()));

        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    /// load_settings: 無効な設定ファイルは拒否され、以前の設定が残る
    #[rstest]
    fn test_load_settings_rejects_invalid_file() {
        let site = site_with_config(r#"{"keySeparator": ""}"#);

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(site.path().to_path_buf()));

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
        assert_eq!(manager.get_settings().key_separator, "-");
        assert_eq!(manager.locales_path(), PathBuf::from("locales"));
    }

    /// load_settings: 取得できない localesDir は読み込み時点で拒否される
    #[rstest]
    #[case(r#"{"localesDir": "./locales"}"#)]
    #[case(r#"{"localesDir": "../shared/locales"}"#)]
    fn test_load_settings_rejects_unreachable_locales_dir(#[case] content: &str) {
        let site = site_with_config(content);
        fs::create_dir(site.path().join("locales")).unwrap();
        fs::write(site.path().join("locales/en.json"), "{}").unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(site.path().to_path_buf()));

        let Err(ConfigError::ValidationErrors(errors)) = result else {
            panic!("expected validation errors");
        };
        assert_that!(
            errors,
            elements_are![field!(ValidationError.field_path, eq("localesDir"))]
        );
    }
}
