use std::path::{
    Component,
    Path,
};

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "localesDir", "results[\"a-b-c-d\"].overview")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Numbered, one-per-line rendering shared by every validation error list.
pub(crate) fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Site-wide settings.
///
/// Every field has a default matching the published site, so an absent or
/// partial `.soul-grimoire.json` is valid.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    /// Directory holding `<lang>.json` locale files, relative to the site root.
    pub locales_dir: String,

    /// Language used when nothing else resolves, and for the result URL when
    /// no preference has been stored.
    pub default_language: String,

    /// The one browser language honoured besides the default.
    pub browser_language: String,

    /// Storage key of the persisted language preference.
    pub preference_key: String,

    /// Title used when the locale has no `site_title`.
    pub default_title: String,

    /// Alert shown for an incomplete quiz when the locale has no `diagnosis_alert`.
    pub default_alert: String,

    pub result_page: String,
    pub placeholder_image: String,

    /// Joins the four answers into a composite key.
    pub key_separator: String,
}

impl SiteSettings {
    /// # Errors
    /// - Required field is empty
    /// - Separator that would make composite keys ambiguous
    /// - `localesDir` that is absolute or contains `.`/`..`
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let required = [
            ("localesDir", &self.locales_dir, "Example: \"locales\""),
            ("defaultLanguage", &self.default_language, "Example: \"en\""),
            ("browserLanguage", &self.browser_language, "Example: \"ja\""),
            ("preferenceKey", &self.preference_key, "Example: \"lang\""),
            ("defaultTitle", &self.default_title, "Example: \"Soul Grimoire\""),
            ("defaultAlert", &self.default_alert, "Example: \"Please answer every question.\""),
            ("resultPage", &self.result_page, "Example: \"result.html\""),
            ("placeholderImage", &self.placeholder_image, "Example: \"assets/images/placeholder.png\""),
        ];
        for (field, value, example) in required {
            if value.trim().is_empty() {
                errors.push(ValidationError::new(
                    field,
                    format!("The value cannot be empty. {example}"),
                ));
            }
        }

        if !self.locales_dir.trim().is_empty() && !is_plain_relative(&self.locales_dir) {
            errors.push(ValidationError::new(
                "localesDir",
                format!(
                    "The directory '{}' must be relative to the site root, without '.', '..' or a leading '/'. Example: \"locales\"",
                    self.locales_dir
                ),
            ));
        }

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \"-\"",
            ));
        } else if self.key_separator.contains(['&', '=', '#', '?']) {
            errors.push(ValidationError::new(
                "keySeparator",
                format!(
                    "The separator '{}' cannot contain URL query delimiters (&, =, #, ?)",
                    self.key_separator
                ),
            ));
        }

        if self.result_page.contains('?') {
            errors.push(ValidationError::new(
                "resultPage",
                "The result page cannot carry its own query string",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// ロケールファイルの取得で受け付けられるパスか（`Normal` 要素のみ）
fn is_plain_relative(path: &str) -> bool {
    Path::new(path).components().all(|component| matches!(component, Component::Normal(_)))
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            locales_dir: "locales".to_string(),
            default_language: "en".to_string(),
            browser_language: "ja".to_string(),
            preference_key: "lang".to_string(),
            default_title: "Soul Grimoire".to_string(),
            default_alert: "全ての問いに答えてください。".to_string(),
            result_page: "result.html".to_string(),
            placeholder_image: "assets/images/placeholder.png".to_string(),
            key_separator: "-".to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_settings() {
        let settings = SiteSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"localesDir": "i18n", "browserLanguage": "fr"}"#;

        let settings: SiteSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.locales_dir, eq("i18n"));
        assert_that!(settings.browser_language, eq("fr"));
        assert_that!(settings.key_separator, eq("-"));
        assert_that!(settings.default_language, eq("en"));
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let settings: SiteSettings = serde_json::from_str("{}").unwrap();

        assert_that!(settings.locales_dir, eq("locales"));
        assert_that!(settings.preference_key, eq("lang"));
        assert_that!(settings.default_title, eq("Soul Grimoire"));
        assert_that!(settings.result_page, eq("result.html"));
        assert_that!(settings.placeholder_image, eq("assets/images/placeholder.png"));
    }

    #[rstest]
    fn validate_invalid_key_separator_empty() {
        let settings = SiteSettings { key_separator: String::new(), ..SiteSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("keySeparator")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    #[rstest]
    #[case("&")]
    #[case("=")]
    #[case("-#-")]
    fn validate_invalid_key_separator_query_delimiter(#[case] separator: &str) {
        let settings =
            SiteSettings { key_separator: separator.to_string(), ..SiteSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("keySeparator")),
                field!(ValidationError.message, contains_substring("query delimiters"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_locales_dir_blank() {
        let settings = SiteSettings { locales_dir: "  ".to_string(), ..SiteSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("localesDir")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    #[rstest]
    #[case("./locales")]
    #[case("/srv/site/locales")]
    #[case("../shared/locales")]
    #[case("locales/../i18n")]
    fn validate_invalid_locales_dir_outside_site(#[case] locales_dir: &str) {
        let settings =
            SiteSettings { locales_dir: locales_dir.to_string(), ..SiteSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("localesDir")),
                field!(ValidationError.message, contains_substring("relative to the site root"))
            ]])
        );
    }

    #[rstest]
    #[case("locales")]
    #[case("locales/")]
    #[case("assets/i18n")]
    fn validate_valid_nested_locales_dir(#[case] locales_dir: &str) {
        let settings =
            SiteSettings { locales_dir: locales_dir.to_string(), ..SiteSettings::default() };

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn validate_invalid_result_page_with_query() {
        let settings =
            SiteSettings { result_page: "result.html?x=1".to_string(), ..SiteSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![field!(ValidationError.field_path, eq("resultPage"))])
        );
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = SiteSettings {
            default_language: String::new(),
            key_separator: String::new(),
            ..SiteSettings::default()
        };

        let errors = settings.validate().unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. defaultLanguage"));
        assert_that!(error_message, contains_substring("2. keySeparator"));
    }
}
