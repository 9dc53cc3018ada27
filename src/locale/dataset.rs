//! Locale schema and validation

use std::collections::HashMap;

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::Value;

use super::LocaleError;
use crate::config::ValidationError;

/// Fields every result record must carry, in display order.
pub const RESULT_RECORD_FIELDS: [&str; 9] = [
    "core_type",
    "element",
    "keyword",
    "symbol_name",
    "overview",
    "chapter1",
    "chapter2",
    "chapter3",
    "chapter4",
];

/// UI text key for the document title.
const SITE_TITLE_KEY: &str = "site_title";
/// UI text key for the incomplete-quiz alert.
const DIAGNOSIS_ALERT_KEY: &str = "diagnosis_alert";

/// One diagnosis outcome, addressed by its composite key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResultRecord {
    /// Archetype name
    pub core_type: String,
    pub element: String,
    pub keyword: String,
    pub symbol_name: String,
    pub overview: String,
    pub chapter1: String,
    pub chapter2: String,
    pub chapter3: String,
    pub chapter4: String,
}

impl ResultRecord {
    /// `"<element> : <keyword>"`, the line shown under the archetype name.
    #[must_use]
    pub fn details_line(&self) -> String {
        format!("{} : {}", self.element, self.keyword)
    }

    /// Chapter texts in order.
    #[must_use]
    pub fn chapters(&self) -> [&str; 4] {
        [&self.chapter1, &self.chapter2, &self.chapter3, &self.chapter4]
    }
}

/// Parsed content of one language's locale file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LocaleDataset {
    /// UI text key -> display string (may contain markup)
    pub ui: HashMap<String, String>,
    /// Composite key -> result record
    pub results: HashMap<String, ResultRecord>,
}

impl LocaleDataset {
    /// Parses and validates a locale file.
    ///
    /// The payload is checked against the schema before deserializing, so a
    /// partial document is rejected with every offending field listed
    /// instead of rendering blanks.
    ///
    /// # Errors
    /// - [`LocaleError::Parse`] when the text is not JSON
    /// - [`LocaleError::Invalid`] when the JSON does not follow the schema
    pub fn from_json(text: &str) -> Result<Self, LocaleError> {
        let value: Value = serde_json::from_str(text)?;
        validate_schema(&value).map_err(LocaleError::Invalid)?;
        Ok(serde_json::from_value(value)?)
    }

    /// UI text for `key`. Empty strings count as absent.
    #[must_use]
    pub fn ui_text(&self, key: &str) -> Option<&str> {
        self.ui.get(key).map(String::as_str).filter(|text| !text.is_empty())
    }

    #[must_use]
    pub fn site_title(&self) -> Option<&str> {
        self.ui_text(SITE_TITLE_KEY)
    }

    #[must_use]
    pub fn diagnosis_alert(&self) -> Option<&str> {
        self.ui_text(DIAGNOSIS_ALERT_KEY)
    }

    #[must_use]
    pub fn result(&self, id: &str) -> Option<&ResultRecord> {
        self.results.get(id)
    }
}

/// Collects every schema violation in `value`.
fn validate_schema(value: &Value) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let Some(root) = value.as_object() else {
        return Err(vec![ValidationError::new("$", "The locale file must be a JSON object")]);
    };

    match root.get("ui") {
        None => errors.push(ValidationError::new("ui", "The \"ui\" section is required")),
        Some(Value::Object(ui)) => {
            for (key, text) in ui {
                if !text.is_string() {
                    errors.push(ValidationError::new(
                        format!("ui.{key}"),
                        format!("UI text must be a string, found {}", json_type_name(text)),
                    ));
                }
            }
        }
        Some(other) => errors.push(ValidationError::new(
            "ui",
            format!("The \"ui\" section must be an object, found {}", json_type_name(other)),
        )),
    }

    match root.get("results") {
        None => {
            errors.push(ValidationError::new("results", "The \"results\" section is required"));
        }
        Some(Value::Object(results)) => {
            for (id, record) in results {
                validate_record(id, record, &mut errors);
            }
        }
        Some(other) => errors.push(ValidationError::new(
            "results",
            format!("The \"results\" section must be an object, found {}", json_type_name(other)),
        )),
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn validate_record(id: &str, record: &Value, errors: &mut Vec<ValidationError>) {
    let path = format!("results[\"{id}\"]");

    if id.is_empty() {
        errors.push(ValidationError::new(&path, "The result key cannot be empty"));
    }

    let Some(fields) = record.as_object() else {
        errors.push(ValidationError::new(
            path,
            format!("A result must be an object, found {}", json_type_name(record)),
        ));
        return;
    };

    for field in RESULT_RECORD_FIELDS {
        match fields.get(field) {
            None => errors.push(ValidationError::new(
                format!("{path}.{field}"),
                "The field is required",
            )),
            Some(Value::String(_)) => {}
            Some(other) => errors.push(ValidationError::new(
                format!("{path}.{field}"),
                format!("The field must be a string, found {}", json_type_name(other)),
            )),
        }
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
