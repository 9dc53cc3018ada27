use thiserror::Error;

use crate::config::{
    ValidationError,
    format_validation_errors,
};

/// Errors raised while turning a locale file into a [`super::LocaleDataset`]
#[derive(Error, Debug)]
pub enum LocaleError {
    /// The payload is not JSON at all
    #[error("Failed to parse locale data: {0}")]
    Parse(#[from] serde_json::Error),
    /// The payload is JSON but does not follow the locale schema
    #[error("Malformed locale data:\n{}", format_validation_errors(.0))]
    Invalid(Vec<ValidationError>),
}
