//! サイト設定
/// Configuration manager
mod manager;
/// Configuration types and settings
mod types;

pub use manager::{
    ConfigManager,
    SITE_CONFIG_FILE,
};
pub(crate) use types::format_validation_errors;
pub use types::{
    ConfigError,
    SiteSettings,
    ValidationError,
};
