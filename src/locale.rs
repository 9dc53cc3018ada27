//! Locale dataset: the parsed and validated content of one `<lang>.json` file.

mod dataset;
mod error;

pub use dataset::{
    LocaleDataset,
    RESULT_RECORD_FIELDS,
    ResultRecord,
};
pub use error::LocaleError;
