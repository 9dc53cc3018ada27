//! soul-grimoire
//!
//! 言語切替に対応した性格診断サイトのページロジック。
//! ロケールの読み込み、回答からの結果キー生成、結果ページの描画を行います。

pub mod config;
pub mod locale;
pub mod page;
pub mod platform;
mod test_utils;

pub use page::Page;
