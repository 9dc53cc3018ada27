//! Command-line host: runs the quiz pages against a site directory.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{
    Context,
    Result,
};
use clap::{
    Parser,
    Subcommand,
};
use soul_grimoire::Page;
use soul_grimoire::config::ConfigManager;
use soul_grimoire::page::{
    FORM_FIELDS,
    LoadOutcome,
    RESULT_CONTAINER_ID,
    RESULT_FIELD_IDS,
    RenderOutcome,
    SubmitOutcome,
};
use soul_grimoire::platform::fs::{
    FilePreferenceStore,
    FsFetcher,
    list_languages,
};
use soul_grimoire::platform::memory::MemoryHost;
use tracing_subscriber::EnvFilter;

/// File standing in for browser-local storage, relative to the site root.
const PREFERENCES_FILE: &str = ".soul-grimoire-state.json";

#[derive(Parser)]
#[command(name = "soul-grimoire")]
#[command(version)]
#[command(about = "Run the Soul Grimoire quiz pages from the command line")]
struct Cli {
    /// Site root holding the locales directory and `.soul-grimoire.json`
    #[arg(long, default_value = ".")]
    site_root: PathBuf,

    /// Preference file (default: `<site-root>/.soul-grimoire-state.json`)
    #[arg(long)]
    preferences: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer the quiz and print the result page URL
    Diagnose {
        /// Answer codes for q1..q4, in order
        #[arg(value_name = "ANSWER", num_args = 0..=4)]
        answers: Vec<String>,

        /// Language override, as the `lang` URL parameter
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Render a result page URL such as `result.html?id=a-b-c-d&lang=ja`
    Result {
        #[arg(value_name = "URL")]
        url: String,

        /// Switch to this language after the first render
        #[arg(short, long)]
        switch: Option<String>,
    },

    /// List languages with a locale file
    Languages,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config_manager = ConfigManager::new();
    config_manager
        .load_settings(Some(cli.site_root.clone()))
        .context("Failed to load site settings")?;
    let settings = config_manager.get_settings().clone();

    let preferences_path =
        cli.preferences.clone().unwrap_or_else(|| cli.site_root.join(PREFERENCES_FILE));
    let browser_language = sys_locale::get_locale();
    tracing::debug!("Browser language: {:?}", browser_language);

    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Diagnose { answers, lang } => {
            let mut host = MemoryHost::index_page();
            if let Some(lang) = &lang {
                host = host.with_query(format!("?lang={}", urlencoding::encode(lang)));
            }
            if let Some(browser_language) = &browser_language {
                host = host.with_browser_language(browser_language.clone());
            }
            for (name, answer) in FORM_FIELDS.into_iter().zip(&answers) {
                host.set_answer(name, answer);
            }

            let page = Page::new(
                settings,
                FsFetcher::new(&cli.site_root),
                FilePreferenceStore::open(&preferences_path)?,
                host,
            );
            let report = page.initialize().await;
            warn_on_failed_load(&report.load);

            match page.submit_quiz_form().await {
                SubmitOutcome::Navigated(url) => {
                    writeln!(out, "{url}")?;
                    Ok(ExitCode::SUCCESS)
                }
                SubmitOutcome::Alerted(message) => {
                    writeln!(out, "{message}")?;
                    Ok(ExitCode::FAILURE)
                }
                SubmitOutcome::NotAttached => Ok(ExitCode::FAILURE),
            }
        }
        Commands::Result { url, switch } => {
            let query = url.split_once('?').map_or("", |(_, query)| query);
            let mut host = MemoryHost::result_page().with_query(query);
            if let Some(browser_language) = &browser_language {
                host = host.with_browser_language(browser_language.clone());
            }

            let page = Page::new(
                settings,
                FsFetcher::new(&cli.site_root),
                FilePreferenceStore::open(&preferences_path)?,
                host,
            );
            let report = page.initialize().await;
            warn_on_failed_load(&report.load);
            let mut rendered = report.result;

            if let Some(lang) = switch {
                let switched = page.change_language(&lang).await;
                warn_on_failed_load(&switched.load);
                rendered = switched.result;
            }

            let host = page.host().await;
            let mut fields = serde_json::Map::new();
            fields.insert("title".to_string(), host.title().into());
            match rendered {
                Some(RenderOutcome::Rendered(_)) => {
                    for id in RESULT_FIELD_IDS {
                        if let Some(content) = host.content_of(id).filter(|c| !c.is_empty()) {
                            fields.insert(id.to_string(), content.into());
                        }
                    }
                    for attribute in ["src", "alt"] {
                        if let Some(value) = host.attribute_of("symbol-image", attribute) {
                            fields.insert(format!("symbol-image.{attribute}"), value.into());
                        }
                    }
                }
                _ => {
                    let content = host.content_of(RESULT_CONTAINER_ID).unwrap_or_default();
                    fields.insert(RESULT_CONTAINER_ID.to_string(), content.into());
                }
            }
            writeln!(out, "{}", serde_json::to_string_pretty(&fields)?)?;

            Ok(if matches!(rendered, Some(RenderOutcome::Rendered(_))) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Languages => {
            let locales_path = config_manager.locales_path();
            let languages = list_languages(&locales_path)
                .with_context(|| format!("Failed to read {}", locales_path.display()))?;
            for language in languages {
                writeln!(out, "{language}")?;
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// The page already logged the failure; this adds the hint a terminal user needs.
fn warn_on_failed_load(outcome: &LoadOutcome) {
    if let LoadOutcome::Failed(error) = outcome {
        tracing::warn!("Page shown without locale data: {error}");
    }
}
