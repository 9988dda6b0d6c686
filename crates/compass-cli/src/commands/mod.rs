//! Subcommand implementations.

pub mod advice;
pub mod insights;
pub mod jobs;
pub mod manifest;
pub mod track;

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr};
use compass_core::{Config, FileStorage, Provider, Storage, LLM};
use indicatif::{ProgressBar, ProgressStyle};

/// Builds the configured model client.
pub fn build_llm(config: &Config) -> Result<Arc<dyn LLM>> {
    let provider = Provider::from_config(&config.llm)?;
    tracing::debug!(provider = provider.name(), "cli.llm");
    Ok(Arc::from(provider.build()?))
}

pub fn storage(config: &Config) -> FileStorage {
    FileStorage::with_config(&config.storage)
}

/// A steady-ticking spinner on stderr.
pub fn spinner(message: impl Into<Cow<'static, str>>) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

pub fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).wrap_err_with(|| format!("failed to read {}", path.display()))
}

/// Prints `markdown` and, when asked, writes it to the reports directory.
pub fn emit_report(config: &Config, name: &str, markdown: &str, save: bool) -> Result<()> {
    println!("{markdown}");
    if save {
        let path = storage(config).save_report(name, markdown)?;
        println!("\nSaved to {}", path.display());
    }
    Ok(())
}
