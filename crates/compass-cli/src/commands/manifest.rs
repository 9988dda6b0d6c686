//! Dependency manifest checks.

use std::path::PathBuf;

use clap::Subcommand;
use color_eyre::eyre::{bail, Result};
use compass_core::config::DEFAULT_RUNTIME_NAME;
use compass_core::manifest::{check_registry, PypiIndex, RegistryOutcome, Severity};
use compass_core::{Config, Manifest};

use super::spinner;

#[derive(Debug, Subcommand)]
pub enum ManifestCommand {
    /// Parse and validate a requirements file
    Check {
        #[arg(default_value = compass_core::config::DEFAULT_MANIFEST_FILE)]
        file: PathBuf,

        /// Also confirm each range against the package index
        #[arg(long)]
        registry: bool,
    },
    /// Print the file with every requirement in canonical form
    Fmt {
        #[arg(default_value = compass_core::config::DEFAULT_MANIFEST_FILE)]
        file: PathBuf,
    },
}

pub async fn run(config: &Config, command: ManifestCommand) -> Result<()> {
    match command {
        ManifestCommand::Check { file, registry } => check(config, file, registry).await,
        ManifestCommand::Fmt { file } => {
            let manifest = Manifest::from_file(&file)?;
            print!("{manifest}");
            Ok(())
        }
    }
}

async fn check(config: &Config, file: PathBuf, registry: bool) -> Result<()> {
    let manifest = Manifest::from_file(&file)?;
    println!("{}: {} requirements", file.display(), manifest.len());
    if let Some(runtime) = &manifest.runtime {
        println!("runtime: {DEFAULT_RUNTIME_NAME} {}{}", runtime.comparator, runtime.raw);
    }

    let report = manifest.check();
    for issue in &report.issues {
        match issue.line() {
            Some(line) => println!("{:>7} line {line}: {issue}", issue.severity().as_str()),
            None => println!("{:>7} {issue}", issue.severity().as_str()),
        }
    }

    let mut failed = !report.is_ok();

    if registry {
        let index = PypiIndex::from_config(&config.registry)?;
        let bar = spinner(format!("Querying {}...", config.registry.index_url));
        let findings = check_registry(&manifest, &index, config.registry.concurrency).await;
        bar.finish_and_clear();

        for finding in &findings {
            let verdict = match &finding.outcome {
                RegistryOutcome::Satisfied { best } => format!("ok, newest match {best}"),
                RegistryOutcome::NoMatchingRelease { latest: Some(latest) } => {
                    format!("no matching release (latest is {latest})")
                }
                RegistryOutcome::NoMatchingRelease { latest: None } => "no releases published".to_string(),
                RegistryOutcome::NotFound => "not found on the index".to_string(),
                RegistryOutcome::LookupFailed(e) => format!("lookup failed: {e}"),
            };
            println!("line {:>3}  {}{}  {verdict}", finding.line, finding.name, finding.constraints);
        }
        failed |= findings.iter().any(|f| !f.is_satisfied());
    }

    if failed {
        bail!("{} has problems", file.display());
    }
    if report.issues.iter().all(|i| i.severity() == Severity::Info) {
        println!("ok");
    }
    Ok(())
}
