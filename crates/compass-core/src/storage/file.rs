use std::fs;
use std::path::{Path, PathBuf};

use crate::config::StorageConfig;
use crate::tracker::Application;

use super::error::StorageError;
use super::Storage;

/// File-based storage implementation.
///
/// ```text
/// .compass/
///   applications/
///     {id}.json              # One tracked application
///   reports/
///     {name}.md              # Saved pathways, insights, job details
/// ```
pub struct FileStorage {
    applications_dir: PathBuf,
    reports_dir: PathBuf,
}

impl FileStorage {
    /// Creates storage rooted at `base` with the default layout.
    pub fn new(base: impl AsRef<Path>) -> Self {
        let config = StorageConfig::default();
        let base = base.as_ref();
        Self {
            applications_dir: base.join(&config.applications_dir),
            reports_dir: base.join(&config.reports_dir),
        }
    }

    /// Creates storage from configuration.
    pub fn with_config(config: &StorageConfig) -> Self {
        Self {
            applications_dir: config.applications_path(),
            reports_dir: config.reports_path(),
        }
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// Returns the path to an application's file.
    fn application_file(&self, id: &str) -> PathBuf {
        self.applications_dir.join(format!("{id}.json"))
    }

    fn ensure_dir(dir: &Path) -> Result<(), StorageError> {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;
        }
        Ok(())
    }
}

/// Turns a report title into a file stem: lowercase, alphanumerics joined
/// by single dashes.
pub fn report_stem(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

impl Storage for FileStorage {
    fn save_application(&self, application: &Application) -> Result<(), StorageError> {
        Self::ensure_dir(&self.applications_dir)?;

        let path = self.application_file(&application.id);
        let json = serde_json::to_string_pretty(application)?;
        fs::write(&path, json).map_err(|e| StorageError::io(&path, e))?;

        Ok(())
    }

    fn load_application(&self, id: &str) -> Result<Application, StorageError> {
        let path = self.application_file(id);
        if !path.exists() {
            return Err(StorageError::ApplicationNotFound(id.to_string()));
        }

        let json = fs::read_to_string(&path).map_err(|e| StorageError::io(&path, e))?;
        Ok(serde_json::from_str(&json)?)
    }

    fn list_applications(&self) -> Result<Vec<Application>, StorageError> {
        let dir = &self.applications_dir;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut applications = Vec::new();
        let entries = fs::read_dir(dir).map_err(|e| StorageError::io(dir, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io(dir, e))?;
            let path = entry.path();

            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(id) = path.file_stem().and_then(|n| n.to_str()) {
                match self.load_application(id) {
                    Ok(app) => applications.push(app),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "storage.skip_invalid");
                        continue;
                    }
                }
            }
        }

        Ok(applications)
    }

    fn delete_application(&self, id: &str) -> Result<(), StorageError> {
        let path = self.application_file(id);
        if !path.exists() {
            return Err(StorageError::ApplicationNotFound(id.to_string()));
        }

        fs::remove_file(&path).map_err(|e| StorageError::io(&path, e))
    }

    fn save_report(&self, name: &str, markdown: &str) -> Result<PathBuf, StorageError> {
        let stem = report_stem(name);
        if stem.is_empty() {
            return Err(StorageError::InvalidName(name.to_string()));
        }

        Self::ensure_dir(&self.reports_dir)?;
        let path = self.reports_dir.join(format!("{stem}.md"));
        fs::write(&path, markdown).map_err(|e| StorageError::io(&path, e))?;

        tracing::debug!(path = %path.display(), "storage.report_saved");
        Ok(path)
    }
}
