mod error;
mod file;

pub use error::StorageError;
pub use file::FileStorage;

use std::path::PathBuf;

use crate::tracker::Application;

/// Trait for storage backends.
///
/// Implementations persist tracked applications and saved markdown
/// reports (pathways, insights, job details).
pub trait Storage {
    /// Saves an application, replacing any with the same id.
    fn save_application(&self, application: &Application) -> Result<(), StorageError>;

    /// Loads an application by id.
    fn load_application(&self, id: &str) -> Result<Application, StorageError>;

    /// Lists all stored applications in no particular order.
    fn list_applications(&self) -> Result<Vec<Application>, StorageError>;

    /// Deletes an application.
    fn delete_application(&self, id: &str) -> Result<(), StorageError>;

    /// Writes a markdown report and returns where it was written.
    fn save_report(&self, name: &str, markdown: &str) -> Result<PathBuf, StorageError>;
}
