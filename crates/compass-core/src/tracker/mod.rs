//! Job application tracking.

mod application;
mod status;

pub use application::Application;
pub use status::ApplicationStatus;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::storage::{Storage, StorageError};

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("unknown application status: {0:?}")]
    UnknownStatus(String),

    #[error("no application matches id prefix {0:?}")]
    NotFound(String),

    #[error("id prefix {0:?} matches more than one application")]
    AmbiguousId(String),
}

/// Application counts by status and by month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationStats {
    pub total: usize,
    /// Most frequent status first; ties in status order.
    pub by_status: Vec<(ApplicationStatus, usize)>,
    /// `("YYYY-MM", count)`, oldest first.
    pub by_month: Vec<(String, usize)>,
}

/// Manages applications with automatic persistence.
pub struct ApplicationTracker<S: Storage> {
    storage: S,
}

impl<S: Storage> ApplicationTracker<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Persists a new application.
    pub fn add(&mut self, application: Application) -> Result<Application, TrackerError> {
        self.storage.save_application(&application)?;
        tracing::info!(id = %application.id, company = %application.company, "tracker.add");
        Ok(application)
    }

    /// Gets an application by id or unique id prefix.
    pub fn get(&self, id: &str) -> Result<Application, TrackerError> {
        let id = self.resolve_id(id)?;
        Ok(self.storage.load_application(&id)?)
    }

    pub fn remove(&mut self, id: &str) -> Result<Application, TrackerError> {
        let application = self.get(id)?;
        self.storage.delete_application(&application.id)?;
        tracing::info!(id = %application.id, "tracker.remove");
        Ok(application)
    }

    /// Lists applications, newest `applied_on` first. An empty `filter`
    /// keeps every status.
    pub fn list(&self, filter: &[ApplicationStatus]) -> Result<Vec<Application>, TrackerError> {
        let mut applications: Vec<Application> = self
            .storage
            .list_applications()?
            .into_iter()
            .filter(|app| filter.is_empty() || filter.contains(&app.status))
            .collect();

        applications.sort_by(|a, b| {
            b.applied_on
                .cmp(&a.applied_on)
                .then_with(|| b.updated_at.cmp(&a.updated_at))
        });
        Ok(applications)
    }

    pub fn update_status(&mut self, id: &str, status: ApplicationStatus) -> Result<Application, TrackerError> {
        let mut application = self.get(id)?;
        let previous = application.status;
        application.set_status(status);
        self.storage.save_application(&application)?;
        tracing::info!(id = %application.id, from = %previous, to = %status, "tracker.status");
        Ok(application)
    }

    pub fn stats(&self) -> Result<ApplicationStats, TrackerError> {
        let applications = self.storage.list_applications()?;

        let mut statuses: BTreeMap<ApplicationStatus, usize> = BTreeMap::new();
        let mut months: BTreeMap<String, usize> = BTreeMap::new();
        for app in &applications {
            *statuses.entry(app.status).or_default() += 1;
            *months.entry(app.month()).or_default() += 1;
        }

        let mut by_status: Vec<(ApplicationStatus, usize)> = statuses.into_iter().collect();
        by_status.sort_by(|a, b| b.1.cmp(&a.1));

        Ok(ApplicationStats {
            total: applications.len(),
            by_status,
            by_month: months.into_iter().collect(),
        })
    }

    fn resolve_id(&self, prefix: &str) -> Result<String, TrackerError> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(TrackerError::NotFound(prefix.to_string()));
        }

        let mut matches = self
            .storage
            .list_applications()?
            .into_iter()
            .map(|app| app.id)
            .filter(|id| id.starts_with(prefix));

        match (matches.next(), matches.next()) {
            (Some(id), None) => Ok(id),
            (Some(_), Some(_)) => Err(TrackerError::AmbiguousId(prefix.to_string())),
            (None, _) => Err(TrackerError::NotFound(prefix.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FileStorage;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_tracker() -> (ApplicationTracker<FileStorage>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        (ApplicationTracker::new(storage), temp_dir)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_and_get_by_prefix() {
        let (mut tracker, _temp) = create_test_tracker();

        let app = Application::new("Acme", "Engineer", date(2024, 3, 1)).unwrap();
        let saved = tracker.add(app).unwrap();

        let loaded = tracker.get(saved.short_id()).unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_blank_company_rejected() {
        assert!(matches!(
            Application::new("  ", "Engineer", date(2024, 1, 1)),
            Err(TrackerError::MissingField("company"))
        ));
    }

    #[test]
    fn test_list_filters_and_orders() {
        let (mut tracker, _temp) = create_test_tracker();

        tracker.add(Application::new("A", "Dev", date(2024, 1, 5)).unwrap()).unwrap();
        tracker
            .add(
                Application::new("B", "Dev", date(2024, 2, 5))
                    .unwrap()
                    .with_status(ApplicationStatus::Rejected),
            )
            .unwrap();
        tracker.add(Application::new("C", "Dev", date(2023, 12, 5)).unwrap()).unwrap();

        let all: Vec<String> = tracker.list(&[]).unwrap().into_iter().map(|a| a.company).collect();
        assert_eq!(all, vec!["B", "A", "C"]);

        let open = tracker.list(&[ApplicationStatus::Applied]).unwrap();
        assert_eq!(open.len(), 2);
    }

    #[test]
    fn test_update_and_remove() {
        let (mut tracker, _temp) = create_test_tracker();

        let app = tracker.add(Application::new("Acme", "Dev", date(2024, 1, 1)).unwrap()).unwrap();
        let updated = tracker.update_status(&app.id, ApplicationStatus::Offered).unwrap();
        assert_eq!(updated.status, ApplicationStatus::Offered);
        assert_eq!(tracker.get(&app.id).unwrap().status, ApplicationStatus::Offered);

        tracker.remove(&app.id).unwrap();
        assert!(matches!(tracker.get(&app.id), Err(TrackerError::NotFound(_))));
    }

    #[test]
    fn test_stats() {
        let (mut tracker, _temp) = create_test_tracker();

        for (company, day, status) in [
            ("A", date(2024, 2, 1), ApplicationStatus::Applied),
            ("B", date(2024, 1, 9), ApplicationStatus::Rejected),
            ("C", date(2024, 2, 20), ApplicationStatus::Rejected),
        ] {
            tracker
                .add(Application::new(company, "Dev", day).unwrap().with_status(status))
                .unwrap();
        }

        let stats = tracker.stats().unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(
            stats.by_status,
            vec![(ApplicationStatus::Rejected, 2), (ApplicationStatus::Applied, 1)]
        );
        assert_eq!(stats.by_month, vec![("2024-01".to_string(), 1), ("2024-02".to_string(), 2)]);
    }
}
