use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ApplicationStatus, TrackerError};

/// One job application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    /// Unique identifier
    pub id: String,
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub location: String,
    /// Day the application was sent
    pub applied_on: NaiveDate,
    pub status: ApplicationStatus,
    /// Job posting URL
    #[serde(default)]
    pub url: Option<String>,
    /// Contacts, salary, etc.
    #[serde(default)]
    pub notes: String,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// Creates an application with status Applied.
    ///
    /// Company and position must not be blank.
    pub fn new(
        company: impl Into<String>,
        position: impl Into<String>,
        applied_on: NaiveDate,
    ) -> Result<Self, TrackerError> {
        let company = company.into().trim().to_string();
        let position = position.into().trim().to_string();

        if company.is_empty() {
            return Err(TrackerError::MissingField("company"));
        }
        if position.is_empty() {
            return Err(TrackerError::MissingField("position"));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            company,
            position,
            location: String::new(),
            applied_on,
            status: ApplicationStatus::default(),
            url: None,
            notes: String::new(),
            updated_at: Utc::now(),
        })
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_status(mut self, status: ApplicationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.url = (!url.trim().is_empty()).then_some(url);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Sets the status and bumps `updated_at`.
    pub fn set_status(&mut self, status: ApplicationStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// `"YYYY-MM"` of the application date.
    pub fn month(&self) -> String {
        self.applied_on.format("%Y-%m").to_string()
    }

    /// Short id prefix for display.
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}
