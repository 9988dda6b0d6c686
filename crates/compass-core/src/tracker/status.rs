use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TrackerError;

/// Where an application stands.
///
/// Applications usually move Applied → Screening → Interview Scheduled →
/// Interviewed → Follow-up → Offered → Accepted, and may be Rejected at
/// any point. Any status can be set directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Screening,
    InterviewScheduled,
    Interviewed,
    FollowUp,
    Offered,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 8] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Screening,
        ApplicationStatus::InterviewScheduled,
        ApplicationStatus::Interviewed,
        ApplicationStatus::FollowUp,
        ApplicationStatus::Offered,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Screening => "Screening",
            ApplicationStatus::InterviewScheduled => "Interview Scheduled",
            ApplicationStatus::Interviewed => "Interviewed",
            ApplicationStatus::FollowUp => "Follow-up",
            ApplicationStatus::Offered => "Offered",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    /// True once the process has ended either way.
    pub fn is_closed(&self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ApplicationStatus {
    type Err = TrackerError;

    /// Accepts display names and kebab-case, ignoring case
    /// (`"Interview Scheduled"`, `"interview-scheduled"`, `"follow-up"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        ApplicationStatus::ALL
            .into_iter()
            .find(|status| {
                status
                    .display_name()
                    .chars()
                    .filter(|c| c.is_alphanumeric())
                    .collect::<String>()
                    .to_lowercase()
                    == key
            })
            .ok_or_else(|| TrackerError::UnknownStatus(s.to_string()))
    }
}
