//! The user's background, used to personalise every prompt.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::NOT_SPECIFIED;

/// Fields of interest offered to the user.
pub const INTERESTS: &[&str] = &[
    "Technology",
    "Healthcare",
    "Finance",
    "Education",
    "Arts",
    "Business",
    "Engineering",
    "Science",
    "Social Service",
    "Environment",
    "Law",
];

#[derive(Debug, Error, PartialEq)]
#[error("unknown {kind}: {value:?}")]
pub struct ProfileError {
    kind: &'static str,
    value: String,
}

/// Highest completed education.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EducationLevel {
    HighSchool,
    Associate,
    Bachelor,
    Master,
    Phd,
    Other,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 6] = [
        EducationLevel::HighSchool,
        EducationLevel::Associate,
        EducationLevel::Bachelor,
        EducationLevel::Master,
        EducationLevel::Phd,
        EducationLevel::Other,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            EducationLevel::HighSchool => "High School",
            EducationLevel::Associate => "Associate's Degree",
            EducationLevel::Bachelor => "Bachelor's Degree",
            EducationLevel::Master => "Master's Degree",
            EducationLevel::Phd => "PhD",
            EducationLevel::Other => "Other",
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for EducationLevel {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['\'', '-', '_'], " ");
        let level = match key.as_str() {
            "high school" | "highschool" => EducationLevel::HighSchool,
            "associate" | "associates" | "associate s degree" => EducationLevel::Associate,
            "bachelor" | "bachelors" | "bachelor s degree" => EducationLevel::Bachelor,
            "master" | "masters" | "master s degree" => EducationLevel::Master,
            "phd" | "doctorate" => EducationLevel::Phd,
            "other" => EducationLevel::Other,
            _ => {
                return Err(ProfileError {
                    kind: "education level",
                    value: s.to_string(),
                })
            }
        };
        Ok(level)
    }
}

/// Years of working experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Entry,
    OneToThree,
    FourToSix,
    SevenToTen,
    TenPlus,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 5] = [
        ExperienceLevel::Entry,
        ExperienceLevel::OneToThree,
        ExperienceLevel::FourToSix,
        ExperienceLevel::SevenToTen,
        ExperienceLevel::TenPlus,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Student/Entry Level",
            ExperienceLevel::OneToThree => "1-3 Years",
            ExperienceLevel::FourToSix => "4-6 Years",
            ExperienceLevel::SevenToTen => "7-10 Years",
            ExperienceLevel::TenPlus => "10+ Years",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ExperienceLevel {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(' ', "");
        let level = match key.as_str() {
            "entry" | "student" | "student/entrylevel" | "0" => ExperienceLevel::Entry,
            "1-3" | "1-3years" => ExperienceLevel::OneToThree,
            "4-6" | "4-6years" => ExperienceLevel::FourToSix,
            "7-10" | "7-10years" => ExperienceLevel::SevenToTen,
            "10+" | "10+years" | "senior" => ExperienceLevel::TenPlus,
            _ => {
                return Err(ProfileError {
                    kind: "experience level",
                    value: s.to_string(),
                })
            }
        };
        Ok(level)
    }
}

/// Everything known about the user. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub education: Option<EducationLevel>,
    pub experience: Option<ExperienceLevel>,
    pub interests: Vec<String>,
    pub selected_career: Option<String>,
}

impl UserProfile {
    pub fn education_label(&self) -> &str {
        self.education.map(|e| e.display_name()).unwrap_or(NOT_SPECIFIED)
    }

    pub fn experience_label(&self) -> &str {
        self.experience.map(|e| e.display_name()).unwrap_or(NOT_SPECIFIED)
    }

    pub fn interests_label(&self) -> String {
        if self.interests.is_empty() {
            NOT_SPECIFIED.to_string()
        } else {
            self.interests.join(", ")
        }
    }

    pub fn career_label(&self) -> &str {
        self.selected_career.as_deref().unwrap_or(NOT_SPECIFIED)
    }

    /// The "User Context" block embedded in advisor prompts.
    pub fn context_block(&self) -> String {
        format!(
            "User Context:\n- Education Level: {}\n- Experience Level: {}\n- Interests: {}\n- Career Interest: {}",
            self.education_label(),
            self.experience_label(),
            self.interests_label(),
            self.career_label(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profile_context() {
        let context = UserProfile::default().context_block();
        assert_eq!(context.matches(NOT_SPECIFIED).count(), 4);
    }

    #[test]
    fn test_profile_context_lists_interests() {
        let profile = UserProfile {
            education: Some(EducationLevel::Master),
            experience: Some(ExperienceLevel::FourToSix),
            interests: vec!["Technology".to_string(), "Science".to_string()],
            selected_career: Some("Data Scientist".to_string()),
        };
        let context = profile.context_block();
        assert!(context.contains("Education Level: Master's Degree"));
        assert!(context.contains("Experience Level: 4-6 Years"));
        assert!(context.contains("Interests: Technology, Science"));
        assert!(context.contains("Career Interest: Data Scientist"));
    }

    #[test]
    fn test_parse_levels() {
        assert_eq!("Bachelor's Degree".parse(), Ok(EducationLevel::Bachelor));
        assert_eq!("phd".parse(), Ok(EducationLevel::Phd));
        assert_eq!("1-3 Years".parse(), Ok(ExperienceLevel::OneToThree));
        assert_eq!("10+".parse(), Ok(ExperienceLevel::TenPlus));
        assert!("wizard".parse::<ExperienceLevel>().is_err());
    }
}
